use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::Result;

/// The set escaped by URI-component encoding.
///
/// Contains all code points except the ASCII alphanumerics and
/// `-`, `_`, `.`, `!`, `~`, `*`, `'`, `(` and `)`. This covers the
/// querystring delimiters `&`, `=`, `+` and `#`, as well as spaces, which are
/// written as `%20`.
const COMPONENT_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A relaxed version of [`COMPONENT_SET`] used for keys.
///
/// Characters that are harmless inside a query component are left as they
/// are, so that keys like `df-fd,x+k` stay readable. `=`, `&` and `#` are
/// still escaped since they would otherwise change how the query splits.
const STANDARD_SET: &AsciiSet = &COMPONENT_SET
    .remove(b'@')
    .remove(b':')
    .remove(b'$')
    .remove(b',')
    .remove(b';')
    .remove(b'+')
    .remove(b'?')
    .remove(b'/');

/// Percent-encodes a string as a URI component.
pub fn encode_component(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, COMPONENT_SET).into()
}

/// Percent-encodes a string, leaving the readable reserved characters
/// (`@ : $ , ; + ? /`) untouched.
pub fn encode_standard(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, STANDARD_SET).into()
}

#[inline(always)]
fn char_to_digit(c: u8) -> Option<u32> {
    char::from(c).to_digit(16)
}

/// Decodes percent-encoded bytes.
///
/// Unlike form decoding, `+` is kept as a literal `+`. Malformed escapes
/// (e.g. `%zz`) are left in the output as they are.
fn decode(input: &[u8]) -> Cow<'_, [u8]> {
    if !input.contains(&b'%') {
        return Cow::Borrowed(input);
    }

    let mut decoded = Vec::with_capacity(input.len());
    let mut last_segment = 0;
    let mut idx = 0;

    while idx < input.len() {
        if input[idx] != b'%' {
            idx += 1;
            continue;
        }

        // only consume the next two bytes once both are hex digits,
        // otherwise the `%` is kept and scanning resumes right after it
        let h = input.get(idx + 1).and_then(|b| char_to_digit(*b));
        let l = input.get(idx + 2).and_then(|b| char_to_digit(*b));
        let (Some(h), Some(l)) = (h, l) else {
            tracing::debug!(position = idx, "keeping malformed percent escape");
            idx += 1;
            continue;
        };

        decoded.extend_from_slice(&input[last_segment..idx]);
        decoded.push(h as u8 * 0x10 + l as u8);
        idx += 3;
        last_segment = idx;
    }

    decoded.extend_from_slice(&input[last_segment..]);
    Cow::Owned(decoded)
}

/// Decodes a percent-encoded query component into a string.
///
/// Fails if the decoded bytes are not valid UTF-8.
pub fn decode_component(input: &str) -> Result<Cow<'_, str>> {
    match decode(input.as_bytes()) {
        Cow::Borrowed(_) => Ok(Cow::Borrowed(input)),
        Cow::Owned(bytes) => Ok(Cow::Owned(String::from_utf8(bytes)?)),
    }
}
