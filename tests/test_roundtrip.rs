use pretty_assertions::assert_eq;
use rand::Rng;
use serde::Serialize;
use serde_json::json;
use serde_params::{Params, Value, flatten_object, http_params};

/// Builds params for `data`, writes them out, parses the result and checks
/// that every flattened value comes back as its param string.
fn roundtrip<T: Serialize + ?Sized>(data: &T) -> String {
    let serialized = http_params(data).expect("serialize").to_string();
    let parsed: Params = serialized.parse().expect("parse");

    for (key, value) in flatten_object(data).expect("flatten") {
        let expected: Vec<Value> = match &value {
            Value::Array(items) => items
                .iter()
                .map(|item| Value::from(item.to_param_string()))
                .collect(),
            other => vec![Value::from(other.to_param_string())],
        };
        if expected.is_empty() {
            continue;
        }
        assert_eq!(parsed.get_all(&key), Some(expected.as_slice()), "key: {key}");
    }

    serialized
}

#[derive(Debug, PartialEq, Serialize)]
struct FlatStruct {
    a: u8,
    b: u8,
}

#[test]
fn flat_struct() {
    insta::assert_snapshot!(roundtrip(&FlatStruct { a: 1, b: 2 }), @"a=1&b=2");
}

#[derive(Debug, PartialEq, Serialize)]
struct PrimitiveTypes {
    bool_val: bool,
    i8_val: i8,
    i64_val: i64,
    u64_val: u64,
    f32_val: f32,
    f64_val: f64,
    char_val: char,
    string_val: String,
}

#[test]
fn primitive_types() {
    let serialized = roundtrip(&PrimitiveTypes {
        bool_val: true,
        i8_val: -128,
        i64_val: -9223372036854775808,
        u64_val: 18446744073709551615,
        f32_val: 3.14159,
        f64_val: 2.718281828,
        char_val: '🦀',
        string_val: "Hello, world! 你好世界".to_string(),
    });
    insta::assert_snapshot!(serialized, @"bool_val=true&i8_val=-128&i64_val=-9223372036854775808&u64_val=18446744073709551615&f32_val=3.14159&f64_val=2.718281828&char_val=%F0%9F%A6%80&string_val=Hello%2C%20world!%20%E4%BD%A0%E5%A5%BD%E4%B8%96%E7%95%8C");
}

#[derive(Debug, PartialEq, Serialize)]
struct EdgeCasePrimitives {
    empty_string: String,
    zero_int: i32,
    zero_float: f64,
    false_bool: bool,
    space_string: String,
    special_chars: String,
}

#[test]
fn edge_case_primitives() {
    let serialized = roundtrip(&EdgeCasePrimitives {
        empty_string: String::new(),
        zero_int: 0,
        zero_float: 0.0,
        false_bool: false,
        space_string: "   ".to_string(),
        special_chars: "!@#$%^&*()_+-=[]{}|;':,.<>?/~`".to_string(),
    });
    insta::assert_snapshot!(serialized, @"empty_string=&zero_int=0&zero_float=0&false_bool=false&space_string=%20%20%20&special_chars=!%40%23%24%25%5E%26*()_%2B-%3D%5B%5D%7B%7D%7C%3B'%3A%2C.%3C%3E%3F%2F~%60");
}

#[test]
fn cyrillic_values() {
    let serialized = roundtrip(&json!({ "name": "Вася", "city": "Москва" }));
    let decoded: Vec<(String, String)> = serde_urlencoded::from_str(&serialized).unwrap();
    assert_eq!(
        decoded,
        vec![
            ("name".to_string(), "Вася".to_string()),
            ("city".to_string(), "Москва".to_string()),
        ]
    );
}

#[test]
fn reserved_keys() {
    let serialized = roundtrip(&json!({ "df-fd,x+k": 1, "a@b:c": 2, "a=b&c": 3 }));
    insta::assert_snapshot!(serialized, @"df-fd,x+k=1&a@b:c=2&a%3Db%26c=3");

    let parsed: Params = serialized.parse().unwrap();
    assert_eq!(
        parsed.keys().collect::<Vec<_>>(),
        vec!["df-fd,x+k", "a@b:c", "a=b&c"]
    );
}

#[test]
fn nested_with_arrays() {
    let serialized = roundtrip(&json!({
        "filter": {
            "status": ["open", "pending review"],
            "owner": { "id": 7, "name": null },
        },
        "page": 2,
    }));
    insta::assert_snapshot!(serialized, @"filter.status=open&filter.status=pending%20review&filter.owner.id=7&filter.owner.name=&page=2");
}

#[test]
fn random_strings() {
    const ALPHABET: &[char] = &[
        'a', 'Z', '0', ' ', '&', '=', '+', '#', '%', '?', '/', ',', ';', '.', '~', 'Ж', 'я', '€',
        '🦀',
    ];

    let mut rng = rand::rng();
    for _ in 0..100 {
        let len = rng.random_range(0..16);
        let s: String = (0..len)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
            .collect();

        let serialized = roundtrip(&json!({ "k": s }));

        // an independent form decoder agrees on the value
        let decoded: Vec<(String, String)> = serde_urlencoded::from_str(&serialized).unwrap();
        assert_eq!(decoded, vec![("k".to_string(), s.clone())], "input: {s:?}");
    }
}
