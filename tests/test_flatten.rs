use pretty_assertions::assert_eq;
use serde::Serialize;
use serde_json::json;
use serde_params::{Config, Error, Value, flatten_object};
use std::collections::BTreeMap;

fn pairs<const N: usize>(expected: [(&str, Value); N]) -> Vec<(String, Value)> {
    expected
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

#[test]
fn simple() {
    let result = flatten_object(&json!({ "a": 1 })).unwrap();
    assert_eq!(result, pairs([("a", 1.into())]));
}

#[test]
fn with_array() {
    let result = flatten_object(&json!({ "a": 1, "b": ["1", 2] })).unwrap();
    assert_eq!(
        result,
        pairs([
            ("a", 1.into()),
            ("b", Value::Array(vec!["1".into(), 2.into()])),
        ])
    );
}

#[test]
fn with_undefined() {
    #[derive(Serialize)]
    struct Query {
        a: u8,
        b: Option<u8>,
    }

    let result = flatten_object(&Query { a: 1, b: None }).unwrap();
    assert_eq!(result, pairs([("a", 1.into())]));
}

#[test]
fn with_zero() {
    let result = flatten_object(&json!({ "a": 0 })).unwrap();
    assert_eq!(result, pairs([("a", 0.into())]));
}

#[test]
fn with_null() {
    let result = flatten_object(&json!({ "a": 1, "b": null })).unwrap();
    assert_eq!(result, pairs([("a", 1.into()), ("b", Value::Null)]));
}

#[test]
fn with_nested_object() {
    let result = flatten_object(&json!({ "a": 1, "b": { "x": 2 } })).unwrap();
    assert_eq!(result, pairs([("a", 1.into()), ("b.x", 2.into())]));
}

#[test]
fn with_nested_object_and_undefined() {
    #[derive(Serialize)]
    struct Inner {
        x: u8,
        z: Option<u8>,
    }

    #[derive(Serialize)]
    struct Query {
        a: u8,
        b: Inner,
    }

    let result = flatten_object(&Query {
        a: 1,
        b: Inner { x: 2, z: None },
    })
    .unwrap();
    assert_eq!(result, pairs([("a", 1.into()), ("b.x", 2.into())]));
}

#[test]
fn with_two_levels_of_nesting() {
    let result = flatten_object(&json!({
        "a": 1,
        "b": { "x": 2 },
        "c": {
            "x": 3,
            "d": { "y": 5 },
        },
    }))
    .unwrap();
    assert_eq!(
        result,
        pairs([
            ("a", 1.into()),
            ("b.x", 2.into()),
            ("c.x", 3.into()),
            ("c.d.y", 5.into()),
        ])
    );
}

#[test]
fn with_complex_key() {
    let result = flatten_object(&json!({ "df-fd,x+k": 1 })).unwrap();
    assert_eq!(result, pairs([("df-fd,x+k", 1.into())]));
}

#[test]
fn with_digital_key() {
    let mut map = BTreeMap::new();
    map.insert(1u32, 1u32);
    let result = flatten_object(&map).unwrap();
    assert_eq!(result, pairs([("1", 1.into())]));
}

#[test]
fn undefined_at_every_depth() {
    #[derive(Serialize)]
    struct Deep {
        y: Option<u8>,
    }

    #[derive(Serialize)]
    struct Middle {
        d: Deep,
        w: Option<String>,
    }

    #[derive(Serialize)]
    struct Query {
        a: Option<u8>,
        c: Middle,
        e: u8,
    }

    let result = flatten_object(&Query {
        a: None,
        c: Middle {
            d: Deep { y: None },
            w: None,
        },
        e: 1,
    })
    .unwrap();
    assert_eq!(result, pairs([("e", 1.into())]));
}

#[test]
fn key_order_is_preserved() {
    let result = flatten_object(&json!({
        "z": 1,
        "m": { "b": 2, "a": 3 },
        "a": 4,
    }))
    .unwrap();
    let keys: Vec<_> = result.into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["z", "m.b", "m.a", "a"]);
}

#[test]
fn flat_objects_are_unchanged() {
    let input = json!({ "a": 1, "b": "two", "c": true, "d": null });
    let result = flatten_object(&input).unwrap();
    let expected: Vec<_> = input
        .as_object()
        .unwrap()
        .iter()
        .map(|(k, v)| (k.clone(), serde_params::to_value(v).unwrap()))
        .collect();
    assert_eq!(result, expected);
}

#[test]
fn enum_variants_nest_under_their_name() {
    #[derive(Serialize)]
    #[serde(rename_all = "lowercase")]
    enum Status {
        Open,
        Closed { since: u32 },
    }

    #[derive(Serialize)]
    struct Query {
        a: Status,
        b: Status,
    }

    let result = flatten_object(&Query {
        a: Status::Open,
        b: Status::Closed { since: 3 },
    })
    .unwrap();
    assert_eq!(
        result,
        pairs([("a", "open".into()), ("b.closed.since", 3u32.into())])
    );
}

#[test]
fn custom_separator() {
    let config = Config::new().key_separator("__");
    let result = config
        .flatten(&json!({ "a": { "b": { "c": 1 } } }))
        .unwrap();
    assert_eq!(result, pairs([("a__b__c", 1.into())]));
}

#[test]
fn top_level_must_be_map_like() {
    let err = flatten_object(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, Error::TopLevel(_)), "got: {err}");

    let err = flatten_object("a").unwrap_err();
    assert!(matches!(err, Error::TopLevel(_)), "got: {err}");
}
