//! Payload mapping passed to `build_request` and its url encoding.

use serde_json::{Map, Value};
use url::form_urlencoded;

/// String-keyed mapping of payload values
pub type Params = Map<String, Value>;

/// Whether a value counts as empty and is dropped from GET queries.
///
/// Follows loose truthiness: `null`, `false`, zero, `""`, `"0"` and empty
/// arrays or objects are empty.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n == 0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Copy of `params` without the empty entries.
pub fn filter_empty(params: &Params) -> Params {
    params
        .iter()
        .filter(|(_, value)| !is_empty_value(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Flatten `params` into key/value pairs.
///
/// Nested arrays become `key[0]`, `key[1]`..., nested objects `key[sub]`.
/// `null` is skipped, booleans become `1`/`0`.
pub fn to_pairs(params: &Params) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        push_pairs(key.clone(), value, &mut pairs);
    }
    pairs
}

fn push_pairs(key: String, value: &Value, pairs: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => pairs.push((key, if *b { "1" } else { "0" }.to_string())),
        Value::Number(n) => pairs.push((key, n.to_string())),
        Value::String(s) => pairs.push((key, s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_pairs(format!("{key}[{i}]"), item, pairs);
            }
        }
        Value::Object(map) => {
            for (sub, item) in map {
                push_pairs(format!("{key}[{sub}]"), item, pairs);
            }
        }
    }
}

/// Encode `params` as an `application/x-www-form-urlencoded` string.
pub fn encode(params: &Params) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(to_pairs(params))
        .finish()
}

/// Merge `params` into the query string of `route`.
///
/// Keys already present in the query are replaced in place, new keys are
/// appended. A `#fragment` stays at the end. The route is returned unchanged
/// when there is nothing to add.
pub fn append_query(route: &str, params: &Params) -> String {
    let added = to_pairs(params);
    if added.is_empty() {
        return route.to_string();
    }

    let (rest, fragment) = match route.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (route, None),
    };
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, query),
        None => (rest, ""),
    };

    let mut pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    for (key, value) in added {
        match pairs.iter().position(|(k, _)| *k == key) {
            Some(pos) => {
                pairs[pos].1 = value;
                let mut i = pos + 1;
                while i < pairs.len() {
                    if pairs[i].0 == key {
                        pairs.remove(i);
                    } else {
                        i += 1;
                    }
                }
            }
            None => pairs.push((key, value)),
        }
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    match fragment {
        Some(fragment) => format!("{path}?{query}#{fragment}"),
        None => format!("{path}?{query}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_empty_values() {
        let empty = [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ];
        for value in empty {
            assert!(is_empty_value(&value), "{value} should be empty");
        }

        let kept = [
            json!(true),
            json!(1),
            json!(-2.5),
            json!("x"),
            json!("00"),
            json!([0]),
            json!({"a": null}),
        ];
        for value in kept {
            assert!(!is_empty_value(&value), "{value} should not be empty");
        }
    }

    #[test]
    fn test_filter_empty_keeps_truthy_entries() {
        let filtered = filter_empty(&params(json!({"a": 1, "b": "", "c": "x", "d": null})));
        assert_eq!(filtered, params(json!({"a": 1, "c": "x"})));
    }

    #[test]
    fn test_encode_scalars() {
        let encoded = encode(&params(
            json!({"a": 1, "b": true, "c": false, "d": null, "e": "x y&z"}),
        ));
        assert_eq!(encoded, "a=1&b=1&c=0&e=x+y%26z");
    }

    #[test]
    fn test_encode_nested_values() {
        let encoded = encode(&params(json!({"filter": {"from": "me"}, "tags": ["a", "b"]})));
        assert_eq!(encoded, "filter%5Bfrom%5D=me&tags%5B0%5D=a&tags%5B1%5D=b");
    }

    #[test]
    fn test_append_query() {
        let p = params(json!({"count": 10}));
        assert_eq!(append_query("/messages", &p), "/messages?count=10");
        assert_eq!(
            append_query("/messages?offset=0", &p),
            "/messages?offset=0&count=10"
        );
        assert_eq!(append_query("/messages", &Params::new()), "/messages");
    }

    #[test]
    fn test_append_query_keeps_fragment_last() {
        let p = params(json!({"q": "x"}));
        assert_eq!(append_query("/a#frag", &p), "/a?q=x#frag");
        assert_eq!(append_query("/a?b=1#frag", &p), "/a?b=1&q=x#frag");
        assert_eq!(append_query("/a#frag", &Params::new()), "/a#frag");
    }

    #[test]
    fn test_append_query_replaces_existing_keys() {
        let p = params(json!({"count": 2}));
        assert_eq!(append_query("/m?count=1", &p), "/m?count=2");
        assert_eq!(
            append_query("/m?count=1&offset=5&count=3", &p),
            "/m?count=2&offset=5"
        );
    }
}
