// SPDX-License-Identifier: MIT

//! Deep merge: per-processor overrides global at every leaf, nested
//! mappings merge recursively, lists replace wholesale.

use serde_json::Value;

pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged = base_map.clone();
            for (key, overlay_value) in overlay_map {
                match merged.get(key) {
                    Some(base_value) => {
                        merged.insert(key.clone(), deep_merge(base_value, overlay_value));
                    }
                    None => {
                        merged.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        // Lists replace; any non-object overlay replaces the base leaf outright.
        (_, overlay) => overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn overlay_leaf_wins_over_base() {
        let base = json!({"a": 1, "b": 2});
        let overlay = json!({"b": 3});
        assert_eq!(deep_merge(&base, &overlay), json!({"a": 1, "b": 3}));
    }

    #[test]
    fn nested_mappings_merge_recursively() {
        let base = json!({"rabbitmq": {"host": "localhost", "port": 5672}});
        let overlay = json!({"rabbitmq": {"port": 5673}});
        assert_eq!(deep_merge(&base, &overlay), json!({"rabbitmq": {"host": "localhost", "port": 5673}}));
    }

    #[test]
    fn lists_replace_instead_of_concatenating() {
        let base = json!({"tags": ["a", "b"]});
        let overlay = json!({"tags": ["c"]});
        assert_eq!(deep_merge(&base, &overlay), json!({"tags": ["c"]}));
    }

    #[test]
    fn keys_absent_from_overlay_keep_base_value() {
        let base = json!({"a": {"x": 1, "y": 2}});
        let overlay = json!({"a": {"x": 9}});
        let merged = deep_merge(&base, &overlay);
        assert_eq!(merged["a"]["y"], 2);
    }

    proptest! {
        // deep_merge(a, deep_merge(a, b)) == deep_merge(a, b)
        #[test]
        fn merge_is_idempotent(
            a_x in 0i64..100, a_y in 0i64..100,
            b_x in proptest::option::of(0i64..100),
        ) {
            let a = json!({"x": a_x, "y": a_y});
            let b = match b_x {
                Some(v) => json!({"x": v}),
                None => json!({}),
            };
            let once = deep_merge(&a, &b);
            let twice = deep_merge(&a, &once);
            prop_assert_eq!(once, twice);
        }
    }
}
