/// Builds a [`Value`](crate::Value) from JSON-like syntax.
///
/// ```rust
/// use toon_codec::toon;
///
/// let data = toon!({
///     "name": "Alice",
///     "age": 30,
///     "tags": ["rust", "llm"]
/// });
/// assert!(data.is_object());
/// ```
#[macro_export]
macro_rules! toon {
    (null) => {
        $crate::Value::Null
    };

    (undefined) => {
        $crate::Value::Undefined
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Array(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Array(vec![$($crate::toon!($elem)),*])
    };

    ({}) => {
        $crate::Value::Object($crate::ToonMap::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut object = $crate::ToonMap::new();
        $(
            object.insert($key.to_string(), $crate::toon!($value));
        )*
        $crate::Value::Object(object)
    }};

    // fallback: anything with a From<_> for Value conversion
    ($other:expr) => {
        $crate::Value::from($other)
    };
}

#[cfg(test)]
mod tests {
    use crate::{Number, ToonMap, Value};

    #[test]
    fn primitives() {
        assert_eq!(toon!(null), Value::Null);
        assert_eq!(toon!(undefined), Value::Undefined);
        assert_eq!(toon!(true), Value::Bool(true));
        assert_eq!(toon!(false), Value::Bool(false));
        assert_eq!(toon!(42), Value::Number(Number::Integer(42)));
        assert_eq!(toon!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(toon!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn arrays() {
        assert_eq!(toon!([]), Value::Array(vec![]));

        let arr = toon!([1, 2, 3]);
        match arr {
            Value::Array(vec) => {
                assert_eq!(vec.len(), 3);
                assert_eq!(vec[0], Value::Number(Number::Integer(1)));
                assert_eq!(vec[2], Value::Number(Number::Integer(3)));
            }
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn objects() {
        assert_eq!(toon!({}), Value::Object(ToonMap::new()));

        let obj = toon!({
            "name": "Alice",
            "age": 30
        });

        match obj {
            Value::Object(map) => {
                assert_eq!(map.len(), 2);
                assert_eq!(map.get("name"), Some(&Value::String("Alice".to_string())));
                assert_eq!(map.get("age"), Some(&Value::Number(Number::Integer(30))));
            }
            _ => panic!("Expected object"),
        }
    }

    #[test]
    fn nesting() {
        let value = toon!({
            "items": [{"id": 1}, {"id": 2}],
            "empty": {},
            "none": null
        });
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert!(obj.get("items").unwrap().is_array());
        assert_eq!(obj.get("none"), Some(&Value::Null));
    }
}
