//! Object key transformations.

use crate::core::config::Config;
use crate::core::dataset::Dataset;
use crate::core::types::Value;
use crate::core::unit::{Unit, UnitMetadata};
use log::trace;

/// Convert a camel-case identifier to snake case.
///
/// The first character is kept as is. Every later character that is an
/// uppercase letter becomes `_` followed by its lowercase form.
///
/// ```
/// use pramana::catalog::snake_case;
///
/// assert_eq!(snake_case("helloWorld"), "hello_world");
/// assert_eq!(snake_case("FooBar"), "Foo_bar");
/// ```
pub fn snake_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, ch) in input.chars().enumerate() {
        let upper: String = ch.to_uppercase().collect();
        let lower: String = ch.to_lowercase().collect();
        let is_upper = upper.chars().eq(std::iter::once(ch)) && !lower.chars().eq(std::iter::once(ch));
        if i > 0 && is_upper {
            out.push('_');
            out.push_str(&lower);
        } else {
            out.push(ch);
        }
    }
    out
}

/// Transformation renaming object keys to snake case.
///
/// When the renamed key already exists, the existing entry wins and the
/// source key is dropped. A renamed key keeps the position of its source.
#[derive(Debug, Clone)]
pub struct ToSnakeCase {
    meta: UnitMetadata,
    selected: Option<Vec<String>>,
}

impl ToSnakeCase {
    /// Keys restricted to, if any.
    pub fn selected_keys(&self) -> Option<&[String]> {
        self.selected.as_deref()
    }
}

impl Unit for ToSnakeCase {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        let Value::Object(map) = &mut dataset.value else {
            return dataset;
        };
        let keys: Vec<String> = match &self.selected {
            Some(keys) => keys.clone(),
            None => map.keys().cloned().collect(),
        };

        for key in keys {
            let renamed = snake_case(&key);
            if renamed == key {
                continue;
            }
            let Some((index, _, value)) = map.shift_remove_full(&key) else {
                continue;
            };
            if map.contains_key(&renamed) {
                trace!("to_snake_case dropped '{}', '{}' already present", key, renamed);
                continue;
            }
            map.shift_insert(index, renamed, value);
        }
        dataset
    }
}

/// Rename all keys, or only `selected_keys`, to snake case.
pub fn to_snake_case(selected_keys: Option<Vec<String>>) -> ToSnakeCase {
    ToSnakeCase {
        meta: UnitMetadata::transformation("to_snake_case"),
        selected: selected_keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::object;

    fn apply(unit: &ToSnakeCase, value: Value) -> Value {
        unit.run(Dataset::typed(value), &Config::new()).value
    }

    fn keys(value: &Value) -> Vec<&str> {
        value.as_object().unwrap().keys().map(String::as_str).collect()
    }

    fn selected(keys: &[&str]) -> Option<Vec<String>> {
        Some(keys.iter().map(|k| k.to_string()).collect())
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("fooBar"), "foo_bar");
        assert_eq!(snake_case("Foo"), "Foo");
        assert_eq!(snake_case("bar_foo"), "bar_foo");
        assert_eq!(snake_case("bar_Foo"), "bar__foo");
        assert_eq!(snake_case("321"), "321");
        assert_eq!(snake_case("ÄpfelÖl"), "Äpfel_öl");
        assert_eq!(snake_case(""), "");
    }

    #[test]
    fn test_renames_single_key() {
        let output = apply(&to_snake_case(None), object([("fooBar", Value::from(1))]));
        assert_eq!(output, object([("foo_bar", Value::from(1))]));
    }

    #[test]
    fn test_unselected_keys_are_untouched() {
        let input = object([("fooBar", Value::from(1))]);
        let output = apply(&to_snake_case(selected(&["helloWorld"])), input.clone());
        assert_eq!(output, input);
    }

    #[test]
    fn test_renames_all_keys_in_place() {
        let input = object([
            ("321", Value::from("321")),
            ("foo", Value::from("foo")),
            ("Foo", Value::from("Foo")),
            ("fooBar", Value::from("fooBar")),
            ("FooBar", Value::from("FooBar")),
            ("helloWorld", Value::from("helloWorld")),
            ("bar_foo", Value::from("bar_foo")),
        ]);
        let output = apply(&to_snake_case(None), input);
        assert_eq!(
            output,
            object([
                ("321", Value::from("321")),
                ("foo", Value::from("foo")),
                ("Foo", Value::from("Foo")),
                ("foo_bar", Value::from("fooBar")),
                ("Foo_bar", Value::from("FooBar")),
                ("hello_world", Value::from("helloWorld")),
                ("bar_foo", Value::from("bar_foo")),
            ])
        );
        assert_eq!(
            keys(&output),
            vec!["321", "foo", "Foo", "foo_bar", "Foo_bar", "hello_world", "bar_foo"]
        );
    }

    #[test]
    fn test_existing_key_wins() {
        let input = object([
            ("321", Value::from("321")),
            ("fooBar", Value::from("fooBar")),
            ("foo_bar", Value::from("foo_bar")),
            ("helloWorld", Value::from("helloWorld")),
            ("barFoo", Value::from("barFoo")),
        ]);
        let output = apply(&to_snake_case(None), input);
        assert_eq!(
            output,
            object([
                ("321", Value::from("321")),
                ("foo_bar", Value::from("foo_bar")),
                ("hello_world", Value::from("helloWorld")),
                ("bar_foo", Value::from("barFoo")),
            ])
        );
    }

    #[test]
    fn test_selected_keys() {
        let input = object([
            ("321", Value::from("321")),
            ("foo", Value::from("foo")),
            ("fooBar", Value::from("fooBar")),
            ("helloWorld", Value::from("helloWorld")),
            ("hello_world", Value::from("hello_world")),
        ]);
        let output = apply(&to_snake_case(selected(&["fooBar", "helloWorld", "missingKey"])), input);
        assert_eq!(
            output,
            object([
                ("321", Value::from("321")),
                ("foo", Value::from("foo")),
                ("foo_bar", Value::from("fooBar")),
                ("hello_world", Value::from("hello_world")),
            ])
        );
    }

    #[test]
    fn test_non_objects_pass_through() {
        assert_eq!(apply(&to_snake_case(None), Value::from("fooBar")), Value::from("fooBar"));
    }
}
