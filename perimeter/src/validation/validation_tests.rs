//! End-to-end validation scenarios against a registry.

#[cfg(test)]
mod tests {
    use crate::config::{ListItemPolicy, ValidationConfig};
    use crate::contracts::{Contract, ContractRegistry, FieldSpec, FieldType};
    use crate::errors::Violation;
    use crate::validation::validate;
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| (*s).to_string()).collect()
    }

    fn registry_with(contracts: Vec<Contract>) -> ContractRegistry {
        registry_with_config(contracts, ValidationConfig::default())
    }

    fn registry_with_config(
        contracts: Vec<Contract>,
        config: ValidationConfig,
    ) -> ContractRegistry {
        let registry = ContractRegistry::with_config(config);
        registry.register_all(contracts).unwrap();
        registry
    }

    fn signup() -> Contract {
        Contract::builder("signup")
            .field(FieldSpec::required("email", FieldType::String).format("@"))
            .field(FieldSpec::required("password", FieldType::String).min_length(12))
            .build()
            .unwrap()
    }

    fn member() -> Contract {
        Contract::builder("member")
            .field(
                FieldSpec::optional("profile", FieldType::Map)
                    .fields([FieldSpec::optional("age", FieldType::Integer).min(18)]),
            )
            .build()
            .unwrap()
    }

    fn tagged() -> Contract {
        Contract::builder("tagged")
            .field(FieldSpec::required("tags", FieldType::list_of(FieldType::String)))
            .build()
            .unwrap()
    }

    fn deep() -> Contract {
        Contract::builder("deep")
            .field(FieldSpec::required("name", FieldType::String))
            .field(FieldSpec::required("a", FieldType::Map).fields([
                FieldSpec::required("x", FieldType::Integer),
                FieldSpec::required("b", FieldType::Map).fields([
                    FieldSpec::required("y", FieldType::Boolean),
                    FieldSpec::required("c", FieldType::Map)
                        .fields([FieldSpec::required("z", FieldType::Symbol)]),
                ]),
            ]))
            .field(FieldSpec::optional("role", FieldType::Symbol).one_of([
                Value::symbol("admin"),
                Value::symbol("user"),
            ]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_valid_signup_returns_value_unchanged() {
        let registry = registry_with(vec![signup()]);
        let input = Value::from(json!({
            "email": "user@example.com",
            "password": "supersecret123",
        }));

        assert_eq!(validate(&registry, "signup", input.clone()), Ok(input));
    }

    #[test]
    fn test_invalid_signup_reports_both_fields_in_order() {
        let registry = registry_with(vec![signup()]);
        let input = Value::from(json!({"email": "invalid", "password": "short"}));

        assert_eq!(
            validate(&registry, "signup", input),
            Err(vec![
                Violation::new("email", "does not match format"),
                Violation::new("password", "must be at least 12 characters (minimum length)"),
            ])
        );
    }

    #[test]
    fn test_nested_violation_carries_path() {
        let registry = registry_with(vec![member()]);
        let input = Value::from(json!({"profile": {"age": 17}}));

        assert_eq!(
            validate(&registry, "member", input),
            Err(vec![Violation::at(
                &path(&["profile"]),
                "age",
                "must be >= 18 (minimum value)"
            )])
        );
    }

    #[test]
    fn test_optional_nested_map_may_be_absent() {
        let registry = registry_with(vec![member()]);
        assert!(validate(&registry, "member", Value::from(json!({}))).is_ok());
        assert!(validate(&registry, "member", Value::from(json!({"profile": {}}))).is_ok());
    }

    #[test]
    fn test_nested_map_type_mismatch() {
        let registry = registry_with(vec![member()]);
        let input = Value::from(json!({"profile": "adult"}));

        assert_eq!(
            validate(&registry, "member", input),
            Err(vec![Violation::new("profile", "expected map, got string")])
        );
    }

    #[test]
    fn test_list_of_reports_once_per_field() {
        let registry = registry_with(vec![tagged()]);
        let input = Value::from(json!({"tags": ["a", 123, "c", false]}));

        assert_eq!(
            validate(&registry, "tagged", input),
            Err(vec![Violation::new("tags", "invalid list item")])
        );
    }

    #[test]
    fn test_list_of_per_index_policy() {
        let registry = registry_with_config(
            vec![tagged()],
            ValidationConfig::new().with_list_items(ListItemPolicy::PerIndex),
        );
        let input = Value::from(json!({"tags": ["a", 123, "c", false]}));

        assert_eq!(
            validate(&registry, "tagged", input),
            Err(vec![
                Violation::at(&path(&["tags"]), "1", "expected string, got integer"),
                Violation::at(&path(&["tags"]), "3", "expected string, got boolean"),
            ])
        );
    }

    #[test]
    fn test_list_of_map_items_are_shallow() {
        let contract = Contract::builder("batch")
            .field(FieldSpec::required("rows", FieldType::list_of(FieldType::Map)))
            .build()
            .unwrap();
        let registry = registry_with(vec![contract]);

        let ok = Value::from(json!({"rows": [{"anything": 1}, {}]}));
        assert!(validate(&registry, "batch", ok).is_ok());

        let bad = Value::from(json!({"rows": [{}, [1]]}));
        assert_eq!(
            validate(&registry, "batch", bad),
            Err(vec![Violation::new("rows", "invalid list item")])
        );
    }

    #[test]
    fn test_untyped_list_accepts_mixed_items() {
        let contract = Contract::builder("bag")
            .field(FieldSpec::required("items", FieldType::List).max_length(3))
            .build()
            .unwrap();
        let registry = registry_with(vec![contract]);

        assert!(validate(&registry, "bag", Value::from(json!({"items": [1, "a", null]}))).is_ok());
        assert_eq!(
            validate(&registry, "bag", Value::from(json!({"items": [1, 2, 3, 4]}))),
            Err(vec![Violation::new(
                "items",
                "must be at most 3 characters (maximum length)"
            )])
        );
        assert_eq!(
            validate(&registry, "bag", Value::from(json!({"items": "abc"}))),
            Err(vec![Violation::new("items", "expected list, got string")])
        );
    }

    #[test]
    fn test_missing_contract() {
        let registry = ContractRegistry::new();

        assert_eq!(
            validate(&registry, "missing_contract", Value::empty_map()),
            Err(vec![Violation::new(
                "_contract",
                "contract missing_contract not found"
            )])
        );
    }

    #[test]
    fn test_non_record_root() {
        let registry = registry_with(vec![signup()]);
        let result = validate(&registry, "signup", Value::from("not a record"));

        let violations = result.unwrap_err();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].field, "_root");
        assert_eq!(violations[0].error, r#"expected map, got "not a record""#);
        assert!(violations[0].path.is_empty());
    }

    #[test]
    fn test_required_missing_is_not_type_checked() {
        let registry = registry_with(vec![signup()]);

        assert_eq!(
            validate(&registry, "signup", Value::from(json!({"password": 42}))),
            Err(vec![
                Violation::new("email", "is required"),
                Violation::new("password", "expected string, got integer"),
            ])
        );
    }

    #[test]
    fn test_symbol_is_not_string() {
        let registry = registry_with(vec![signup()]);
        let input: Value = [
            ("email", Value::symbol("user@example.com")),
            ("password", Value::from("supersecret123")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            validate(&registry, "signup", input),
            Err(vec![Violation::new("email", "expected string, got symbol")])
        );
    }

    #[test]
    fn test_revalidating_ok_value_is_idempotent() {
        let registry = registry_with(vec![deep()]);
        let input = valid_deep();

        let once = validate(&registry, "deep", input.clone()).unwrap();
        let twice = validate(&registry, "deep", once.clone()).unwrap();

        assert_eq!(once, input);
        assert_eq!(twice, once);
    }

    #[test]
    fn test_every_field_failing_is_reported() {
        let registry = registry_with(vec![deep()]);
        let input: Value = [
            ("name", Value::from(1)),
            ("a", Value::from(vec![1])),
            ("role", Value::symbol("root")),
        ]
        .into_iter()
        .collect();

        let violations = validate(&registry, "deep", input).unwrap_err();
        assert_eq!(violations.len(), 3);
        assert_eq!(
            violations.iter().map(|v| v.field.as_str()).collect::<Vec<_>>(),
            vec!["name", "a", "role"]
        );
        assert_eq!(violations[2].error, "must be one of [:admin, :user]");
    }

    #[test]
    fn test_path_length_matches_depth_and_order_is_depth_first() {
        let registry = registry_with(vec![deep()]);
        let input: Value = [
            (
                "a",
                [(
                    "b",
                    [("c", Value::empty_map()), ("y", Value::from("yes"))]
                        .into_iter()
                        .collect::<Value>(),
                )]
                .into_iter()
                .collect::<Value>(),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            validate(&registry, "deep", input),
            Err(vec![
                Violation::new("name", "is required"),
                Violation::at(&path(&["a"]), "x", "is required"),
                Violation::at(&path(&["a", "b"]), "y", "expected boolean, got string"),
                Violation::at(&path(&["a", "b", "c"]), "z", "is required"),
            ])
        );
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let registry = registry_with(vec![member()]);
        let input = Value::from(json!({
            "profile": {"age": 30, "nickname": "ace"},
            "extra": [1, 2, 3],
        }));

        let validated = validate(&registry, "member", input.clone()).unwrap();
        assert_eq!(validated, input);
        assert_eq!(
            validated.get("profile").and_then(|p| p.get("nickname")),
            Some(&Value::from("ace"))
        );

        let bad = Value::from(json!({"profile": {"age": 1, "nickname": 5}, "extra": null}));
        let violations = validate(&registry, "member", bad).unwrap_err();
        assert!(violations
            .iter()
            .all(|v| v.field != "nickname" && v.field != "extra"));
    }

    #[test]
    fn test_float_field_rejects_integer() {
        let contract = Contract::builder("price")
            .field(FieldSpec::required("amount", FieldType::Float).min(0.0).max(100))
            .build()
            .unwrap();
        let registry = registry_with(vec![contract]);

        assert!(validate(&registry, "price", Value::from(json!({"amount": 9.99}))).is_ok());
        assert_eq!(
            validate(&registry, "price", Value::from(json!({"amount": 10}))),
            Err(vec![Violation::new("amount", "expected float, got integer")])
        );
        assert_eq!(
            validate(&registry, "price", Value::from(json!({"amount": 100.5}))),
            Err(vec![Violation::new("amount", "must be <= 100 (maximum value)")])
        );
    }

    #[test]
    fn test_nan_fails_numeric_bounds() {
        let ratio = Contract::builder("ratio")
            .field(FieldSpec::required("x", FieldType::Float).min(0.0).max(1.0))
            .build()
            .unwrap();
        let registry = registry_with(vec![ratio]);

        let value: Value = [("x", Value::Float(f64::NAN))].into_iter().collect();
        assert_eq!(
            validate(&registry, "ratio", value),
            Err(vec![
                Violation::new("x", "must be >= 0.0 (minimum value)"),
                Violation::new("x", "must be <= 1.0 (maximum value)"),
            ])
        );
    }

    #[test]
    fn test_concurrent_validation_shares_registry() {
        let registry = std::sync::Arc::new(registry_with(vec![signup()]));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || {
                    let email = if i % 2 == 0 { "a@b.c" } else { "nope" };
                    let input = Value::from(json!({
                        "email": email,
                        "password": "supersecret123",
                    }));
                    validate(&registry, "signup", input).is_ok()
                })
            })
            .collect();

        let results: Vec<bool> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(results.iter().filter(|ok| **ok).count(), 4);
    }

    fn valid_deep() -> Value {
        let c: Value = [("z", Value::symbol("leaf"))].into_iter().collect();
        let b: Value = [("y", Value::from(true)), ("c", c)].into_iter().collect();
        let a: Value = [("x", Value::from(1)), ("b", b)].into_iter().collect();
        [
            ("name", Value::from("root")),
            ("a", a),
            ("role", Value::symbol("admin")),
            ("note", Value::Null),
        ]
        .into_iter()
        .collect()
    }
}
