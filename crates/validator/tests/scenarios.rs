//! End-to-end validation scenarios.

use arbiter_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn messages(validator: &Validator, data: &Value) -> Vec<(String, String)> {
    match validator.validate(data) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .into_iter()
            .map(|m| (m.target, m.message))
            .collect(),
    }
}

fn one(target: &str, message: &str) -> Vec<(String, String)> {
    vec![(target.to_string(), message.to_string())]
}

fn single(data_type: DataType) -> Validator {
    Validator::new(vec![ConstraintNode::new("a").typed(data_type)], Context::new()).unwrap()
}

// ============================================================================
// TYPE CHECKS
// ============================================================================

#[test]
fn absent_target_is_not_a_type_failure() {
    let validator = single(DataType::String);
    assert!(validator.validate(&json!({})).is_ok());
    assert!(validator.validate(&json!({"b": 1})).is_ok());
}

#[rstest]
#[case(DataType::String, json!("hello"))]
#[case(DataType::Number, json!(1))]
#[case(DataType::Number, json!(-2.5))]
#[case(DataType::Boolean, json!(false))]
#[case(DataType::Object, json!({"b": 1}))]
#[case(DataType::Object, json!(null))]
#[case(DataType::Array, json!([]))]
#[case(DataType::Any, json!([1, "x"]))]
fn matching_type_passes(#[case] data_type: DataType, #[case] value: Value) {
    assert!(single(data_type).validate(&json!({ "a": value })).is_ok());
}

#[rstest]
#[case(DataType::String, json!(1), "a is not of type string (got number)")]
#[case(DataType::String, json!({}), "a is not of type string (got object)")]
#[case(DataType::String, json!([]), "a is not of type string (got array)")]
#[case(DataType::Number, json!("1"), "a is not of type number (got string)")]
#[case(DataType::Number, json!({}), "a is not of type number (got object)")]
#[case(DataType::Number, json!([]), "a is not of type number (got array)")]
#[case(DataType::Object, json!("1"), "a is not of type object (got string)")]
#[case(DataType::Object, json!(1), "a is not of type object (got number)")]
#[case(DataType::Object, json!([]), "a is not of type object (got array)")]
#[case(DataType::Array, json!("1"), "a is not of type array (got string)")]
#[case(DataType::Array, json!(1), "a is not of type array (got number)")]
#[case(DataType::Array, json!({}), "a is not of type array (got object)")]
#[case(DataType::Boolean, json!(0), "a is not of type boolean (got number)")]
#[case(DataType::Function, json!("1"), "a is not of type function (got string)")]
#[case(DataType::Function, json!([]), "a is not of type function (got array)")]
fn mismatched_type_reports_once(
    #[case] data_type: DataType,
    #[case] value: Value,
    #[case] expected: &str,
) {
    let validator = single(data_type);
    assert_eq!(messages(&validator, &json!({ "a": value })), one("a", expected));
}

#[test]
fn type_failure_suppresses_required_and_rules() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a")
            .typed(DataType::String)
            .required("$prop is required!")
            .rule(Resolvable::new("lengthAtLeast").target().arg(3))],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"a": []})),
        one("a", "a is not of type string (got array)")
    );
}

#[test]
fn fields_imply_object_type() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").fields(vec![ConstraintNode::new("b").typed(DataType::String)])],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"a": "1"})),
        one("a", "a is not of type object (got string)")
    );
    assert!(validator.validate(&json!({"a": {"b": "1"}})).is_ok());
}

#[test]
fn element_schema_implies_array_type() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").element(ConstraintNode::element_schema().typed(DataType::Number))],
        Context::new(),
    )
    .unwrap();

    assert!(validator.validate(&json!({"a": [1, 2]})).is_ok());
    assert_eq!(
        messages(&validator, &json!({"a": "12"})),
        one("a", "a is not of type object (got string)")
    );
    assert_eq!(
        messages(&validator, &json!({"a": [1, "2"]})),
        one("a.1", "a.1 is not of type number (got string)")
    );
}

// ============================================================================
// REQUIRED
// ============================================================================

#[test]
fn required_true_uses_default_message() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").typed(DataType::String).required(true)],
        Context::new(),
    )
    .unwrap();
    assert_eq!(messages(&validator, &json!({})), one("a", "a is required"));
}

#[rstest]
#[case(json!({}))]
#[case(json!({"a": null}))]
#[case(json!({"a": ""}))]
fn required_fires_for_blank_values(#[case] data: Value) {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").typed(DataType::Any).required(true)],
        Context::new(),
    )
    .unwrap();
    assert_eq!(messages(&validator, &data), one("a", "a is required"));
}

#[test]
fn required_false_is_not_required() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").typed(DataType::String).required(false)],
        Context::new(),
    )
    .unwrap();
    assert!(validator.validate(&json!({})).is_ok());
}

#[test]
fn required_message_template_uses_full_path() {
    let validator = Validator::new(
        vec![ConstraintNode::new("user").fields(vec![
            ConstraintNode::new("email")
                .typed(DataType::String)
                .required("Please provide $prop"),
        ])],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"user": {}})),
        one("user.email", "Please provide user.email")
    );
}

#[test]
fn dynamic_required_on_sibling_path() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").fields(vec![
            ConstraintNode::new("b").typed(DataType::Number),
            ConstraintNode::new("c").typed(DataType::Number).required(
                Resolvable::new("isEmpty")
                    .path("a.b")
                    .with_message("$prop is required because b is blank"),
            ),
        ])],
        Context::new().with_function("isEmpty", |args: &Arguments<'_>| args.is_missing(0)),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"a": {}})),
        one("a.c", "a.c is required because b is blank")
    );
    assert!(validator.validate(&json!({"a": {"b": 1}})).is_ok());
}

#[test]
fn dynamic_required_without_message_uses_default() {
    let validator = Validator::new(
        vec![
            ConstraintNode::new("mode").typed(DataType::String),
            ConstraintNode::new("token")
                .typed(DataType::String)
                .required(Resolvable::new("equals").path("mode").arg("secure")),
        ],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"mode": "secure"})),
        one("token", "token is required")
    );
    assert!(validator.validate(&json!({"mode": "open"})).is_ok());
}

#[test]
fn falsy_dynamic_required_continues_to_children() {
    let validator = Validator::new(
        vec![
            ConstraintNode::new("a")
                .required(Resolvable::new("isNotEmpty").path("enabled"))
                .fields(vec![ConstraintNode::new("b").typed(DataType::Number).required(true)]),
        ],
        Context::new(),
    )
    .unwrap();

    assert_eq!(messages(&validator, &json!({})), one("a.b", "a.b is required"));
}

// ============================================================================
// RULES
// ============================================================================

#[test]
fn array_broadcast_checks_every_element() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").typed(DataType::Array).element(
            ConstraintNode::element_schema().typed(DataType::String).rule(
                Resolvable::new("lengthAtLeast")
                    .target()
                    .arg(3)
                    .with_message("$prop must be at least 3 chars"),
            ),
        )],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"a": ["on", "two"]})),
        one("a.0", "a.0 must be at least 3 chars")
    );
}

#[test]
fn first_failing_rule_wins() {
    let validator = Validator::new(
        vec![ConstraintNode::new("code")
            .typed(DataType::String)
            .rule(Resolvable::new("lengthAtMost").target().arg(4))
            .rule(Resolvable::new("matches").target().arg("^[0-9]+$"))],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"code": "abcdef"})),
        one("code", "code is invalid (lengthAtMost)")
    );
    assert_eq!(
        messages(&validator, &json!({"code": "ab"})),
        one("code", "code is invalid (matches)")
    );
    assert!(validator.validate(&json!({"code": "12"})).is_ok());
}

#[test]
fn cross_field_rule_reads_absolute_path() {
    let validator = Validator::new(
        vec![
            ConstraintNode::new("password").typed(DataType::String),
            ConstraintNode::new("confirm").typed(DataType::String).rule(
                Resolvable::new("equals")
                    .target()
                    .path("password")
                    .with_message("$prop must match password"),
            ),
        ],
        Context::new(),
    )
    .unwrap();

    assert!(validator.validate(&json!({"password": "s3cret", "confirm": "s3cret"})).is_ok());
    assert_eq!(
        messages(&validator, &json!({"password": "s3cret", "confirm": "secret"})),
        one("confirm", "confirm must match password")
    );
}

// ============================================================================
// ORDER AND INDEPENDENCE
// ============================================================================

#[test]
fn failures_follow_declaration_order() {
    let validator = Validator::new(
        vec![
            ConstraintNode::new("z").typed(DataType::Number).required(true),
            ConstraintNode::new("contacts").typed(DataType::Array).element(
                ConstraintNode::element_schema().fields(vec![
                    ConstraintNode::new("contact_type")
                        .typed(DataType::String)
                        .required(true),
                    ConstraintNode::new("value").typed(DataType::String),
                ]),
            ),
            ConstraintNode::new("a").typed(DataType::Boolean),
        ],
        Context::new(),
    )
    .unwrap();

    let data = json!({
        "contacts": [
            {"value": 1},
            {"contact_type": "email", "value": "a@b.c"},
            "oops"
        ],
        "a": "yes"
    });

    assert_eq!(
        messages(&validator, &data),
        vec![
            ("z".to_string(), "z is required".to_string()),
            (
                "contacts.0.contact_type".to_string(),
                "contacts.0.contact_type is required".to_string()
            ),
            (
                "contacts.0.value".to_string(),
                "contacts.0.value is not of type string (got number)".to_string()
            ),
            (
                "contacts.2".to_string(),
                "contacts.2 is not of type object (got string)".to_string()
            ),
            (
                "a".to_string(),
                "a is not of type boolean (got string)".to_string()
            ),
        ]
    );
}

#[test]
fn nested_arrays_address_each_level() {
    let validator = Validator::new(
        vec![ConstraintNode::new("grid").element(
            ConstraintNode::element_schema()
                .element(ConstraintNode::element_schema().typed(DataType::Number)),
        )],
        Context::new(),
    )
    .unwrap();

    assert_eq!(
        messages(&validator, &json!({"grid": [[1, 2], [3, "x"]]})),
        one("grid.1.1", "grid.1.1 is not of type number (got string)")
    );
}

#[test]
fn validate_is_repeatable() {
    let validator = Validator::new(
        vec![ConstraintNode::new("a").typed(DataType::String).required(true)],
        Context::new(),
    )
    .unwrap();
    let data = json!({"a": 3});

    assert_eq!(validator.validate(&data), validator.validate(&data));
}

#[test]
fn shared_validator_across_threads() {
    let validator = std::sync::Arc::new(
        Validator::new(
            vec![ConstraintNode::new("n").typed(DataType::Number).required(true)],
            Context::new(),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = std::sync::Arc::clone(&validator);
            std::thread::spawn(move || validator.is_valid(&json!({ "n": i })))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
