use std::sync::{Arc, Mutex};

use formal::validators::{is_required, is_valid_email};
use formal::{
    ChangeKind, FieldInit, FieldStore, FormError, Rule, Validation, ValidationResult,
    ValuesOptions,
};

fn test_form() -> FieldStore {
    FieldStore::builder()
        .field("date", "", [])
        .field("email", "", [is_required(), is_valid_email()])
        .field("name", "", [is_required()])
        .build()
}

fn failing(msg: &'static str) -> Rule {
    Rule::new(move |_| ValidationResult::fail(msg))
}

#[test]
fn test_fields_untouched_at_init() {
    let form = test_form();
    for key in form.keys() {
        let field = form.field(key).unwrap();
        assert!(!field.is_touched());
        assert_eq!(field.validation(), &Validation::Unvalidated);
        assert_eq!(form.errors_of(key).unwrap(), "");
    }
}

#[test]
fn test_keys_keep_construction_order() {
    let form = test_form();
    assert_eq!(form.keys().collect::<Vec<_>>(), vec!["date", "email", "name"]);
    assert_eq!(form.len(), 3);
    assert!(form.contains_key("email"));
    assert!(!form.contains_key("phone"));
}

#[test]
fn test_new_from_pairs() {
    let form = FieldStore::new([
        ("name", FieldInit::new("Matt").rule(is_required())),
        ("notes", FieldInit::new("")),
    ]);
    assert_eq!(form.field_value("name").unwrap(), "Matt");
    assert_eq!(form.field("name").unwrap().rules().len(), 1);
    assert!(form.field("notes").unwrap().rules().is_empty());
}

#[test]
fn test_duplicate_key_replaces_in_place() {
    let form = FieldStore::builder()
        .field("a", "first", [])
        .field("b", "", [])
        .field("a", "second", [is_required()])
        .build();
    assert_eq!(form.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(form.field_value("a").unwrap(), "second");
    assert!(form.field("a").unwrap().has_rules());
}

#[test]
fn test_field_value() {
    let mut form = test_form();
    form.handle_change("email")("wow").unwrap();
    assert_eq!(form.field_value("email").unwrap(), "wow");
}

#[test]
fn test_missing_key_errors() {
    let mut form = test_form();
    let missing = FormError::not_found("phone");

    assert_eq!(form.field_value("phone"), Err(missing.clone()));
    assert_eq!(form.errors_of("phone"), Err(missing.clone()));
    assert_eq!(form.get_field_validation_result("phone"), Err(missing.clone()));
    assert_eq!(form.validate_field("phone"), Err(missing.clone()));
    assert_eq!(form.handle_change("phone")("x"), Err(missing.clone()));
    assert_eq!(missing.key(), "phone");
    assert!(missing.to_string().contains("phone"));
}

#[test]
fn test_missing_key_is_invalid_not_error() {
    let form = test_form();
    assert!(!form.field_is_valid("phone"));
}

#[test]
fn test_clear_missing_key_is_noop() {
    let mut form = test_form();
    form.clear_field("phone");
    assert_eq!(form.revision(), 0);
    assert!(!form.is_dirty());
}

#[test]
fn test_unguarded_field_always_valid() {
    let mut form = test_form();
    assert!(form.field_is_valid("date"));

    for value in ["", "2024-01-01", "   ", "anything at all"] {
        form.handle_change("date")(value).unwrap();
        assert!(form.field_is_valid("date"));
        assert_eq!(form.field("date").unwrap().validation(), &Validation::Unvalidated);
    }

    form.validate_all_fields();
    assert!(form.field_is_valid("date"));
}

#[test]
fn test_guarded_untouched_field_invalid() {
    let mut form = FieldStore::builder()
        .field("name", "Already filled", [is_required()])
        .build();
    assert!(!form.field_is_valid("name"));

    form.handle_change("name")("Matt").unwrap();
    assert!(form.field_is_valid("name"));

    form.clear_field("name");
    assert!(!form.field_is_valid("name"));
}

#[test]
fn test_clear_field() {
    let mut form = test_form();
    form.handle_change("email")("wow").unwrap();
    assert_eq!(form.field_value("email").unwrap(), "wow");

    form.clear_field("email");

    let field = form.field("email").unwrap();
    assert_eq!(field.value(), "");
    assert!(!field.is_touched());
    assert!(!field.validation().is_validated());
    assert_eq!(field.rules().len(), 2);
    assert_eq!(form.errors_of("email").unwrap(), "");
}

#[test]
fn test_clear_is_idempotent() {
    let mut form = test_form();
    form.handle_change("email")("wow").unwrap();

    form.clear_field("email");
    let once = form.field("email").unwrap().clone();
    form.clear_field("email");
    let twice = form.field("email").unwrap();

    assert_eq!(once.value(), twice.value());
    assert_eq!(once.is_touched(), twice.is_touched());
    assert_eq!(once.validation(), twice.validation());
}

#[test]
fn test_clear_all_fields() {
    let mut form = test_form();
    form.handle_change("date")("today").unwrap();
    form.handle_change("name")("Matt").unwrap();
    form.validate_all_fields();

    form.clear_all_fields();

    for key in ["date", "email", "name"] {
        let field = form.field(key).unwrap();
        assert_eq!(field.value(), "");
        assert!(!field.is_touched());
        assert!(!field.validation().is_validated());
    }
}

#[test]
fn test_errors_of_change_then_revalidate() {
    let mut form = test_form();

    form.handle_change("email")("wow").unwrap();
    assert_eq!(form.field_value("email").unwrap(), "wow");
    assert!(!form.errors_of("email").unwrap().is_empty());
    assert!(!form.field_is_valid("email"));

    form.handle_change("email")("wow@wow.com").unwrap();
    assert_eq!(form.field_value("email").unwrap(), "wow@wow.com");
    assert_eq!(form.errors_of("email").unwrap(), "");
    assert!(form.field_is_valid("email"));
}

#[test]
fn test_handle_change_invalid_matches_live_result() {
    let mut form = test_form();
    form.handle_change("email")("wow@").unwrap();

    let live = form.get_field_validation_result("email").unwrap();
    assert_eq!(form.field_value("email").unwrap(), "wow@");
    assert!(!live.message.is_empty());
    assert_eq!(form.errors_of("email").unwrap(), live.message);
    assert!(!form.field_is_valid("email"));
}

#[test]
fn test_get_field_validation_result_does_not_cache() {
    let mut form = test_form();
    form.set_value("email", "wow@wow.com").unwrap();
    form.clear_field("email");

    assert_eq!(
        form.get_field_validation_result("email").unwrap(),
        ValidationResult::fail("Field is required. Must be a valid email address.")
    );
    assert!(!form.field("email").unwrap().validation().is_validated());
}

#[test]
fn test_get_field_validation_result_unguarded() {
    let form = test_form();
    assert_eq!(
        form.get_field_validation_result("date").unwrap(),
        ValidationResult::pass()
    );
}

#[test]
fn test_message_composition_order() {
    let form = FieldStore::builder()
        .field("code", "", [failing("a"), failing("b")])
        .build();
    let result = form.get_field_validation_result("code").unwrap();
    assert!(!result.valid);
    assert_eq!(result.message, "a b");
}

#[test]
fn test_passing_rules_contribute_no_text() {
    let pass = Rule::new(|_| ValidationResult::pass());
    let form = FieldStore::builder()
        .field("code", "", [pass.clone(), failing("a"), pass, failing("b")])
        .build();
    assert_eq!(form.get_field_validation_result("code").unwrap().message, "a b");
}

#[test]
fn test_validate_field_skips_untouched() {
    let mut form = test_form();
    form.validate_field("name").unwrap();

    assert!(!form.field("name").unwrap().validation().is_validated());
    assert_eq!(form.errors_of("name").unwrap(), "");
    assert_eq!(form.revision(), 0);
}

#[test]
fn test_errors_of_prefers_cached_result() {
    let mut form = FieldStore::builder()
        .field("name", "", [is_required()])
        .build();
    form.handle_change("name")("Matt").unwrap();
    assert_eq!(form.errors_of("name").unwrap(), "");

    // Touched with no cached result: evaluated live.
    let mut unguarded = FieldStore::builder().field("note", "", []).build();
    unguarded.handle_change("note")("x").unwrap();
    assert_eq!(unguarded.errors_of("note").unwrap(), "");
}

#[test]
fn test_validate_all_fields_touches_every_field() {
    let mut form = test_form();
    form.validate_all_fields();

    assert!(!form.errors_of("email").unwrap().is_empty());
    assert!(!form.errors_of("name").unwrap().is_empty());
    assert_eq!(form.errors_of("date").unwrap(), "");

    for key in ["date", "email", "name"] {
        let field = form.field(key).unwrap();
        assert!(field.is_touched());
        assert!(field.validation().is_validated());
    }
}

#[test]
fn test_whole_form_validity() {
    let mut form = FieldStore::builder()
        .field("first", "", [is_required()])
        .field("last", "", [is_required()])
        .build();
    assert!(!form.is_valid());

    form.handle_change("first")("Matt").unwrap();
    assert!(!form.is_valid());

    form.handle_change("last")("Damon").unwrap();
    assert!(form.is_valid());

    form.handle_change("last")("").unwrap();
    assert!(!form.is_valid());
}

#[test]
fn test_empty_form_is_valid() {
    assert!(FieldStore::default().is_valid());
    assert!(FieldStore::builder().build().is_empty());
}

#[test]
fn test_errors_summary() {
    let mut form = test_form();
    form.handle_change("email")("wow").unwrap();
    form.validate_all_fields();

    let errors = form.errors();
    let keys: Vec<_> = errors.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["email", "name"]);
    assert_eq!(errors[0].message, "Must be a valid email address.");
    assert_eq!(form.first_error().unwrap().key, "email");
}

#[test]
fn test_values() {
    let mut form = test_form();
    form.handle_change("email")("wow@wow.com").unwrap();

    let values = form.values();
    assert_eq!(
        values.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
        vec![("date", ""), ("email", "wow@wow.com"), ("name", "")]
    );
}

#[test]
fn test_values_with_format() {
    let mut form = test_form();
    form.handle_change("name")("Matt Damon").unwrap();

    assert_eq!(form.values()["name"], "Matt Damon");

    let upper = ValuesOptions::new().format(|s| s.to_uppercase());
    let values = form.values_with(&upper);
    assert_eq!(values["name"], "MATT DAMON");
    assert_eq!(values["date"], "");

    assert_eq!(form.field_value("name").unwrap(), "Matt Damon");
}

#[test]
fn test_values_do_not_touch_fields() {
    let form = test_form();
    let _ = form.values();
    assert!(form.keys().all(|k| !form.field(k).unwrap().is_touched()));
    assert_eq!(form.revision(), 0);
}

#[test]
fn test_values_serialize_in_field_order() {
    let mut form = test_form();
    form.handle_change("name")("Matt").unwrap();
    let json = serde_json::to_string(&form.values()).unwrap();
    assert_eq!(json, r#"{"date":"","email":"","name":"Matt"}"#);
}

#[test]
fn test_submitted_flag_is_caller_managed() {
    let mut form = test_form();
    assert!(!form.has_been_submitted());

    form.validate_all_fields();
    form.clear_all_fields();
    assert!(!form.has_been_submitted());

    form.set_submitted(true);
    form.clear_all_fields();
    assert!(form.has_been_submitted());
}

#[test]
fn test_change_hook_sees_each_mutation() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut form = FieldStore::builder()
        .field("date", "", [])
        .field("name", "", [is_required()])
        .on_change(move |change| {
            sink.lock().unwrap().push((
                change.key.clone(),
                change.kind,
                change.field.value().to_string(),
            ));
        })
        .build();

    form.handle_change("date")("today").unwrap();
    form.handle_change("name")("Matt").unwrap();
    form.clear_field("name");

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![
            ("date".to_string(), ChangeKind::ValueChanged, "today".to_string()),
            ("name".to_string(), ChangeKind::ValueChanged, "Matt".to_string()),
            ("name".to_string(), ChangeKind::Cleared, "".to_string()),
        ]
    );
    assert_eq!(form.revision(), 3);
}

#[test]
fn test_change_hook_sees_revalidated_field() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut form = FieldStore::builder()
        .field("email", "", [is_required(), is_valid_email()])
        .on_change(move |change| {
            sink.lock().unwrap().push((
                change.field.value().to_string(),
                change.field.is_valid(),
                change.field.error(),
            ));
        })
        .build();

    form.handle_change("email")("wow").unwrap();
    form.handle_change("email")("wow@wow.com").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (
                "wow".to_string(),
                false,
                "Must be a valid email address.".to_string()
            ),
            ("wow@wow.com".to_string(), true, "".to_string()),
        ]
    );
}

#[test]
fn test_change_hook_on_validate_all() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let mut form = FieldStore::builder()
        .field("name", "", [is_required()])
        .build();
    form.set_on_change(move |change| {
        sink.lock().unwrap().push((
            change.kind,
            change.field.is_touched(),
            change.field.validation().is_validated(),
        ));
    });

    form.validate_all_fields();
    form.validate_all_fields();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            (ChangeKind::Validated, true, true),
            (ChangeKind::Validated, true, true),
        ]
    );
}

#[test]
fn test_change_hook_after_bulk_clear_sees_all_cleared() {
    let form_values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&form_values);

    let mut form = test_form();
    form.handle_change("date")("today").unwrap();
    form.handle_change("name")("Matt").unwrap();
    form.set_on_change(move |change| {
        sink.lock().unwrap().push((change.key.clone(), change.kind));
    });

    form.clear_all_fields();

    let kinds: Vec<_> = form_values.lock().unwrap().clone();
    assert_eq!(
        kinds,
        vec![
            ("date".to_string(), ChangeKind::Cleared),
            ("email".to_string(), ChangeKind::Cleared),
            ("name".to_string(), ChangeKind::Cleared),
        ]
    );
}

#[test]
fn test_dirty_flag() {
    let mut form = test_form();
    assert!(!form.is_dirty());

    form.handle_change("date")("x").unwrap();
    assert!(form.is_dirty());

    form.clear_dirty();
    assert!(!form.is_dirty());

    form.validate_field("name").unwrap();
    assert!(!form.is_dirty());
}
