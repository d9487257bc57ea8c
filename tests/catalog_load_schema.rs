
use rollcall::catalog::Catalog;
use rollcall::error::ConfigError;
use test_support::{write_config, TWO_GRADES};

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Catalog::load(dir.path().join("absent.json")).expect_err("should fail");
    assert!(matches!(err, ConfigError::NotFound(_)), "got {err:?}");
}

#[test]
fn invalid_json_is_malformed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), "{ \"grades\": ");
    let err = Catalog::load(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::Malformed(_)), "got {err:?}");
}

#[test]
fn missing_grades_key_is_schema_violation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"{ "school_info": { "school_name": "x" } }"#);
    let err = Catalog::load(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::SchemaViolation(_)), "got {err:?}");
}

#[test]
fn empty_grades_map_is_schema_violation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"{ "grades": {} }"#);
    let err = Catalog::load(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::SchemaViolation(_)), "got {err:?}");
}

#[test]
fn duplicate_class_code_across_grades_is_schema_violation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"{
          "grades": {
            "fourth": {
              "name": "الرابع",
              "classes": [{ "name": "الرابع أ", "code": "4-a" }]
            },
            "fifth": {
              "name": "الخامس",
              "classes": [{ "name": "الخامس أ", "code": "4-a" }]
            }
          }
        }"#,
    );
    let err = Catalog::load(&path).expect_err("should fail");
    match err {
        ConfigError::SchemaViolation(msg) => assert!(msg.contains("4-a"), "got {msg}"),
        other => panic!("expected SchemaViolation, got {other:?}"),
    }
}

#[test]
fn duplicate_class_code_within_one_grade_is_schema_violation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"{
          "grades": {
            "fourth": {
              "name": "الرابع",
              "classes": [
                { "name": "الرابع أ", "code": "4-a" },
                { "name": "الرابع ب", "code": "4-a" }
              ]
            }
          }
        }"#,
    );
    let err = Catalog::load(&path).expect_err("should fail");
    assert!(matches!(err, ConfigError::SchemaViolation(_)), "got {err:?}");
}

#[test]
fn grade_order_follows_source_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"{
          "grades": {
            "zeta": { "name": "z", "classes": [{ "name": "z1", "code": "z-1" }] },
            "alpha": { "name": "a", "classes": [{ "name": "a1", "code": "a-1" }] },
            "mid": { "name": "m", "classes": [{ "name": "m1", "code": "m-1" }] }
          }
        }"#,
    );
    let catalog = Catalog::load(&path).expect("load");
    let keys: Vec<&str> = catalog.grades().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn loading_twice_yields_identical_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), TWO_GRADES);
    let first = Catalog::load(&path).expect("first load");
    let second = Catalog::load(&path).expect("second load");

    let a: Vec<_> = first.grades().map(|(k, g)| (k.to_string(), g.clone())).collect();
    let b: Vec<_> = second.grades().map(|(k, g)| (k.to_string(), g.clone())).collect();
    assert_eq!(a, b);
    assert_eq!(first.school_info, second.school_info);
    assert_eq!(first.settings, second.settings);
}

#[test]
fn find_class_resolves_grade_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), TWO_GRADES);
    let catalog = Catalog::load(&path).expect("load");

    let resolved = catalog.find_class("5-b").expect("class exists");
    assert_eq!(resolved.class.name, "الخامس ب");
    assert_eq!(resolved.grade_key, "fifth");
    assert_eq!(resolved.grade.color, "#8e44ad");

    assert!(catalog.find_class("9-z").is_none());
}

#[test]
fn class_type_defaults_to_section() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"{
          "grades": {
            "fourth": { "name": "الرابع", "classes": [{ "name": "الرابع أ", "code": "4-a" }] }
          }
        }"#,
    );
    let catalog = Catalog::load(&path).expect("load");
    assert_eq!(catalog.find_class("4-a").expect("class").class.kind, "section");
}

#[test]
fn texts_prefer_document_overrides_then_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), TWO_GRADES);
    let catalog = Catalog::load(&path).expect("load");

    // Overridden in the document.
    assert_eq!(catalog.text("registration_welcome"), "أهلاً بكم");
    // Falls back to the built-in default.
    assert_eq!(catalog.text("invalid_class"), "الصف غير صحيح");
    // Unknown keys stay visible instead of rendering blank.
    assert_eq!(catalog.text("no_such_key"), "no_such_key");
}
