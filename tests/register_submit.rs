
use rollcall::error::{AppError, ValidationError};
use rollcall::register::{submit, SubmitInput};
use test_support::{load_catalog, open_store, TWO_GRADES};

fn input(name: &str, class_code: &str, password: &str) -> SubmitInput {
    SubmitInput {
        name: name.to_string(),
        class_code: class_code.to_string(),
        password: password.to_string(),
    }
}

#[test]
fn valid_submission_appends_exactly_one_registration() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(&dir, TWO_GRADES);
    let store = open_store(&dir);

    let registration =
        submit(&catalog, &store, &input("Ali", "5-b", "reg-pass")).expect("submission accepted");
    assert_eq!(registration.name, "Ali");
    assert_eq!(registration.class_code, "5-b");

    let all = store.all().expect("read back");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, registration.id);
}

#[test]
fn unknown_class_code_is_rejected_and_appends_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(&dir, TWO_GRADES);
    let store = open_store(&dir);

    let err = submit(&catalog, &store, &input("Ali", "9-z", "reg-pass")).expect_err("rejected");
    assert!(
        matches!(err, AppError::Invalid(ValidationError::UnknownClass(ref code)) if code == "9-z"),
        "got {err:?}"
    );
    assert_eq!(store.count().expect("count"), 0);
}

#[test]
fn empty_name_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(&dir, TWO_GRADES);
    let store = open_store(&dir);

    for name in ["", "   "] {
        let err = submit(&catalog, &store, &input(name, "4-a", "reg-pass")).expect_err("rejected");
        assert!(
            matches!(err, AppError::Invalid(ValidationError::MissingField("name"))),
            "got {err:?}"
        );
    }
    assert_eq!(store.count().expect("count"), 0);
}

#[test]
fn wrong_password_is_rejected_before_field_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(&dir, TWO_GRADES);
    let store = open_store(&dir);

    // Name empty and class unknown, but the password gate must fire first.
    let err = submit(&catalog, &store, &input("", "9-z", "nope")).expect_err("rejected");
    assert!(
        matches!(err, AppError::Invalid(ValidationError::WrongPassword)),
        "got {err:?}"
    );
    assert_eq!(store.count().expect("count"), 0);
}

#[test]
fn submitted_name_is_trimmed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(&dir, TWO_GRADES);
    let store = open_store(&dir);

    let registration =
        submit(&catalog, &store, &input("  Ali  ", "4-a", "reg-pass")).expect("accepted");
    assert_eq!(registration.name, "Ali");
}

#[test]
fn open_registration_when_no_password_configured() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(
        &dir,
        r#"{
          "grades": {
            "fourth": { "name": "الرابع", "classes": [{ "name": "الرابع أ", "code": "4-a" }] }
          }
        }"#,
    );
    let store = open_store(&dir);

    submit(&catalog, &store, &input("Ali", "4-a", "")).expect("accepted without password");
    assert_eq!(store.count().expect("count"), 1);
}

#[test]
fn identical_names_may_register_twice() {
    let dir = tempfile::tempdir().expect("tempdir");
    let catalog = load_catalog(&dir, TWO_GRADES);
    let store = open_store(&dir);

    let first = submit(&catalog, &store, &input("Ali", "4-a", "reg-pass")).expect("first");
    let second = submit(&catalog, &store, &input("Ali", "4-a", "reg-pass")).expect("second");
    assert_ne!(first.id, second.id);
    assert_eq!(store.count().expect("count"), 2);
}
