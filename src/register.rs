use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::info;

use crate::catalog::Catalog;
use crate::db::{Registration, RegistrationStore};
use crate::error::{AppError, ValidationError};

pub const REGISTER_TEMPLATE: &str = "register.html";
pub const ADMIN_TEMPLATE: &str = "admin.html";
pub const QR_TEMPLATE: &str = "qr.html";

/// All templates are embedded; nothing is read from disk at render time.
pub fn templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(REGISTER_TEMPLATE, include_str!("../templates/register.html"))?;
    tera.add_raw_template(ADMIN_TEMPLATE, include_str!("../templates/admin.html"))?;
    tera.add_raw_template(QR_TEMPLATE, include_str!("../templates/qr.html"))?;
    Ok(tera)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub class_code: String,
    #[serde(default)]
    pub password: String,
}

/// Validates and records one submission. The password gate runs before any
/// field validation; a rejected submission appends nothing.
pub fn submit(
    catalog: &Catalog,
    store: &RegistrationStore,
    input: &SubmitInput,
) -> Result<Registration, AppError> {
    if !catalog.settings.allows_registration(&input.password) {
        return Err(ValidationError::WrongPassword.into());
    }

    let name = input.name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField("name").into());
    }

    let Some(resolved) = catalog.find_class(&input.class_code) else {
        return Err(ValidationError::UnknownClass(input.class_code.clone()).into());
    };

    let registration = store.append(name, &resolved.class.code)?;
    info!(
        name = registration.name.as_str(),
        class = resolved.class.name.as_str(),
        code = registration.class_code.as_str(),
        "new registration"
    );
    Ok(registration)
}

#[derive(Debug, Serialize)]
pub struct StudentView {
    pub id: String,
    pub name: String,
    pub registered_at: String,
}

#[derive(Debug, Serialize)]
pub struct ClassView {
    pub name: String,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub students: Vec<StudentView>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GradeView {
    pub key: String,
    pub name: String,
    pub color: String,
    pub classes: Vec<ClassView>,
}

/// Catalog shaped for the public form: grades in document order, no
/// registration data.
pub fn grade_views(catalog: &Catalog) -> Vec<GradeView> {
    catalog
        .grades()
        .map(|(key, grade)| GradeView {
            key: key.to_string(),
            name: grade.name.clone(),
            color: grade.color.clone(),
            classes: grade
                .classes
                .iter()
                .map(|class| ClassView {
                    name: class.name.clone(),
                    code: class.code.clone(),
                    kind: class.kind.clone(),
                    students: Vec::new(),
                    count: 0,
                })
                .collect(),
        })
        .collect()
}

/// Catalog plus the registered names and counts per class, for the admin
/// view and the refresh API.
pub fn grade_snapshot(
    catalog: &Catalog,
    store: &RegistrationStore,
) -> anyhow::Result<Vec<GradeView>> {
    let mut grades = Vec::new();
    for (key, grade) in catalog.grades() {
        let mut classes = Vec::new();
        for class in &grade.classes {
            let students: Vec<StudentView> = store
                .by_class(&class.code)?
                .into_iter()
                .map(|r| StudentView {
                    id: r.id,
                    name: r.name,
                    registered_at: r.registered_at.to_rfc3339(),
                })
                .collect();
            classes.push(ClassView {
                name: class.name.clone(),
                code: class.code.clone(),
                kind: class.kind.clone(),
                count: students.len(),
                students,
            });
        }
        grades.push(GradeView {
            key: key.to_string(),
            name: grade.name.clone(),
            color: grade.color.clone(),
            classes,
        });
    }
    Ok(grades)
}

const TEXT_KEYS: &[&str] = &[
    "registration_welcome",
    "registration_instructions",
    "student_name_label",
    "class_name_label",
    "password_label",
    "register_button",
    "qr_code_title",
    "qr_code_instructions",
    "management_title",
    "student_list",
    "no_students",
    "remove_student",
    "refresh_data",
    "total_students",
    "students_count",
    "registration_success",
    "student_removed",
    "student_not_found",
    "invalid_class",
    "missing_data",
    "wrong_password",
];

fn text_context(catalog: &Catalog) -> HashMap<&'static str, String> {
    TEXT_KEYS
        .iter()
        .map(|key| (*key, catalog.text(key).to_string()))
        .collect()
}

/// Pure render of the registration form from the catalog.
pub fn render_form(tera: &Tera, catalog: &Catalog) -> anyhow::Result<String> {
    let mut ctx = Context::new();
    ctx.insert("school", &catalog.school_info);
    ctx.insert("texts", &text_context(catalog));
    ctx.insert("grades", &grade_views(catalog));
    ctx.insert(
        "require_password",
        &!catalog.settings.registration_password.is_empty(),
    );
    Ok(tera.render(REGISTER_TEMPLATE, &ctx)?)
}

pub fn render_admin(
    tera: &Tera,
    catalog: &Catalog,
    store: &RegistrationStore,
) -> anyhow::Result<String> {
    let mut ctx = Context::new();
    ctx.insert("school", &catalog.school_info);
    ctx.insert("texts", &text_context(catalog));
    ctx.insert("grades", &grade_snapshot(catalog, store)?);
    ctx.insert("total", &store.count()?);
    Ok(tera.render(ADMIN_TEMPLATE, &ctx)?)
}

pub fn render_qr(
    tera: &Tera,
    catalog: &Catalog,
    url: &str,
    svg: &str,
) -> anyhow::Result<String> {
    let mut ctx = Context::new();
    ctx.insert("school", &catalog.school_info);
    ctx.insert("texts", &text_context(catalog));
    ctx.insert("url", url);
    ctx.insert("svg", svg);
    Ok(tera.render(QR_TEMPLATE, &ctx)?)
}
