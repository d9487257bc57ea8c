use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One selectable class/section. `code` is the identity the form handler
/// relies on; it must be unique across the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub code: String,
    #[serde(rename = "type", default = "default_class_type")]
    pub kind: String,
}

fn default_class_type() -> String {
    "section".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub classes: Vec<Class>,
}

/// Display-only branding, no identity semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolInfo {
    #[serde(default)]
    pub school_name: String,
    #[serde(default)]
    pub event_title: String,
}

/// Shared secrets, compared by exact string match. An empty registration
/// password leaves the form open, matching the passwordless QR flow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub registration_password: String,
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registration_password: String::new(),
            admin_password: default_admin_password(),
        }
    }
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

impl Settings {
    /// Shared-secret gate for the registration form, exact string match.
    /// There is no session or token lifecycle behind this.
    pub fn allows_registration(&self, supplied: &str) -> bool {
        supplied == self.registration_password
    }

    pub fn allows_admin(&self, supplied: &str) -> bool {
        supplied == self.admin_password
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDoc {
    grades: IndexMap<String, Grade>,
    #[serde(default)]
    school_info: SchoolInfo,
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    texts: IndexMap<String, String>,
}

/// Read-only view of what can be registered for and what text/branding to
/// show. Loaded once at startup and shared by reference; edits to the file
/// require a restart.
#[derive(Debug, Clone)]
pub struct Catalog {
    grades: IndexMap<String, Grade>,
    pub school_info: SchoolInfo,
    pub settings: Settings,
    texts: IndexMap<String, String>,
}

/// A class resolved by code, together with the grade that holds it.
#[derive(Debug)]
pub struct ResolvedClass<'a> {
    pub grade_key: &'a str,
    pub grade: &'a Grade,
    pub class: &'a Class,
}

impl Catalog {
    pub fn load(path: impl AsRef<Path>) -> Result<Catalog, ConfigError> {
        let path = path.as_ref();
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(path.to_path_buf()))
            }
            Err(e) => {
                return Err(ConfigError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };

        // Syntax errors are Malformed; a syntactically valid document with
        // the wrong shape is a schema violation.
        let value: serde_json::Value = serde_json::from_str(&raw)?;
        let doc: CatalogDoc = serde_json::from_value(value)
            .map_err(|e| ConfigError::SchemaViolation(e.to_string()))?;

        Self::from_doc(doc)
    }

    fn from_doc(doc: CatalogDoc) -> Result<Catalog, ConfigError> {
        if doc.grades.is_empty() {
            return Err(ConfigError::SchemaViolation(
                "grades must not be empty".to_string(),
            ));
        }

        let mut seen: HashSet<String> = HashSet::new();
        for (grade_key, grade) in &doc.grades {
            for class in &grade.classes {
                if class.code.trim().is_empty() {
                    return Err(ConfigError::SchemaViolation(format!(
                        "class {:?} in grade {:?} has an empty code",
                        class.name, grade_key
                    )));
                }
                if !seen.insert(class.code.clone()) {
                    return Err(ConfigError::SchemaViolation(format!(
                        "duplicate class code {:?}",
                        class.code
                    )));
                }
            }
        }

        Ok(Catalog {
            grades: doc.grades,
            school_info: doc.school_info,
            settings: doc.settings,
            texts: doc.texts,
        })
    }

    /// Grades in source-document order. Display order is significant.
    pub fn grades(&self) -> impl Iterator<Item = (&str, &Grade)> + '_ {
        self.grades.iter().map(|(key, grade)| (key.as_str(), grade))
    }

    pub fn find_class(&self, code: &str) -> Option<ResolvedClass<'_>> {
        for (grade_key, grade) in &self.grades {
            if let Some(class) = grade.classes.iter().find(|c| c.code == code) {
                return Some(ResolvedClass {
                    grade_key,
                    grade,
                    class,
                });
            }
        }
        None
    }

    /// UI copy for `key`: document override first, then the built-in default,
    /// then the key itself so a typo stays visible rather than blank.
    pub fn text<'a>(&'a self, key: &'a str) -> &'a str {
        if let Some(t) = self.texts.get(key) {
            return t;
        }
        default_text(key).unwrap_or(key)
    }
}

fn default_text(key: &str) -> Option<&'static str> {
    Some(match key {
        "registration_welcome" => "أهلاً وسهلاً بكم في تسجيل الحضور",
        "registration_instructions" => "يرجى إدخال اسم الطالب واختيار الصف",
        "student_name_label" => "اسم الطالب",
        "class_name_label" => "الصف",
        "password_label" => "كلمة المرور",
        "register_button" => "تسجيل الحضور",
        "qr_code_title" => "رمز QR للتسجيل",
        "qr_code_instructions" => "امسح هذا الرمز للوصول إلى صفحة التسجيل",
        "management_title" => "إدارة الطلاب",
        "student_list" => "قائمة الطلاب",
        "no_students" => "لا يوجد طلاب في هذا الصف",
        "remove_student" => "حذف طالب",
        "refresh_data" => "تحديث البيانات",
        "total_students" => "إجمالي الطلاب المسجلين",
        "students_count" => "طالب",
        "registration_success" => "تم التسجيل بنجاح",
        "student_removed" => "تم حذف الطالب بنجاح",
        "student_not_found" => "الطالب غير موجود",
        "invalid_class" => "الصف غير صحيح",
        "missing_data" => "الرجاء إدخال جميع البيانات المطلوبة",
        "wrong_password" => "كلمة المرور غير صحيحة",
        _ => return None,
    })
}
