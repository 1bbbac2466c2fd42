use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

pub use entity::employees::Model as Employee;

const NAME_MAX: usize = 100;
const ROLE_MAX: usize = 100;
const EMAIL_MAX: usize = 150;

/// `POST /employees` payload. Every field is optional on the wire so that a
/// missing one surfaces as a validation error instead of a parse failure.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateEmployee {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
    pub field: Option<String>,
    pub organization: Option<String>,
}

/// `PUT /employees/{id}` payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub role: Option<String>,
    pub email: Option<String>,
}

/// The mutable columns of an employee row, validated and trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeFields {
    pub name: String,
    pub role: String,
    pub email: String,
}

/// A validated create request: the row to store plus the context used for
/// the onboarding copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeDraft {
    pub fields: EmployeeFields,
    pub field: String,
    pub organization: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct CreatedEmployee {
    pub message: String,
    pub employee_id: i32,
    pub checklist: Vec<String>,
    pub welcome_email: String,
}

impl CreateEmployee {
    pub fn validate(self) -> HrResult<EmployeeDraft> {
        let fields = EmployeeFields::parse(self.name, self.role, self.email)?;
        Ok(EmployeeDraft {
            fields,
            field: required("field", self.field)?,
            organization: required("organization", self.organization)?,
        })
    }
}

impl UpdateEmployee {
    pub fn validate(self) -> HrResult<EmployeeFields> {
        EmployeeFields::parse(self.name, self.role, self.email)
    }
}

impl EmployeeFields {
    fn parse(name: Option<String>, role: Option<String>, email: Option<String>) -> HrResult<Self> {
        let name = bounded("name", required("name", name)?, NAME_MAX)?;
        let role = bounded("role", required("role", role)?, ROLE_MAX)?;
        let email = bounded("email", required("email", email)?, EMAIL_MAX)?;
        if !looks_like_email(&email) {
            return Err(HrError::Validation(format!("invalid email address: {email}")));
        }
        Ok(Self { name, role, email })
    }
}

fn required(field: &str, value: Option<String>) -> HrResult<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| HrError::missing_field(field))
}

fn bounded(field: &str, value: String, max: usize) -> HrResult<String> {
    if value.chars().count() > max {
        return Err(HrError::Validation(format!(
            "{field} must be at most {max} characters"
        )));
    }
    Ok(value)
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !value.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

/// Fixed four-step checklist handed back on every successful create.
pub fn onboarding_checklist(name: &str, field: &str) -> Vec<String> {
    vec![
        format!("Create email account for {name}"),
        format!("Set up workstation for {name}"),
        "Assign buddy/mentor".to_string(),
        format!("Schedule HR introduction session for the {field} team"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> CreateEmployee {
        CreateEmployee {
            name: Some(" Ana ".into()),
            role: Some("Engineer".into()),
            email: Some("ana@x.com".into()),
            field: Some("Software".into()),
            organization: Some("Acme".into()),
        }
    }

    #[test]
    fn create_payload_is_trimmed() {
        let draft = ana().validate().unwrap();
        assert_eq!(draft.fields.name, "Ana");
        assert_eq!(draft.field, "Software");
        assert_eq!(draft.organization, "Acme");
    }

    #[test]
    fn each_missing_field_is_named() {
        let cases: [(&str, fn(&mut CreateEmployee)); 5] = [
            ("name", |p| p.name = None),
            ("role", |p| p.role = Some("   ".into())),
            ("email", |p| p.email = None),
            ("field", |p| p.field = None),
            ("organization", |p| p.organization = Some(String::new())),
        ];
        for (field, strip) in cases {
            let mut payload = ana();
            strip(&mut payload);
            let err = payload.validate().unwrap_err();
            assert_eq!(err.to_string(), format!("missing required field: {field}"));
        }
    }

    #[test]
    fn malformed_email_is_rejected() {
        for bad in ["ana", "@x.com", "ana@", "ana b@x.com"] {
            let mut payload = ana();
            payload.email = Some(bad.into());
            assert!(matches!(payload.validate(), Err(HrError::Validation(_))), "{bad}");
        }
    }

    #[test]
    fn overlong_name_is_rejected() {
        let mut payload = ana();
        payload.name = Some("a".repeat(NAME_MAX + 1));
        let err = payload.validate().unwrap_err();
        assert_eq!(err.to_string(), "name must be at most 100 characters");
    }

    #[test]
    fn update_ignores_create_only_fields() {
        let fields = UpdateEmployee {
            name: Some("Ana".into()),
            role: Some("Lead".into()),
            email: Some("ana@x.com".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(fields.role, "Lead");
    }

    #[test]
    fn checklist_mentions_name_and_field() {
        let checklist = onboarding_checklist("Ana", "Software");
        assert_eq!(
            checklist,
            vec![
                "Create email account for Ana",
                "Set up workstation for Ana",
                "Assign buddy/mentor",
                "Schedule HR introduction session for the Software team",
            ]
        );
    }
}
