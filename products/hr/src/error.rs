use platform_api::ApiError;
use platform_db::DbError;
use thiserror::Error;

pub type HrResult<T> = Result<T, HrError>;

#[derive(Debug, Error)]
pub enum HrError {
    #[error("{0}")]
    Validation(String),
    #[error("employee email already registered: {0}")]
    Conflict(String),
    #[error("Employee {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Store(DbError),
}

impl HrError {
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("missing required field: {field}"))
    }
}

impl From<DbError> for HrError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::UniqueViolation(detail) => Self::Conflict(detail),
            other => Self::Store(other),
        }
    }
}

impl From<HrError> for ApiError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::Validation(_) => ApiError::InvalidInput(err.to_string()),
            HrError::Conflict(_) => ApiError::Conflict(err.to_string()),
            HrError::NotFound(_) => ApiError::NotFound(err.to_string()),
            HrError::Store(inner) => ApiError::storage(inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_becomes_conflict() {
        let err: HrError = DbError::UniqueViolation("employees_email_key".into()).into();
        assert!(matches!(err, HrError::Conflict(ref d) if d == "employees_email_key"));
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let api = ApiError::from(HrError::NotFound(42));
        assert_eq!(api.to_string(), "Employee 42 not found");
    }

    #[test]
    fn missing_field_is_a_validation_error() {
        let api = ApiError::from(HrError::missing_field("email"));
        assert!(matches!(api, ApiError::InvalidInput(ref m) if m == "missing required field: email"));
    }
}
