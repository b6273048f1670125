use thiserror::Error;

use crate::application::invoice_service::SubmitError;
use crate::domain::draft::Violation;
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invoice rejected: {} problem(s)", .0.len())]
    Rejected(Vec<Violation>),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SubmitError> for AppError {
    fn from(e: SubmitError) -> Self {
        match e {
            SubmitError::Invalid(violations) => AppError::Rejected(violations),
            SubmitError::Domain(e) => AppError::Domain(e),
        }
    }
}

impl AppError {
    /// Process exit status for the command-line driver.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Rejected(_) => 2,
            AppError::Config(_) => 3,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_exits_with_2() {
        let err = AppError::Rejected(vec![Violation::NoItems]);
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn config_display() {
        assert_eq!(
            AppError::Config("bad".to_string()).to_string(),
            "Configuration error: bad"
        );
    }

    #[test]
    fn rejected_display_counts_problems() {
        let err = AppError::Rejected(vec![Violation::NoItems, Violation::MissingNumber]);
        assert_eq!(err.to_string(), "Invoice rejected: 2 problem(s)");
    }

    #[test]
    fn domain_errors_pass_through_display() {
        let app_err: AppError = DomainError::NoDraft.into();
        assert_eq!(app_err.to_string(), "No draft invoice is active");
        assert_eq!(app_err.exit_code(), 1);
    }

    #[test]
    fn submit_invalid_maps_to_rejected() {
        let app_err: AppError = SubmitError::Invalid(vec![Violation::MissingCustomer]).into();
        assert!(matches!(app_err, AppError::Rejected(ref v) if v == &[Violation::MissingCustomer]));
    }

    #[test]
    fn submit_domain_maps_to_domain() {
        let app_err: AppError = SubmitError::Domain(DomainError::NotFound).into();
        assert!(matches!(app_err, AppError::Domain(DomainError::NotFound)));
    }
}
