//! Domain Errors - Business rule violations
//!
//! Contains business logic errors plus a single `Storage` variant that
//! repository implementations use to surface infrastructure failures.

use thiserror::Error;

/// Domain-specific errors representing business rule violations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Referenced build does not exist (or is not visible to the caller)
    #[error("Build not found: {0}")]
    BuildNotFound(i64),

    /// Referenced catalog component does not exist
    #[error("Component not found: {0}")]
    ComponentNotFound(i64),

    /// Referenced user does not exist
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Referenced marketplace listing does not exist
    #[error("Listing not found: {0}")]
    ListingNotFound(i64),

    /// Business rule: usernames are unique
    #[error("User already exists: {0}")]
    UserExists(String),

    /// Business validation: names/titles must be non-blank and bounded
    #[error("Invalid {field}: {reason}")]
    InvalidName { field: &'static str, reason: String },

    /// Business validation: ratings are 1..=5 stars
    #[error("Invalid rating: {0}, must be between 1 and 5")]
    InvalidRating(u8),

    /// Business rule: one review per user per component
    #[error("User {user} already reviewed component {component}")]
    DuplicateReview { user: String, component: i64 },

    /// Business rule: only the owner may modify a resource
    #[error("{user} does not own {resource}")]
    NotOwner { user: String, resource: String },

    /// Business validation: value outside an enumerated set
    #[error("Invalid {field}: '{value}', expected {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Business validation: unknown component category
    #[error("Unknown component category: {0}")]
    UnknownCategory(String),

    /// Business validation: catalog import document is not a JSON array
    #[error("Invalid import document: {0}")]
    InvalidImport(String),

    /// Persistence layer failure
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Check if error is a business validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidName { .. }
                | DomainError::InvalidRating(_)
                | DomainError::InvalidValue { .. }
                | DomainError::UnknownCategory(_)
                | DomainError::InvalidImport(_)
        )
    }

    /// Check if error is a business rule violation
    pub fn is_business_rule_error(&self) -> bool {
        matches!(
            self,
            DomainError::UserExists(_)
                | DomainError::DuplicateReview { .. }
                | DomainError::NotOwner { .. }
        )
    }

    /// Check if error indicates missing data
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DomainError::BuildNotFound(_)
                | DomainError::ComponentNotFound(_)
                | DomainError::UserNotFound(_)
                | DomainError::ListingNotFound(_)
        )
    }

    /// Get error category for business logic
    pub fn category(&self) -> ErrorCategory {
        if self.is_validation_error() {
            ErrorCategory::Validation
        } else if self.is_business_rule_error() {
            ErrorCategory::BusinessRule
        } else if self.is_not_found() {
            ErrorCategory::NotFound
        } else {
            ErrorCategory::Infrastructure
        }
    }

    /// Wrap any infrastructure error into the storage variant
    pub fn storage(err: impl std::fmt::Display) -> Self {
        DomainError::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for DomainError {
    fn from(err: anyhow::Error) -> Self {
        // Typed domain errors travel through anyhow untouched
        match err.downcast::<DomainError>() {
            Ok(domain) => domain,
            Err(other) => DomainError::Storage(format!("{other:#}")),
        }
    }
}

/// Categories of domain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input validation errors
    Validation,
    /// Business rule violations
    BusinessRule,
    /// Resource not found
    NotFound,
    /// Storage and other infrastructure failures
    Infrastructure,
}

/// Validate a user-supplied name against a maximum length
pub fn validate_name(field: &'static str, value: &str, max_len: usize) -> DomainResult<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidName {
            field,
            reason: "must not be blank".to_string(),
        });
    }
    if trimmed.chars().count() > max_len {
        return Err(DomainError::InvalidName {
            field,
            reason: format!("must be at most {max_len} characters"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization() {
        let validation_error = DomainError::InvalidRating(7);
        assert!(validation_error.is_validation_error());
        assert_eq!(validation_error.category(), ErrorCategory::Validation);

        let business_rule_error = DomainError::DuplicateReview {
            user: "alice".to_string(),
            component: 3,
        };
        assert!(business_rule_error.is_business_rule_error());
        assert_eq!(business_rule_error.category(), ErrorCategory::BusinessRule);

        let not_found_error = DomainError::BuildNotFound(42);
        assert!(not_found_error.is_not_found());
        assert_eq!(not_found_error.category(), ErrorCategory::NotFound);

        let storage = DomainError::storage("disk I/O error");
        assert_eq!(storage.category(), ErrorCategory::Infrastructure);
    }

    #[test]
    fn test_error_messages() {
        let error = DomainError::InvalidRating(9);
        assert!(error.to_string().contains('9'));
        assert!(error.to_string().contains("between 1 and 5"));

        let error = DomainError::InvalidValue {
            field: "sort order",
            value: "cheapest".to_string(),
            expected: "name, price_asc or price_desc",
        };
        assert_eq!(error.category(), ErrorCategory::Validation);
        assert_eq!(
            error.to_string(),
            "Invalid sort order: 'cheapest', expected name, price_asc or price_desc"
        );
    }

    #[test]
    fn test_anyhow_roundtrip_keeps_domain_variant() {
        let err = anyhow::Error::new(DomainError::ComponentNotFound(5));
        assert_eq!(DomainError::from(err), DomainError::ComponentNotFound(5));

        let other = anyhow::anyhow!("database is locked");
        assert!(matches!(DomainError::from(other), DomainError::Storage(_)));
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Gaming rig", 100).is_ok());
        assert!(validate_name("name", "   ", 100).is_err());
        assert!(validate_name("name", &"x".repeat(101), 100).is_err());
    }
}
