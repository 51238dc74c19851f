use crate::error::{AppError, ConstraintParser};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Maps Diesel errors onto [`AppError`] variants.
///
/// Unique violations become [`AppError::Duplicate`], which is how the
/// PostgreSQL backend reports email and name collisions. Column-level
/// violations become [`AppError::Validation`].
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.message(), info.constraint_name(), operation)
            }
            DieselError::NotFound => AppError::not_found("Resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        message: &str,
        constraint_name: Option<&str>,
        operation: &str,
    ) -> AppError {
        let fallback = |label: &str| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("{}: {}", label, message),
        };

        match kind {
            DatabaseErrorKind::UniqueViolation => {
                match ConstraintParser::parse_unique_violation(message, constraint_name) {
                    Some((table, field, value)) => {
                        AppError::duplicate(entity_name(&table), field, value)
                    }
                    None => fallback("Unique constraint violation"),
                }
            }
            DatabaseErrorKind::NotNullViolation => {
                match ConstraintParser::parse_column_violation(message, constraint_name) {
                    Some((table, field)) => AppError::validation(
                        field.clone(),
                        format!("{} {} is required", entity_name(&table), field),
                    ),
                    None => fallback("Not null constraint violation"),
                }
            }
            DatabaseErrorKind::ForeignKeyViolation => {
                match ConstraintParser::parse_column_violation(message, constraint_name) {
                    Some((table, field)) => AppError::validation(
                        field.clone(),
                        format!("Invalid reference in {} {}", entity_name(&table), field),
                    ),
                    None => fallback("Foreign key constraint violation"),
                }
            }
            DatabaseErrorKind::CheckViolation => {
                match ConstraintParser::parse_column_violation(message, constraint_name) {
                    Some((table, field)) => AppError::validation(
                        field.clone(),
                        format!("Check constraint failed for {} {}", entity_name(&table), field),
                    ),
                    None => fallback("Check constraint violation"),
                }
            }
            _ => fallback("Database error"),
        }
    }
}

/// Turns a table name into the entity name used in user-facing messages.
fn entity_name(table: &str) -> String {
    match table {
        "users" => "User".to_string(),
        "posts" => "Post".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockDatabaseErrorInfo {
        message: String,
        constraint_name: Option<String>,
    }

    impl diesel::result::DatabaseErrorInformation for MockDatabaseErrorInfo {
        fn message(&self) -> &str {
            &self.message
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint_name.as_deref()
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn db_error(kind: DatabaseErrorKind, message: &str, constraint: Option<&str>) -> DieselError {
        DieselError::DatabaseError(
            kind,
            Box::new(MockDatabaseErrorInfo {
                message: message.to_string(),
                constraint_name: constraint.map(str::to_string),
            }),
        )
    }

    #[test]
    fn test_unique_email_becomes_duplicate() {
        let error = db_error(
            DatabaseErrorKind::UniqueViolation,
            "duplicate key value violates unique constraint \"users_email_key\"\nDETAIL: Key (email)=(jane@example.com) already exists.",
            Some("users_email_key"),
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert user") {
            AppError::Duplicate {
                entity,
                field,
                value,
            } => {
                assert_eq!(entity, "User");
                assert_eq!(field, "email");
                assert_eq!(value, "jane@example.com");
            }
            other => panic!("Expected Duplicate error, got: {:?}", other),
        }
    }

    #[test]
    fn test_not_null_becomes_validation() {
        let error = db_error(
            DatabaseErrorKind::NotNullViolation,
            "null value in column \"content\" of relation \"posts\" violates not-null constraint",
            None,
        );

        match DatabaseErrorConverter::convert_diesel_error(error, "insert post") {
            AppError::Validation { field, reason } => {
                assert_eq!(field, "content");
                assert_eq!(reason, "Post content is required");
            }
            other => panic!("Expected Validation error, got: {:?}", other),
        }
    }

    #[test]
    fn test_diesel_not_found() {
        let result = DatabaseErrorConverter::convert_diesel_error(DieselError::NotFound, "find");
        assert!(matches!(result, AppError::NotFound { .. }));
    }

    #[test]
    fn test_unparseable_unique_violation_is_database_error() {
        let error = db_error(DatabaseErrorKind::UniqueViolation, "odd message", None);
        let result = DatabaseErrorConverter::convert_diesel_error(error, "insert user");
        match result {
            AppError::Database { operation, .. } => assert_eq!(operation, "insert user"),
            other => panic!("Expected Database error, got: {:?}", other),
        }
    }
}
