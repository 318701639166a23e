use crate::error::{AppError, ConstraintParser, ViolationReport};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// `operation` describes what was being attempted and ends up in the
    /// error chain of variants that have no better structure.
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::NotFound {
                entity: "resource".to_string(),
                field: "id".to_string(),
                value: "unknown".to_string(),
            },
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let report = ViolationReport {
            message: info.message(),
            details: info.details(),
            table_name: info.table_name(),
            column_name: info.column_name(),
            constraint_name: info.constraint_name(),
        };

        let parsed = match kind {
            DatabaseErrorKind::UniqueViolation => ConstraintParser::parse_unique_violation(&report)
                .map(|(entity, field, value)| AppError::Duplicate {
                    entity,
                    field,
                    value,
                }),
            DatabaseErrorKind::NotNullViolation => {
                ConstraintParser::parse_not_null_violation(&report).map(|(entity, field)| {
                    AppError::Validation {
                        field,
                        reason: format!("Field is required for {}", entity),
                    }
                })
            }
            _ => None,
        };

        parsed.unwrap_or_else(|| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::Error::msg(format!("{:?}: {}", kind, report.message)),
        })
    }
}
