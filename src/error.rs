use thiserror::Error;

/// Errors surfaced by the client directory operations.
///
/// Constraint violations are recognized by their PostgreSQL SQLSTATE code;
/// everything else (connectivity, statement failures) is passed through
/// unmodified as `Sqlx`.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("foreign key violated: {constraint}")]
    ForeignKeyViolation { constraint: String },

    #[error("database error: {0}")]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // PostgreSQL error codes: 23505 = unique_violation,
                // 23503 = foreign_key_violation
                match db_err.code().as_deref() {
                    Some("23505") => DbError::UniqueViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_owned(),
                    },
                    Some("23503") => DbError::ForeignKeyViolation {
                        constraint: db_err.constraint().unwrap_or("unknown").to_owned(),
                    },
                    _ => DbError::Sqlx(sqlx::Error::Database(db_err)),
                }
            }
            other => DbError::Sqlx(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_pass_through() {
        let error: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn display_names_the_constraint() {
        let error = DbError::UniqueViolation {
            constraint: "clients_email_key".into(),
        };
        assert_eq!(
            error.to_string(),
            "unique constraint violated: clients_email_key"
        );
    }
}
