//! Catalog Service Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("Record already exists")]
    AlreadyExists,

    #[error("Invalid reference")]
    InvalidReference,

    #[error("Missing required data")]
    MissingRequiredData,

    #[error("Invalid data")]
    InvalidData,

    #[error("Record not found")]
    NotFound,

    #[error(transparent)]
    Sql(sqlx::Error),
}

impl From<sqlx::Error> for CatalogServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => Self::AlreadyExists,
                sqlx::error::ErrorKind::ForeignKeyViolation => Self::InvalidReference,
                sqlx::error::ErrorKind::NotNullViolation => Self::MissingRequiredData,
                sqlx::error::ErrorKind::CheckViolation => Self::InvalidData,
                _ => Self::Sql(sqlx::Error::Database(db_err)),
            },
            _ => Self::Sql(err),
        }
    }
}
