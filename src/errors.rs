//! Error types, layered the way requests flow: storage -> repository -> service -> HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("Not found")]
    NotFound,

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

impl RepositoryError {
    /// Lifts foreign key violations out of the driver error.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => Self::ForeignKey(db.message().to_string()),
            sqlx::Error::RowNotFound => Self::NotFound,
            _ => Self::Sqlx(err),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repo(#[from] RepositoryError),

    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("Not found")]
    NotFound,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("failed to create order")]
    OrderCreation,
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{field}: {msg}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .collect();
        messages.sort();
        ServiceError::Validation(messages)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug)]
pub enum HttpError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => HttpError::BadRequest(format!("Validation failed: {}", errors.join("; "))),
            ServiceError::EmptyCart => HttpError::BadRequest("Cart is empty".into()),
            ServiceError::NotFound | ServiceError::Repo(RepositoryError::NotFound) => HttpError::NotFound("Not found".into()),
            ServiceError::OrderCreation => HttpError::Internal("failed to create order".into()),
            ServiceError::Repo(_) => HttpError::Internal("Repository error".into()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            HttpError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            HttpError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            HttpError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse {
            status: "error".into(),
            message: msg,
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aggregates::ShippingAddress;
    use validator::Validate;

    #[test]
    fn test_validation_errors_are_flattened_and_sorted() {
        let addr = ShippingAddress::default();
        let err = ServiceError::from(addr.validate().unwrap_err());
        match err {
            ServiceError::Validation(msgs) => {
                assert_eq!(msgs.len(), 4);
                assert_eq!(msgs[0], "city: city is required");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_order_creation_maps_to_generic_500() {
        let resp = HttpError::from(ServiceError::OrderCreation).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let resp = HttpError::from(ServiceError::Repo(RepositoryError::NotFound)).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_other_repository_failures_are_internal() {
        for err in [RepositoryError::ForeignKey("variant 9".into()), RepositoryError::Corrupt("order 1".into())] {
            let resp = HttpError::from(ServiceError::Repo(err)).into_response();
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
