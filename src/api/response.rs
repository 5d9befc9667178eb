//! Response envelope and the HTTP mapping of [`Error`].
//!
//! Every JSON response has the shape
//! `{ "statusCode": 200, "status": "ok", "data": ... }`; errors carry
//! `"status": "error"` and a `"message"` instead of `"data"`.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{error, warn};

/// Outcome label carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Created,
    Error,
}

/// JSON response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub status_code: u16,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A replaced or implicitly created row, flagged with whether it existed.
#[derive(Debug, Serialize)]
pub struct Replaced<T> {
    #[serde(flatten)]
    pub row: T,
    pub exists: bool,
}

fn envelope<T: Serialize>(code: StatusCode, status: Status, data: T) -> Response {
    let body = Envelope {
        status_code: code.as_u16(),
        status,
        data: Some(data),
        message: None,
    };
    (code, Json(body)).into_response()
}

/// 200 with `data`.
pub fn ok<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::OK, Status::Ok, data)
}

/// 201 with `data`.
pub fn created<T: Serialize>(data: T) -> Response {
    envelope(StatusCode::CREATED, Status::Created, data)
}

/// 204 with an empty body.
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// An error ready to be rendered as an envelope.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("{entity} {id} not found"),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::BadRequest { .. } | Error::Write { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", err);
        } else {
            warn!("Request rejected: {}", err);
        }
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Wraps an extractor rejection so it renders as an envelope too.
macro_rules! from_rejection {
    ($rejection:ty, $what:literal) => {
        impl From<$rejection> for ApiError {
            fn from(rejection: $rejection) -> Self {
                warn!("Rejected request {}: {}", $what, rejection.body_text());
                Self {
                    status: rejection.status(),
                    message: rejection.body_text(),
                }
            }
        }
    };
}

from_rejection!(JsonRejection, "body");
from_rejection!(QueryRejection, "query");
from_rejection!(PathRejection, "path");

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body: Envelope<()> = Envelope {
            status_code: self.status.as_u16(),
            status: Status::Error,
            data: None,
            message: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

/// Handler result.
pub type ApiResult = std::result::Result<Response, ApiError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use sea_orm::DbErr;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::invalid("device", "name is required"), StatusCode::UNPROCESSABLE_ENTITY),
            (Error::bad_request("bad end"), StatusCode::BAD_REQUEST),
            (
                Error::write("network", "create")(DbErr::Custom("UNIQUE".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (Error::not_found("library", 3), StatusCode::NOT_FOUND),
            (
                Error::Database(DbErr::Custom("gone".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status, expected);
        }
    }

    #[test]
    fn test_envelope_shape() {
        let body = Envelope {
            status_code: 201,
            status: Status::Created,
            data: Some(Replaced { row: serde_json::json!({"id": 4}), exists: false }),
            message: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 201, "status": "created", "data": {"id": 4, "exists": false}})
        );
    }
}
