//! Response envelope shared by every `/api` route:
//! `{ success, data?, count?, error?, message? }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::error;

use sauna_store::StoreError;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

pub fn ok<T: Serialize>(data: T) -> Response {
    respond(StatusCode::OK, data, None)
}

pub fn ok_list<T: Serialize>(data: Vec<T>) -> Response {
    let count = data.len();
    respond(StatusCode::OK, data, Some(count))
}

pub fn created<T: Serialize>(data: T) -> Response {
    respond(StatusCode::CREATED, data, None)
}

fn respond<T: Serialize>(status: StatusCode, data: T, count: Option<usize>) -> Response {
    let body = Envelope {
        success: true,
        data: Some(data),
        count,
        error: None,
        message: None,
    };
    (status, Json(body)).into_response()
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { error: String, message: String },
    NotFound { error: String, message: String },
    Internal { error: String, message: String },
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            message: message.into(),
        }
    }

    pub fn not_found(error: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::NotFound {
            error: error.into(),
            message: message.into(),
        }
    }

    /// Translate a store failure. `context` is the generic error shown to
    /// clients when the store itself failed, e.g. "Failed to fetch saunas".
    pub fn from_store(context: &str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::not_found("Sauna not found", err.to_string()),
            StoreError::Validation(msg) => Self::bad_request("Invalid request", msg),
            other => {
                error!(error = %other, context, "Store call failed");
                ApiError::Internal {
                    error: context.to_string(),
                    message: other.to_string(),
                }
            }
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match self {
            ApiError::BadRequest { error, message }
            | ApiError::NotFound { error, message }
            | ApiError::Internal { error, message } => (error, message),
        };
        let body: Envelope<()> = Envelope {
            success: false,
            data: None,
            count: None,
            error: Some(error),
            message: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult = Result<Response, ApiError>;
