//! Yuedu server error type.

use axum::{
    http::{header, Response, StatusCode},
    response::IntoResponse,
};
use yuedu::flashcards::ChatError;
use yuedu_api::response as res;

pub type ServerResult<T> = Result<T, ServerError>;

pub struct ServerError(eyre::Report);

impl<E> From<E> for ServerError
where
    E: Into<eyre::Report>,
{
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<yuedu::Error>() {
            match err {
                yuedu::Error::Validation(_) | yuedu::Error::TextImport(_) => {
                    StatusCode::BAD_REQUEST
                }
                yuedu::Error::TextNotFound(_) => StatusCode::NOT_FOUND,
                yuedu::Error::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else if let Some(ChatError::TooManyCards(_)) = self.0.downcast_ref::<ChatError>() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        }
        let err = res::Error {
            message: format!("{:#}", self.0),
        };
        let body = serde_json::to_string(&err).expect("failed to serialize response");
        Response::builder()
            .status(status)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .expect("failed to construct response")
            .into_response()
    }
}

pub type EyreResult<T> = Result<T, eyre::Report>;
