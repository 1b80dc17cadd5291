use std::error::Error;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::*;

use crate::error::EngineError;

pub(super) struct ApiError(pub StatusCode, pub String, pub Option<Vec<String>>);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("missing resource")]
  ResourceNotFound,
  #[error("no pricing sheet has been uploaded")]
  NoSheet,
  #[error(transparent)]
  OtherError(#[from] anyhow::Error),

  #[error("invalid configuration: {0}")]
  ConfigError(String),
  #[error("could not read workbook: {0}")]
  SheetError(String),
  #[error("error from storefront: {0}")]
  StorefrontError(String),

  #[error("invalid request body")]
  InvalidBody(#[from] validator::ValidationErrors),
}

impl From<EngineError> for AppError {
  fn from(value: EngineError) -> Self {
    match value {
      EngineError::Sheet(err) => AppError::SheetError(err),
      EngineError::SheetRead(err) => AppError::SheetError(err.to_string()),
      EngineError::SheetWrite(err) => AppError::SheetError(err.to_string()),
      EngineError::Storefront(err) => AppError::StorefrontError(err.to_string()),
      EngineError::Other(err) => AppError::OtherError(err),
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    error!(error = self.source(), "{}", self.to_string());

    ApiError::from(&self).into_response()
  }
}

impl From<&AppError> for ApiError {
  fn from(value: &AppError) -> Self {
    match value {
      AppError::BadRequest(_) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), None),
      AppError::ResourceNotFound => ApiError(StatusCode::NOT_FOUND, value.to_string(), None),
      AppError::NoSheet => ApiError(StatusCode::NOT_FOUND, value.to_string(), None),
      AppError::SheetError(_) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), None),
      AppError::StorefrontError(_) => ApiError(StatusCode::BAD_GATEWAY, value.to_string(), None),
      AppError::InvalidBody(err) => ApiError(StatusCode::BAD_REQUEST, value.to_string(), Some(vec![err.to_string()])),
      AppError::OtherError(inner) if inner.is::<AppError>() => match inner.downcast_ref::<AppError>() {
        Some(inner) => inner.into(),
        _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
      },
      _ => ApiError(StatusCode::INTERNAL_SERVER_ERROR, value.to_string(), None),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let payload = match self.2 {
      Some(details) => json!({
          "message": self.1.to_string(),
          "details": details,
      }),
      None => json!({
          "message": self.1.to_string(),
      }),
    };

    (self.0, Json(payload)).into_response()
  }
}
