use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use stockdash_core::{ProviderError, SampleDataError, ValidationError};
use stockdash_warehouse::WarehouseError;
use thiserror::Error;

/// Request-level failures, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    MalformedInput(#[from] ValidationError),

    /// Path or query string that could not be extracted.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("{message}")]
    NoDataAvailable { message: String },

    #[error("Failed to fetch data for {symbol}: {source}")]
    ProviderUnavailable {
        symbol: String,
        #[source]
        source: ProviderError,
    },

    #[error("{0}")]
    Internal(String),
}

/// Marks a response produced from an [`ApiError`].
#[derive(Debug, Clone, Copy)]
pub struct ErrorResponse;

impl ApiError {
    pub fn no_data(symbol: impl std::fmt::Display) -> Self {
        Self::NoDataAvailable {
            message: format!("No data available for {symbol}"),
        }
    }

    pub fn no_fresh_data(symbol: impl std::fmt::Display) -> Self {
        Self::NoDataAvailable {
            message: format!("No fresh data from provider for {symbol}"),
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedInput(_) | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoDataAvailable { .. } => StatusCode::NOT_FOUND,
            Self::ProviderUnavailable { .. } => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<WarehouseError> for ApiError {
    fn from(error: WarehouseError) -> Self {
        Self::Internal(format!("storage error: {error}"))
    }
}

impl From<SampleDataError> for ApiError {
    fn from(error: SampleDataError) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Internal(format!("background task failed: {error}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }

        let mut response = (status, Json(json!({ "error": self.to_string() }))).into_response();
        response.extensions_mut().insert(ErrorResponse);
        response
    }
}

/// Older dashboards only look at the body; answer every error with 200.
pub async fn legacy_error_status(mut response: Response) -> Response {
    if response.extensions().get::<ErrorResponse>().is_some() {
        *response.status_mut() = StatusCode::OK;
    }
    response
}

/// Binary-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Warehouse(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
