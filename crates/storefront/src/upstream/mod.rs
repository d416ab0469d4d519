//! Backend API client.
//!
//! # Architecture
//!
//! The backend API owns identity, orders, products, and settings. The edge
//! treats it as an opaque upstream: requests are forwarded with the caller's
//! own bearer credential attached, responses come back with their status and
//! shape preserved. Nothing is cached between requests and nothing is
//! retried - one failed backend call is one failed request.

mod client;
pub mod types;

pub use client::{BackendClient, Forward, ForwardedResponse};
pub use types::*;

use axum::http::StatusCode;
use thiserror::Error;

use crate::error::AppError;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network-level failure: the backend never produced a response.
    #[error("backend unreachable while trying to {action}: {source}")]
    Network {
        /// What the edge was trying to do, phrased as `<verb> <resource>`.
        action: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The backend responded with a non-success status.
    #[error("backend responded {status}: {message}")]
    Status {
        /// The backend's status code.
        status: StatusCode,
        /// Message extracted from the backend's body, or synthesized from
        /// the status when the body was not JSON.
        message: String,
    },

    /// The backend responded with a success status but an unusable body.
    #[error("backend contract violation: {0}")]
    Contract(String),
}

impl From<UpstreamError> for AppError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Network { action, source } => {
                tracing::warn!(error = %source, "backend unreachable");
                Self::Network(format!("failed to {action}"))
            }
            UpstreamError::Status { status, message } => Self::Upstream { status, message },
            UpstreamError::Contract(detail) => Self::UpstreamContract(detail),
        }
    }
}
