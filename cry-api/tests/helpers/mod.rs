//! Test Helper Utilities
//!
//! Shared utilities for testing cry-api

#![allow(dead_code)]

pub mod audio_generator;
pub mod multipart;

use axum::body::Body;
use axum::http::Response;
use http_body_util::BodyExt;
use serde_json::Value;

pub use audio_generator::{generate_empty_wav_bytes, generate_wav_bytes, AudioConfig};
pub use multipart::{classify_request, upload_request, Part};

/// Collect a response body as JSON
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("Response body should be JSON")
}
