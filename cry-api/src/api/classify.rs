//! Cry classification endpoint
//!
//! POST /classify with a multipart form field `file`.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};
use cry_core::{Classification, TARGET_SAMPLE_RATE};
use tracing::{debug, info};

use crate::{
    audio,
    error::{ApiError, ApiResult},
    AppState,
};

/// Multipart form field carrying the clip
pub const FILE_FIELD: &str = "file";

/// File part pulled out of the multipart body
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// POST /classify
///
/// Decodes the uploaded clip, classifies it, and returns the reason with
/// the features it was derived from. Decoding and feature extraction run
/// on the blocking pool.
pub async fn classify_audio(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Classification>> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Request is not a usable multipart body: {}", rejection);
        ApiError::MissingFile
    })?;

    let upload = read_file_field(&mut multipart, state.config.max_upload_bytes).await?;
    let filename = upload.filename.clone();
    let size = upload.bytes.len();

    let classification = tokio::task::spawn_blocking(move || classify_upload(upload))
        .await
        .map_err(|e| ApiError::Internal(format!("classification task failed: {}", e)))??;

    info!(
        filename = %filename,
        bytes = size,
        reason = %classification.reason,
        zero_crossing_rate = classification.features.zero_crossing_rate,
        rms_energy = classification.features.rms_energy,
        spectral_centroid = classification.features.spectral_centroid,
        "Cry classified"
    );

    Ok(Json(classification))
}

/// Find the first `file` part that carries a filename.
///
/// Parts without a filename are plain form values, not uploads, and are
/// skipped the same way as parts with other names.
pub async fn read_file_field(multipart: &mut Multipart, limit: usize) -> ApiResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
        return Ok(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::MissingFile)
}

fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(limit)
    } else {
        debug!("Malformed multipart body: {}", err);
        ApiError::MissingFile
    }
}

/// Decode and classify one upload (blocking)
pub fn classify_upload(upload: Upload) -> ApiResult<Classification> {
    let clip = audio::load_clip(upload.bytes, &upload.filename, TARGET_SAMPLE_RATE)?;
    if clip.samples.is_empty() {
        return Err(ApiError::EmptyAudio);
    }

    debug!(
        filename = %upload.filename,
        samples = clip.samples.len(),
        source_channels = clip.channels,
        duration_seconds = clip.duration_seconds,
        "Clip decoded"
    );

    Ok(cry_core::classify(&clip.samples, clip.sample_rate)?)
}

/// Build classification routes
pub fn classify_routes() -> Router<AppState> {
    Router::new().route("/classify", post(classify_audio))
}
