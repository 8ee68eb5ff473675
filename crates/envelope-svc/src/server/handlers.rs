//! Axum request handlers for all service endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DeriveKeyRequest, DeriveKeyResponse, ErrorResponse, FingerprintRequest, FingerprintResponse,
    HashRequest, HashResponse, HealthResponse, HmacRequest, HmacResponse, OpenMessageResponse,
    OpenObjectResponse, OpenRequest, SaltResponse, SealMessageRequest, SealObjectRequest,
    SealResponse,
};
use common::ServiceError;
use envelope::crypto;
use envelope::fingerprint::{self, DEFAULT_CHAR_COUNT, DEFAULT_VISUAL_COUNT};
use envelope::EnvelopeError;
use tracing::{error, warn};

use super::state::AppState;

/// Largest fingerprint a request may ask for; one symbol per hash byte.
const MAX_FINGERPRINT_COUNT: usize = 64;

/// Largest SHA-512 round count a request may ask for.
const MAX_HASH_ITERATIONS: u32 = 1_000_000;

/// Handler error: a [`ServiceError`] rendered as status + [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self(e)
    }
}

impl From<EnvelopeError> for ApiError {
    fn from(e: EnvelopeError) -> Self {
        // Never include the envelope, key, or plaintext in log fields.
        warn!(kind = e.kind(), "envelope operation rejected");
        Self(service_error(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// Map codec errors onto the service taxonomy.
fn service_error(e: EnvelopeError) -> ServiceError {
    match e {
        EnvelopeError::Integrity => ServiceError::IntegrityFailure,
        EnvelopeError::Decryption(inner) => ServiceError::DecryptionFailure(inner.to_string()),
        EnvelopeError::MalformedEnvelope(_)
        | EnvelopeError::Serialization(_)
        | EnvelopeError::InvalidContextTag => ServiceError::BadRequest(e.to_string()),
        EnvelopeError::UnframeableField(_) | EnvelopeError::InvalidConfig(_) => {
            ServiceError::Internal(e.to_string())
        }
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

/// `POST /v1/message/seal`: seal a text message.
pub async fn seal_message(
    State(state): State<AppState>,
    Json(req): Json<SealMessageRequest>,
) -> ApiResult<SealResponse> {
    let codec = state.codec(req.noise_length)?;
    let envelope = codec.seal_message(&req.plaintext, &req.key, &req.context_tag)?;
    Ok(Json(SealResponse { envelope }))
}

/// `POST /v1/message/open`: verify and decrypt a message envelope.
pub async fn open_message(
    State(state): State<AppState>,
    Json(req): Json<OpenRequest>,
) -> ApiResult<OpenMessageResponse> {
    let codec = state.codec(req.noise_length)?;
    let opened = codec.open_message_parts(&req.envelope, &req.key)?;
    Ok(Json(OpenMessageResponse {
        plaintext: opened.plaintext,
        context_tag: opened.context_tag,
    }))
}

/// `POST /v1/object/seal`: seal an arbitrary JSON value.
pub async fn seal_object(
    State(state): State<AppState>,
    Json(req): Json<SealObjectRequest>,
) -> ApiResult<SealResponse> {
    let codec = state.codec(req.noise_length)?;
    let envelope = codec.seal_object(&req.value, &req.key)?;
    Ok(Json(SealResponse { envelope }))
}

/// `POST /v1/object/open`: verify and decrypt an object envelope.
pub async fn open_object(
    State(state): State<AppState>,
    Json(req): Json<OpenRequest>,
) -> ApiResult<OpenObjectResponse> {
    let codec = state.codec(req.noise_length)?;
    let value = codec.open_object(&req.envelope, &req.key)?;
    Ok(Json(OpenObjectResponse { value }))
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// `POST /v1/hash`: iterated SHA-512.
pub async fn hash(Json(req): Json<HashRequest>) -> ApiResult<HashResponse> {
    let iterations = req.iterations.unwrap_or(1);
    if iterations > MAX_HASH_ITERATIONS {
        return Err(ServiceError::BadRequest(format!(
            "iterations must not exceed {MAX_HASH_ITERATIONS}"
        ))
        .into());
    }
    let hash = run_blocking(move || crypto::hash(&req.text, iterations)).await?;
    Ok(Json(HashResponse { hash }))
}

/// `POST /v1/hmac`: HMAC-SHA-512 tag.
pub async fn hmac(Json(req): Json<HmacRequest>) -> ApiResult<HmacResponse> {
    Ok(Json(HmacResponse {
        tag: crypto::hmac(&req.text, &req.key),
    }))
}

/// `POST /v1/derive-key`: PBKDF2-HMAC-SHA-512.
///
/// Runs on the blocking pool: high round counts take far longer than a
/// request handler should hold an executor thread.
pub async fn derive_key(
    State(state): State<AppState>,
    Json(req): Json<DeriveKeyRequest>,
) -> ApiResult<DeriveKeyResponse> {
    let iterations = state.kdf_iterations(req.iterations)?;
    let key = run_blocking(move || crypto::derive_key(&req.secret, &req.salt, iterations)).await?;
    Ok(Json(DeriveKeyResponse { key }))
}

/// `POST /v1/salt`: fresh random salt.
pub async fn salt() -> Json<SaltResponse> {
    Json(SaltResponse {
        salt: crypto::generate_salt(),
    })
}

/// `POST /v1/fingerprint`: visual and character fingerprints of a hash.
pub async fn fingerprint(Json(req): Json<FingerprintRequest>) -> ApiResult<FingerprintResponse> {
    let visual_count = req.visual_count.unwrap_or(DEFAULT_VISUAL_COUNT);
    let char_count = req.char_count.unwrap_or(DEFAULT_CHAR_COUNT);
    if visual_count > MAX_FINGERPRINT_COUNT || char_count > MAX_FINGERPRINT_COUNT {
        return Err(ServiceError::BadRequest(format!(
            "fingerprint counts must not exceed {MAX_FINGERPRINT_COUNT}"
        ))
        .into());
    }

    let bad_hash = |e: fingerprint::FingerprintError| ServiceError::BadRequest(e.to_string());
    Ok(Json(FingerprintResponse {
        visual: fingerprint::visual(&req.hash, visual_count).map_err(bad_hash)?,
        chars: fingerprint::chars(&req.hash, char_count).map_err(bad_hash)?,
    }))
}

// ---------------------------------------------------------------------------
// Health / fallback
// ---------------------------------------------------------------------------

/// `GET /health`: liveness check.
///
/// The service holds no external dependencies, so serving at all means healthy.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        error!(error = %e, "blocking task failed");
        ApiError(ServiceError::Internal("worker task failed".into()))
    })
}
