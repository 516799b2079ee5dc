//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    ChecksumRequest, ChecksumResponse, DecryptRequest, DecryptResponse, DeriveKeyRequest,
    DeriveKeyResponse, EncryptRequest, EncryptResponse, ErrorResponse, HealthResponse,
    InputEncoding,
};
use common::ServiceError;
use seal_core::{codec, CryptoError, Key};
use tracing::{debug, error, warn};

use super::state::AppState;

/// A [`ServiceError`] rendered as a JSON [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<CryptoError> for ApiError {
    fn from(err: CryptoError) -> Self {
        let service = match err {
            CryptoError::InvalidKeyLength(_)
            | CryptoError::MalformedEncoding(_)
            | CryptoError::InvalidUtf8 => ServiceError::BadRequest(err.to_string()),
            CryptoError::AuthenticationFailed => ServiceError::AuthenticationFailed,
            CryptoError::EncryptionFailed => ServiceError::EncryptionFailure(err.to_string()),
            CryptoError::EntropyUnavailable => ServiceError::Unavailable(err.to_string()),
            CryptoError::DerivationError { .. } => ServiceError::Internal(err.to_string()),
        };
        Self(service)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ServiceError::BadRequest(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.code(), error = %self.0, "request failed");
        } else {
            warn!(code = self.0.code(), "request rejected");
        }
        let body = ErrorResponse::new(self.0.code(), self.0.to_string());
        (status, Json(body)).into_response()
    }
}

/// JSON request body whose rejections are reported as [`ApiError`].
///
/// Missing fields, unknown enum values and bad content types become
/// `400 bad_request` with an [`ErrorResponse`] body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// `POST /keys/derive` — derive a 16-byte key from a master secret and salt.
///
/// Without a salt the current Unix time in milliseconds is used and echoed
/// back, since the caller needs it to derive the same key again.
pub async fn derive_key(
    JsonBody(req): JsonBody<DeriveKeyRequest>,
) -> Result<Json<DeriveKeyResponse>, ApiError> {
    let salt = req.salt.unwrap_or_else(seal_core::timestamp_salt);
    let key = seal_core::derive_key(&req.master_secret, &salt)?;
    debug!(salt_len = salt.len(), "key derived");
    Ok(Json(DeriveKeyResponse {
        key: key.to_base64(),
        salt,
    }))
}

/// `POST /encrypt` — seal the plaintext, returning payload, nonce and tag.
pub async fn encrypt(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<EncryptRequest>,
) -> Result<Json<EncryptResponse>, ApiError> {
    let key = request_key(&req.key, req.key_encoding, &state)?;
    let envelope = seal_core::encrypt_with(&req.plaintext, key.as_bytes(), state.random.as_ref())?;
    debug!(
        plaintext_len = req.plaintext.len(),
        key_len = key.len(),
        "plaintext sealed"
    );
    Ok(Json(EncryptResponse {
        payload: envelope.payload,
        nonce: envelope.nonce,
        tag: envelope.tag,
        checksum: seal_core::checksum(req.plaintext.as_bytes()),
    }))
}

/// `POST /decrypt` — authenticate and open an envelope.
pub async fn decrypt(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DecryptRequest>,
) -> Result<Json<DecryptResponse>, ApiError> {
    let key = request_key(&req.key, req.key_encoding, &state)?;
    let plaintext = seal_core::decrypt(&req.payload, key.as_bytes(), &req.nonce, &req.tag)?;
    debug!(plaintext_len = plaintext.len(), "envelope opened");
    let checksum = seal_core::checksum(plaintext.as_bytes());
    Ok(Json(DecryptResponse {
        plaintext,
        checksum,
    }))
}

/// `POST /checksum` — SHA-256 of the decoded data as lowercase hex.
///
/// When `expected` is given the response also says whether it matches.
pub async fn checksum(
    JsonBody(req): JsonBody<ChecksumRequest>,
) -> Result<Json<ChecksumResponse>, ApiError> {
    let data = decode_input(&req.data, req.encoding, "data")?;
    let matches = req
        .expected
        .as_deref()
        .map(|expected| seal_core::verify_checksum(&data, expected));
    Ok(Json(ChecksumResponse {
        checksum: seal_core::checksum(&data),
        matches,
    }))
}

/// `GET /health` — liveness check.
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

/// Turn the request's key text into key bytes.
fn request_key(
    text: &str,
    encoding: Option<InputEncoding>,
    state: &AppState,
) -> Result<Key, CryptoError> {
    match encoding.unwrap_or(state.default_key_encoding) {
        InputEncoding::Utf8 => Ok(Key::from_utf8(text)),
        InputEncoding::Base64 => Key::from_base64(text),
        InputEncoding::Hex => Key::from_hex(text),
    }
}

fn decode_input(
    text: &str,
    encoding: InputEncoding,
    field: &'static str,
) -> Result<Vec<u8>, CryptoError> {
    match encoding {
        InputEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        InputEncoding::Base64 => codec::from_base64(text),
        InputEncoding::Hex => codec::from_hex(text),
    }
    .map_err(|_| CryptoError::MalformedEncoding(field))
}
