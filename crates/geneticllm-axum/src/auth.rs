//! `X-API-Key` middleware.
//!
//! Applied with `route_layer` on the protected routes only, so it runs
//! before any body extraction and never touches `/health` or `/ready`.

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use crate::error::HttpError;
use crate::state::AppState;

/// Header carrying the caller's API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Check the caller's key and attach the resulting
/// [`Identity`](geneticllm_core::Identity) as a request extension.
///
/// The raw header bytes go to the gate, so non-ASCII keys are compared
/// as UTF-8 rather than rejected up front.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let presented = req.headers().get(API_KEY_HEADER).map(HeaderValue::as_bytes);

    let identity = state.gate.authorize_bytes(presented).inspect_err(|_| {
        debug!(path = %req.uri().path(), "Unauthorized API request");
    })?;

    debug!(identity = %identity.redacted(), "Authorized request");
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
