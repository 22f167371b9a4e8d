//! Shared application state type.

use crate::bootstrap::AxumContext;
use std::sync::Arc;

/// Application state shared across all handlers and middleware.
///
/// Everything inside is read-only after startup, so requests never contend.
pub type AppState = Arc<AxumContext>;
