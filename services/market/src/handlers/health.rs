use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use crate::state::AppState;

/// `GET /healthz`: liveness.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// `GET /readyz`: ready once the data directory (if any) is reachable.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    let Some(dir) = state.data_dir.as_deref() else {
        return StatusCode::OK;
    };
    // A missing directory is fine: the first flush creates it.
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => StatusCode::OK,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => StatusCode::OK,
        Ok(_) => {
            warn!(path = %dir.display(), "data path is not a directory");
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "data directory unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
