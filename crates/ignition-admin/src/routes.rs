//! The admin REST surface: bit-exact paths and verbs, grounded on
//! `runtimed/src/routes.rs`'s `instance_routes()` shape (one `Router`
//! builder function, one handler per route, `StatusCode` for the error
//! path) but driving an in-process `KernelRegistry` instead of attached
//! external processes.
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::{get, head};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::spawn::{options_drifted, spawn_kernel, KernelInfoResponse, SpawnOptions};
use crate::state::{lookup, AppState};

pub fn kernel_routes() -> Router<AppState> {
    Router::new()
        .route("/kernel", get(list_kernels).post(spawn).delete(scram_all))
        .route(
            "/kernel/:id",
            head(kernel_head).get(get_kernel).delete(delete_kernel),
        )
}

async fn kernel_head(
    Path(id): Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> StatusCode {
    if lookup(&state, &id).is_some() {
        StatusCode::OK
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn list_kernels(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<Vec<String>> {
    Json(state.registry.ids())
}

async fn get_kernel(
    Path(id): Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Result<Json<KernelInfoResponse>, StatusCode> {
    let kernel = lookup(&state, &id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(KernelInfoResponse {
        kernel_id: kernel.kernel_id.clone(),
        connection_info: kernel.connection_info.clone(),
    }))
}

/// `POST /kernel` with JSON body of kernel options. Spawns a new kernel, or
/// if `kernel_id` already names a live one, returns its existing info
/// (warning rather than respawning if the requested options drifted from
/// what that kernel was actually launched with).
async fn spawn(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(options): Json<SpawnOptions>,
) -> Result<Json<KernelInfoResponse>, (StatusCode, String)> {
    if let Some(kernel_id) = &options.kernel_id {
        if let Some(kernel) = lookup(&state, kernel_id) {
            if options_drifted(&options, &kernel.connection_info) {
                log::warn!(
                    "POST /kernel for already-live kernel {kernel_id} requested options that differ from how it was launched; ignoring the new options"
                );
            }
            return Ok(Json(KernelInfoResponse {
                kernel_id: kernel.kernel_id.clone(),
                connection_info: kernel.connection_info.clone(),
            }));
        }
    }

    let (kernel, connection_info) = spawn_kernel(&options, &state.config)
        .await
        .map_err(|err| (StatusCode::BAD_REQUEST, format!("{err:?}")))?;
    let kernel_id = kernel.kernel_id.clone();
    state.registry.insert(kernel);

    Ok(Json(KernelInfoResponse {
        kernel_id,
        connection_info,
    }))
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DeleteBody {
    signal: Option<i32>,
}

#[derive(Debug, Serialize)]
struct ScramResponse {
    scrammed: Vec<String>,
}

/// `DELETE /kernel/{id}` scrams one kernel, unless the body carries
/// `{"signal":15}` (SIGTERM), in which case the kernel's session is
/// restarted in place instead of tearing the kernel itself down. The body
/// is optional; a missing or empty one is treated the same as `{}`.
async fn delete_kernel(
    Path(id): Path<String>,
    axum::extract::State(state): axum::extract::State<AppState>,
    body: axum::body::Bytes,
) -> Result<Json<ScramResponse>, StatusCode> {
    let signal = if body.is_empty() {
        None
    } else {
        serde_json::from_slice::<DeleteBody>(&body)
            .ok()
            .and_then(|b| b.signal)
    };

    if signal == Some(15) {
        let kernel = lookup(&state, &id).ok_or(StatusCode::NOT_FOUND)?;
        kernel.restart_session().await;
        return Ok(Json(ScramResponse {
            scrammed: Vec::new(),
        }));
    }

    match state.registry.scram(&id).await {
        Some(id) => Ok(Json(ScramResponse { scrammed: vec![id] })),
        None => Err(StatusCode::NOT_FOUND),
    }
}

async fn scram_all(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<ScramResponse> {
    Json(ScramResponse {
        scrammed: state.registry.scram_all().await,
    })
}
