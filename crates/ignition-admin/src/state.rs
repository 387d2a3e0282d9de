//! Shared Axum application state: the process-wide kernel registry plus the
//! configuration new kernels are launched with. Grounded on
//! `runtimed/src/state.rs`'s `AppState { dbpool, runtimes }` — here there is
//! no database, since kernels are owned in-process rather than merely
//! observed.
use std::sync::Arc;

use ignition_kernel::{Kernel, KernelConfig, KernelRegistry};

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<KernelRegistry>,
    pub config: KernelConfig,
}

impl AppState {
    pub fn new(config: KernelConfig) -> Self {
        AppState {
            registry: Arc::new(KernelRegistry::new()),
            config,
        }
    }
}

pub type SharedState = axum::extract::State<AppState>;

/// A small helper so route handlers can fetch a kernel or bail with 404 in
/// one line, the same shape as `runtimed/src/routes.rs`'s
/// `.ok_or(StatusCode::NOT_FOUND)?` calls.
pub fn lookup(state: &AppState, kernel_id: &str) -> Option<Arc<Kernel>> {
    state.registry.get(kernel_id)
}
