//! Admin REST surface for spawning, listing, and scramming kernels.
//! Grounded on `runtimed/src/routes.rs` and `runtimed/src/state.rs`, with
//! the registry itself supplied by `ignition_kernel::KernelRegistry` since
//! this admin surface owns the kernels it serves rather than attaching to
//! externally-running processes.
pub mod routes;
pub mod spawn;
pub mod state;

pub use routes::kernel_routes;
pub use state::AppState;
