pub use jupyter_protocol::messaging::*;
// For backwards compatibility, for now:
pub mod content {
    pub use jupyter_protocol::messaging::*;
}

#[cfg(any(feature = "tokio-runtime", feature = "async-dispatcher-runtime"))]
mod native;

#[cfg(any(feature = "tokio-runtime", feature = "async-dispatcher-runtime"))]
pub use native::*;
