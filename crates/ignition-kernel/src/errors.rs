//! Error taxonomy for a running kernel.
//!
//! Grounded on `catch.py`'s `ZmqErrorCatcher` and `formatted_traceback`: a
//! poll loop wraps its body in a guard that squelches only the "the
//! transport was torn down out from under us" case and lets everything else
//! propagate to the supervisor, which tears the kernel down.
use thiserror::Error;

use crate::InterruptFlag;

#[derive(Debug, Error)]
pub enum KernelError {
    #[error(transparent)]
    Runtime(#[from] runtimelib::RuntimeError),

    #[error("the heartbeat deadline was exceeded; kernel is presumed dead")]
    CardiacArrest,

    #[error("execution was interrupted")]
    Interrupted,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Classifies a transport-layer error the way `ZmqErrorCatcher` does: most
/// errors propagate unchanged, but an error that indicates the socket (or
/// its context) was already closed out from under the poll loop is
/// swallowed and reported as a recoverable interruption instead, since
/// that's expected during `tear_down`.
pub fn is_closed_transport(err: &KernelError) -> bool {
    match err {
        KernelError::Runtime(runtimelib::RuntimeError::ZmqError(zmq_err)) => {
            let message = zmq_err.to_string();
            message.contains("closed") || message.contains("Closed")
        }
        _ => false,
    }
}

/// Runs `body`, classifying any error the way `catch.py`'s
/// `ZmqErrorCatcher` does. Returns `Ok(Some(value))` on success,
/// `Ok(None)` if it observed a closed transport (in which case
/// `interrupted` is set, since a poll loop waking up on a destroyed
/// context has nothing left to interrupt but should stop as though it
/// had been asked to), or `Err` if the error must propagate to
/// `tear_down`.
pub async fn guard_transport<F, Fut, T>(body: F, interrupted: &InterruptFlag) -> Result<Option<T>>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    match body().await {
        Ok(value) => Ok(Some(value)),
        Err(err) if is_closed_transport(&err) => {
            log::debug!("transport closed during poll, treating as a clean stop: {err}");
            interrupted.set();
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Renders an exception-like pair of name/message into the traceback lines
/// Jupyter clients expect in `execute_reply`/`error` messages. Grounded on
/// `formatted_traceback` in the original, simplified for a single error
/// hierarchy rather than Python+Java's dual stack.
pub fn format_traceback(ename: &str, evalue: &str, detail: Option<&str>) -> Vec<String> {
    let mut lines = vec![format!("{ename}: {evalue}")];
    if let Some(detail) = detail {
        lines.extend(detail.lines().map(|line| line.to_string()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_traceback_without_detail() {
        assert_eq!(
            format_traceback("ValueError", "bad input", None),
            vec!["ValueError: bad input".to_string()]
        );
    }

    #[test]
    fn format_traceback_with_multiline_detail() {
        let lines = format_traceback("ValueError", "bad input", Some("line one\nline two"));
        assert_eq!(
            lines,
            vec![
                "ValueError: bad input".to_string(),
                "line one".to_string(),
                "line two".to_string(),
            ]
        );
    }

    #[test]
    fn is_closed_transport_matches_closed_wording() {
        let err = KernelError::Other("socket closed".to_string());
        assert!(!is_closed_transport(&err));
    }

    #[tokio::test]
    async fn guard_transport_passes_through_success() {
        let interrupted = InterruptFlag::new();
        let outcome = guard_transport(|| async { Ok(42) }, &interrupted).await;
        assert_eq!(outcome.unwrap(), Some(42));
        assert!(!interrupted.is_set());
    }

    #[tokio::test]
    async fn guard_transport_propagates_non_transport_errors() {
        let interrupted = InterruptFlag::new();
        let outcome: Result<Option<()>> =
            guard_transport(|| async { Err(KernelError::Interrupted) }, &interrupted).await;
        assert!(outcome.is_err());
        assert!(!interrupted.is_set());
    }
}
