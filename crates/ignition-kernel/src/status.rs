//! Status broadcaster.
//!
//! Every handled shell/control message is wrapped in a `busy` / `idle` pair
//! on iopub, unconditionally, even if the handler itself errors — grounded
//! on `ollama-kernel`'s `handle_shell_message` (busy sent before dispatch,
//! idle sent after, regardless of which branch ran) and on
//! `messages.py`'s `_handle_zmessage`, which wraps the dispatch call in a
//! `finally: declare_idle(...)`. Heartbeat is exempt; it never goes through
//! this wrapper.
use jupyter_protocol::{JupyterMessage, Status};
use runtimelib::KernelIoPubConnection;

use crate::builder::{broadcast, topic_for};
use crate::errors::Result;

/// Runs `handler`, broadcasting `busy` before it starts and `idle` after it
/// finishes, whether or not `handler` returned an error. `handler` is
/// handed the same `iopub` connection this function uses for the
/// busy/idle pair, since both share the single PUB socket and can't hold
/// independent borrows of it at once.
pub async fn with_busy_idle<F, Fut, T>(
    iopub: &mut KernelIoPubConnection,
    parent: &JupyterMessage,
    kernel_id: &str,
    handler: F,
) -> Result<T>
where
    F: FnOnce(&mut KernelIoPubConnection) -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    broadcast(iopub, parent, kernel_id, Status::busy()).await?;
    let outcome = handler(iopub).await;
    broadcast(iopub, parent, kernel_id, Status::idle()).await?;
    outcome
}

/// Broadcasts `starting` followed immediately by `idle`, sent once right
/// after a kernel finishes binding its sockets and before it starts
/// polling. There is no parent request at this point, so both are built
/// directly rather than through `broadcast`, which exists to route a
/// reply's topic off of one.
pub async fn declare_starting(iopub: &mut KernelIoPubConnection, kernel_id: &str) -> Result<()> {
    for status in launch_sequence() {
        let content: jupyter_protocol::JupyterMessageContent = status.into();
        let topic = topic_for(kernel_id, content.message_type());
        let message =
            JupyterMessage::new(content, None).with_zmq_identities(vec![topic.into_bytes().into()]);
        iopub.send(message).await?;
    }
    Ok(())
}

/// The status sequence a kernel announces once its sockets are bound and
/// before it starts polling: `starting`, then `idle` once it's actually
/// ready to receive requests.
fn launch_sequence() -> [Status; 2] {
    [Status::starting(), Status::idle()]
}

#[cfg(test)]
mod tests {
    use jupyter_protocol::ExecutionState;

    use super::launch_sequence;

    #[test]
    fn launch_sequence_is_starting_then_idle() {
        let [first, second] = launch_sequence();
        assert_eq!(first.execution_state, ExecutionState::Starting);
        assert_eq!(second.execution_state, ExecutionState::Idle);
    }
}
