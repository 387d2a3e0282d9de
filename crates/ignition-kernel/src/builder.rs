//! Scoped reply builder.
//!
//! The original kernel core builds every outgoing message through a
//! `ContextManagedMessage` context manager (`messages.py`): enter the scope,
//! fill in content, and on a clean exit the message is packaged (header,
//! parent header, ids/topic) and sent; on an exit with an exception the
//! reply is abandoned instead of going out half-built.
//!
//! Rust has no `__exit__`-on-unwind equivalent for an async send, so the
//! same contract is expressed as a combinator: build the content, and only
//! send it if building produced `Ok`. A build failure never reaches the
//! socket.
use jupyter_protocol::JupyterMessage;
use runtimelib::connection::Connection;
use zeromq::SocketSend;

use crate::errors::Result;

/// Builds a reply with `build`, and sends it over `socket` only if `build`
/// succeeded. If `build` fails, the error is logged and returned; nothing
/// is sent. `build` is expected to hand back a message already addressed
/// to `parent` (via `as_child_of`); this function does not stamp parent
/// fields a second time, so a build closure that forgets `as_child_of`
/// sends an unparented message rather than getting one silently fixed up.
pub async fn scoped_reply<S, F>(
    socket: &mut Connection<S>,
    parent: &JupyterMessage,
    build: F,
) -> Result<()>
where
    S: SocketSend,
    F: FnOnce() -> Result<JupyterMessage>,
{
    match build() {
        Ok(message) => {
            socket.send(message).await?;
            Ok(())
        }
        Err(err) => {
            log::warn!("reply to {} abandoned: {err}", parent.message_type());
            Err(err)
        }
    }
}

/// Broadcasts `content` on iopub as a reply to `parent`, unconditionally
/// (the iopub analogue of `scoped_reply` for messages that are never
/// abandoned on error because they only get constructed from data already
/// in hand, e.g. `Status`, `ExecuteInput`, `StreamContent`).
///
/// `parent` supplies the parent header a subscriber correlates a broadcast
/// with, but the outbound routing identities are *not* copied from it the
/// way a reply's are: a broadcast replaces them with the single topic
/// string `kernel.<kernel_id>.<msg_type>`, so a PUB/SUB subscriber can
/// filter by kernel and message type without decoding every frame.
pub async fn broadcast<S>(
    socket: &mut Connection<S>,
    parent: &JupyterMessage,
    kernel_id: &str,
    content: impl Into<jupyter_protocol::JupyterMessageContent>,
) -> Result<()>
where
    S: SocketSend,
{
    let content = content.into();
    let topic = topic_for(kernel_id, content.message_type());
    let message = JupyterMessage::new(content, Some(parent))
        .with_zmq_identities(vec![topic.into_bytes().into()]);
    socket.send(message).await?;
    Ok(())
}

/// The PUB/SUB topic an iopub broadcast is addressed with, letting a
/// subscriber filter by kernel and message type without decoding a frame.
pub fn topic_for(kernel_id: &str, msg_type: &str) -> String {
    format!("kernel.{kernel_id}.{msg_type}")
}

#[cfg(test)]
mod tests {
    use super::topic_for;

    #[test]
    fn topic_includes_kernel_id_and_msg_type() {
        assert_eq!(
            topic_for("abc-123", "execute_result"),
            "kernel.abc-123.execute_result"
        );
    }
}
