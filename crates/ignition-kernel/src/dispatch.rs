//! Handler dispatch: one function per `msg_type`, keyed the way
//! `EXECUTION_DISPATCH`/`KERNEL_INFO_DISPATCH`-style tables are in the
//! original (`handlers/dispatch/execution.py`'s `EXECUTION_DISPATCH =
//! {'execute_request': execute_request}`). Every call here runs inside the
//! status broadcaster's busy/idle wrapper; this module only decides what
//! happens in between.
use std::sync::atomic::Ordering;

use jupyter_protocol::{
    CommInfoReply, CompleteReply, CompleteRequest, ErrorOutput, ExecuteInput, ExecuteReply,
    ExecuteRequest, ExecuteResult, HistoryReply, HistoryRequest, InspectReply, InspectRequest,
    IsCompleteReply, IsCompleteRequest, JupyterMessage, JupyterMessageContent, KernelInfoReply,
    Media, MediaType, ReplyStatus, StreamContent,
};
use runtimelib::{KernelIoPubConnection, KernelShellConnection};

use crate::builder::{broadcast, scoped_reply};
use crate::errors::Result;
use crate::execution::{ErrorKind, ExecutionSession};
use crate::script_engine::ScriptEngine;
use crate::InterruptFlag;

/// Handles one shell- or control-channel message and, where the message
/// type calls for a shell/control reply, sends it. `reply_socket` is either
/// the shell or the control connection — both are `Connection<RouterSocket>`
/// under the hood, so the same dispatch serves either channel the way
/// `_handle_zmessage` does in the original.
pub async fn dispatch_message(
    parent: &JupyterMessage,
    reply_socket: &mut KernelShellConnection,
    iopub: &mut KernelIoPubConnection,
    session: &mut ExecutionSession,
    engine: &mut dyn ScriptEngine,
    interrupted: &InterruptFlag,
    kernel_info: &KernelInfoReply,
    kernel_id: &str,
) -> Result<()> {
    match &parent.content {
        JupyterMessageContent::KernelInfoRequest(_) => {
            let info = kernel_info.clone();
            scoped_reply(reply_socket, parent, || Ok(info.as_child_of(parent))).await?;
        }
        JupyterMessageContent::ExecuteRequest(request) => {
            execute_request(
                parent, request, reply_socket, iopub, session, engine, interrupted, kernel_id,
            )
            .await?;
        }
        JupyterMessageContent::CompleteRequest(request) => {
            let reply = complete_request(request);
            scoped_reply(reply_socket, parent, || Ok(reply.as_child_of(parent))).await?;
        }
        JupyterMessageContent::IsCompleteRequest(request) => {
            let reply = is_complete_request(request, engine);
            scoped_reply(reply_socket, parent, || Ok(reply.as_child_of(parent))).await?;
        }
        JupyterMessageContent::InspectRequest(request) => {
            let reply = inspect_request(request, session);
            scoped_reply(reply_socket, parent, || Ok(reply.as_child_of(parent))).await?;
        }
        JupyterMessageContent::HistoryRequest(request) => {
            let reply = history_request(request, session);
            scoped_reply(reply_socket, parent, || Ok(reply.as_child_of(parent))).await?;
        }
        JupyterMessageContent::CommInfoRequest(_) => {
            let reply = CommInfoReply {
                status: ReplyStatus::Ok,
                comms: Default::default(),
                error: None,
            };
            scoped_reply(reply_socket, parent, || Ok(reply.as_child_of(parent))).await?;
        }
        _ => {
            log::debug!("no handler for message type {}", parent.message_type());
        }
    }
    Ok(())
}

/// The canonical execute_request flow, grounded on
/// `handlers/dispatch/execution.py::execute_request`:
/// special-case silent+empty code (preview the next execution_count,
/// no side effects), otherwise broadcast `execute_input` before running,
/// run the code, broadcast `stream` (stdout then stderr-as-traceback) and
/// then `error` if it failed, then `execute_result` if there's a display
/// value, then reply on shell with the final status.
async fn execute_request(
    parent: &JupyterMessage,
    request: &ExecuteRequest,
    shell: &mut KernelShellConnection,
    iopub: &mut KernelIoPubConnection,
    session: &mut ExecutionSession,
    engine: &mut dyn ScriptEngine,
    interrupted: &InterruptFlag,
    kernel_id: &str,
) -> Result<()> {
    let silent = request.silent;
    let store_history = request.store_history && !silent;

    if silent && request.code.trim().is_empty() {
        let preview_count = session.execution_count() + 1;
        broadcast(
            iopub,
            parent,
            kernel_id,
            ExecuteInput {
                code: request.code.clone(),
                execution_count: preview_count.into(),
            },
        )
        .await?;
        let reply = ExecuteReply {
            status: ReplyStatus::Ok,
            execution_count: session.execution_count().into(),
            payload: Vec::new(),
            user_expressions: None,
            error: None,
        };
        scoped_reply(shell, parent, || Ok(reply.as_child_of(parent))).await?;
        return Ok(());
    }

    let preview_count = session.execution_count() + if store_history { 1 } else { 0 };
    broadcast(
        iopub,
        parent,
        kernel_id,
        ExecuteInput {
            code: request.code.clone(),
            execution_count: preview_count.into(),
        },
    )
    .await?;

    let result = session.execute(
        engine,
        &request.code,
        store_history,
        None,
        interrupted.inner(),
    );

    if silent {
        return Ok(());
    }

    if !result.stdout.is_empty() {
        broadcast(iopub, parent, kernel_id, StreamContent::stdout(&result.stdout)).await?;
    }

    if let Some(error) = &result.error {
        if !error.evalue.is_empty() || error.kind != ErrorKind::Abort {
            broadcast(
                iopub,
                parent,
                kernel_id,
                StreamContent::stderr(&error.traceback.join("\n")),
            )
            .await?;
        }
        broadcast(
            iopub,
            parent,
            kernel_id,
            ErrorOutput {
                ename: error.ename.clone(),
                evalue: error.evalue.clone(),
                traceback: error.traceback.clone(),
            },
        )
        .await?;
    } else if let Some(display) = &result.display {
        let execute_result: ExecuteResult =
            (session.execution_count().into(), MediaType::Plain(display.to_string())).into();
        broadcast(iopub, parent, kernel_id, execute_result).await?;
    }

    let reply = if let Some(error) = &result.error {
        let status = if error.kind == ErrorKind::Abort {
            ReplyStatus::Aborted
        } else {
            ReplyStatus::Error
        };
        ExecuteReply {
            status,
            execution_count: session.execution_count().into(),
            payload: Vec::new(),
            user_expressions: None,
            error: Some(Box::new(jupyter_protocol::ReplyError {
                ename: error.ename.clone(),
                evalue: error.evalue.clone(),
                traceback: error.traceback.clone(),
            })),
        }
    } else {
        ExecuteReply {
            status: ReplyStatus::Ok,
            execution_count: session.execution_count().into(),
            payload: Vec::new(),
            user_expressions: None,
            error: None,
        }
    };
    scoped_reply(shell, parent, || Ok(reply.as_child_of(parent))).await?;

    Ok(())
}

fn complete_request(request: &CompleteRequest) -> CompleteReply {
    // No real completion engine is wired up for the reference script
    // engine; report no matches rather than guessing.
    CompleteReply {
        matches: Vec::new(),
        cursor_start: request.cursor_pos,
        cursor_end: request.cursor_pos,
        metadata: Default::default(),
        status: ReplyStatus::Ok,
        error: None,
    }
}

fn is_complete_request(request: &IsCompleteRequest, engine: &dyn ScriptEngine) -> IsCompleteReply {
    match engine.split_statements(&request.code) {
        Ok(statements) if !statements.is_empty() => IsCompleteReply::complete(),
        Ok(_) => IsCompleteReply::incomplete(String::new()),
        Err(_) => IsCompleteReply::invalid(),
    }
}

fn inspect_request(request: &InspectRequest, session: &ExecutionSession) -> InspectReply {
    let name = request.code.trim();
    match session.get(-1) {
        Some(last) if last.code.contains(name) => InspectReply {
            found: true,
            data: Media::from(MediaType::Plain(format!("last executed: {}", last.code))),
            metadata: Default::default(),
            status: ReplyStatus::Ok,
            error: None,
        },
        _ => InspectReply::default(),
    }
}

fn history_request(request: &HistoryRequest, session: &ExecutionSession) -> HistoryReply {
    let entries = match request {
        HistoryRequest::Tail { n, .. } => {
            let n = (*n).max(0) as usize;
            let start = session.execution_count().saturating_sub(n) + 1;
            (start..=session.execution_count())
                .filter_map(|ix| session.get(ix as isize))
                .enumerate()
                .map(|(offset, result)| {
                    jupyter_protocol::HistoryEntry::Input(
                        0,
                        start + offset,
                        result.code.clone(),
                    )
                })
                .collect()
        }
        _ => Vec::new(),
    };
    HistoryReply::new(entries)
}

/// Polls `interrupted` as a side effect, the way `is_interrupted` does in
/// the original core — checked at the same statement boundaries execution
/// checks at, never mid-statement.
pub fn check_interrupted(flag: &InterruptFlag) -> bool {
    flag.inner().load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use crate::script_engine::EchoEngine;

    use super::*;

    #[test]
    fn complete_request_reports_no_matches() {
        let request = CompleteRequest {
            code: "foo".to_string(),
            cursor_pos: 3,
        };
        let reply = complete_request(&request);
        assert!(reply.matches.is_empty());
        assert_eq!(reply.cursor_start, 3);
        assert_eq!(reply.cursor_end, 3);
    }

    #[test]
    fn is_complete_request_reports_complete_for_nonempty_code() {
        let engine = EchoEngine;
        let request = IsCompleteRequest {
            code: "print(1)".to_string(),
        };
        let reply = is_complete_request(&request, &engine);
        assert_eq!(reply.status, jupyter_protocol::IsCompleteReplyStatus::Complete);
    }

    #[test]
    fn inspect_request_misses_with_empty_history() {
        let session = ExecutionSession::new("session-1".to_string());
        let request = InspectRequest {
            code: "anything".to_string(),
            cursor_pos: 0,
            detail_level: 0,
        };
        let reply = inspect_request(&request, &session);
        assert!(!reply.found);
    }

    #[test]
    fn history_request_tail_is_empty_for_fresh_session() {
        let session = ExecutionSession::new("session-1".to_string());
        let request = HistoryRequest::Tail {
            n: 5,
            output: false,
            raw: true,
        };
        let reply = history_request(&request, &session);
        assert!(reply.history.is_empty());
    }

    #[test]
    fn check_interrupted_reflects_the_flag() {
        let flag = InterruptFlag::new();
        assert!(!check_interrupted(&flag));
        flag.set();
        assert!(check_interrupted(&flag));
    }
}
