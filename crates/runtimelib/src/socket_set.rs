//! Groups the five kernel-side sockets a launched kernel binds, and the
//! timing constants that govern its poll loops.
//!
//! Mirrors the slot layout of the original kernel core's socket roles:
//! heartbeat and control are polled by one loop ("process"), shell and
//! iopub by another ("execution"), so a long-running execution never
//! blocks interrupt delivery or heartbeat replies.
use std::time::Duration;

use crate::connection::{
    create_kernel_control_connection, create_kernel_heartbeat_connection,
    create_kernel_iopub_connection, create_kernel_shell_connection,
    create_kernel_stdin_connection, KernelControlConnection, KernelHeartbeatConnection,
    KernelIoPubConnection, KernelShellConnection, KernelStdinConnection,
};
use crate::Result;
use jupyter_protocol::ConnectionInfo;

/// How long a poll loop idles between checking `interrupted` when there is
/// no message waiting. Matches the original core's `loop_delay`.
pub const LOOP_DELAY: Duration = Duration::from_millis(50);

/// How long tear_down waits for in-flight poll iterations to notice a
/// closed socket before the ZeroMQ context itself is dropped. Matches the
/// original core's `lingering_delay`.
pub const LINGERING_DELAY: Duration = Duration::from_millis(350);

/// Default cardiac-arrest deadline: how long the supervisor tolerates a
/// kernel going without a heartbeat before declaring it dead.
pub const CARDIAC_ARREST_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Sockets driven by the "process" loop: heartbeat and control. Kept
/// independent of the execution loop so interrupts and heartbeats are never
/// starved by a long-running statement.
pub struct ProcessSockets {
    pub heartbeat: KernelHeartbeatConnection,
    pub control: KernelControlConnection,
}

/// Sockets driven by the "execution" loop: shell, iopub, and stdin.
pub struct ExecutionSockets {
    pub shell: KernelShellConnection,
    pub iopub: KernelIoPubConnection,
    pub stdin: KernelStdinConnection,
}

/// Binds all five kernel-side sockets for a connection file and session.
pub async fn bind_all(
    connection_info: &ConnectionInfo,
    session_id: &str,
) -> Result<(ProcessSockets, ExecutionSockets)> {
    let heartbeat = create_kernel_heartbeat_connection(connection_info).await?;
    let control = create_kernel_control_connection(connection_info, session_id).await?;
    let shell = create_kernel_shell_connection(connection_info, session_id).await?;
    let iopub = create_kernel_iopub_connection(connection_info, session_id).await?;
    let stdin = create_kernel_stdin_connection(connection_info, session_id).await?;

    Ok((
        ProcessSockets { heartbeat, control },
        ExecutionSockets {
            shell,
            iopub,
            stdin,
        },
    ))
}
