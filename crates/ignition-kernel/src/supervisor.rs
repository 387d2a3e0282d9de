//! Kernel supervisor: launches a kernel's sockets and poll loops, tracks
//! its liveness, and tears it down.
//!
//! Grounded on `core.py`'s `launch_kernel`/`tear_down`/`check_pulse`: two
//! independent poll loops, "process" (heartbeat + control) and "execution"
//! (shell + iopub), so a long-running execution never blocks interrupt
//! delivery or heartbeat replies. `ollama-kernel::main`'s
//! `tokio::spawn`-per-socket-role shape is the Rust translation of that
//! same split.
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Instant;

use dashmap::DashMap;
use jupyter_protocol::{
    InterruptReply, JupyterMessageContent, KernelInfoReply, ReplyStatus, ShutdownReply,
};
use runtimelib::socket_set::{bind_all, ExecutionSockets, ProcessSockets};
use runtimelib::{
    ConnectionInfo, KernelControlConnection, KernelIoPubConnection, KernelShellConnection,
};
use tokio::sync::Mutex as TokioMutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::builder::scoped_reply;
use crate::config::KernelConfig;
use crate::dispatch::dispatch_message;
use crate::errors::{guard_transport, KernelError, Result};
use crate::execution::ExecutionSession;
use crate::script_engine::ScriptEngine;
use crate::status::{declare_starting, with_busy_idle};
use crate::InterruptFlag;

/// Out-of-band payload pushed on the heartbeat socket in place of an echo
/// when a session restart needs a provisioner polling that socket to
/// observe the bump.
const RESTART_BUMP_PAYLOAD: &[u8] = b"restart";

type SharedIoPub = Arc<TokioMutex<KernelIoPubConnection>>;
type SharedRuntime = Arc<TokioMutex<(Box<dyn ScriptEngine>, ExecutionSession)>>;

/// A running kernel: its identity, connection info, and the handles needed
/// to tear it down. The sockets and execution state live inside the
/// spawned poll-loop tasks (or behind the shared handles those tasks hold),
/// the same way the original core scopes `_shell_socket`/`_iopub_socket`/
/// the execution context to the lifetime of its poll loops.
pub struct Kernel {
    pub kernel_id: String,
    pub connection_info: ConnectionInfo,
    interrupted: InterruptFlag,
    shutdown_requested: InterruptFlag,
    restart_bump: InterruptFlag,
    last_heartbeat: Arc<StdMutex<Instant>>,
    runtime: SharedRuntime,
    config: KernelConfig,
    tasks: Vec<JoinHandle<()>>,
}

impl Kernel {
    /// Binds all five sockets, broadcasts `starting` then `idle`, and
    /// spawns the process and execution poll loops plus the liveness
    /// watchdog. Mirrors `launch_kernel`: bind sockets,
    /// `declare_starting()`, start both poll loops, return once the
    /// kernel is live and polling.
    pub async fn launch(
        kernel_id: impl Into<String>,
        connection_info: ConnectionInfo,
        config: KernelConfig,
        kernel_info: KernelInfoReply,
        engine: Box<dyn ScriptEngine>,
    ) -> Result<Self> {
        let kernel_id = kernel_id.into();
        let session_id = Uuid::new_v4().to_string();

        let (process_sockets, execution_sockets) = bind_all(&connection_info, &session_id).await?;
        let ProcessSockets {
            mut heartbeat,
            control,
        } = process_sockets;
        let ExecutionSockets {
            shell,
            mut iopub,
            stdin: _stdin,
        } = execution_sockets;

        declare_starting(&mut iopub, &kernel_id).await?;

        let interrupted = InterruptFlag::new();
        let shutdown_requested = InterruptFlag::new();
        let restart_bump = InterruptFlag::new();
        let last_heartbeat = Arc::new(StdMutex::new(Instant::now()));
        let iopub = Arc::new(TokioMutex::new(iopub));
        let runtime = Arc::new(TokioMutex::new((
            engine,
            ExecutionSession::new(session_id.clone()),
        )));

        let heartbeat_last_beat = Arc::clone(&last_heartbeat);
        let heartbeat_restart_bump = restart_bump.clone();
        let heartbeat_task = tokio::spawn(async move {
            loop {
                let bump = heartbeat_restart_bump
                    .take()
                    .then_some(RESTART_BUMP_PAYLOAD);
                match heartbeat.single_heartbeat(bump).await {
                    Ok(()) => {
                        *heartbeat_last_beat
                            .lock()
                            .expect("heartbeat mutex poisoned") = Instant::now();
                    }
                    Err(err) => {
                        log::debug!("heartbeat socket closed, stopping heartbeat loop: {err}");
                        break;
                    }
                }
            }
        });

        let control_task = tokio::spawn(poll_control_loop(
            control,
            Arc::clone(&iopub),
            Arc::clone(&runtime),
            interrupted.clone(),
            shutdown_requested.clone(),
            restart_bump.clone(),
            kernel_info.clone(),
            kernel_id.clone(),
            Arc::clone(&last_heartbeat),
            config.cardiac_arrest_timeout,
        ));

        let execution_task = tokio::spawn(poll_execution_loop(
            shell,
            Arc::clone(&iopub),
            Arc::clone(&runtime),
            interrupted.clone(),
            shutdown_requested.clone(),
            kernel_info,
            kernel_id.clone(),
        ));

        let watchdog_task = tokio::spawn(pulse_watchdog(
            Arc::clone(&last_heartbeat),
            config.cardiac_arrest_timeout,
            shutdown_requested.clone(),
        ));

        let tasks = vec![heartbeat_task, control_task, execution_task, watchdog_task];

        Ok(Kernel {
            kernel_id,
            connection_info,
            interrupted,
            shutdown_requested,
            restart_bump,
            last_heartbeat,
            runtime,
            config,
            tasks,
        })
    }

    /// Whether this kernel has gone longer than its configured deadline
    /// without a heartbeat. Mirrors `check_pulse`/`CardiacArrest`.
    pub fn check_pulse(&self) -> Result<()> {
        check_pulse(&self.last_heartbeat, self.config.cardiac_arrest_timeout)
    }

    /// Sets the single-writer `interrupted` flag. Only the admin surface
    /// should call this from outside a control-channel `interrupt_request`.
    pub fn interrupt(&self) {
        self.interrupted.set();
    }

    /// Whether the control channel (or the admin surface) has asked this
    /// kernel to shut down. The admin registry polls this to know when a
    /// kernel has ended itself and should be reaped.
    pub fn shutdown_requested(&self) -> bool {
        self.shutdown_requested.is_set()
    }

    /// Resets the execution namespace and history, clears `interrupted`,
    /// and bumps the heartbeat socket's next reply out-of-band so a
    /// provisioner watching it observes the session restart. Used both by
    /// the control channel's `shutdown_request{restart: true}` and by the
    /// admin surface's SIGTERM-as-restart route.
    pub async fn restart_session(&self) {
        let mut guard = self.runtime.lock().await;
        guard.1.reset();
        self.interrupted.clear();
        self.restart_bump.set();
    }

    /// Tears the kernel down: aborts its poll-loop tasks and waits out the
    /// lingering delay, the Rust analogue of `tear_down`'s "stop execution
    /// then process role, sleep out in-flight iterations, drop the
    /// sockets" sequence.
    pub async fn tear_down(mut self) {
        self.shutdown_requested.set();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        tokio::time::sleep(self.config.lingering_delay).await;
    }
}

/// Whether `last_heartbeat` has gone longer than `cardiac_arrest_timeout`
/// without a beat. Free function so both `Kernel::check_pulse` and the
/// periodic watchdog task (which doesn't hold a `&Kernel`) share one
/// implementation.
fn check_pulse(
    last_heartbeat: &Arc<StdMutex<Instant>>,
    cardiac_arrest_timeout: std::time::Duration,
) -> Result<()> {
    let elapsed = last_heartbeat
        .lock()
        .expect("heartbeat mutex poisoned")
        .elapsed();
    if elapsed > cardiac_arrest_timeout {
        return Err(KernelError::CardiacArrest);
    }
    Ok(())
}

/// Independent liveness watchdog: a kernel launched through the admin REST
/// surface has no guarantee control-channel traffic ever arrives to drive
/// `poll_control_loop`'s own pulse check, so this task checks on a timer
/// regardless of channel activity and requests shutdown on cardiac arrest.
async fn pulse_watchdog(
    last_heartbeat: Arc<StdMutex<Instant>>,
    cardiac_arrest_timeout: std::time::Duration,
    shutdown_requested: InterruptFlag,
) {
    let mut interval = tokio::time::interval(cardiac_arrest_timeout / 4);
    loop {
        interval.tick().await;
        if shutdown_requested.is_set() {
            break;
        }
        if let Err(err) = check_pulse(&last_heartbeat, cardiac_arrest_timeout) {
            log::error!("liveness watchdog tripped: {err}");
            shutdown_requested.set();
            break;
        }
    }
}

/// Polls the control channel: `shutdown_request` and `interrupt_request`
/// are handled here directly since they mutate supervisor-level state;
/// everything else is handed to the same dispatch table the shell loop
/// uses, wrapped in the same busy/idle broadcast.
#[allow(clippy::too_many_arguments)]
async fn poll_control_loop(
    mut control: KernelControlConnection,
    iopub: SharedIoPub,
    runtime: SharedRuntime,
    interrupted: InterruptFlag,
    shutdown_requested: InterruptFlag,
    restart_bump: InterruptFlag,
    kernel_info: KernelInfoReply,
    kernel_id: String,
    last_heartbeat: Arc<StdMutex<Instant>>,
    cardiac_arrest_timeout: std::time::Duration,
) {
    loop {
        if shutdown_requested.is_set() {
            break;
        }

        if let Err(err) = check_pulse(&last_heartbeat, cardiac_arrest_timeout) {
            log::error!("control loop stopping, kernel failed its pulse check: {err}");
            shutdown_requested.set();
            break;
        }

        let outcome =
            guard_transport(|| async { control.read().await.map_err(KernelError::from) }, &interrupted)
                .await;
        let parent = match outcome {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => {
                log::error!("control loop stopped on error: {err}");
                break;
            }
        };

        match &parent.content {
            JupyterMessageContent::ShutdownRequest(request) => {
                let reply = ShutdownReply {
                    restart: request.restart,
                    status: ReplyStatus::Ok,
                    error: None,
                };
                if let Err(err) =
                    scoped_reply(&mut control, &parent, || Ok(reply.as_child_of(&parent))).await
                {
                    log::warn!("failed to send shutdown_reply: {err}");
                }
                if request.restart {
                    // Fresh Session, fresh id, kernel stays live.
                    let mut runtime = runtime.lock().await;
                    runtime.1 = ExecutionSession::new(Uuid::new_v4().to_string());
                    interrupted.clear();
                    restart_bump.set();
                } else {
                    shutdown_requested.set();
                    break;
                }
            }
            JupyterMessageContent::InterruptRequest(_) => {
                interrupted.set();
                let reply = InterruptReply::new();
                if let Err(err) =
                    scoped_reply(&mut control, &parent, || Ok(reply.as_child_of(&parent))).await
                {
                    log::warn!("failed to send interrupt_reply: {err}");
                }
            }
            _ => {
                let mut iopub = iopub.lock().await;
                let mut runtime = runtime.lock().await;
                let (engine, session) = &mut *runtime;
                let result = with_busy_idle(&mut iopub, &parent, &kernel_id, |iopub| {
                    dispatch_message(
                        &parent,
                        &mut control,
                        iopub,
                        session,
                        engine.as_mut(),
                        &interrupted,
                        &kernel_info,
                        &kernel_id,
                    )
                })
                .await;
                if let Err(err) = result {
                    log::warn!("control message {} failed: {err}", parent.message_type());
                }
            }
        }
    }
}

/// Polls the shell channel and runs every request through `dispatch_message`
/// inside the busy/idle wrapper. This is the loop that can block for a long
/// time inside `execute_request`; it never touches heartbeat or control.
async fn poll_execution_loop(
    mut shell: KernelShellConnection,
    iopub: SharedIoPub,
    runtime: SharedRuntime,
    interrupted: InterruptFlag,
    shutdown_requested: InterruptFlag,
    kernel_info: KernelInfoReply,
    kernel_id: String,
) {
    loop {
        if shutdown_requested.is_set() {
            break;
        }

        let outcome =
            guard_transport(|| async { shell.read().await.map_err(KernelError::from) }, &interrupted)
                .await;
        let parent = match outcome {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(err) => {
                log::error!("execution loop stopped on error: {err}");
                break;
            }
        };

        let mut iopub = iopub.lock().await;
        let mut runtime = runtime.lock().await;
        let (engine, session) = &mut *runtime;
        let result = with_busy_idle(&mut iopub, &parent, &kernel_id, |iopub| {
            dispatch_message(
                &parent,
                &mut shell,
                iopub,
                session,
                engine.as_mut(),
                &interrupted,
                &kernel_info,
                &kernel_id,
            )
        })
        .await;
        if let Err(err) = result {
            log::warn!("shell message {} failed: {err}", parent.message_type());
        }
    }
}

/// Process-wide `kernel_id -> Kernel` registry, the in-process analogue of
/// `runtime_manager.rs`'s `RuntimeManager`: there, `insert` attaches to a
/// kernel process already running elsewhere, discovered by watching the
/// Jupyter runtime directory for connection files; here, the admin surface
/// owns the kernels it serves, so the registry holds the `Kernel` itself
/// rather than a handle to an external process.
#[derive(Default)]
pub struct KernelRegistry {
    kernels: DashMap<String, Arc<Kernel>>,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, kernel: Kernel) -> Arc<Kernel> {
        let handle = Arc::new(kernel);
        self.kernels
            .insert(handle.kernel_id.clone(), Arc::clone(&handle));
        handle
    }

    pub fn get(&self, kernel_id: &str) -> Option<Arc<Kernel>> {
        self.kernels.get(kernel_id).map(|entry| Arc::clone(&entry))
    }

    pub fn ids(&self) -> Vec<String> {
        self.kernels
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn contains(&self, kernel_id: &str) -> bool {
        self.kernels.contains_key(kernel_id)
    }

    /// Scram one kernel: remove it from the registry and tear it down.
    /// Returns its id if it was present, matching the admin surface's
    /// `scrammed: [kernel_id]` / `scrammed: []` response shapes.
    pub async fn scram(&self, kernel_id: &str) -> Option<String> {
        let (id, kernel) = self.kernels.remove(kernel_id)?;
        match Arc::try_unwrap(kernel) {
            Ok(kernel) => kernel.tear_down().await,
            Err(kernel) => kernel.interrupted.set(),
        }
        Some(id)
    }

    /// Scram every registered kernel.
    pub async fn scram_all(&self) -> Vec<String> {
        let ids = self.ids();
        let mut scrammed = Vec::new();
        for id in ids {
            if let Some(id) = self.scram(&id).await {
                scrammed.push(id);
            }
        }
        scrammed
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};
    use std::time::{Duration, Instant};

    use super::check_pulse;

    #[test]
    fn check_pulse_ok_within_deadline() {
        let last_heartbeat = Arc::new(StdMutex::new(Instant::now()));
        assert!(check_pulse(&last_heartbeat, Duration::from_secs(30)).is_ok());
    }

    #[test]
    fn check_pulse_fails_past_deadline() {
        let stale = Instant::now() - Duration::from_secs(10);
        let last_heartbeat = Arc::new(StdMutex::new(stale));
        assert!(check_pulse(&last_heartbeat, Duration::from_millis(1)).is_err());
    }
}
