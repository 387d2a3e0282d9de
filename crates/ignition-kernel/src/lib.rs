//! Core of a Jupyter kernel: the wire-protocol dispatch, execution engine,
//! and supervisor that sit on top of `runtimelib`'s socket and codec layer.
pub mod builder;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod execution;
pub mod reload;
pub mod script_engine;
pub mod status;
pub mod supervisor;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jupyter_protocol::{CodeMirrorMode, HelpLink, KernelInfoReply, LanguageInfo, ReplyStatus};

pub use config::KernelConfig;
pub use errors::{KernelError, Result};
pub use execution::{ErrorKind, ExecutionError, ExecutionResult, ExecutionSession};
pub use script_engine::{EchoEngine, ScriptEngine};
pub use supervisor::{Kernel, KernelRegistry};

/// The `kernel_info_reply` content for the reference `EchoEngine` language.
/// An embedder wiring in a real language runtime supplies its own instead of
/// calling this.
pub fn reference_kernel_info() -> KernelInfoReply {
    KernelInfoReply {
        status: ReplyStatus::Ok,
        protocol_version: "5.3".to_string(),
        implementation: "ignition-kernel".to_string(),
        implementation_version: env!("CARGO_PKG_VERSION").to_string(),
        language_info: LanguageInfo {
            name: "ignition-script".to_string(),
            version: "0.1".to_string(),
            mimetype: "text/plain".to_string(),
            file_extension: ".ign".to_string(),
            pygments_lexer: "text".to_string(),
            codemirror_mode: CodeMirrorMode::Simple("text".to_string()),
            nbconvert_exporter: "text".to_string(),
        },
        banner: "ignition-kernel: a reference Jupyter kernel core".to_string(),
        help_links: vec![HelpLink {
            text: "ignition-kernel".to_string(),
            url: "https://github.com/runtimed/runtimed".to_string(),
        }],
        debugger: false,
        error: None,
    }
}

/// A kernel's single-writer, poll-loop-read interrupt flag. Set by the
/// control channel's `interrupt_request` handler (or by the admin surface),
/// cleared only when a new execution session replaces the old one — never
/// cleared by a poll loop observing a clean iteration.
#[derive(Clone)]
pub struct InterruptFlag(Arc<AtomicBool>);

impl InterruptFlag {
    pub fn new() -> Self {
        InterruptFlag(Arc::new(AtomicBool::new(false)))
    }

    pub fn inner(&self) -> &Arc<AtomicBool> {
        &self.0
    }

    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Reads the flag and clears it in one step, for one-shot signals (the
    /// heartbeat restart bump) rather than level-triggered ones.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

impl Default for InterruptFlag {
    fn default() -> Self {
        Self::new()
    }
}
