//! Execution session: runs code statement-by-statement against a
//! persistent namespace, capturing I/O and display values.
//!
//! Grounded on `execution/context.py`'s `ExecutionContext` (the
//! `execution_count`/`history` bookkeeping and negative-indexed lookup) and
//! `execution/run.py`'s `Executor.run_interactive` (split into top-level
//! statements, compile and run each one, fold locals into globals after
//! every statement so later statements see earlier definitions, stop the
//! run on the first error, track only the last non-empty display value).
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::script_engine::{CompileMode, ScriptEngine, ScriptIo, ScriptScope, ScriptValue};

/// Why a run stopped without completing every statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The statement's own syntax didn't parse.
    Syntax,
    /// The statement parsed but raised while running.
    Runtime,
    /// A cooperative interrupt was observed at a statement boundary.
    Abort,
}

#[derive(Debug, Clone)]
pub struct ExecutionError {
    pub kind: ErrorKind,
    pub ename: String,
    pub evalue: String,
    pub traceback: Vec<String>,
}

/// The result of running one `execute_request`'s code, mirroring
/// `ExecutionResults` in the original: captured code, the single most
/// recent display value (IPython convention — only `_`, the last result,
/// survives), captured stdin/stdout/stderr, and the error if the run
/// didn't finish cleanly.
#[derive(Debug, Clone, Default)]
pub struct ExecutionResult {
    pub code: String,
    pub display: Option<ScriptValue>,
    pub stdout: String,
    pub stderr: String,
    pub error: Option<ExecutionError>,
    pub notebook_cell_id: Option<String>,
}

impl ExecutionResult {
    /// A human-readable rendering for REPL-style dumps, the Rust analogue
    /// of `ExecutionResults.__str__`/`__repr__` in the original.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.stdout.is_empty() {
            out.push_str(&self.stdout);
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("{}: {}\n", error.ename, error.evalue));
        } else if let Some(display) = &self.display {
            out.push_str(&format!("{display}\n"));
        }
        out
    }
}

struct CapturingIo {
    stdout: String,
    stderr: String,
}

impl ScriptIo for CapturingIo {
    fn write_stdout(&mut self, text: &str) {
        self.stdout.push_str(text);
    }

    fn write_stderr(&mut self, text: &str) {
        self.stderr.push_str(text);
    }

    fn read_stdin(&mut self, _prompt: &str) -> Option<String> {
        // stdin is serviced over the stdin channel by the supervisor; a
        // bare `ExecutionSession::execute` with no channel wired up treats
        // every prompt as EOF, matching a non-interactive run.
        None
    }
}

/// A single kernel's persistent code-execution state: one growing
/// namespace, plus a numbered history of past results.
pub struct ExecutionSession {
    pub id: String,
    globals: ScriptScope,
    execution_count: usize,
    history: HashMap<usize, ExecutionResult>,
}

impl ExecutionSession {
    pub fn new(id: impl Into<String>) -> Self {
        ExecutionSession {
            id: id.into(),
            globals: ScriptScope::new(),
            execution_count: 0,
            history: HashMap::new(),
        }
    }

    pub fn execution_count(&self) -> usize {
        self.execution_count
    }

    /// Negative-indexed lookup into history, mirroring
    /// `ExecutionContext.__getitem__`: `-1` is the most recent result.
    pub fn get(&self, index: isize) -> Option<&ExecutionResult> {
        let ix = if index < 0 {
            self.execution_count as isize + index + 1
        } else {
            index
        };
        if ix < 0 {
            return None;
        }
        self.history.get(&(ix as usize))
    }

    /// Clears the namespace and history, the Rust analogue of
    /// `ExecutionContext.destroy()` — used when a kernel restarts its
    /// session without tearing down its sockets.
    pub fn reset(&mut self) {
        self.globals.clear();
        self.history.clear();
        self.execution_count = 0;
    }

    /// Runs `code` statement by statement against the session's
    /// persistent namespace. `interrupted` is polled at each statement
    /// boundary only — there is no preemption mid-statement, matching the
    /// original's cooperative interrupt model.
    pub fn execute(
        &mut self,
        engine: &mut dyn ScriptEngine,
        code: &str,
        store_history: bool,
        notebook_cell_id: Option<String>,
        interrupted: &Arc<AtomicBool>,
    ) -> ExecutionResult {
        let mut io = CapturingIo {
            stdout: String::new(),
            stderr: String::new(),
        };
        let mut display = None;
        let mut error = None;

        match engine.split_statements(code) {
            Err(err) => {
                error = Some(ExecutionError {
                    kind: ErrorKind::Syntax,
                    ename: "SyntaxError".to_string(),
                    evalue: err.to_string(),
                    traceback: vec![err.to_string()],
                });
            }
            Ok(statements) => {
                for statement in statements {
                    if interrupted.load(Ordering::SeqCst) {
                        error = Some(ExecutionError {
                            kind: ErrorKind::Abort,
                            ename: "KeyboardInterrupt".to_string(),
                            evalue: String::new(),
                            traceback: Vec::new(),
                        });
                        break;
                    }

                    let compiled = match engine.compile(&statement, "<cell>", CompileMode::Single)
                    {
                        Ok(compiled) => compiled,
                        Err(err) => {
                            error = Some(ExecutionError {
                                kind: ErrorKind::Syntax,
                                ename: "SyntaxError".to_string(),
                                evalue: err.to_string(),
                                traceback: vec![err.to_string()],
                            });
                            break;
                        }
                    };

                    let mut locals = ScriptScope::new();
                    let outcome = engine.eval(&compiled, &mut self.globals, &mut locals, &mut io);
                    self.globals.extend(locals);

                    match outcome {
                        Ok(Some(value)) => display = Some(value),
                        Ok(None) => {}
                        Err(err) => {
                            error = Some(ExecutionError {
                                kind: ErrorKind::Runtime,
                                ename: "RuntimeError".to_string(),
                                evalue: err.to_string(),
                                traceback: vec![err.to_string()],
                            });
                            break;
                        }
                    }
                }
            }
        }

        let result = ExecutionResult {
            code: code.to_string(),
            display,
            stdout: io.stdout,
            stderr: io.stderr,
            error,
            notebook_cell_id,
        };

        if store_history {
            self.execution_count += 1;
            self.history.insert(self.execution_count, result.clone());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script_engine::EchoEngine;

    fn interrupt_flag() -> Arc<AtomicBool> {
        Arc::new(AtomicBool::new(false))
    }

    #[test]
    fn later_statements_see_earlier_definitions() {
        let mut engine = EchoEngine;
        let mut session = ExecutionSession::new("s1");
        let result = session.execute(
            &mut engine,
            "x = 2\nx + 3",
            true,
            None,
            &interrupt_flag(),
        );
        assert_eq!(result.error.is_none(), true);
        assert_eq!(result.display, Some(ScriptValue::Int(5)));
        assert_eq!(session.execution_count(), 1);
    }

    #[test]
    fn definitions_persist_across_executions() {
        let mut engine = EchoEngine;
        let mut session = ExecutionSession::new("s1");
        session.execute(&mut engine, "x = 41", true, None, &interrupt_flag());
        let result = session.execute(&mut engine, "x + 1", true, None, &interrupt_flag());
        assert_eq!(result.display, Some(ScriptValue::Int(42)));
        assert_eq!(session.execution_count(), 2);
    }

    #[test]
    fn runtime_error_stops_the_run_and_is_reported() {
        let mut engine = EchoEngine;
        let mut session = ExecutionSession::new("s1");
        let result = session.execute(
            &mut engine,
            "print(undefined_name)\nx = 1",
            true,
            None,
            &interrupt_flag(),
        );
        assert!(result.error.is_some());
        assert_eq!(result.error.unwrap().kind, ErrorKind::Runtime);
        // the statement after the error never ran
        assert!(session.get(-1).unwrap().error.is_some());
        assert!(!session.globals.contains_key("x"));
    }

    #[test]
    fn interrupt_is_observed_at_a_statement_boundary() {
        let mut engine = EchoEngine;
        let mut session = ExecutionSession::new("s1");
        let interrupted = interrupt_flag();
        interrupted.store(true, Ordering::SeqCst);
        let result = session.execute(&mut engine, "x = 1", true, None, &interrupted);
        let error = result.error.unwrap();
        assert_eq!(error.kind, ErrorKind::Abort);
        assert_eq!(error.ename, "KeyboardInterrupt");
    }

    #[test]
    fn negative_indexing_matches_python_semantics() {
        let mut engine = EchoEngine;
        let mut session = ExecutionSession::new("s1");
        session.execute(&mut engine, "1", true, None, &interrupt_flag());
        session.execute(&mut engine, "2", true, None, &interrupt_flag());
        session.execute(&mut engine, "3", true, None, &interrupt_flag());
        assert_eq!(session.get(-1).unwrap().display, Some(ScriptValue::Int(3)));
        assert_eq!(session.get(1).unwrap().display, Some(ScriptValue::Int(1)));
        assert_eq!(session.get(-3).unwrap().display, Some(ScriptValue::Int(1)));
    }

    #[test]
    fn reset_clears_namespace_and_history() {
        let mut engine = EchoEngine;
        let mut session = ExecutionSession::new("s1");
        session.execute(&mut engine, "x = 1", true, None, &interrupt_flag());
        session.reset();
        assert_eq!(session.execution_count(), 0);
        assert!(session.get(-1).is_none());
        let result = session.execute(&mut engine, "x", true, None, &interrupt_flag());
        assert!(result.error.is_some());
    }
}
