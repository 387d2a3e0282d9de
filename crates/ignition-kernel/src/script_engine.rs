//! The embeddable script interpreter seam.
//!
//! A Jupyter kernel runs user code inside some language's `compile` +
//! `eval` pair (see `execution/run.py`'s `run_interactive`, which calls
//! `compile(statement, filename, mode='single')` then `eval`/`exec` per
//! top-level AST node). Rust has no built-in dynamic `eval`, so that pair is
//! expressed as a trait any embedded or linked language runtime can
//! implement. `EchoEngine` is the reference implementation used by this
//! crate's own tests and its standalone binary: a small arithmetic/variable
//! language, enough to drive the kernel end to end without depending on a
//! real external interpreter.
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("syntax error: {0}")]
    Syntax(String),
    #[error("{0}")]
    Runtime(String),
}

/// A value a script statement can produce or bind to a name.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    None,
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl fmt::Display for ScriptValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptValue::None => write!(f, "None"),
            ScriptValue::Int(n) => write!(f, "{n}"),
            ScriptValue::Float(n) => write!(f, "{n}"),
            ScriptValue::Str(s) => write!(f, "{s}"),
            ScriptValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A name-to-value scope. `globals`/`locals` in the trait mirror the two
/// dicts `run.py` folds together after every statement.
pub type ScriptScope = HashMap<String, ScriptValue>;

/// How a unit of source should be compiled, mirroring CPython's
/// `compile(..., mode=...)` distinction between a single interactive
/// statement and a whole module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileMode {
    Single,
    Exec,
}

/// An opaque compiled unit. Only the engine that produced it can evaluate
/// it; callers just hold and pass it back.
pub struct CompiledCode(Box<dyn Any + Send>);

impl CompiledCode {
    pub fn new<T: Send + 'static>(value: T) -> Self {
        CompiledCode(Box::new(value))
    }

    pub fn downcast<T: 'static>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

/// Where a statement's stdout/stderr writes go, and where its stdin reads
/// come from. Grounded on `run.py`'s `install()`, which substitutes
/// `StringIO`-backed redirects for the duration of one execution.
pub trait ScriptIo: Send {
    fn write_stdout(&mut self, text: &str);
    fn write_stderr(&mut self, text: &str);
    fn read_stdin(&mut self, prompt: &str) -> Option<String>;
}

/// The seam a real language runtime implements. `EchoEngine` below is the
/// reference implementation.
pub trait ScriptEngine: Send {
    /// Splits `source` into the top-level statements it should be run as,
    /// one at a time, mirroring `ast.parse(code).body`.
    fn split_statements(&self, source: &str) -> Result<Vec<String>, ScriptError>;

    /// Compiles a single statement, analogous to
    /// `compile(statement, filename, mode)`.
    fn compile(
        &self,
        statement: &str,
        filename: &str,
        mode: CompileMode,
    ) -> Result<CompiledCode, ScriptError>;

    /// Evaluates one compiled statement against `globals`/`locals`,
    /// analogous to `eval`/`exec`. An expression statement's value is
    /// returned so the caller can feed it to a displayhook-equivalent; a
    /// statement with no value (an assignment, an import) returns `None`.
    fn eval(
        &mut self,
        code: &CompiledCode,
        globals: &mut ScriptScope,
        locals: &mut ScriptScope,
        io: &mut dyn ScriptIo,
    ) -> Result<Option<ScriptValue>, ScriptError>;
}

/// A tiny reference engine: integer/float arithmetic, `name = expr`
/// assignment, and `print(expr)`. Exists so the kernel is runnable and
/// testable without an external language runtime.
#[derive(Default)]
pub struct EchoEngine;

enum ParsedStatement {
    Assign { name: String, expr: String },
    Print { expr: String },
    Expr { expr: String },
}

impl ScriptEngine for EchoEngine {
    fn split_statements(&self, source: &str) -> Result<Vec<String>, ScriptError> {
        Ok(source
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect())
    }

    fn compile(
        &self,
        statement: &str,
        _filename: &str,
        _mode: CompileMode,
    ) -> Result<CompiledCode, ScriptError> {
        let parsed = if let Some((name, expr)) = statement.split_once('=') {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return Err(ScriptError::Syntax(format!(
                    "invalid assignment target: {name:?}"
                )));
            }
            ParsedStatement::Assign {
                name: name.to_string(),
                expr: expr.trim().to_string(),
            }
        } else if let Some(inner) = statement
            .strip_prefix("print(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            ParsedStatement::Print {
                expr: inner.trim().to_string(),
            }
        } else {
            ParsedStatement::Expr {
                expr: statement.trim().to_string(),
            }
        };
        Ok(CompiledCode::new(parsed))
    }

    fn eval(
        &mut self,
        code: &CompiledCode,
        globals: &mut ScriptScope,
        locals: &mut ScriptScope,
        io: &mut dyn ScriptIo,
    ) -> Result<Option<ScriptValue>, ScriptError> {
        let parsed = code
            .downcast::<ParsedStatement>()
            .expect("CompiledCode produced by EchoEngine::compile");

        match parsed {
            ParsedStatement::Assign { name, expr } => {
                let value = eval_expr(expr, globals, locals)?;
                locals.insert(name.clone(), value);
                Ok(None)
            }
            ParsedStatement::Print { expr } => {
                let value = eval_expr(expr, globals, locals)?;
                io.write_stdout(&format!("{value}\n"));
                Ok(None)
            }
            ParsedStatement::Expr { expr } => eval_expr(expr, globals, locals).map(Some),
        }
    }
}

fn lookup(name: &str, globals: &ScriptScope, locals: &ScriptScope) -> Option<ScriptValue> {
    locals.get(name).or_else(|| globals.get(name)).cloned()
}

fn eval_expr(
    expr: &str,
    globals: &ScriptScope,
    locals: &ScriptScope,
) -> Result<ScriptValue, ScriptError> {
    let expr = expr.trim();
    if let Some(inner) = expr.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        return Ok(ScriptValue::Str(inner.to_string()));
    }
    for (op, combine) in [
        ('+', (|a: f64, b: f64| a + b) as fn(f64, f64) -> f64),
        ('-', |a, b| a - b),
        ('*', |a, b| a * b),
        ('/', |a, b| a / b),
    ] {
        if let Some(idx) = expr.rfind(op) {
            if idx == 0 {
                continue;
            }
            let (lhs, rhs) = expr.split_at(idx);
            let rhs = &rhs[1..];
            if let (Ok(l), Ok(r)) = (
                eval_atom(lhs.trim(), globals, locals),
                eval_atom(rhs.trim(), globals, locals),
            ) {
                let result = combine(l, r);
                return Ok(numeric_value(result, expr));
            }
        }
    }
    eval_atom(expr, globals, locals).map(|n| numeric_value(n, expr)).or_else(|_| {
        lookup(expr, globals, locals)
            .ok_or_else(|| ScriptError::Runtime(format!("name {expr:?} is not defined")))
    })
}

fn eval_atom(
    token: &str,
    globals: &ScriptScope,
    locals: &ScriptScope,
) -> Result<f64, ScriptError> {
    if let Ok(n) = token.parse::<f64>() {
        return Ok(n);
    }
    match lookup(token, globals, locals) {
        Some(ScriptValue::Int(n)) => Ok(n as f64),
        Some(ScriptValue::Float(n)) => Ok(n),
        Some(other) => Err(ScriptError::Runtime(format!(
            "cannot use {other} as a number"
        ))),
        None => Err(ScriptError::Runtime(format!("name {token:?} is not defined"))),
    }
}

fn numeric_value(n: f64, original_had_dot_hint: &str) -> ScriptValue {
    if n.fract() == 0.0 && !original_had_dot_hint.contains('.') {
        ScriptValue::Int(n as i64)
    } else {
        ScriptValue::Float(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullIo {
        stdout: String,
    }

    impl ScriptIo for NullIo {
        fn write_stdout(&mut self, text: &str) {
            self.stdout.push_str(text);
        }
        fn write_stderr(&mut self, _text: &str) {}
        fn read_stdin(&mut self, _prompt: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn assigns_and_evaluates_expressions() {
        let mut engine = EchoEngine;
        let mut globals = ScriptScope::new();
        let mut locals = ScriptScope::new();
        let mut io = NullIo {
            stdout: String::new(),
        };

        let stmt = engine.compile("x = 2 + 3", "<cell>", CompileMode::Single).unwrap();
        let value = engine.eval(&stmt, &mut globals, &mut locals, &mut io).unwrap();
        assert_eq!(value, None);
        assert_eq!(locals.get("x"), Some(&ScriptValue::Int(5)));

        let stmt = engine.compile("x", "<cell>", CompileMode::Single).unwrap();
        let value = engine.eval(&stmt, &mut globals, &mut locals, &mut io).unwrap();
        assert_eq!(value, Some(ScriptValue::Int(5)));
    }

    #[test]
    fn print_writes_to_stdout() {
        let mut engine = EchoEngine;
        let mut globals = ScriptScope::new();
        let mut locals = ScriptScope::new();
        let mut io = NullIo {
            stdout: String::new(),
        };

        let stmt = engine
            .compile("print(1 + 1)", "<cell>", CompileMode::Single)
            .unwrap();
        engine.eval(&stmt, &mut globals, &mut locals, &mut io).unwrap();
        assert_eq!(io.stdout, "2\n");
    }

    #[test]
    fn undefined_name_is_a_runtime_error() {
        let mut engine = EchoEngine;
        let mut globals = ScriptScope::new();
        let mut locals = ScriptScope::new();
        let mut io = NullIo {
            stdout: String::new(),
        };

        let stmt = engine.compile("missing", "<cell>", CompileMode::Single).unwrap();
        let err = engine.eval(&stmt, &mut globals, &mut locals, &mut io);
        assert!(matches!(err, Err(ScriptError::Runtime(_))));
    }
}
