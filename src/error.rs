// Tally Error Handling Module
// Every script failure is recoverable: it aborts the current run and is
// reported, never a panic of the host process.

use colored::Colorize;
use thiserror::Error;

/// Errors raised while running a Tally script.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Pop or peek on an empty data/control stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// A word resolved to a symbol that no scope in the chain binds.
    #[error("undefined word '{0}'")]
    UndefinedName(String),

    /// Pop on an already-empty scope chain.
    #[error("scope chain is empty")]
    EmptyScopeChain,

    /// Inverse lookup of a token this symbol table never produced.
    #[error("unknown symbol token #{0}")]
    UnknownSymbol(u32),

    /// Malformed use of a vocabulary word (e.g. `'` at end of line).
    #[error("syntax error: {0}")]
    Syntax(String),

    /// Integer division by zero in the arithmetic vocabulary.
    #[error("division by zero")]
    DivisionByZero,

    /// The input stream failed mid-read (not end-of-stream).
    #[error("read error: {0}")]
    StreamRead(#[from] std::io::Error),
}

impl TallyError {
    /// Report this error on the diagnostic channel (stderr).
    pub fn report(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self);
    }
}

pub type TallyResult<T> = Result<T, TallyError>;
