// Tally Runtime Values
// A closed sum type: everything that can flow through the engine is one of
// these variants, and the dispatcher matches them exhaustively. Values are
// immutable once created; shared payloads sit behind Arc.

use std::fmt;
use std::sync::Arc;

use crate::error::TallyResult;
use crate::interp::Interpreter;
use crate::symbols::Symbol;

/// Dispatch flags. A value that carries none gets the engine default
/// (`{immediate: false, executable: false}`), i.e. plain data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    /// Runs the moment it is dispatched, even while compiling.
    pub immediate: bool,
    /// Runs when dispatched at compiling depth 0; deferred otherwise.
    pub executable: bool,
}

impl Flags {
    pub const EXECUTABLE: Flags = Flags {
        immediate: false,
        executable: true,
    };

    pub const IMMEDIATE: Flags = Flags {
        immediate: true,
        executable: true,
    };
}

/// A host-supplied primitive. It receives the whole interpreter, so it may
/// touch the data stack, the control stack, the compiling counter, the scope
/// chain and the remaining input line.
#[derive(Clone)]
pub struct NativeOp {
    name: Arc<str>,
    func: Arc<dyn Fn(&mut Interpreter) -> TallyResult<()> + Send + Sync>,
}

impl NativeOp {
    pub fn new<F>(name: impl Into<Arc<str>>, func: F) -> Self
    where
        F: Fn(&mut Interpreter) -> TallyResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invoke(&self, interp: &mut Interpreter) -> TallyResult<()> {
        (self.func)(interp)
    }
}

impl fmt::Debug for NativeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeOp({})", self.name)
    }
}

/// Any datum flowing through the engine.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i32),
    Bool(bool),
    Float(f64),
    Int64(i64),
    Uint64(u64),
    /// An interned word awaiting resolution through the scope chain.
    Symbol(Symbol),
    /// A quotation: a deferred program fragment, itself a value.
    Quotation(Arc<Vec<Value>>),
    /// A primitive with the standard `{immediate: false, executable: true}`
    /// flags.
    Native(NativeOp),
    /// A primitive that runs the instant it is dispatched, bypassing the
    /// execution gate entirely. The hook for host-defined special forms.
    Immediate(NativeOp),
    /// A value wrapped with explicit dispatch flags, e.g. a quotation bound
    /// as an executable word definition.
    Flagged(Flags, Arc<Value>),
}

impl Value {
    pub fn quotation(items: Vec<Value>) -> Value {
        Value::Quotation(Arc::new(items))
    }

    /// Wrap with explicit flags, typically to make a quotation executable.
    pub fn flagged(flags: Flags, value: Value) -> Value {
        Value::Flagged(flags, Arc::new(value))
    }

    /// The dispatch flags this value reports. Bare symbols default to
    /// executable so that word lookup is eager; quotations and plain
    /// literals are data until something executes them.
    pub fn flags(&self) -> Flags {
        match self {
            Value::Native(_) => Flags::EXECUTABLE,
            Value::Immediate(_) => Flags::IMMEDIATE,
            Value::Symbol(_) => Flags::EXECUTABLE,
            Value::Flagged(flags, _) => *flags,
            _ => Flags::default(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Bool(_) => "Bool",
            Value::Float(_) => "Float",
            Value::Int64(_) => "Int64",
            Value::Uint64(_) => "Uint64",
            Value::Symbol(_) => "Symbol",
            Value::Quotation(_) => "Quotation",
            Value::Native(_) => "Native",
            Value::Immediate(_) => "Immediate",
            Value::Flagged(..) => "Flagged",
        }
    }
}

// Equality is structural for data and name-based for primitives. Two
// quotations are equal when their elements are.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Uint64(a), Value::Uint64(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Quotation(a), Value::Quotation(b)) => a == b,
            (Value::Native(a), Value::Native(b)) => a.name == b.name,
            (Value::Immediate(a), Value::Immediate(b)) => a.name == b.name,
            (Value::Flagged(fa, a), Value::Flagged(fb, b)) => fa == fb && a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Int64(n) => write!(f, "{n}"),
            Value::Uint64(n) => write!(f, "{n}"),
            Value::Symbol(sym) => write!(f, "sym#{}", sym.id()),
            Value::Quotation(items) => {
                write!(f, "{{")?;
                for item in items.iter() {
                    write!(f, " {item}")?;
                }
                write!(f, " }}")
            }
            Value::Native(op) => write!(f, "<native {}>", op.name()),
            Value::Immediate(op) => write!(f, "<immediate {}>", op.name()),
            Value::Flagged(_, inner) => write!(f, "{inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_are_plain_data() {
        assert_eq!(Value::Int(1).flags(), Flags::default());
        assert_eq!(Value::quotation(vec![]).flags(), Flags::default());
    }

    #[test]
    fn natives_are_executable_not_immediate() {
        let op = NativeOp::new("noop", |_: &mut Interpreter| Ok(()));
        assert_eq!(Value::Native(op).flags(), Flags::EXECUTABLE);
    }

    #[test]
    fn flagged_reports_its_own_flags() {
        let q = Value::flagged(Flags::IMMEDIATE, Value::quotation(vec![]));
        assert!(q.flags().immediate);
    }

    #[test]
    fn quotations_display_nested() {
        let q = Value::quotation(vec![
            Value::Int(1),
            Value::quotation(vec![Value::Int(2)]),
        ]);
        assert_eq!(q.to_string(), "{ 1 { 2 } }");
    }
}
