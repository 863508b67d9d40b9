// Tally Interpreter
// The dispatcher decides, per value, whether to execute now, defer, or
// push; the driver tokenizes input lines and feeds it. One interpreter owns
// all of its mutable state, so independent instances never interfere.

use std::io::BufRead;

use crate::error::{TallyError, TallyResult};
use crate::scope::{Scope, ScopeChain};
use crate::stack::Stack;
use crate::symbols::{Symbol, SymbolTable};
use crate::value::Value;

pub struct Interpreter {
    /// The data stack. Public so native operations can reach it directly.
    pub data: Stack,
    /// Auxiliary control stack for vocabulary words (brace markers etc.).
    pub control: Stack,
    /// Non-zero while inside a definition context: executable values are
    /// accumulated on the data stack instead of run.
    pub compiling: u32,
    /// The unconsumed remainder of the line being tokenized. Natives may
    /// rewrite it (comment and raw-literal words depend on this).
    pub line: String,
    scopes: ScopeChain,
    symbols: SymbolTable,
}

impl Interpreter {
    /// A fresh interpreter: empty stacks, empty scope chain, compiling
    /// depth 0. Seed a vocabulary with [`push_scope`](Self::push_scope)
    /// before running scripts.
    pub fn new() -> Self {
        Self {
            data: Stack::new(),
            control: Stack::new(),
            compiling: 0,
            line: String::new(),
            scopes: ScopeChain::new(),
            symbols: SymbolTable::new(),
        }
    }

    /// Intern a word, e.g. to pre-build a primitive scope.
    pub fn intern(&mut self, name: &str) -> Symbol {
        self.symbols.intern(name)
    }

    pub fn symbol_text(&self, sym: Symbol) -> TallyResult<&str> {
        self.symbols.text(sym)
    }

    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    pub fn pop_scope(&mut self) -> TallyResult<Scope> {
        self.scopes.pop()
    }

    /// Bind `sym` in the innermost scope.
    pub fn define(&mut self, sym: Symbol, value: Value) -> TallyResult<()> {
        self.scopes.innermost_mut()?.define(sym, value);
        Ok(())
    }

    /// Resolve a symbol through the scope chain, innermost first.
    pub fn resolve(&self, sym: Symbol) -> Option<&Value> {
        self.scopes.resolve(sym)
    }

    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    /// The sole entry point for running anything.
    ///
    /// Immediate procedures run unconditionally. Otherwise the value runs
    /// now when it is flagged immediate, or flagged executable at compiling
    /// depth 0; in every other case it is pushed onto the data stack as-is.
    pub fn execute(&mut self, value: &Value) -> TallyResult<()> {
        if let Value::Immediate(op) = value {
            return op.invoke(self);
        }
        let flags = value.flags();
        if flags.immediate || (flags.executable && self.compiling == 0) {
            self.execute_now(value)
        } else {
            self.data.push(value.clone());
            Ok(())
        }
    }

    /// Run a value right now, regardless of flags or compiling depth.
    /// Vocabulary words like `call` and `if` use this to run quotations on
    /// demand.
    pub fn execute_now(&mut self, value: &Value) -> TallyResult<()> {
        match value {
            Value::Flagged(_, inner) => self.execute_now(inner),
            Value::Quotation(items) => {
                for item in items.iter() {
                    // A nested quotation is data to the enclosing one.
                    match item {
                        Value::Quotation(_) => self.data.push(item.clone()),
                        _ => self.execute(item)?,
                    }
                }
                Ok(())
            }
            Value::Native(op) | Value::Immediate(op) => op.invoke(self),
            Value::Symbol(sym) => match self.scopes.resolve(*sym) {
                Some(def) => {
                    let def = def.clone();
                    self.execute(&def)
                }
                None => {
                    let text = self.symbols.text(*sym)?.to_string();
                    Err(TallyError::UndefinedName(text))
                }
            },
            literal => {
                self.data.push(literal.clone());
                Ok(())
            }
        }
    }

    /// Take the next whitespace-delimited word off the remaining line.
    /// Reads `self.line` fresh, so a native that rewrote it mid-line is
    /// honored.
    pub fn next_word(&mut self) -> Option<String> {
        let rest = self.line.trim_start();
        if rest.is_empty() {
            self.line.clear();
            return None;
        }
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = rest[..end].to_string();
        self.line = rest[end..].to_string();
        Some(word)
    }

    /// Classify a word as a literal or a symbol. Strict order, no
    /// backtracking: i32, bool, f64, i64, u64, symbol. A float must spell
    /// itself as one (`.` or an exponent); otherwise a large integer would
    /// classify as a float instead of reaching the 64-bit forms.
    pub fn classify(&mut self, word: &str) -> Value {
        if let Ok(n) = word.parse::<i32>() {
            Value::Int(n)
        } else if let Ok(b) = word.parse::<bool>() {
            Value::Bool(b)
        } else if let Some(x) = parse_float(word) {
            Value::Float(x)
        } else if let Ok(n) = word.parse::<i64>() {
            Value::Int64(n)
        } else if let Ok(n) = word.parse::<u64>() {
            Value::Uint64(n)
        } else {
            Value::Symbol(self.symbols.intern(word))
        }
    }

    fn eval_word(&mut self, word: &str) -> TallyResult<()> {
        let value = self.classify(word);
        self.execute(&value)
    }

    /// Tokenize and run one logical line.
    pub fn run_line(&mut self, line: &str) -> TallyResult<()> {
        self.line = line.to_string();
        while let Some(word) = self.next_word() {
            self.eval_word(&word)?;
        }
        Ok(())
    }

    /// Run a stream to exhaustion, reporting the first failure on stderr
    /// and halting this run only. A later run on a fresh interpreter is
    /// unaffected.
    pub fn run<R: BufRead>(&mut self, source: R) {
        if let Err(err) = self.try_run(source) {
            err.report();
        }
    }

    /// Like [`run`](Self::run) but propagating the failure to the caller.
    pub fn try_run<R: BufRead>(&mut self, mut source: R) -> TallyResult<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if source.read_line(&mut line)? == 0 {
                return Ok(());
            }
            self.run_line(line.trim_end_matches(['\r', '\n']))?;
        }
    }

    /// Render a value for display, resolving symbol tokens to their text.
    pub fn render(&self, value: &Value) -> String {
        match value {
            Value::Symbol(sym) => match self.symbols.text(*sym) {
                Ok(text) => format!("'{text}"),
                Err(_) => value.to_string(),
            },
            Value::Quotation(items) => {
                let mut out = String::from("{");
                for item in items.iter() {
                    out.push(' ');
                    out.push_str(&self.render(item));
                }
                out.push_str(" }");
                out
            }
            Value::Flagged(_, inner) => self.render(inner),
            _ => value.to_string(),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_float(word: &str) -> Option<f64> {
    if !word.contains(['.', 'e', 'E']) {
        return None;
    }
    word.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::value::{Flags, NativeOp};

    fn stack_contents(interp: &Interpreter) -> Vec<Value> {
        interp.data.iter().cloned().collect()
    }

    fn double_op() -> NativeOp {
        NativeOp::new("double", |interp: &mut Interpreter| {
            let doubled = match interp.data.pop()? {
                Value::Int(n) => Value::Int(n * 2),
                Value::Int64(n) => Value::Int64(n * 2),
                Value::Uint64(n) => Value::Uint64(n * 2),
                Value::Float(x) => Value::Float(x * 2.0),
                other => {
                    return Err(TallyError::Syntax(format!(
                        "double expects a number, got {}",
                        other.type_name()
                    )))
                }
            };
            interp.data.push(doubled);
            Ok(())
        })
    }

    fn seed_double(interp: &mut Interpreter) {
        let sym = interp.intern("double");
        let mut scope = Scope::new();
        scope.define(sym, Value::Native(double_op()));
        interp.push_scope(scope);
    }

    #[test]
    fn literal_precedence() {
        let mut interp = Interpreter::new();
        assert_eq!(interp.classify("5"), Value::Int(5));
        assert_eq!(interp.classify("-12"), Value::Int(-12));
        assert_eq!(interp.classify("true"), Value::Bool(true));
        assert_eq!(interp.classify("false"), Value::Bool(false));
        assert_eq!(interp.classify("3.5"), Value::Float(3.5));
        assert_eq!(interp.classify("1e3"), Value::Float(1000.0));
        // Outside i32 but inside i64: the 64-bit signed form, not a float.
        assert_eq!(interp.classify("5000000000"), Value::Int64(5_000_000_000));
        // Outside i64: unsigned 64-bit.
        assert_eq!(
            interp.classify("18446744073709551615"),
            Value::Uint64(u64::MAX)
        );
        assert!(matches!(interp.classify("dup"), Value::Symbol(_)));
    }

    #[test]
    fn classification_is_deterministic_per_word() {
        let mut interp = Interpreter::new();
        let a = interp.classify("word");
        let b = interp.classify("word");
        assert_eq!(a, b);
    }

    #[test]
    fn literals_are_pushed_in_order() {
        let mut interp = Interpreter::new();
        interp.run_line("7 9").unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(7), Value::Int(9)]);
    }

    #[test]
    fn native_word_end_to_end() {
        let mut interp = Interpreter::new();
        seed_double(&mut interp);
        interp.try_run(Cursor::new("3 double")).unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(6)]);
    }

    #[test]
    fn undefined_name_carries_source_text() {
        let mut interp = Interpreter::new();
        let err = interp.run_line("nosuchword").unwrap_err();
        match err {
            TallyError::UndefinedName(name) => assert_eq!(name, "nosuchword"),
            other => panic!("expected UndefinedName, got {other:?}"),
        }
        assert!(interp.data.is_empty());
    }

    #[test]
    fn failed_run_halts_and_leaves_later_runs_unaffected() {
        let mut interp = Interpreter::new();
        // The failure on line one stops the run; line two never executes.
        interp.run(Cursor::new("nosuchword\n5"));
        assert!(interp.data.is_empty());

        let mut fresh = Interpreter::new();
        seed_double(&mut fresh);
        fresh.try_run(Cursor::new("4 double")).unwrap();
        assert_eq!(stack_contents(&fresh), vec![Value::Int(8)]);
    }

    #[test]
    fn shadowing_through_execution() {
        let mut interp = Interpreter::new();
        let t = interp.intern("t");

        let mut outer = Scope::new();
        outer.define(t, Value::Int(1));
        interp.push_scope(outer);
        let mut inner = Scope::new();
        inner.define(t, Value::Int(2));
        interp.push_scope(inner);

        interp.run_line("t").unwrap();
        interp.pop_scope().unwrap();
        interp.run_line("t").unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(2), Value::Int(1)]);
    }

    #[test]
    fn immediate_runs_regardless_of_compiling_depth() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let op = Value::Immediate(NativeOp::new("probe", move |_: &mut Interpreter| {
            counter.fetch_add(1, Ordering::Relaxed);
            Ok(())
        }));

        let mut interp = Interpreter::new();
        interp.execute(&op).unwrap();
        interp.compiling = 3;
        interp.execute(&op).unwrap();
        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert!(interp.data.is_empty());
    }

    #[test]
    fn executable_value_defers_while_compiling() {
        let op = Value::Native(double_op());
        let mut interp = Interpreter::new();
        interp.data.push(Value::Int(3));

        interp.compiling = 1;
        interp.execute(&op).unwrap();
        // Deferred: the native sits on the stack above the untouched 3.
        assert_eq!(interp.data.len(), 2);
        assert_eq!(*interp.data.peek().unwrap(), op);

        interp.data.pop().unwrap();
        interp.compiling = 0;
        interp.execute(&op).unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(6)]);
    }

    #[test]
    fn quotation_runs_elements_but_pushes_nested_quotations() {
        let nested = Value::quotation(vec![Value::Int(2)]);
        let quote = Value::quotation(vec![Value::Int(1), nested.clone(), Value::Int(3)]);

        let mut interp = Interpreter::new();
        interp.execute_now(&quote).unwrap();
        assert_eq!(
            stack_contents(&interp),
            vec![Value::Int(1), nested, Value::Int(3)]
        );
    }

    #[test]
    fn flat_quotation_has_cumulative_stack_effect() {
        let mut interp = Interpreter::new();
        seed_double(&mut interp);
        let double = Value::Symbol(interp.intern("double"));
        let quote = Value::flagged(
            Flags::EXECUTABLE,
            Value::quotation(vec![Value::Int(5), double]),
        );
        interp.execute(&quote).unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(10)]);
    }

    #[test]
    fn bare_quotation_is_data() {
        let mut interp = Interpreter::new();
        let quote = Value::quotation(vec![Value::Int(1)]);
        interp.execute(&quote).unwrap();
        assert_eq!(stack_contents(&interp), vec![quote]);
    }

    #[test]
    fn native_may_rewrite_the_remaining_line() {
        let mut interp = Interpreter::new();
        let sym = interp.intern("skip-rest");
        let mut scope = Scope::new();
        scope.define(
            sym,
            Value::Native(NativeOp::new("skip-rest", |interp: &mut Interpreter| {
                interp.line.clear();
                Ok(())
            })),
        );
        interp.push_scope(scope);

        interp.run_line("1 skip-rest 2 3").unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(1)]);
    }

    #[test]
    fn multi_line_stream_accumulates() {
        let mut interp = Interpreter::new();
        seed_double(&mut interp);
        interp.try_run(Cursor::new("3 double\n\n10 double\n")).unwrap();
        assert_eq!(stack_contents(&interp), vec![Value::Int(6), Value::Int(20)]);
    }

    #[test]
    fn render_resolves_symbol_text() {
        let mut interp = Interpreter::new();
        let sym = interp.intern("dup");
        assert_eq!(interp.render(&Value::Symbol(sym)), "'dup");
        let quote = Value::quotation(vec![Value::Int(1), Value::Symbol(sym)]);
        assert_eq!(interp.render(&quote), "{ 1 'dup }");
    }
}
