// Tally Base Vocabulary
// The engine itself ships no words; this module is the optional starter
// vocabulary the CLI seeds. Embedders may install it, extend it with their
// own scopes, or ignore it entirely.

mod math;
mod quote;
mod stack;

use crate::error::TallyResult;
use crate::interp::Interpreter;
use crate::scope::Scope;
use crate::value::{NativeOp, Value};

/// Build the base vocabulary and push it onto the interpreter's scope
/// chain. Words defined later with `def` land in this scope.
pub fn install(interp: &mut Interpreter) {
    let mut scope = Scope::new();
    stack::register(interp, &mut scope);
    math::register(interp, &mut scope);
    quote::register(interp, &mut scope);
    interp.push_scope(scope);
}

type WordFn = fn(&mut Interpreter) -> TallyResult<()>;

fn native(interp: &mut Interpreter, scope: &mut Scope, name: &'static str, func: WordFn) {
    let sym = interp.intern(name);
    scope.define(sym, Value::Native(NativeOp::new(name, func)));
}

/// Register a word that runs the instant it is dispatched, even inside a
/// quotation body (parsing and definition-time words need this).
fn immediate(interp: &mut Interpreter, scope: &mut Scope, name: &'static str, func: WordFn) {
    let sym = interp.intern(name);
    scope.define(sym, Value::Immediate(NativeOp::new(name, func)));
}
