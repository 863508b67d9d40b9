// Quotation, definition and comment words
// Provides: { } ' def call if #
//
// `{` and `}` are the only words that touch the compiling counter: the
// dispatcher defers everything between them onto the data stack, and `}`
// scoops those values into a quotation. The marker saved on the control
// stack is the data depth at the matching `{`.

use crate::error::{TallyError, TallyResult};
use crate::interp::Interpreter;
use crate::scope::Scope;
use crate::value::{Flags, Value};

pub(super) fn register(interp: &mut Interpreter, scope: &mut Scope) {
    super::immediate(interp, scope, "{", brace_open);
    super::immediate(interp, scope, "}", brace_close);
    super::immediate(interp, scope, "'", tick);
    super::immediate(interp, scope, "#", comment);
    super::native(interp, scope, "def", def);
    super::native(interp, scope, "call", call);
    super::native(interp, scope, "if", branch);
}

fn brace_open(interp: &mut Interpreter) -> TallyResult<()> {
    interp.control.push(Value::Uint64(interp.data.len() as u64));
    interp.compiling += 1;
    Ok(())
}

fn brace_close(interp: &mut Interpreter) -> TallyResult<()> {
    if interp.compiling == 0 {
        return Err(TallyError::Syntax("unbalanced '}'".into()));
    }
    interp.compiling -= 1;
    let at = match interp.control.pop()? {
        Value::Uint64(n) => n as usize,
        other => {
            return Err(TallyError::Syntax(format!(
                "'}}' found a {} on the control stack instead of its marker",
                other.type_name()
            )))
        }
    };
    let items = interp.data.split_off(at);
    interp.data.push(Value::quotation(items));
    Ok(())
}

/// `' word` pushes the following word as a symbol literal, consuming it
/// from the remaining line before the driver classifies it.
fn tick(interp: &mut Interpreter) -> TallyResult<()> {
    let word = interp
        .next_word()
        .ok_or_else(|| TallyError::Syntax("' expects a word to follow it".into()))?;
    let sym = interp.intern(&word);
    interp.data.push(Value::Symbol(sym));
    Ok(())
}

/// `#` swallows the rest of the line, at any compiling depth.
fn comment(interp: &mut Interpreter) -> TallyResult<()> {
    interp.line.clear();
    Ok(())
}

/// `( value sym -- )` binds in the innermost scope. Quotations are wrapped
/// executable so the bound word runs its body on lookup.
fn def(interp: &mut Interpreter) -> TallyResult<()> {
    let name = interp.data.pop()?;
    let sym = match name {
        Value::Symbol(sym) => sym,
        other => {
            return Err(TallyError::Syntax(format!(
                "def expects a symbol name, got {}",
                other.type_name()
            )))
        }
    };
    let body = match interp.data.pop()? {
        quote @ Value::Quotation(_) => Value::flagged(Flags::EXECUTABLE, quote),
        other => other,
    };
    interp.define(sym, body)
}

/// `( quot -- ... )` runs a quotation now.
fn call(interp: &mut Interpreter) -> TallyResult<()> {
    let value = interp.data.pop()?;
    interp.execute_now(&value)
}

/// `( bool then-quot else-quot -- ... )`
fn branch(interp: &mut Interpreter) -> TallyResult<()> {
    let otherwise = interp.data.pop()?;
    let then = interp.data.pop()?;
    let chosen = match interp.data.pop()? {
        Value::Bool(true) => then,
        Value::Bool(false) => otherwise,
        other => {
            return Err(TallyError::Syntax(format!(
                "if expects a boolean condition, got {}",
                other.type_name()
            )))
        }
    };
    interp.execute_now(&chosen)
}
