// Stack-manipulation words
// Provides: dup drop swap over depth . .s

use crate::error::TallyResult;
use crate::interp::Interpreter;
use crate::scope::Scope;
use crate::value::Value;

pub(super) fn register(interp: &mut Interpreter, scope: &mut Scope) {
    super::native(interp, scope, "dup", dup);
    super::native(interp, scope, "drop", drop_top);
    super::native(interp, scope, "swap", swap);
    super::native(interp, scope, "over", over);
    super::native(interp, scope, "depth", depth);
    super::native(interp, scope, ".", print_top);
    super::native(interp, scope, ".s", print_stack);
}

fn dup(interp: &mut Interpreter) -> TallyResult<()> {
    let top = interp.data.peek()?.clone();
    interp.data.push(top);
    Ok(())
}

fn drop_top(interp: &mut Interpreter) -> TallyResult<()> {
    interp.data.pop()?;
    Ok(())
}

fn swap(interp: &mut Interpreter) -> TallyResult<()> {
    let b = interp.data.pop()?;
    let a = interp.data.pop()?;
    interp.data.push(b);
    interp.data.push(a);
    Ok(())
}

fn over(interp: &mut Interpreter) -> TallyResult<()> {
    let b = interp.data.pop()?;
    let a = interp.data.pop()?;
    let copy = a.clone();
    interp.data.push(a);
    interp.data.push(b);
    interp.data.push(copy);
    Ok(())
}

fn depth(interp: &mut Interpreter) -> TallyResult<()> {
    let n = interp.data.len() as i64;
    interp.data.push(Value::Int64(n));
    Ok(())
}

fn print_top(interp: &mut Interpreter) -> TallyResult<()> {
    let top = interp.data.pop()?;
    println!("{}", interp.render(&top));
    Ok(())
}

fn print_stack(interp: &mut Interpreter) -> TallyResult<()> {
    let rendered: Vec<String> = interp.data.iter().map(|v| interp.render(v)).collect();
    println!("[ {} ]", rendered.join(" "));
    Ok(())
}
