// Tally Scripting Engine
// A small, extensible stack-based (Forth-style) interpreter for scripting
// test scenarios. The embedding application supplies the primitive
// vocabulary; the engine supplies dispatch, scoping and the line driver.

pub mod builtins;
pub mod error;
pub mod interp;
pub mod scope;
pub mod stack;
pub mod symbols;
pub mod value;

pub use error::{TallyError, TallyResult};
pub use interp::Interpreter;
pub use scope::{Scope, ScopeChain};
pub use stack::Stack;
pub use symbols::{Symbol, SymbolTable};
pub use value::{Flags, NativeOp, Value};
