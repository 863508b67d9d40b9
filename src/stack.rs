// Tally Stack
// LIFO container used both for data and for control. Underflow is a
// recoverable error, never a panic.

use smallvec::SmallVec;

use crate::error::{TallyError, TallyResult};
use crate::value::Value;

#[derive(Debug, Default, Clone)]
pub struct Stack {
    items: SmallVec<[Value; 8]>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> TallyResult<Value> {
        self.items.pop().ok_or(TallyError::StackUnderflow)
    }

    pub fn peek(&self) -> TallyResult<&Value> {
        self.items.last().ok_or(TallyError::StackUnderflow)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Remove and return everything from `at` upward, oldest first.
    /// Used by quotation-building words to scoop up deferred values.
    pub fn split_off(&mut self, at: usize) -> Vec<Value> {
        self.items.drain(at.min(self.items.len())..).collect()
    }

    /// Bottom-to-top iteration, for diagnostics and tests.
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.items.iter()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
