//! Traits which, typically, may be imported without concern: `use argbind::prelude::*`.
use crate::parser::CompletionResult;

/// Behaviour for multiple (0 to many) items T to be collected together.
// Needs to be imported in order to implement a custom `Collectable`.
pub trait Collectable<T> {
    /// Add a value to this `Collectable`.
    fn add(&mut self, item: T);
}

/// Behaviour to suggest values for a positional argument during tab completion.
///
/// The `CompletionResult` already knows what the user typed so far.
/// Offer every candidate in full; non-matching candidates are dropped by the result.
// Needs to be imported in order to implement a custom `Completer`.
pub trait Completer {
    fn complete(&self, result: &mut CompletionResult);
}

impl<F> Completer for F
where
    F: Fn(&mut CompletionResult),
{
    fn complete(&self, result: &mut CompletionResult) {
        self(result)
    }
}
