use std::collections::HashSet;
use std::marker::PhantomData;

use crate::api::capture::*;
use crate::prelude::Collectable;

/// A parameter that takes a single value (arity 1).
/// Supplying it twice on the Cli is an error.
pub struct Scalar<'a, T> {
    variable: &'a mut T,
}

impl<'a, T> CliOption for Scalar<'a, T> {}
impl<'a, T> CliArgument for Scalar<'a, T> {}

impl<'a, T> Scalar<'a, T> {
    /// Create a scalar parameter.
    pub fn new(variable: &'a mut T) -> Self {
        Self { variable }
    }
}

impl<'a, T> GenericCapturable<'a, T> for Scalar<'a, T> {
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, value: T) {
        *self.variable = value;
    }

    fn arity(&self) -> u8 {
        1
    }

    fn multiple(&self) -> bool {
        false
    }
}

/// An option parameter that takes no values (a flag).
/// When matched, the `target` is assigned onto the variable.
pub struct Switch<'a, T> {
    variable: &'a mut T,
    target: Option<T>,
}

impl<'a, T> CliOption for Switch<'a, T> {}

impl<'a, T> Switch<'a, T> {
    /// Create a switch parameter.
    pub fn new(variable: &'a mut T, target: T) -> Self {
        Self {
            variable,
            target: Some(target),
        }
    }
}

impl<'a, T> GenericCapturable<'a, T> for Switch<'a, T> {
    fn matched(&mut self) {
        if let Some(target) = self.target.take() {
            *self.variable = target;
        }
    }

    fn capture(&mut self, _value: T) {
        unreachable!("internal error - must not capture on a Switch");
    }

    fn arity(&self) -> u8 {
        0
    }

    fn multiple(&self) -> bool {
        false
    }
}

/// A parameter that maps down to [`Option`], taking a single value (arity 1).
pub struct Optional<'a, T> {
    variable: &'a mut Option<T>,
}

impl<'a, T> CliOption for Optional<'a, T> {}
impl<'a, T> CliArgument for Optional<'a, T> {}

impl<'a, T> Optional<'a, T> {
    /// Create an optional parameter.
    pub fn new(variable: &'a mut Option<T>) -> Self {
        Self { variable }
    }
}

impl<'a, T> GenericCapturable<'a, T> for Optional<'a, T> {
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, value: T) {
        self.variable.replace(value);
    }

    fn arity(&self) -> u8 {
        1
    }

    fn multiple(&self) -> bool {
        false
    }
}

/// A parameter that collects multiple values.
///
/// Each occurrence on the Cli consumes the parameter's arity (1 unless configured via `Parameter::arity`).
/// Repeated occurrences keep adding to the collection, in encounter order.
pub struct Collection<'a, C, T>
where
    C: 'a + Collectable<T>,
{
    variable: &'a mut C,
    _phantom: PhantomData<T>,
}

impl<'a, C, T> CliOption for Collection<'a, C, T> where C: 'a + Collectable<T> {}

impl<'a, C, T> CliArgument for Collection<'a, C, T> where C: 'a + Collectable<T> {}

impl<'a, C, T> Collection<'a, C, T>
where
    C: 'a + Collectable<T>,
{
    /// Create a collection parameter.
    pub fn new(variable: &'a mut C) -> Self {
        Self {
            variable,
            _phantom: PhantomData,
        }
    }
}

impl<'a, C, T> GenericCapturable<'a, T> for Collection<'a, C, T>
where
    C: 'a + Collectable<T>,
{
    fn matched(&mut self) {
        // Do nothing.
    }

    fn capture(&mut self, value: T) {
        self.variable.add(value);
    }

    fn arity(&self) -> u8 {
        1
    }

    fn multiple(&self) -> bool {
        true
    }
}

impl<T> Collectable<T> for Vec<T> {
    fn add(&mut self, item: T) {
        self.push(item);
    }
}

impl<T: Eq + std::hash::Hash> Collectable<T> for HashSet<T> {
    fn add(&mut self, item: T) {
        self.insert(item);
    }
}
