/// Marker trait for capturable types that can formulate an option in the Cli.
pub trait CliOption {}

/// Marker trait for capturable types that can formulate a positional argument in the Cli.
pub trait CliArgument {}

/// Behaviour to capture an explicit generic type T.
///
/// We use this at the bottom of the command line parser object graph so the compiler can maintain each field's type.
/// Conversion from the raw `&str` happens one level up, where the field's converter is known.
#[doc(hidden)]
pub trait GenericCapturable<'a, T> {
    /// Declare that the parameter has been matched.
    fn matched(&mut self);

    /// Capture a converted value into this parameter.
    fn capture(&mut self, value: T);

    /// The number of value tokens this field consumes by default (`0` for a flag).
    fn arity(&self) -> u8;

    /// Whether this field accepts repeated assignment.
    fn multiple(&self) -> bool;
}
