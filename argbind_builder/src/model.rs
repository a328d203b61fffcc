use std::collections::BTreeSet;

/// The outcome of a successful parse.
///
/// The bound values themselves live in the program variables handed to each field.
/// This records what the parser resolved along the way.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Parsed {
    commands: Vec<String>,
    assigned: BTreeSet<String>,
}

impl Parsed {
    pub(crate) fn enter(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    pub(crate) fn assign(&mut self, name: impl Into<String>) {
        self.assigned.insert(name.into());
    }

    /// The first sub-command selected on the Cli, if any.
    pub fn command(&self) -> Option<&str> {
        self.commands.first().map(String::as_str)
    }

    /// The full chain of selected sub-commands, outermost first.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Whether the option (identified by its first alias) received a value from the Cli.
    /// Values supplied by a [`DefaultProvider`](./trait.DefaultProvider.html) do not count.
    pub fn was_assigned(&self, name: &str) -> bool {
        self.assigned.contains(name)
    }
}

/// A read-only view over one declared option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSummary {
    /// The aliases, in declaration order.
    pub names: Vec<String>,
    /// The description, resolved through the parser's bundle when a key was given.
    pub description: Option<String>,
    /// Whether the option must appear on the Cli.
    pub required: bool,
    /// Whether the option is hidden from tab completion.
    pub hidden: bool,
    /// The number of value tokens consumed (`0` for a flag).
    pub arity: u8,
}

impl ParameterSummary {
    /// The aliases joined for display, ex: `-v, --verbose`.
    pub fn display_names(&self) -> String {
        self.names.join(", ")
    }
}
