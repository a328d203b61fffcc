use std::collections::HashMap;
use std::io::{self, BufRead, IsTerminal};

use crate::parser::base::ParseError;

pub(crate) trait UserInterface {
    fn print_error(&self, error: ParseError);
}

pub(crate) struct ConsoleInterface {}

impl Default for ConsoleInterface {
    fn default() -> Self {
        Self {}
    }
}

impl UserInterface for ConsoleInterface {
    fn print_error(&self, error: ParseError) {
        eprintln!("{error}");
    }
}

/// Behaviour to obtain the value of a password option, in place of reading it from the Cli tokens.
pub trait SecretInput {
    /// Prompt for the secret of the option `name`.
    /// Returns `None` when there is no way to ask (ex: no interactive console).
    fn prompt_secret(&self, name: &str, description: Option<&str>) -> Option<String>;
}

/// Prompts on the interactive console, echoing the secret as it is typed (input is NOT masked).
///
/// The prompt is written to stderr, and the value read as a single line from stdin.
/// Supply a masking [`SecretInput`] via `CommandLineParser::secret_input` where the echo is unacceptable.
#[derive(Debug, Default)]
pub struct ConsoleSecretInput;

impl SecretInput for ConsoleSecretInput {
    fn prompt_secret(&self, name: &str, description: Option<&str>) -> Option<String> {
        let stdin = io::stdin();

        if !stdin.is_terminal() {
            return None;
        }

        match description {
            Some(description) => eprint!("Value for {name} ({description}): "),
            None => eprint!("Value for {name}: "),
        };

        let mut line = String::default();
        stdin.lock().read_line(&mut line).ok()?;
        Some(line.trim_end_matches(&['\r', '\n'][..]).to_string())
    }
}

/// Behaviour to supply default values for options, by the option's first alias.
///
/// A default is converted and stored before the Cli tokens are bound.
/// It does not count as an assignment, so it does not satisfy a required option.
pub trait DefaultProvider {
    /// The raw default value for the option `name`, if any.
    fn default_value(&self, name: &str) -> Option<String>;
}

impl DefaultProvider for HashMap<String, String> {
    fn default_value(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<F> DefaultProvider for F
where
    F: Fn(&str) -> Option<String>,
{
    fn default_value(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Behaviour to look up parameter descriptions by key (ex: for localization).
pub trait DescriptionBundle {
    /// The description for `key`, if the bundle has one.
    fn lookup(&self, key: &str) -> Option<String>;
}

impl DescriptionBundle for HashMap<String, String> {
    fn lookup(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

#[cfg(test)]
pub(crate) mod util {
    use crate::parser::{ParseError, SecretInput, UserInterface};
    use std::cell::RefCell;

    pub(crate) struct InMemoryInterface {
        error: RefCell<Option<String>>,
    }

    impl Default for InMemoryInterface {
        fn default() -> Self {
            Self {
                error: RefCell::new(None),
            }
        }
    }

    impl UserInterface for InMemoryInterface {
        fn print_error(&self, error: ParseError) {
            // Assumes print_error() is only ever called once.
            self.error.borrow_mut().replace(error.to_string());
        }
    }

    impl InMemoryInterface {
        pub(crate) fn consume_error(&self) -> Option<String> {
            self.error.borrow_mut().take()
        }
    }

    pub(crate) struct NoSecret;

    impl SecretInput for NoSecret {
        fn prompt_secret(&self, _name: &str, _description: Option<&str>) -> Option<String> {
            None
        }
    }

    pub(crate) struct FixedSecret(pub(crate) String);

    impl SecretInput for FixedSecret {
        fn prompt_secret(&self, _name: &str, _description: Option<&str>) -> Option<String> {
            Some(self.0.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::util::*;
    use super::*;
    use crate::test::assert_contains;

    #[test]
    fn hash_map_defaults() {
        let defaults = HashMap::from([("--name".to_string(), "value".to_string())]);
        assert_eq!(defaults.default_value("--name"), Some("value".to_string()));
        assert_eq!(defaults.default_value("--other"), None);
    }

    #[test]
    fn closure_defaults() {
        let defaults = |name: &str| -> Option<String> { Some(format!("{name}!")) };
        assert_eq!(defaults.default_value("-n"), Some("-n!".to_string()));
    }

    #[test]
    fn hash_map_bundle() {
        let bundle = HashMap::from([("key".to_string(), "described".to_string())]);
        assert_eq!(bundle.lookup("key"), Some("described".to_string()));
        assert_eq!(bundle.lookup("other"), None);
    }

    #[test]
    fn in_memory_interface() {
        // Setup
        let interface = InMemoryInterface::default();

        // Execute
        interface.print_error(ParseError::UnknownOption("--x".to_string()));

        // Verify
        let error = interface.consume_error().unwrap();
        assert_contains!(error, "--x");
        assert_eq!(interface.consume_error(), None);
    }

    #[test]
    fn fixed_secret() {
        assert_eq!(
            FixedSecret("s".to_string()).prompt_secret("-p", None),
            Some("s".to_string())
        );
        assert_eq!(NoSecret.prompt_secret("-p", Some("the password")), None);
    }
}
