use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::matcher::*;
use crate::model::{Parsed, ParameterSummary};
use crate::parser::interface::{DefaultProvider, DescriptionBundle, SecretInput};

// We need a (dyn .. [ignoring T] ..) here in order to put all the fields of varying types T under one collection.
// In other words, we want the bottom of the object graph to include the types T, but up here we want to work across all T.
pub(crate) type OptionCapture<'a> = (OptionConfig, Box<(dyn AnonymousCapturable + 'a)>);
pub(crate) type ArgumentCapture<'a> = (ArgumentConfig, Box<(dyn AnonymousCapturable + 'a)>);

/// An error in the declaration of the command line parser.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An alias is declared by more than one option of the same command.
    #[error("Config error: the alias '{0}' is declared more than once.")]
    DuplicateAlias(String),

    /// An option is declared without any alias.
    #[error("Config error: an option must declare at least one alias.")]
    MissingAliases,

    /// A sub-command name is declared more than once.
    #[error("Config error: the command '{0}' is declared more than once.")]
    DuplicateCommand(String),

    /// Two positional arguments share an index.
    #[error("Config error: the argument index {0} is declared more than once.")]
    DuplicatePosition(usize),

    /// The positional argument indices skip over an index.
    #[error("Config error: missing argument for index {0}.")]
    MissingPosition(usize),

    /// A required positional argument follows an optional one.
    #[error("Config error: the required argument '{name}' cannot follow the optional argument '{previous}'.")]
    RequiredAfterOptional {
        /// The required argument.
        name: String,
        /// The optional argument before it.
        previous: String,
    },

    /// More than one catch-all is declared on the same command.
    #[error("Config error: only one catch-all may be declared.")]
    MultipleCatchAll,

    /// The arity does not suit the parameter's field.
    #[error("Config error: the arity {arity} is invalid for '{name}'.")]
    InvalidArity {
        /// The parameter.
        name: String,
        /// The declared arity.
        arity: u8,
    },

    /// A password option does not take a value.
    #[error("Config error: the password option '{0}' must take a value.")]
    PasswordWithoutValue(String),

    /// No converter could be found for the parameter's type.
    #[error("Config error: no converter is available for '{name}' ({type_name}).")]
    MissingConverter {
        /// The parameter.
        name: String,
        /// The parameter's value type.
        type_name: &'static str,
    },
}

/// An error in the tokens given to the command line parser.
#[derive(Debug, Error)]
pub enum ParseError {
    /// An option token matches no declared alias.
    #[error("Parse error: unknown option '{0}'.")]
    UnknownOption(String),

    /// A token names no declared sub-command.
    #[error("Parse error: unknown command '{0}'.")]
    UnknownCommand(String),

    /// A single valued option appears more than once.
    #[error("Parse error: the option '{0}' may only be specified once.")]
    DuplicateOption(String),

    /// Too few tokens follow an option.
    #[error("Parse error: {arity} value(s) expected after '{name}'.")]
    InsufficientArity {
        /// The option.
        name: String,
        /// The number of values it takes.
        arity: u8,
    },

    /// Required options are absent.
    #[error("Parse error: missing the required option(s): {}.", .0.join(", "))]
    MissingRequiredOptions(Vec<String>),

    /// A required positional argument is absent.
    #[error("Parse error: missing the argument '{0}'.")]
    MissingPositionalArgument(String),

    /// A positional token is left over, with no catch-all to receive it.
    #[error("Parse error: unexpected value '{0}'.")]
    UnexpectedValue(String),

    /// A value cannot convert to its parameter's type.
    #[error("Parse error: '{value}' cannot convert to {type_name} for '{name}' ({message}).")]
    Conversion {
        /// The parameter.
        name: String,
        /// The offending token.
        value: String,
        /// The parameter's value type.
        type_name: &'static str,
        /// The converter's explanation.
        message: String,
    },

    /// An `@file` token cannot be read.
    #[error("Parse error: cannot expand the file '{path}'.")]
    FileExpansion {
        /// The file path.
        path: String,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// A password option has no console to prompt on.
    #[error("Parse error: no console is available to obtain '{0}'.")]
    NoConsole(String),
}

/// Behaviour to capture an implicit generic type T from an input `&str`.
///
/// We use this at the middle/top of the argument parser object graph so that different types may all be 'captured' in a single argument parser.
pub(crate) trait AnonymousCapturable {
    /// Declare that the parameter has been matched.
    fn matched(&mut self);

    /// Capture a value anonymously for this parameter.
    fn capture(&mut self, value: &str) -> Result<(), ParseError>;
}

/// The collaborators available while binding.
pub(crate) struct Context<'c> {
    pub(crate) secret_input: &'c dyn SecretInput,
    pub(crate) default_provider: Option<&'c dyn DefaultProvider>,
    pub(crate) bundle: Option<&'c dyn DescriptionBundle>,
}

/// The parse engine of one command level, owning the captures of its parameters.
pub(crate) struct Binder<'a> {
    pub(super) layout: Layout,
    pub(super) options: Vec<Box<(dyn AnonymousCapturable + 'a)>>,
    pub(super) arguments: Vec<Box<(dyn AnonymousCapturable + 'a)>>,
    pub(super) catch_all: Option<Box<(dyn AnonymousCapturable + 'a)>>,
    pub(super) commands: HashMap<String, Binder<'a>>,
}

impl<'a> std::fmt::Debug for Binder<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder{..}").finish()
    }
}

impl<'a> Binder<'a> {
    pub(crate) fn new(
        groups: Vec<GroupConfig>,
        options: Vec<OptionCapture<'a>>,
        mut arguments: Vec<ArgumentCapture<'a>>,
        catch_all: Option<Box<(dyn AnonymousCapturable + 'a)>>,
        commands: Vec<(String, Binder<'a>)>,
    ) -> Result<Self, ConfigError> {
        arguments.sort_by_key(|(config, _)| config.index);
        let (option_configs, option_captures): (Vec<_>, Vec<_>) = options.into_iter().unzip();
        let (argument_configs, argument_captures): (Vec<_>, Vec<_>) =
            arguments.into_iter().unzip();
        let command_names = commands.iter().map(|(name, _)| name.clone()).collect();
        let layout = Layout::new(
            groups,
            option_configs,
            argument_configs,
            command_names,
        )?;

        Ok(Self {
            layout,
            options: option_captures,
            arguments: argument_captures,
            catch_all,
            commands: commands.into_iter().collect(),
        })
    }

    /// Summarize the options of this command level, in declaration order.
    pub(crate) fn parameters(&self, bundle: Option<&dyn DescriptionBundle>) -> Vec<ParameterSummary> {
        self.layout
            .options()
            .iter()
            .map(|option| ParameterSummary {
                names: option.names.clone(),
                description: option.description(bundle),
                required: option.required,
                hidden: option.hidden,
                arity: option.arity,
            })
            .collect()
    }

    /// Bind the `tokens` into the captures of this command level, delegating to a sub-command once one is named.
    pub(crate) fn bind(
        &mut self,
        tokens: &[String],
        context: &Context<'_>,
        parsed: &mut Parsed,
    ) -> Result<(), ParseError> {
        let tokens = self.layout.split_separators(tokens);
        self.apply_defaults(context)?;

        let mut bind = Bind {
            options: &mut self.options,
            arguments: &mut self.arguments,
            catch_all: self.catch_all.as_mut(),
            commands: &mut self.commands,
            context,
            parsed,
            assigned: vec![false; self.layout.options().len()],
            required: self
                .layout
                .options()
                .iter()
                .enumerate()
                .filter(|(_, option)| option.required)
                .map(|(entry, _)| entry)
                .collect(),
        };
        let walked = self.layout.walk(&tokens, &mut bind)?;

        if !bind.required.is_empty() {
            return Err(ParseError::MissingRequiredOptions(
                bind.required
                    .iter()
                    .map(|entry| self.layout.option(*entry).name().to_string())
                    .collect(),
            ));
        }

        if !walked.stopped && self.layout.commands().is_empty() {
            if let Some(argument) = self.layout.arguments()[walked.slot..]
                .iter()
                .find(|argument| argument.required)
            {
                return Err(ParseError::MissingPositionalArgument(argument.name.clone()));
            }
        }

        Ok(())
    }

    /// Store the provided defaults of value-taking options.
    /// A default neither counts as an assignment nor satisfies a required option.
    fn apply_defaults(&mut self, context: &Context<'_>) -> Result<(), ParseError> {
        let provider = match context.default_provider {
            Some(provider) => provider,
            None => return Ok(()),
        };

        for (option, capture) in self.layout.options().iter().zip(self.options.iter_mut()) {
            if option.arity == 0 {
                continue;
            }

            if let Some(value) = provider.default_value(option.name()) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Default '{value}' for '{}'.", option.name());
                }

                capture.capture(&value)?;
            }
        }

        Ok(())
    }
}

struct Bind<'b, 'a> {
    options: &'b mut [Box<(dyn AnonymousCapturable + 'a)>],
    arguments: &'b mut [Box<(dyn AnonymousCapturable + 'a)>],
    catch_all: Option<&'b mut Box<(dyn AnonymousCapturable + 'a)>>,
    commands: &'b mut HashMap<String, Binder<'a>>,
    context: &'b Context<'b>,
    parsed: &'b mut Parsed,
    assigned: Vec<bool>,
    required: BTreeSet<usize>,
}

impl<'b, 'a> Action for Bind<'b, 'a> {
    type Error = ParseError;

    fn visits(&self, index: usize, length: usize) -> bool {
        index < length
    }

    fn option(
        &mut self,
        layout: &Layout,
        tokens: &[String],
        cursor: &mut Cursor,
        token: &str,
        entry: Option<usize>,
    ) -> Result<Flow, Self::Error> {
        let entry = entry.ok_or_else(|| ParseError::UnknownOption(token.to_string()))?;
        let option = layout.option(entry);
        let name = option.name();

        if self.assigned[entry] && !option.multiple {
            return Err(ParseError::DuplicateOption(name.to_string()));
        }

        let capture = &mut self.options[entry];
        capture.matched();

        if option.password {
            let description = option.description(self.context.bundle);
            let value = self
                .context
                .secret_input
                .prompt_secret(name, description.as_deref())
                .ok_or_else(|| ParseError::NoConsole(name.to_string()))?;
            capture.capture(&value)?;
        } else {
            let span = layout.value_span(tokens, cursor.index, entry);

            if span.last(cursor.index) >= tokens.len() {
                return Err(ParseError::InsufficientArity {
                    name: name.to_string(),
                    arity: option.arity,
                });
            }

            for value in &tokens[span.values(cursor.index)] {
                capture.capture(unquote(value))?;
            }

            cursor.index = span.last(cursor.index);
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Bound option '{name}'.");
        }

        self.assigned[entry] = true;
        self.required.remove(&entry);
        self.parsed.assign(name);
        Ok(Flow::Continue)
    }

    fn argument(
        &mut self,
        _layout: &Layout,
        _index: usize,
        slot: usize,
        token: &str,
    ) -> Result<Flow, Self::Error> {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Bound '{token}' to argument {slot}.");
        }

        let capture = &mut self.arguments[slot];
        capture.matched();
        capture.capture(token)?;
        Ok(Flow::Continue)
    }

    fn remainder(
        &mut self,
        _layout: &Layout,
        _index: usize,
        token: &str,
    ) -> Result<Flow, Self::Error> {
        match &mut self.catch_all {
            Some(capture) => {
                capture.matched();
                capture.capture(token)?;
                Ok(Flow::Continue)
            }
            None => Err(ParseError::UnexpectedValue(token.to_string())),
        }
    }

    fn command(
        &mut self,
        _layout: &Layout,
        tokens: &[String],
        index: usize,
        token: &str,
    ) -> Result<Flow, Self::Error> {
        match self.commands.get_mut(token) {
            Some(binder) => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Entering the command '{token}'.");
                }

                self.parsed.enter(token);
                binder.bind(&tokens[index + 1..], self.context, self.parsed)?;
                Ok(Flow::Break)
            }
            None => Err(ParseError::UnknownCommand(token.to_string())),
        }
    }
}

#[cfg(test)]
pub(crate) mod test {
    use crate::parser::{AnonymousCapturable, ParseError};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every value captured, rejecting the value `!`.
    #[derive(Default, Clone)]
    pub(crate) struct Tape {
        matched: Rc<RefCell<usize>>,
        values: Rc<RefCell<Vec<String>>>,
    }

    impl Tape {
        pub(crate) fn times_matched(&self) -> usize {
            *self.matched.borrow()
        }

        pub(crate) fn values(&self) -> Vec<String> {
            self.values.borrow().clone()
        }
    }

    impl AnonymousCapturable for Tape {
        fn matched(&mut self) {
            *self.matched.borrow_mut() += 1;
        }

        fn capture(&mut self, value: &str) -> Result<(), ParseError> {
            if value == "!" {
                return Err(ParseError::Conversion {
                    name: "tape".to_string(),
                    value: value.to_string(),
                    type_name: "Tape",
                    message: "rejected".to_string(),
                });
            }

            self.values.borrow_mut().push(value.to_string());
            Ok(())
        }
    }
}
