use std::rc::Rc;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::{Declared, Parameter};
use crate::constant::*;
use crate::matcher::GroupConfig;
use crate::parser::{
    AnonymousCapturable, ArgumentCapture, Binder, Collaborators, ConfigError, ConsoleInterface,
    DefaultProvider, DescriptionBundle, GeneralParser, OptionCapture, SecretInput, UserInterface,
};

/// The declared parameters of one group, before they join a `CommandLineParser`.
#[derive(Default)]
struct Declarations<'a> {
    options: Vec<OptionCapture<'a>>,
    arguments: Vec<ArgumentCapture<'a>>,
    catch_alls: Vec<Box<(dyn AnonymousCapturable + 'a)>>,
    // Only the first error is reported.
    error: Option<ConfigError>,
}

impl<'a> Declarations<'a> {
    fn declare<T: 'static>(&mut self, parameter: Parameter<'a, T>) {
        match parameter.consume().declare(0) {
            Ok(Declared::Option(config, capture)) => self.options.push((config, capture)),
            Ok(Declared::Argument(config, capture)) => self.arguments.push((config, capture)),
            Ok(Declared::CatchAll(capture)) => self.catch_alls.push(capture),
            Err(error) => self.fail(error),
        }
    }

    fn fail(&mut self, error: ConfigError) {
        if self.error.is_none() {
            self.error.replace(error);
        }
    }

    fn absorb(&mut self, other: Declarations<'a>, group: usize) {
        if let Some(error) = other.error {
            self.fail(error);
        }

        self.options
            .extend(other.options.into_iter().map(|(mut config, capture)| {
                config.group = group;
                (config, capture)
            }));
        self.arguments.extend(other.arguments);
        self.catch_alls.extend(other.catch_alls);
    }
}

/// A set of options sharing their token rules.
///
/// By default, options are recognized by a leading `-` and take their values from the following tokens.
/// A group may instead declare separators (ex: `=`), so that `--name=value` is split into `--name` and `value`.
///
/// ### Example
/// ```
/// # use argbind_builder as argbind;
/// use argbind::{CommandLineParser, Parameter, ParameterGroup, Scalar};
///
/// let mut author: String = String::default();
/// let parser = CommandLineParser::new("program")
///     .group(
///         ParameterGroup::new()
///             .separators("=:")
///             .add(Parameter::option(Scalar::new(&mut author), ["--author"])),
///     )
///     .build();
///
/// parser.parse_tokens(&["--author=cedric"]).unwrap();
/// assert_eq!(&author, "cedric");
/// ```
pub struct ParameterGroup<'a> {
    separators: String,
    prefixes: String,
    declarations: Declarations<'a>,
}

impl<'a> Default for ParameterGroup<'a> {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.to_string(),
            prefixes: DEFAULT_OPTION_PREFIXES.to_string(),
            declarations: Declarations::default(),
        }
    }
}

impl<'a> ParameterGroup<'a> {
    /// Create a parameter group with the default token rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the characters which separate an option from its value within one token.
    /// A single space (the default) disables splitting.
    pub fn separators(mut self, separators: impl Into<String>) -> Self {
        self.separators = separators.into();
        self
    }

    /// Set the characters which mark a token as an option (default `-`).
    pub fn option_prefixes(mut self, prefixes: impl Into<String>) -> Self {
        self.prefixes = prefixes.into();
        self
    }

    /// Add a parameter to this group.
    pub fn add<T: 'static>(mut self, parameter: Parameter<'a, T>) -> Self {
        self.declarations.declare(parameter);
        self
    }
}

/// The base command line parser.
///
/// ### Example
/// ```
/// # use argbind_builder as argbind;
/// use argbind::CommandLineParser;
///
/// let parser = CommandLineParser::new("program")
///     // Configure with CommandLineParser::add, CommandLineParser::group and CommandLineParser::command.
///     .build();
/// parser.parse_tokens(&[]).unwrap();
/// ```
pub struct CommandLineParser<'a> {
    program: String,
    groups: Vec<GroupConfig>,
    declarations: Declarations<'a>,
    commands: Vec<(String, CommandLineParser<'a>)>,
    collaborators: Collaborators<'a>,
}

impl<'a> CommandLineParser<'a> {
    /// Create a command line parser.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::CommandLineParser;
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .build();
    ///
    /// parser.parse_tokens(vec![].as_slice()).unwrap();
    /// ```
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            groups: vec![GroupConfig::default()],
            declarations: Declarations::default(),
            commands: Vec::default(),
            collaborators: Collaborators::default(),
        }
    }

    /// Add an option, positional argument, or catch-all to the command line parser, under the default token rules.
    ///
    /// Positional arguments are ordered by their index, not by the order they are added.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{CommandLineParser, Parameter, Scalar};
    ///
    /// let mut a: u32 = 0;
    /// let mut b: u32 = 0;
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::argument(Scalar::new(&mut b), 1, "b"))
    ///     .add(Parameter::argument(Scalar::new(&mut a), 0, "a"))
    ///     .build();
    ///
    /// parser.parse_tokens(vec!["1", "2"].as_slice()).unwrap();
    ///
    /// assert_eq!(a, 1);
    /// assert_eq!(b, 2);
    /// ```
    pub fn add<T: 'static>(mut self, parameter: Parameter<'a, T>) -> Self {
        self.declarations.declare(parameter);
        self
    }

    /// Add a group of parameters, with its own token rules.
    /// Aliases must remain unique across all the groups of one command line parser.
    pub fn group(mut self, group: ParameterGroup<'a>) -> Self {
        let index = self.groups.len();
        self.groups
            .push(GroupConfig::new(group.separators, group.prefixes));
        self.declarations.absorb(group.declarations, index);
        self
    }

    /// Register a sub-command.
    ///
    /// Once the sub-command's `name` appears on the Cli, all the tokens after it are parsed by `parser`.
    /// Declaring any sub-command means positional tokens at this level are taken as sub-command names.
    /// The collaborators (bundle, secret input, default provider) of the root parser apply to every sub-command.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{CommandLineParser, Parameter, Scalar, Switch};
    ///
    /// let mut verbose: bool = false;
    /// let mut file: String = String::default();
    /// let parser = CommandLineParser::new("git")
    ///     .add(Parameter::option(Switch::new(&mut verbose, true), ["-v"]))
    ///     .command(
    ///         "add",
    ///         CommandLineParser::new("add").add(Parameter::argument(Scalar::new(&mut file), 0, "file")),
    ///     )
    ///     .build();
    ///
    /// let parsed = parser.parse_tokens(&["-v", "add", "README.md"]).unwrap();
    ///
    /// assert_eq!(parsed.command(), Some("add"));
    /// assert!(verbose);
    /// assert_eq!(&file, "README.md");
    /// ```
    pub fn command(mut self, name: impl Into<String>, parser: CommandLineParser<'a>) -> Self {
        self.commands.push((name.into(), parser));
        self
    }

    /// Resolve `help_key` descriptions through `bundle`.
    pub fn bundle(mut self, bundle: impl DescriptionBundle + 'a) -> Self {
        self.collaborators.bundle.replace(Box::new(bundle));
        self
    }

    /// Obtain the values of password options through `secret_input` (default: [`ConsoleSecretInput`](./struct.ConsoleSecretInput.html), which does not mask input).
    pub fn secret_input(mut self, secret_input: impl SecretInput + 'a) -> Self {
        self.collaborators.secret_input = Box::new(secret_input);
        self
    }

    /// Supply option defaults through `default_provider`.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{CommandLineParser, Parameter, Scalar};
    ///
    /// let mut level: u8 = 0;
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Scalar::new(&mut level), ["--level"]))
    ///     .default_provider(|name: &str| (name == "--level").then(|| "3".to_string()))
    ///     .build();
    ///
    /// let parsed = parser.parse_tokens(&[]).unwrap();
    /// assert!(!parsed.was_assigned("--level"));
    /// assert_eq!(level, 3);
    /// ```
    pub fn default_provider(mut self, default_provider: impl DefaultProvider + 'a) -> Self {
        self.collaborators
            .default_provider
            .replace(Box::new(default_provider));
        self
    }

    fn build_binder(self) -> Result<(Binder<'a>, Collaborators<'a>), ConfigError> {
        let CommandLineParser {
            program: _program,
            groups,
            mut declarations,
            commands,
            collaborators,
        } = self;

        if declarations.catch_alls.len() > 1 {
            declarations.fail(ConfigError::MultipleCatchAll);
        }

        if let Some(error) = declarations.error {
            return Err(error);
        }

        let mut binders = Vec::with_capacity(commands.len());

        for (name, parser) in commands {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Building the command '{name}' of '{_program}'.");
            }

            let (binder, _) = parser.build_binder()?;
            binders.push((name, binder));
        }

        let binder = Binder::new(
            groups,
            declarations.options,
            declarations.arguments,
            declarations.catch_alls.pop(),
            binders,
        )?;
        Ok((binder, collaborators))
    }

    fn build_with_interface(
        self,
        user_interface: Rc<dyn UserInterface>,
    ) -> Result<GeneralParser<'a>, ConfigError> {
        let program = self.program.clone();
        let (binder, collaborators) = self.build_binder()?;
        Ok(GeneralParser::new(
            program,
            binder,
            user_interface,
            collaborators,
        ))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated alias).
    pub fn build_parser(self) -> Result<GeneralParser<'a>, ConfigError> {
        self.build_with_interface(Rc::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated alias).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser<'a> {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
