use std::env;
use std::rc::Rc;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::matcher::expand_files;
use crate::model::{ParameterSummary, Parsed};
use crate::parser::base::*;
use crate::parser::completion::CompletionResult;
use crate::parser::interface::*;

/// The pluggable collaborators of a parser.
pub(crate) struct Collaborators<'a> {
    pub(crate) secret_input: Box<dyn SecretInput + 'a>,
    pub(crate) default_provider: Option<Box<dyn DefaultProvider + 'a>>,
    pub(crate) bundle: Option<Box<dyn DescriptionBundle + 'a>>,
}

impl<'a> Default for Collaborators<'a> {
    fn default() -> Self {
        Self {
            secret_input: Box::new(ConsoleSecretInput),
            default_provider: None,
            bundle: None,
        }
    }
}

impl<'a> Collaborators<'a> {
    fn context(&self) -> Context<'_> {
        Context {
            secret_input: &*self.secret_input,
            default_provider: self.default_provider.as_deref(),
            bundle: self.bundle.as_deref(),
        }
    }
}

/// The configured command line parser.
/// Built via [`CommandLineParser::build`](./struct.CommandLineParser.html#method.build).
pub struct GeneralParser<'a> {
    program: String,
    binder: Binder<'a>,
    user_interface: Rc<dyn UserInterface>,
    collaborators: Collaborators<'a>,
}

impl<'a> std::fmt::Debug for GeneralParser<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GeneralParser[{}]", self.program)
    }
}

impl<'a> GeneralParser<'a> {
    pub(crate) fn new(
        program: impl Into<String>,
        binder: Binder<'a>,
        user_interface: Rc<dyn UserInterface>,
        collaborators: Collaborators<'a>,
    ) -> Self {
        Self {
            program: program.into(),
            binder,
            user_interface,
            collaborators,
        }
    }

    /// The program name given to the `CommandLineParser`.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Summarize the top level options, in declaration order.
    /// Descriptions are resolved through the configured [`DescriptionBundle`].
    pub fn parameters(&self) -> Vec<ParameterSummary> {
        self.binder
            .parameters(self.collaborators.bundle.as_deref())
    }

    /// Run the command line parser against the input tokens.
    ///
    /// Each `@path` token is first replaced by the lines of the file at `path`.
    /// Then the tokens are bound, left to right, into the program variables.
    /// Once a sub-command is named, the tokens following it belong to that sub-command.
    ///
    /// There is no rollback: the variables bound before an error keep their values.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{CommandLineParser, Parameter, Scalar, Switch};
    ///
    /// let mut verbose: bool = false;
    /// let mut from: String = String::default();
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Switch::new(&mut verbose, true), ["-v", "--verbose"]))
    ///     .add(Parameter::argument(Scalar::new(&mut from), 0, "from"))
    ///     .build();
    ///
    /// let parsed = parser.parse_tokens(&["--verbose", "here"]).unwrap();
    /// assert!(parsed.was_assigned("-v"));
    /// assert!(verbose);
    /// assert_eq!(&from, "here");
    /// ```
    pub fn parse_tokens(self, tokens: &[&str]) -> Result<Parsed, ParseError> {
        let GeneralParser {
            mut binder,
            collaborators,
            ..
        } = self;
        let tokens = expand_files(tokens)?;
        let mut parsed = Parsed::default();

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Parsing {tokens:?}.");
        }

        binder.bind(&tokens, &collaborators.context(), &mut parsed)?;
        Ok(parsed)
    }

    pub(crate) fn run(self, tokens: &[&str]) -> Result<Parsed, i32> {
        let user_interface = self.user_interface.clone();

        self.parse_tokens(tokens).map_err(|error| {
            user_interface.print_error(error);
            1
        })
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// If the parser encounters an error, it is printed and the process exits with error code `1` (via [`std::process::exit`]).
    pub fn parse(self) -> Parsed {
        let command_input: Vec<String> = env::args().skip(1).collect();

        match self.run(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(parsed) => parsed,
            Err(exit_code) => std::process::exit(exit_code),
        }
    }

    /// Suggest completions for the token at the `cursor` index.
    ///
    /// A `cursor` past the last token completes a new, empty token.
    /// Nothing is bound, and this never fails: unresolvable input yields no candidates.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{CommandLineParser, Parameter, Switch};
    ///
    /// let mut amend: bool = false;
    /// let mut author: bool = false;
    /// let parser = CommandLineParser::new("git")
    ///     .command(
    ///         "commit",
    ///         CommandLineParser::new("commit")
    ///             .add(Parameter::option(Switch::new(&mut amend, true), ["--amend"]))
    ///             .add(Parameter::option(Switch::new(&mut author, true), ["--author"])),
    ///     )
    ///     .build();
    ///
    /// let result = parser.complete(&["commit", "--a"], 1);
    /// assert_eq!(result.results(), vec!["mend", "uthor"]);
    /// ```
    pub fn complete(&self, tokens: &[&str], cursor: usize) -> CompletionResult {
        let tokens: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        let mut result = CompletionResult::new(tokens.get(cursor).map(String::as_str));
        self.binder.complete(&tokens, cursor, &mut result);

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Completed {} candidate(s) at {cursor}.", result.len());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::util::{argument, option};
    use crate::matcher::GroupConfig;
    use crate::parser::base::test::Tape;
    use crate::parser::interface::util::{FixedSecret, InMemoryInterface};
    use crate::test::assert_contains;
    use rstest::rstest;
    use std::collections::HashMap;
    use std::io::Write;

    fn boxed(tape: &Tape) -> Box<dyn AnonymousCapturable> {
        Box::new(tape.clone())
    }

    fn binder(name: &Tape, from: &Tape) -> Binder<'static> {
        let mut config = option(&["-n", "--name"], 1);
        config.help_key = Some("name.help".to_string());
        Binder::new(
            vec![GroupConfig::default()],
            vec![(config, boxed(name))],
            vec![(argument(0, "from", true), boxed(from))],
            None,
            Vec::default(),
        )
        .unwrap()
    }

    fn parser(binder: Binder<'static>) -> (GeneralParser<'static>, Rc<InMemoryInterface>) {
        let interface = Rc::new(InMemoryInterface::default());
        let general_parser = GeneralParser::new(
            "program",
            binder,
            interface.clone(),
            Collaborators::default(),
        );
        (general_parser, interface)
    }

    #[test]
    fn parse_tokens_empty() {
        // Setup
        let binder = Binder::new(
            vec![GroupConfig::default()],
            Vec::default(),
            Vec::default(),
            None,
            Vec::default(),
        )
        .unwrap();
        let (general_parser, interface) = parser(binder);

        // Execute
        let parsed = general_parser.run(&[]).unwrap();

        // Verify
        assert_eq!(parsed, Parsed::default());
        assert_eq!(interface.consume_error(), None);
    }

    #[rstest]
    #[case(vec!["a"], None)]
    #[case(vec!["a", "-n", "x"], Some("x"))]
    #[case(vec!["--name", "x", "a"], Some("x"))]
    fn parse_tokens(#[case] tokens: Vec<&str>, #[case] expected: Option<&str>) {
        // Setup
        let name = Tape::default();
        let from = Tape::default();
        let (general_parser, interface) = parser(binder(&name, &from));

        // Execute
        let parsed = general_parser.run(tokens.as_slice()).unwrap();

        // Verify
        assert_eq!(from.values(), vec!["a"]);
        assert_eq!(name.values().first().map(String::as_str), expected);
        assert_eq!(parsed.was_assigned("-n"), expected.is_some());
        assert_eq!(interface.consume_error(), None);
    }

    #[rstest]
    #[case(vec![], "from")]
    #[case(vec!["a", "--nope"], "--nope")]
    #[case(vec!["a", "-n"], "-n")]
    #[case(vec!["a", "b"], "'b'")]
    fn run_error(#[case] tokens: Vec<&str>, #[case] expected: &str) {
        // Setup
        let (general_parser, interface) = parser(binder(&Tape::default(), &Tape::default()));

        // Execute
        let exit_code = general_parser.run(tokens.as_slice()).unwrap_err();

        // Verify
        assert_eq!(exit_code, 1);
        let error = interface.consume_error().unwrap();
        assert_contains!(error, "Parse error");
        assert_contains!(error, expected);
    }

    #[test]
    fn parse_tokens_file() {
        // Setup
        let name = Tape::default();
        let from = Tape::default();
        let (general_parser, _) = parser(binder(&name, &from));
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "--name").unwrap();
        writeln!(file, "x").unwrap();
        let token = format!("@{}", file.path().display());

        // Execute
        general_parser
            .parse_tokens(&[token.as_str(), "a"])
            .unwrap();

        // Verify
        assert_eq!(name.values(), vec!["x"]);
        assert_eq!(from.values(), vec!["a"]);
    }

    #[test]
    fn parse_tokens_missing_file() {
        let (general_parser, _) = parser(binder(&Tape::default(), &Tape::default()));
        assert_matches!(
            general_parser.parse_tokens(&["@/definitely/not/here.txt"]),
            Err(ParseError::FileExpansion { .. })
        );
    }

    #[test]
    fn parse_tokens_collaborators() {
        // Setup
        let name = Tape::default();
        let from = Tape::default();
        let mut config = option(&["--password"], 1);
        config.password = true;
        let binder = Binder::new(
            vec![GroupConfig::default()],
            vec![
                (config, boxed(&Tape::default())),
                (option(&["--name"], 1), boxed(&name)),
            ],
            vec![(argument(0, "from", true), boxed(&from))],
            None,
            Vec::default(),
        )
        .unwrap();
        let general_parser = GeneralParser::new(
            "program",
            binder,
            Rc::new(InMemoryInterface::default()),
            Collaborators {
                secret_input: Box::new(FixedSecret("s".to_string())),
                default_provider: Some(Box::new(HashMap::from([(
                    "--name".to_string(),
                    "fallback".to_string(),
                )]))),
                bundle: None,
            },
        );

        // Execute
        let parsed = general_parser
            .parse_tokens(&["--password", "a"])
            .unwrap();

        // Verify
        assert!(parsed.was_assigned("--password"));
        assert!(!parsed.was_assigned("--name"));
        assert_eq!(name.values(), vec!["fallback"]);
        assert_eq!(from.values(), vec!["a"]);
    }

    #[test]
    fn parameters() {
        // Setup
        let binder = binder(&Tape::default(), &Tape::default());
        let general_parser = GeneralParser::new(
            "program",
            binder,
            Rc::new(InMemoryInterface::default()),
            Collaborators {
                bundle: Some(Box::new(HashMap::from([(
                    "name.help".to_string(),
                    "the name".to_string(),
                )]))),
                ..Collaborators::default()
            },
        );

        // Execute
        let summaries = general_parser.parameters();

        // Verify
        assert_eq!(general_parser.program(), "program");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].names, vec!["-n", "--name"]);
        assert_eq!(summaries[0].description, Some("the name".to_string()));
    }

    #[rstest]
    #[case(vec![], 0, None, vec![])]
    #[case(vec!["-"], 0, Some("-"), vec!["-name", "n"])]
    #[case(vec!["a", "--"], 1, Some("--"), vec!["name"])]
    #[case(vec!["a", "-n", ""], 2, Some(""), vec![])]
    #[case(vec!["a"], 1, None, vec![])]
    fn complete(
        #[case] tokens: Vec<&str>,
        #[case] cursor: usize,
        #[case] prefix: Option<&str>,
        #[case] expected: Vec<&str>,
    ) {
        // Setup
        let name = Tape::default();
        let (general_parser, _) = parser(binder(&name, &Tape::default()));

        // Execute
        let result = general_parser.complete(&tokens, cursor);

        // Verify
        assert_eq!(result.prefix(), prefix);
        assert_eq!(result.results(), expected);
        assert_eq!(name.times_matched(), 0);
    }
}
