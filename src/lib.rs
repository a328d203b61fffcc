//! `argbind` is a declarative command line binder for Rust.
//!
//! Parameters are declared against program variables, then the Cli tokens are bound straight into those variables.
//! `argbind` prioritizes the following design concerns:
//! * *Type safe binding*:
//! The user should not call any `&str -> T` conversion functions directly.
//! Conversion is resolved per type, once, when the parser is built.
//! * *Option vs. argument paradigm*:
//! Options are named by one or more aliases (ex: `-v`, `--verbose`).
//! Arguments are filled positionally, by their index.
//! Surplus positional tokens go to the catch-all, when one is declared.
//! * *Sub-command paradigm*:
//! Each sub-command is a full parser in its own right, which takes over the tokens after its name.
//! * *Completion as the dual of parsing*:
//! Tab completion follows precisely the token rules the parser uses, without binding anything.
//!
//! # Usage
//! ```
//! use argbind::{CommandLineParser, Parameter, Scalar, Switch, Collection};
//!
//! let mut verbose: bool = false;
//! let mut from: String = String::default();
//! let mut to: String = String::default();
//! let mut files: Vec<String> = Vec::default();
//! let parser = CommandLineParser::new("copy")
//!     .add(Parameter::option(Switch::new(&mut verbose, true), ["-v", "--verbose"]).help("Log more."))
//!     .add(Parameter::argument(Scalar::new(&mut from), 0, "from"))
//!     .add(Parameter::argument(Scalar::new(&mut to), 1, "to"))
//!     .add(Parameter::catch_all(Collection::new(&mut files), "files"))
//!     .build();
//!
//! parser.parse_tokens(&["a", "-v", "b", "c", "d"]).unwrap();
//!
//! assert!(verbose);
//! assert_eq!(&from, "a");
//! assert_eq!(&to, "b");
//! assert_eq!(files, vec!["c", "d"]);
//! ```
//!
//! # Builder Api
//! Configure `argbind` by starting with a [`CommandLineParser`] and `add`ing parameters.
//! There are three classes of parameters: [`Parameter::option`], [`Parameter::argument`] and [`Parameter::catch_all`].
//!
//! Each parameter takes a *field*, which specifies how values reach the program variable:
//! * [`Scalar`]: a single value (arity 1); applies to options and arguments.
//! * [`Optional`]: a single value stored as `Some`; applies to options and arguments.
//! * [`Switch`]: no value (arity 0); assigns its target when matched; options only.
//! * [`Collection`]: many values, appended through [Collectable](./prelude/trait.Collectable.html).
//! `Vec<T>` and `HashSet<T>` are provided.
//! A collection option may take several values per occurrence via [`Parameter::arity`], and may be repeated.
//!
//! Every other option may appear at most once.
//!
//! ### Conversion
//! Values are converted with, in order of precedence:
//! 1. The converter given to [`Parameter::converter`].
//! 2. The default converters (`bool`, `char`, the numeric primitives, `PathBuf`).
//! 3. The factories added by [`register_converter_factory`], in registration order.
//! 4. The identity converter, for `String`.
//!
//! A parameter without any converter is a [`ConfigError`] when the parser is built.
//!
//! ### Groups
//! A [`ParameterGroup`] holds options with their own token rules: the option prefix characters, and the separators which join an option and its value within one token.
//! For example, a group with the separator `=` reads `--author=cedric` as `--author cedric`.
//!
//! ### Sub-commands
//! Register sub-commands with [`CommandLineParser::command`].
//! Once any sub-command is declared, positional tokens at that level name sub-commands.
//! The selected chain is reported by [`Parsed::commands`].
//!
//! ### Collaborators
//! * [`DefaultProvider`]: supplies option values before the tokens are bound.
//! A default does not count as an assignment, so it does not satisfy a required option.
//! * [`SecretInput`]: supplies the value of password options, instead of the tokens.
//! * [`DescriptionBundle`]: resolves help keys into descriptions.
//!
//! # Cli Semantics
//! * Each `@path` token is replaced by the lines of the file at `path`, before anything else.
//! * Tokens are trimmed, and a surrounding double quote is removed.
//! * Options are recognized first, then sub-command names, then arguments, then the catch-all.
//! * An option consumes precisely its arity worth of the following tokens.
//! A `--` directly after the option is skipped before its values are consumed.
//! * Empty tokens are ignored.
//!
//! # Completion
//! [`GeneralParser::complete`] suggests the completions of one token, given the token list and the cursor index.
//! [`shell::complete_line`] does the same for a raw line buffer and cursor position.
//!
//! ```
//! use argbind::{CommandLineParser, Parameter, Switch};
//!
//! let mut amend: bool = false;
//! let parser = CommandLineParser::new("git")
//!     .command("add", CommandLineParser::new("add"))
//!     .command(
//!         "commit",
//!         CommandLineParser::new("commit")
//!             .add(Parameter::option(Switch::new(&mut amend, true), ["--amend"])),
//!     )
//!     .build();
//!
//! assert_eq!(argbind::shell::complete_line(&parser, "c", 1), vec!["ommit"]);
//! assert_eq!(argbind::shell::complete_line(&parser, "commit --", 9), vec!["amend"]);
//! ```
//!
//! # Features
//! * `tracing_debug`: Emit `tracing` debug events while parsing and completing.
pub mod shell;

pub use argbind_builder::*;
