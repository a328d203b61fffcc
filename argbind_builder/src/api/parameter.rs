use std::sync::Arc;

use crate::api::convert::{resolve_converter, StringConverter};
use crate::api::{CliArgument, CliOption, Collection, GenericCapturable};
use crate::constant::CATCH_ALL_NAME;
use crate::matcher::{ArgumentConfig, OptionConfig};
use crate::parser::{AnonymousCapturable, ConfigError, ParseError};
use crate::prelude::{Collectable, Completer};

pub(crate) struct AnonymousCapture<'a, T: 'a> {
    name: String,
    field: Box<dyn GenericCapturable<'a, T> + 'a>,
    converter: Option<Arc<dyn StringConverter<T>>>,
}

impl<'a, T> AnonymousCapture<'a, T> {
    pub(crate) fn bind(
        name: impl Into<String>,
        field: Box<dyn GenericCapturable<'a, T> + 'a>,
        converter: Option<Arc<dyn StringConverter<T>>>,
    ) -> Self {
        Self {
            name: name.into(),
            field,
            converter,
        }
    }
}

impl<'a, T> AnonymousCapturable for AnonymousCapture<'a, T> {
    fn matched(&mut self) {
        self.field.matched();
    }

    fn capture(&mut self, value: &str) -> Result<(), ParseError> {
        let converter = match &self.converter {
            Some(converter) => converter,
            None => unreachable!("internal error - a value parameter must carry a converter"),
        };

        let converted = if self.field.multiple() {
            converter.convert_all(value)
        } else {
            converter.convert(value).map(|single| vec![single])
        };

        let values = converted.map_err(|message| ParseError::Conversion {
            name: self.name.clone(),
            value: value.to_string(),
            type_name: std::any::type_name::<T>(),
            message,
        })?;

        for item in values {
            self.field.capture(item);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParameterClass {
    Opt,
    Arg(usize),
    CatchAll,
}

pub(crate) enum Declared<'a> {
    Option(OptionConfig, Box<dyn AnonymousCapturable + 'a>),
    Argument(ArgumentConfig, Box<dyn AnonymousCapturable + 'a>),
    CatchAll(Box<dyn AnonymousCapturable + 'a>),
}

impl<'a> std::fmt::Debug for Declared<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Declared::Option(config, _) => f.debug_tuple("Option").field(config).finish(),
            Declared::Argument(config, _) => f.debug_tuple("Argument").field(config).finish(),
            Declared::CatchAll(_) => write!(f, "CatchAll"),
        }
    }
}

pub(super) struct ParameterInner<'a, T> {
    class: ParameterClass,
    field: Box<dyn GenericCapturable<'a, T> + 'a>,
    names: Vec<String>,
    arity: Option<u8>,
    required: bool,
    hidden: bool,
    password: bool,
    help: Option<String>,
    help_key: Option<String>,
    converter: Option<Arc<dyn StringConverter<T>>>,
    completer: Option<Arc<dyn Completer>>,
}

impl<'a, T> std::fmt::Debug for ParameterInner<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match &self.class {
            ParameterClass::Opt => "Opt".to_string(),
            ParameterClass::Arg(index) => format!("Arg#{index}"),
            ParameterClass::CatchAll => "CatchAll".to_string(),
        };
        let help = if let Some(d) = &self.help {
            format!(", {d}")
        } else {
            "".to_string()
        };

        write!(
            f,
            "{class}[{t}, {names}{help}]",
            t = std::any::type_name::<T>(),
            names = self.names.join(", "),
        )
    }
}

impl<'a, T: 'static> ParameterInner<'a, T> {
    fn name(&self) -> String {
        match self.names.first() {
            Some(name) => name.clone(),
            None => CATCH_ALL_NAME.to_string(),
        }
    }

    /// Validate the parameter and erase its type.
    pub(super) fn declare(self, group: usize) -> Result<Declared<'a>, ConfigError> {
        let name = self.name();
        let natural = self.field.arity();
        let multiple = self.field.multiple();

        if self.class == ParameterClass::Opt && self.names.is_empty() {
            return Err(ConfigError::MissingAliases);
        }

        let arity = match self.arity {
            Some(arity) if natural == 0 && arity != 0 => {
                return Err(ConfigError::InvalidArity { name, arity });
            }
            Some(arity) if natural > 0 && arity == 0 => {
                return Err(ConfigError::InvalidArity { name, arity });
            }
            Some(arity) if !multiple && arity > 1 => {
                return Err(ConfigError::InvalidArity { name, arity });
            }
            Some(arity) => arity,
            None => natural,
        };

        if self.password && arity == 0 {
            return Err(ConfigError::PasswordWithoutValue(name));
        }

        let converter = if arity == 0 {
            None
        } else {
            match self.converter.or_else(resolve_converter::<T>) {
                Some(converter) => Some(converter),
                None => {
                    return Err(ConfigError::MissingConverter {
                        name,
                        type_name: std::any::type_name::<T>(),
                    });
                }
            }
        };

        let capture: Box<dyn AnonymousCapturable + 'a> =
            Box::new(AnonymousCapture::bind(name.clone(), self.field, converter));

        Ok(match self.class {
            ParameterClass::Opt => Declared::Option(
                OptionConfig {
                    names: self.names,
                    arity,
                    multiple,
                    required: self.required,
                    hidden: self.hidden,
                    password: self.password,
                    help: self.help,
                    help_key: self.help_key,
                    group,
                },
                capture,
            ),
            ParameterClass::Arg(index) => Declared::Argument(
                ArgumentConfig {
                    index,
                    name,
                    required: self.required,
                    help: self.help,
                    help_key: self.help_key,
                    completer: self.completer,
                },
                capture,
            ),
            ParameterClass::CatchAll => Declared::CatchAll(capture),
        })
    }
}

/// An option, positional argument, or catch-all for the command parser.
/// Used with [`CommandLineParser::add`](./struct.CommandLineParser.html#method.add) and [`ParameterGroup::add`](./struct.ParameterGroup.html#method.add).
pub struct Parameter<'a, T>(ParameterInner<'a, T>);

impl<'a, T> Parameter<'a, T> {
    fn inner(
        class: ParameterClass,
        field: Box<dyn GenericCapturable<'a, T> + 'a>,
        names: Vec<String>,
        required: bool,
    ) -> Self {
        Self(ParameterInner {
            class,
            field,
            names,
            arity: None,
            required,
            hidden: false,
            password: false,
            help: None,
            help_key: None,
            converter: None,
            completer: None,
        })
    }

    /// Create a named option parameter.
    /// Every alias is matched literally, prefix included (ex: `-v` and `--verbose`).
    /// Options are optional unless marked [`Parameter::required`].
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{Parameter, Switch};
    ///
    /// let mut verbose: bool = false;
    /// Parameter::option(Switch::new(&mut verbose, true), ["-v", "--verbose"]);
    /// ```
    pub fn option(
        field: impl GenericCapturable<'a, T> + CliOption + 'a,
        names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::inner(
            ParameterClass::Opt,
            Box::new(field),
            names.into_iter().map(Into::into).collect(),
            false,
        )
    }

    /// Create a positional argument parameter at the zero-based `index`.
    /// Arguments are required unless marked [`Parameter::optional`].
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{Parameter, Scalar};
    ///
    /// let mut from: String = String::default();
    /// Parameter::argument(Scalar::new(&mut from), 0, "from");
    /// ```
    pub fn argument(
        field: impl GenericCapturable<'a, T> + CliArgument + 'a,
        index: usize,
        name: impl Into<String>,
    ) -> Self {
        Self::inner(
            ParameterClass::Arg(index),
            Box::new(field),
            vec![name.into()],
            true,
        )
    }

    /// Create the catch-all parameter, which receives every positional token once the positional arguments are filled.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{Collection, Parameter};
    ///
    /// let mut files: Vec<String> = Vec::default();
    /// Parameter::catch_all(Collection::new(&mut files), "files");
    /// ```
    pub fn catch_all<C>(field: Collection<'a, C, T>, name: impl Into<String>) -> Self
    where
        C: 'a + Collectable<T>,
        T: 'a,
    {
        Self::inner(
            ParameterClass::CatchAll,
            Box::new(field),
            vec![name.into()],
            false,
        )
    }

    /// Require this option to appear on the Cli.
    pub fn required(self) -> Self {
        let mut inner = self.0;
        inner.required = true;
        Self(inner)
    }

    /// Allow this positional argument to be omitted.
    /// Optional arguments must come after all required arguments.
    pub fn optional(self) -> Self {
        let mut inner = self.0;
        inner.required = false;
        Self(inner)
    }

    /// Hide this option from tab completion.
    /// Parameter listings still report it, flagged as hidden.
    pub fn hidden(self) -> Self {
        let mut inner = self.0;
        inner.hidden = true;
        Self(inner)
    }

    /// Obtain this option's value from the parser's [`SecretInput`](./trait.SecretInput.html) instead of the Cli tokens.
    pub fn password(self) -> Self {
        let mut inner = self.0;
        inner.password = true;
        Self(inner)
    }

    /// Set the number of value tokens consumed by each occurrence of this option.
    ///
    /// Switches take precisely `0`.
    /// Single valued options take precisely `1`.
    /// Collections may take any positive arity.
    ///
    /// ### Example
    /// ```
    /// # use argbind_builder as argbind;
    /// use argbind::{Collection, CommandLineParser, Parameter};
    ///
    /// let mut point: Vec<i32> = Vec::default();
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Collection::new(&mut point), ["--point"]).arity(2))
    ///     .build();
    ///
    /// parser.parse_tokens(&["--point", "3", "-4"]).unwrap();
    /// assert_eq!(point, vec![3, -4]);
    /// ```
    pub fn arity(self, arity: u8) -> Self {
        let mut inner = self.0;
        inner.arity = Some(arity);
        Self(inner)
    }

    /// Document the help message for this parameter.
    /// If repeated, only the final message will apply to the parameter.
    pub fn help(self, description: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.help = Some(description.into());
        Self(inner)
    }

    /// Look up the help message in the parser's [`DescriptionBundle`](./trait.DescriptionBundle.html).
    /// Falls back to [`Parameter::help`] when the bundle has no such key.
    pub fn help_key(self, key: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.help_key = Some(key.into());
        Self(inner)
    }

    /// Convert values with `converter`, instead of the registered converter for `T`.
    pub fn converter(self, converter: impl StringConverter<T> + 'static) -> Self {
        let mut inner = self.0;
        inner.converter = Some(Arc::new(converter));
        Self(inner)
    }

    /// Suggest values for this positional argument during tab completion.
    pub fn completer(self, completer: impl Completer + 'static) -> Self {
        let mut inner = self.0;
        inner.completer = Some(Arc::new(completer));
        Self(inner)
    }

    pub(super) fn consume(self) -> ParameterInner<'a, T> {
        self.0
    }
}
