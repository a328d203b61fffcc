use std::sync::Arc;

use crate::constant::*;
use crate::parser::DescriptionBundle;
use crate::prelude::Completer;

/// The token rules shared by the options of one parameter group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GroupConfig {
    separators: String,
    prefixes: String,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATORS, DEFAULT_OPTION_PREFIXES)
    }
}

impl GroupConfig {
    pub(crate) fn new(separators: impl Into<String>, prefixes: impl Into<String>) -> Self {
        Self {
            separators: separators.into(),
            prefixes: prefixes.into(),
        }
    }

    pub(crate) fn is_option(&self, token: &str) -> bool {
        match token.chars().next() {
            Some(first) => self.prefixes.contains(first),
            None => false,
        }
    }

    /// Split a joined `name<sep>value` option token.
    /// Trailing empty parts are dropped, so `--name=` yields only `--name`.
    pub(crate) fn split<'t>(&self, token: &'t str) -> Vec<&'t str> {
        if self.separators == DEFAULT_SEPARATORS || !self.is_option(token) {
            return vec![token];
        }

        let mut parts: Vec<&str> = token
            .split(|c: char| self.separators.contains(c))
            .collect();

        while parts.last().map_or(false, |part| part.is_empty()) {
            parts.pop();
        }

        parts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionConfig {
    pub(crate) names: Vec<String>,
    pub(crate) arity: u8,
    pub(crate) multiple: bool,
    pub(crate) required: bool,
    pub(crate) hidden: bool,
    pub(crate) password: bool,
    pub(crate) help: Option<String>,
    pub(crate) help_key: Option<String>,
    pub(crate) group: usize,
}

impl OptionConfig {
    /// The first alias, which identifies the option in errors, defaults and [`crate::Parsed`].
    pub(crate) fn name(&self) -> &str {
        match self.names.first() {
            Some(name) => name,
            None => unreachable!("internal error - options are declared with at least one alias"),
        }
    }

    pub(crate) fn description(&self, bundle: Option<&dyn DescriptionBundle>) -> Option<String> {
        describe(&self.help, &self.help_key, bundle)
    }
}

#[derive(Clone)]
pub(crate) struct ArgumentConfig {
    pub(crate) index: usize,
    pub(crate) name: String,
    pub(crate) required: bool,
    pub(crate) help: Option<String>,
    pub(crate) help_key: Option<String>,
    pub(crate) completer: Option<Arc<dyn Completer>>,
}

impl std::fmt::Debug for ArgumentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArgumentConfig")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl ArgumentConfig {
    pub(crate) fn description(&self, bundle: Option<&dyn DescriptionBundle>) -> Option<String> {
        describe(&self.help, &self.help_key, bundle)
    }
}

fn describe(
    help: &Option<String>,
    help_key: &Option<String>,
    bundle: Option<&dyn DescriptionBundle>,
) -> Option<String> {
    let looked_up = match (help_key, bundle) {
        (Some(key), Some(bundle)) => bundle.lookup(key),
        _ => None,
    };

    looked_up.or_else(|| help.clone())
}
