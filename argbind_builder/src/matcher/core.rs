use std::collections::{BTreeSet, HashMap};
use std::ops::Range;

use crate::constant::*;
use crate::matcher::model::*;
use crate::matcher::unquote;
use crate::parser::ConfigError;

/// Whether the walk should carry on after a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Break,
}

/// The walk position: the token under inspection and the next positional slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub(crate) index: usize,
    pub(crate) slot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Walked {
    /// The first positional slot that was never reached.
    pub(crate) slot: usize,
    /// Whether an action ended the walk early.
    pub(crate) stopped: bool,
}

/// The tokens claimed by one occurrence of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    offset: usize,
    count: usize,
}

impl Span {
    /// The index of the last token claimed, relative to the option token at `index`.
    pub(crate) fn last(&self, index: usize) -> usize {
        index + self.offset + self.count
    }

    /// The indices of the value tokens.
    pub(crate) fn values(&self, index: usize) -> Range<usize> {
        (index + self.offset + 1)..(self.last(index) + 1)
    }
}

/// What to do with each classified token of a walk.
///
/// Parsing and completion share a single classification loop, and differ only in their actions.
pub(crate) trait Action {
    type Error;

    /// Whether the walk reaches `index`, given `length` tokens.
    fn visits(&self, index: usize, length: usize) -> bool;

    /// Whether the token at `index` is passed over without classification.
    fn skips(&self, _index: usize, token: &str) -> bool {
        token.is_empty()
    }

    /// An option token.
    /// `entry` is the option's position in the layout, or `None` for an unknown alias.
    /// Move `cursor.index` onto the last token this option claims.
    fn option(
        &mut self,
        layout: &Layout,
        tokens: &[String],
        cursor: &mut Cursor,
        token: &str,
        entry: Option<usize>,
    ) -> Result<Flow, Self::Error>;

    /// A token filling the positional `slot`.
    fn argument(
        &mut self,
        layout: &Layout,
        index: usize,
        slot: usize,
        token: &str,
    ) -> Result<Flow, Self::Error>;

    /// A positional token beyond the declared slots.
    fn remainder(&mut self, layout: &Layout, index: usize, token: &str)
        -> Result<Flow, Self::Error>;

    /// A token where a sub-command name is expected.
    fn command(
        &mut self,
        layout: &Layout,
        tokens: &[String],
        index: usize,
        token: &str,
    ) -> Result<Flow, Self::Error>;
}

/// The validated, read-only descriptor table of one command level.
#[derive(Debug)]
pub(crate) struct Layout {
    fallback: GroupConfig,
    groups: Vec<GroupConfig>,
    options: Vec<OptionConfig>,
    aliases: HashMap<String, usize>,
    // Registration order, for prefix resolution.
    alias_order: Vec<(String, usize)>,
    arguments: Vec<ArgumentConfig>,
    commands: BTreeSet<String>,
}

impl Layout {
    /// Validate the descriptors of one command level.
    /// The `arguments` must be ordered by their index.
    pub(crate) fn new(
        groups: Vec<GroupConfig>,
        options: Vec<OptionConfig>,
        arguments: Vec<ArgumentConfig>,
        commands: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let mut aliases = HashMap::default();
        let mut alias_order = Vec::default();

        for (entry, option) in options.iter().enumerate() {
            if option.names.is_empty() {
                return Err(ConfigError::MissingAliases);
            }

            for name in &option.names {
                if aliases.insert(name.clone(), entry).is_some() {
                    return Err(ConfigError::DuplicateAlias(name.clone()));
                }

                alias_order.push((name.clone(), entry));
            }
        }

        for pair in arguments.windows(2) {
            if pair[0].index == pair[1].index {
                return Err(ConfigError::DuplicatePosition(pair[0].index));
            }
        }

        for (position, argument) in arguments.iter().enumerate() {
            if argument.index != position {
                return Err(ConfigError::MissingPosition(position));
            }
        }

        for pair in arguments.windows(2) {
            if !pair[0].required && pair[1].required {
                return Err(ConfigError::RequiredAfterOptional {
                    name: pair[1].name.clone(),
                    previous: pair[0].name.clone(),
                });
            }
        }

        let mut command_names = BTreeSet::default();

        for command in commands {
            if command_names.contains(&command) {
                return Err(ConfigError::DuplicateCommand(command));
            }

            command_names.insert(command);
        }

        Ok(Self {
            fallback: GroupConfig::default(),
            groups,
            options,
            aliases,
            alias_order,
            arguments,
            commands: command_names,
        })
    }

    pub(crate) fn options(&self) -> &[OptionConfig] {
        &self.options
    }

    pub(crate) fn option(&self, entry: usize) -> &OptionConfig {
        &self.options[entry]
    }

    pub(crate) fn arguments(&self) -> &[ArgumentConfig] {
        &self.arguments
    }

    pub(crate) fn commands(&self) -> &BTreeSet<String> {
        &self.commands
    }

    /// The aliases offered during completion, in registration order.
    pub(crate) fn visible_aliases(&self) -> impl Iterator<Item = &str> {
        self.alias_order
            .iter()
            .filter(|(_, entry)| !self.options[*entry].hidden)
            .map(|(name, _)| name.as_str())
    }

    /// The group of the first alias (in registration order) that is a literal prefix of `token`.
    fn prefix_group(&self, token: &str) -> Option<&GroupConfig> {
        self.alias_order
            .iter()
            .find(|(name, _)| token.starts_with(name.as_str()))
            .map(|(_, entry)| &self.groups[self.options[*entry].group])
    }

    /// Resolve the group whose token rules apply to `token`, found at `index` amongst `tokens`.
    ///
    /// Values are not prefixed by an alias, so an unresolved token takes the group of the nearest preceding token that resolves.
    pub(crate) fn group_for(&self, tokens: &[String], index: usize, token: &str) -> &GroupConfig {
        let preceding = &tokens[..index.min(tokens.len())];

        self.prefix_group(token)
            .or_else(|| {
                preceding
                    .iter()
                    .rev()
                    .find_map(|previous| self.prefix_group(unquote(previous)))
            })
            .unwrap_or(&self.fallback)
    }

    pub(crate) fn is_option(&self, tokens: &[String], index: usize, token: &str) -> bool {
        self.group_for(tokens, index, token).is_option(token)
    }

    /// The tokens claimed by the option `entry`, appearing at `index`.
    /// A literal `--` directly after a value-taking option is skipped over.
    pub(crate) fn value_span(&self, tokens: &[String], index: usize, entry: usize) -> Span {
        let option = &self.options[entry];

        if option.password || option.arity == 0 {
            return Span {
                offset: 0,
                count: 0,
            };
        }

        let offset = match tokens.get(index + 1) {
            Some(next) if next == END_OF_OPTIONS => 1,
            _ => 0,
        };

        Span {
            offset,
            count: option.arity as usize,
        }
    }

    /// Classify each token in turn, handing it to the matching `action` hook.
    ///
    /// Options are recognized first.
    /// Then, a positional token names a sub-command when any are declared, otherwise it fills the next slot, otherwise it falls to the remainder.
    pub(crate) fn walk<A: Action>(
        &self,
        tokens: &[String],
        action: &mut A,
    ) -> Result<Walked, A::Error> {
        let mut cursor = Cursor { index: 0, slot: 0 };

        while action.visits(cursor.index, tokens.len()) {
            let token = tokens
                .get(cursor.index)
                .map(|raw| unquote(raw))
                .unwrap_or_default();

            if action.skips(cursor.index, token) {
                cursor.index += 1;
                continue;
            }

            let flow = if self.is_option(tokens, cursor.index, token) {
                let entry = self.aliases.get(token).copied();
                action.option(self, tokens, &mut cursor, token, entry)?
            } else if !self.commands.is_empty() {
                action.command(self, tokens, cursor.index, token)?
            } else if cursor.slot < self.arguments.len() {
                let slot = cursor.slot;
                cursor.slot += 1;
                action.argument(self, cursor.index, slot, token)?
            } else {
                action.remainder(self, cursor.index, token)?
            };

            if flow == Flow::Break {
                return Ok(Walked {
                    slot: cursor.slot,
                    stopped: true,
                });
            }

            cursor.index += 1;
        }

        Ok(Walked {
            slot: cursor.slot,
            stopped: false,
        })
    }
}

#[cfg(test)]
pub(crate) mod util {
    use super::*;

    pub(crate) fn option(names: &[&str], arity: u8) -> OptionConfig {
        OptionConfig {
            names: names.iter().map(|name| name.to_string()).collect(),
            arity,
            multiple: false,
            required: false,
            hidden: false,
            password: false,
            help: None,
            help_key: None,
            group: 0,
        }
    }

    pub(crate) fn argument(index: usize, name: &str, required: bool) -> ArgumentConfig {
        ArgumentConfig {
            index,
            name: name.to_string(),
            required,
            help: None,
            help_key: None,
            completer: None,
        }
    }

    pub(crate) fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }
}
