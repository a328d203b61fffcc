use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::matcher::*;
use crate::parser::base::Binder;
use crate::prelude::Completer;

/// The completions for the token under the cursor.
///
/// Holds the suffixes which complete the typed prefix, sorted and without duplicates.
/// A candidate which does not start with the prefix, or adds nothing to it, is dropped.
///
/// ### Example
/// ```
/// # use argbind_builder as argbind;
/// use argbind::CompletionResult;
///
/// let mut result = CompletionResult::new(Some("c"));
/// result.add_candidates(["add", "commit", "checkout", "c"]);
/// assert_eq!(result.results(), vec!["heckout", "ommit"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionResult {
    prefix: Option<String>,
    candidates: BTreeSet<String>,
}

impl CompletionResult {
    /// Start collecting completions for the typed `prefix`, or for nothing typed yet.
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            candidates: BTreeSet::default(),
        }
    }

    /// The text typed so far, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Offer a full candidate, which is recorded only as its suffix past the prefix.
    pub fn add_candidate(&mut self, candidate: impl AsRef<str>) {
        let candidate = candidate.as_ref();
        let suffix = match &self.prefix {
            Some(prefix) => match candidate.strip_prefix(prefix.as_str()) {
                Some(suffix) => suffix,
                None => return,
            },
            None => candidate,
        };

        if !suffix.is_empty() {
            self.candidates.insert(suffix.to_string());
        }
    }

    /// Offer many full candidates.
    pub fn add_candidates(&mut self, candidates: impl IntoIterator<Item = impl AsRef<str>>) {
        for candidate in candidates {
            self.add_candidate(candidate);
        }
    }

    /// The recorded suffixes, in sorted order.
    pub fn results(&self) -> Vec<&str> {
        self.candidates.iter().map(String::as_str).collect()
    }

    /// Take the recorded suffixes, in sorted order.
    pub fn into_results(self) -> Vec<String> {
        self.candidates.into_iter().collect()
    }

    /// Whether no suffix has been recorded.
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// The number of recorded suffixes.
    pub fn len(&self) -> usize {
        self.candidates.len()
    }
}

impl<'a> Binder<'a> {
    /// Collect the completions for the token at `cursor`.
    /// Nothing is bound, and malformed tokens simply yield fewer candidates.
    pub(crate) fn complete(&self, tokens: &[String], cursor: usize, result: &mut CompletionResult) {
        let mut suggest = Suggest {
            cursor,
            commands: &self.commands,
            result,
        };

        match self.layout.walk(tokens, &mut suggest) {
            Ok(_) => {}
            Err(never) => match never {},
        }
    }
}

struct Suggest<'s, 'a> {
    cursor: usize,
    commands: &'s HashMap<String, Binder<'a>>,
    result: &'s mut CompletionResult,
}

impl<'s, 'a> Action for Suggest<'s, 'a> {
    type Error = Infallible;

    fn visits(&self, index: usize, _length: usize) -> bool {
        index <= self.cursor
    }

    fn skips(&self, index: usize, token: &str) -> bool {
        token.is_empty() && index != self.cursor
    }

    fn option(
        &mut self,
        layout: &Layout,
        tokens: &[String],
        cursor: &mut Cursor,
        _token: &str,
        entry: Option<usize>,
    ) -> Result<Flow, Self::Error> {
        if cursor.index == self.cursor {
            // An exact alias is already complete.
            if entry.is_none() {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Suggesting the aliases at {}.", cursor.index);
                }

                self.result.add_candidates(layout.visible_aliases());
            }

            return Ok(Flow::Break);
        }

        if let Some(entry) = entry {
            let last = layout.value_span(tokens, cursor.index, entry).last(cursor.index);

            // The cursor is on one of this option's values.
            if self.cursor <= last {
                return Ok(Flow::Break);
            }

            cursor.index = last;
        }

        Ok(Flow::Continue)
    }

    fn argument(
        &mut self,
        layout: &Layout,
        index: usize,
        slot: usize,
        _token: &str,
    ) -> Result<Flow, Self::Error> {
        if index != self.cursor {
            return Ok(Flow::Continue);
        }

        if let Some(completer) = &layout.arguments()[slot].completer {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Suggesting values for argument {slot}.");
            }

            completer.complete(self.result);
        }

        Ok(Flow::Break)
    }

    fn remainder(
        &mut self,
        _layout: &Layout,
        index: usize,
        _token: &str,
    ) -> Result<Flow, Self::Error> {
        if index == self.cursor {
            Ok(Flow::Break)
        } else {
            Ok(Flow::Continue)
        }
    }

    fn command(
        &mut self,
        layout: &Layout,
        tokens: &[String],
        index: usize,
        token: &str,
    ) -> Result<Flow, Self::Error> {
        if index == self.cursor {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Suggesting the commands at {index}.");
            }

            self.result.add_candidates(layout.commands());
        } else if let Some(binder) = self.commands.get(token) {
            binder.complete(&tokens[index + 1..], self.cursor - (index + 1), self.result);
        }

        Ok(Flow::Break)
    }
}
