use std::fs;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::*;
use crate::matcher::Layout;
use crate::parser::ParseError;

/// Trim the whitespace around `token`, then strip a surrounding (or a lone leading) double quote.
pub(crate) fn unquote(token: &str) -> &str {
    let trimmed = token.trim();

    match trimmed.strip_prefix('"') {
        Some(rest) => rest.strip_suffix('"').unwrap_or(rest),
        None => trimmed,
    }
}

/// Replace each `@path` token by the lines of the file at `path`.
/// The lines are taken literally; an `@` within the file is not expanded again.
pub(crate) fn expand_files(tokens: &[&str]) -> Result<Vec<String>, ParseError> {
    let mut expanded = Vec::with_capacity(tokens.len());

    for token in tokens {
        match token.strip_prefix(FILE_PREFIX) {
            Some(path) => {
                let contents =
                    fs::read_to_string(path).map_err(|source| ParseError::FileExpansion {
                        path: path.to_string(),
                        source,
                    })?;

                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Expanded '{path}' into {} tokens.",
                        contents.lines().count()
                    );
                }

                expanded.extend(contents.lines().map(str::to_string));
            }
            None => expanded.push(token.to_string()),
        }
    }

    Ok(expanded)
}

impl Layout {
    /// Split each joined option token by the separators of its group.
    /// Groups are resolved against the tokens as given, before any splitting.
    pub(crate) fn split_separators(&self, tokens: &[String]) -> Vec<String> {
        let mut split = Vec::with_capacity(tokens.len());

        for (index, token) in tokens.iter().enumerate() {
            let parts = self.group_for(tokens, index, token).split(token);

            #[cfg(feature = "tracing_debug")]
            {
                if parts.len() != 1 {
                    debug!("Split '{token}' into {parts:?}.");
                }
            }

            split.extend(parts.into_iter().map(str::to_string));
        }

        split
    }
}
