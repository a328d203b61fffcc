pub(crate) const DEFAULT_OPTION_PREFIXES: &str = "-";
pub(crate) const DEFAULT_SEPARATORS: &str = " ";
// Marks the end of options; skipped when it immediately follows a value-taking option.
pub(crate) const END_OF_OPTIONS: &str = "--";
pub(crate) const FILE_PREFIX: char = '@';
pub(crate) const CATCH_ALL_NAME: &str = "[catch-all]";
