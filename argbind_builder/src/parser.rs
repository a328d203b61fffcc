mod base;
mod completion;
mod interface;
mod middleware;

pub(crate) use base::*;
pub use base::{ConfigError, ParseError};
pub use completion::CompletionResult;
pub(crate) use interface::*;
pub use interface::{ConsoleSecretInput, DefaultProvider, DescriptionBundle, SecretInput};
pub(crate) use middleware::Collaborators;
pub use middleware::GeneralParser;
