mod core;
mod expand;
mod model;

pub(crate) use self::core::*;
pub(crate) use expand::*;
pub(crate) use model::*;
