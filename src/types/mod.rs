mod error;
mod package;

pub use error::*;
pub use package::*;
