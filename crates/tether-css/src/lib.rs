//! tether CSS
//!
//! Inline style declarations attached to mirrored elements.

mod declaration;

pub use declaration::{CssStyleDeclaration, normalize_property};

/// CSS parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at declaration {index}: {message}")]
    ParseError { index: usize, message: String },
}
