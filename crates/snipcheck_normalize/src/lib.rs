//! # snipcheck_normalize
//!
//! Turns extracted snippets into independently compilable units.
//!
//! Complete snippets (those with their own entry point) pass through
//! untouched. Bare fragments are wrapped with the language's inert template;
//! the wrapper's line offset is recorded so analyzer diagnostics can be
//! remapped to the snippet's own lines. A fragment that declares an
//! identifier the wrapper would introduce is rejected as
//! [`NormalizeError::AmbiguousFragment`] and reported unverifiable rather
//! than silently mis-wrapped.

pub mod error;
pub mod normalizer;
pub mod unit;

pub use error::{NormalizeError, NormalizeResult};
pub use normalizer::Normalizer;
pub use unit::NormalizedUnit;
