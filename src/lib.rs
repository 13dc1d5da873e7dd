//! Turn inline markdown selections into numbered reference-style links.
//!
//! ```text
//! See the [docs][0].
//!
//! [0]: https://docs.example.com
//! ```
//!
//! [`parser`] finds existing `[n]: url` definitions and picks an index,
//! [`writer`] produces the text to splice in, and [`commands`] drives both
//! against any editor that implements [`host::Host`].

pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod parser;
pub mod types;
pub mod writer;

pub use error::Error;
pub use types::{Edit, Position, Reference, ReferenceKind, Selection};
