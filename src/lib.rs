//! A preprocessor that runs Python snippets embedded in G-code comments.
//!
//! Slicers such as PrusaSlicer emit G-code with custom macros already expanded.
//! Lines starting with a marker pattern (`;Python` by default) carry Python code:
//!
//! ```text
//! ;Python: print('M106 S255')
//! ;Python<
//! ;for i in range(3):
//! ;    print("G1 E0.5")
//! ;Python>
//! ```
//!
//! Every other line is copied through verbatim. The crate turns the document into a
//! Python script ([`assemble`]), where plain lines become `print` statements and the
//! embedded code is copied in place, then hands that script to an interpreter
//! ([`ExternalInterpreter`]) whose standard output becomes the new G-code file.

pub mod assembler;
pub mod block;
pub mod classify;
pub mod cli;
pub mod command;
pub mod config;
mod error;
pub mod escape;
pub mod external;

pub use assembler::{Assembly, Segment, assemble};
pub use config::Config;
pub use error::{Error, Result};
pub use external::ExternalInterpreter;
