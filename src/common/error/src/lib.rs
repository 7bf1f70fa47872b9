//! Error types and result aliases for Strata.
//!
//! Every crate in the workspace reports failures through [`StrataError`]. The
//! variants follow the taxonomy used by the format registry: syntax errors are
//! always safe to skip while sniffing, content errors are more informative, and
//! argument/bounds errors are caller contract violations.

mod error;

pub use error::{StrataError, StrataResult};
