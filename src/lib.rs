//! Strata - structured-data containers and text formats
//!
//! Strata models tables, trees, and graphs with attribute metadata, and moves
//! them in and out of CSV, TSV, HTML tables, and JSON microformats.

#![forbid(unsafe_code)]
#![allow(clippy::module_name_repetitions)]

// Re-export core crates
pub use common_config as config;
pub use common_error as error;
pub use strata_core as core;
pub use strata_formats as formats;

pub use common_error::{StrataError, StrataResult};
pub use strata_core::{Container, ContainerKind, Graph, HasAttributes, Table, Tree, Value};
pub use strata_formats::{Format, FormatRegistry};

/// Strata version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
