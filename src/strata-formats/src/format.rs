//! The `Format` trait and the metadata every format publishes.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use common_config::EncodeConfig;
use common_error::{StrataError, StrataResult, invalid_argument_err};
use strata_core::{Container, ContainerKind, Graph, HasAttributes, Table, Tree, keys};

/// Highest complexity rank a format may declare.
pub const MAX_COMPLEXITY: u8 = 10;

/// Static description of a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatInfo {
    /// Short registry name, e.g. `"csv"`.
    pub name: &'static str,
    /// Human-readable name.
    pub long_name: &'static str,
    /// One-sentence summary.
    pub description: &'static str,
    /// Name of the underlying syntax, recorded as `sourceSyntax`.
    pub syntax: &'static str,
    /// MIME type, recorded as `sourceMIMEType`.
    pub mime_type: &'static str,
    /// File extensions without the leading dot, lower-case.
    pub file_extensions: &'static [&'static str],
    /// Standards the format follows.
    pub standards: &'static [&'static str],
    /// 0 accepts almost anything, 10 is a strict schema.
    pub complexity: u8,
    /// Container kinds `decode` can produce.
    pub decodes: &'static [ContainerKind],
    /// Container kinds `encode` accepts.
    pub encodes: &'static [ContainerKind],
}

/// A text format that decodes to and encodes from containers.
///
/// Implementations provide the static [`FormatInfo`] plus `decode` and
/// `encode`; capability queries and file entry points come for free.
pub trait Format: Send + Sync {
    /// Format metadata.
    fn info(&self) -> &'static FormatInfo;

    /// Decode `text` into containers.
    ///
    /// Returns `Syntax` when the text does not follow the format's grammar,
    /// `InvalidContent` when it does but breaks the format's rules, and an
    /// empty list when there is no content.
    fn decode(&self, text: &str) -> StrataResult<Vec<Container>>;

    /// Encode containers into text.
    fn encode(&self, containers: &[Container], config: &EncodeConfig) -> StrataResult<String>;

    /// Registry name.
    fn name(&self) -> &'static str {
        self.info().name
    }

    /// Complexity rank, see [`FormatInfo::complexity`].
    fn complexity(&self) -> u8 {
        self.info().complexity
    }

    /// Check if the format decodes containers of `kind`.
    fn can_decode(&self, kind: ContainerKind) -> bool {
        self.info().decodes.contains(&kind)
    }

    /// Check if the format encodes containers of `kind`.
    fn can_encode(&self, kind: ContainerKind) -> bool {
        self.info().encodes.contains(&kind)
    }

    /// Check if the format decodes tables.
    fn can_decode_tables(&self) -> bool {
        self.can_decode(ContainerKind::Table)
    }

    /// Check if the format decodes trees.
    fn can_decode_trees(&self) -> bool {
        self.can_decode(ContainerKind::Tree)
    }

    /// Check if the format decodes graphs.
    fn can_decode_graphs(&self) -> bool {
        self.can_decode(ContainerKind::Graph)
    }

    /// Check if the format encodes tables.
    fn can_encode_tables(&self) -> bool {
        self.can_encode(ContainerKind::Table)
    }

    /// Check if the format encodes trees.
    fn can_encode_trees(&self) -> bool {
        self.can_encode(ContainerKind::Tree)
    }

    /// Check if the format encodes graphs.
    fn can_encode_graphs(&self) -> bool {
        self.can_encode(ContainerKind::Graph)
    }

    /// Check if `extension` (with or without a leading dot) belongs to this format.
    fn handles_extension(&self, extension: &str) -> bool {
        let extension = extension.trim_start_matches('.');
        self.info()
            .file_extensions
            .iter()
            .any(|known| known.eq_ignore_ascii_case(extension))
    }

    /// Decode the file at `path`, recording it as `sourceFileName`.
    fn decode_file(&self, path: &Path) -> StrataResult<Vec<Container>> {
        let text = read_text(path)?;
        let mut containers = self.decode(&text)?;
        record_file_name(&mut containers, path)?;
        Ok(containers)
    }

    /// Encode containers and write them to `path`.
    fn encode_file(
        &self,
        path: &Path,
        containers: &[Container],
        config: &EncodeConfig,
    ) -> StrataResult<()> {
        let text = self.encode(containers, config)?;
        fs::write(path, text)?;
        Ok(())
    }
}

// ============================================================================
// Helpers shared by format implementations
// ============================================================================

/// Read a whole file, reporting a missing file as `FileNotFound`.
pub(crate) fn read_text(path: &Path) -> StrataResult<String> {
    fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => StrataError::file_not_found(path.display().to_string()),
        _ => StrataError::Io(err),
    })
}

pub(crate) fn record_file_name(containers: &mut [Container], path: &Path) -> StrataResult<()> {
    let name = path.display().to_string();
    for container in containers {
        container.set_attribute(keys::SOURCE_FILE_NAME, name.as_str())?;
    }
    Ok(())
}

/// Stamp the source attributes every decoded container carries.
pub(crate) fn record_source(
    container: &mut impl HasAttributes,
    info: &FormatInfo,
    schema_name: &str,
) -> StrataResult<()> {
    let bag = container.attributes_mut();
    bag.set(keys::SOURCE_MIME_TYPE, info.mime_type)?;
    bag.set(keys::SOURCE_SYNTAX, info.syntax)?;
    bag.set(keys::SOURCE_SCHEMA_NAME, schema_name)?;
    Ok(())
}

/// Require a non-empty list of containers.
pub(crate) fn require_some<'a>(
    containers: &'a [Container],
    info: &FormatInfo,
) -> StrataResult<&'a [Container]> {
    if containers.is_empty() {
        invalid_argument_err!("{} encoder needs at least one container", info.name);
    }
    Ok(containers)
}

/// Require exactly one container.
pub(crate) fn require_one<'a>(
    containers: &'a [Container],
    info: &FormatInfo,
) -> StrataResult<&'a Container> {
    match containers {
        [container] => Ok(container),
        _ => Err(StrataError::invalid_argument(format!(
            "{} encoder needs exactly one container, got {}",
            info.name,
            containers.len()
        ))),
    }
}

pub(crate) fn expect_table<'a>(container: &'a Container, info: &FormatInfo) -> StrataResult<&'a Table> {
    container.as_table().ok_or_else(|| wrong_kind(container, info))
}

pub(crate) fn expect_tree<'a>(container: &'a Container, info: &FormatInfo) -> StrataResult<&'a Tree> {
    container.as_tree().ok_or_else(|| wrong_kind(container, info))
}

pub(crate) fn expect_graph<'a>(container: &'a Container, info: &FormatInfo) -> StrataResult<&'a Graph> {
    container.as_graph().ok_or_else(|| wrong_kind(container, info))
}

fn wrong_kind(container: &Container, info: &FormatInfo) -> StrataError {
    StrataError::invalid_argument(format!(
        "{} encoder cannot encode a {}",
        info.name,
        container.kind()
    ))
}
