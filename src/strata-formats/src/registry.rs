//! Format registry and content sniffing.
//!
//! The registry owns every known format and, when asked to decode text of an
//! unknown format, tries them from the most to the least specific.

use std::collections::HashMap;
use std::path::Path;

use common_config::StrataConfig;
use common_error::{StrataError, StrataResult, ensure};
use log::debug;
use strata_core::{Container, ContainerKind};

use crate::format::{Format, MAX_COMPLEXITY, read_text, record_file_name};
use crate::formats::{
    CsvFormat, HtmlTableFormat, JsonGraphFormat, JsonTableFormat, JsonTreeFormat, TsvFormat,
};

const BUCKETS: usize = MAX_COMPLEXITY as usize + 1;

/// Sniffing progress while decoding text with every candidate format.
#[derive(Debug)]
enum Sniff {
    /// No format has produced anything yet.
    NoResult,
    /// The most relevant failure so far.
    SavedException(StrataError),
    /// A single one-column table, kept in case nothing better turns up.
    SavedSimplistic(Vec<Container>),
}

impl Sniff {
    fn record_error(self, format: &str, err: StrataError) -> Self {
        debug!("format {format} rejected input: {err}");
        match self {
            Self::NoResult => Self::SavedException(err),
            // Content errors say more than syntax errors; the latest one wins.
            Self::SavedException(_) if err.is_invalid_content() => Self::SavedException(err),
            other => other,
        }
    }

    fn record_simplistic(self, format: &str, containers: Vec<Container>) -> Self {
        match self {
            Self::SavedSimplistic(_) => self,
            _ => {
                debug!("format {format} produced a single-column table, looking further");
                Self::SavedSimplistic(containers)
            }
        }
    }
}

/// Registry of formats, scanned by complexity when sniffing.
///
/// ## Example
///
/// ```rust
/// use strata_formats::FormatRegistry;
///
/// let registry = FormatRegistry::with_default_formats();
/// let containers = registry.decode("a,b\r\n1,2\r\n", None).unwrap();
/// assert_eq!(containers.len(), 1);
/// ```
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
    by_name: HashMap<&'static str, usize>,
    buckets: [Vec<usize>; BUCKETS],
    config: StrataConfig,
}

impl FormatRegistry {
    /// Create a registry with no formats.
    pub fn new(config: StrataConfig) -> Self {
        Self {
            formats: Vec::new(),
            by_name: HashMap::new(),
            buckets: std::array::from_fn(|_| Vec::new()),
            config,
        }
    }

    /// Create a registry holding every built-in format.
    pub fn with_default_formats() -> Self {
        Self::with_config(StrataConfig::default())
    }

    /// Create a registry holding every built-in format, using `config`.
    pub fn with_config(config: StrataConfig) -> Self {
        let mut registry = Self::new(config);
        let formats: [Box<dyn Format>; 6] = [
            Box::new(JsonGraphFormat),
            Box::new(JsonTreeFormat),
            Box::new(JsonTableFormat),
            Box::new(HtmlTableFormat),
            Box::new(TsvFormat),
            Box::new(CsvFormat),
        ];
        for format in formats {
            registry.push(format);
        }
        registry
    }

    /// Registry configuration.
    pub fn config(&self) -> &StrataConfig {
        &self.config
    }

    /// Add a format. Names must be unique and complexity at most 10.
    pub fn register(&mut self, format: Box<dyn Format>) -> StrataResult<()> {
        let name = format.name();
        ensure!(
            !self.by_name.contains_key(name),
            InvalidArgument: "a format named {name} is already registered"
        );
        ensure!(
            format.complexity() <= MAX_COMPLEXITY,
            InvalidArgument: "format {name} has complexity {} above {MAX_COMPLEXITY}",
            format.complexity()
        );
        self.push(format);
        Ok(())
    }

    fn push(&mut self, format: Box<dyn Format>) {
        let index = self.formats.len();
        self.by_name.insert(format.name(), index);
        self.buckets[usize::from(format.complexity())].push(index);
        self.formats.push(format);
    }

    /// Every format, most specific first.
    pub fn formats(&self) -> impl Iterator<Item = &dyn Format> {
        self.buckets
            .iter()
            .rev()
            .flatten()
            .map(|&index| self.formats[index].as_ref())
    }

    /// Names of every format, most specific first.
    pub fn format_names(&self) -> Vec<&'static str> {
        self.formats().map(|format| format.name()).collect()
    }

    /// Look up a format by name.
    pub fn find_by_name(&self, name: &str) -> Option<&dyn Format> {
        self.by_name
            .get(name)
            .map(|&index| self.formats[index].as_ref())
    }

    /// Formats claiming `extension`, most specific first.
    pub fn find_by_extension(&self, extension: &str) -> Vec<&dyn Format> {
        self.formats()
            .filter(|format| format.handles_extension(extension))
            .collect()
    }

    /// Formats able to decode containers of `kind`.
    pub fn find_decoders(&self, kind: ContainerKind) -> Vec<&dyn Format> {
        self.formats().filter(|format| format.can_decode(kind)).collect()
    }

    /// Formats able to encode containers of `kind`.
    pub fn find_encoders(&self, kind: ContainerKind) -> Vec<&dyn Format> {
        self.formats().filter(|format| format.can_encode(kind)).collect()
    }

    /// Decode text of unknown format.
    ///
    /// Formats are tried from complexity 10 down to 0, restricted to those
    /// claiming `extension` when one is given. The first format to return
    /// anything other than a lone single-column table wins. Failing that, a
    /// single-column table is returned if some format produced one, else the
    /// most relevant error. If no format was tried the result is empty.
    pub fn decode(&self, text: &str, extension: Option<&str>) -> StrataResult<Vec<Container>> {
        let mut attempted = 0;
        let mut state = Sniff::NoResult;

        for format in self.formats() {
            if extension.is_some_and(|ext| !format.handles_extension(ext)) {
                continue;
            }
            attempted += 1;

            match format.decode(text) {
                Err(err) => state = state.record_error(format.name(), err),
                Ok(containers) if containers.is_empty() => {}
                Ok(containers) if containers.len() == 1 && containers[0].is_single_column_table() => {
                    state = state.record_simplistic(format.name(), containers);
                }
                Ok(containers) => {
                    debug!("format {} decoded {} containers", format.name(), containers.len());
                    return Ok(containers);
                }
            }
        }

        debug!("sniffing finished after {attempted} formats with {state:?}");
        match state {
            Sniff::SavedSimplistic(containers) => Ok(containers),
            Sniff::SavedException(err) => Err(err),
            Sniff::NoResult => Ok(Vec::new()),
        }
    }

    /// Decode a file of unknown format.
    ///
    /// The file's extension restricts the candidate formats only when
    /// `decode.use_file_extension` is set.
    pub fn decode_file(&self, path: &Path) -> StrataResult<Vec<Container>> {
        let text = read_text(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|_| self.config.decode.use_file_extension);

        let mut containers = self.decode(&text, extension)?;
        record_file_name(&mut containers, path)?;
        Ok(containers)
    }

    /// Encode containers with the format called `name`.
    pub fn encode(&self, name: &str, containers: &[Container]) -> StrataResult<String> {
        self.require(name)?.encode(containers, &self.config.encode)
    }

    /// Encode containers with the format called `name` and write them to `path`.
    pub fn encode_file(&self, name: &str, path: &Path, containers: &[Container]) -> StrataResult<()> {
        self.require(name)?
            .encode_file(path, containers, &self.config.encode)
    }

    fn require(&self, name: &str) -> StrataResult<&dyn Format> {
        self.find_by_name(name)
            .ok_or_else(|| StrataError::invalid_argument(format!("no format named {name}")))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_default_formats()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.format_names())
            .field("config", &self.config)
            .finish()
    }
}
