//! Resolution of `<<name` and `<!name` include directives.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Supplies the content of included resources.
pub trait IncludeResolver {
    /// Return the full text of the resource called `name`.
    fn resolve(&self, name: &str) -> Result<String, IncludeError>;
}

impl<R: IncludeResolver + ?Sized> IncludeResolver for &R {
    fn resolve(&self, name: &str) -> Result<String, IncludeError> {
        (**self).resolve(name)
    }
}

/// Failure to include a resource. Always aborts the whole parse.
#[derive(Debug)]
pub enum IncludeError {
    /// No resource with that name exists.
    NotFound {
        /// Name as written after the directive.
        name: String,
    },
    /// The resource exists but could not be read.
    Io {
        /// Name as written after the directive.
        name: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Include directives are not allowed by this parser.
    Disabled {
        /// Name as written after the directive.
        name: String,
    },
    /// Includes are nested deeper than the parser allows.
    TooDeep {
        /// Name of the include that exceeded the limit.
        name: String,
        /// The configured limit.
        limit: usize,
    },
}

impl IncludeError {
    /// Name of the resource that failed.
    pub fn name(&self) -> &str {
        match self {
            IncludeError::NotFound { name }
            | IncludeError::Io { name, .. }
            | IncludeError::Disabled { name }
            | IncludeError::TooDeep { name, .. } => name,
        }
    }
}

impl std::fmt::Display for IncludeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IncludeError::NotFound { name } => write!(f, "included resource '{}' not found", name),
            IncludeError::Io { name, source } => {
                write!(f, "failed to read included resource '{}': {}", name, source)
            }
            IncludeError::Disabled { name } => {
                write!(f, "cannot include '{}': includes are disabled", name)
            }
            IncludeError::TooDeep { name, limit } => write!(
                f,
                "cannot include '{}': includes nested deeper than {}",
                name, limit
            ),
        }
    }
}

impl std::error::Error for IncludeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IncludeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolves names as file paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    /// Resolve relative names against `root`. Absolute names are used as is.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve relative names against the process working directory.
    pub fn cwd() -> Self {
        Self::new(".")
    }

    /// Root directory for relative names.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        Self::cwd()
    }
}

impl IncludeResolver for FileResolver {
    fn resolve(&self, name: &str) -> Result<String, IncludeError> {
        let path = self.root.join(name);
        debug!(path = %path.display(), "reading include");
        std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => IncludeError::NotFound {
                name: name.to_string(),
            },
            _ => IncludeError::Io {
                name: name.to_string(),
                source,
            },
        })
    }
}

/// Resolves names from an in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    resources: HashMap<String, String>,
}

impl MemoryResolver {
    /// Create an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource, builder style.
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    /// Add or replace a resource.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.resources.insert(name.into(), text.into());
    }
}

impl IncludeResolver for MemoryResolver {
    fn resolve(&self, name: &str) -> Result<String, IncludeError> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| IncludeError::NotFound {
                name: name.to_string(),
            })
    }
}

/// Rejects every include directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIncludes;

impl IncludeResolver for NoIncludes {
    fn resolve(&self, name: &str) -> Result<String, IncludeError> {
        Err(IncludeError::Disabled {
            name: name.to_string(),
        })
    }
}

/// Extract the resource name from the text following a directive.
///
/// Surrounding whitespace and one pair of matching quotes are removed.
pub(crate) fn resource_name(command: &str) -> &str {
    let name = command.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = name
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    name
}
