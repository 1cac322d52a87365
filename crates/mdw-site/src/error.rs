//! Build errors.

use std::io;
use std::path::{Path, PathBuf};

use mdw_meta::MetaInfFieldError;

/// Error raised while building the content tree.
///
/// Every variant carries the path of the offending file or directory. Any
/// of them aborts the whole build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Content is missing or cannot be read.
    #[error("{message}: {}", path.display())]
    Content {
        /// Offending path.
        path: PathBuf,
        /// Human-readable description.
        message: String,
        /// Underlying I/O error, if any.
        #[source]
        source: Option<io::Error>,
    },
    /// Directory layout breaks a structural rule.
    #[error("{message}: {}", path.display())]
    ContentStructure {
        /// Offending path.
        path: PathBuf,
        /// Human-readable description.
        message: String,
    },
    /// A content file cannot be turned into a page.
    #[error("{message}: {}", path.display())]
    PageParse {
        /// Offending path.
        path: PathBuf,
        /// Human-readable description.
        message: String,
    },
    /// A metainf block is invalid.
    #[error("Invalid metainf in {}: {source}", path.display())]
    MetaInfField {
        /// File containing the block.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: MetaInfFieldError,
    },
}

impl BuildError {
    /// Path of the file or directory the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Content { path, .. }
            | Self::ContentStructure { path, .. }
            | Self::PageParse { path, .. }
            | Self::MetaInfField { path, .. } => path,
        }
    }

    pub(crate) fn io(path: &Path, message: &str, source: io::Error) -> Self {
        Self::Content {
            path: path.to_path_buf(),
            message: message.to_owned(),
            source: Some(source),
        }
    }

    pub(crate) fn structure(path: &Path, message: impl Into<String>) -> Self {
        Self::ContentStructure {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn page_parse(path: &Path, message: impl Into<String>) -> Self {
        Self::PageParse {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn metainf(path: &Path, source: MetaInfFieldError) -> Self {
        Self::MetaInfField {
            path: path.to_path_buf(),
            source,
        }
    }
}
