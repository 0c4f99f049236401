use std::io;
use std::path::PathBuf;

use eu4txt::ParseError;
use thiserror::Error;

/// Failures that stop a rule set from loading.
///
/// Data-entry mistakes inside a rule file are warnings instead; see
/// [`crate::MapperWarning`].
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: eu4txt::de::Error,
    },
    #[error("colonial rules need {expected} top-level sections, found {found}")]
    MissingSection { expected: usize, found: usize },
}
