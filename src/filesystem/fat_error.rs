//! Error types for mounting and navigating a FAT32 volume.
//!
//! Every failure while decoding the on-disk structures surfaces as one of these variants.
//! Nothing is recovered silently: a volume either mounts with a navigable tree or the
//! first structural problem is reported.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading a FAT32 volume.
#[derive(Error, Debug)]
pub enum FATError {
    /// The volume is not FAT32 or its boot structures fail validation.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A cluster chain points to a free, bad or reserved cluster, or loops on itself.
    #[error("Broken cluster chain at cluster {cluster}: {reason}")]
    BrokenChain { cluster: u32, reason: String },

    /// A directory holds an inconsistent long filename group or a truncated record.
    #[error("Malformed directory: {0}")]
    MalformedDirectory(String),

    /// Path resolution failed.
    #[error("File not found: `{0}`")]
    NotFound(String),

    /// Underlying I/O errors from the byte source.
    #[error("IO Error: `{0}`")]
    SourceIO(io::Error),
}

impl FATError {
    pub(crate) fn broken_chain(cluster: u32, reason: impl Into<String>) -> Self {
        FATError::BrokenChain {
            cluster,
            reason: reason.into(),
        }
    }
}

/// Converts standard I/O errors into FATError.
impl From<io::Error> for FATError {
    fn from(err: io::Error) -> Self {
        FATError::SourceIO(err)
    }
}

/// Converts BinRead errors into FATError.
///
/// Short reads are reported as I/O failures, anything else as an unsupported layout.
impl From<binread::Error> for FATError {
    fn from(err: binread::Error) -> Self {
        match err {
            binread::Error::Io(err) => FATError::SourceIO(err),
            other => FATError::UnsupportedFormat(other.to_string()),
        }
    }
}
