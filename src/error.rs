//! Error type shared by the pipeline and the image sinks.
//!
//! Numeric edge cases (empty, single-byte or uniform input) are not errors;
//! they resolve to well-defined images.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Read fault on the input, distinct from end of stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image encoder rejected or failed to write the frame
    #[error("encode error: {0}")]
    Encoding(String),

    #[error("invalid frame: {0}")]
    InvalidFrame(String),
}

pub type Result<T> = std::result::Result<T, Error>;
