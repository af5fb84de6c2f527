//! Errors produced by the pixel buffer and the renderer.

use std::io;
use thiserror::Error;

/// Everything that can go wrong while building or drawing a frame.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Width or height was zero, or the cell count does not fit in memory.
    #[error("invalid geometry {width}x{height}: width and height must be positive")]
    InvalidGeometry { width: usize, height: usize },

    /// A linear pixel index outside `0..width*height`.
    #[error("pixel index {position} out of range for a buffer of {len} cells")]
    IndexOutOfRange { position: usize, len: usize },

    /// The output sink rejected a write or a flush.
    #[error("failed to write frame to output: {0}")]
    OutputWrite(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
