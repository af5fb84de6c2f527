#![doc = include_str!("../README.md")]

pub mod error;
pub mod rendering;

pub use crate::error::{RenderError, Result};
pub use crate::rendering::buffer::PixelBuffer;
pub use crate::rendering::color::Color;
pub use crate::rendering::refresh::{Pacing, RefreshTracker};
pub use crate::rendering::renderer::{AnsiRenderer, FrameWriter, PixelDisplay};
