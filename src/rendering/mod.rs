//! Rendering module for terminal-based output.
//!
//! **Sub-modules:**
//!
//! *   [`color`](crate::rendering::color): Defines the [`Color`](color::Color) value type and its canonical form.
//! *   [`buffer`](crate::rendering::buffer): Defines the [`PixelBuffer`](buffer::PixelBuffer) struct, a fixed grid of colors.
//! *   [`refresh`](crate::rendering::refresh): Frame pacing and the rolling refresh rate estimate.
//! *   [`renderer`](crate::rendering::renderer): Defines the [`PixelDisplay`](renderer::PixelDisplay) trait and the
//!     [`AnsiRenderer`](renderer::AnsiRenderer) that draws to the terminal.
//!
//! **Rendering Process:**
//!
//! 1.  Create an `AnsiRenderer` with a geometry and a [`Pacing`](refresh::Pacing).
//! 2.  Set pixel colors into its buffer.
//! 3.  Call `render_current()`. The frame is drawn, the buffer is reset to black and the
//!     cursor moves back up, so the next frame is drawn over this one.

pub mod buffer;
pub mod color;
pub mod refresh;
pub mod renderer;
