//! Drawing pixel buffers to the terminal.
//!
//! This module defines:
//!
//! *   [`PixelDisplay`] trait: the interface a pixel-producing caller programs against,
//!     independent of where the pixels end up.
//! *   [`AnsiRenderer`] struct: a `PixelDisplay` that draws every pixel as a colored glyph
//!     using 24 bit ANSI escape sequences, then moves the cursor back up so the next frame
//!     overwrites the previous one in place.
//! *   [`FrameWriter`]: a sink that only reaches stdout (or another target) on flush.
//!
//! **Frame layout**, for a `width x height` frame:
//!
//! 1.  A line break.
//! 2.  Per row: `ESC[38;2;R;G;Bm⬤ ` per pixel, then a line break.
//! 3.  With a measured and displayed refresh rate: `ESC[39mESC[49m` followed by `60.00 FPS`.
//! 4.  `ESC[39mESC[49m`, always, even when an earlier write failed.
//! 5.  `ESC[<height + 1>A`.

use crate::error::Result;
use crate::rendering::buffer::PixelBuffer;
use crate::rendering::color::Color;
use crate::rendering::refresh::{Pacing, RefreshTracker};
use crossterm::{Command, queue};
use crossterm::style::{Color as TermColor, Print, SetBackgroundColor, SetForegroundColor};
use log::{debug, trace, warn};
use std::fmt;
use std::io;
use std::io::{Stdout, Write, stdout};
use std::time::Instant;

/// Printed for every pixel, in the pixel's color.
pub const PIXEL_GLYPH: &str = "⬤ ";

/// Interface for anything that holds a frame of pixels and can show it.
pub trait PixelDisplay {
    /// Returns `(width, height)` of the frame.
    fn geometry(&self) -> (usize, usize);

    /// Returns the color at a linear index. Unset pixels are black.
    fn get(&self, position: usize) -> Result<Color>;

    /// Sets the color at a linear index.
    fn set(&mut self, position: usize, color: Color) -> Result<()>;

    /// Shows the current frame and starts a new, blank one.
    fn render_current(&mut self) -> Result<()>;

    /// Releases whatever the display holds on to.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Sets the color at column `x` of row `y`.
    fn set_xy(&mut self, x: usize, y: usize, color: Color) -> Result<()> {
        let (width, height) = self.geometry();
        if x >= width || y >= height {
            return Err(crate::error::RenderError::IndexOutOfRange {
                position: y.saturating_mul(width).saturating_add(x),
                len: width * height,
            });
        }
        self.set(y * width + x, color)
    }
}

impl<W: Write> PixelDisplay for AnsiRenderer<W> {
    fn geometry(&self) -> (usize, usize) {
        AnsiRenderer::geometry(self)
    }

    fn get(&self, position: usize) -> Result<Color> {
        AnsiRenderer::get(self, position)
    }

    fn set(&mut self, position: usize, color: Color) -> Result<()> {
        AnsiRenderer::set(self, position, color)
    }

    fn render_current(&mut self) -> Result<()> {
        AnsiRenderer::render_current(self)
    }

    fn close(&mut self) -> Result<()> {
        AnsiRenderer::close(self)
    }
}

/// Renders a [`PixelBuffer`] to a terminal sink, one colored glyph per pixel.
///
/// The renderer owns its own buffer; callers set pixels through [`AnsiRenderer::set`] or
/// [`AnsiRenderer::buffer_mut`] and then call [`AnsiRenderer::render_current`]. After each
/// render the buffer is blank again.
///
/// # Example
///
/// ```rust
/// use pixterm::rendering::color::Color;
/// use pixterm::rendering::refresh::Pacing;
/// use pixterm::rendering::renderer::AnsiRenderer;
///
/// let pacing = Pacing::Measured { show_refresh_rate: false };
/// let mut renderer = AnsiRenderer::with_sink(2, 1, pacing, Vec::new()).unwrap();
/// renderer.set(0, Color::rgb(255, 0, 0)).unwrap();
/// renderer.set(1, Color::rgb(0, 0, 255)).unwrap();
/// renderer.render_current().unwrap();
///
/// let out = String::from_utf8(renderer.into_sink()).unwrap();
/// assert_eq!(
///     out,
///     "\n\x1b[38;2;255;0;0m⬤ \x1b[38;2;0;0;255m⬤ \n\x1b[39m\x1b[49m\x1b[2A"
/// );
/// ```
pub struct AnsiRenderer<W: Write> {
    buffer: PixelBuffer,
    pacing: Pacing,
    tracker: RefreshTracker,
    last_rate: Option<f64>,
    sink: W,
}

impl AnsiRenderer<FrameWriter> {
    /// Creates a renderer that draws to stdout, writing each frame in one go.
    pub fn new(width: usize, height: usize, pacing: Pacing) -> Result<Self> {
        Self::with_sink(width, height, pacing, FrameWriter::new())
    }
}

impl<W: Write> AnsiRenderer<W> {
    /// Creates a renderer with a custom output sink.
    ///
    /// Allows rendering to targets such as `stdout`, files, or in-memory buffers.
    pub fn with_sink(width: usize, height: usize, pacing: Pacing, sink: W) -> Result<Self> {
        let buffer = PixelBuffer::new(width, height)?;
        debug!("created {width}x{height} ansi renderer, pacing {pacing:?}");
        Ok(Self {
            buffer,
            pacing,
            tracker: RefreshTracker::new(),
            last_rate: None,
            sink,
        })
    }

    /// Returns `(width, height)` of the renderer's buffer.
    pub fn geometry(&self) -> (usize, usize) {
        self.buffer.geometry()
    }

    /// Returns the color at a linear index of the current frame.
    pub fn get(&self, position: usize) -> Result<Color> {
        self.buffer.get(position)
    }

    /// Sets the color at a linear index of the current frame.
    pub fn set(&mut self, position: usize, color: impl Into<Color>) -> Result<()> {
        self.buffer.set(position, color)
    }

    /// The frame being built.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// The frame being built, for bulk edits.
    pub fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Switches the pacing strategy for the following frames.
    ///
    /// Samples taken under the old pacing are dropped, so a displayed rate only ever
    /// covers frames drawn with the current one.
    pub fn set_pacing(&mut self, pacing: Pacing) {
        if pacing != self.pacing {
            debug!("pacing changed from {:?} to {pacing:?}", self.pacing);
            self.tracker.clear();
            self.last_rate = None;
        }
        self.pacing = pacing;
    }

    /// The refresh rate computed after the last render, if there was enough data for one.
    /// Always `None` with fixed delay pacing.
    pub fn refresh_rate(&self) -> Option<f64> {
        self.last_rate
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consumes the renderer and returns the sink.
    pub fn into_sink(self) -> W {
        self.sink
    }

    /// Draws the renderer's own buffer. Equivalent to [`AnsiRenderer::render`] on it.
    pub fn render_current(&mut self) -> Result<()> {
        let blank = self.buffer.blank_like();
        let frame = std::mem::replace(&mut self.buffer, blank);
        self.render(&frame)
    }

    /// Draws `frame`, then resets the renderer's buffer and the terminal colors.
    ///
    /// The reset happens no matter whether drawing succeeded. On a write failure the first
    /// error is returned after the reset, and the cursor is not moved back up.
    pub fn render(&mut self, frame: &PixelBuffer) -> Result<()> {
        let (_, height) = frame.geometry();
        let mut cleanup = FrameCleanup::new(&mut self.sink, &mut self.buffer);

        let mut drawn = write_frame(cleanup.sink(), frame);
        if drawn.is_ok() && self.pacing.is_measured() {
            self.tracker.record(Instant::now());
            self.last_rate = self.tracker.rate();
            if let Some(rate) = self.last_rate {
                trace!("refresh rate over last {} frames: {rate:.2}", self.tracker.len());
                if self.pacing.shows_refresh_rate() {
                    drawn = write_refresh_rate(cleanup.sink(), rate);
                }
            }
        }
        let cleaned = cleanup.finish();

        if let Err(err) = drawn.and(cleaned) {
            warn!("frame write failed: {err}");
            // best effort, the caller only gets the first error
            let _ = self.sink.flush();
            return Err(err.into());
        }

        queue!(self.sink, MoveUpLines(height + 1))?;
        self.sink.flush()?;

        if let Pacing::FixedDelay(delay) = self.pacing {
            std::thread::sleep(delay);
        }
        Ok(())
    }

    /// Flushes any pending output. Terminal modes are left alone.
    pub fn close(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

fn write_frame<W: Write>(sink: &mut W, frame: &PixelBuffer) -> io::Result<()> {
    queue!(sink, Print('\n'))?;
    for row in frame.rows() {
        for color in row {
            let [r, g, b] = color.to_rgb8();
            queue!(
                sink,
                SetForegroundColor(TermColor::Rgb { r, g, b }),
                Print(PIXEL_GLYPH)
            )?;
        }
        queue!(sink, Print('\n'))?;
    }
    Ok(())
}

fn write_refresh_rate<W: Write>(sink: &mut W, rate: f64) -> io::Result<()> {
    queue!(
        sink,
        SetForegroundColor(TermColor::Reset),
        SetBackgroundColor(TermColor::Reset),
        Print(format!("{rate:.2} FPS"))
    )
}

/// Moves the cursor up any number of lines. [`crossterm::cursor::MoveUp`] only takes a `u16`.
struct MoveUpLines(usize);

impl Command for MoveUpLines {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{}A", self.0)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        crossterm::cursor::MoveUp(u16::try_from(self.0).unwrap_or(u16::MAX)).execute_winapi()
    }
}

/// Resets the renderer's buffer and the terminal colors when a frame ends.
///
/// [`FrameCleanup::finish`] runs the reset and reports write errors. If the guard is dropped
/// without finishing, e.g. while unwinding, the reset runs in `Drop` instead.
struct FrameCleanup<'a, W: Write> {
    sink: &'a mut W,
    buffer: &'a mut PixelBuffer,
    finished: bool,
}

impl<'a, W: Write> FrameCleanup<'a, W> {
    fn new(sink: &'a mut W, buffer: &'a mut PixelBuffer) -> Self {
        Self {
            sink,
            buffer,
            finished: false,
        }
    }

    fn sink(&mut self) -> &mut W {
        self.sink
    }

    fn finish(mut self) -> io::Result<()> {
        self.finished = true;
        self.reset()
    }

    fn reset(&mut self) -> io::Result<()> {
        *self.buffer = self.buffer.blank_like();
        queue!(
            self.sink,
            SetForegroundColor(TermColor::Reset),
            SetBackgroundColor(TermColor::Reset)
        )
    }
}

impl<W: Write> Drop for FrameCleanup<'_, W> {
    fn drop(&mut self) {
        if !self.finished {
            let _ = self.reset();
            let _ = self.sink.flush();
        }
    }
}

/// Sink that _only_ writes to its target (stdout by default) on explicit flush.
///
/// A frame is made of many small escape sequences; collecting them and writing the whole
/// frame at once keeps partially drawn frames off the screen. A failed flush drops the
/// collected frame, so it is never sent twice.
pub struct FrameWriter<T: Write = Stdout> {
    buf: Vec<u8>,
    target: T,
}

impl FrameWriter {
    pub fn new() -> Self {
        Self::with_target(stdout())
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Write> FrameWriter<T> {
    /// Collects frames for `target` instead of stdout.
    pub fn with_target(target: T) -> Self {
        Self {
            buf: vec![],
            target,
        }
    }

    /// Bytes written since the last flush.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn target(&self) -> &T {
        &self.target
    }
}

impl<T: Write> Write for FrameWriter<T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let written = self
            .target
            .write_all(&self.buf)
            .and_then(|()| self.target.flush());
        self.buf.clear();
        written
    }
}
