//! Color representation for terminal rendering.
//!
//! A [`Color`] carries four 16 bit channels with premultiplied alpha. Colors may be built
//! from 8 bit straight-alpha values or from raw 16 bit values, and [`Color::canonical`]
//! normalizes either form before it is stored in a [`PixelBuffer`].
//!
//! [`PixelBuffer`]: crate::rendering::buffer::PixelBuffer

/// An RGBA color with 16 bits per channel and premultiplied alpha.
///
/// # Example
///
/// ```rust
/// use pixterm::rendering::color::Color;
///
/// let red = Color::rgb(255, 0, 0);
/// assert_eq!(red.to_rgb8(), [255, 0, 0]);
///
/// // half transparent white, premultiplied
/// let ghost = Color::rgba(255, 255, 255, 128);
/// assert_eq!(ghost.to_rgb8(), [128, 128, 128]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    r: u16,
    g: u16,
    b: u16,
    a: u16,
}

impl Color {
    /// Opaque black. This is what unset pixels read as.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Fully transparent. Draws the same as black, since there is nothing to blend with.
    pub const TRANSPARENT: Color = Color::rgba16(0, 0, 0, 0);

    /// Creates an opaque color from 8 bit channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: widen(r),
            g: widen(g),
            b: widen(b),
            a: u16::MAX,
        }
    }

    /// Creates a color from 8 bit channels with straight (non-premultiplied) alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        let a16 = widen(a) as u32;
        Self {
            r: (widen(r) as u32 * a16 / 0xffff) as u16,
            g: (widen(g) as u32 * a16 / 0xffff) as u16,
            b: (widen(b) as u32 * a16 / 0xffff) as u16,
            a: a16 as u16,
        }
    }

    /// Creates a color from raw 16 bit premultiplied channels, stored exactly as given.
    pub const fn rgba16(r: u16, g: u16, b: u16, a: u16) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the four 16 bit premultiplied channels as `[r, g, b, a]`.
    pub const fn channels16(self) -> [u16; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Returns the color as 8 bit channels, the range used by the terminal color protocol.
    pub const fn to_rgb8(self) -> [u8; 3] {
        [narrow(self.r), narrow(self.g), narrow(self.b)]
    }

    /// Returns the alpha channel as an 8 bit value.
    pub const fn alpha8(self) -> u8 {
        narrow(self.a)
    }

    /// Normalizes the color to the form stored in pixel buffers.
    ///
    /// Every channel is quantized to 8 bits and widened again, and color channels are
    /// clamped to alpha. The result is a fixed point: `c.canonical().canonical() == c.canonical()`.
    pub const fn canonical(self) -> Self {
        let a = narrow(self.a);
        Self {
            r: widen(min(narrow(self.r), a)),
            g: widen(min(narrow(self.g), a)),
            b: widen(min(narrow(self.b), a)),
            a: widen(a),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Color::rgba(r, g, b, a)
    }
}

#[inline]
const fn widen(c: u8) -> u16 {
    // 0xab -> 0xabab, so 0xff maps to 0xffff
    (c as u16) * 0x101
}

#[inline]
const fn narrow(c: u16) -> u8 {
    (c >> 8) as u8
}

const fn min(a: u8, b: u8) -> u8 {
    if a < b { a } else { b }
}
