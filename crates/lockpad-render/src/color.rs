#![forbid(unsafe_code)]

//! Packed RGBA color.

use std::fmt;

/// A 32-bit RGBA color packed as `0xRRGGBBAA`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba(pub u32);

impl Rgba {
    /// Fully transparent.
    pub const TRANSPARENT: Self = Self(0);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Create an opaque RGB color (alpha = 255).
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Create an RGBA color with explicit alpha.
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | (a as u32))
    }

    /// Red channel.
    #[inline]
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    #[inline]
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    #[inline]
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// CSS color string suitable for `fillStyle` / `strokeStyle`.
    ///
    /// Opaque colors use `#rrggbb`; translucent ones use `rgba()`.
    #[must_use]
    pub fn to_css(self) -> String {
        if self.a() == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r(), self.g(), self.b())
        } else {
            let alpha = f64::from(self.a()) / 255.0;
            format!("rgba({}, {}, {}, {alpha:.3})", self.r(), self.g(), self.b())
        }
    }
}

impl fmt::Debug for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rgba(#{:08x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip() {
        let c = Rgba::rgba(1, 2, 3, 4);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (1, 2, 3, 4));
    }

    #[test]
    fn css_opaque() {
        assert_eq!(Rgba::WHITE.to_css(), "#ffffff");
        assert_eq!(Rgba::rgb(0, 207, 232).to_css(), "#00cfe8");
    }

    #[test]
    fn css_translucent() {
        assert_eq!(Rgba::rgba(255, 0, 0, 0).to_css(), "rgba(255, 0, 0, 0.000)");
    }

    #[test]
    fn debug_is_hex() {
        assert_eq!(format!("{:?}", Rgba::WHITE), "Rgba(#ffffffff)");
    }
}
