//! Chroma naming convention and neutral sample values.
//!
//! Planes are identified by an opaque chroma name. To blank a plane the
//! library needs to know what "nothing" means for it: zero for luma, alpha
//! and RGB primaries, but mid-range for colour-difference samples, otherwise
//! a cleared YUV picture turns green.
//!
//! The convention used throughout picbuf is that a chroma name is a
//! concatenation of component tokens:
//!
//! ```text
//! <letter><bits>[l|b]
//!
//! letter  y = luma, u/v = colour difference, a = alpha, r/g/b = primaries
//! bits    1..=16
//! l / b   little/big endian, required when bits > 8 (two-byte samples)
//! ```
//!
//! | Chroma      | Components        | Neutral pattern          |
//! |-------------|-------------------|--------------------------|
//! | `y8`        | Y                 | `00`                     |
//! | `u8`        | U                 | `80`                     |
//! | `u10l`      | U, 10-bit LE      | `00 02`                  |
//! | `u8v8`      | U, V (NV12)       | `80 80`                  |
//! | `u8y8v8y8`  | UYVY              | `80 00 80 00`            |
//! | `r8g8b8a8`  | RGBA              | `00 00 00 00`            |
//!
//! Names outside this grammar are rejected with
//! [`Error::Unsupported`](crate::Error::Unsupported): the library never
//! guesses a fill value.

use crate::{Error, Result};

/// Semantic role of a sample component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaRole {
    /// Luma (`y`).
    Luma,
    /// Colour difference (`u`, `v`), neutral at mid-range.
    ColorDifference,
    /// Alpha/opacity (`a`).
    Alpha,
    /// RGB primary (`r`, `g`, `b`).
    Primary,
}

impl ChromaRole {
    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'y' => Some(Self::Luma),
            'u' | 'v' => Some(Self::ColorDifference),
            'a' => Some(Self::Alpha),
            'r' | 'g' | 'b' => Some(Self::Primary),
            _ => None,
        }
    }
}

/// Byte order of multi-byte samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    /// Least significant byte first (`l` suffix).
    Little,
    /// Most significant byte first (`b` suffix).
    Big,
}

/// One sample component of a chroma name, e.g. `u10l`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Component {
    /// Component letter as written in the name.
    pub letter: char,
    /// Semantic role derived from the letter.
    pub role: ChromaRole,
    /// Significant bits per sample.
    pub bits: u8,
    /// Byte order, `None` for single-byte samples.
    pub endian: Option<Endian>,
}

impl Component {
    /// Bytes occupied by one sample.
    #[inline]
    pub const fn bytes(&self) -> usize {
        if self.bits > 8 { 2 } else { 1 }
    }

    /// Neutral sample value: mid-range for colour difference, zero otherwise.
    #[inline]
    pub const fn neutral(&self) -> u16 {
        match self.role {
            ChromaRole::ColorDifference => 1 << (self.bits - 1),
            _ => 0,
        }
    }

    fn push_neutral(&self, out: &mut Vec<u8>) {
        let value = self.neutral();
        match self.endian {
            None => out.push(value as u8),
            Some(Endian::Little) => out.extend_from_slice(&value.to_le_bytes()),
            Some(Endian::Big) => out.extend_from_slice(&value.to_be_bytes()),
        }
    }
}

/// Parsed chroma name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChromaLayout {
    components: Vec<Component>,
}

impl ChromaLayout {
    /// Parses a chroma name following the module-level convention.
    ///
    /// # Example
    ///
    /// ```rust
    /// use picbuf_core::chroma::{ChromaLayout, ChromaRole};
    ///
    /// let layout = ChromaLayout::parse("u8y8v8y8").unwrap();
    /// assert_eq!(layout.components().len(), 4);
    /// assert_eq!(layout.components()[0].role, ChromaRole::ColorDifference);
    /// assert!(ChromaLayout::parse("v210").is_err());
    /// ```
    pub fn parse(chroma: &str) -> Result<Self> {
        let unsupported =
            |why: &str| Error::unsupported(format!("chroma '{chroma}': {why}"));

        let mut components = Vec::new();
        let mut chars = chroma.chars().peekable();
        while let Some(letter) = chars.next() {
            let role = ChromaRole::from_letter(letter)
                .ok_or_else(|| unsupported("unknown component letter"))?;

            let mut bits: u32 = 0;
            let mut digits = 0;
            while let Some(d) = chars.peek().and_then(|c| c.to_digit(10)) {
                bits = bits * 10 + d;
                digits += 1;
                chars.next();
                if digits > 2 {
                    return Err(unsupported("bit depth too large"));
                }
            }
            if digits == 0 || bits == 0 || bits > 16 {
                return Err(unsupported("bit depth must be 1..=16"));
            }

            // Two-byte samples must carry an endianness suffix. For 8-bit
            // samples a following `b` is the blue component instead.
            let endian = if bits > 8 {
                match chars.next() {
                    Some('l') => Some(Endian::Little),
                    Some('b') => Some(Endian::Big),
                    _ => return Err(unsupported("missing endianness suffix")),
                }
            } else {
                None
            };

            components.push(Component {
                letter,
                role,
                bits: bits as u8,
                endian,
            });
        }

        if components.is_empty() {
            return Err(unsupported("empty name"));
        }
        Ok(Self { components })
    }

    /// Returns the parsed components in name order.
    #[inline]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Bytes covered by one occurrence of every component.
    pub fn pattern_len(&self) -> usize {
        self.components.iter().map(Component::bytes).sum()
    }

    /// Neutral bytes for one occurrence of every component.
    pub fn neutral_pattern(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pattern_len());
        for component in &self.components {
            component.push_neutral(&mut out);
        }
        out
    }
}

/// Returns the neutral fill for one macropixel of the plane `chroma`.
///
/// The component pattern is repeated to cover `macropixel_size` bytes; a
/// plane whose macropixel is not a whole number of patterns cannot be
/// cleared.
///
/// # Example
///
/// ```rust
/// use picbuf_core::chroma::neutral_fill;
///
/// assert_eq!(neutral_fill("y8", 1).unwrap(), vec![0x00]);
/// assert_eq!(neutral_fill("v8", 1).unwrap(), vec![0x80]);
/// assert_eq!(neutral_fill("u10l", 2).unwrap(), vec![0x00, 0x02]);
/// ```
pub fn neutral_fill(chroma: &str, macropixel_size: usize) -> Result<Vec<u8>> {
    let layout = ChromaLayout::parse(chroma)?;
    let pattern = layout.neutral_pattern();
    if macropixel_size == 0 || macropixel_size % pattern.len() != 0 {
        return Err(Error::unsupported(format!(
            "chroma '{chroma}' pattern of {} bytes does not tile a {macropixel_size}-byte macropixel",
            pattern.len()
        )));
    }
    Ok(pattern.repeat(macropixel_size / pattern.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_planar_yuv() {
        assert_eq!(neutral_fill("y8", 1).unwrap(), vec![0]);
        assert_eq!(neutral_fill("u8", 1).unwrap(), vec![0x80]);
        assert_eq!(neutral_fill("v8", 1).unwrap(), vec![0x80]);
        assert_eq!(neutral_fill("a8", 1).unwrap(), vec![0]);
    }

    #[test]
    fn test_high_bit_depth() {
        assert_eq!(neutral_fill("u10l", 2).unwrap(), vec![0x00, 0x02]);
        assert_eq!(neutral_fill("v10b", 2).unwrap(), vec![0x02, 0x00]);
        assert_eq!(neutral_fill("y16l", 2).unwrap(), vec![0, 0]);
        assert_eq!(neutral_fill("u16b", 2).unwrap(), vec![0x80, 0x00]);
    }

    #[test]
    fn test_packed() {
        assert_eq!(
            neutral_fill("u8y8v8y8", 4).unwrap(),
            vec![0x80, 0x00, 0x80, 0x00]
        );
        assert_eq!(neutral_fill("u8v8", 2).unwrap(), vec![0x80, 0x80]);
        assert_eq!(neutral_fill("r8g8b8", 3).unwrap(), vec![0, 0, 0]);
        // b as blue after an 8-bit component, not an endianness suffix
        let layout = ChromaLayout::parse("r8g8b8a8").unwrap();
        assert_eq!(layout.components().len(), 4);
        assert_eq!(layout.components()[3].role, ChromaRole::Alpha);
    }

    #[test]
    fn test_pattern_repeats_over_macropixel() {
        assert_eq!(neutral_fill("u8", 4).unwrap(), vec![0x80; 4]);
    }

    #[test]
    fn test_rejects_unknown_names() {
        for name in ["", "v210", "x8", "y", "y0", "y17l", "u10", "y8l", "u123"] {
            let err = ChromaLayout::parse(name).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Unsupported, "{name}");
        }
    }

    #[test]
    fn test_rejects_untileable_macropixel() {
        assert!(neutral_fill("u8y8v8y8", 2).is_err());
        assert!(neutral_fill("u10l", 3).is_err());
        assert!(neutral_fill("y8", 0).is_err());
    }
}
