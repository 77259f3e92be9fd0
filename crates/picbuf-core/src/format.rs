//! Picture formats: macropixel and plane layout.
//!
//! A [`PictureFormat`] is what a buffer manager needs to know to allocate a
//! picture: how many pixels form an indivisible horizontal unit, and for each
//! plane its chroma name, subsampling and bytes per macropixel.
//!
//! # Usage
//!
//! ```rust
//! use picbuf_core::format::PictureFormat;
//!
//! let i420 = PictureFormat::yuv420p();
//! assert_eq!(i420.planes().len(), 3);
//! assert_eq!(i420.plane("u8").unwrap().hsub, 2);
//! assert_eq!(i420.hgrid(), 2);
//!
//! let uyvy: PictureFormat = "uyvy422".parse().unwrap();
//! assert_eq!(uyvy.macropixel, 2);
//! ```
//!
//! # Presets
//!
//! | Name           | Macropixel | Planes                                   |
//! |----------------|------------|------------------------------------------|
//! | `gray8`        | 1          | `y8`                                     |
//! | `yuv420p`      | 1          | `y8`, `u8` 2x2, `v8` 2x2                 |
//! | `yuv422p`      | 1          | `y8`, `u8` 2x1, `v8` 2x1                 |
//! | `yuv444p`      | 1          | `y8`, `u8`, `v8`                         |
//! | `yuva420p`     | 1          | `y8`, `u8` 2x2, `v8` 2x2, `a8`           |
//! | `yuv420p10le`  | 1          | `y10l`, `u10l` 2x2, `v10l` 2x2           |
//! | `nv12`         | 1          | `y8`, `u8v8` 2x2                         |
//! | `uyvy422`      | 2          | `u8y8v8y8`                               |
//! | `rgb24`        | 1          | `r8g8b8`                                 |
//! | `rgba32`       | 1          | `r8g8b8a8`                               |

use crate::{Error, Result};
use std::str::FromStr;

/// Layout of one plane within a [`PictureFormat`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PlaneFormat {
    /// Chroma name, see [`crate::chroma`].
    pub chroma: String,
    /// Horizontal subsampling.
    pub hsub: u8,
    /// Vertical subsampling.
    pub vsub: u8,
    /// Bytes per macropixel in this plane.
    pub macropixel_size: u8,
}

impl PlaneFormat {
    /// Creates a plane layout.
    pub fn new(chroma: impl Into<String>, hsub: u8, vsub: u8, macropixel_size: u8) -> Self {
        Self {
            chroma: chroma.into(),
            hsub,
            vsub,
            macropixel_size,
        }
    }
}

/// Macropixel and ordered plane list of a picture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PictureFormat {
    /// Pixels per indivisible horizontal unit.
    pub macropixel: u8,
    /// Planes in enumeration order.
    pub planes: Vec<PlaneFormat>,
}

impl PictureFormat {
    /// Names accepted by [`PictureFormat::preset`].
    pub const PRESETS: &'static [&'static str] = &[
        "gray8",
        "yuv420p",
        "yuv422p",
        "yuv444p",
        "yuva420p",
        "yuv420p10le",
        "nv12",
        "uyvy422",
        "rgb24",
        "rgba32",
    ];

    /// Creates a format from a macropixel and planes.
    pub fn new(macropixel: u8, planes: Vec<PlaneFormat>) -> Self {
        Self { macropixel, planes }
    }

    /// 8-bit luma only.
    pub fn gray8() -> Self {
        Self::new(1, vec![PlaneFormat::new("y8", 1, 1, 1)])
    }

    /// 8-bit planar 4:2:0 (I420).
    pub fn yuv420p() -> Self {
        Self::planar_yuv(2, 2)
    }

    /// 8-bit planar 4:2:2.
    pub fn yuv422p() -> Self {
        Self::planar_yuv(2, 1)
    }

    /// 8-bit planar 4:4:4.
    pub fn yuv444p() -> Self {
        Self::planar_yuv(1, 1)
    }

    /// 8-bit planar 4:2:0 with a full resolution alpha plane.
    pub fn yuva420p() -> Self {
        let mut format = Self::yuv420p();
        format.planes.push(PlaneFormat::new("a8", 1, 1, 1));
        format
    }

    /// 10-bit little endian planar 4:2:0.
    pub fn yuv420p10le() -> Self {
        Self::new(
            1,
            vec![
                PlaneFormat::new("y10l", 1, 1, 2),
                PlaneFormat::new("u10l", 2, 2, 2),
                PlaneFormat::new("v10l", 2, 2, 2),
            ],
        )
    }

    /// 8-bit semi-planar 4:2:0 with interleaved chroma.
    pub fn nv12() -> Self {
        Self::new(
            1,
            vec![
                PlaneFormat::new("y8", 1, 1, 1),
                PlaneFormat::new("u8v8", 2, 2, 2),
            ],
        )
    }

    /// 8-bit packed 4:2:2, two pixels per macropixel.
    pub fn uyvy422() -> Self {
        Self::new(2, vec![PlaneFormat::new("u8y8v8y8", 1, 1, 4)])
    }

    /// 8-bit packed RGB.
    pub fn rgb24() -> Self {
        Self::new(1, vec![PlaneFormat::new("r8g8b8", 1, 1, 3)])
    }

    /// 8-bit packed RGBA.
    pub fn rgba32() -> Self {
        Self::new(1, vec![PlaneFormat::new("r8g8b8a8", 1, 1, 4)])
    }

    fn planar_yuv(hsub: u8, vsub: u8) -> Self {
        Self::new(
            1,
            vec![
                PlaneFormat::new("y8", 1, 1, 1),
                PlaneFormat::new("u8", hsub, vsub, 1),
                PlaneFormat::new("v8", hsub, vsub, 1),
            ],
        )
    }

    /// Looks up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        let format = match name {
            "gray8" => Self::gray8(),
            "yuv420p" | "i420" => Self::yuv420p(),
            "yuv422p" => Self::yuv422p(),
            "yuv444p" => Self::yuv444p(),
            "yuva420p" => Self::yuva420p(),
            "yuv420p10le" => Self::yuv420p10le(),
            "nv12" => Self::nv12(),
            "uyvy422" | "uyvy" => Self::uyvy422(),
            "rgb24" => Self::rgb24(),
            "rgba32" | "rgba" => Self::rgba32(),
            _ => return None,
        };
        Some(format)
    }

    /// Returns the planes in enumeration order.
    #[inline]
    pub fn planes(&self) -> &[PlaneFormat] {
        &self.planes
    }

    /// Returns the layout of `chroma`, if present.
    pub fn plane(&self, chroma: &str) -> Option<&PlaneFormat> {
        self.planes.iter().find(|p| p.chroma == chroma)
    }

    /// Horizontal alignment grid: lcm of the macropixel and every `hsub`.
    pub fn hgrid(&self) -> usize {
        self.planes
            .iter()
            .fold(usize::from(self.macropixel).max(1), |acc, p| {
                lcm(acc, usize::from(p.hsub).max(1))
            })
    }

    /// Vertical alignment grid: lcm of every `vsub`.
    pub fn vgrid(&self) -> usize {
        self.planes
            .iter()
            .fold(1, |acc, p| lcm(acc, usize::from(p.vsub).max(1)))
    }

    /// Checks that every factor is non-zero and chroma names are unique.
    pub fn validate(&self) -> Result<()> {
        if self.macropixel == 0 {
            return Err(Error::invalid_parameter("macropixel must be > 0"));
        }
        if self.planes.is_empty() {
            return Err(Error::invalid_parameter("format has no planes"));
        }
        for (i, plane) in self.planes.iter().enumerate() {
            if plane.hsub == 0 || plane.vsub == 0 || plane.macropixel_size == 0 {
                return Err(Error::invalid_parameter(format!(
                    "plane {}: hsub, vsub and macropixel_size must be > 0",
                    plane.chroma
                )));
            }
            if self.planes[..i].iter().any(|p| p.chroma == plane.chroma) {
                return Err(Error::invalid_parameter(format!(
                    "duplicate plane {}",
                    plane.chroma
                )));
            }
        }
        Ok(())
    }
}

impl FromStr for PictureFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::preset(s).ok_or_else(|| {
            Error::invalid_parameter(format!(
                "unknown format '{s}' (known: {})",
                Self::PRESETS.join(", ")
            ))
        })
    }
}

/// Greatest common divisor.
pub const fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Least common multiple; `lcm(0, n) == 0`.
pub const fn lcm(a: usize, b: usize) -> usize {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd(a, b) * b
    }
}
