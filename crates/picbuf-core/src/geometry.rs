//! Region and resize parameter normalization.
//!
//! Callers describe regions and resizes with signed parameters that follow
//! two sentinel conventions:
//!
//! - a negative offset counts from the end (`hoffset = -4` is the last four
//!   pixels of each line);
//! - a size of [`TO_END`] (`-1`) means "until the end of the line/picture".
//!
//! These conventions are resolved here, by pure functions from raw to
//! absolute parameters, before any buffer is touched:
//!
//! - [`RawRegion::resolve`] + [`Region::check_plane`] = [`normalize_region`]
//! - [`ResizeRequest::resolve`] = [`normalize_resize`]
//!
//! # Coordinate System
//!
//! All values are in full-picture pixels and lines, before division by the
//! macropixel or a plane's subsampling:
//!
//! ```text
//! (0,0) ───────────────► hsize
//!   │   ┌──────────────┐
//!   │   │ hoffset,     │
//!   │   │ voffset      │
//!   │   │      region  │
//!   │   └──────────────┘
//!   ▼ vsize
//! ```
//!
//! # Resizing
//!
//! `hskip`/`vskip` are positive to crop that many pixels/lines from the
//! left/top, negative to grow the canvas on that side (existing content
//! shifts right/down). `new_hsize`/`new_vsize` are the final dimensions, or
//! [`TO_END`] to keep the same right/bottom edge.
//!
//! # Usage
//!
//! ```rust
//! use picbuf_core::geometry::{PictureSize, RawRegion, Region, ResizeKind, ResizeRequest};
//!
//! let size = PictureSize::new(16, 16, 1);
//!
//! // Last 4 columns, all lines
//! let region = RawRegion::new(-4, 0, -1, -1).resolve(size).unwrap();
//! assert_eq!(region, Region::new(12, 0, 4, 16));
//!
//! // Crop two pixels on the left
//! let req = ResizeRequest::resolve(size, 2, 0, -1, -1).unwrap();
//! assert_eq!(req.new_hsize, 14);
//! assert_eq!(req.kind(), ResizeKind::Shrink);
//! ```

use crate::picture::PictureBuffer;
use crate::{Error, Result};
use tracing::trace;

/// Size sentinel meaning "until the end".
pub const TO_END: i64 = -1;

/// Total dimensions of a picture buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PictureSize {
    /// Width in pixels.
    pub hsize: usize,
    /// Height in lines.
    pub vsize: usize,
    /// Pixels per macropixel.
    pub macropixel: u8,
}

impl PictureSize {
    /// Creates a picture size.
    #[inline]
    pub const fn new(hsize: usize, vsize: usize, macropixel: u8) -> Self {
        Self {
            hsize,
            vsize,
            macropixel,
        }
    }

    fn totals(&self) -> Result<(i64, i64)> {
        let h = i64::try_from(self.hsize)
            .map_err(|_| Error::invalid_parameter("picture width overflows i64"))?;
        let v = i64::try_from(self.vsize)
            .map_err(|_| Error::invalid_parameter("picture height overflows i64"))?;
        Ok((h, v))
    }
}

/// Region as passed by callers, before sentinel resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawRegion {
    /// Horizontal offset; negative counts from the end of lines.
    pub hoffset: i64,
    /// Vertical offset; negative counts from the last line.
    pub voffset: i64,
    /// Width, or [`TO_END`].
    pub hsize: i64,
    /// Height, or [`TO_END`].
    pub vsize: i64,
}

impl RawRegion {
    /// The whole picture.
    pub const FULL: RawRegion = RawRegion::new(0, 0, TO_END, TO_END);

    /// Creates a raw region.
    #[inline]
    pub const fn new(hoffset: i64, voffset: i64, hsize: i64, vsize: i64) -> Self {
        Self {
            hoffset,
            voffset,
            hsize,
            vsize,
        }
    }

    /// Resolves sentinels against `size` and checks macropixel alignment.
    ///
    /// Rules, in order:
    /// 1. offsets and `offset + size` must not exceed the picture, checked on
    ///    the raw values;
    /// 2. negative offsets are taken from the end;
    /// 3. a size of [`TO_END`] extends to the end, and the resolved region
    ///    must still lie inside the picture;
    /// 4. horizontal offset and size must be multiples of the macropixel.
    ///
    /// Per-plane subsampling is checked separately by [`Region::check_plane`].
    pub fn resolve(&self, size: PictureSize) -> Result<Region> {
        let (total_h, total_v) = size.totals()?;
        let RawRegion {
            mut hoffset,
            mut voffset,
            mut hsize,
            mut vsize,
        } = *self;

        let overflows = |offset: i64, extent: i64, total: i64| {
            offset > total || offset.checked_add(extent).is_none_or(|end| end > total)
        };
        if overflows(hoffset, hsize, total_h) || overflows(voffset, vsize, total_v) {
            return Err(Error::invalid_parameter(format!(
                "region ({hoffset}, {voffset}, {hsize}x{vsize}) exceeds picture {total_h}x{total_v}"
            )));
        }

        if hoffset < 0 {
            hoffset += total_h;
        }
        if voffset < 0 {
            voffset += total_v;
        }
        if hoffset < 0 || voffset < 0 {
            return Err(Error::invalid_parameter(format!(
                "offset ({}, {}) reaches before the picture start",
                self.hoffset, self.voffset
            )));
        }

        if hsize == TO_END {
            hsize = total_h - hoffset;
        }
        if vsize == TO_END {
            vsize = total_v - voffset;
        }
        if hsize < 0 || vsize < 0 {
            return Err(Error::invalid_parameter(format!(
                "negative size {hsize}x{vsize}"
            )));
        }
        if hoffset + hsize > total_h || voffset + vsize > total_v {
            return Err(Error::invalid_parameter(format!(
                "region ({hoffset}, {voffset}, {hsize}x{vsize}) exceeds picture {total_h}x{total_v}"
            )));
        }

        let macropixel = i64::from(size.macropixel.max(1));
        if hoffset % macropixel != 0 {
            return Err(Error::alignment("hoffset", hoffset, macropixel as usize));
        }
        if hsize % macropixel != 0 {
            return Err(Error::alignment("hsize", hsize, macropixel as usize));
        }

        // Every value is now in 0..=total, which came from a usize.
        Ok(Region::new(
            hoffset as usize,
            voffset as usize,
            hsize as usize,
            vsize as usize,
        ))
    }
}

impl Default for RawRegion {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<Region> for RawRegion {
    fn from(region: Region) -> Self {
        // Region values are bounded by a picture size, far below i64::MAX.
        Self::new(
            region.hoffset as i64,
            region.voffset as i64,
            region.hsize as i64,
            region.vsize as i64,
        )
    }
}

/// Absolute region in picture pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    /// Left edge (inclusive).
    pub hoffset: usize,
    /// Top edge (inclusive).
    pub voffset: usize,
    /// Width in pixels.
    pub hsize: usize,
    /// Height in lines.
    pub vsize: usize,
}

impl Region {
    /// Creates a region.
    #[inline]
    pub const fn new(hoffset: usize, voffset: usize, hsize: usize, vsize: usize) -> Self {
        Self {
            hoffset,
            voffset,
            hsize,
            vsize,
        }
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> usize {
        self.hoffset + self.hsize
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> usize {
        self.voffset + self.vsize
    }

    /// Returns `true` if the region covers no pixel.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.hsize == 0 || self.vsize == 0
    }

    /// Returns `true` if the region lies inside a picture of `size`.
    #[inline]
    pub const fn fits(&self, size: &PictureSize) -> bool {
        self.hoffset <= size.hsize
            && self.voffset <= size.vsize
            && self.hsize <= size.hsize - self.hoffset
            && self.vsize <= size.vsize - self.voffset
    }

    /// Checks the region against a plane's subsampling grid.
    pub fn check_plane(&self, hsub: u8, vsub: u8) -> Result<()> {
        let hsub = usize::from(hsub.max(1));
        let vsub = usize::from(vsub.max(1));
        if self.hoffset % hsub != 0 {
            return Err(Error::alignment("hoffset", self.hoffset as i64, hsub));
        }
        if self.hsize % hsub != 0 {
            return Err(Error::alignment("hsize", self.hsize as i64, hsub));
        }
        if self.voffset % vsub != 0 {
            return Err(Error::alignment("voffset", self.voffset as i64, vsub));
        }
        if self.vsize % vsub != 0 {
            return Err(Error::alignment("vsize", self.vsize as i64, vsub));
        }
        Ok(())
    }
}

/// Normalizes a raw region of plane `chroma` of `buffer`.
///
/// Returns absolute offsets and sizes, aligned on the macropixel and on the
/// plane's subsampling. Fails with [`Error::UnknownPlane`] if `chroma` is not
/// a plane of `buffer`, and with [`Error::FormatMismatch`] if the buffer
/// reports a zero sampling factor.
pub fn normalize_region<B>(buffer: &B, chroma: &str, raw: RawRegion) -> Result<Region>
where
    B: PictureBuffer + ?Sized,
{
    let size = buffer.size()?;
    let region = raw.resolve(size)?;
    let desc = buffer.plane_desc(chroma)?;
    desc.check_factors(chroma, size.macropixel)?;
    region.check_plane(desc.hsub, desc.vsub)?;
    trace!(chroma, ?raw, ?region, "normalized region");
    Ok(region)
}

/// Whether a resize stays inside the original picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeKind {
    /// No growth on any side: only the visible window narrows.
    Shrink,
    /// The canvas extends beyond the original picture on at least one side.
    Grow,
}

/// Normalized crop/grow request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeRequest {
    /// Pixels cropped (positive) or added (negative) on the left.
    pub hskip: i64,
    /// Lines cropped (positive) or added (negative) at the top.
    pub vskip: i64,
    /// Final width.
    pub new_hsize: usize,
    /// Final height.
    pub new_vsize: usize,
    /// Size of the picture before the resize.
    pub size: PictureSize,
}

impl ResizeRequest {
    /// Resolves and validates resize parameters against `size`.
    ///
    /// Rules, in order:
    /// 1. skips may not exceed the picture;
    /// 2. a new size of [`TO_END`] keeps the same right/bottom edge;
    /// 3. the new canvas must at least cover the growth on the skip side;
    /// 4. horizontal skip and new width must be multiples of the macropixel.
    ///
    /// There is no vertical macropixel: per-plane vertical alignment is
    /// checked when planes are mapped.
    pub fn resolve(
        size: PictureSize,
        hskip: i64,
        vskip: i64,
        new_hsize: i64,
        new_vsize: i64,
    ) -> Result<Self> {
        let (total_h, total_v) = size.totals()?;
        if hskip > total_h || vskip > total_v {
            return Err(Error::invalid_parameter(format!(
                "skip ({hskip}, {vskip}) exceeds picture {total_h}x{total_v}"
            )));
        }

        let new_hsize = if new_hsize == TO_END {
            total_h - hskip
        } else {
            new_hsize
        };
        let new_vsize = if new_vsize == TO_END {
            total_v - vskip
        } else {
            new_vsize
        };
        if new_hsize < 0 || new_vsize < 0 {
            return Err(Error::invalid_parameter(format!(
                "negative size {new_hsize}x{new_vsize}"
            )));
        }
        if new_hsize < hskip.saturating_neg() || new_vsize < vskip.saturating_neg() {
            return Err(Error::invalid_parameter(format!(
                "new size {new_hsize}x{new_vsize} does not cover growth ({hskip}, {vskip})"
            )));
        }

        let macropixel = i64::from(size.macropixel.max(1));
        if hskip % macropixel != 0 {
            return Err(Error::alignment("hskip", hskip, macropixel as usize));
        }
        if new_hsize % macropixel != 0 {
            return Err(Error::alignment("new_hsize", new_hsize, macropixel as usize));
        }

        let (Ok(new_hsize), Ok(new_vsize)) = (usize::try_from(new_hsize), usize::try_from(new_vsize))
        else {
            return Err(Error::invalid_parameter("new size overflows usize"));
        };
        Ok(Self {
            hskip,
            vskip,
            new_hsize,
            new_vsize,
            size,
        })
    }

    /// Classifies the request as a pure shrink or a growth.
    pub fn kind(&self) -> ResizeKind {
        let fits = |skip: i64, new: usize, total: usize| {
            skip >= 0 && (skip as u64).saturating_add(new as u64) <= total as u64
        };
        if fits(self.hskip, self.new_hsize, self.size.hsize)
            && fits(self.vskip, self.new_vsize, self.size.vsize)
        {
            ResizeKind::Shrink
        } else {
            ResizeKind::Grow
        }
    }

    /// Region shared by the old and the new picture.
    pub fn overlap(&self) -> Overlap {
        let (dst_h, src_h) = origins(self.hskip);
        let (dst_v, src_v) = origins(self.vskip);
        let hsize = (self.new_hsize - dst_h).min(self.size.hsize - src_h);
        let vsize = (self.new_vsize - dst_v).min(self.size.vsize - src_v);
        Overlap {
            src: Region::new(src_h, src_v, hsize, vsize),
            dst: Region::new(dst_h, dst_v, hsize, vsize),
        }
    }
}

// (destination origin, source origin) for one axis.
fn origins(skip: i64) -> (usize, usize) {
    if skip < 0 {
        (skip.unsigned_abs() as usize, 0)
    } else {
        (0, skip as usize)
    }
}

/// Matching rectangles in the source and destination of a resize.
///
/// Both have the same dimensions; the destination is offset by the growth,
/// the source by the crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap {
    /// Region of the original picture that survives.
    pub src: Region,
    /// Where it lands in the resized picture.
    pub dst: Region,
}

/// Normalizes resize parameters against `buffer`.
pub fn normalize_resize<B>(
    buffer: &B,
    hskip: i64,
    vskip: i64,
    new_hsize: i64,
    new_vsize: i64,
) -> Result<ResizeRequest>
where
    B: PictureBuffer + ?Sized,
{
    let size = buffer.size()?;
    let request = ResizeRequest::resolve(size, hskip, vskip, new_hsize, new_vsize)?;
    trace!(?request, "normalized resize");
    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const SIZE: PictureSize = PictureSize::new(16, 16, 1);

    fn kind_of(raw: RawRegion, size: PictureSize) -> ErrorKind {
        raw.resolve(size).unwrap_err().kind()
    }

    #[test]
    fn test_full_region() {
        assert_eq!(RawRegion::FULL.resolve(SIZE).unwrap(), Region::new(0, 0, 16, 16));
    }

    #[test]
    fn test_negative_offsets() {
        let region = RawRegion::new(-4, -2, -1, -1).resolve(SIZE).unwrap();
        assert_eq!(region, Region::new(12, 14, 4, 2));
        let region = RawRegion::new(-8, 0, 4, 1).resolve(SIZE).unwrap();
        assert_eq!(region, Region::new(8, 0, 4, 1));
    }

    #[test]
    fn test_offset_at_end() {
        let region = RawRegion::new(16, 16, -1, -1).resolve(SIZE).unwrap();
        assert!(region.is_empty());
        assert_eq!(region.hoffset, 16);
    }

    #[test]
    fn test_out_of_bounds() {
        assert_eq!(kind_of(RawRegion::new(17, 0, 0, 0), SIZE), ErrorKind::InvalidParameter);
        assert_eq!(kind_of(RawRegion::new(8, 0, 9, 1), SIZE), ErrorKind::InvalidParameter);
        assert_eq!(kind_of(RawRegion::new(0, 10, 1, 7), SIZE), ErrorKind::InvalidParameter);
        assert_eq!(kind_of(RawRegion::new(-17, 0, 1, 1), SIZE), ErrorKind::InvalidParameter);
        assert_eq!(kind_of(RawRegion::new(-4, 0, 8, 1), SIZE), ErrorKind::InvalidParameter);
        assert_eq!(kind_of(RawRegion::new(0, 0, -2, 1), SIZE), ErrorKind::InvalidParameter);
        assert_eq!(
            kind_of(RawRegion::new(i64::MAX, 0, i64::MAX, 1), SIZE),
            ErrorKind::InvalidParameter
        );
    }

    #[test]
    fn test_macropixel_alignment() {
        let uyvy = PictureSize::new(16, 4, 2);
        assert_eq!(kind_of(RawRegion::new(1, 0, 2, 1), uyvy), ErrorKind::Alignment);
        assert_eq!(kind_of(RawRegion::new(2, 0, 3, 1), uyvy), ErrorKind::Alignment);
        assert!(RawRegion::new(2, 0, 4, 1).resolve(uyvy).is_ok());
        assert!(RawRegion::new(-2, 0, -1, 1).resolve(uyvy).is_ok());
    }

    #[test]
    fn test_plane_alignment() {
        let region = Region::new(4, 4, 8, 8);
        assert!(region.check_plane(2, 2).is_ok());
        assert!(Region::new(1, 0, 2, 2).check_plane(2, 2).is_err());
        assert!(Region::new(0, 0, 2, 3).check_plane(2, 2).is_err());
        assert!(Region::new(0, 0, 2, 3).check_plane(2, 1).is_ok());
    }

    #[test]
    fn test_region_fits() {
        assert!(Region::new(16, 0, 0, 16).fits(&SIZE));
        assert!(!Region::new(8, 0, 9, 1).fits(&SIZE));
    }

    #[test]
    fn test_resize_to_end() {
        let req = ResizeRequest::resolve(SIZE, 4, 2, -1, -1).unwrap();
        assert_eq!((req.new_hsize, req.new_vsize), (12, 14));
        let req = ResizeRequest::resolve(SIZE, -4, -2, -1, -1).unwrap();
        assert_eq!((req.new_hsize, req.new_vsize), (20, 18));
        assert_eq!(req.kind(), ResizeKind::Grow);
    }

    #[test]
    fn test_resize_rejects() {
        let err = |h, v, nh, nv| ResizeRequest::resolve(SIZE, h, v, nh, nv).unwrap_err().kind();
        assert_eq!(err(17, 0, -1, -1), ErrorKind::InvalidParameter);
        assert_eq!(err(0, 17, -1, -1), ErrorKind::InvalidParameter);
        assert_eq!(err(-4, 0, 2, -1), ErrorKind::InvalidParameter);
        assert_eq!(err(0, 0, -3, 4), ErrorKind::InvalidParameter);
        assert_eq!(err(i64::MIN, 0, 4, 4), ErrorKind::InvalidParameter);

        let uyvy = PictureSize::new(16, 4, 2);
        let err = |h, nh| ResizeRequest::resolve(uyvy, h, 0, nh, -1).unwrap_err().kind();
        assert_eq!(err(1, -1), ErrorKind::Alignment);
        assert_eq!(err(-3, 8), ErrorKind::Alignment);
        assert_eq!(err(2, 7), ErrorKind::Alignment);
    }

    #[test]
    fn test_resize_kind() {
        let shrink = ResizeRequest::resolve(SIZE, 2, 0, 14, -1).unwrap();
        assert_eq!(shrink.kind(), ResizeKind::Shrink);
        let identity = ResizeRequest::resolve(SIZE, 0, 0, -1, -1).unwrap();
        assert_eq!(identity.kind(), ResizeKind::Shrink);
        // Right edge grows even though nothing is added on the left.
        let append = ResizeRequest::resolve(SIZE, 2, 0, 16, -1).unwrap();
        assert_eq!(append.kind(), ResizeKind::Grow);
    }

    #[test]
    fn test_overlap_crop() {
        let req = ResizeRequest::resolve(SIZE, 4, 4, 8, 8).unwrap();
        let overlap = req.overlap();
        assert_eq!(overlap.src, Region::new(4, 4, 8, 8));
        assert_eq!(overlap.dst, Region::new(0, 0, 8, 8));
    }

    #[test]
    fn test_overlap_grow() {
        let req = ResizeRequest::resolve(SIZE, -2, -4, 20, 24).unwrap();
        let overlap = req.overlap();
        assert_eq!(overlap.src, Region::new(0, 0, 16, 16));
        assert_eq!(overlap.dst, Region::new(2, 4, 16, 16));

        // Growth on the left with a narrower canvas clips the right side.
        let req = ResizeRequest::resolve(SIZE, -4, 0, 8, -1).unwrap();
        assert_eq!(req.overlap().src, Region::new(0, 0, 4, 16));
        assert_eq!(req.overlap().dst, Region::new(4, 0, 4, 16));
    }

    #[test]
    fn test_overlap_empty() {
        let req = ResizeRequest::resolve(SIZE, 16, 0, 0, -1).unwrap();
        assert!(req.overlap().src.is_empty());
        let req = ResizeRequest::resolve(SIZE, -8, 0, 8, -1).unwrap();
        assert!(req.overlap().dst.is_empty());
        assert_eq!(req.overlap().dst.hoffset, 8);
    }
}
