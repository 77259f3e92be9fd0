//! Plane descriptors and mapped plane views.
//!
//! A plane is one independently strided memory region of a picture. Mapping
//! a region of a plane yields a [`PlaneView`] (read-only) or a
//! [`PlaneViewMut`] (exclusive write access). Both borrow the buffer they
//! come from, so a view cannot outlive a resize of that buffer.
//!
//! # Memory Layout
//!
//! ```text
//! data[0]                                 row_bytes
//!   │◄──────────────── stride ─────────────►│
//!   ├──────────────────────┬────────────────┤
//!   │ row 0 (row_bytes)    │ rest of line   │
//!   ├──────────────────────┼────────────────┤
//!   │ row 1                │                │
//!   ├──────────────────────┘
//!   │ last row ends right after row_bytes
//! ```
//!
//! The view's slice starts at the first byte of the mapped region and ends
//! at the last byte of its last row, so it is exactly
//! `(rows - 1) * stride + row_bytes` long.

use crate::geometry::Region;
use crate::{Error, Result};

/// Geometry of one plane of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PlaneDesc {
    /// Bytes between the start of consecutive lines.
    pub stride: usize,
    /// Horizontal subsampling.
    pub hsub: u8,
    /// Vertical subsampling.
    pub vsub: u8,
    /// Bytes per macropixel.
    pub macropixel_size: u8,
}

impl PlaneDesc {
    /// Creates a descriptor.
    #[inline]
    pub const fn new(stride: usize, hsub: u8, vsub: u8, macropixel_size: u8) -> Self {
        Self {
            stride,
            hsub,
            vsub,
            macropixel_size,
        }
    }

    /// Bytes needed for `hsize` picture pixels of this plane.
    ///
    /// `hsize` is in full-picture pixels, before subsampling.
    /// Zero factors count as 1; [`check_factors`](Self::check_factors)
    /// rejects them up front.
    #[inline]
    pub fn row_bytes(&self, hsize: usize, macropixel: u8) -> usize {
        hsize / usize::from(self.hsub.max(1)) / usize::from(macropixel.max(1))
            * usize::from(self.macropixel_size)
    }

    /// Plane lines covering `vsize` picture lines.
    #[inline]
    pub fn rows(&self, vsize: usize) -> usize {
        vsize / usize::from(self.vsub.max(1))
    }

    /// Fails with [`Error::FormatMismatch`] if a sampling factor of plane
    /// `chroma`, or the buffer's `macropixel`, is zero.
    pub fn check_factors(&self, chroma: &str, macropixel: u8) -> Result<()> {
        if macropixel == 0 || self.hsub == 0 || self.vsub == 0 || self.macropixel_size == 0 {
            return Err(Error::format_mismatch(format!(
                "plane {chroma} has a zero sampling factor: {self:?}, macropixel {macropixel}"
            )));
        }
        Ok(())
    }

    /// Byte offset of the picture pixel `(hoffset, voffset)` in this plane.
    #[inline]
    pub fn byte_offset(&self, hoffset: usize, voffset: usize, macropixel: u8) -> usize {
        self.rows(voffset) * self.stride + self.row_bytes(hoffset, macropixel)
    }

    /// Returns `true` if this plane has the same sampling as `other`.
    ///
    /// Strides are allowed to differ.
    #[inline]
    pub fn same_sampling(&self, other: &PlaneDesc) -> bool {
        self.hsub == other.hsub
            && self.vsub == other.vsub
            && self.macropixel_size == other.macropixel_size
    }

    /// Locates `region` (picture pixels) inside this plane.
    pub fn span(&self, region: &Region, macropixel: u8) -> PlaneSpan {
        PlaneSpan {
            offset: self.byte_offset(region.hoffset, region.voffset, macropixel),
            row_bytes: self.row_bytes(region.hsize, macropixel),
            rows: self.rows(region.vsize),
            stride: self.stride,
        }
    }
}

/// Byte-level position of a mapped region inside a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaneSpan {
    /// Offset of the first byte from the start of the plane.
    pub offset: usize,
    /// Meaningful bytes per row.
    pub row_bytes: usize,
    /// Number of rows.
    pub rows: usize,
    /// Bytes between rows.
    pub stride: usize,
}

impl PlaneSpan {
    /// Length of the slice covering the span.
    #[inline]
    pub fn len(&self) -> usize {
        required_len(self.stride, self.row_bytes, self.rows)
    }

    /// Returns `true` if the span covers no byte.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte range of the span, if it does not overflow.
    pub fn range(&self) -> Option<std::ops::Range<usize>> {
        let end = self.offset.checked_add(self.len())?;
        Some(self.offset..end)
    }
}

fn required_len(stride: usize, row_bytes: usize, rows: usize) -> usize {
    if rows == 0 || row_bytes == 0 {
        0
    } else {
        (rows - 1).saturating_mul(stride).saturating_add(row_bytes)
    }
}

// Returns the length the view keeps.
fn check_len(len: usize, stride: usize, row_bytes: usize, rows: usize) -> Result<usize> {
    if rows > 1 && stride < row_bytes {
        return Err(Error::invalid_parameter(format!(
            "stride {stride} shorter than row of {row_bytes} bytes"
        )));
    }
    let needed = required_len(stride, row_bytes, rows);
    if len < needed {
        return Err(Error::invalid_parameter(format!(
            "mapped slice of {len} bytes, {rows} rows of {row_bytes} bytes need {needed}"
        )));
    }
    Ok(needed)
}

/// Read-only mapping of a plane region.
#[derive(Debug)]
pub struct PlaneView<'a> {
    data: &'a [u8],
    stride: usize,
    row_bytes: usize,
    rows: usize,
}

impl<'a> PlaneView<'a> {
    /// Creates a view, checking that `data` covers every row.
    pub fn new(data: &'a [u8], stride: usize, row_bytes: usize, rows: usize) -> Result<Self> {
        let len = check_len(data.len(), stride, row_bytes, rows)?;
        Ok(Self {
            data: &data[..len],
            stride,
            row_bytes,
            rows,
        })
    }

    /// Bytes between rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Meaningful bytes per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns row `y`, `row_bytes` long.
    ///
    /// # Panics
    ///
    /// Panics if `y >= rows`.
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        assert!(y < self.rows, "row {y} out of {}", self.rows);
        let data: &'a [u8] = self.data;
        let start = y * self.stride;
        &data[start..start + self.row_bytes]
    }

    /// Iterates over the rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.rows).map(move |y| self.row(y))
    }

    /// Raw mapped bytes, including inter-row padding.
    #[inline]
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }
}

/// Writable mapping of a plane region.
#[derive(Debug)]
pub struct PlaneViewMut<'a> {
    data: &'a mut [u8],
    stride: usize,
    row_bytes: usize,
    rows: usize,
}

impl<'a> PlaneViewMut<'a> {
    /// Creates a view, checking that `data` covers every row.
    pub fn new(data: &'a mut [u8], stride: usize, row_bytes: usize, rows: usize) -> Result<Self> {
        let len = check_len(data.len(), stride, row_bytes, rows)?;
        Ok(Self {
            data: &mut data[..len],
            stride,
            row_bytes,
            rows,
        })
    }

    /// Bytes between rows.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Meaningful bytes per row.
    #[inline]
    pub fn row_bytes(&self) -> usize {
        self.row_bytes
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns row `y` for reading.
    ///
    /// # Panics
    ///
    /// Panics if `y >= rows`.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.rows, "row {y} out of {}", self.rows);
        let start = y * self.stride;
        &self.data[start..start + self.row_bytes]
    }

    /// Returns row `y` for writing.
    ///
    /// # Panics
    ///
    /// Panics if `y >= rows`.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.rows, "row {y} out of {}", self.rows);
        let start = y * self.stride;
        &mut self.data[start..start + self.row_bytes]
    }

    /// Raw mapped bytes, including inter-row padding.
    ///
    /// Bytes between `row_bytes` and `stride` belong to pixels outside the
    /// mapped region and must not be written.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut *self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desc_arithmetic() {
        let chroma = PlaneDesc::new(8, 2, 2, 1);
        assert_eq!(chroma.row_bytes(16, 1), 8);
        assert_eq!(chroma.rows(16), 8);
        assert_eq!(chroma.byte_offset(4, 4, 1), 2 * 8 + 2);

        let uyvy = PlaneDesc::new(64, 1, 1, 4);
        assert_eq!(uyvy.row_bytes(16, 2), 32);
        assert_eq!(uyvy.byte_offset(2, 1, 2), 64 + 4);
    }

    #[test]
    fn test_span() {
        let luma = PlaneDesc::new(16, 1, 1, 1);
        let span = luma.span(&Region::new(4, 4, 8, 8), 1);
        assert_eq!(span.offset, 68);
        assert_eq!(span.len(), 7 * 16 + 8);
        assert_eq!(span.range(), Some(68..68 + 120));

        let empty = luma.span(&Region::new(16, 0, 0, 16), 1);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_zero_factors() {
        let broken = PlaneDesc::new(16, 0, 0, 1);
        assert_eq!(broken.row_bytes(16, 0), 16);
        assert_eq!(broken.rows(4), 4);
        let err = broken.check_factors("y8", 1).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::FormatMismatch);

        let luma = PlaneDesc::new(16, 1, 1, 1);
        assert!(luma.check_factors("y8", 1).is_ok());
        assert!(luma.check_factors("y8", 0).is_err());
    }

    #[test]
    fn test_view_rows() {
        let data: Vec<u8> = (0..20).collect();
        let view = PlaneView::new(&data, 8, 4, 3).unwrap();
        assert_eq!(view.row(0), &[0, 1, 2, 3]);
        assert_eq!(view.row(2), &[16, 17, 18, 19]);
        assert_eq!(view.iter_rows().count(), 3);
    }

    #[test]
    fn test_view_too_short() {
        let data = [0u8; 19];
        assert!(PlaneView::new(&data, 8, 4, 3).is_err());
        let mut data = [0u8; 4];
        assert!(PlaneViewMut::new(&mut data, 2, 4, 2).is_err());
    }

    #[test]
    fn test_view_mut_row() {
        let mut data = [0u8; 12];
        {
            let mut view = PlaneViewMut::new(&mut data, 6, 2, 2).unwrap();
            view.row_mut(1).copy_from_slice(&[7, 8]);
            assert_eq!(view.row(1), &[7, 8]);
        }
        assert_eq!(&data[6..8], &[7, 8]);
        assert_eq!(data[8], 0);
    }
}
