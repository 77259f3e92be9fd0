//! Row kernels shared by copy, clear and packed I/O.
//!
//! Views hold `rows` lines of `row_bytes` meaningful bytes spaced by their
//! own stride. Kernels only touch the meaningful bytes, never the padding.

use picbuf_core::{Error, PlaneView, PlaneViewMut, Result};

/// Planes smaller than this many bytes are processed on the calling thread.
#[cfg(feature = "parallel")]
pub const PARALLEL_THRESHOLD: usize = 64 * 1024;

/// Copies every row of `src` into `dst`.
///
/// Both views must have the same row count and row width; strides may
/// differ.
pub fn copy_rows(src: &PlaneView<'_>, dst: &mut PlaneViewMut<'_>) -> Result<()> {
    if src.rows() != dst.rows() || src.row_bytes() != dst.row_bytes() {
        return Err(Error::invalid_parameter(format!(
            "row copy {}x{} into {}x{}",
            src.row_bytes(),
            src.rows(),
            dst.row_bytes(),
            dst.rows()
        )));
    }

    #[cfg(feature = "parallel")]
    if crate::parallel::worth_it(src.rows(), src.row_bytes(), &[src.stride(), dst.stride()]) {
        crate::parallel::copy_rows(src, dst);
        return Ok(());
    }

    for y in 0..src.rows() {
        dst.row_mut(y).copy_from_slice(src.row(y));
    }
    Ok(())
}

/// Fills every row of `dst` by repeating `pattern`.
///
/// The row width must be a multiple of the pattern length.
pub fn fill_rows(dst: &mut PlaneViewMut<'_>, pattern: &[u8]) -> Result<()> {
    check_pattern(dst.row_bytes(), pattern)?;

    #[cfg(feature = "parallel")]
    if crate::parallel::worth_it(dst.rows(), dst.row_bytes(), &[dst.stride()]) {
        crate::parallel::fill_rows(dst, pattern);
        return Ok(());
    }

    for y in 0..dst.rows() {
        fill_row(dst.row_mut(y), pattern);
    }
    Ok(())
}

pub(crate) fn check_pattern(row_bytes: usize, pattern: &[u8]) -> Result<()> {
    if pattern.is_empty() || row_bytes % pattern.len() != 0 {
        return Err(Error::unsupported(format!(
            "fill pattern of {} bytes does not tile rows of {row_bytes} bytes",
            pattern.len()
        )));
    }
    Ok(())
}

#[inline]
pub(crate) fn fill_row(row: &mut [u8], pattern: &[u8]) {
    match pattern {
        [byte] => row.fill(*byte),
        _ => {
            for chunk in row.chunks_exact_mut(pattern.len()) {
                chunk.copy_from_slice(pattern);
            }
        }
    }
}
