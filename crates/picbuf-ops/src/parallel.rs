//! Row kernels split across the rayon thread pool.
//!
//! Each task owns a disjoint line of the destination mapping, so the
//! single-writer contract of the buffer still holds.

use picbuf_core::{PlaneView, PlaneViewMut};
use rayon::prelude::*;

use crate::rows::{fill_row, PARALLEL_THRESHOLD};

// Large enough to pay for the fork, and lines that can be chunked by stride.
pub(crate) fn worth_it(rows: usize, row_bytes: usize, strides: &[usize]) -> bool {
    rows > 1
        && rows.saturating_mul(row_bytes) >= PARALLEL_THRESHOLD
        && strides.iter().all(|&stride| stride >= row_bytes && stride > 0)
}

pub(crate) fn copy_rows(src: &PlaneView<'_>, dst: &mut PlaneViewMut<'_>) {
    let row_bytes = src.row_bytes();
    let src_stride = src.stride();
    let dst_stride = dst.stride();
    dst.as_mut_slice()
        .par_chunks_mut(dst_stride)
        .zip(src.as_slice().par_chunks(src_stride))
        .for_each(|(out, line)| out[..row_bytes].copy_from_slice(&line[..row_bytes]));
}

pub(crate) fn fill_rows(dst: &mut PlaneViewMut<'_>, pattern: &[u8]) {
    let row_bytes = dst.row_bytes();
    let stride = dst.stride();
    dst.as_mut_slice()
        .par_chunks_mut(stride)
        .for_each(|line| fill_row(&mut line[..row_bytes], pattern));
}
