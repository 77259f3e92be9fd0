//! In-place crop and growth.
//!
//! A resize that stays inside the original picture only narrows the visible
//! window and is always delegated to the manager, shared or not. A resize
//! that extends the canvas needs an exclusive buffer, and a manager with
//! room around the picture. When in-place growth is impossible,
//! [`resize_or_replace`] falls back to a full copy.

use picbuf_core::{
    normalize_resize, Error, PictureBuffer, PictureManager, ResizeKind, Result,
};
use tracing::debug;

use crate::copy::replace;

/// How [`resize_or_replace`] satisfied a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizePath {
    /// The manager moved the window of the existing storage.
    InPlace,
    /// A new buffer was allocated and the overlap copied into it.
    Copied,
}

/// Crops or grows `buffer` without copying.
///
/// `hskip`/`vskip` crop when positive and add pixels when negative;
/// `new_hsize`/`new_vsize` may be [`TO_END`](picbuf_core::TO_END) to keep
/// the right or bottom edge. On failure the buffer is unchanged.
///
/// # Errors
///
/// - parameter errors from [`normalize_resize`]
/// - [`Error::NotExclusive`] when growing a shared buffer
/// - whatever the manager answers, typically [`Error::Unsupported`]
///
/// # Example
///
/// ```rust
/// use picbuf_core::prelude::*;
/// use picbuf_mem::MemManager;
/// use picbuf_ops::resize;
///
/// let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
/// let mut picture = manager.alloc(16, 16).unwrap();
/// resize(&mut picture, 4, 4, 8, 8).unwrap();
/// assert_eq!(picture.size().unwrap().hsize, 8);
/// ```
pub fn resize<B>(
    buffer: &mut B,
    hskip: i64,
    vskip: i64,
    new_hsize: i64,
    new_vsize: i64,
) -> Result<()>
where
    B: PictureBuffer,
{
    let request = normalize_resize(buffer, hskip, vskip, new_hsize, new_vsize)?;
    let kind = request.kind();
    if kind == ResizeKind::Grow && !buffer.is_exclusive() {
        let refs = buffer.ref_count();
        debug!(refs, ?request, "refusing to grow a shared buffer");
        return Err(Error::NotExclusive { refs });
    }

    debug!(?kind, ?request, "resizing in place");
    buffer.try_resize(&request)
}

/// Resizes in place when possible, otherwise replaces `buffer` by a copy.
///
/// Malformed requests fail immediately: a copy would refuse them too.
pub fn resize_or_replace<M>(
    manager: &M,
    buffer: &mut M::Buffer,
    hskip: i64,
    vskip: i64,
    new_hsize: i64,
    new_vsize: i64,
) -> Result<ResizePath>
where
    M: PictureManager,
{
    match resize(buffer, hskip, vskip, new_hsize, new_vsize) {
        Ok(()) => Ok(ResizePath::InPlace),
        Err(e) if e.is_parameter_error() => Err(e),
        Err(e) => {
            debug!(error = %e, "in-place resize failed, copying");
            replace(manager, buffer, hskip, vskip, new_hsize, new_vsize)?;
            Ok(ResizePath::Copied)
        }
    }
}
