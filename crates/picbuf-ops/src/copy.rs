//! Copy-based crop and growth.
//!
//! [`copy`] allocates a new picture from a manager and copies, plane by
//! plane, the part of the source that overlaps it. Added areas keep the
//! manager's initial content. The source is only read, so it may be shared.

use picbuf_core::{
    normalize_resize, Error, Overlap, PictureBuffer, PictureExt, PictureManager, RawRegion,
    Result,
};
use tracing::{debug, trace};

use crate::rows::copy_rows;

/// Copies a crop or extension of `buffer` into a new picture.
///
/// Parameters follow [`resize`](fn@crate::resize). The new picture is
/// `new_hsize` x `new_vsize` and must come from a manager with the same
/// macropixel and the same planes; strides may differ.
///
/// # Errors
///
/// - parameter errors from [`normalize_resize`]
/// - [`Error::AllocationFailed`] when the manager refuses the new picture
/// - [`Error::FormatMismatch`] on macropixel or plane differences
/// - [`Error::MappingFailed`] when a plane cannot be mapped or released
///
/// # Example
///
/// ```rust
/// use picbuf_core::prelude::*;
/// use picbuf_mem::MemManager;
/// use picbuf_ops::copy;
///
/// let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
/// let picture = manager.alloc(16, 16).unwrap();
/// let cropped = copy(&manager, &picture, 4, 4, 8, 8).unwrap();
/// assert_eq!(cropped.size().unwrap().hsize, 8);
/// ```
pub fn copy<M, B>(
    manager: &M,
    buffer: &B,
    hskip: i64,
    vskip: i64,
    new_hsize: i64,
    new_vsize: i64,
) -> Result<M::Buffer>
where
    M: PictureManager,
    B: PictureBuffer + ?Sized,
{
    let request = normalize_resize(buffer, hskip, vskip, new_hsize, new_vsize)?;
    let (hsize, vsize) = (request.new_hsize, request.new_vsize);
    let mut target = manager.alloc(hsize, vsize).map_err(|e| match e {
        Error::AllocationFailed { .. } => e,
        other => Error::allocation_failed(hsize, vsize, other.to_string()),
    })?;

    let macropixel = target.size()?.macropixel;
    if macropixel != request.size.macropixel {
        return Err(Error::format_mismatch(format!(
            "macropixel {} copied into macropixel {macropixel}",
            request.size.macropixel
        )));
    }

    let overlap = request.overlap();
    for chroma in buffer.planes() {
        let src = buffer.plane_desc(chroma)?;
        let dst = target.plane_desc(chroma).map_err(|_| {
            Error::format_mismatch(format!("plane {chroma} missing from the new picture"))
        })?;
        src.check_factors(chroma, macropixel)?;
        if !src.same_sampling(&dst) {
            return Err(Error::format_mismatch(format!(
                "plane {chroma} sampled {src:?} copied into {dst:?}"
            )));
        }
        copy_plane(buffer, &mut target, chroma, &overlap)?;
    }

    debug!(?request, "copied picture");
    Ok(target)
}

/// Replaces `buffer` by a copy cropped or extended as in [`copy`].
///
/// The old handle is dropped on success only; on failure `buffer` is left
/// untouched.
pub fn replace<M>(
    manager: &M,
    buffer: &mut M::Buffer,
    hskip: i64,
    vskip: i64,
    new_hsize: i64,
    new_vsize: i64,
) -> Result<()>
where
    M: PictureManager,
{
    *buffer = copy(manager, buffer, hskip, vskip, new_hsize, new_vsize)?;
    Ok(())
}

// Maps both sides, copies the rows, and releases whatever was mapped.
fn copy_plane<S, D>(src: &S, dst: &mut D, chroma: &str, overlap: &Overlap) -> Result<()>
where
    S: PictureBuffer + ?Sized,
    D: PictureBuffer,
{
    let fail = |e: Error| Error::mapping_failed(chroma, e);
    let from = RawRegion::from(overlap.src);
    let to = RawRegion::from(overlap.dst);

    let input = src.plane_read(chroma, from).map_err(fail)?;
    let copied = match dst.plane_write(chroma, to) {
        Ok(mut output) => {
            let copied = copy_rows(&input, &mut output);
            drop(output);
            copied.and(dst.plane_unmap(chroma, to))
        }
        Err(e) => Err(e),
    };
    trace!(chroma, rows = input.rows(), row_bytes = input.row_bytes(), "copied plane");
    drop(input);

    let released = src.plane_unmap(chroma, from);
    copied.and(released).map_err(fail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use picbuf_core::{ErrorKind, PictureFormat, PictureSize, TO_END};
    use picbuf_mem::{MemManager, MemPicture};

    fn numbered(manager: &MemManager, hsize: usize, vsize: usize) -> MemPicture {
        let mut picture = manager.alloc(hsize, vsize).unwrap();
        for chroma in picture.chromas() {
            {
                let mut view = picture.plane_write(&chroma, RawRegion::FULL).unwrap();
                for y in 0..view.rows() {
                    for (x, byte) in view.row_mut(y).iter_mut().enumerate() {
                        *byte = (y * 16 + x) as u8;
                    }
                }
            }
            picture.plane_unmap(&chroma, RawRegion::FULL).unwrap();
        }
        picture
    }

    #[test]
    fn test_crop() {
        let manager = MemManager::new(PictureFormat::gray8()).unwrap();
        let picture = numbered(&manager, 8, 8);
        let cropped = copy(&manager, &picture, 2, 3, 4, 2).unwrap();

        let view = cropped.plane_read("y8", RawRegion::FULL).unwrap();
        assert_eq!(view.row(0), &[3 * 16 + 2, 3 * 16 + 3, 3 * 16 + 4, 3 * 16 + 5]);
        assert_eq!(view.row(1)[0], 4 * 16 + 2);
    }

    #[test]
    fn test_grow_keeps_initial_content() {
        let manager = MemManager::new(PictureFormat::gray8()).unwrap();
        let picture = numbered(&manager, 4, 4);
        let grown = copy(&manager, &picture, -2, -1, 8, 6).unwrap();
        assert_eq!(grown.size().unwrap(), PictureSize::new(8, 6, 1));

        let view = grown.plane_read("y8", RawRegion::FULL).unwrap();
        assert!(view.row(0).iter().all(|&b| b == 0));
        assert_eq!(view.row(1), &[0, 0, 0, 1, 2, 3, 0, 0]);
        assert!(view.row(5).iter().all(|&b| b == 0));
    }

    #[test]
    fn test_shared_source() {
        let manager = MemManager::new(PictureFormat::gray8()).unwrap();
        let picture = numbered(&manager, 4, 4);
        let _other = picture.clone();
        let copied = copy(&manager, &picture, 0, 0, TO_END, TO_END).unwrap();
        assert!(copied.is_exclusive());
        assert_eq!(picture.ref_count(), 2);
    }

    #[test]
    fn test_allocation_refused() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let picture = manager.alloc(16, 16).unwrap();
        let err = copy(&manager, &picture, 0, 0, 7, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailure);
    }

    #[test]
    fn test_macropixel_mismatch() {
        let source = MemManager::new(PictureFormat::uyvy422()).unwrap();
        let target = MemManager::new(PictureFormat::gray8()).unwrap();
        let picture = source.alloc(8, 2).unwrap();
        let err = copy(&target, &picture, 0, 0, TO_END, TO_END).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    }

    #[test]
    fn test_plane_mismatch() {
        let source = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let target = MemManager::new(PictureFormat::nv12()).unwrap();
        let picture = source.alloc(8, 8).unwrap();
        let err = copy(&target, &picture, 0, 0, TO_END, TO_END).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);

        let target = MemManager::new(PictureFormat::yuv444p()).unwrap();
        let err = copy(&target, &picture, 0, 0, TO_END, TO_END).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FormatMismatch);
    }

    #[test]
    fn test_mapping_failure_releases() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let picture = manager.alloc(16, 16).unwrap();
        let err = copy(&manager, &picture, 0, 1, 16, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MappingFailure);
        assert_eq!(picture.mapped(), 0);

        let Error::MappingFailed { chroma, source } = err else {
            panic!("expected a mapping failure");
        };
        assert_eq!(chroma, "u8");
        assert_eq!(source.kind(), ErrorKind::Alignment);
    }

    #[test]
    fn test_replace() {
        let manager = MemManager::new(PictureFormat::gray8()).unwrap();
        let mut picture = numbered(&manager, 4, 4);
        let other = picture.clone();
        replace(&manager, &mut picture, 1, 1, 2, 2).unwrap();

        assert!(!picture.shares_storage_with(&other));
        assert_eq!(other.ref_count(), 1);
        let view = picture.plane_read("y8", RawRegion::FULL).unwrap();
        assert_eq!(view.row(0), &[17, 18]);
    }

    #[test]
    fn test_replace_failure_keeps_buffer() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let mut picture = manager.alloc(16, 16).unwrap();
        assert!(replace(&manager, &mut picture, 0, 0, 7, 8).is_err());
        assert_eq!(picture.size().unwrap().hsize, 16);
    }
}
