//! Region blanking with neutral values.
//!
//! Each plane is filled with the neutral pattern derived from its chroma
//! name (see [`picbuf_core::chroma`]): zero for luma, alpha and primaries,
//! mid-range for colour difference components. Blanking a 4:2:0 picture
//! therefore yields black.

use picbuf_core::chroma::neutral_fill;
use picbuf_core::{normalize_region, PictureBuffer, PictureExt, RawRegion, Result};
use tracing::{trace, warn};

use crate::rows::fill_rows;

/// Fills a region of plane `chroma` with its neutral value.
///
/// The region is given in picture pixels and follows the sentinel rules of
/// [`RawRegion`]; it must be aligned on the plane's subsampling.
///
/// # Errors
///
/// Parameter errors, [`Error::UnknownPlane`](picbuf_core::Error::UnknownPlane),
/// [`Error::Unsupported`](picbuf_core::Error::Unsupported) for chroma names
/// without a known neutral value, and
/// [`Error::NotExclusive`](picbuf_core::Error::NotExclusive) on shared
/// buffers.
pub fn clear_plane<B>(
    buffer: &mut B,
    chroma: &str,
    hoffset: i64,
    voffset: i64,
    hsize: i64,
    vsize: i64,
) -> Result<()>
where
    B: PictureBuffer + ?Sized,
{
    let region = normalize_region(buffer, chroma, RawRegion::new(hoffset, voffset, hsize, vsize))?;
    let desc = buffer.plane_desc(chroma)?;
    let pattern = neutral_fill(chroma, usize::from(desc.macropixel_size))?;

    let filled = {
        let mut view = buffer.map_write(chroma, region)?;
        fill_rows(&mut view, &pattern)
    };
    let released = buffer.unmap(chroma, region);
    trace!(chroma, ?region, ?pattern, "cleared plane");
    filled.and(released)
}

/// Fills the same picture region of every plane with neutral values.
///
/// Stops at the first plane that fails. Planes cleared before it stay
/// cleared.
///
/// # Example
///
/// ```rust
/// use picbuf_core::prelude::*;
/// use picbuf_mem::MemManager;
/// use picbuf_ops::clear;
///
/// let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
/// let mut picture = manager.alloc(16, 16).unwrap();
/// clear(&mut picture, 0, 0, TO_END, TO_END).unwrap();
///
/// let u = picture.plane_read("u8", RawRegion::FULL).unwrap();
/// assert!(u.row(0).iter().all(|&b| b == 0x80));
/// ```
pub fn clear<B>(buffer: &mut B, hoffset: i64, voffset: i64, hsize: i64, vsize: i64) -> Result<()>
where
    B: PictureBuffer + ?Sized,
{
    for (cleared, chroma) in buffer.chromas().iter().enumerate() {
        if let Err(e) = clear_plane(buffer, chroma, hoffset, voffset, hsize, vsize) {
            if cleared > 0 {
                warn!(chroma, cleared, error = %e, "clear aborted after some planes");
            }
            return Err(e);
        }
    }
    Ok(())
}
