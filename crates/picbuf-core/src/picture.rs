//! Buffer manager contract and checked plane access.
//!
//! The raw allocator is an external collaborator: picbuf only needs the
//! primitives below, and never assumes a particular storage layout.
//!
//! - [`PictureManager`] allocates pictures.
//! - [`PictureBuffer`] is one handle to a picture. Cloning a handle (where
//!   the implementation allows it) shares the storage and bumps the
//!   reference count; dropping it releases the reference. Storage goes away
//!   with the last handle.
//!
//! The primitives trust their arguments to be absolute and aligned. Callers
//! go through [`PictureExt`], which runs
//! [`normalize_region`](crate::geometry::normalize_region) first and accepts
//! the signed, sentinel-carrying parameters of [`RawRegion`].
//!
//! # Sharing
//!
//! A handle is *exclusive* when its storage reference count is 1. Mapping a
//! plane for writing requires exclusivity; reading never does. There is no
//! lock: the count observed at call time decides.
//!
//! # Example
//!
//! ```rust,ignore
//! use picbuf_core::{PictureExt, RawRegion};
//!
//! let view = picture.plane_read("y8", RawRegion::new(0, 0, -1, 2))?;
//! for row in view.iter_rows() {
//!     // row is hsize bytes of luma
//! }
//! drop(view);
//! picture.plane_unmap("y8", RawRegion::new(0, 0, -1, 2))?;
//! ```

use crate::geometry::{normalize_region, PictureSize, RawRegion, Region, ResizeRequest};
use crate::plane::{PlaneDesc, PlaneView, PlaneViewMut};
use crate::Result;

/// Allocator of picture buffers.
pub trait PictureManager {
    /// Buffer handle type produced by this manager.
    type Buffer: PictureBuffer;

    /// Allocates a picture of `hsize` x `vsize` pixels.
    ///
    /// Returns [`Error::AllocationFailed`](crate::Error::AllocationFailed)
    /// when the manager refuses.
    fn alloc(&self, hsize: usize, vsize: usize) -> Result<Self::Buffer>;
}

/// Primitive operations of a picture buffer handle.
pub trait PictureBuffer {
    /// Returns the visible width, height and macropixel.
    fn size(&self) -> Result<PictureSize>;

    /// Enumerates chroma names.
    ///
    /// The order is stable for a given buffer and the iteration is finite;
    /// calling it again restarts from the first plane.
    fn planes(&self) -> impl Iterator<Item = &str>;

    /// Returns the descriptor of plane `chroma`.
    ///
    /// Fails with [`Error::UnknownPlane`](crate::Error::UnknownPlane).
    fn plane_desc(&self, chroma: &str) -> Result<PlaneDesc>;

    /// Number of handles sharing this buffer's storage.
    fn ref_count(&self) -> usize;

    /// Returns `true` if no other handle shares the storage.
    #[inline]
    fn is_exclusive(&self) -> bool {
        self.ref_count() == 1
    }

    /// Maps an absolute region of a plane for reading.
    fn map_read(&self, chroma: &str, region: Region) -> Result<PlaneView<'_>>;

    /// Maps an absolute region of a plane for writing.
    ///
    /// Fails with [`Error::NotExclusive`](crate::Error::NotExclusive) on a
    /// shared buffer.
    fn map_write(&mut self, chroma: &str, region: Region) -> Result<PlaneViewMut<'_>>;

    /// Releases a mapping obtained with `map_read` or `map_write`.
    fn unmap(&self, chroma: &str, region: Region) -> Result<()>;

    /// Attempts to move the visible window without copying.
    ///
    /// On failure the buffer is unchanged. Managers answer
    /// [`Error::Unsupported`](crate::Error::Unsupported) when they have no
    /// room to grow.
    fn try_resize(&mut self, request: &ResizeRequest) -> Result<()>;
}

/// Checked, sentinel-aware access on top of [`PictureBuffer`].
///
/// Blanket-implemented for every buffer.
pub trait PictureExt: PictureBuffer {
    /// Returns a read-only view of a region of plane `chroma`.
    ///
    /// Must be paired with [`plane_unmap`](Self::plane_unmap) using the same
    /// parameters once the view is dropped.
    fn plane_read(&self, chroma: &str, raw: RawRegion) -> Result<PlaneView<'_>> {
        let region = normalize_region(self, chroma, raw)?;
        self.map_read(chroma, region)
    }

    /// Returns a writable view of a region of plane `chroma`, if the buffer
    /// is not shared.
    fn plane_write(&mut self, chroma: &str, raw: RawRegion) -> Result<PlaneViewMut<'_>> {
        let region = normalize_region(self, chroma, raw)?;
        self.map_write(chroma, region)
    }

    /// Marks a previously mapped region as unused.
    fn plane_unmap(&self, chroma: &str, raw: RawRegion) -> Result<()> {
        let region = normalize_region(self, chroma, raw)?;
        self.unmap(chroma, region)
    }

    /// Snapshot of the chroma names, for loops that mutate the buffer.
    fn chromas(&self) -> Vec<String> {
        self.planes().map(str::to_owned).collect()
    }
}

impl<B: PictureBuffer + ?Sized> PictureExt for B {}
