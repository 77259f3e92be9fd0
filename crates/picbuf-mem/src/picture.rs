//! Heap picture handle.
//!
//! Storage is shared through an [`Arc`]: cloning a [`MemPicture`] bumps the
//! reference count, dropping it releases the reference. Each handle keeps
//! its own visible window into the allocation, so a shrink on one handle
//! never affects the others.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use picbuf_core::{
    Error, PictureBuffer, PictureSize, PlaneDesc, PlaneSpan, PlaneView, PlaneViewMut, Region,
    ResizeKind, ResizeRequest, Result,
};
use tracing::{debug, trace};

/// One allocated plane.
#[derive(Debug, Clone)]
pub(crate) struct PlaneStore {
    pub(crate) chroma: String,
    pub(crate) desc: PlaneDesc,
    pub(crate) data: Vec<u8>,
}

/// Allocation shared by all handles of a picture.
#[derive(Debug)]
pub(crate) struct Storage {
    pub(crate) macropixel: u8,
    /// Allocated width, margins included.
    pub(crate) hsize: usize,
    /// Allocated height, margins included.
    pub(crate) vsize: usize,
    pub(crate) hgrid: usize,
    pub(crate) vgrid: usize,
    pub(crate) planes: Vec<PlaneStore>,
}

impl Storage {
    fn index(&self, chroma: &str) -> Result<usize> {
        self.planes
            .iter()
            .position(|p| p.chroma == chroma)
            .ok_or_else(|| Error::unknown_plane(chroma))
    }
}

/// Handle to a heap-allocated picture.
///
/// Produced by [`MemManager`](crate::MemManager).
#[derive(Debug)]
pub struct MemPicture {
    storage: Arc<Storage>,
    window: Region,
    mapped: AtomicUsize,
}

impl MemPicture {
    pub(crate) fn new(storage: Arc<Storage>, window: Region) -> Self {
        Self {
            storage,
            window,
            mapped: AtomicUsize::new(0),
        }
    }

    /// Visible window, in pixels of the allocation.
    #[inline]
    pub fn window(&self) -> Region {
        self.window
    }

    /// Allocated dimensions, margins included.
    #[inline]
    pub fn allocated_size(&self) -> PictureSize {
        PictureSize::new(self.storage.hsize, self.storage.vsize, self.storage.macropixel)
    }

    /// Number of mappings not yet released on this handle.
    #[inline]
    pub fn mapped(&self) -> usize {
        self.mapped.load(Ordering::Acquire)
    }

    /// Returns `true` if both handles share the same storage.
    #[inline]
    pub fn shares_storage_with(&self, other: &MemPicture) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    fn visible(&self) -> PictureSize {
        PictureSize::new(self.window.hsize, self.window.vsize, self.storage.macropixel)
    }

    // Plane index and byte span of a region given relative to the window.
    fn locate(&self, chroma: &str, region: Region) -> Result<(usize, PlaneSpan)> {
        let index = self.storage.index(chroma)?;
        if !region.fits(&self.visible()) {
            return Err(Error::invalid_parameter(format!(
                "region {region:?} outside picture {}x{}",
                self.window.hsize, self.window.vsize
            )));
        }
        let plane = &self.storage.planes[index];
        region.check_plane(plane.desc.hsub, plane.desc.vsub)?;

        let absolute = Region::new(
            self.window.hoffset + region.hoffset,
            self.window.voffset + region.voffset,
            region.hsize,
            region.vsize,
        );
        Ok((index, plane.desc.span(&absolute, self.storage.macropixel)))
    }
}

impl Clone for MemPicture {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.storage), self.window)
    }
}

impl PictureBuffer for MemPicture {
    fn size(&self) -> Result<PictureSize> {
        Ok(self.visible())
    }

    fn planes(&self) -> impl Iterator<Item = &str> {
        self.storage.planes.iter().map(|p| p.chroma.as_str())
    }

    fn plane_desc(&self, chroma: &str) -> Result<PlaneDesc> {
        let index = self.storage.index(chroma)?;
        Ok(self.storage.planes[index].desc)
    }

    fn ref_count(&self) -> usize {
        Arc::strong_count(&self.storage)
    }

    fn map_read(&self, chroma: &str, region: Region) -> Result<PlaneView<'_>> {
        let (index, span) = self.locate(chroma, region)?;
        let data: &[u8] = if span.is_empty() {
            &[]
        } else {
            span.range()
                .and_then(|range| self.storage.planes[index].data.get(range))
                .ok_or_else(|| out_of_storage(chroma, &span))?
        };
        let view = PlaneView::new(data, span.stride, span.row_bytes, span.rows)?;
        self.mapped.fetch_add(1, Ordering::AcqRel);
        trace!(chroma, ?region, "mapped for reading");
        Ok(view)
    }

    fn map_write(&mut self, chroma: &str, region: Region) -> Result<PlaneViewMut<'_>> {
        let (index, span) = self.locate(chroma, region)?;
        let refs = Arc::strong_count(&self.storage);
        let storage = Arc::get_mut(&mut self.storage).ok_or(Error::NotExclusive { refs })?;
        let data: &mut [u8] = if span.is_empty() {
            &mut []
        } else {
            span.range()
                .and_then(|range| storage.planes[index].data.get_mut(range))
                .ok_or_else(|| out_of_storage(chroma, &span))?
        };
        let view = PlaneViewMut::new(data, span.stride, span.row_bytes, span.rows)?;
        self.mapped.fetch_add(1, Ordering::AcqRel);
        trace!(chroma, ?region, "mapped for writing");
        Ok(view)
    }

    fn unmap(&self, chroma: &str, region: Region) -> Result<()> {
        self.locate(chroma, region)?;
        self.mapped
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| Error::invalid_parameter(format!("plane {chroma} is not mapped")))?;
        trace!(chroma, ?region, "unmapped");
        Ok(())
    }

    fn try_resize(&mut self, request: &ResizeRequest) -> Result<()> {
        if request.size != self.visible() {
            return Err(Error::invalid_parameter(format!(
                "resize request for {:?} applied to {:?}",
                request.size,
                self.visible()
            )));
        }
        if request.kind() == ResizeKind::Grow && !self.is_exclusive() {
            return Err(Error::NotExclusive {
                refs: self.ref_count(),
            });
        }

        let hoffset = i64::try_from(self.window.hoffset)
            .ok()
            .and_then(|h| h.checked_add(request.hskip));
        let voffset = i64::try_from(self.window.voffset)
            .ok()
            .and_then(|v| v.checked_add(request.vskip));
        let (Some(hoffset), Some(voffset)) = (hoffset, voffset) else {
            return Err(Error::invalid_parameter("skip overflows"));
        };
        let (Ok(hoffset), Ok(voffset)) = (usize::try_from(hoffset), usize::try_from(voffset))
        else {
            return Err(Error::unsupported(format!(
                "no margin to grow by ({}, {})",
                request.hskip, request.vskip
            )));
        };

        let window = Region::new(hoffset, voffset, request.new_hsize, request.new_vsize);
        if !window.fits(&self.allocated_size()) {
            return Err(Error::unsupported(format!(
                "window {window:?} exceeds allocation {}x{}",
                self.storage.hsize, self.storage.vsize
            )));
        }

        let (hgrid, vgrid) = (self.storage.hgrid, self.storage.vgrid);
        let checks = [
            ("hskip", window.hoffset, hgrid),
            ("vskip", window.voffset, vgrid),
            ("new_hsize", window.hsize, hgrid),
            ("new_vsize", window.vsize, vgrid),
        ];
        for (what, value, grid) in checks {
            if value % grid != 0 {
                return Err(Error::alignment(what, value as i64, grid));
            }
        }

        debug!(from = ?self.window, to = ?window, "resized in place");
        self.window = window;
        Ok(())
    }
}

fn out_of_storage(chroma: &str, span: &PlaneSpan) -> Error {
    Error::invalid_parameter(format!("span {span:?} of plane {chroma} exceeds storage"))
}
