//! Heap picture allocation.

use std::sync::Arc;

use picbuf_core::{Error, PictureFormat, PictureManager, PlaneDesc, Region, Result};
use tracing::debug;

use crate::config::{ConfigResult, MemConfig};
use crate::picture::{MemPicture, PlaneStore, Storage};

/// Picture manager allocating zero-filled planes on the heap.
///
/// Every picture gets the configured margins around its visible window, so
/// that [`PictureBuffer::try_resize`](picbuf_core::PictureBuffer::try_resize)
/// can grow it in place. Margins are rounded up to the format's alignment
/// grid, and line strides to the configured byte alignment.
///
/// # Example
///
/// ```rust
/// use picbuf_core::{PictureBuffer, PictureFormat, PictureManager};
/// use picbuf_mem::MemManager;
///
/// let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
/// let picture = manager.alloc(16, 16).unwrap();
/// assert_eq!(picture.size().unwrap().hsize, 16);
/// assert_eq!(picture.planes().count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct MemManager {
    format: PictureFormat,
    hprepend: usize,
    happend: usize,
    vprepend: usize,
    vappend: usize,
    align: usize,
}

impl MemManager {
    /// Manager for `format` without margins.
    pub fn new(format: PictureFormat) -> Result<Self> {
        format.validate()?;
        let config = MemConfig::new(format.clone());
        Ok(Self::build(format, &config))
    }

    /// Manager built from a configuration.
    pub fn with_config(config: &MemConfig) -> ConfigResult<Self> {
        let format = config.format()?;
        Ok(Self::build(format, config))
    }

    fn build(format: PictureFormat, config: &MemConfig) -> Self {
        let hgrid = format.hgrid();
        let vgrid = format.vgrid();
        Self {
            hprepend: config.hprepend.next_multiple_of(hgrid),
            happend: config.happend.next_multiple_of(hgrid),
            vprepend: config.vprepend.next_multiple_of(vgrid),
            vappend: config.vappend.next_multiple_of(vgrid),
            align: config.align.max(1),
            format,
        }
    }

    /// Format of allocated pictures.
    #[inline]
    pub fn format(&self) -> &PictureFormat {
        &self.format
    }

    /// Effective margins `(hprepend, happend, vprepend, vappend)`.
    #[inline]
    pub fn margins(&self) -> (usize, usize, usize, usize) {
        (self.hprepend, self.happend, self.vprepend, self.vappend)
    }

    fn allocate_plane(
        &self,
        plane: &picbuf_core::PlaneFormat,
        total_h: usize,
        total_v: usize,
        refuse: &dyn Fn(String) -> Error,
    ) -> Result<PlaneStore> {
        let desc = PlaneDesc::new(0, plane.hsub, plane.vsub, plane.macropixel_size);
        let stride = (total_h / usize::from(plane.hsub) / usize::from(self.format.macropixel))
            .checked_mul(usize::from(plane.macropixel_size))
            .and_then(|row| row.checked_next_multiple_of(self.align))
            .ok_or_else(|| refuse(format!("plane {} stride overflows", plane.chroma)))?;
        let len = stride
            .checked_mul(desc.rows(total_v))
            .ok_or_else(|| refuse(format!("plane {} size overflows", plane.chroma)))?;

        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|e| refuse(format!("plane {}: {e}", plane.chroma)))?;
        data.resize(len, 0);

        Ok(PlaneStore {
            chroma: plane.chroma.clone(),
            desc: PlaneDesc { stride, ..desc },
            data,
        })
    }
}

impl PictureManager for MemManager {
    type Buffer = MemPicture;

    fn alloc(&self, hsize: usize, vsize: usize) -> Result<MemPicture> {
        let refuse = |reason: String| Error::allocation_failed(hsize, vsize, reason);

        let hgrid = self.format.hgrid();
        let vgrid = self.format.vgrid();
        if hsize % hgrid != 0 || vsize % vgrid != 0 {
            return Err(refuse(format!(
                "size not aligned on the {hgrid}x{vgrid} grid of the format"
            )));
        }

        let total_h = self
            .hprepend
            .checked_add(hsize)
            .and_then(|h| h.checked_add(self.happend))
            .ok_or_else(|| refuse("width overflows".into()))?;
        let total_v = self
            .vprepend
            .checked_add(vsize)
            .and_then(|v| v.checked_add(self.vappend))
            .ok_or_else(|| refuse("height overflows".into()))?;

        let planes = self
            .format
            .planes()
            .iter()
            .map(|plane| self.allocate_plane(plane, total_h, total_v, &refuse))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            hsize,
            vsize,
            total_h,
            total_v,
            planes = planes.len(),
            "allocated picture"
        );

        let storage = Storage {
            macropixel: self.format.macropixel,
            hsize: total_h,
            vsize: total_v,
            hgrid,
            vgrid,
            planes,
        };
        Ok(MemPicture::new(
            Arc::new(storage),
            Region::new(self.hprepend, self.vprepend, hsize, vsize),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picbuf_core::{ErrorKind, PictureBuffer};

    #[test]
    fn test_alloc_planes() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let picture = manager.alloc(16, 16).unwrap();
        let chromas: Vec<&str> = picture.planes().collect();
        assert_eq!(chromas, vec!["y8", "u8", "v8"]);

        let y = picture.plane_desc("y8").unwrap();
        let u = picture.plane_desc("u8").unwrap();
        assert_eq!((y.hsub, y.vsub, y.stride), (1, 1, 16));
        assert_eq!((u.hsub, u.vsub, u.stride), (2, 2, 16));
        assert!(picture.is_exclusive());
    }

    #[test]
    fn test_alloc_misaligned() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let err = manager.alloc(15, 16).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailure);
        let err = manager.alloc(16, 15).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailure);
    }

    #[test]
    fn test_alloc_overflow() {
        let manager = MemManager::new(PictureFormat::rgba32()).unwrap();
        let err = manager.alloc(usize::MAX, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AllocationFailure);
    }

    #[test]
    fn test_margins_rounded_to_grid() {
        let config = MemConfig::new(PictureFormat::yuv420p())
            .with_hmargins(3, 5)
            .with_vmargins(1, 1)
            .with_align(1);
        let manager = MemManager::with_config(&config).unwrap();
        assert_eq!(manager.margins(), (4, 6, 2, 2));

        let picture = manager.alloc(8, 8).unwrap();
        assert_eq!(picture.plane_desc("y8").unwrap().stride, 4 + 8 + 6);
        assert_eq!(picture.plane_desc("u8").unwrap().stride, 9);
        assert_eq!(picture.window(), Region::new(4, 2, 8, 8));
    }

    #[test]
    fn test_stride_alignment() {
        let config = MemConfig::new(PictureFormat::rgb24()).with_align(32);
        let manager = MemManager::with_config(&config).unwrap();
        let picture = manager.alloc(10, 2).unwrap();
        assert_eq!(picture.plane_desc("r8g8b8").unwrap().stride, 32);
    }

    #[test]
    fn test_zero_sized() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let picture = manager.alloc(0, 0).unwrap();
        assert_eq!(picture.size().unwrap().hsize, 0);
    }
}
