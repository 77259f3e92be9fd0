//! Tightly packed picture images.
//!
//! The packed layout stores the planes one after the other in enumeration
//! order, each line exactly as long as its meaningful bytes. This is the
//! layout of raw `.yuv` files.

use picbuf_core::{Error, PictureBuffer, PictureExt, RawRegion, Result};
use tracing::debug;

/// Size in bytes of the packed image of `buffer`.
pub fn packed_len<B>(buffer: &B) -> Result<usize>
where
    B: PictureBuffer + ?Sized,
{
    let size = buffer.size()?;
    buffer.planes().try_fold(0usize, |total, chroma| {
        let desc = buffer.plane_desc(chroma)?;
        desc.row_bytes(size.hsize, size.macropixel)
            .checked_mul(desc.rows(size.vsize))
            .and_then(|len| total.checked_add(len))
            .ok_or_else(|| Error::invalid_parameter("packed size overflows"))
    })
}

/// Copies every plane of `buffer` into a packed image.
pub fn write_packed<B>(buffer: &B) -> Result<Vec<u8>>
where
    B: PictureBuffer + ?Sized,
{
    let mut out = Vec::with_capacity(packed_len(buffer)?);
    for chroma in buffer.planes() {
        let view = buffer.plane_read(chroma, RawRegion::FULL)?;
        for row in view.iter_rows() {
            out.extend_from_slice(row);
        }
        drop(view);
        buffer.plane_unmap(chroma, RawRegion::FULL)?;
    }
    debug!(bytes = out.len(), "packed picture");
    Ok(out)
}

/// Loads a packed image into `buffer`.
///
/// `data` must be exactly [`packed_len`] bytes.
pub fn read_packed<B>(buffer: &mut B, data: &[u8]) -> Result<()>
where
    B: PictureBuffer + ?Sized,
{
    let expected = packed_len(buffer)?;
    if data.len() != expected {
        return Err(Error::invalid_parameter(format!(
            "packed image of {} bytes, picture needs {expected}",
            data.len()
        )));
    }

    let mut rest = data;
    for chroma in buffer.chromas() {
        {
            let mut view = buffer.plane_write(&chroma, RawRegion::FULL)?;
            let row_bytes = view.row_bytes();
            for y in 0..view.rows() {
                let (line, tail) = rest.split_at(row_bytes);
                view.row_mut(y).copy_from_slice(line);
                rest = tail;
            }
        }
        buffer.plane_unmap(&chroma, RawRegion::FULL)?;
    }
    debug!(bytes = data.len(), "unpacked picture");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use picbuf_core::{PictureFormat, PictureManager};
    use picbuf_mem::MemManager;

    #[test]
    fn test_packed_len() {
        let manager = MemManager::new(PictureFormat::yuv420p()).unwrap();
        let picture = manager.alloc(16, 8).unwrap();
        assert_eq!(packed_len(&picture).unwrap(), 16 * 8 + 2 * 8 * 4);

        let manager = MemManager::new(PictureFormat::uyvy422()).unwrap();
        let picture = manager.alloc(4, 2).unwrap();
        assert_eq!(packed_len(&picture).unwrap(), 16);
    }

    #[test]
    fn test_pack_unpack() {
        let manager = MemManager::new(PictureFormat::nv12()).unwrap();
        let mut picture = manager.alloc(4, 2).unwrap();
        let data: Vec<u8> = (1..=12).collect();
        read_packed(&mut picture, &data).unwrap();

        let view = picture.plane_read("u8v8", RawRegion::FULL).unwrap();
        assert_eq!(view.row(0), &[9, 10, 11, 12]);
        drop(view);
        picture.plane_unmap("u8v8", RawRegion::FULL).unwrap();

        assert_eq!(write_packed(&picture).unwrap(), data);
        assert_eq!(picture.mapped(), 0);
    }

    #[test]
    fn test_wrong_length() {
        let manager = MemManager::new(PictureFormat::gray8()).unwrap();
        let mut picture = manager.alloc(4, 4).unwrap();
        assert!(read_packed(&mut picture, &[0; 15]).is_err());
    }
}
