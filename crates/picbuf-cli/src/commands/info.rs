//! Info command

use crate::InfoArgs;
use anyhow::Result;
use picbuf_core::{PictureBuffer, PictureManager};
use picbuf_ops::packed_len;

pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    let manager = super::manager(&args.picture)?;
    let picture = manager.alloc(args.picture.hsize, args.picture.vsize)?;
    let size = picture.size()?;

    println!(
        "{}x{} macropixel {} ({} bytes packed)",
        size.hsize,
        size.vsize,
        size.macropixel,
        packed_len(&picture)?
    );
    for chroma in picture.planes() {
        let desc = picture.plane_desc(chroma)?;
        let row_bytes = desc.row_bytes(size.hsize, size.macropixel);
        let rows = desc.rows(size.vsize);
        println!(
            "  {chroma:<10} {}x{} sub, {} B/macropixel, {row_bytes} B x {rows} lines, stride {}",
            desc.hsub, desc.vsub, desc.macropixel_size, desc.stride
        );
    }

    if verbose {
        let (hprepend, happend, vprepend, vappend) = manager.margins();
        let allocated = picture.allocated_size();
        println!(
            "margins: {hprepend} left, {happend} right, {vprepend} top, {vappend} bottom \
             ({}x{} allocated)",
            allocated.hsize, allocated.vsize
        );
    }

    Ok(())
}
