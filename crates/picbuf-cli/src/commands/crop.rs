//! Crop command

use crate::CropArgs;
use anyhow::{Context, Result};
use picbuf_core::PictureBuffer;
use picbuf_ops::{resize_or_replace, ResizePath};

pub fn run(args: CropArgs, verbose: bool) -> Result<()> {
    let manager = super::manager(&args.picture)?;
    let mut picture = super::load_picture(&args.input, &manager, &args.picture)?;

    if verbose {
        println!(
            "Cropping {}x{} by ({}, {}) to {}x{}",
            args.picture.hsize, args.picture.vsize, args.hskip, args.vskip, args.width, args.height
        );
    }

    let path = resize_or_replace(
        &manager,
        &mut picture,
        args.hskip,
        args.vskip,
        args.width,
        args.height,
    )
    .context("Failed to crop")?;

    super::save_picture(&args.output, &picture)?;

    if verbose {
        let size = picture.size()?;
        let how = match path {
            ResizePath::InPlace => "in place",
            ResizePath::Copied => "by copy",
        };
        println!("Done: {}x{} {how}.", size.hsize, size.vsize);
    }

    Ok(())
}
