//! Clear command

use crate::ClearArgs;
use anyhow::{Context, Result};
use picbuf_ops::{clear, clear_plane};

pub fn run(args: ClearArgs, verbose: bool) -> Result<()> {
    let manager = super::manager(&args.picture)?;
    let mut picture = super::load_picture(&args.input, &manager, &args.picture)?;

    if verbose {
        println!(
            "Clearing {} @ ({},{}) size {}x{}",
            args.plane.as_deref().unwrap_or("all planes"),
            args.x,
            args.y,
            args.w,
            args.h
        );
    }

    let cleared = match &args.plane {
        Some(chroma) => clear_plane(&mut picture, chroma, args.x, args.y, args.w, args.h),
        None => clear(&mut picture, args.x, args.y, args.w, args.h),
    };
    cleared.context("Failed to clear")?;

    super::save_picture(&args.output, &picture)?;

    if verbose {
        println!("Done.");
    }

    Ok(())
}
