//! # picbuf-ops
//!
//! Operations on multi-plane picture buffers.
//!
//! Everything here works through the [`PictureBuffer`](picbuf_core::PictureBuffer)
//! and [`PictureManager`](picbuf_core::PictureManager) traits, so it applies
//! to any buffer manager.
//!
//! # Modules
//!
//! - [`resize`] - In-place crop and growth, with copy fallback
//! - [`copy`] - Crop or extend into a newly allocated picture
//! - [`clear`] - Fill regions with neutral values
//! - [`packed`] - Tightly packed raw images
//! - [`rows`] - Row kernels
//!
//! # Common Operations
//!
//! ## Crop
//!
//! ```rust,ignore
//! use picbuf_ops::resize;
//!
//! // 64x48 picture: drop 8 pixels on each side, in place
//! resize(&mut picture, 8, 8, 48, 32)?;
//! ```
//!
//! ## Pad
//!
//! ```rust,ignore
//! use picbuf_ops::resize_or_replace;
//!
//! // Add 16 pixels on the left, reallocating if there is no margin
//! let path = resize_or_replace(&manager, &mut picture, -16, 0, TO_END, TO_END)?;
//! ```
//!
//! ## Blank
//!
//! ```rust,ignore
//! use picbuf_ops::clear;
//!
//! clear(&mut picture, 0, 0, TO_END, TO_END)?;
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - Split large row copies and fills across rayon

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod clear;
pub mod copy;
pub mod packed;
pub mod resize;
pub mod rows;

#[cfg(feature = "parallel")]
mod parallel;

pub use clear::{clear, clear_plane};
pub use copy::{copy, replace};
pub use packed::{packed_len, read_packed, write_packed};
pub use resize::{resize, resize_or_replace, ResizePath};
