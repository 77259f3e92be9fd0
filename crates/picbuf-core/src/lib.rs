//! # picbuf-core
//!
//! Core types for multi-plane picture buffers.
//!
//! This crate provides the foundational types used throughout picbuf:
//!
//! - [`PictureBuffer`], [`PictureManager`] - The buffer manager contract
//! - [`PictureExt`] - Checked plane access with sentinel-aware regions
//! - [`PlaneDesc`], [`PlaneView`], [`PlaneViewMut`] - Plane geometry and mappings
//! - [`RawRegion`], [`Region`], [`ResizeRequest`] - Parameter normalization
//! - [`PictureFormat`] - Macropixel and plane layouts, with common presets
//! - [`chroma`] - Chroma naming convention and neutral fill values
//!
//! ## Crate Structure
//!
//! ```text
//! picbuf-core (this crate)
//!    ^
//!    |
//!    +-- picbuf-mem (heap buffer manager)
//!    +-- picbuf-ops (resize, copy, clear)
//!    +-- picbuf-cli
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Enable (de)serialization of [`PictureFormat`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chroma;
pub mod error;
pub mod format;
pub mod geometry;
pub mod picture;
pub mod plane;

pub use error::{Error, ErrorKind, Result};
pub use format::{PictureFormat, PlaneFormat};
pub use geometry::{
    normalize_region, normalize_resize, Overlap, PictureSize, RawRegion, Region, ResizeKind,
    ResizeRequest, TO_END,
};
pub use picture::{PictureBuffer, PictureExt, PictureManager};
pub use plane::{PlaneDesc, PlaneSpan, PlaneView, PlaneViewMut};

/// Prelude module for convenient imports.
///
/// ```
/// use picbuf_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, ErrorKind, Result};
    pub use crate::format::{PictureFormat, PlaneFormat};
    pub use crate::geometry::{PictureSize, RawRegion, Region, ResizeRequest, TO_END};
    pub use crate::picture::{PictureBuffer, PictureExt, PictureManager};
    pub use crate::plane::{PlaneDesc, PlaneView, PlaneViewMut};
}
