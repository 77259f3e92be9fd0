//! # picbuf-mem
//!
//! Heap implementation of the picbuf buffer manager contract.
//!
//! [`MemManager`] allocates zero-filled planes with configurable margins and
//! line alignment; [`MemPicture`] is a reference-counted handle to one
//! picture. Cloning a handle shares the storage, and writes require the
//! handle to be the only one left.
//!
//! # Example
//!
//! ```rust
//! use picbuf_core::prelude::*;
//! use picbuf_mem::{MemConfig, MemManager};
//!
//! let config = MemConfig::new(PictureFormat::yuv420p()).with_hmargins(16, 16);
//! let manager = MemManager::with_config(&config).unwrap();
//! let mut picture = manager.alloc(64, 48).unwrap();
//!
//! let mut luma = picture.plane_write("y8", RawRegion::FULL).unwrap();
//! luma.row_mut(0).fill(0xff);
//! drop(luma);
//! picture.plane_unmap("y8", RawRegion::FULL).unwrap();
//! assert_eq!(picture.mapped(), 0);
//! ```
//!
//! # Dependencies
//!
//! - [`picbuf-core`](picbuf_core) - Buffer contract and geometry
//! - `serde`, `serde_yaml` - Configuration files
//! - `tracing` - Allocation and resize events
//!
//! # Used By
//!
//! - `picbuf-ops` (tests)
//! - `picbuf-cli`

#![warn(missing_docs)]

pub mod config;
mod manager;
mod picture;

pub use config::{ConfigError, ConfigResult, FormatSpec, MemConfig, DEFAULT_ALIGN};
pub use manager::MemManager;
pub use picture::MemPicture;
