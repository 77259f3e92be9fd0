//! Integration tests for picbuf crates.
//!
//! End-to-end checks of the geometry, sharing and copy rules across the core
//! contract, the heap manager and the operations.
