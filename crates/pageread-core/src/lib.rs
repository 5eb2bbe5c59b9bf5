//! # pageread core
//!
//! `pageread-core` reads a contiguous range of physical memory pages through
//! the kernel's physical memory device (`/dev/mem`) and sums up the bytes it
//! touched, optionally dumping them to the console.
//!
//! ## Architecture Overview
//!
//! A run is a straight pipeline:
//!
//! - [`Request`] - what to read; [`Request::validate`] rejects bad input before any
//!   device access.
//! - [`memory::DeviceOpener`] and [`memory::MapPhys`] - open the device with the
//!   requested [`CacheMode`] and map a read-only window of it.
//! - [`Walker`] - walks the window page by page, accumulating a [`Checksum`].
//! - [`memory::PhysWindow::unmap`] - tears the window down; the device is closed
//!   on every path.
//!
//! [`read_pages`] drives the whole pipeline.
//!
//! ## Platform Support
//!
//! Linux with a `/dev/mem` that allows mapping the requested range. Reading
//! physical memory requires root privileges, and kernels built with
//! `CONFIG_STRICT_DEVMEM` restrict the accessible ranges.

#![warn(missing_docs)]

mod error;
pub mod memory;
mod request;
mod session;
pub mod util;
mod walker;

pub use crate::error::{PageReadError, Result};
pub use crate::request::{CacheMode, Request};
pub use crate::session::{Summary, mapping_len, read_pages};
pub use crate::walker::{Checksum, Walker};
