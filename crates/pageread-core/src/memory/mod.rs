//! The `memory` module provides access to physical memory through a mapped device.
//!
//! The `memory` module provides the following abstractions:
//! - `PhysAddr`: A newtype for host physical addresses.
//! - `DeviceOpener`: A trait for opening a physical memory device with a caching policy.
//! - `MapPhys`: A trait for mapping a window of an open device.
//! - `PhysWindow`: A trait for reading from and releasing a mapped window.
//!
//! `DevMemOpener`, `DevMem` and `PhysMapping` implement these traits on top of
//! `open(2)` and `mmap(2)`.
mod dev_mem;
mod phys_addr;

pub use self::dev_mem::{DevMem, DevMemOpener, PhysMapping};
pub use self::phys_addr::PhysAddr;

use std::path::Path;

use crate::error::Result;
use crate::request::CacheMode;

/// Trait for opening physical memory devices.
pub trait DeviceOpener {
    /// The open device
    type Device: MapPhys;

    /// Opens `device` read-only with the flags of `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PageReadError::Open`] if the device cannot be opened.
    fn open(&mut self, device: &Path, mode: CacheMode) -> Result<Self::Device>;
}

/// Trait for mapping a window of an open physical memory device.
pub trait MapPhys {
    /// The mapped window, which takes ownership of the device
    type Mapping: PhysWindow;

    /// Maps `len` bytes starting at physical address `offset`.
    ///
    /// The device is consumed; on failure it is released before returning.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PageReadError::Map`] if the mapping fails.
    fn map(self, offset: PhysAddr, len: usize) -> Result<Self::Mapping>;
}

/// Trait for read-only windows of physical memory.
#[allow(clippy::len_without_is_empty)]
pub trait PhysWindow {
    /// Physical address of the first byte of the window.
    fn base(&self) -> PhysAddr;

    /// Returns the total length of the window in bytes.
    fn len(&self) -> usize;

    /// Reads the byte at `offset`, or `None` if `offset` lies outside of the window.
    fn read_byte(&self, offset: usize) -> Option<u8>;

    /// Releases the window and its device.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PageReadError::Unmap`] if the window cannot be unmapped.
    /// The device is released in any case.
    fn unmap(self) -> Result<()>;
}
