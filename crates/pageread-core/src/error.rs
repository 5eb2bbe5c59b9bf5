use std::path::PathBuf;

use thiserror::Error;

use crate::memory::PhysAddr;

/// Errors that can occur while reading physical memory pages.
///
/// Every variant is fatal. The first four are usage errors raised before the
/// device is touched; see [`PageReadError::is_usage`].
#[derive(Debug, Error)]
pub enum PageReadError {
    /// The requested address is zero
    #[error("Invalid hpa address")]
    InvalidAddress,
    /// The requested address has bits set below the page size
    #[error("hpa address must be page aligned")]
    UnalignedAddress(PhysAddr),
    /// Zero pages requested
    #[error("Invalid number of pages to scan")]
    InvalidPageCount,
    /// Zero bytes per page requested
    #[error("Invalid number of bytes to read from the page")]
    InvalidByteCount,
    /// Opening the physical memory device failed
    #[error("open({}, {flags}) failed with code {} ({source})", .device.display(), os_code(.source))]
    Open {
        /// Path of the device
        device: PathBuf,
        /// Symbolic open flags, e.g. `O_RDONLY | O_SYNC`
        flags: &'static str,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// Mapping the physical window failed
    #[error("mmap(0, {len:#x}, PROT_READ, MAP_SHARED, fd, {offset:#x}) failed with code {} ({source})", os_code(.source))]
    Map {
        /// Requested mapping length in bytes
        len: usize,
        /// Physical offset of the mapping
        offset: PhysAddr,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// Unmapping the physical window failed
    #[error("munmap({addr:#x}, {len:#x}) failed with code {} ({source})", os_code(.source))]
    Unmap {
        /// Base of the mapping in our address space
        addr: usize,
        /// Mapping length in bytes
        len: usize,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },
    /// Writing to the console failed
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Result type with [`PageReadError`] as the error
pub type Result<T> = std::result::Result<T, PageReadError>;

impl PageReadError {
    /// Returns true for request validation errors, which are reported together
    /// with the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            PageReadError::InvalidAddress
                | PageReadError::UnalignedAddress(_)
                | PageReadError::InvalidPageCount
                | PageReadError::InvalidByteCount
        )
    }
}

fn os_code(e: &std::io::Error) -> i32 {
    e.raw_os_error().unwrap_or(0)
}
