//! Description of a single physical memory read and its validation.

use std::path::PathBuf;

use log::warn;

use crate::error::{PageReadError, Result};
use crate::memory::PhysAddr;
use crate::util::{DEVMEM_FILE, NBYTES, NPAGES};

/// Caching policy requested for the physical memory window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Open with `O_SYNC | O_DSYNC` so reads bypass caches where the platform honors it
    #[default]
    Uncached,
    /// Open with `O_SYNC` only, permitting cached reads
    Cached,
}

impl CacheMode {
    /// Extra `open(2)` flags for this mode, on top of `O_RDONLY`.
    pub fn open_flags(&self) -> libc::c_int {
        match self {
            CacheMode::Uncached => libc::O_SYNC | libc::O_DSYNC,
            CacheMode::Cached => libc::O_SYNC,
        }
    }

    /// Symbolic rendition of the complete flag set, used in diagnostics.
    pub fn describe_flags(&self) -> &'static str {
        match self {
            CacheMode::Uncached => "O_RDONLY | O_SYNC | O_DSYNC",
            CacheMode::Cached => "O_RDONLY | O_SYNC",
        }
    }
}

impl From<bool> for CacheMode {
    fn from(cached: bool) -> Self {
        if cached {
            CacheMode::Cached
        } else {
            CacheMode::Uncached
        }
    }
}

/// A request to read `bytes_per_page` bytes from each of `page_count`
/// consecutive pages starting at `phys_addr`.
///
/// The extents are signed and only checked against zero by [`Request::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// First physical address to read
    pub phys_addr: PhysAddr,
    /// Number of pages to span
    pub page_count: i64,
    /// Number of bytes to read from each page
    pub bytes_per_page: i64,
    /// Print the bytes while reading
    pub dump: bool,
    /// Caching policy of the mapping
    pub cache_mode: CacheMode,
    /// Device exposing physical memory
    pub device: PathBuf,
}

impl Default for Request {
    fn default() -> Self {
        Request {
            phys_addr: PhysAddr::default(),
            page_count: NPAGES,
            bytes_per_page: NBYTES,
            dump: false,
            cache_mode: CacheMode::default(),
            device: PathBuf::from(DEVMEM_FILE),
        }
    }
}

impl Request {
    /// Creates a request for a single byte at `phys_addr` with default settings.
    pub fn new(phys_addr: PhysAddr) -> Self {
        Request {
            phys_addr,
            ..Default::default()
        }
    }

    /// Checks the request before any device access.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint, in this order:
    /// * [`PageReadError::InvalidAddress`] if the address is zero
    /// * [`PageReadError::UnalignedAddress`] if the address is not page aligned
    /// * [`PageReadError::InvalidPageCount`] if no pages are requested
    /// * [`PageReadError::InvalidByteCount`] if no bytes are requested
    pub fn validate(&self) -> Result<()> {
        if self.phys_addr.is_null() {
            return Err(PageReadError::InvalidAddress);
        }
        if !self.phys_addr.is_page_aligned() {
            return Err(PageReadError::UnalignedAddress(self.phys_addr));
        }
        if self.page_count == 0 {
            return Err(PageReadError::InvalidPageCount);
        }
        if self.bytes_per_page == 0 {
            return Err(PageReadError::InvalidByteCount);
        }
        // negative extents are let through on purpose, see DESIGN.md
        if self.page_count < 0 {
            warn!(
                "negative page count {} will produce an invalid mapping length",
                self.page_count
            );
        }
        if self.bytes_per_page < 0 {
            warn!(
                "negative byte count {}: no bytes will be read",
                self.bytes_per_page
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(addr: u64, pages: i64, bytes: i64) -> Request {
        Request {
            page_count: pages,
            bytes_per_page: bytes,
            ..Request::new(PhysAddr::new(addr))
        }
    }

    #[test]
    fn test_defaults() {
        let r = Request::default();
        assert_eq!(r.page_count, 1);
        assert_eq!(r.bytes_per_page, 1);
        assert!(!r.dump);
        assert_eq!(r.cache_mode, CacheMode::Uncached);
        assert_eq!(r.device, PathBuf::from("/dev/mem"));
    }

    #[test]
    fn test_rejects_null_address() {
        for (pages, bytes) in [(1, 1), (0, 0), (4, 4096)] {
            assert!(matches!(
                request(0, pages, bytes).validate(),
                Err(PageReadError::InvalidAddress)
            ));
        }
    }

    #[test]
    fn test_rejects_unaligned_address() {
        for addr in [1, 0x1001, 0x1800, 0xfff] {
            assert!(matches!(
                request(addr, 1, 1).validate(),
                Err(PageReadError::UnalignedAddress(a)) if a.as_u64() == addr
            ));
        }
    }

    #[test]
    fn test_rejects_zero_extents() {
        assert!(matches!(
            request(0x1000, 0, 1).validate(),
            Err(PageReadError::InvalidPageCount)
        ));
        assert!(matches!(
            request(0x1000, 1, 0).validate(),
            Err(PageReadError::InvalidByteCount)
        ));
        // page count is checked first
        assert!(matches!(
            request(0x1000, 0, 0).validate(),
            Err(PageReadError::InvalidPageCount)
        ));
    }

    #[test]
    fn test_accepts_negative_extents() {
        assert!(request(0x1000, -1, 1).validate().is_ok());
        assert!(request(0x1000, 1, -16).validate().is_ok());
    }

    #[test]
    fn test_cache_mode_flags() {
        assert_eq!(CacheMode::from(true), CacheMode::Cached);
        assert_eq!(CacheMode::from(false), CacheMode::Uncached);
        assert_eq!(CacheMode::Cached.open_flags(), libc::O_SYNC);
        assert_eq!(
            CacheMode::Uncached.open_flags(),
            libc::O_SYNC | libc::O_DSYNC
        );
    }
}
