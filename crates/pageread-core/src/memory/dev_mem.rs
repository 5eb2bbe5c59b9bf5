use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::ptr;

use libc::{MAP_FAILED, MAP_SHARED, PROT_READ, mmap, munmap};
use log::{debug, warn};

use super::{DeviceOpener, MapPhys, PhysAddr, PhysWindow};
use crate::error::{PageReadError, Result};
use crate::request::CacheMode;

/// Opener for `/dev/mem`-like character devices.
///
/// Any file supporting `mmap(2)` works, which allows backing the tool with a
/// regular file for testing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DevMemOpener;

/// An open physical memory device.
///
/// The descriptor is closed when this value (or the [`PhysMapping`] created
/// from it) is dropped.
#[derive(Debug)]
pub struct DevMem {
    file: File,
    path: PathBuf,
}

/// A read-only, shared mapping of physical memory.
///
/// Owns the device descriptor. On drop the window is unmapped (if
/// [`PhysWindow::unmap`] was not called) and the descriptor is closed, whatever
/// the outcome of the unmap.
#[derive(Debug)]
pub struct PhysMapping {
    ptr: *const u8,
    len: usize,
    base: PhysAddr,
    mapped: bool,
    // dropped after the mapping is gone
    _file: File,
}

impl DeviceOpener for DevMemOpener {
    type Device = DevMem;

    fn open(&mut self, device: &Path, mode: CacheMode) -> Result<DevMem> {
        let file = OpenOptions::new()
            .read(true)
            .custom_flags(mode.open_flags())
            .open(device)
            .map_err(|source| PageReadError::Open {
                device: device.to_path_buf(),
                flags: mode.describe_flags(),
                source,
            })?;
        debug!(
            "opened {} ({}) as fd {}",
            device.display(),
            mode.describe_flags(),
            file.as_raw_fd()
        );
        Ok(DevMem {
            file,
            path: device.to_path_buf(),
        })
    }
}

impl DevMem {
    /// Path the device was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MapPhys for DevMem {
    type Mapping = PhysMapping;

    fn map(self, offset: PhysAddr, len: usize) -> Result<PhysMapping> {
        let p = unsafe {
            mmap(
                ptr::null_mut(),
                len,
                PROT_READ,
                MAP_SHARED,
                self.file.as_raw_fd(),
                offset.as_u64() as libc::off_t,
            )
        };
        if p == MAP_FAILED {
            // self.file is dropped here, closing the descriptor
            return Err(PageReadError::Map {
                len,
                offset,
                source: std::io::Error::last_os_error(),
            });
        }
        debug!(
            "mapped {:#x} bytes of {} at {:p} -> {:p}",
            len,
            self.path.display(),
            offset,
            p
        );
        Ok(PhysMapping {
            ptr: p as *const u8,
            len,
            base: offset,
            mapped: true,
            _file: self.file,
        })
    }
}

impl PhysMapping {
    fn release(&mut self) -> std::io::Result<()> {
        self.mapped = false;
        if unsafe { munmap(self.ptr as *mut libc::c_void, self.len) } != 0 {
            return Err(std::io::Error::last_os_error());
        }
        Ok(())
    }
}

impl PhysWindow for PhysMapping {
    fn base(&self) -> PhysAddr {
        self.base
    }

    fn len(&self) -> usize {
        self.len
    }

    fn read_byte(&self, offset: usize) -> Option<u8> {
        if !self.mapped || offset >= self.len {
            return None;
        }
        // device memory: every access must hit the mapping
        Some(unsafe { ptr::read_volatile(self.ptr.add(offset)) })
    }

    fn unmap(mut self) -> Result<()> {
        self.release().map_err(|source| PageReadError::Unmap {
            addr: self.ptr as usize,
            len: self.len,
            source,
        })
    }
}

impl Drop for PhysMapping {
    fn drop(&mut self) {
        if self.mapped {
            if let Err(e) = self.release() {
                warn!("munmap({:p}, {:#x}) failed: {}", self.ptr, self.len, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::PAGE_SIZE;
    use std::io::Write;

    fn backing_file(pages: usize) -> anyhow::Result<tempfile::NamedTempFile> {
        let mut file = tempfile::NamedTempFile::new()?;
        for page in 0..pages {
            file.write_all(&[page as u8 + 0x10; PAGE_SIZE])?;
        }
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_map_file_window() -> anyhow::Result<()> {
        let file = backing_file(4)?;
        let device = DevMemOpener.open(file.path(), CacheMode::Cached)?;
        assert_eq!(device.path(), file.path());
        let mapping = device.map(PhysAddr::new(PAGE_SIZE as u64), 2 * PAGE_SIZE)?;
        assert_eq!(mapping.len(), 2 * PAGE_SIZE);
        assert_eq!(mapping.base(), PhysAddr::new(PAGE_SIZE as u64));
        assert_eq!(mapping.read_byte(0), Some(0x11));
        assert_eq!(mapping.read_byte(PAGE_SIZE), Some(0x12));
        assert_eq!(mapping.read_byte(2 * PAGE_SIZE), None);
        mapping.unmap()?;
        Ok(())
    }

    #[test]
    fn test_open_missing_device() {
        let err = DevMemOpener
            .open(Path::new("/nonexistent/pageread/mem"), CacheMode::Uncached)
            .unwrap_err();
        match err {
            PageReadError::Open { flags, source, .. } => {
                assert_eq!(flags, "O_RDONLY | O_SYNC | O_DSYNC");
                assert_eq!(source.raw_os_error(), Some(libc::ENOENT));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_invalid_length() -> anyhow::Result<()> {
        let file = backing_file(1)?;
        let device = DevMemOpener.open(file.path(), CacheMode::Uncached)?;
        let err = device.map(PhysAddr::new(0), 0).unwrap_err();
        assert!(matches!(err, PageReadError::Map { len: 0, .. }));
        Ok(())
    }

    #[test]
    fn test_drop_unmaps() -> anyhow::Result<()> {
        let file = backing_file(1)?;
        let mapping = DevMemOpener
            .open(file.path(), CacheMode::Cached)?
            .map(PhysAddr::new(0), PAGE_SIZE)?;
        assert_eq!(mapping.read_byte(PAGE_SIZE - 1), Some(0x10));
        drop(mapping);
        Ok(())
    }
}
