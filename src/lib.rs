//! # pageread
//!
//! Reads a contiguous range of physical memory pages through the kernel's
//! physical memory device and sums up the bytes it touched.
//!
//! This crate re-exports [`pageread_core`]; the `pageread` executable lives in
//! the `pageread-bin` workspace member.
//!
//! ```no_run
//! use pageread::memory::{DevMemOpener, PhysAddr};
//! use pageread::{Request, read_pages};
//!
//! let request = Request {
//!     page_count: 4,
//!     bytes_per_page: 16,
//!     ..Request::new(PhysAddr::new(0x10_0000))
//! };
//! let summary = read_pages(&request, &mut DevMemOpener, &mut std::io::stdout())?;
//! println!("checksum {:#x}", summary.checksum.value());
//! # Ok::<(), pageread::PageReadError>(())
//! ```

pub use pageread_core::*;
