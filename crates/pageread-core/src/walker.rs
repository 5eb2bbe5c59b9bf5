//! Walking a mapped window page by page, accumulating a checksum and
//! optionally dumping the bytes.

use std::io::Write;

use log::{trace, warn};

use crate::error::Result;
use crate::memory::PhysWindow;
use crate::util::{DUMP_LINE_BYTES, PAGE_SIZE};

/// Running sum of every byte read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Checksum(u64);

impl Checksum {
    /// Adds one byte to the sum.
    pub fn accumulate(&mut self, byte: u8) {
        self.0 = self.0.wrapping_add(byte as u64);
    }

    /// The full sum.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The sum truncated to the width of a process exit status.
    ///
    /// ```
    /// use pageread_core::Checksum;
    ///
    /// let mut sum = Checksum::default();
    /// sum.accumulate(0xff);
    /// sum.accumulate(0x02);
    /// assert_eq!(sum.value(), 0x101);
    /// assert_eq!(sum.exit_status(), 0x01);
    /// ```
    pub fn exit_status(&self) -> u8 {
        self.0 as u8
    }
}

/// Reads the first `bytes_per_page` bytes of each of `page_count` pages.
#[derive(Clone, Copy, Debug)]
pub struct Walker {
    page_count: i64,
    bytes_per_page: i64,
    dump: bool,
}

impl Walker {
    /// Creates a walker. Non-positive extents walk nothing.
    pub fn new(page_count: i64, bytes_per_page: i64, dump: bool) -> Self {
        Walker {
            page_count,
            bytes_per_page,
            dump,
        }
    }

    /// Walks `window` and returns the checksum of all bytes read.
    ///
    /// With dumping enabled, `out` receives a `page: <n>` header per page and,
    /// for every byte at an in-page offset that is a non-zero multiple of 16,
    /// a line with that byte in hex. Offsets beyond the end of the window are
    /// not read.
    ///
    /// # Errors
    ///
    /// Returns [`crate::PageReadError::Output`] if writing the dump fails.
    pub fn walk<W: PhysWindow, O: Write>(&self, window: &W, out: &mut O) -> Result<Checksum> {
        let mut sum = Checksum::default();
        let mut truncated = false;
        for page in 0..self.page_count {
            if self.dump {
                writeln!(out, "page: {}", page)?;
            }
            let page_offset = (page as usize).saturating_mul(PAGE_SIZE);
            for j in 0..self.bytes_per_page {
                let Some(byte) = window.read_byte(page_offset.saturating_add(j as usize)) else {
                    if !truncated {
                        warn!(
                            "page {} byte {} lies beyond the {:#x} byte window, skipping the rest of the page",
                            page,
                            j,
                            window.len()
                        );
                        truncated = true;
                    }
                    break;
                };
                if self.dump && j > 0 && j % DUMP_LINE_BYTES == 0 {
                    writeln!(out, "{:02x} ", byte)?;
                }
                sum.accumulate(byte);
            }
            trace!("page {} done, running sum {:#x}", page, sum.value());
        }
        out.flush()?;
        Ok(sum)
    }
}
