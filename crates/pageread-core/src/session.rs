use std::io::Write;

use log::{debug, info};

use crate::error::Result;
use crate::memory::{DeviceOpener, MapPhys, PhysWindow};
use crate::request::Request;
use crate::util::PAGE_SIZE;
use crate::walker::{Checksum, Walker};

/// Outcome of a successful [`read_pages`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    /// Number of pages spanned
    pub page_count: i64,
    /// Number of bytes read from each page
    pub bytes_per_page: i64,
    /// Sum of every byte read
    pub checksum: Checksum,
}

/// Length of the mapping backing `page_count` pages.
///
/// The signed count is reinterpreted as an unsigned size, so a negative count
/// yields a length the kernel refuses to map.
pub fn mapping_len(page_count: i64) -> usize {
    (page_count as usize).wrapping_mul(PAGE_SIZE)
}

/// Validates `request`, maps the requested physical window through `opener`,
/// walks it and tears the mapping down again.
///
/// Informational lines (device opened, optional dump, summary) go to `out`.
/// The checksum is only returned after the window was unmapped successfully.
/// The device is released on every path, including failures.
///
/// # Errors
///
/// * validation errors, before the device is touched
/// * [`crate::PageReadError::Open`], [`crate::PageReadError::Map`] and
///   [`crate::PageReadError::Unmap`] from the device
/// * [`crate::PageReadError::Output`] if writing to `out` fails
pub fn read_pages<D: DeviceOpener, O: Write>(
    request: &Request,
    opener: &mut D,
    out: &mut O,
) -> Result<Summary> {
    request.validate()?;
    debug!("{:?}", request);

    let device = opener.open(&request.device, request.cache_mode)?;
    writeln!(out, "{} opened", request.device.display())?;

    let len = mapping_len(request.page_count);
    let mapping = device.map(request.phys_addr.page_base(), len)?;
    info!(
        "reading {} bytes from each of {} pages at {:p}",
        request.bytes_per_page,
        request.page_count,
        mapping.base()
    );

    let checksum =
        Walker::new(request.page_count, request.bytes_per_page, request.dump).walk(&mapping, out)?;
    mapping.unmap()?;

    writeln!(
        out,
        "{} pages touched ({} bytes in each page)",
        request.page_count, request.bytes_per_page
    )?;
    info!("checksum {:#x}", checksum.value());
    Ok(Summary {
        page_count: request.page_count,
        bytes_per_page: request.bytes_per_page,
        checksum,
    })
}
