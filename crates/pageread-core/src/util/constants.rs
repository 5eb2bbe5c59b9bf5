/// Page shift value (12 bits) for 4KB pages
pub const PAGE_SHIFT: usize = 12;
/// Page size assumed for every mapping (4096 bytes).
///
/// This is fixed and never queried from the OS, so it is wrong on platforms
/// whose native page size differs (e.g. 16K or 64K arm64 kernels).
pub const PAGE_SIZE: usize = 1 << PAGE_SHIFT;
/// Mask for extracting page offset
pub const PAGE_MASK: usize = PAGE_SIZE - 1;

/// Physical memory character device
pub const DEVMEM_FILE: &str = "/dev/mem";

/// Default number of pages to span
pub const NPAGES: i64 = 1;
/// Default number of bytes to read from each page
pub const NBYTES: i64 = 1;

/// Number of bytes after which the dump emits a line break
pub const DUMP_LINE_BYTES: i64 = 16;
