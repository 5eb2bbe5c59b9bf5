//! Utility functions and constants used throughout pageread.
//!
//! This module provides:
//! - Constants for page arithmetic and the device path ([`PAGE_SIZE`], [`DEVMEM_FILE`], etc.)
//! - C-style numeric literal parsing ([`parse_c_ulong`], [`parse_c_long`])

mod constants;
mod numeric;

pub use self::constants::*;
pub use self::numeric::{parse_c_long, parse_c_ulong};
