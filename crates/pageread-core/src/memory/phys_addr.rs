use std::fmt::{Debug, Formatter};
use std::ops::Add;

use crate::util::PAGE_MASK;

#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Host physical address (HPA).
///
/// A newtype wrapper around a raw physical address as handed to `/dev/mem`.
pub struct PhysAddr(u64);

impl Debug for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("PhysAddr(0x{:02x})", self.0))
    }
}

impl PhysAddr {
    /// Creates a new physical address.
    pub const fn new(addr: u64) -> Self {
        PhysAddr(addr)
    }

    /// Returns the address as a u64.
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Returns true for the null physical address.
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if no bits below the page size are set.
    ///
    /// ```
    /// use pageread_core::memory::PhysAddr;
    ///
    /// assert!(PhysAddr::new(0x2000).is_page_aligned());
    /// assert!(!PhysAddr::new(0x2001).is_page_aligned());
    /// ```
    pub const fn is_page_aligned(&self) -> bool {
        (self.0 & PAGE_MASK as u64) == 0
    }

    /// Returns the address of the page containing `self`.
    pub const fn page_base(&self) -> PhysAddr {
        PhysAddr(self.0 & !(PAGE_MASK as u64))
    }
}

impl From<u64> for PhysAddr {
    fn from(addr: u64) -> Self {
        PhysAddr(addr)
    }
}

impl From<PhysAddr> for u64 {
    fn from(addr: PhysAddr) -> u64 {
        addr.0
    }
}

impl std::fmt::LowerHex for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        std::fmt::LowerHex::fmt(&self.0, f)
    }
}

impl std::fmt::Pointer for PhysAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl Add<u64> for PhysAddr {
    type Output = PhysAddr;

    fn add(self, rhs: u64) -> Self::Output {
        PhysAddr(self.0 + rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::PhysAddr;

    #[test]
    fn test_page_base() {
        assert_eq!(PhysAddr::new(0x1fff).page_base(), PhysAddr::new(0x1000));
        assert_eq!(PhysAddr::new(0x1000).page_base(), PhysAddr::new(0x1000));
        assert_eq!(PhysAddr::new(0xfff).page_base(), PhysAddr::new(0));
    }

    #[test]
    fn test_formatting() {
        let addr = PhysAddr::new(0xfee0_0000);
        assert_eq!(format!("{:?}", addr), "PhysAddr(0xfee00000)");
        assert_eq!(format!("{:p}", addr), "0xfee00000");
        assert_eq!(format!("{:#x}", addr + 0x10), "0xfee00010");
    }
}
