//! Enum for the FAT types the geometry decoder can report.
//!
//! Only FAT32 volumes can be mounted. FAT12 is not distinguished from FAT16:
//! any volume whose 32-bit total sector field is zero is labelled FAT16.

use std::fmt;

/// Represents the types of FAT filesystems the boot sector can describe.
///
/// # Values
/// - `FAT16`: 12 or 16-bit File Allocation Table entries
/// - `FAT32`: 32-bit File Allocation Table entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FATType {
    FAT16,
    FAT32,
}

impl FATType {
    /// Detects the FAT type from the two total sector fields of the boot sector.
    ///
    /// A non-zero 32-bit field means FAT32. The FAT12/FAT16 boundary (4085 clusters)
    /// resolves to FAT16 on both sides.
    #[allow(clippy::if_same_then_else)]
    pub fn detect(tot_sec_16: u16, tot_sec_32: u32) -> Self {
        if tot_sec_32 != 0 {
            FATType::FAT32
        } else if tot_sec_16 >= 4085 {
            FATType::FAT16
        } else {
            FATType::FAT16
        }
    }
}

impl fmt::Display for FATType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FATType::FAT16 => "FAT16",
            FATType::FAT32 => "FAT32",
        };
        write!(f, "{s}")
    }
}
