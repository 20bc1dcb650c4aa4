/// The size in bytes of a directory entry, short or long-name continuation.
pub const DIR_ENTRY_SIZE: usize = 32;

/// The size in bytes of a FAT32 allocation table entry.
pub const FAT32_ENTRY_SIZE: usize = 4;

/// The top four bits of a FAT32 entry are reserved.
pub const FAT32_ENTRY_MASK: u32 = 0x0FFF_FFFF;

/// The first cluster number of the data region. Clusters 0 and 1 are reserved.
pub const FIRST_DATA_CLUSTER: u32 = 2;
