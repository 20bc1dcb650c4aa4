//! FAT32 filesystem decoding.
//!
//! Components, leaves first:
//! - [`bpb`]: boot sector, EBPB and FSInfo sector, decoded into a [`Geometry`]
//! - [`alloc_table`]: the allocation table and cluster chains
//! - [`fragmented`]: a seekable stream over the clusters of a chain
//! - [`dir_entry`]: directory records and long filename reconstruction
//! - [`tree`]: directory and file nodes, path reconstruction and tree walk
//! - [`fat`]: the mounted [`Volume`]

pub mod alloc_table;
pub mod bpb;
pub mod dir_entry;
pub mod fat;
pub mod fat_error;
pub mod fat_type;
pub mod fragmented;
pub mod tree;

pub use alloc_table::{AllocationTable, Link};
pub use bpb::{Geometry, MountOptions};
pub use dir_entry::{DirectoryEntry, LongNameEntry, ShortEntry};
pub use fat::Volume;
pub use fat_error::FATError;
pub use fat_type::FATType;
pub use fragmented::{FragmentInfo, FragmentedStream};
pub use tree::{Directory, File, Node, NodeId, Walk};
