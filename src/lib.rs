//!
//! FAT Explorer: a library and CLI for reading FAT32 volume images without mounting them.
//!
//! This crate provides tools for:
//! - Decoding the FAT32 boot structures and allocation table
//! - Reading files and directories stored as scattered cluster chains
//! - Reconstructing long filenames
//! - Resolving paths and walking the directory tree
//!
//! Everything is read-only and works over any `Read + Seek` byte source.
//!
//! # Re-exports
//! - [`Volume`]: A mounted FAT32 volume
//! - [`Node`], [`Directory`], [`File`]: Nodes of the directory tree
//! - [`FATError`]: The error type of every operation

pub mod commands;
pub mod constants;
pub mod filesystem;
pub mod utils;

/// A mounted FAT32 volume (see [`filesystem::fat::Volume`]).
pub use crate::filesystem::fat::Volume;
/// Mount options (see [`filesystem::bpb::MountOptions`]).
pub use crate::filesystem::bpb::MountOptions;
/// Errors of the volume operations (see [`filesystem::fat_error::FATError`]).
pub use crate::filesystem::fat_error::FATError;
/// Nodes of the directory tree (see [`filesystem::tree`]).
pub use crate::filesystem::tree::{Directory, File, Node};
