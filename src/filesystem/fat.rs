//! FAT32 volume structure and operations.
//!
//! This module implements the entry point to a FAT32 volume:
//! - Decoding the boot structures into a [`Geometry`]
//! - Loading the allocation table
//! - Resolving paths and walking the directory tree
//!
//! The byte source is a single cursor shared by every stream of the volume, so a
//! `Volume` is not `Sync`. Wrap it in a mutex to share it between threads.

use log::info;
use std::cell::RefCell;
use std::io::{Read, Seek};

use super::alloc_table::AllocationTable;
use super::bpb::{Geometry, MountOptions};
use super::fat_error::FATError;
use super::fragmented::{FragmentInfo, FragmentedStream};
use super::tree::{Directory, Node, NodeId, PathArena, Walk};

/// A mounted FAT32 volume.
pub struct Volume<S> {
    source: RefCell<S>,
    geometry: Geometry,
    fat: AllocationTable,
    paths: RefCell<PathArena>,
}

impl<S: Read + Seek> Volume<S> {
    /// Mounts the volume held by `source` with the default options.
    pub fn open(source: S) -> Result<Self, FATError> {
        Self::open_with(source, MountOptions::default())
    }

    /// Mounts the volume held by `source`.
    ///
    /// # Parameters
    /// - `source`: The byte source, starting with the boot sector
    /// - `options`: Mount options
    ///
    /// # Returns
    /// - `Ok(Volume)`: The volume, with a decodable root directory
    /// - `Err(FATError)`: The first structural problem found
    pub fn open_with(mut source: S, options: MountOptions) -> Result<Self, FATError> {
        let geometry = Geometry::decode(&mut source, options)?;
        let fat = AllocationTable::load(&mut source, &geometry)?;

        let volume = Volume {
            source: RefCell::new(source),
            geometry,
            fat,
            paths: RefCell::new(PathArena::default()),
        };

        let root = volume.root()?;
        info!(
            "Mounted {} volume \"{}\": root directory holds {} entries",
            volume.geometry.fat_type(),
            volume.geometry.volume_label(),
            root.entries().len()
        );

        Ok(volume)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn allocation_table(&self) -> &AllocationTable {
        &self.fat
    }

    /// Builds the root directory.
    pub fn root(&self) -> Result<Directory<'_, S>, FATError> {
        Directory::root(self)
    }

    /// Resolves an absolute path, e.g. `/docs/readme.txt`, to its node.
    ///
    /// Segments are matched case-insensitively; empty segments are ignored. The empty path
    /// and `/` resolve to the root.
    ///
    /// # Errors
    /// - `FATError::NotFound` if a segment matches nothing, or if a file is followed by more
    ///   segments or by a trailing `/`
    pub fn resolve(&self, path: &str) -> Result<Node<'_, S>, FATError> {
        let not_found = || FATError::NotFound(path.to_string());
        let mut node = Node::Directory(self.root()?);

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            let Node::Directory(dir) = node else {
                return Err(not_found());
            };
            node = match dir.get(segment) {
                Err(FATError::NotFound(_)) => return Err(not_found()),
                other => other?,
            };
        }

        if path.ends_with('/') && !node.is_dir() {
            return Err(not_found());
        }
        Ok(node)
    }

    /// Iterates breadth-first over every file and directory below the root.
    ///
    /// Each call starts a new walk.
    pub fn walk(&self) -> Walk<'_, S> {
        Walk::new(self)
    }

    /// The full path of a node.
    pub fn path_of(&self, id: NodeId) -> String {
        self.paths.borrow().path(id)
    }

    /// The parent of a node, `None` for the root.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.paths.borrow().parent(id)
    }

    /// Releases the byte source.
    pub fn into_inner(self) -> S {
        self.source.into_inner()
    }

    pub(crate) fn intern(&self, parent: Option<NodeId>, name: &str) -> NodeId {
        self.paths.borrow_mut().intern(parent, name)
    }

    /// A stream of `size` bytes over a resolved chain.
    pub(crate) fn stream(&self, clusters: &[u32], size: u64) -> Result<FragmentedStream<'_, S>, FATError> {
        let fragments = FragmentInfo::for_chain(&self.geometry, clusters)?;
        Ok(FragmentedStream::new(&self.source, fragments, size))
    }
}
