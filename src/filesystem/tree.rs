//! Directory and file nodes of a mounted volume.
//!
//! Nodes are built on demand from their directory entry: the cluster chain is resolved
//! once, and a directory decodes its entries when it is built. Nothing is cached, so
//! indexing the same child twice yields two independent values.
//!
//! Nodes do not own their parent. Each node carries a [`NodeId`] into the volume's path
//! arena, which records `(name, parent)` pairs and rebuilds full paths.

use log::trace;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::io::{Read, Seek};

use super::dir_entry::{DirectoryEntry, ShortEntry, decode_entries};
use super::fat::Volume;
use super::fat_error::FATError;
use super::fragmented::FragmentedStream;

/// Index of a node in the path arena of its volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Arena of `(name, parent)` records, one per distinct node path.
#[derive(Debug, Default)]
pub(crate) struct PathArena {
    nodes: Vec<(String, Option<NodeId>)>,
    index: HashMap<(Option<NodeId>, String), NodeId>,
}

impl PathArena {
    /// Returns the id of the node named `name` under `parent`, recording it if new.
    pub(crate) fn intern(&mut self, parent: Option<NodeId>, name: &str) -> NodeId {
        let key = (parent, name.to_string());
        if let Some(id) = self.index.get(&key) {
            return *id;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push((key.1.clone(), parent));
        self.index.insert(key, id);
        id
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|(_, parent)| *parent)
    }

    /// Joins the names from the root down to `id` with `/`.
    pub(crate) fn path(&self, id: NodeId) -> String {
        let mut names = vec![];
        let mut current = Some(id);
        while let Some(NodeId(idx)) = current {
            let Some((name, parent)) = self.nodes.get(idx) else {
                break;
            };
            names.push(name.as_str());
            current = *parent;
        }
        names.reverse();

        let path = names.join("/");
        if path.is_empty() { String::from("/") } else { path }
    }
}

/// A directory of the volume.
pub struct Directory<'v, S> {
    volume: &'v Volume<S>,
    id: NodeId,
    entry: DirectoryEntry,
    clusters: Vec<u32>,
    entries: Vec<DirectoryEntry>,
}

/// A regular file of the volume.
pub struct File<'v, S> {
    volume: &'v Volume<S>,
    id: NodeId,
    entry: ShortEntry,
    clusters: Vec<u32>,
}

/// A file or a directory.
pub enum Node<'v, S> {
    Directory(Directory<'v, S>),
    File(File<'v, S>),
}

impl<'v, S: Read + Seek> Directory<'v, S> {
    /// Builds the root directory of a volume.
    pub(crate) fn root(volume: &'v Volume<S>) -> Result<Self, FATError> {
        let first_cluster = volume.geometry().root_cluster();
        Self::load(volume, DirectoryEntry::Root { first_cluster }, first_cluster, None)
    }

    /// Builds the directory described by a subdirectory entry.
    ///
    /// A first cluster of 0 is how a `..` record points to the root directory. Any other
    /// subdirectory entry without a cluster is an empty directory.
    fn from_entry(volume: &'v Volume<S>, entry: ShortEntry, parent: NodeId) -> Result<Self, FATError> {
        let first_cluster = match entry.cluster_number() {
            0 if entry.is_parent_link() => volume.geometry().root_cluster(),
            cluster => cluster,
        };
        Self::load(volume, DirectoryEntry::Subdirectory(entry), first_cluster, Some(parent))
    }

    fn load(
        volume: &'v Volume<S>,
        entry: DirectoryEntry,
        first_cluster: u32,
        parent: Option<NodeId>,
    ) -> Result<Self, FATError> {
        let clusters = volume.allocation_table().chain(first_cluster)?;
        let size = clusters.len() as u64 * volume.geometry().bytes_per_cluster();
        let mut stream = volume.stream(&clusters, size)?;
        let entries = decode_entries(&mut stream)?;

        let name = entry.name().unwrap_or_default();
        let id = volume.intern(parent, &name);
        trace!(
            "Loaded directory \"{}\": {} cluster(s), {} entries",
            name,
            clusters.len(),
            entries.len()
        );

        Ok(Directory {
            volume,
            id,
            entry,
            clusters,
            entries,
        })
    }

    /// The display name, empty for the root.
    pub fn name(&self) -> String {
        self.entry.name().unwrap_or_default()
    }

    /// The full path from the root, e.g. `/docs/drafts`.
    pub fn path(&self) -> String {
        self.volume.path_of(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The entry describing this directory: `Root` or `Subdirectory`.
    pub fn entry(&self) -> &DirectoryEntry {
        &self.entry
    }

    pub fn clusters(&self) -> &[u32] {
        &self.clusters
    }

    /// The size in bytes of the directory: its whole chain.
    pub fn size(&self) -> u64 {
        self.clusters.len() as u64 * self.volume.geometry().bytes_per_cluster()
    }

    /// Whether this is the `.` or `..` record of its parent.
    pub fn is_dot(&self) -> bool {
        matches!(&self.entry, DirectoryEntry::Subdirectory(e) if e.is_dot())
    }

    /// The decoded records of the directory, long filename records attached.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// Short entries of the regular files.
    pub fn files(&self) -> impl Iterator<Item = &ShortEntry> {
        self.entries.iter().filter_map(|e| match e {
            DirectoryEntry::File(short) => Some(short),
            _ => None,
        })
    }

    /// Short entries of the subdirectories, `.` and `..` included.
    pub fn directories(&self) -> impl Iterator<Item = &ShortEntry> {
        self.entries.iter().filter_map(|e| match e {
            DirectoryEntry::Subdirectory(short) => Some(short),
            _ => None,
        })
    }

    /// Builds a node for every file and subdirectory, in storage order.
    ///
    /// Labels, deleted entries and long filename records are skipped.
    pub fn children(&self) -> impl Iterator<Item = Result<Node<'v, S>, FATError>> + '_ {
        self.entries.iter().filter_map(|entry| self.child(entry))
    }

    fn child(&self, entry: &DirectoryEntry) -> Option<Result<Node<'v, S>, FATError>> {
        match entry {
            DirectoryEntry::Subdirectory(short) => Some(
                Directory::from_entry(self.volume, short.clone(), self.id).map(Node::Directory),
            ),
            DirectoryEntry::File(short) => {
                Some(File::from_entry(self.volume, short.clone(), self.id).map(Node::File))
            }
            DirectoryEntry::Available
            | DirectoryEntry::Deleted(_)
            | DirectoryEntry::Label(_)
            | DirectoryEntry::LongFileName(_)
            | DirectoryEntry::Root { .. } => None,
        }
    }

    /// Finds the entry of a file or subdirectory by display name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&DirectoryEntry> {
        let wanted = name.to_lowercase();
        self.entries.iter().find(|entry| match entry {
            DirectoryEntry::File(short) | DirectoryEntry::Subdirectory(short) => {
                short.name().to_lowercase() == wanted
            }
            DirectoryEntry::Available
            | DirectoryEntry::Deleted(_)
            | DirectoryEntry::Label(_)
            | DirectoryEntry::LongFileName(_)
            | DirectoryEntry::Root { .. } => false,
        })
    }

    /// Builds the node of a file or subdirectory found by [`Directory::lookup`].
    ///
    /// # Errors
    /// - `FATError::NotFound` if no child has this name
    pub fn get(&self, name: &str) -> Result<Node<'v, S>, FATError> {
        self.lookup(name)
            .and_then(|entry| self.child(entry))
            .unwrap_or_else(|| Err(FATError::NotFound(name.to_string())))
    }

    /// A stream over the raw records of the directory.
    pub fn reader(&self) -> Result<FragmentedStream<'v, S>, FATError> {
        self.volume.stream(&self.clusters, self.size())
    }
}

impl<'v, S: Read + Seek> File<'v, S> {
    fn from_entry(volume: &'v Volume<S>, entry: ShortEntry, parent: NodeId) -> Result<Self, FATError> {
        let clusters = volume.allocation_table().chain(entry.cluster_number())?;
        let id = volume.intern(Some(parent), &entry.name());
        Ok(File {
            volume,
            id,
            entry,
            clusters,
        })
    }

    pub fn name(&self) -> String {
        self.entry.name()
    }

    /// The full path from the root, e.g. `/docs/readme.txt`.
    pub fn path(&self) -> String {
        self.volume.path_of(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn entry(&self) -> &ShortEntry {
        &self.entry
    }

    pub fn clusters(&self) -> &[u32] {
        &self.clusters
    }

    /// The size in bytes declared by the directory entry.
    pub fn size(&self) -> u64 {
        self.entry.file_size().into()
    }

    /// A stream over the file content.
    ///
    /// The stream is cut to the chain capacity if the declared size exceeds it.
    pub fn reader(&self) -> Result<FragmentedStream<'v, S>, FATError> {
        self.volume.stream(&self.clusters, self.size())
    }

    /// Reads the whole file content.
    pub fn read_all(&self) -> Result<Vec<u8>, FATError> {
        self.reader()?.read_all()
    }
}

impl<'v, S: Read + Seek> Node<'v, S> {
    pub fn name(&self) -> String {
        match self {
            Node::Directory(dir) => dir.name(),
            Node::File(file) => file.name(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Node::Directory(dir) => dir.path(),
            Node::File(file) => file.path(),
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::Directory(dir) => dir.id(),
            Node::File(file) => file.id(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            Node::Directory(dir) => dir.size(),
            Node::File(file) => file.size(),
        }
    }

    pub fn clusters(&self) -> &[u32] {
        match self {
            Node::Directory(dir) => dir.clusters(),
            Node::File(file) => file.clusters(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// A stream over the node content: records for a directory, data for a file.
    pub fn reader(&self) -> Result<FragmentedStream<'v, S>, FATError> {
        match self {
            Node::Directory(dir) => dir.reader(),
            Node::File(file) => file.reader(),
        }
    }
}

impl<S> Clone for Directory<'_, S> {
    fn clone(&self) -> Self {
        Directory {
            volume: self.volume,
            id: self.id,
            entry: self.entry.clone(),
            clusters: self.clusters.clone(),
            entries: self.entries.clone(),
        }
    }
}

impl<S> Clone for File<'_, S> {
    fn clone(&self) -> Self {
        File {
            volume: self.volume,
            id: self.id,
            entry: self.entry.clone(),
            clusters: self.clusters.clone(),
        }
    }
}

impl<S> fmt::Debug for Directory<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directory")
            .field("id", &self.id)
            .field("entry", &self.entry)
            .field("clusters", &self.clusters)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<S> fmt::Debug for File<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("File")
            .field("id", &self.id)
            .field("entry", &self.entry)
            .field("clusters", &self.clusters)
            .finish()
    }
}

impl<S> fmt::Debug for Node<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Directory(dir) => fmt::Debug::fmt(dir, f),
            Node::File(file) => fmt::Debug::fmt(file, f),
        }
    }
}

/// Breadth-first iterator over every node below the root, see [`Volume::walk`].
///
/// The `.` and `..` records are not followed. A subdirectory whose first cluster was
/// already visited ends the walk with `FATError::BrokenChain`, as does any other error.
pub struct Walk<'v, S> {
    volume: &'v Volume<S>,
    queue: VecDeque<Directory<'v, S>>,
    pending: VecDeque<Node<'v, S>>,
    visited: HashSet<u32>,
    started: bool,
    done: bool,
}

impl<'v, S: Read + Seek> Walk<'v, S> {
    pub(crate) fn new(volume: &'v Volume<S>) -> Self {
        Walk {
            volume,
            queue: VecDeque::new(),
            pending: VecDeque::new(),
            visited: HashSet::new(),
            started: false,
            done: false,
        }
    }

    fn fail(&mut self, err: FATError) -> Option<Result<Node<'v, S>, FATError>> {
        self.done = true;
        self.queue.clear();
        self.pending.clear();
        self.visited.clear();
        Some(Err(err))
    }
}

impl<'v, S: Read + Seek> Iterator for Walk<'v, S> {
    type Item = Result<Node<'v, S>, FATError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.pending.pop_front() {
                return Some(Ok(node));
            }
            if self.done {
                return None;
            }
            if !self.started {
                self.started = true;
                match Directory::root(self.volume) {
                    Ok(root) => {
                        self.visited.extend(root.clusters().first());
                        self.queue.push_back(root);
                    }
                    Err(err) => return self.fail(err),
                }
            }

            let Some(dir) = self.queue.pop_front() else {
                self.done = true;
                return None;
            };
            let children = dir
                .entries()
                .iter()
                .filter(|e| !e.short_entry().is_some_and(ShortEntry::is_dot))
                .filter_map(|e| dir.child(e));
            for child in children {
                match child {
                    Ok(Node::Directory(sub)) => match sub.clusters().first() {
                        Some(&cluster) if !self.visited.insert(cluster) => {
                            return self.fail(FATError::broken_chain(cluster, "directory cycle"));
                        }
                        Some(_) => {
                            self.queue.push_back(sub.clone());
                            self.pending.push_back(Node::Directory(sub));
                        }
                        None => self.pending.push_back(Node::Directory(sub)),
                    },
                    Ok(file) => self.pending.push_back(file),
                    Err(err) => return self.fail(err),
                }
            }
        }
    }
}
