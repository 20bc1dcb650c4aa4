//! The FAT32 File Allocation Table.
//!
//! The first FAT copy is loaded once into a map from cluster number to its link.
//! Free clusters are not stored, so walking into one is reported as a broken chain.

use log::{debug, trace};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::{Read, Seek, SeekFrom};

use super::bpb::Geometry;
use super::fat_error::FATError;
use crate::constants::{FAT32_ENTRY_MASK, FAT32_ENTRY_SIZE, FIRST_DATA_CLUSTER};
use crate::utils::{read_exact_at, u32_at};

const BAD_CLUSTER: u32 = 0x0FFF_FFF7;
const END_OF_CHAIN_MIN: u32 = 0x0FFF_FFF8;
const LINK_MAX: u32 = 0x0FFF_FFEF;

/// The content of an allocated FAT entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// The chain continues with this cluster.
    Next(u32),
    /// The cluster is the last one of its chain.
    EndOfChain,
}

/// In-memory copy of the allocation table.
#[derive(Debug, Clone, Default)]
pub struct AllocationTable {
    links: HashMap<u32, Link>,
    bad_clusters: BTreeSet<u32>,
    media_descriptor: u8,
    end_of_chain_marker: u32,
}

impl AllocationTable {
    /// Reads the first FAT of the volume.
    ///
    /// # Parameters
    /// - `source`: The byte source containing the volume
    /// - `geometry`: The geometry locating the table
    ///
    /// # Errors
    /// - `FATError::UnsupportedFormat` if the table extends past the end of the source
    /// - `FATError::SourceIO` if the table cannot be read
    pub fn load<T: Read + Seek>(source: &mut T, geometry: &Geometry) -> Result<Self, FATError> {
        let source_len = source.seek(SeekFrom::End(0))?;
        let fat_end = geometry.fat_offset().saturating_add(geometry.fat_size());
        if fat_end > source_len {
            return Err(FATError::UnsupportedFormat(format!(
                "FAT of {} bytes at offset {} extends past the end of the {}-byte source",
                geometry.fat_size(),
                geometry.fat_offset(),
                source_len
            )));
        }

        let len = usize::try_from(geometry.fat_size()).map_err(|_| {
            FATError::UnsupportedFormat(format!(
                "FAT of {} bytes does not fit in memory",
                geometry.fat_size()
            ))
        })?;
        let mut buf = vec![0; len];
        read_exact_at(source, geometry.fat_offset(), &mut buf)?;

        let table = Self::from_bytes(&buf);
        debug!(
            "Loaded FAT: {} allocated entries, {} bad clusters",
            table.links.len(),
            table.bad_clusters.len()
        );
        Ok(table)
    }

    /// Builds the table from the raw bytes of a FAT copy.
    ///
    /// The first two entries hold the media descriptor and the end-of-chain marker
    /// and are not cluster links.
    pub fn from_bytes(buf: &[u8]) -> Self {
        let mut table = AllocationTable::default();
        if buf.len() >= 2 * FAT32_ENTRY_SIZE {
            table.media_descriptor = buf[0];
            table.end_of_chain_marker = u32_at(buf, FAT32_ENTRY_SIZE) & FAT32_ENTRY_MASK;
        }

        let entries = buf.len() / FAT32_ENTRY_SIZE;
        for idx in FIRST_DATA_CLUSTER as usize..entries {
            let cluster = idx as u32;
            match u32_at(buf, idx * FAT32_ENTRY_SIZE) & FAT32_ENTRY_MASK {
                0 => {}
                v @ FIRST_DATA_CLUSTER..=LINK_MAX => {
                    table.links.insert(cluster, Link::Next(v));
                }
                BAD_CLUSTER => {
                    table.bad_clusters.insert(cluster);
                }
                END_OF_CHAIN_MIN..=FAT32_ENTRY_MASK => {
                    table.links.insert(cluster, Link::EndOfChain);
                }
                // Value 1 and the reserved range 0x0FFFFFF0..=0x0FFFFFF6.
                _ => {}
            }
        }
        table
    }

    /// Returns the link stored for an allocated cluster.
    pub fn link(&self, cluster: u32) -> Option<Link> {
        self.links.get(&cluster).copied()
    }

    pub fn is_bad(&self, cluster: u32) -> bool {
        self.bad_clusters.contains(&cluster)
    }

    pub fn bad_clusters(&self) -> &BTreeSet<u32> {
        &self.bad_clusters
    }

    /// The count of clusters that are part of a chain.
    pub fn allocated_count(&self) -> usize {
        self.links.len()
    }

    /// The media descriptor copied into the low byte of entry 0.
    pub fn media_descriptor(&self) -> u8 {
        self.media_descriptor
    }

    /// The end-of-chain marker stored in entry 1.
    pub fn end_of_chain_marker(&self) -> u32 {
        self.end_of_chain_marker
    }

    /// Walks a cluster chain lazily from its first cluster.
    ///
    /// A first cluster of 0 denotes an empty chain. Every yielded cluster is allocated;
    /// the iterator yields a single `FATError::BrokenChain` and stops if the chain reaches
    /// a reserved, free or bad cluster, or revisits a cluster.
    pub fn chain_from(&self, start: u32) -> ClusterChain<'_> {
        ClusterChain {
            table: self,
            next: (start != 0).then_some(start),
            visited: HashSet::new(),
        }
    }

    /// Resolves a whole chain.
    pub fn chain(&self, start: u32) -> Result<Vec<u32>, FATError> {
        let clusters = self.chain_from(start).collect::<Result<Vec<_>, _>>()?;
        trace!("Chain from cluster {start}: {} cluster(s)", clusters.len());
        Ok(clusters)
    }
}

/// Iterator over the clusters of a chain, see [`AllocationTable::chain_from`].
pub struct ClusterChain<'t> {
    table: &'t AllocationTable,
    next: Option<u32>,
    visited: HashSet<u32>,
}

impl Iterator for ClusterChain<'_> {
    type Item = Result<u32, FATError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cluster = self.next.take()?;

        if cluster < FIRST_DATA_CLUSTER {
            return Some(Err(FATError::broken_chain(cluster, "reserved cluster number")));
        }
        if !self.visited.insert(cluster) {
            return Some(Err(FATError::broken_chain(cluster, "cycle in cluster chain")));
        }

        match self.table.link(cluster) {
            Some(Link::Next(next)) => self.next = Some(next),
            Some(Link::EndOfChain) => {}
            None if self.table.is_bad(cluster) => {
                return Some(Err(FATError::broken_chain(cluster, "bad cluster in chain")));
            }
            None => {
                return Some(Err(FATError::broken_chain(cluster, "free cluster in chain")));
            }
        }
        Some(Ok(cluster))
    }
}
