//! Random-access stream over a chain of clusters.
//!
//! The clusters of a chain are scattered on the volume. [`FragmentedStream`] maps them
//! back to one logically contiguous byte range and implements [`Read`] and [`Seek`] over it.
//! Every read seeks the shared source to its absolute offset first, so streams over the
//! same source can be used in any interleaving.

use std::cell::RefCell;
use std::io::{self, Read, Seek, SeekFrom};

use super::bpb::Geometry;
use super::fat_error::FATError;
use crate::utils::read_up_to;

/// One cluster of a chain, located both on the volume and within the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FragmentInfo {
    /// Cluster number.
    pub cluster: u32,
    /// Absolute byte offset of the cluster in the source.
    pub offset: u64,
    /// Size in bytes of the fragment.
    pub size: u64,
    /// Logical offset of the first byte of the fragment within the chain.
    pub chain_start: u64,
    /// Logical offset one past the last byte of the fragment within the chain.
    pub chain_end: u64,
}

impl FragmentInfo {
    /// Maps every cluster of a chain to its fragment, in chain order.
    pub fn for_chain(geometry: &Geometry, clusters: &[u32]) -> Result<Vec<FragmentInfo>, FATError> {
        let size = geometry.bytes_per_cluster();
        let mut chain_start = 0;

        clusters
            .iter()
            .map(|&cluster| {
                let fragment = FragmentInfo {
                    cluster,
                    offset: geometry.cluster_offset(cluster)?,
                    size,
                    chain_start,
                    chain_end: chain_start + size,
                };
                chain_start += size;
                Ok(fragment)
            })
            .collect()
    }

    /// Whether the fragment shares at least one byte with `[start, end)`.
    fn overlaps(&self, start: u64, end: u64) -> bool {
        self.chain_start < end && start < self.chain_end
    }
}

/// A read-only, seekable view of a cluster chain.
///
/// The stream borrows the volume's byte source; the source's own cursor is never relied on.
pub struct FragmentedStream<'s, S> {
    source: &'s RefCell<S>,
    fragments: Vec<FragmentInfo>,
    size: u64,
    offset: u64,
}

impl<'s, S: Read + Seek> FragmentedStream<'s, S> {
    /// Creates a stream of `size` bytes over the given fragments.
    ///
    /// The size is capped to the capacity of the fragments.
    pub fn new(source: &'s RefCell<S>, fragments: Vec<FragmentInfo>, size: u64) -> Self {
        let capacity = fragments.last().map_or(0, |f| f.chain_end);
        FragmentedStream {
            source,
            fragments,
            size: size.min(capacity),
            offset: 0,
        }
    }

    /// The size in bytes of the stream.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn fragments(&self) -> &[FragmentInfo] {
        &self.fragments
    }

    /// The current logical position.
    pub fn tell(&self) -> u64 {
        self.offset
    }

    /// Reads up to `count` bytes from the current position.
    ///
    /// Fewer bytes are returned only when the end of the stream is reached.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>, FATError> {
        let remaining = usize::try_from(self.size.saturating_sub(self.offset)).unwrap_or(usize::MAX);
        let mut buf = vec![0; count.min(remaining)];
        let n = read_up_to(self, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }

    /// Reads the whole stream from its start.
    pub fn read_all(&mut self) -> Result<Vec<u8>, FATError> {
        self.offset = 0;
        let size = usize::try_from(self.size).map_err(|_| {
            FATError::SourceIO(io::Error::other("stream does not fit in memory"))
        })?;
        self.read_bytes(size)
    }
}

impl<S: Read + Seek> Read for FragmentedStream<'_, S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.size.saturating_sub(self.offset);
        let to_read = remaining.min(buf.len() as u64);
        if to_read == 0 {
            return Ok(0);
        }

        let start = self.offset;
        let end = start + to_read;
        let mut source = self
            .source
            .try_borrow_mut()
            .map_err(|_| io::Error::other("byte source is already in use"))?;

        let mut filled = 0;
        for fragment in self.fragments.iter().filter(|f| f.overlaps(start, end)) {
            let within = self.offset - fragment.chain_start;
            let count = (fragment.chain_end.min(end) - self.offset) as usize;

            let copied = source
                .seek(SeekFrom::Start(fragment.offset + within))
                .and_then(|_| source.read_exact(&mut buf[filled..filled + count]));
            match copied {
                Ok(()) => {}
                // Report the bytes of the earlier fragments; the next read surfaces the error.
                Err(_) if filled > 0 => return Ok(filled),
                Err(err) => return Err(err),
            }

            filled += count;
            self.offset += count as u64;
        }

        Ok(filled)
    }
}

impl<S: Read + Seek> Seek for FragmentedStream<'_, S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(off) => Some(off),
            SeekFrom::End(delta) => self.size.checked_add_signed(delta),
            SeekFrom::Current(delta) => self.offset.checked_add_signed(delta),
        };

        match target {
            Some(off) => {
                self.offset = off;
                Ok(off)
            }
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "invalid seek to a negative or overflowing position",
            )),
        }
    }
}
