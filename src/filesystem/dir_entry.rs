//! FAT directory entry structures and parsing.
//!
//! This module implements the 32-byte directory records of a FAT volume:
//! - Short (8.3) entries describing files, subdirectories and the volume label
//! - Long filename continuation records, stored before the short entry they decorate
//! - The [`decode_entries`] state machine, attaching each long filename group to its
//!   short entry

use binread::{BinRead, BinReaderExt};
use getset::{CopyGetters, Getters};
use log::{trace, warn};
use std::fmt;
use std::io::{self, Read};

use super::fat_error::FATError;
use crate::constants::DIR_ENTRY_SIZE;
use crate::utils::{read_up_to, trim_padded};

/// Attribute bits of a directory entry.
pub mod attributes {
    pub const READ_ONLY: u8 = 0x01;
    pub const HIDDEN: u8 = 0x02;
    pub const SYSTEM: u8 = 0x04;
    pub const LABEL: u8 = 0x08;
    pub const DIRECTORY: u8 = 0x10;
    pub const ARCHIVE: u8 = 0x20;
    /// The combination marking a long filename continuation record.
    pub const LONG_NAME: u8 = READ_ONLY | HIDDEN | SYSTEM | LABEL;
}

/// First byte of an entry that is free, and of every entry after it.
const AVAILABLE_MARK: u8 = 0x00;
/// First byte of a deleted entry.
const DELETED_MARK: u8 = 0xE5;
/// Stands for a real 0xE5 first character, which would otherwise read as deleted.
const KANJI_E5_MARK: u8 = 0x05;
/// Flag of the sequence byte set on the last (first stored) record of a long filename.
const LAST_LONG_ENTRY: u8 = 0x40;
/// Count of UTF-16 code units held by one long filename record.
pub const LONG_NAME_UNITS: usize = 13;

/// FAT short directory entry.
///
/// Each directory entry is exactly 32 bytes and contains metadata about a file or directory.
/// Timestamps are kept in their raw on-disk encoding.
#[derive(BinRead, Debug, Clone, Getters, CopyGetters)]
#[br(little)]
pub struct ShortEntry {
    /// Base name, space padded
    name: [u8; 8],
    /// Extension, space padded
    ext: [u8; 3],
    /// File attributes byte
    #[get_copy = "pub"]
    attr: u8,
    /// NT reserved
    #[get_copy = "pub"]
    nt_res: u8,
    /// Creation time in 10ms units
    #[get_copy = "pub"]
    crt_time_tenth: u8,
    /// Creation time
    #[get_copy = "pub"]
    crt_time: u16,
    /// Creation date
    #[get_copy = "pub"]
    crt_date: u16,
    /// Last access date
    #[get_copy = "pub"]
    lst_acc_date: u16,
    /// High 16 bits of first cluster number
    fst_clus_hi: u16,
    /// Last write time
    #[get_copy = "pub"]
    wrt_time: u16,
    /// Last write date
    #[get_copy = "pub"]
    wrt_date: u16,
    /// Low 16 bits of first cluster number
    fst_clus_lo: u16,
    /// File size in bytes (0 for directories)
    #[get_copy = "pub"]
    file_size: u32,
    /// Long filename records decorating this entry, highest sequence number first
    #[br(default)]
    #[get = "pub"]
    long_name_entries: Vec<LongNameEntry>,
}

impl ShortEntry {
    /// Returns the complete first cluster number for this entry.
    ///
    /// Combines `fst_clus_hi` and `fst_clus_lo`: `(fst_clus_hi << 16) | fst_clus_lo`
    pub fn cluster_number(&self) -> u32 {
        (u32::from(self.fst_clus_hi) << 16) | u32::from(self.fst_clus_lo)
    }

    /// The 11 raw bytes of the 8.3 name.
    pub fn raw_name(&self) -> [u8; 11] {
        let mut raw = [0; 11];
        raw[..8].copy_from_slice(&self.name);
        raw[8..].copy_from_slice(&self.ext);
        raw
    }

    /// The 8.3 name as stored, e.g. `README.TXT`.
    pub fn short_name(&self) -> String {
        let mut name = self.name;
        if name[0] == KANJI_E5_MARK {
            name[0] = DELETED_MARK;
        }
        let base = trim_padded(&name);
        let ext = trim_padded(&self.ext);

        if ext.is_empty() {
            base
        } else {
            format!("{base}.{ext}")
        }
    }

    /// The long filename reconstructed from the continuation records, if any.
    pub fn long_name(&self) -> Option<String> {
        if self.long_name_entries.is_empty() {
            return None;
        }

        let mut units: Vec<u16> = self
            .long_name_entries
            .iter()
            .rev()
            .flat_map(LongNameEntry::units)
            .collect();
        if let Some(nul) = units.iter().position(|u| *u == 0) {
            units.truncate(nul);
        }
        Some(String::from_utf16_lossy(&units))
    }

    /// The display name: the long filename if present, else the lowercased 8.3 name.
    pub fn name(&self) -> String {
        self.long_name()
            .unwrap_or_else(|| self.short_name().to_lowercase())
    }

    /// The checksum of the 8.3 name, as carried by its long filename records.
    pub fn checksum(&self) -> u8 {
        self.raw_name()
            .iter()
            .fold(0u8, |sum, b| sum.rotate_right(1).wrapping_add(*b))
    }

    /// Whether every long filename record carries the checksum of this entry's 8.3 name.
    pub fn checksum_matches(&self) -> bool {
        let checksum = self.checksum();
        self.long_name_entries
            .iter()
            .all(|lfn| lfn.checksum() == checksum)
    }

    /// Whether this is one of the `.` and `..` records of a subdirectory.
    pub fn is_dot(&self) -> bool {
        self.name[0] == b'.'
    }

    /// Whether this is the `..` record, pointing at the parent directory.
    pub fn is_parent_link(&self) -> bool {
        &self.raw_name() == b"..         "
    }

    pub fn is_read_only(&self) -> bool {
        self.attr & attributes::READ_ONLY != 0
    }

    pub fn is_hidden(&self) -> bool {
        self.attr & attributes::HIDDEN != 0
    }

    pub fn is_system(&self) -> bool {
        self.attr & attributes::SYSTEM != 0
    }

    pub fn is_label(&self) -> bool {
        self.attr & attributes::LABEL != 0
    }

    /// Checks if the directory attribute bit (0x10) is set in the attributes field
    pub fn is_dir(&self) -> bool {
        self.attr & attributes::DIRECTORY != 0
    }

    pub fn is_archive(&self) -> bool {
        self.attr & attributes::ARCHIVE != 0
    }
}

/// Long filename continuation record.
///
/// Holds 13 UTF-16 code units of a long filename, split over three fields.
#[derive(BinRead, Debug, Clone, CopyGetters)]
#[br(little)]
pub struct LongNameEntry {
    /// Sequence number in the low 6 bits, 0x40 flag on the last record
    #[get_copy = "pub"]
    ord: u8,
    name1: [u16; 5],
    /// Always `attributes::LONG_NAME`
    _attr: u8,
    /// Record type, 0 for name records
    #[get_copy = "pub"]
    entry_type: u8,
    /// Checksum of the decorated 8.3 name
    #[get_copy = "pub"]
    checksum: u8,
    name2: [u16; 6],
    /// Always 0
    _fst_clus_lo: u16,
    name3: [u16; 2],
}

impl LongNameEntry {
    pub fn sequence_number(&self) -> u8 {
        self.ord & 0x3F
    }

    /// Whether this record holds the last segment of the name. It is stored first.
    pub fn is_last(&self) -> bool {
        self.ord & LAST_LONG_ENTRY != 0
    }

    /// The 13 UTF-16 code units of this segment, padding included.
    pub fn units(&self) -> [u16; LONG_NAME_UNITS] {
        let mut units = [0; LONG_NAME_UNITS];
        units[..5].copy_from_slice(&self.name1);
        units[5..11].copy_from_slice(&self.name2);
        units[11..].copy_from_slice(&self.name3);
        units
    }
}

/// A classified 32-byte directory record.
#[derive(Debug, Clone)]
pub enum DirectoryEntry {
    /// Free record; no record in use follows it.
    Available,
    /// Tombstone of a deleted entry.
    Deleted(ShortEntry),
    /// Volume label.
    Label(ShortEntry),
    /// One segment of a long filename.
    LongFileName(LongNameEntry),
    Subdirectory(ShortEntry),
    File(ShortEntry),
    /// The root directory, which has no record on disk.
    Root { first_cluster: u32 },
}

impl DirectoryEntry {
    /// Classifies and parses one directory record.
    pub fn from_bytes(raw: &[u8; DIR_ENTRY_SIZE]) -> Result<Self, FATError> {
        let mut reader = io::Cursor::new(&raw[..]);
        let attr = raw[11];

        let entry = match raw[0] {
            AVAILABLE_MARK => DirectoryEntry::Available,
            DELETED_MARK => DirectoryEntry::Deleted(reader.read_le()?),
            _ if attr == attributes::LONG_NAME => DirectoryEntry::LongFileName(reader.read_le()?),
            _ if attr & attributes::LABEL != 0 => DirectoryEntry::Label(reader.read_le()?),
            _ if attr & attributes::DIRECTORY != 0 => {
                DirectoryEntry::Subdirectory(reader.read_le()?)
            }
            _ => DirectoryEntry::File(reader.read_le()?),
        };
        Ok(entry)
    }

    /// The short entry of a record, for every variant that has one.
    pub fn short_entry(&self) -> Option<&ShortEntry> {
        match self {
            DirectoryEntry::Deleted(e)
            | DirectoryEntry::Label(e)
            | DirectoryEntry::Subdirectory(e)
            | DirectoryEntry::File(e) => Some(e),
            DirectoryEntry::Available
            | DirectoryEntry::LongFileName(_)
            | DirectoryEntry::Root { .. } => None,
        }
    }

    /// The display name of a file, subdirectory or of the root (empty).
    pub fn name(&self) -> Option<String> {
        match self {
            DirectoryEntry::Subdirectory(e) | DirectoryEntry::File(e) => Some(e.name()),
            DirectoryEntry::Root { .. } => Some(String::new()),
            DirectoryEntry::Available
            | DirectoryEntry::Deleted(_)
            | DirectoryEntry::Label(_)
            | DirectoryEntry::LongFileName(_) => None,
        }
    }

    /// The first cluster of a file, subdirectory or of the root.
    pub fn first_cluster(&self) -> Option<u32> {
        match self {
            DirectoryEntry::Subdirectory(e) | DirectoryEntry::File(e) => Some(e.cluster_number()),
            DirectoryEntry::Root { first_cluster } => Some(*first_cluster),
            DirectoryEntry::Available
            | DirectoryEntry::Deleted(_)
            | DirectoryEntry::Label(_)
            | DirectoryEntry::LongFileName(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            DirectoryEntry::Available => "available record",
            DirectoryEntry::Deleted(_) => "deleted entry",
            DirectoryEntry::Label(_) => "volume label",
            DirectoryEntry::LongFileName(_) => "long filename record",
            DirectoryEntry::Subdirectory(_) => "subdirectory",
            DirectoryEntry::File(_) => "file",
            DirectoryEntry::Root { .. } => "root directory",
        }
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryEntry::File(e) => write!(f, "\"{}\" {}B", e.name(), e.file_size()),
            DirectoryEntry::Subdirectory(e) => write!(f, "\"{}\"/", e.name()),
            DirectoryEntry::Label(e) => write!(f, "label \"{}\"", e.short_name()),
            DirectoryEntry::Deleted(e) => write!(f, "deleted \"{}\"", e.short_name()),
            DirectoryEntry::LongFileName(e) => write!(f, "lfn #{}", e.sequence_number()),
            DirectoryEntry::Root { first_cluster } => write!(f, "root @{first_cluster}"),
            DirectoryEntry::Available => write!(f, "available"),
        }
    }
}

/// Reads the next record, `None` at the end of the stream.
fn next_record<R: Read>(reader: &mut R) -> Result<Option<DirectoryEntry>, FATError> {
    let mut raw = [0u8; DIR_ENTRY_SIZE];
    match read_up_to(reader, &mut raw)? {
        0 => Ok(None),
        DIR_ENTRY_SIZE => DirectoryEntry::from_bytes(&raw).map(Some),
        n => Err(FATError::MalformedDirectory(format!(
            "truncated record of {n} bytes"
        ))),
    }
}

/// Reads a record that must exist to complete a long filename group.
fn required_record<R: Read>(reader: &mut R, expected: &str) -> Result<DirectoryEntry, FATError> {
    next_record(reader)?.ok_or_else(|| {
        FATError::MalformedDirectory(format!("directory ends where a {expected} was expected"))
    })
}

/// Decodes the records of a directory until the first available record.
///
/// Long filename records are attached to the short entry following their group; the
/// returned sequence never contains `LongFileName` or `Available` variants.
///
/// # Errors
/// - `FATError::MalformedDirectory` if a group has a gap in its sequence numbers, a
///   continuation does not start with its last segment, the group is not followed by a
///   file, subdirectory or label entry, or a record is truncated
/// - `FATError::SourceIO` if the stream cannot be read
pub fn decode_entries<R: Read>(reader: &mut R) -> Result<Vec<DirectoryEntry>, FATError> {
    let mut entries = vec![];

    while let Some(entry) = next_record(reader)? {
        match entry {
            DirectoryEntry::Available => break,
            DirectoryEntry::LongFileName(first) => {
                entries.push(decode_long_name_group(reader, first)?);
            }
            other => entries.push(other),
        }
    }

    trace!("Decoded {} directory entries", entries.len());
    Ok(entries)
}

/// Collects a long filename group whose first stored record is `first`, and the short
/// entry it decorates.
fn decode_long_name_group<R: Read>(
    reader: &mut R,
    first: LongNameEntry,
) -> Result<DirectoryEntry, FATError> {
    if !first.is_last() {
        return Err(FATError::MalformedDirectory(format!(
            "long filename record #{} does not start a group",
            first.sequence_number()
        )));
    }
    let count = first.sequence_number();
    if count == 0 {
        return Err(FATError::MalformedDirectory(String::from(
            "long filename record with sequence number 0",
        )));
    }

    let mut group = Vec::with_capacity(count.into());
    group.push(first);
    for expected in (1..count).rev() {
        match required_record(reader, "long filename record")? {
            DirectoryEntry::LongFileName(lfn)
                if lfn.sequence_number() == expected && !lfn.is_last() =>
            {
                group.push(lfn)
            }
            other => {
                return Err(FATError::MalformedDirectory(format!(
                    "expected long filename record #{expected}, found {}",
                    other.kind()
                )));
            }
        }
    }

    let mut owner = required_record(reader, "short entry")?;
    let kind = owner.kind();
    match &mut owner {
        DirectoryEntry::File(short)
        | DirectoryEntry::Subdirectory(short)
        | DirectoryEntry::Label(short) => {
            short.long_name_entries = group;
            if !short.checksum_matches() {
                warn!(
                    "Long filename checksum mismatch for short name \"{}\"",
                    short.short_name()
                );
            }
        }
        DirectoryEntry::Available
        | DirectoryEntry::Deleted(_)
        | DirectoryEntry::LongFileName(_)
        | DirectoryEntry::Root { .. } => {
            return Err(FATError::MalformedDirectory(format!(
                "long filename group is followed by a {kind} instead of its short entry"
            )));
        }
    }
    Ok(owner)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn short(name: &[u8; 11], attr: u8, cluster: u32, size: u32) -> [u8; 32] {
        let mut raw = [0u8; 32];
        raw[..11].copy_from_slice(name);
        raw[11] = attr;
        raw[20..22].copy_from_slice(&((cluster >> 16) as u16).to_le_bytes());
        raw[26..28].copy_from_slice(&(cluster as u16).to_le_bytes());
        raw[28..32].copy_from_slice(&size.to_le_bytes());
        raw
    }

    fn checksum(name: &[u8; 11]) -> u8 {
        name.iter().fold(0u8, |sum, b| sum.rotate_right(1).wrapping_add(*b))
    }

    /// The long filename records of `long`, in storage order.
    pub(crate) fn long_name(long: &str, name: &[u8; 11]) -> Vec<[u8; 32]> {
        let mut units: Vec<u16> = long.encode_utf16().collect();
        if units.len() % LONG_NAME_UNITS != 0 {
            units.push(0);
        }
        while units.len() % LONG_NAME_UNITS != 0 {
            units.push(0xFFFF);
        }

        let count = units.len() / LONG_NAME_UNITS;
        (1..=count)
            .rev()
            .map(|seq| {
                let part = &units[(seq - 1) * LONG_NAME_UNITS..seq * LONG_NAME_UNITS];
                let mut raw = [0u8; 32];
                raw[0] = seq as u8 | if seq == count { LAST_LONG_ENTRY } else { 0 };
                raw[11] = attributes::LONG_NAME;
                raw[13] = checksum(name);
                let offsets = (1..11).step_by(2).chain((14..26).step_by(2)).chain((28..32).step_by(2));
                for (unit, off) in part.iter().zip(offsets) {
                    raw[off..off + 2].copy_from_slice(&unit.to_le_bytes());
                }
                raw
            })
            .collect()
    }

    fn decode(records: &[[u8; 32]]) -> Result<Vec<DirectoryEntry>, FATError> {
        let bytes: Vec<u8> = records.concat();
        decode_entries(&mut io::Cursor::new(bytes))
    }

    #[test]
    fn classifies_records() {
        let entries = decode(&[
            short(b"VOLUME     ", attributes::LABEL, 0, 0),
            short(b"DOCS       ", attributes::DIRECTORY, 3, 0),
            short(b"README  TXT", attributes::ARCHIVE, 4, 12),
            short(b"\xE5LD     TXT", attributes::ARCHIVE, 5, 1),
        ])
        .unwrap();

        assert_eq!(entries.len(), 4);
        assert!(matches!(entries[0], DirectoryEntry::Label(_)));
        assert!(matches!(&entries[1], DirectoryEntry::Subdirectory(e) if e.cluster_number() == 3));
        assert!(matches!(&entries[2], DirectoryEntry::File(e) if e.file_size() == 12));
        assert!(matches!(entries[3], DirectoryEntry::Deleted(_)));
        assert_eq!(entries[1].name().as_deref(), Some("docs"));
        assert_eq!(entries[2].name().as_deref(), Some("readme.txt"));
        assert_eq!(entries[0].name(), None);
    }

    #[test]
    fn stops_at_available_record() {
        let entries = decode(&[
            short(b"A       TXT", 0, 3, 1),
            [0u8; 32],
            short(b"B       TXT", 0, 4, 1),
        ])
        .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn cluster_number_combines_both_halves() {
        let raw = short(b"BIG     BIN", 0, 0x0012_3456, 0);
        let entry = DirectoryEntry::from_bytes(&raw).unwrap();
        assert_eq!(entry.first_cluster(), Some(0x0012_3456));
    }

    #[test]
    fn reconstructs_long_name_over_two_records() {
        let name = b"LONGFI~1TXT";
        let mut records = long_name("a long file name.txt", name);
        assert_eq!(records.len(), 2);
        records.push(short(name, attributes::ARCHIVE, 7, 42));
        records.push(short(b"SHORT   TXT", attributes::ARCHIVE, 9, 1));

        let entries = decode(&records).unwrap();
        assert_eq!(entries.len(), 2);

        let long = entries[0].short_entry().unwrap();
        assert_eq!(long.long_name_entries().len(), 2);
        assert_eq!(long.long_name_entries()[0].sequence_number(), 2);
        assert!(long.long_name_entries()[0].is_last());
        assert_eq!(long.long_name_entries()[1].sequence_number(), 1);
        assert!(long.checksum_matches());
        assert_eq!(long.short_name(), "LONGFI~1.TXT");
        assert_eq!(entries[0].name().as_deref(), Some("a long file name.txt"));
        assert_eq!(entries[1].name().as_deref(), Some("short.txt"));
    }

    #[test]
    fn long_name_filling_its_records_exactly() {
        let name = b"ABCDEF~1   ";
        let mut records = long_name("abcdefghijklm", name);
        assert_eq!(records.len(), 1);
        records.push(short(name, 0, 3, 0));
        let entries = decode(&records).unwrap();
        assert_eq!(entries[0].name().as_deref(), Some("abcdefghijklm"));
    }

    #[test]
    fn long_name_keeps_non_ascii() {
        let name = b"CAFE~1  TXT";
        let mut records = long_name("café ☕.txt", name);
        records.push(short(name, 0, 3, 0));
        let entries = decode(&records).unwrap();
        assert_eq!(entries[0].name().as_deref(), Some("café ☕.txt"));
    }

    #[test]
    fn sequence_gap_is_malformed() {
        let name = b"LONGFI~1TXT";
        let mut records = long_name("a name spread over three records", name);
        assert_eq!(records.len(), 3);
        records.remove(1);
        records.push(short(name, 0, 7, 42));
        assert!(matches!(decode(&records), Err(FATError::MalformedDirectory(_))));
    }

    #[test]
    fn group_without_short_entry_is_malformed() {
        let name = b"LONGFI~1TXT";
        let records = long_name("a long file name.txt", name);
        assert!(matches!(decode(&records), Err(FATError::MalformedDirectory(_))));

        let mut followed_by_end = long_name("a long file name.txt", name);
        followed_by_end.push([0u8; 32]);
        assert!(matches!(decode(&followed_by_end), Err(FATError::MalformedDirectory(_))));
    }

    #[test]
    fn group_followed_by_deleted_entry_is_malformed() {
        let name = b"LONGFI~1TXT";
        let mut records = long_name("a long file name.txt", name);
        records.push(short(b"\xE5ONGFI~1TXT", 0, 7, 42));
        assert!(matches!(decode(&records), Err(FATError::MalformedDirectory(_))));
    }

    #[test]
    fn orphan_continuation_is_malformed() {
        let name = b"LONGFI~1TXT";
        let mut records = long_name("a long file name.txt", name);
        records.remove(0);
        records.push(short(name, 0, 7, 42));
        assert!(matches!(decode(&records), Err(FATError::MalformedDirectory(_))));
    }

    #[test]
    fn deleted_long_name_records_are_tombstones() {
        let name = b"LONGFI~1TXT";
        let mut records = long_name("a long file name.txt", name);
        for record in records.iter_mut() {
            record[0] = DELETED_MARK;
        }
        records.push(short(b"\xE5ONGFI~1TXT", 0, 7, 42));
        let entries = decode(&records).unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| matches!(e, DirectoryEntry::Deleted(_))));
    }

    #[test]
    fn truncated_record_is_malformed() {
        let mut bytes = short(b"A       TXT", 0, 3, 1).to_vec();
        bytes.extend_from_slice(&[b'B'; 10]);
        assert!(matches!(
            decode_entries(&mut io::Cursor::new(bytes)),
            Err(FATError::MalformedDirectory(_))
        ));
    }

    #[test]
    fn checksum_mismatch_is_tolerated() {
        let mut records = long_name("a long file name.txt", b"LONGFI~1TXT");
        records.push(short(b"OTHER   TXT", 0, 7, 42));
        let entries = decode(&records).unwrap();
        let short = entries[0].short_entry().unwrap();
        assert!(!short.checksum_matches());
        assert_eq!(short.name(), "a long file name.txt");
    }

    #[test]
    fn short_name_details() {
        let dot = DirectoryEntry::from_bytes(&short(b".          ", attributes::DIRECTORY, 3, 0)).unwrap();
        assert!(dot.short_entry().unwrap().is_dot());
        assert_eq!(dot.name().as_deref(), Some("."));
        assert!(!dot.short_entry().unwrap().is_parent_link());

        let dotdot = DirectoryEntry::from_bytes(&short(b"..         ", attributes::DIRECTORY, 0, 0)).unwrap();
        assert!(dotdot.short_entry().unwrap().is_parent_link());

        let padded = DirectoryEntry::from_bytes(&short(b"NUL\0\0\0\0\0BIN", 0, 3, 0)).unwrap();
        assert_eq!(padded.short_entry().unwrap().short_name(), "NUL.BIN");

        let kanji = DirectoryEntry::from_bytes(&short(b"\x05BC     TXT", 0, 3, 0)).unwrap();
        assert_eq!(kanji.short_entry().unwrap().short_name(), "\u{E5}BC.TXT");

        let flags = DirectoryEntry::from_bytes(&short(
            b"SYS     BIN",
            attributes::READ_ONLY | attributes::HIDDEN | attributes::SYSTEM,
            3,
            0,
        ))
        .unwrap();
        let e = flags.short_entry().unwrap();
        assert!(e.is_read_only() && e.is_hidden() && e.is_system());
        assert!(!e.is_dir() && !e.is_label() && !e.is_archive());
    }
}
