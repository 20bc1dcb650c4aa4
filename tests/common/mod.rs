//! Synthetic FAT32 images for the integration tests.
//!
//! Layout: 512-byte sectors, 1 sector per cluster, 32 reserved sectors, 2 FATs of
//! 1 sector each, 98 sectors in total. Cluster 2 starts at sector 34.

#![allow(dead_code)]

use fat_explorer::filesystem::dir_entry::attributes;
use std::io::Cursor;

pub const BPS: usize = 512;
pub const RESERVED: usize = 32;
pub const SECTORS_PER_FAT: usize = 1;
pub const FAT_COUNT: usize = 2;
pub const TOTAL_SECTORS: usize = 98;
pub const EOC: u32 = 0x0FFF_FFFF;

pub struct ImageBuilder {
    data: Vec<u8>,
}

impl ImageBuilder {
    /// An empty volume whose root directory is the single cluster 2.
    pub fn new() -> Self {
        let mut data = vec![0u8; TOTAL_SECTORS * BPS];
        data[0..3].copy_from_slice(&[0xEB, 0x58, 0x90]);
        data[3..11].copy_from_slice(b"MSWIN4.1");
        data[11..13].copy_from_slice(&(BPS as u16).to_le_bytes());
        data[13] = 1;
        data[14..16].copy_from_slice(&(RESERVED as u16).to_le_bytes());
        data[16] = FAT_COUNT as u8;
        data[21] = 0xF8;
        data[32..36].copy_from_slice(&(TOTAL_SECTORS as u32).to_le_bytes());
        data[36..40].copy_from_slice(&(SECTORS_PER_FAT as u32).to_le_bytes());
        data[44..48].copy_from_slice(&2u32.to_le_bytes());
        data[48..50].copy_from_slice(&1u16.to_le_bytes());
        data[50..52].copy_from_slice(&6u16.to_le_bytes());
        data[66] = 0x29;
        data[67..71].copy_from_slice(&0x1234_ABCDu32.to_le_bytes());
        data[71..82].copy_from_slice(b"TESTVOL    ");
        data[82..90].copy_from_slice(b"FAT32   ");
        data[510] = 0x55;
        data[511] = 0xAA;

        data[512..516].copy_from_slice(&0x4161_5252u32.to_le_bytes());
        data[996..1000].copy_from_slice(&0x6141_7272u32.to_le_bytes());
        data[1000..1004].copy_from_slice(&40u32.to_le_bytes());
        data[1004..1008].copy_from_slice(&12u32.to_le_bytes());
        data[1020..1024].copy_from_slice(&0xAA55_0000u32.to_le_bytes());

        let mut builder = ImageBuilder { data };
        builder.set_fat(0, 0x0FFF_FFF8);
        builder.set_fat(1, EOC);
        builder.chain(&[2]);
        builder
    }

    /// Writes a FAT entry into every FAT copy.
    pub fn set_fat(&mut self, cluster: u32, value: u32) -> &mut Self {
        for fat in 0..FAT_COUNT {
            let off = (RESERVED + fat * SECTORS_PER_FAT) * BPS + cluster as usize * 4;
            self.data[off..off + 4].copy_from_slice(&value.to_le_bytes());
        }
        self
    }

    /// Links the clusters in order and ends the chain.
    pub fn chain(&mut self, clusters: &[u32]) -> &mut Self {
        for pair in clusters.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(last) = clusters.last() {
            self.set_fat(*last, EOC);
        }
        self
    }

    pub fn cluster_offset(cluster: u32) -> usize {
        (RESERVED + FAT_COUNT * SECTORS_PER_FAT + cluster as usize - 2) * BPS
    }

    /// Writes bytes over the clusters of a chain, in chain order.
    pub fn write(&mut self, clusters: &[u32], bytes: &[u8]) -> &mut Self {
        for (cluster, chunk) in clusters.iter().zip(bytes.chunks(BPS)) {
            let off = Self::cluster_offset(*cluster);
            self.data[off..off + chunk.len()].copy_from_slice(chunk);
        }
        self
    }

    /// Writes directory records over the clusters of a chain.
    pub fn entries(&mut self, clusters: &[u32], records: &[[u8; 32]]) -> &mut Self {
        self.write(clusters, &records.concat())
    }

    pub fn bytes_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub fn build(&self) -> Cursor<Vec<u8>> {
        Cursor::new(self.data.clone())
    }
}

pub fn short_entry(name: &[u8; 11], attr: u8, cluster: u32, size: u32) -> [u8; 32] {
    let mut raw = [0u8; 32];
    raw[..11].copy_from_slice(name);
    raw[11] = attr;
    raw[20..22].copy_from_slice(&((cluster >> 16) as u16).to_le_bytes());
    raw[26..28].copy_from_slice(&(cluster as u16).to_le_bytes());
    raw[28..32].copy_from_slice(&size.to_le_bytes());
    raw
}

pub fn file_entry(name: &[u8; 11], cluster: u32, size: u32) -> [u8; 32] {
    short_entry(name, attributes::ARCHIVE, cluster, size)
}

pub fn dir_entry(name: &[u8; 11], cluster: u32) -> [u8; 32] {
    short_entry(name, attributes::DIRECTORY, cluster, 0)
}

/// The `.` and `..` records of a subdirectory.
pub fn dot_entries(own: u32, parent: u32) -> [[u8; 32]; 2] {
    [
        dir_entry(b".          ", own),
        dir_entry(b"..         ", parent),
    ]
}

/// The long filename records of `long` decorating `name`, in storage order.
pub fn long_name_entries(long: &str, name: &[u8; 11]) -> Vec<[u8; 32]> {
    let checksum = name
        .iter()
        .fold(0u8, |sum, b| sum.rotate_right(1).wrapping_add(*b));
    let mut units: Vec<u16> = long.encode_utf16().collect();
    if units.len() % 13 != 0 {
        units.push(0);
    }
    while units.len() % 13 != 0 {
        units.push(0xFFFF);
    }

    let count = units.len() / 13;
    (1..=count)
        .rev()
        .map(|seq| {
            let mut raw = [0u8; 32];
            raw[0] = seq as u8 | if seq == count { 0x40 } else { 0 };
            raw[11] = attributes::LONG_NAME;
            raw[13] = checksum;
            let offsets = [1, 3, 5, 7, 9, 14, 16, 18, 20, 22, 24, 28, 30];
            for (unit, off) in units[(seq - 1) * 13..seq * 13].iter().zip(offsets) {
                raw[off..off + 2].copy_from_slice(&unit.to_le_bytes());
            }
            raw
        })
        .collect()
}

/// Deterministic file content.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i * 7 + seed as usize) as u8)
        .collect()
}

/// Root (clusters 2, 11):
///   label TESTVOL, 13 deleted records, `A long file name.txt` (clusters 4, 9, 5; 1300 B),
///   `DOCS/` (cluster 3), `README.TXT` (cluster 6; 11 B), `EMPTY.TXT` (no cluster)
/// DOCS (cluster 3): `.`, `..`, `README.TXT` (cluster 7; 20 B), `SUB/` (cluster 8)
/// SUB (cluster 8): `.`, `..`, `DEEP.BIN` (cluster 10; 5 B)
///
/// The long filename group starts at record 14 of the root and crosses into cluster 11.
pub fn sample_image() -> ImageBuilder {
    let mut img = ImageBuilder::new();

    let mut root = vec![short_entry(b"TESTVOL    ", attributes::LABEL, 0, 0)];
    for i in 0..13u8 {
        let mut name = *b"\xE5ELETED TXT";
        name[7] = b'0' + i % 10;
        root.push(file_entry(&name, 0, 0));
    }
    root.extend(long_name_entries("A long file name.txt", b"ALONGF~1TXT"));
    root.push(file_entry(b"ALONGF~1TXT", 4, 1300));
    root.push(dir_entry(b"DOCS       ", 3));
    root.push(file_entry(b"README  TXT", 6, 11));
    root.push(file_entry(b"EMPTY   TXT", 0, 0));
    img.chain(&[2, 11]).entries(&[2, 11], &root);

    img.chain(&[4, 9, 5]).write(&[4, 9, 5], &pattern(1300, 3));
    img.chain(&[6]).write(&[6], b"hello world");

    let mut docs = dot_entries(3, 0).to_vec();
    docs.push(file_entry(b"README  TXT", 7, 20));
    docs.push(dir_entry(b"SUB        ", 8));
    img.chain(&[3]).entries(&[3], &docs);
    img.chain(&[7]).write(&[7], b"nested readme file!\n");

    let mut sub = dot_entries(8, 3).to_vec();
    sub.push(file_entry(b"DEEP    BIN", 10, 5));
    img.chain(&[8]).entries(&[8], &sub);
    img.chain(&[10]).write(&[10], &[1, 2, 3, 4, 5]);

    img
}
