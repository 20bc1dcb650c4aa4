//! FAT32 boot structures and volume geometry.
//!
//! This module implements:
//! - Boot sector, FAT32 extended BIOS parameter block (EBPB) and FSInfo sector parsing
//! - FAT type detection
//! - Optional validation according to Microsoft's FAT specification
//! - The immutable [`Geometry`] record used to locate the allocation table and clusters

use binread::{BinRead, BinReaderExt};
use getset::{CopyGetters, Getters};
use log::{debug, warn};
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use super::fat_error::FATError;
use super::fat_type::FATType;
use crate::constants::FIRST_DATA_CLUSTER;
use crate::utils::trim_padded;

/// Lead signature of the FSInfo sector ("RRaA").
const FSI_LEAD_SIG: u32 = 0x4161_5252;
/// Structure signature of the FSInfo sector ("rrAa").
const FSI_STRUC_SIG: u32 = 0x6141_7272;
/// Trail signature of the FSInfo sector.
const FSI_TRAIL_SIG: u32 = 0xAA55_0000;
/// Value of the FSInfo counters when they are not maintained.
const FSI_UNKNOWN: u32 = 0xFFFF_FFFF;

/// The first 36 bytes of a FAT boot sector, common to all FAT types.
#[derive(BinRead, Debug, Clone)]
#[br(little)]
pub struct BootSector {
    /// Jump instruction to boot code (must be 0xEB ?? 0x90 or 0xE9 ?? ??)
    jmp: [u8; 3],
    /// OEM identifier (e.g., "MSWIN4.1")
    oem_name: [u8; 8],
    /// Number of bytes per sector (512, 1024, 2048, or 4096)
    bytes_per_sec: u16,
    /// Number of sectors per cluster (power of 2: 1, 2, 4, 8, 16, 32, 64, or 128)
    sec_per_clus: u8,
    /// Number of reserved sectors from start of volume
    rsvd_sec_cnt: u16,
    /// Number of FAT copies (typically 2 for redundancy)
    num_fat: u8,
    /// Maximum number of root directory entries (0 for FAT32)
    root_ent_cnt: u16,
    /// Total sectors for volumes < 32MB (0 for FAT32)
    tot_sec_16: u16,
    /// Media descriptor (0xF8 for fixed disk)
    media: u8,
    /// Sectors per FAT for FAT12/FAT16 (0 for FAT32)
    fat_sz_16: u16,
    /// Sectors per track
    _sec_per_trk: u16,
    /// Number of heads
    _num_heads: u16,
    /// Number of hidden sectors preceding the partition
    _hidd_sec: u32,
    /// Total sectors for volumes >= 32MB
    tot_sec_32: u32,
}

impl BootSector {
    /// The count of sectors on the volume. The 32-bit field wins when both are set.
    pub fn tot_sec(&self) -> u32 {
        if self.tot_sec_32 != 0 {
            self.tot_sec_32
        } else {
            self.tot_sec_16.into()
        }
    }

    pub fn fat_type(&self) -> FATType {
        FATType::detect(self.tot_sec_16, self.tot_sec_32)
    }
}

/// FAT32 extended BIOS parameter block, directly following the boot sector.
#[derive(BinRead, Debug, Clone)]
#[br(little)]
pub struct Ebpb32 {
    /// Sectors per FAT
    fat_sz_32: u32,
    /// FAT flags (mirroring, active FAT)
    ext_flags: u16,
    /// Filesystem version (should be 0:0)
    _fs_ver: u16,
    /// First cluster of root directory (typically 2)
    root_clus: u32,
    /// Sector number of FSINFO structure
    fs_info: u16,
    /// Sector number of backup boot sector
    bk_boot_sec: u16,
    /// Reserved for future expansion
    _reserved: [u8; 12],
    /// Drive number (0x80 for hard disk)
    _drv_num: u8,
    /// Reserved (used by Windows NT)
    _reserved_1: u8,
    /// Extended boot signature (0x29)
    _boot_sig: u8,
    /// Volume serial number
    vol_id: u32,
    /// Volume label (11 bytes)
    vol_lab: [u8; 11],
    /// Filesystem type label ("FAT32   ")
    fil_sys_type: [u8; 8],
    /// Boot code
    #[br(count = 420)]
    _boot_code: Vec<u8>,
    /// Boot sector signature (0x55 0xAA)
    sig: [u8; 2],
}

/// FAT32 FSInfo sector.
#[derive(BinRead, Debug, Clone)]
#[br(little)]
pub struct InfoSector {
    lead_sig: u32,
    #[br(count = 480)]
    _reserved_1: Vec<u8>,
    struc_sig: u32,
    /// Last known free cluster count
    free_count: u32,
    /// Hint for the next free cluster, usually the most recently allocated one
    nxt_free: u32,
    _reserved_2: [u8; 12],
    trail_sig: u32,
}

impl InfoSector {
    fn has_valid_signatures(&self) -> bool {
        self.lead_sig == FSI_LEAD_SIG
            && self.struc_sig == FSI_STRUC_SIG
            && self.trail_sig == FSI_TRAIL_SIG
    }
}

/// Options applied when mounting a volume.
#[derive(Debug, Clone, Copy)]
pub struct MountOptions {
    /// Check the boot structures against the FAT32 format rules before mounting.
    pub validate: bool,
}

impl Default for MountOptions {
    fn default() -> Self {
        MountOptions { validate: true }
    }
}

/// The geometry of a mounted FAT32 volume, computed once from its boot structures.
#[derive(Debug, Clone, CopyGetters, Getters)]
pub struct Geometry {
    #[get_copy = "pub"]
    fat_type: FATType,
    #[get_copy = "pub"]
    bytes_per_sector: u16,
    #[get_copy = "pub"]
    sectors_per_cluster: u8,
    #[get_copy = "pub"]
    reserved_sector_count: u16,
    #[get_copy = "pub"]
    fat_count: u8,
    #[get_copy = "pub"]
    sectors_per_fat: u32,
    #[get_copy = "pub"]
    total_sectors: u32,
    #[get_copy = "pub"]
    root_cluster: u32,
    #[get_copy = "pub"]
    media: u8,
    /// FAT mirroring flags (bit 7 set: only the FAT in bits 0-3 is active)
    #[get_copy = "pub"]
    mirroring_flags: u16,
    #[get_copy = "pub"]
    info_sector: u16,
    #[get_copy = "pub"]
    backup_boot_sector: u16,
    /// Free cluster count reported by the FSInfo sector, if maintained
    #[get_copy = "pub"]
    free_cluster_count: Option<u32>,
    /// Most recently allocated cluster reported by the FSInfo sector, if maintained
    #[get_copy = "pub"]
    last_allocated_cluster: Option<u32>,
    #[get_copy = "pub"]
    volume_id: u32,
    #[get = "pub"]
    oem_name: String,
    #[get = "pub"]
    volume_label: String,
    #[get = "pub"]
    fs_type_label: String,
}

impl Geometry {
    /// Decodes the boot sector, the FAT32 EBPB and the FSInfo sector of a volume.
    ///
    /// # Parameters
    /// - `source`: The byte source containing the volume, starting at offset 0
    /// - `options`: Whether to validate the structures against the FAT32 format rules
    ///
    /// # Returns
    /// - `Ok(Geometry)`: The geometry of the FAT32 volume
    /// - `Err(FATError)`: If reading fails, the volume is not FAT32 or validation fails
    ///
    /// The source cursor is left after the FSInfo sector.
    pub fn decode<T: Read + Seek>(source: &mut T, options: MountOptions) -> Result<Self, FATError> {
        source.seek(SeekFrom::Start(0))?;
        let boot: BootSector = source.read_le()?;

        let fat_type = boot.fat_type();
        if fat_type != FATType::FAT32 {
            return Err(FATError::UnsupportedFormat(format!(
                "Unsupported FAT type: `{fat_type}`"
            )));
        }

        let ebpb: Ebpb32 = source.read_le()?;

        Self::check_structure(&boot, &ebpb)?;
        if options.validate {
            Self::validate(&boot, &ebpb)?;
        }

        source.seek(SeekFrom::Start(
            u64::from(ebpb.fs_info) * u64::from(boot.bytes_per_sec),
        ))?;
        let info: InfoSector = source.read_le()?;

        let (free_cluster_count, last_allocated_cluster) = if info.has_valid_signatures() {
            (
                Some(info.free_count).filter(|v| *v != FSI_UNKNOWN),
                Some(info.nxt_free).filter(|v| *v != FSI_UNKNOWN),
            )
        } else if options.validate {
            return Err(FATError::UnsupportedFormat(format!(
                "Invalid FSInfo signatures: 0x{:08X} 0x{:08X} 0x{:08X}",
                info.lead_sig, info.struc_sig, info.trail_sig
            )));
        } else {
            warn!("FSInfo sector {} carries invalid signatures, ignoring it", ebpb.fs_info);
            (None, None)
        };

        let geometry = Geometry {
            fat_type,
            bytes_per_sector: boot.bytes_per_sec,
            sectors_per_cluster: boot.sec_per_clus,
            reserved_sector_count: boot.rsvd_sec_cnt,
            fat_count: boot.num_fat,
            sectors_per_fat: ebpb.fat_sz_32,
            total_sectors: boot.tot_sec(),
            root_cluster: ebpb.root_clus,
            media: boot.media,
            mirroring_flags: ebpb.ext_flags,
            info_sector: ebpb.fs_info,
            backup_boot_sector: ebpb.bk_boot_sec,
            free_cluster_count,
            last_allocated_cluster,
            volume_id: ebpb.vol_id,
            oem_name: trim_padded(&boot.oem_name),
            volume_label: trim_padded(&ebpb.vol_lab),
            fs_type_label: trim_padded(&ebpb.fil_sys_type),
        };
        debug!(
            "{} volume: {} B/sector, {} sectors/cluster, {} reserved, {} FAT(s) of {} sectors, root cluster {}",
            geometry.fat_type,
            geometry.bytes_per_sector,
            geometry.sectors_per_cluster,
            geometry.reserved_sector_count,
            geometry.fat_count,
            geometry.sectors_per_fat,
            geometry.root_cluster
        );

        Ok(geometry)
    }

    /// Checks the fields every computation relies on, even when validation is disabled.
    fn check_structure(boot: &BootSector, ebpb: &Ebpb32) -> Result<(), FATError> {
        if boot.bytes_per_sec == 0 {
            return Err(FATError::UnsupportedFormat(String::from(
                "The count of bytes per sector is 0",
            )));
        }
        if boot.sec_per_clus == 0 {
            return Err(FATError::UnsupportedFormat(String::from(
                "The count of sectors per cluster is 0",
            )));
        }
        if ebpb.root_clus < FIRST_DATA_CLUSTER {
            return Err(FATError::UnsupportedFormat(format!(
                "Invalid cluster number of the first cluster of the root directory: `{}`",
                ebpb.root_clus
            )));
        }
        Ok(())
    }

    /// Validates the boot sector and EBPB against the FAT32 format rules.
    ///
    /// # Errors
    /// - `FATError::UnsupportedFormat` describing the first field that fails a check
    fn validate(boot: &BootSector, ebpb: &Ebpb32) -> Result<(), FATError> {
        let fail = |msg: String| Err(FATError::UnsupportedFormat(msg));

        if !((boot.jmp[0] == 0xEB && boot.jmp[2] == 0x90) || boot.jmp[0] == 0xE9) {
            return fail(format!(
                "Invalid jump instruction `0x{:02X}{:02X}{:02X}`",
                boot.jmp[0], boot.jmp[1], boot.jmp[2],
            ));
        }

        const VALID_BYTES_PER_SEC: [u16; 4] = [512, 1024, 2048, 4096];
        if !VALID_BYTES_PER_SEC.contains(&boot.bytes_per_sec) {
            return fail(format!(
                "Invalid count of bytes per sector: `{}`. Legal values: 512, 1024, 2048 or 4096",
                boot.bytes_per_sec
            ));
        }

        if !boot.sec_per_clus.is_power_of_two() {
            return fail(format!(
                "Invalid number of sector per cluster: `{}`. Legal values: 1, 2, 4, 8, 16, 32, 64, 128",
                boot.sec_per_clus
            ));
        }

        let clus_sz = u32::from(boot.bytes_per_sec) * u32::from(boot.sec_per_clus);
        if clus_sz > 32 * 1024 {
            return fail(format!(
                "Invalid cluster size: `{clus_sz}`. Any value greater than 32K is invalid."
            ));
        }

        if ebpb.sig != [0x55, 0xAA] {
            return fail(format!(
                "Invalid boot signature: `0x{:02X}{:02X}`. Expected signature: 0x55AA",
                ebpb.sig[0], ebpb.sig[1]
            ));
        }

        if boot.rsvd_sec_cnt == 0 {
            return fail(String::from("Invalid count of reserved sectors: `0`"));
        }

        if boot.num_fat == 0 {
            return fail(String::from("Invalid number of FATs on this volume: `0`"));
        }

        if boot.root_ent_cnt != 0 {
            return fail(format!(
                "Invalid count of directory entries in the root directory: `{}`. It should be 0 for a FAT32 volume.",
                boot.root_ent_cnt
            ));
        }

        if boot.tot_sec_16 != 0 {
            return fail(String::from(
                "BPB_TotSec16 should be 0 for a FAT32 volume.",
            ));
        }

        if boot.fat_sz_16 != 0 {
            return fail(String::from("BPB_FATSz16 should be 0 for a FAT32 volume."));
        }
        if ebpb.fat_sz_32 == 0 {
            return fail(String::from(
                "BPB_FATSz32 should be greater than 0 for a FAT32 volume.",
            ));
        }

        Ok(())
    }

    /// The size in bytes of a cluster.
    pub fn bytes_per_cluster(&self) -> u64 {
        u64::from(self.bytes_per_sector) * u64::from(self.sectors_per_cluster)
    }

    /// The count of sectors preceding the data region: reserved sectors and all FAT copies.
    pub fn system_area_size(&self) -> u64 {
        u64::from(self.reserved_sector_count)
            + u64::from(self.fat_count) * u64::from(self.sectors_per_fat)
    }

    /// The absolute byte offset of the first FAT.
    pub fn fat_offset(&self) -> u64 {
        u64::from(self.reserved_sector_count) * u64::from(self.bytes_per_sector)
    }

    /// The size in bytes of one FAT copy.
    pub fn fat_size(&self) -> u64 {
        u64::from(self.sectors_per_fat) * u64::from(self.bytes_per_sector)
    }

    /// The count of clusters in the data region.
    pub fn cluster_count(&self) -> u64 {
        u64::from(self.total_sectors).saturating_sub(self.system_area_size())
            / u64::from(self.sectors_per_cluster)
    }

    /// Converts a cluster number to its logical sector number.
    ///
    /// # Errors
    /// - `FATError::BrokenChain` if the cluster is one of the reserved clusters 0 and 1
    pub fn cluster_to_sector(&self, cluster: u32) -> Result<u64, FATError> {
        if cluster < FIRST_DATA_CLUSTER {
            return Err(FATError::broken_chain(
                cluster,
                "reserved cluster numbers do not map to the data region",
            ));
        }
        Ok(self.system_area_size()
            + u64::from(cluster - FIRST_DATA_CLUSTER) * u64::from(self.sectors_per_cluster))
    }

    /// Converts a cluster number to the absolute byte offset of its first byte.
    pub fn cluster_offset(&self, cluster: u32) -> Result<u64, FATError> {
        Ok(self.cluster_to_sector(cluster)? * u64::from(self.bytes_per_sector))
    }
}

/// Implements the Display trait for Geometry
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        macro_rules! field {
            ($name:expr, $val:expr) => {
                writeln!(f, "  {:<24} {}", $name, $val)?
            };
        }
        let opt = |v: Option<u32>| v.map_or_else(|| String::from("unknown"), |v| v.to_string());

        writeln!(f, "{} volume:", self.fat_type)?;
        field!("oem_name", &self.oem_name);
        field!("volume_label", &self.volume_label);
        field!("volume_id", format!("0x{:08X}", self.volume_id));
        field!("fs_type_label", &self.fs_type_label);
        field!("bytes_per_sector", self.bytes_per_sector);
        field!("sectors_per_cluster", self.sectors_per_cluster);
        field!("reserved_sector_count", self.reserved_sector_count);
        field!("fat_count", self.fat_count);
        field!("sectors_per_fat", self.sectors_per_fat);
        field!("total_sectors", self.total_sectors);
        field!("root_cluster", self.root_cluster);
        field!("media", format!("0x{:02X}", self.media));
        field!("mirroring_flags", format!("0x{:04X}", self.mirroring_flags));
        field!("info_sector", self.info_sector);
        field!("backup_boot_sector", self.backup_boot_sector);
        field!("free_cluster_count", opt(self.free_cluster_count));
        field!("last_allocated_cluster", opt(self.last_allocated_cluster));
        field!("system_area_size", self.system_area_size());
        field!("cluster_count", self.cluster_count());

        Ok(())
    }
}
