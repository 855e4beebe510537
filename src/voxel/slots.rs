//! Save slot persistence
//!
//! A slot is one file `voxedit_<unix-seconds>.vxs` (or `voxedit_<unix-seconds>_<n>.vxs`
//! for further saves in the same second) holding an rkyv archive of the grid,
//! compressed with LZ4.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rkyv::{Archive, Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{IVec3, Result};
use super::grid::VoxelGrid;
use super::voxel::Voxel;

/// Bumped whenever `GridData` changes layout
pub const FORMAT_VERSION: u32 = 1;

const SLOT_PREFIX: &str = "voxedit_";
const SLOT_EXTENSION: &str = "vxs";

#[derive(Archive, Deserialize, Serialize)]
struct CellData {
    x: i32,
    y: i32,
    z: i32,
    color: Voxel,
}

/// Serializable grid contents
#[derive(Archive, Deserialize, Serialize)]
struct GridData {
    version: u32,
    resolution: u32,
    voxel_size: f32,
    cells: Vec<CellData>,
}

/// Directory of save slot files
#[derive(Clone, Debug)]
pub struct SaveSlots {
    dir: PathBuf,
}

impl SaveSlots {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All slot files in the directory, oldest first. A missing directory has no slots.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut slots = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if is_slot_file(&path) {
                slots.push(path);
            }
        }
        slots.sort_by_cached_key(|path| slot_order(path));
        Ok(slots)
    }

    /// Most recent slot, if any
    pub fn latest(&self) -> Result<Option<PathBuf>> {
        Ok(self.list()?.pop())
    }

    /// Write the grid into a new slot and return its path
    pub fn save(&self, grid: &VoxelGrid) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;

        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        // Several saves within one second get a numeric suffix
        let mut path = self.dir.join(format!("{SLOT_PREFIX}{stamp}.{SLOT_EXTENSION}"));
        let mut n = 1;
        while path.exists() {
            path = self.dir.join(format!("{SLOT_PREFIX}{stamp}_{n}.{SLOT_EXTENSION}"));
            n += 1;
        }

        std::fs::write(&path, encode_grid(grid)?)?;
        log::info!("Saved {} voxels to {}", grid.len(), path.display());
        Ok(path)
    }

    /// Read a slot file back into a grid
    pub fn load(&self, path: &Path) -> Result<VoxelGrid> {
        let bytes = std::fs::read(path)?;
        let grid = decode_grid(&bytes)
            .map_err(|e| Error::SaveSlot(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded {} voxels from {}", grid.len(), path.display());
        Ok(grid)
    }
}

/// Sort key `(stamp, suffix, name)` so `_10` follows `_9` within one second
fn slot_order(path: &Path) -> (u64, u32, String) {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    let rest = stem.strip_prefix(SLOT_PREFIX).unwrap_or_default();
    let (stamp, suffix) = rest.split_once('_').unwrap_or((rest, "0"));

    (
        stamp.parse().unwrap_or(0),
        suffix.parse().unwrap_or(0),
        stem,
    )
}

fn is_slot_file(path: &Path) -> bool {
    let name_ok = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(SLOT_PREFIX));
    let ext_ok = path.extension().and_then(|e| e.to_str()) == Some(SLOT_EXTENSION);
    name_ok && ext_ok && path.is_file()
}

/// Serialize and compress a grid
pub fn encode_grid(grid: &VoxelGrid) -> Result<Vec<u8>> {
    let mut cells: Vec<CellData> = grid
        .iter()
        .map(|(cell, color)| CellData { x: cell.x, y: cell.y, z: cell.z, color })
        .collect();
    cells.sort_by_key(|c| (c.x, c.y, c.z));

    let data = GridData {
        version: FORMAT_VERSION,
        resolution: grid.resolution(),
        voxel_size: grid.voxel_size(),
        cells,
    };

    let bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&data)
        .map_err(|e| Error::SaveSlot(e.to_string()))?;

    Ok(lz4_flex::compress_prepend_size(&bytes))
}

/// Decompress and deserialize a grid
pub fn decode_grid(data: &[u8]) -> Result<VoxelGrid> {
    let decompressed = lz4_flex::decompress_size_prepended(data)
        .map_err(|e| Error::SaveSlot(format!("LZ4 decompression failed: {}", e)))?;

    let archived = rkyv::access::<ArchivedGridData, rkyv::rancor::Error>(&decompressed)
        .map_err(|e| Error::SaveSlot(e.to_string()))?;
    let data: GridData = rkyv::deserialize::<GridData, rkyv::rancor::Error>(archived)
        .map_err(|e| Error::SaveSlot(e.to_string()))?;

    if data.version != FORMAT_VERSION {
        return Err(Error::SaveSlot(format!(
            "unsupported format version {} (expected {})",
            data.version, FORMAT_VERSION
        )));
    }
    if data.resolution == 0 || data.voxel_size <= 0.0 {
        return Err(Error::SaveSlot("invalid grid dimensions".into()));
    }

    let mut grid = VoxelGrid::new(data.resolution, data.voxel_size);
    let mut dropped = 0usize;
    for cell in data.cells {
        if !grid.set(IVec3::new(cell.x, cell.y, cell.z), cell.color) {
            dropped += 1;
        }
    }
    if dropped > 0 {
        log::warn!("Ignored {} out-of-bounds cells in save slot", dropped);
    }

    Ok(grid)
}
