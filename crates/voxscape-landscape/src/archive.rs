use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("failed to read archive: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a landscape archive: {0}")]
    Container(#[from] zip::result::ZipError),
}

/// In-memory index of named sector entries from a landscape container.
/// The whole archive is small enough that eager extraction beats seeking.
pub struct LandscapeArchive {
    entries: HashMap<String, Vec<u8>>,
}

impl LandscapeArchive {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let bytes = fs::read(path)?;
        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, ArchiveError> {
        let mut zip = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = HashMap::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().trim_start_matches("./").to_string();
            let mut payload = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut payload)?;
            entries.insert(name, payload);
        }
        log::debug!("indexed {} archive entries", entries.len());
        Ok(Self { entries })
    }

    /// Entry key for one (layer, sector) pair, e.g. `h0x50y50`.
    pub fn sector_key(layer: u8, sector_x: i32, sector_y: i32) -> String {
        format!("h{layer}x{sector_x}y{sector_y}")
    }

    /// Inverse of [`LandscapeArchive::sector_key`]; `None` for entry names
    /// that are not sector keys.
    pub fn parse_key(name: &str) -> Option<(u8, i32, i32)> {
        let rest = name.strip_prefix('h')?;
        let (layer, rest) = rest.split_once('x')?;
        let (sx, sy) = rest.split_once('y')?;
        Some((layer.parse().ok()?, sx.parse().ok()?, sy.parse().ok()?))
    }

    /// Absence is a normal outcome (the map has holes), not an error.
    pub fn lookup(&self, layer: u8, sector_x: i32, sector_y: i32) -> Option<&[u8]> {
        self.entries
            .get(&Self::sector_key(layer, sector_x, sector_y))
            .map(Vec::as_slice)
    }

    pub fn entry(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
