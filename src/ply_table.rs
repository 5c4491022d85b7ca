use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use byteorder::{BigEndian, ReadBytesExt};
use log::{info, warn};

/// Read-only map from position key to exact score for every stored
/// position with exactly `ply` moves played
///
/// The on-disk format is a flat sequence of records, big-endian:
/// current mask (u64), occupied mask (u64), score (i8). Lookups run a
/// binary search over the keys, which are sorted once at load time.
#[derive(Clone)]
pub struct PlyLookupTable {
    ply: usize,
    keys: Vec<u64>,
    scores: Vec<i8>,
}

impl PlyLookupTable {
    /// Builds a table from in-memory entries of (current, occupied, score)
    pub fn from_entries(ply: usize, entries: impl IntoIterator<Item = (u64, u64, i8)>) -> Self {
        let mut keyed: Vec<(u64, i8)> = entries
            .into_iter()
            .map(|(current, occupied, score)| (current + occupied, score))
            .collect();
        keyed.sort_unstable_by_key(|&(key, _)| key);
        keyed.dedup_by_key(|&mut (key, _)| key);

        Self {
            ply,
            keys: keyed.iter().map(|&(key, _)| key).collect(),
            scores: keyed.iter().map(|&(_, score)| score).collect(),
        }
    }

    /// Loads a table of solved `ply`-move positions from a file
    pub fn load<P: AsRef<Path>>(path: P, ply: usize) -> Result<Self> {
        let path = path.as_ref();
        let mut file = BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        );

        let mut entries = Vec::new();
        loop {
            let current = match file.read_u64::<BigEndian>() {
                Ok(mask) => mask,
                Err(err) if err.kind() == ErrorKind::UnexpectedEof => break,
                Err(err) => return Err(err.into()),
            };
            let occupied = file.read_u64::<BigEndian>()?;
            let mut score = [0];
            file.read_exact(&mut score)?;

            if occupied.count_ones() as usize != ply {
                return Err(anyhow!(
                    "{}: record {} has {} moves played, expected {}",
                    path.display(),
                    entries.len(),
                    occupied.count_ones(),
                    ply
                ));
            }
            entries.push((current, occupied, score[0] as i8));
        }

        let table = Self::from_entries(ply, entries);
        info!(
            "loaded {} solved {}-ply positions from {}",
            table.len(),
            ply,
            path.display()
        );
        Ok(table)
    }

    /// Loads a table, degrading to `None` on any error
    ///
    /// A missing or unreadable table disables the lookup; it never fails
    /// a search.
    pub fn load_or_disabled<P: AsRef<Path>>(path: P, ply: usize) -> Option<Self> {
        match Self::load(&path, ply) {
            Ok(table) => Some(table),
            Err(err) => {
                warn!(
                    "could not load the {}-ply lookup table: {:#}; solving without it",
                    ply, err
                );
                None
            }
        }
    }

    /// The move count this table holds positions for
    pub fn ply(&self) -> usize {
        self.ply
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The stored score of the position with the given key, if present
    pub fn get(&self, key: u64) -> Option<i8> {
        self.keys
            .binary_search(&key)
            .ok()
            .map(|index| self.scores[index])
    }
}
