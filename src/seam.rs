//! Stitching of face grid borders into one connected surface graph.
use bevy::math::IVec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{face_grid::BorderCell, NodeId};

/// How cells that share a cube corner are linked across faces.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CornerStitching {
    /// Every pair of walkable cells sharing a seam key gets linked, so the
    /// three cells meeting at a cube corner are all connected to each other.
    #[default]
    Full,
    /// A waiting cell is consumed by the first cell that matches it. Corners
    /// end up with a single cross-face pair.
    FirstMatch,
}

/// Seam table used while stitching. Lives only for the stitch phase.
#[derive(Debug, Default)]
pub(crate) struct SeamTable {
    mode: CornerStitching,
    waiting: FxHashMap<IVec3, SmallVec<[NodeId; 2]>>,
}

impl SeamTable {
    pub(crate) fn new(mode: CornerStitching) -> Self {
        SeamTable {
            mode,
            waiting: FxHashMap::default(),
        }
    }

    /// Registers a walkable border cell and returns the cells it must be linked to.
    pub(crate) fn stitch(&mut self, cell: BorderCell) -> SmallVec<[NodeId; 2]> {
        match self.mode {
            CornerStitching::Full => {
                let waiting = self.waiting.entry(cell.key).or_default();
                let matches = waiting.clone();
                waiting.push(cell.id);
                matches
            }
            CornerStitching::FirstMatch => match self.waiting.remove(&cell.key) {
                Some(matches) => matches,
                None => {
                    self.waiting.insert(cell.key, SmallVec::from_slice(&[cell.id]));
                    SmallVec::new()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(key: (i32, i32, i32), id: NodeId) -> BorderCell {
        BorderCell {
            key: IVec3::new(key.0, key.1, key.2),
            id,
        }
    }

    #[test]
    fn test_full_links_every_pair() {
        let mut table = SeamTable::new(CornerStitching::Full);

        assert!(table.stitch(cell((4, 4, 4), 1)).is_empty());
        assert_eq!(table.stitch(cell((4, 4, 4), 2)).as_slice(), &[1]);
        assert_eq!(table.stitch(cell((4, 4, 4), 3)).as_slice(), &[1, 2]);
        assert!(table.stitch(cell((4, 4, 0), 4)).is_empty());
    }

    #[test]
    fn test_first_match_consumes_waiting_cell() {
        let mut table = SeamTable::new(CornerStitching::FirstMatch);

        assert!(table.stitch(cell((4, 4, 4), 1)).is_empty());
        assert_eq!(table.stitch(cell((4, 4, 4), 2)).as_slice(), &[1]);
        // The key is free again, so the third corner cell just waits
        assert!(table.stitch(cell((4, 4, 4), 3)).is_empty());
    }
}
