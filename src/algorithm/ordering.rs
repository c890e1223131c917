use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use std::collections::HashMap;

use crate::algorithm::canonical::{OrientationTable, ShapeId};
use crate::io::error::{PackingError, Result};

/// One copy of a shape waiting to be placed
///
/// The `placed_*` fields hold the most recent successful placement of this
/// item. The packer reads them back for symmetry breaking and to report the
/// final layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Shape this item is a copy of
    pub shape: ShapeId,
    /// Occupied cell count of the shape
    pub area: usize,
    /// Orientation index of the last placement
    pub placed_orientation: usize,
    /// Top row of the last placement
    pub placed_row: usize,
    /// Left column of the last placement
    pub placed_col: usize,
}

impl Item {
    /// Create an unplaced item
    pub const fn new(shape: ShapeId, area: usize) -> Self {
        Self {
            shape,
            area,
            placed_orientation: 0,
            placed_row: 0,
            placed_col: 0,
        }
    }
}

/// Order in which items are handed to the packer
///
/// Only search cost depends on the order, never the verdict. Every variant
/// keeps items of the same shape next to each other, which symmetry breaking
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemOrder {
    /// Largest area first, ties by ascending shape id
    #[default]
    LargestFirst,
    /// Ascending shape id
    DefinitionOrder,
    /// Shape groups in a seeded random order
    Shuffled {
        /// Seed for the permutation
        seed: u64,
    },
}

impl ItemOrder {
    /// Sort `items` in place
    pub fn arrange(self, items: &mut [Item]) {
        match self {
            Self::LargestFirst => {
                items.sort_by(|a, b| b.area.cmp(&a.area).then(a.shape.cmp(&b.shape)));
            }
            Self::DefinitionOrder => items.sort_by_key(|item| item.shape),
            Self::Shuffled { seed } => {
                let mut shapes: Vec<ShapeId> = items.iter().map(|item| item.shape).collect();
                shapes.sort_unstable();
                shapes.dedup();
                shapes.shuffle(&mut StdRng::seed_from_u64(seed));

                let rank: HashMap<ShapeId, usize> = shapes
                    .into_iter()
                    .enumerate()
                    .map(|(position, shape)| (shape, position))
                    .collect();
                items.sort_by_key(|item| rank.get(&item.shape).copied().unwrap_or(usize::MAX));
            }
        }
    }
}

/// Expand per-shape counts into an ordered item list
///
/// `counts[i]` is the number of copies of shape `i`; zero counts are skipped
/// and may refer to shapes that do not exist.
///
/// # Errors
///
/// Returns [`PackingError::UnknownShape`] if a non-zero count refers to an
/// undefined shape
pub fn build_items(
    table: &OrientationTable,
    counts: &[usize],
    order: ItemOrder,
) -> Result<Vec<Item>> {
    let mut items = Vec::with_capacity(counts.iter().sum());

    for (shape, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let area = table.area(shape).ok_or(PackingError::UnknownShape {
            shape,
            defined: table.len(),
        })?;
        items.extend(std::iter::repeat_n(Item::new(shape, area), count));
    }

    order.arrange(&mut items);
    Ok(items)
}
