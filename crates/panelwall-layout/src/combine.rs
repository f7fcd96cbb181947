//! Merge a vertical run of selected blocks into one.

use std::fmt;

use panelwall_core::GridRect;
use serde::{Deserialize, Serialize};

use crate::block::{BlockId, LayoutModelError};
use crate::selection::SelectionSet;
use crate::store::LayoutStore;

/// Why a combine request left the store and selection untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum CombineRejection {
    /// Fewer than two blocks selected.
    TooFewSelected { selected: usize },
    /// Blocks are not all single-width blocks in the same column.
    NotSingleColumn,
    /// Blocks leave a gap or overlap when sorted by row.
    NotContiguous { expected_row: u16, found_row: u16 },
    /// The merged block would be taller than the span limit.
    TooTall { height: u32, max_height: u16 },
    /// The store refused the rewrite.
    Store(LayoutModelError),
}

impl fmt::Display for CombineRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewSelected { selected } => {
                write!(f, "combine needs at least two blocks, {selected} selected")
            }
            Self::NotSingleColumn => write!(f, "selected blocks are not one column wide"),
            Self::NotContiguous {
                expected_row,
                found_row,
            } => write!(
                f,
                "selected blocks are not contiguous (expected row {expected_row}, found {found_row})"
            ),
            Self::TooTall { height, max_height } => {
                write!(f, "merged height {height} exceeds limit {max_height}")
            }
            Self::Store(err) => write!(f, "store refused combine: {err}"),
        }
    }
}

/// A validated merge, ready to apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinePlan {
    /// Blocks to fold, top to bottom.
    pub members: Vec<BlockId>,
    /// Footprint of the merged block.
    pub rect: GridRect,
}

/// Result of a successful combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineOutcome {
    pub id: BlockId,
    pub rect: GridRect,
    pub folded: Vec<BlockId>,
}

/// Check whether the selection can be merged.
///
/// Checks, in order: every block shares the first block's column and is one
/// cell wide; sorted by row each block starts where the previous one ends;
/// the summed height fits the store's span limit.
pub fn plan_combine(
    selection: &SelectionSet,
    store: &LayoutStore,
) -> Result<CombinePlan, CombineRejection> {
    if selection.len() < 2 {
        return Err(CombineRejection::TooFewSelected {
            selected: selection.len(),
        });
    }
    let mut blocks: Vec<_> = selection
        .selected
        .iter()
        .filter_map(|id| store.get(*id))
        .collect();
    if blocks.len() < 2 {
        return Err(CombineRejection::TooFewSelected {
            selected: blocks.len(),
        });
    }

    let col = blocks[0].origin.col;
    if blocks
        .iter()
        .any(|block| block.origin.col != col || block.span.w != 1)
    {
        return Err(CombineRejection::NotSingleColumn);
    }

    blocks.sort_by_key(|block| block.origin.row);
    for pair in blocks.windows(2) {
        let expected_row = pair[0].origin.row + pair[0].span.h;
        if pair[1].origin.row != expected_row {
            return Err(CombineRejection::NotContiguous {
                expected_row,
                found_row: pair[1].origin.row,
            });
        }
    }

    let height: u32 = blocks.iter().map(|block| u32::from(block.span.h)).sum();
    let max_height = store.limits().max_height;
    if height > u32::from(max_height) {
        return Err(CombineRejection::TooTall { height, max_height });
    }

    let top = blocks[0].origin.row;
    Ok(CombinePlan {
        members: blocks.iter().map(|block| block.id).collect(),
        // height <= max_height, which is a u16.
        rect: GridRect::new(col, top, 1, height as u16),
    })
}

/// Merge the selected blocks and select the result.
///
/// On rejection neither the store nor the selection changes.
pub fn combine_selected(
    selection: &mut SelectionSet,
    store: &mut LayoutStore,
) -> Result<CombineOutcome, CombineRejection> {
    let plan = plan_combine(selection, store)?;
    let id = store
        .replace(&plan.members, plan.rect)
        .map_err(CombineRejection::Store)?;
    selection.select_only(id);
    tracing::debug!(
        target: "panelwall.layout",
        block = id.get(),
        folded = plan.members.len(),
        col = plan.rect.col,
        row = plan.rect.row,
        h = plan.rect.h,
        "combined blocks"
    );
    Ok(CombineOutcome {
        id,
        rect: plan.rect,
        folded: plan.members,
    })
}
