use std::num::NonZeroU8;

use itertools::iproduct;

use super::candidates::CandidateMap;
use crate::board::{Board, HEIGHT, WIDTH};

/// Outcome of one propagation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The board breaks a uniqueness rule, or some open cell has no candidate left.
    Failed,
    /// Every cell holds a digit and no rule is broken.
    Solved,
    /// No forced progress is possible; a digit for this cell must be chosen externally.
    NeedsChoice { x: usize, y: usize },
}

/// Advances the board as far as deduction alone can carry it.
///
/// Each pass recomputes the candidate map, checks for contradictions and completion,
/// and commits every open cell whose candidate set is a singleton. Passes repeat until
/// a pass commits nothing, at which point the open cell with the fewest candidates is
/// reported for an external choice.
pub fn propagate(board: &mut Board) -> StepOutcome {
    loop {
        let candidates = CandidateMap::from_board(board);

        if board.has_conflicts() || has_stuck_cell(board, &candidates) {
            return StepOutcome::Failed;
        }
        if board.is_filled() {
            return StepOutcome::Solved;
        }

        let forced = forced_cells(board, &candidates);
        if forced.is_empty() {
            let (x, y) = cell_with_fewest_candidates(board, &candidates);
            return StepOutcome::NeedsChoice { x, y };
        }
        for (x, y, value) in forced {
            board.cell_mut(x, y).set(Some(value));
        }
        // The map is stale now; the next pass recomputes it against the new digits.
    }
}

fn has_stuck_cell(board: &Board, candidates: &CandidateMap) -> bool {
    iproduct!(0..HEIGHT, 0..WIDTH)
        .any(|(y, x)| board.cell(x, y).is_empty() && candidates.num_candidates(x, y) == 0)
}

fn forced_cells(board: &Board, candidates: &CandidateMap) -> Vec<(usize, usize, NonZeroU8)> {
    iproduct!(0..HEIGHT, 0..WIDTH)
        .filter(|&(y, x)| board.cell(x, y).is_empty())
        .filter_map(|(y, x)| {
            let mut cell_candidates = candidates.candidates_for_cell(x, y);
            let first = cell_candidates.next()?;
            cell_candidates.next().is_none().then_some((x, y, first))
        })
        .collect()
}

fn cell_with_fewest_candidates(board: &Board, candidates: &CandidateMap) -> (usize, usize) {
    let mut best: Option<(usize, (usize, usize))> = None;
    for (y, x) in iproduct!(0..HEIGHT, 0..WIDTH) {
        if !board.cell(x, y).is_empty() {
            continue;
        }
        let count = candidates.num_candidates(x, y);
        // Strict comparison keeps the first cell found in row-major order on ties.
        if best.map_or(true, |(best_count, _)| count < best_count) {
            best = Some((count, (x, y)));
        }
    }
    // The caller only asks once completion has been ruled out, so an open cell exists.
    let (_, cell) = best.unwrap();
    cell
}
