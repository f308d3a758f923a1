use std::num::NonZeroU8;

use bitvec::prelude::*;
use itertools::iproduct;

use crate::board::{Board, HEIGHT, MAX_VALUE, NUM_CELLS, WIDTH};

const NUM_VALUES_PER_CELL: usize = MAX_VALUE as usize;
const ALL_DIGITS: u16 = (1 << MAX_VALUE) - 1;

/// Returns the digits that could legally be placed at `(x, y)`: everything in 1..=9
/// that doesn't already occur in the cell's row, column or 3x3 box.
/// For a cell that already holds a digit the iterator is empty.
pub fn legal_digits(board: &Board, x: usize, y: usize) -> impl Iterator<Item = NonZeroU8> {
    let allowed = if board.cell(x, y).is_empty() {
        !digits_in_houses(board, x, y) & ALL_DIGITS
    } else {
        0
    };
    (1..=MAX_VALUE)
        .filter(move |digit| allowed & 1 << (digit - 1) != 0)
        .map(|digit| NonZeroU8::new(digit).unwrap())
}

fn digits_in_houses(board: &Board, x: usize, y: usize) -> u16 {
    let row = (0..WIDTH).map(|cell_x| (cell_x, y));
    let column = (0..HEIGHT).map(|cell_y| (x, cell_y));
    let (box_x, box_y) = (x / 3 * 3, y / 3 * 3);
    let box_cells = iproduct!(box_x..box_x + 3, box_y..box_y + 3);
    row.chain(column)
        .chain(box_cells)
        .filter_map(|(cell_x, cell_y)| board.cell(cell_x, cell_y).get())
        .fold(0, |digits, value| digits | 1 << (value.get() - 1))
}

/// Candidate digits for every cell of one board snapshot, stored as 9 bits per cell.
/// This is derived data: it is recomputed from the board after every mutation instead
/// of being patched in place, so it can never go stale. Cells that already hold a
/// digit have no bits set; whether a bitless cell is filled or stuck is decided by
/// looking at the board, not at this map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateMap {
    values: BitArr!(for NUM_CELLS * NUM_VALUES_PER_CELL),
}

impl CandidateMap {
    pub fn from_board(board: &Board) -> Self {
        let mut values = bitarr![0; NUM_CELLS * NUM_VALUES_PER_CELL];
        for (y, x) in iproduct!(0..HEIGHT, 0..WIDTH) {
            for value in legal_digits(board, x, y) {
                values.set(Self::index(x, y, value), true);
            }
        }
        Self { values }
    }

    fn cell_start_index(x: usize, y: usize) -> usize {
        assert!(x < WIDTH && y < HEIGHT);
        NUM_VALUES_PER_CELL * (y * WIDTH + x)
    }

    fn index(x: usize, y: usize, value: NonZeroU8) -> usize {
        assert!(value.get() <= MAX_VALUE);
        Self::cell_start_index(x, y) + usize::from(value.get()) - 1
    }

    pub fn candidates_for_cell(&self, x: usize, y: usize) -> impl Iterator<Item = NonZeroU8> + '_ {
        let start_index = Self::cell_start_index(x, y);
        (1u8..=MAX_VALUE)
            .filter(move |digit| self.values[start_index + usize::from(*digit) - 1])
            .map(|digit| NonZeroU8::new(digit).unwrap())
    }

    pub fn is_candidate(&self, x: usize, y: usize, value: NonZeroU8) -> bool {
        self.values[Self::index(x, y, value)]
    }

    pub fn num_candidates(&self, x: usize, y: usize) -> usize {
        let start_index = Self::cell_start_index(x, y);
        self.values[start_index..start_index + NUM_VALUES_PER_CELL].count_ones()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits(values: &[u8]) -> Vec<NonZeroU8> {
        values.iter().map(|&v| NonZeroU8::new(v).unwrap()).collect()
    }

    #[test]
    fn empty_board_allows_everything() {
        let board = Board::new_empty();
        let candidates = CandidateMap::from_board(&board);
        for (y, x) in iproduct!(0..HEIGHT, 0..WIDTH) {
            assert_eq!(
                digits(&[1, 2, 3, 4, 5, 6, 7, 8, 9]),
                legal_digits(&board, x, y).collect::<Vec<_>>()
            );
            assert_eq!(9, candidates.num_candidates(x, y));
        }
    }

    #[test]
    fn filled_cells_have_no_candidates() {
        let board: Board = "
            __4 68_ _19
            __3 __9 2_5
            _6_ ___ __4

            6__ ___ 7_2
            ___ __7 ___
            ___ 9__ __1

            8__ _5_ __7
            _41 3_8 ___
            _2_ _91 ___
        "
        .parse()
        .unwrap();
        let candidates = CandidateMap::from_board(&board);
        for (y, x) in iproduct!(0..HEIGHT, 0..WIDTH) {
            if !board.cell(x, y).is_empty() {
                assert_eq!(0, legal_digits(&board, x, y).count());
                assert_eq!(0, candidates.num_candidates(x, y));
            }
        }
    }

    #[test]
    fn candidates_are_the_three_house_intersection() {
        let board: Board = "
            123 ___ ___
            ___ 4__ ___
            ___ _5_ ___

            ___ ___ ___
            ___ ___ ___
            ___ ___ ___

            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
        "
        .parse()
        .unwrap();
        // Cell (3, 0): row holds 1,2,3; column holds 4; box holds 4,5.
        assert_eq!(
            digits(&[6, 7, 8, 9]),
            legal_digits(&board, 3, 0).collect::<Vec<_>>()
        );
    }

    #[test]
    fn candidates_never_include_digits_visible_from_the_cell() {
        use rand::{rngs::StdRng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(1);
        let board = crate::generator::generate_partial_with_rng(&mut rng);
        for (y, x) in iproduct!(0..HEIGHT, 0..WIDTH) {
            for candidate in legal_digits(&board, x, y) {
                let row = (0..WIDTH).map(|cell_x| (cell_x, y));
                let column = (0..HEIGHT).map(|cell_y| (x, cell_y));
                let (box_x, box_y) = (x / 3 * 3, y / 3 * 3);
                let box_cells = iproduct!(box_x..box_x + 3, box_y..box_y + 3);
                assert!(row
                    .chain(column)
                    .chain(box_cells)
                    .all(|(cell_x, cell_y)| board.cell(cell_x, cell_y).get() != Some(candidate)));
            }
        }
    }

    #[test]
    fn recomputation_is_idempotent() {
        let board: Board = "
            __4 68_ _19
            __3 __9 2_5
            _6_ ___ __4

            6__ ___ 7_2
            ___ __7 ___
            ___ 9__ __1

            8__ _5_ __7
            _41 3_8 ___
            _2_ _91 ___
        "
        .parse()
        .unwrap();
        assert_eq!(
            CandidateMap::from_board(&board),
            CandidateMap::from_board(&board)
        );
    }

    #[test]
    fn committing_a_digit_only_shrinks_candidate_sets() {
        let mut board: Board = "
            __4 68_ _19
            __3 __9 2_5
            _6_ ___ __4

            6__ ___ 7_2
            ___ __7 ___
            ___ 9__ __1

            8__ _5_ __7
            _41 3_8 ___
            _2_ _91 ___
        "
        .parse()
        .unwrap();
        let before = CandidateMap::from_board(&board);

        let committed = legal_digits(&board, 0, 0).next().unwrap();
        board.cell_mut(0, 0).set(Some(committed));

        let after = CandidateMap::from_board(&board);
        for (y, x) in iproduct!(0..HEIGHT, 0..WIDTH) {
            for value in after.candidates_for_cell(x, y) {
                assert!(before.is_candidate(x, y, value));
            }
        }
    }

    #[test]
    fn stuck_cell_is_distinguishable_from_filled_cell() {
        let board: Board = "
            _23 456 78_
            9__ ___ ___
            1__ ___ ___

            ___ ___ ___
            ___ ___ ___
            ___ ___ ___

            ___ ___ ___
            ___ ___ ___
            ___ ___ ___
        "
        .parse()
        .unwrap();
        let candidates = CandidateMap::from_board(&board);

        // (0, 0) is open but sees all nine digits through its row and column.
        assert!(board.cell(0, 0).is_empty());
        assert_eq!(0, candidates.num_candidates(0, 0));

        // (1, 0) holds a digit; it also has no candidates, but it is not stuck.
        assert!(!board.cell(1, 0).is_empty());
        assert_eq!(0, candidates.num_candidates(1, 0));
    }
}
