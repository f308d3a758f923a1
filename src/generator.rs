use itertools::iproduct;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, HEIGHT, WIDTH};
use crate::solver::legal_digits;

/// Generates a random partially filled board: between 10 and 19 cells are picked
/// at random and each is given a uniformly random digit from the digits legal for
/// it at that moment. Cells whose candidates have run out are skipped, so the
/// result never contains a conflict. There is no guarantee the board is solvable.
pub fn generate_partial() -> Board {
    generate_partial_with_rng(&mut rand::thread_rng())
}

pub fn generate_partial_with_rng(rng: &mut impl Rng) -> Board {
    let mut board = Board::new_empty();
    let num_to_fill = rng.gen_range(10..20);
    let mut cells: Vec<(usize, usize)> = iproduct!(0..HEIGHT, 0..WIDTH)
        .map(|(y, x)| (x, y))
        .collect();
    cells.shuffle(rng);

    let mut num_filled = 0;
    for (x, y) in cells {
        if num_filled == num_to_fill {
            break;
        }
        let options: Vec<_> = legal_digits(&board, x, y).collect();
        if let Some(&value) = options.choose(rng) {
            board.cell_mut(x, y).set(Some(value));
            num_filled += 1;
        }
    }
    board
}
