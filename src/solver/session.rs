use std::fmt;
use std::num::NonZeroU8;

use thiserror::Error;

use super::candidates::legal_digits;
use super::step::{propagate, StepOutcome};
use crate::board::Board;

/// Terminal result of a whole solve session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved,
    Failed,
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Solved => write!(f, "solved"),
            SolveOutcome::Failed => write!(f, "failed"),
        }
    }
}

/// A digit supplied from outside that the session cannot accept.
/// Rejection never mutates the board; the caller is expected to ask again.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("cell at row {}, column {} already holds a digit", .y + 1, .x + 1)]
    CellAlreadyFilled { x: usize, y: usize },

    #[error("{digit} is not an option for the cell at row {}, column {}", .y + 1, .x + 1)]
    NotACandidate {
        x: usize,
        y: usize,
        digit: NonZeroU8,
    },
}

/// External collaborator that picks a digit whenever the solver cannot make
/// forced progress. Implementations range from an interactive prompt to a
/// scripted reply list; the session re-asks until the reply is one of the
/// offered candidates.
pub trait DigitChooser {
    fn choose_digit(&mut self, cell: (usize, usize), candidates: &[NonZeroU8]) -> NonZeroU8;
}

/// Chooser that always takes the smallest offered candidate. Deterministic,
/// never searches; useful as an automated stand-in for a human.
pub struct FirstCandidate;

impl DigitChooser for FirstCandidate {
    fn choose_digit(&mut self, _cell: (usize, usize), candidates: &[NonZeroU8]) -> NonZeroU8 {
        candidates[0]
    }
}

/// One solve session over one board.
///
/// The session owns the board exclusively. It alternates between [Session::advance],
/// which runs deduction until the board is done or a choice is needed, and
/// [Session::apply_choice], which commits an externally chosen digit after
/// validating it against the cell's current candidates. A cell waiting for a
/// choice stays empty until a valid digit actually arrives.
pub struct Session {
    board: Board,
}

impl Session {
    pub fn new(board: Board) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The digits currently legal at `(x, y)`, in ascending order.
    pub fn candidates(&self, x: usize, y: usize) -> Vec<NonZeroU8> {
        legal_digits(&self.board, x, y).collect()
    }

    /// Runs deduction until the session is solved, failed, or needs an external choice.
    pub fn advance(&mut self) -> StepOutcome {
        propagate(&mut self.board)
    }

    /// Commits an externally chosen digit. The digit must be legal for the cell
    /// right now; anything else is rejected without touching the board.
    pub fn apply_choice(
        &mut self,
        (x, y): (usize, usize),
        digit: NonZeroU8,
    ) -> Result<(), ChoiceError> {
        if !self.board.cell(x, y).is_empty() {
            return Err(ChoiceError::CellAlreadyFilled { x, y });
        }
        if !legal_digits(&self.board, x, y).any(|candidate| candidate == digit) {
            return Err(ChoiceError::NotACandidate { x, y, digit });
        }
        self.board.cell_mut(x, y).set(Some(digit));
        Ok(())
    }
}

/// Drives a session to its terminal outcome, deferring to `chooser` whenever
/// deduction stalls. A reply outside the offered candidates is discarded and
/// the chooser is asked again. Returns the outcome together with the final board.
pub fn solve_with(board: Board, chooser: &mut impl DigitChooser) -> (SolveOutcome, Board) {
    let mut session = Session::new(board);
    loop {
        match session.advance() {
            StepOutcome::Solved => return (SolveOutcome::Solved, session.board),
            StepOutcome::Failed => return (SolveOutcome::Failed, session.board),
            StepOutcome::NeedsChoice { x, y } => {
                let candidates = session.candidates(x, y);
                loop {
                    let digit = chooser.choose_digit((x, y), &candidates);
                    if session.apply_choice((x, y), digit).is_ok() {
                        break;
                    }
                }
            }
        }
    }
}
