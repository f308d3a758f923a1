mod board;
mod generator;
mod solver;

pub use board::{Board, ParseBoardError};
pub use generator::{generate_partial, generate_partial_with_rng};
pub use solver::{
    legal_digits, propagate, solve_with, CandidateMap, ChoiceError, DigitChooser, FirstCandidate,
    Session, SolveOutcome, StepOutcome,
};
