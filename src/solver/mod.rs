mod candidates;
mod session;
mod step;

pub use candidates::{legal_digits, CandidateMap};
pub use session::{solve_with, ChoiceError, DigitChooser, FirstCandidate, Session, SolveOutcome};
pub use step::{propagate, StepOutcome};
