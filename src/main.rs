use std::fs::{File, OpenOptions};
use std::io::{self, Write as _};
use std::num::NonZeroU8;

use itertools::Itertools;
use sudoku_assistant::{generate_partial, Board, Session, SolveOutcome, StepOutcome};

const RESULT_LOG: &str = "solved_sudoku.txt";

fn main() -> io::Result<()> {
    // Start a fresh log; results of every session are appended to it below.
    File::create(RESULT_LOG)?;

    for (number, board) in demo_boards().into_iter().enumerate() {
        println!();
        println!("=== Board {} ===", number + 1);
        let (outcome, final_board) = play(board)?;
        println!("{final_board}");
        println!("Result: {outcome}");
        log_result(outcome, &final_board)?;
    }
    Ok(())
}

/// Plays one board to its terminal outcome, asking on stdin whenever the
/// solver cannot decide a cell on its own.
fn play(board: Board) -> io::Result<(SolveOutcome, Board)> {
    let mut session = Session::new(board);
    loop {
        match session.advance() {
            StepOutcome::Solved => return Ok((SolveOutcome::Solved, *session.board())),
            StepOutcome::Failed => return Ok((SolveOutcome::Failed, *session.board())),
            StepOutcome::NeedsChoice { x, y } => {
                println!("{}", session.board());
                let candidates = session.candidates(x, y);
                println!(
                    "Options for row {}, column {}: {}",
                    y + 1,
                    x + 1,
                    candidates.iter().join(", ")
                );
                loop {
                    let Some(digit) = prompt_digit()? else {
                        continue;
                    };
                    match session.apply_choice((x, y), digit) {
                        Ok(()) => break,
                        Err(error) => println!("{error}"),
                    }
                }
            }
        }
    }
}

/// Reads one digit from stdin. Returns None on input that isn't a digit so the
/// caller can ask again.
fn prompt_digit() -> io::Result<Option<NonZeroU8>> {
    print!("Choose your option: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed while waiting for a digit",
        ));
    }
    Ok(line.trim().parse().ok())
}

fn log_result(outcome: SolveOutcome, board: &Board) -> io::Result<()> {
    let mut log = OpenOptions::new().append(true).open(RESULT_LOG)?;
    writeln!(log, "{outcome}")?;
    write!(log, "{board}")?;
    Ok(())
}

fn demo_boards() -> Vec<Board> {
    let puzzle = "
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
    .expect("built-in board is well-formed");

    // Solvable without any input: every blank is forced by its column.
    let nearly_done = "
        ___ ___ ___
        183 749 265
        965 123 874

        618 534 792
        492 817 653
        357 962 481

        839 256 147
        541 378 926
        726 491 538
    "
    .parse()
    .expect("built-in board is well-formed");

    // Two 5s in the first row; detected before any input is requested.
    let conflicting = "
        5__ __5 ___
        ___ ___ ___
        ___ ___ ___

        ___ ___ ___
        ___ ___ ___
        ___ ___ ___

        ___ ___ ___
        ___ ___ ___
        ___ ___ ___
    "
    .parse()
    .expect("built-in board is well-formed");

    vec![puzzle, nearly_done, conflicting, generate_partial()]
}
