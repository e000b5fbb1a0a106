use miette::Diagnostic;
use thiserror::Error;

use crate::grid::Point;
use crate::pipe::Direction;

/// Everything that can stop a grid from being analysed.
///
/// No partial results are produced: any error aborts the whole analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum AnalysisError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    MalformedInput(#[from] MalformedInput),

    #[error(transparent)]
    #[diagnostic(transparent)]
    IncompleteLoop(#[from] IncompleteLoop),
}

/// The text does not describe a grid with a single start.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum MalformedInput {
    #[error("grid has no cells")]
    #[diagnostic(code(day10::malformed::empty))]
    EmptyGrid,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    #[diagnostic(
        code(day10::malformed::ragged_row),
        help("every line of the grid must have the same length")
    )]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unexpected symbol {found:?} at row {row}, column {column}")]
    #[diagnostic(
        code(day10::malformed::invalid_symbol),
        help("cells may only be one of . | - L J 7 F S")
    )]
    InvalidSymbol {
        row: usize,
        column: usize,
        found: char,
    },

    #[error("grid has no start symbol 'S'")]
    #[diagnostic(code(day10::malformed::missing_start))]
    MissingStart,

    #[error("second start at {second} after the first at {first}")]
    #[diagnostic(code(day10::malformed::multiple_starts))]
    MultipleStarts { first: Point, second: Point },
}

/// The pipes through the start do not form one closed loop.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum IncompleteLoop {
    #[error("start at {position} links to {links} neighbour(s), a loop needs two")]
    #[diagnostic(code(day10::incomplete_loop::unresolved_start))]
    UnresolvedStart { position: Point, links: usize },

    #[error("pipe at {position} has no way forward after heading {heading} (incomplete circle?)")]
    #[diagnostic(code(day10::incomplete_loop::dead_end))]
    DeadEnd { position: Point, heading: Direction },

    #[error("walk from the start passed {position} without ever closing")]
    #[diagnostic(code(day10::incomplete_loop::unclosed))]
    Unclosed { position: Point },
}
