use thiserror::Error;

use crate::grid::Point;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("point {point} is outside of the {width}x{height} grid")]
    OutOfBounds {
        point: Point,
        width: usize,
        height: usize,
    },

    /// Extracting from an empty heap means the solve loop itself is broken
    #[error("tried to extract the minimum of an empty heap")]
    EmptyHeapExtraction,

    #[error("exit {exit} can not be reached from entry {entry}")]
    UnreachableExit { entry: Point, exit: Point },

    #[error("expected {expected} wall values for the grid, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
