//! Cheapest path between the entry and the exit of a maze image.
//!
//! The image is binarized into a grid of intensities, every cell of the grid
//! is a node and moving to one of the four neighbors costs
//! `0.1 + |wall difference|`. [`find::PathFinder`] runs Dijkstra over the grid
//! with an indexed heap so tentative distances can be lowered in place.

pub mod catalogue;
pub mod error;
pub mod find;
pub mod grid;
pub mod heap;
pub mod render;
pub mod util;

pub use error::{Error, Result};
pub use find::{reconstruct_path, solve, PathFinder, PathFinderState, PathResult};
pub use grid::{build_grid, cost, Cell, Grid, Point};
pub use heap::IndexedMinHeap;
