use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// True if the two points are north/south/east/west of each other
    pub fn is_adjacent(&self, other: &Point) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl FromStr for Point {
    type Err = anyhow::Error;

    /// Parses `x,y`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once(',') {
            Some((x, y)) => Ok(Point {
                x: x.trim().parse()?,
                y: y.trim().parse()?,
            }),
            None => Err(anyhow::anyhow!("Invalid point, expected `x,y`: {}", s)),
        }
    }
}

/// One location of the grid together with the state the solver keeps for it.
#[derive(Clone, Debug)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
    /// Intensity read from the source image
    pub wall: i32,
    pub(crate) distance: f64,
    pub(crate) parent: Option<usize>,
    pub(crate) processed: bool,
    pub(crate) heap_index: Option<usize>,
    pub(crate) isolated: bool,
}

impl Cell {
    fn new(x: usize, y: usize, wall: i32) -> Self {
        Self {
            x,
            y,
            wall,
            distance: f64::INFINITY,
            parent: None,
            processed: false,
            heap_index: None,
            isolated: false,
        }
    }

    pub fn point(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    /// Tentative (or, once processed, final) cost of reaching this cell from the entry
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Index of the predecessor cell on the best known path
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn heap_index(&self) -> Option<usize> {
        self.heap_index
    }

    pub fn is_isolated(&self) -> bool {
        self.isolated
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            if self.isolated {
                "X"
            } else if self.wall == 0 {
                "#"
            } else {
                " "
            }
        )
    }
}

/// Cost of stepping between two adjacent cells.
///
/// The constant part keeps every edge strictly positive, the intensity
/// difference makes crossing from one tone to the other expensive.
pub fn cost(a: &Cell, b: &Cell) -> f64 {
    0.1 + (i64::from(a.wall) - i64::from(b.wall)).abs() as f64
}

/// A rectangular grid of cells with a marked entry and exit
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    // row-major, index = y * width + x
    cells: Vec<Cell>,
    entry: Point,
    exit: Point,
}

/// Build a grid from row-major wall values.
pub fn build_grid(
    width: usize,
    height: usize,
    walls: Vec<i32>,
    entry: Point,
    exit: Point,
) -> Result<Grid> {
    Grid::new(width, height, walls, entry, exit)
}

impl Grid {
    pub fn new(
        width: usize,
        height: usize,
        walls: Vec<i32>,
        entry: Point,
        exit: Point,
    ) -> Result<Self> {
        // an area that does not fit in usize can never match the wall count
        let expected = width.checked_mul(height).ok_or(Error::DimensionMismatch {
            expected: usize::MAX,
            actual: walls.len(),
        })?;
        if walls.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: walls.len(),
            });
        }

        for point in [entry, exit] {
            if point.x >= width || point.y >= height {
                return Err(Error::OutOfBounds {
                    point,
                    width,
                    height,
                });
            }
        }

        let cells = walls
            .into_iter()
            .enumerate()
            .map(|(i, wall)| Cell::new(i % width, i / width, wall))
            .collect();

        Ok(Self {
            width,
            height,
            cells,
            entry,
            exit,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn entry(&self) -> Point {
        self.entry
    }

    pub fn exit(&self) -> Point {
        self.exit
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x < self.width && point.y < self.height
    }

    pub fn index_of(&self, point: Point) -> Result<usize> {
        if !self.contains(point) {
            return Err(Error::OutOfBounds {
                point,
                width: self.width,
                height: self.height,
            });
        }
        Ok(point.y * self.width + point.x)
    }

    pub fn point_of(&self, index: usize) -> Point {
        Point {
            x: index % self.width,
            y: index / self.width,
        }
    }

    pub fn get(&self, point: Point) -> Result<&Cell> {
        let index = self.index_of(point)?;
        Ok(&self.cells[index])
    }

    pub fn entry_cell(&self) -> &Cell {
        // entry is validated on construction
        &self.cells[self.entry.y * self.width + self.entry.x]
    }

    pub fn exit_cell(&self) -> &Cell {
        &self.cells[self.exit.y * self.width + self.exit.x]
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Forget everything a previous solve left in the cells.
    ///
    /// Walls and isolated cells are part of the grid's shape and stay.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.distance = f64::INFINITY;
            cell.parent = None;
            cell.processed = false;
            cell.heap_index = None;
        }
    }

    /// Cut every edge of the cell at `point`, turning it into its own component
    pub fn isolate(&mut self, point: Point) -> Result<()> {
        let index = self.index_of(point)?;
        self.cells[index].isolated = true;
        Ok(())
    }

    /// Returns the indices of the unprocessed cells directly west, east, north
    /// and south of the cell at `index`
    pub fn neighbor_indices(&self, index: usize) -> impl Iterator<Item = usize> {
        let mut indices = Vec::with_capacity(4);

        let cell = &self.cells[index];
        if cell.isolated {
            return indices.into_iter();
        }

        if cell.x > 0 {
            indices.push(index - 1);
        }
        if cell.x < self.width - 1 {
            indices.push(index + 1);
        }
        if cell.y > 0 {
            indices.push(index - self.width);
        }
        if cell.y < self.height - 1 {
            indices.push(index + self.width);
        }

        // filter to only keep cells that can still be improved
        indices.retain(|&i| !self.cells[i].processed && !self.cells[i].isolated);

        indices.into_iter()
    }

    pub fn neighbors<'a>(&'a self, cell: &Cell) -> impl Iterator<Item = &'a Cell> + 'a {
        self.neighbor_indices(cell.y * self.width + cell.x)
            .map(move |i| &self.cells[i])
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
