use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    grid::{cost, Grid, Point},
    heap::IndexedMinHeap,
};

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct PathResult {
    pub path: Vec<Point>,
    pub start: Point,
    pub goal: Point,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathFinderState {
    Computing,
    NoPathFound,
    PathFound(PathResult),
}

impl PathFinderState {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// Dijkstra over a [`Grid`], one extracted cell per [`PathFinder::step`].
///
/// The finder owns the grid for the whole solve; [`PathFinder::finish`] hands
/// it back together with the final state so distances and parents can be
/// inspected afterwards.
#[derive(Debug)]
pub struct PathFinder {
    grid: Grid,
    heap: IndexedMinHeap,
    state: PathFinderState,
    extracted: usize,
}

impl PathFinder {
    pub fn new(mut grid: Grid) -> Self {
        debug!(
            "solving {}x{} grid from {} to {}",
            grid.width(),
            grid.height(),
            grid.entry(),
            grid.exit()
        );

        // the grid may come back from an earlier solve
        grid.reset();
        let mut heap = IndexedMinHeap::build(grid.cells_mut());

        // entry is in bounds, checked when the grid was built
        let entry = grid.entry().y * grid.width() + grid.entry().x;
        grid.cells_mut()[entry].distance = 0.0;
        heap.notify_decreased(grid.cells_mut(), entry);

        Self {
            grid,
            heap,
            state: PathFinderState::Computing,
            extracted: 0,
        }
    }

    pub fn finish(mut self) -> Result<(PathFinderState, Grid)> {
        loop {
            match self.step()? {
                PathFinderState::Computing => {}
                s => return Ok((s, self.grid)),
            }
        }
    }

    pub fn step(&mut self) -> Result<PathFinderState> {
        if self.state.is_done() {
            return Ok(self.state.clone());
        }

        if self.heap.is_empty() {
            debug!("finalized {} cells", self.extracted);

            self.state = match reconstruct_path(&self.grid) {
                Ok(path) => PathFinderState::PathFound(PathResult {
                    path,
                    start: self.grid.entry(),
                    goal: self.grid.exit(),
                    total_cost: self.grid.exit_cell().distance(),
                }),
                Err(Error::UnreachableExit { .. }) => PathFinderState::NoPathFound,
                Err(e) => return Err(e),
            };
            return Ok(self.state.clone());
        }

        let cells = self.grid.cells_mut();
        let u = self.heap.extract_min(cells)?;
        cells[u].processed = true;
        self.extracted += 1;
        trace!("finalized {:?} at {}", cells[u].point(), cells[u].distance);

        let neighbors: Vec<usize> = self.grid.neighbor_indices(u).collect();
        let cells = self.grid.cells_mut();
        for v in neighbors {
            let candidate = cells[u].distance + cost(&cells[u], &cells[v]);
            if candidate < cells[v].distance {
                cells[v].distance = candidate;
                cells[v].parent = Some(u);
                self.heap.notify_decreased(cells, v);
            }
        }

        Ok(PathFinderState::Computing)
    }

    pub fn state(&self) -> &PathFinderState {
        &self.state
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of cells still waiting to be finalized
    pub fn remaining(&self) -> usize {
        self.heap.len()
    }

    pub fn start(&self) -> Point {
        self.grid.entry()
    }

    pub fn goal(&self) -> Point {
        self.grid.exit()
    }
}

/// Walk the parent links from the exit back to the entry.
///
/// The returned path runs from entry to exit.
pub fn reconstruct_path(grid: &Grid) -> Result<Vec<Point>> {
    let unreachable = || Error::UnreachableExit {
        entry: grid.entry(),
        exit: grid.exit(),
    };

    if !grid.exit_cell().distance().is_finite() {
        return Err(unreachable());
    }

    let entry = grid.index_of(grid.entry())?;
    let mut current = grid.index_of(grid.exit())?;

    let mut path = vec![grid.point_of(current)];
    while current != entry {
        // a chain longer than the grid can only be a cycle
        match grid.cells()[current].parent() {
            Some(parent) if path.len() <= grid.len() => {
                path.push(grid.point_of(parent));
                current = parent;
            }
            _ => return Err(unreachable()),
        }
    }

    path.reverse();
    Ok(path)
}

/// Find the cheapest path from the grid's entry to its exit
pub fn solve(grid: Grid) -> Result<PathResult> {
    let (entry, exit) = (grid.entry(), grid.exit());
    match PathFinder::new(grid).finish()?.0 {
        PathFinderState::PathFound(result) => Ok(result),
        _ => Err(Error::UnreachableExit { entry, exit }),
    }
}
