//! Binary min-heap over cell indices with decrease-key support.
//!
//! The heap never owns cells. It stores indices into the grid's cell vector
//! and every operation receives that vector, so each cell can carry its own
//! `heap_index`. Keeping `cells[heap[i]].heap_index == Some(i)` at all times
//! is what makes [`IndexedMinHeap::notify_decreased`] logarithmic.
//!
//! Comparisons are strict: an element only moves past another one with a
//! strictly different distance. Ties therefore keep the current order and
//! the outcome only depends on the initial order of the cells.

use crate::{
    error::{Error, Result},
    grid::Cell,
};

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

fn left(index: usize) -> usize {
    2 * index + 1
}

#[derive(Debug, Default)]
pub struct IndexedMinHeap {
    heap: Vec<usize>,
}

impl IndexedMinHeap {
    /// Put every cell in the heap in its current order.
    ///
    /// The order is only a valid heap if the distances already are, which is
    /// the case for a fresh grid where all of them are infinite.
    pub fn build(cells: &mut [Cell]) -> Self {
        let heap = (0..cells.len()).collect();
        for (slot, cell) in cells.iter_mut().enumerate() {
            cell.heap_index = Some(slot);
        }
        Self { heap }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Index of the cell with the smallest distance, without removing it
    pub fn peek(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    pub fn contains(&self, cells: &[Cell], cell: usize) -> bool {
        matches!(cells[cell].heap_index, Some(slot) if self.heap.get(slot) == Some(&cell))
    }

    fn distance(&self, cells: &[Cell], slot: usize) -> f64 {
        cells[self.heap[slot]].distance
    }

    /// Swap two slots and update the index kept by both cells
    fn swap(&mut self, cells: &mut [Cell], a: usize, b: usize) {
        self.heap.swap(a, b);
        cells[self.heap[a]].heap_index = Some(a);
        cells[self.heap[b]].heap_index = Some(b);
    }

    pub fn sift_up(&mut self, cells: &mut [Cell], mut index: usize) {
        while index > 0 {
            let p = parent(index);
            if self.distance(cells, p) <= self.distance(cells, index) {
                break;
            }
            self.swap(cells, p, index);
            index = p;
        }
    }

    pub fn sift_down(&mut self, cells: &mut [Cell], mut index: usize) {
        let len = self.heap.len();
        loop {
            let l = left(index);
            if l >= len {
                break;
            }

            // the left child wins a tie between the two
            let r = l + 1;
            let smaller = if r < len && self.distance(cells, r) < self.distance(cells, l) {
                r
            } else {
                l
            };

            if self.distance(cells, smaller) >= self.distance(cells, index) {
                break;
            }
            self.swap(cells, index, smaller);
            index = smaller;
        }
    }

    /// Remove and return the index of the cell with the smallest distance
    pub fn extract_min(&mut self, cells: &mut [Cell]) -> Result<usize> {
        if self.heap.is_empty() {
            return Err(Error::EmptyHeapExtraction);
        }

        let min = self.heap.swap_remove(0);
        cells[min].heap_index = None;

        if let Some(&moved) = self.heap.first() {
            cells[moved].heap_index = Some(0);
            self.sift_down(cells, 0);
            debug_assert!(self.is_valid_at(cells, 0));
            debug_assert!(cells[moved]
                .heap_index
                .is_some_and(|slot| self.is_valid_at(cells, slot)));
        }

        Ok(min)
    }

    /// Restore the heap order after the distance of `cell` was lowered
    pub fn notify_decreased(&mut self, cells: &mut [Cell], cell: usize) {
        debug_assert!(
            self.contains(cells, cell),
            "cell {} is not tracked by the heap",
            cell
        );

        if let Some(slot) = cells[cell].heap_index {
            // a lower key can only ever move towards the root
            self.sift_up(cells, slot);
        }
    }

    /// Check the order between `slot`, its parent and its children, and that
    /// the cell there knows its slot. Constant time.
    pub fn is_valid_at(&self, cells: &[Cell], slot: usize) -> bool {
        if slot >= self.heap.len() {
            return false;
        }

        let d = self.distance(cells, slot);
        let above = slot == 0 || self.distance(cells, parent(slot)) <= d;
        let below = [left(slot), left(slot) + 1]
            .into_iter()
            .filter(|&child| child < self.heap.len())
            .all(|child| d <= self.distance(cells, child));

        above && below && cells[self.heap[slot]].heap_index == Some(slot)
    }

    /// Check the heap order and that every live cell knows its slot.
    ///
    /// Linear in the size of the heap, only meant for assertions.
    pub fn is_valid(&self, cells: &[Cell]) -> bool {
        let ordered = (1..self.heap.len())
            .all(|i| self.distance(cells, parent(i)) <= self.distance(cells, i));
        let indexed = self
            .heap
            .iter()
            .enumerate()
            .all(|(slot, &cell)| cells[cell].heap_index == Some(slot));

        ordered && indexed
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::grid::{build_grid, Point};
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn create_cells(n: usize) -> Vec<Cell> {
        build_grid(n, 1, vec![0; n], Point::new(0, 0), Point::new(0, 0))
            .unwrap()
            .cells()
            .to_vec()
    }

    #[test]
    fn test_build_tracks_slots() {
        let mut cells = create_cells(5);
        let heap = IndexedMinHeap::build(&mut cells);

        assert_eq!(heap.len(), 5);
        for (i, cell) in cells.iter().enumerate() {
            assert_eq!(cell.heap_index(), Some(i));
            assert!(heap.contains(&cells, i));
        }
        assert!(heap.is_valid(&cells));
    }

    #[test]
    fn test_extract_in_order() {
        let mut cells = create_cells(7);
        let mut heap = IndexedMinHeap::build(&mut cells);

        for (i, d) in [5.0, 3.0, 9.0, 1.0, 4.0, 8.0, 2.0].into_iter().enumerate() {
            cells[i].distance = d;
            heap.notify_decreased(&mut cells, i);
            assert!(heap.is_valid(&cells));
        }

        let mut order = Vec::new();
        while !heap.is_empty() {
            let min = heap.extract_min(&mut cells).unwrap();
            assert_eq!(cells[min].heap_index(), None);
            assert!(!heap.contains(&cells, min));
            assert!(heap.is_valid(&cells));
            order.push(cells[min].distance());
        }

        assert_eq!(order, vec![1.0, 2.0, 3.0, 4.0, 5.0, 8.0, 9.0]);
    }

    #[test]
    fn test_local_check() {
        let mut cells = create_cells(4);
        let mut heap = IndexedMinHeap::build(&mut cells);
        for (i, d) in [1.0, 2.0, 3.0, 4.0].into_iter().enumerate() {
            cells[i].distance = d;
        }
        assert!((0..4).all(|slot| heap.is_valid_at(&cells, slot)));
        assert!(!heap.is_valid_at(&cells, 4));

        // slot 1 now sits below its child in slot 3
        cells[1].distance = 5.0;
        assert!(!heap.is_valid_at(&cells, 1));
        assert!(!heap.is_valid_at(&cells, 3));
        assert!(heap.is_valid_at(&cells, 2));

        cells[1].distance = 2.0;
        cells[2].heap_index = Some(0);
        assert!(!heap.is_valid_at(&cells, 2));
        cells[2].heap_index = Some(2);

        heap.extract_min(&mut cells).unwrap();
        assert!(heap.is_valid(&cells));
    }

    #[test]
    fn test_empty_extraction_fails() {
        let mut cells = create_cells(1);
        let mut heap = IndexedMinHeap::build(&mut cells);

        assert_eq!(heap.extract_min(&mut cells), Ok(0));
        assert_eq!(heap.extract_min(&mut cells), Err(Error::EmptyHeapExtraction));
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut cells = create_cells(6);
        let mut heap = IndexedMinHeap::build(&mut cells);

        for i in 0..6 {
            cells[i].distance = 1.0;
        }
        // nothing moves, the root stays the earliest cell
        heap.notify_decreased(&mut cells, 5);
        assert_eq!(heap.peek(), Some(0));
        assert_eq!(heap.extract_min(&mut cells), Ok(0));
    }

    #[test]
    fn test_decrease_moves_to_root() {
        let mut cells = create_cells(8);
        let mut heap = IndexedMinHeap::build(&mut cells);
        for i in 0..8 {
            cells[i].distance = 10.0 + i as f64;
        }
        // already ordered by index, still a valid heap
        assert!(heap.is_valid(&cells));

        cells[7].distance = 0.5;
        heap.notify_decreased(&mut cells, 7);

        assert_eq!(heap.peek(), Some(7));
        assert_eq!(cells[7].heap_index(), Some(0));
        assert!(heap.is_valid(&cells));
    }

    #[test]
    fn test_random_decreases_keep_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut cells = create_cells(64);
        let mut heap = IndexedMinHeap::build(&mut cells);

        for _ in 0..500 {
            if rng.gen_bool(0.2) && !heap.is_empty() {
                let min = heap.extract_min(&mut cells).unwrap();
                let lowest = cells
                    .iter()
                    .filter(|c| c.heap_index().is_some())
                    .map(|c| c.distance())
                    .fold(f64::INFINITY, f64::min);
                assert!(cells[min].distance() <= lowest);
            } else {
                let live: Vec<usize> = (0..cells.len())
                    .filter(|&i| heap.contains(&cells, i))
                    .collect();
                if live.is_empty() {
                    break;
                }
                let i = live[rng.gen_range(0..live.len())];
                let current = cells[i].distance().min(1000.0);
                cells[i].distance = current - rng.gen_range(0.0..10.0);
                heap.notify_decreased(&mut cells, i);
            }
            assert!(heap.is_valid(&cells));
        }
    }
}
