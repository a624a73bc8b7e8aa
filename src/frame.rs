// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;

/// Back buffer for one screen of cells.
///
/// Writes outside the current bounds are dropped, so callers never have to
/// re-check geometry after a resize. Changed cells are tracked so the
/// terminal only repaints what moved.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; len],
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    /// Blanks every cell. Only cells that held something are marked dirty.
    pub fn clear(&mut self) {
        for i in 0..self.cells.len() {
            if self.cells[i] != Cell::BLANK {
                self.cells[i] = Cell::BLANK;
                self.mark(i);
            }
        }
    }

    /// Requests a full repaint on the next commit.
    pub fn invalidate(&mut self) {
        self.dirty_all = true;
        self.dirty.clear();
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn clear_dirty(&mut self) {
        if self.dirty_all {
            self.dirty_all = false;
            self.dirty_map.fill(false);
            self.dirty.clear();
            return;
        }

        for &i in &self.dirty {
            if let Some(v) = self.dirty_map.get_mut(i) {
                *v = false;
            }
        }
        self.dirty.clear();
    }

    pub fn index(&self, row: u16, col: u16) -> Option<usize> {
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row as usize * self.width as usize + col as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, row: u16, col: u16) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells.get(i).copied().unwrap_or(Cell::BLANK)
    }

    #[cfg(test)]
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|c| **c != Cell::BLANK).count()
    }

    pub fn put(&mut self, row: u16, col: u16, cell: Cell) {
        let Some(i) = self.index(row, col) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        self.mark(i);
    }

    fn mark(&mut self, i: usize) {
        if !self.dirty_all && self.dirty_map.get(i).copied() == Some(false) {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }
}
