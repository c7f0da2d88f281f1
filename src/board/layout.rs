//! Grid layout: fixed column count, padded and spaced cells sized to fit a
//! container.

use serde::{Deserialize, Serialize};

use crate::context::BoardLayout;

/// 2D size or offset in layout units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Computes card cell sizes for a container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    /// Size of the area holding the grid.
    pub container: Vec2,
    /// Inset on each edge.
    pub padding: Vec2,
    /// Gap between neighbouring cells.
    pub spacing: Vec2,
    /// Keep cells square (use the smaller side).
    pub match_aspect: bool,
    columns: u16,
    rows: u16,
    cell_size: Vec2,
}

impl GridLayout {
    /// Create a layout for a container with default padding and spacing.
    pub fn new(container: Vec2) -> Self {
        let mut layout = Self {
            container,
            padding: Vec2::new(10.0, 10.0),
            spacing: Vec2::new(10.0, 10.0),
            match_aspect: true,
            columns: 1,
            rows: 1,
            cell_size: Vec2::default(),
        };
        layout.update();
        layout
    }

    #[must_use]
    pub fn with_padding(mut self, padding: Vec2) -> Self {
        self.padding = padding;
        self.update();
        self
    }

    #[must_use]
    pub fn with_spacing(mut self, spacing: Vec2) -> Self {
        self.spacing = spacing;
        self.update();
        self
    }

    #[must_use]
    pub fn with_match_aspect(mut self, match_aspect: bool) -> Self {
        self.match_aspect = match_aspect;
        self.update();
        self
    }

    /// Set the grid shape, clamping each side to at least 1.
    pub fn setup(&mut self, columns: u16, rows: u16) {
        self.columns = columns.max(1);
        self.rows = rows.max(1);
        self.update();
    }

    /// Recompute the cell size from the current fields.
    pub fn update(&mut self) {
        let cols = f32::from(self.columns);
        let rows = f32::from(self.rows);

        let width = self.container.x - self.padding.x * 2.0 - self.spacing.x * (cols - 1.0);
        let height = self.container.y - self.padding.y * 2.0 - self.spacing.y * (rows - 1.0);

        let cell_w = (width / cols).max(0.0);
        let cell_h = (height / rows).max(0.0);

        self.cell_size = if self.match_aspect {
            let side = cell_w.min(cell_h);
            Vec2::new(side, side)
        } else {
            Vec2::new(cell_w, cell_h)
        };
    }

    #[must_use]
    pub fn columns(&self) -> u16 {
        self.columns
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        self.rows
    }

    #[must_use]
    pub fn cell_size(&self) -> Vec2 {
        self.cell_size
    }

    /// Top-left corner of the cell at a slot, filling row by row.
    #[must_use]
    pub fn cell_origin(&self, slot: usize) -> Vec2 {
        let columns = usize::from(self.columns);
        let col = (slot % columns) as f32;
        let row = (slot / columns) as f32;
        Vec2::new(
            self.padding.x + col * (self.cell_size.x + self.spacing.x),
            self.padding.y + row * (self.cell_size.y + self.spacing.y),
        )
    }
}

impl BoardLayout for GridLayout {
    fn configure(&mut self, columns: u16, rows: u16) {
        self.setup(columns, rows);
    }

    fn refresh(&mut self) {
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_cells_use_smaller_side() {
        let mut layout = GridLayout::new(Vec2::new(450.0, 340.0));
        layout.setup(4, 3);

        // width: 450 - 20 - 30 = 400 -> 100 per cell
        // height: 340 - 20 - 20 = 300 -> 100 per cell
        assert_eq!(layout.cell_size(), Vec2::new(100.0, 100.0));

        layout.container = Vec2::new(450.0, 640.0);
        layout.update();
        assert_eq!(layout.cell_size(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_stretched_cells() {
        let mut layout = GridLayout::new(Vec2::new(220.0, 120.0))
            .with_padding(Vec2::new(10.0, 10.0))
            .with_spacing(Vec2::new(0.0, 0.0))
            .with_match_aspect(false);
        layout.setup(2, 1);
        assert_eq!(layout.cell_size(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_setup_clamps_zero() {
        let mut layout = GridLayout::new(Vec2::new(100.0, 100.0));
        layout.configure(0, 0);
        assert_eq!((layout.columns(), layout.rows()), (1, 1));
    }

    #[test]
    fn test_tiny_container_never_negative() {
        let mut layout = GridLayout::new(Vec2::new(5.0, 5.0));
        layout.setup(10, 10);
        assert_eq!(layout.cell_size(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn test_cell_origin_row_major() {
        let mut layout = GridLayout::new(Vec2::new(450.0, 340.0));
        layout.setup(4, 3);
        assert_eq!(layout.cell_origin(0), Vec2::new(10.0, 10.0));
        assert_eq!(layout.cell_origin(5), Vec2::new(120.0, 120.0));
    }
}
