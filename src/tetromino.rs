//! Piece catalog: shape templates, color palette and the random source
//!
//! Shapes are row-major matrices where a `1` marks a filled cell. The
//! catalog hands out copies, so templates are never mutated.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use ratatui::style::Color;

/// The 7 shape templates
const TEMPLATES: [&[&[u8]]; 7] = [
    &[&[1, 1, 1, 1]],           // Line
    &[&[1, 1], &[1, 1]],        // Square
    &[&[1, 1, 1], &[0, 1, 0]],  // T
    &[&[1, 1, 0], &[0, 1, 1]],  // S
    &[&[0, 1, 1], &[1, 1, 0]],  // Z
    &[&[1, 1, 1], &[1, 0, 0]],  // L
    &[&[1, 1, 1], &[0, 0, 1]],  // J
];

/// Every template as a shape
#[cfg(test)]
pub fn templates() -> impl Iterator<Item = Shape> {
    TEMPLATES.into_iter().map(Shape::from_matrix)
}

/// Color palette, indexed by a piece's color
pub const PALETTE: [(&str, Color); 7] = [
    ("red", Color::Red),
    ("yellow", Color::Yellow),
    ("purple", Color::Magenta),
    ("green", Color::Green),
    ("blue", Color::Blue),
    ("orange", Color::Rgb(255, 165, 0)),
    ("cyan", Color::Cyan),
];

/// Color of a palette index
pub fn palette_color(index: usize) -> Color {
    PALETTE.get(index).map(|(_, color)| *color).unwrap_or(Color::White)
}

/// One rotation state of a piece
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from a matrix of 0/1 values
    pub fn from_matrix(matrix: &[&[u8]]) -> Self {
        Self {
            rows: matrix
                .iter()
                .map(|row| row.iter().map(|&value| value != 0).collect())
                .collect(),
        }
    }

    /// The straight four-cell piece
    #[allow(dead_code)]
    pub fn line() -> Self {
        Self::from_matrix(TEMPLATES[0])
    }

    #[allow(dead_code)]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    #[allow(dead_code)]
    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Offsets (x, y) of every filled cell, relative to the top-left corner
    pub fn filled_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, filled)| **filled)
                .map(move |(x, _)| (x as i32, y as i32))
        })
    }

    /// Quarter turn: transpose, then reverse the row order. Rows shorter than
    /// the first are padded with empty cells.
    pub fn rotated(&self) -> Shape {
        let rows = (0..self.width())
            .map(|x| {
                self.rows
                    .iter()
                    .map(|row| row.get(x).copied().unwrap_or(false))
                    .collect()
            })
            .rev()
            .collect();
        Shape { rows }
    }
}

/// Hands out random shapes and colors from an injected random source
#[derive(Debug, Clone)]
pub struct Catalog<R = ChaCha8Rng> {
    rng: R,
}

impl Catalog<ChaCha8Rng> {
    /// Catalog seeded from OS entropy
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    /// Deterministic catalog: equal seeds yield equal piece sequences
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl Default for Catalog<ChaCha8Rng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Catalog<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Number of distinct shape templates
    pub fn piece_count(&self) -> usize {
        TEMPLATES.len()
    }

    /// A copy of a uniformly chosen template
    pub fn random_shape(&mut self) -> Shape {
        let index = self.rng.gen_range(0..TEMPLATES.len());
        Shape::from_matrix(TEMPLATES[index])
    }

    /// A uniformly chosen palette index, drawn independently of the shape
    pub fn random_color(&mut self) -> usize {
        self.rng.gen_range(0..PALETTE.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_piece_count() {
        let catalog = Catalog::with_seed(1);
        assert_eq!(catalog.piece_count(), 7);
    }

    #[test]
    fn test_line_shape() {
        let line = Shape::line();
        assert_eq!(line.width(), 4);
        assert_eq!(line.height(), 1);
        assert_eq!(line.filled_cells().count(), 4);
    }

    #[test]
    fn test_rotate_t_piece() {
        let t = Shape::from_matrix(&[&[1, 1, 1], &[0, 1, 0]]);
        let rotated = t.rotated();
        assert_eq!(rotated, Shape::from_matrix(&[&[1, 0], &[1, 1], &[1, 0]]));
    }

    #[test]
    fn test_rotate_line_is_vertical() {
        let rotated = Shape::line().rotated();
        assert_eq!(rotated.width(), 1);
        assert_eq!(rotated.height(), 4);
    }

    #[test]
    fn test_four_rotations_restore_every_template() {
        for template in TEMPLATES {
            let shape = Shape::from_matrix(template);
            let spun = shape.rotated().rotated().rotated().rotated();
            assert_eq!(spun, shape);
        }
    }

    #[test]
    fn test_rotate_ragged_matrix() {
        let ragged = Shape::from_matrix(&[&[1, 1, 1], &[1]]);
        let rotated = ragged.rotated();
        assert_eq!(rotated, Shape::from_matrix(&[&[1, 0], &[1, 0], &[1, 1]]));
        assert_eq!(rotated.filled_cells().count(), 4);
    }

    #[test]
    fn test_rotation_keeps_template_intact() {
        let shape = Shape::from_matrix(TEMPLATES[5]);
        let _ = shape.rotated();
        assert_eq!(shape, Shape::from_matrix(TEMPLATES[5]));
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Catalog::with_seed(42);
        let mut b = Catalog::with_seed(42);
        for _ in 0..50 {
            assert_eq!(a.random_shape(), b.random_shape());
            assert_eq!(a.random_color(), b.random_color());
        }
    }

    #[test]
    fn test_all_shapes_and_colors_reachable() {
        let mut catalog = Catalog::with_seed(7);
        let mut shapes = HashSet::new();
        let mut colors = HashSet::new();
        for _ in 0..500 {
            shapes.insert(catalog.random_shape().rows().to_vec());
            colors.insert(catalog.random_color());
        }
        assert_eq!(shapes.len(), 7);
        assert_eq!(colors.len(), PALETTE.len());
        assert!(colors.iter().all(|&c| c < PALETTE.len()));
    }

    #[test]
    fn test_unknown_palette_index_falls_back() {
        assert_eq!(palette_color(0), Color::Red);
        assert_eq!(palette_color(99), Color::White);
    }
}
