/// Tile types and the immutable level grid.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use crate::consts::{EDGE_EPSILON, TILE};

use super::rect::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
}

impl Tile {
    /// Can a body occupy this cell?
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid)
    }
}

/// Inclusive tile index range covered by a rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileRange {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl TileRange {
    /// Tiles a rectangle touches. The far edge is pulled in by
    /// `EDGE_EPSILON` so a rectangle ending exactly on a tile boundary
    /// does not cover the next tile.
    pub fn covering(r: &Rect) -> Self {
        TileRange {
            min_x: (r.x / TILE).floor() as i32,
            max_x: ((r.x + r.w - EDGE_EPSILON) / TILE).floor() as i32,
            min_y: (r.y / TILE).floor() as i32,
            max_y: ((r.y + r.h - EDGE_EPSILON) / TILE).floor() as i32,
        }
    }

    /// Row-major scan: top to bottom, left to right.
    pub fn cells(self) -> impl Iterator<Item = (i32, i32)> {
        (self.min_y..=self.max_y)
            .flat_map(move |y| (self.min_x..=self.max_x).map(move |x| (x, y)))
    }
}

/// Solid/empty lookup derived once per level. Never mutated after load.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    tiles: Vec<Vec<Tile>>,
    width: usize,
    height: usize,
}

impl TileGrid {
    pub fn new(tiles: Vec<Vec<Tile>>) -> Self {
        let height = tiles.len();
        let width = tiles.first().map_or(0, |row| row.len());
        TileGrid { tiles, width, height }
    }

    /// Width in tiles.
    pub fn width(&self) -> usize { self.width }

    /// Height in tiles.
    pub fn height(&self) -> usize { self.height }

    pub fn pixel_width(&self) -> f64 { self.width as f64 * TILE }

    pub fn pixel_height(&self) -> f64 { self.height as f64 * TILE }

    /// Query tile at (tx, ty). Anything outside the grid is solid.
    #[inline]
    pub fn tile_at(&self, tx: i32, ty: i32) -> Tile {
        if tx < 0 || ty < 0 || tx as usize >= self.width || ty as usize >= self.height {
            return Tile::Solid; // out of bounds = wall
        }
        self.tiles[ty as usize][tx as usize]
    }

    #[inline]
    pub fn is_solid(&self, tx: i32, ty: i32) -> bool {
        self.tile_at(tx, ty).is_solid()
    }

    /// Is the tile containing pixel (px, py) solid?
    #[inline]
    pub fn is_solid_px(&self, px: f64, py: f64) -> bool {
        self.is_solid((px / TILE).floor() as i32, (py / TILE).floor() as i32)
    }

    /// Pixel rectangle of cell (tx, ty).
    pub fn cell_rect(tx: i32, ty: i32) -> Rect {
        Rect::new(tx as f64 * TILE, ty as f64 * TILE, TILE, TILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(rows: &[&str]) -> TileGrid {
        TileGrid::new(
            rows.iter()
                .map(|r| r.chars().map(|c| if c == '#' { Tile::Solid } else { Tile::Empty }).collect())
                .collect(),
        )
    }

    #[test]
    fn out_of_bounds_is_solid() {
        let g = grid_from(&["..", ".."]);
        assert!(!g.is_solid(0, 0));
        assert!(g.is_solid(-1, 0));
        assert!(g.is_solid(0, -1));
        assert!(g.is_solid(2, 0));
        assert!(g.is_solid(0, 2));
    }

    #[test]
    fn dimensions() {
        let g = grid_from(&["...", "###"]);
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert_eq!(g.pixel_width(), 192.0);
        assert_eq!(g.pixel_height(), 128.0);
    }

    #[test]
    fn range_excludes_grazed_tile() {
        // Exactly one tile wide and tall, aligned to the grid.
        let r = Rect::new(64.0, 64.0, 64.0, 64.0);
        let range = TileRange::covering(&r);
        assert_eq!(range, TileRange { min_x: 1, max_x: 1, min_y: 1, max_y: 1 });
    }

    #[test]
    fn range_spans_straddled_tiles() {
        let r = Rect::new(60.0, 10.0, 10.0, 60.0);
        let range = TileRange::covering(&r);
        assert_eq!(range, TileRange { min_x: 0, max_x: 1, min_y: 0, max_y: 1 });
        let cells: Vec<_> = range.cells().collect();
        assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn range_handles_negative_coordinates() {
        let r = Rect::new(-10.0, -70.0, 20.0, 20.0);
        let range = TileRange::covering(&r);
        assert_eq!(range.min_x, -1);
        assert_eq!(range.max_x, 0);
        assert_eq!(range.min_y, -2);
        assert_eq!(range.max_y, -1);
    }

    #[test]
    fn pixel_query() {
        let g = grid_from(&["..", ".#"]);
        assert!(g.is_solid_px(100.0, 100.0));
        assert!(!g.is_solid_px(63.9, 63.9));
    }
}
