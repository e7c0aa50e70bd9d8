//! Sparse tile grid.
//!
//! The [`TileMap`] stores tiles by absolute [`Point`]. Locations with no
//! entry are unknown: they report no hazard data and block sight.

use std::collections::BTreeMap;

use dormant_types::Point;
use serde::{Deserialize, Serialize};

use crate::hazard::TileHazard;
use crate::tile::{Field, Tile};
use crate::view::{HazardView, LineOfSight};

/// Tiles indexed by location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    tiles: BTreeMap<Point, Tile>,
}

impl TileMap {
    /// Create an empty map.
    pub const fn new() -> Self {
        Self {
            tiles: BTreeMap::new(),
        }
    }

    /// Place `tile` at `at`, returning whatever was there.
    pub fn insert(&mut self, at: Point, tile: Tile) -> Option<Tile> {
        self.tiles.insert(at, tile)
    }

    /// Read the tile at `at`.
    pub fn tile(&self, at: Point) -> Option<&Tile> {
        self.tiles.get(&at)
    }

    /// Mutate the tile at `at`.
    pub fn tile_mut(&mut self, at: Point) -> Option<&mut Tile> {
        self.tiles.get_mut(&at)
    }

    /// Add a field to an existing tile. Returns `false` if `at` is unknown.
    pub fn add_field(&mut self, at: Point, field: Field) -> bool {
        self.tiles.get_mut(&at).is_some_and(|tile| {
            tile.set_field(field);
            true
        })
    }

    /// Number of known tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tiles are known.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Iterate tiles in location order.
    pub fn iter(&self) -> impl Iterator<Item = (&Point, &Tile)> {
        self.tiles.iter()
    }

    fn blocks_sight(&self, at: Point) -> bool {
        self.tiles.get(&at).is_none_or(|tile| tile.terrain.is_opaque())
    }
}

impl HazardView for TileMap {
    fn hazard_at(&self, at: Point) -> Option<TileHazard> {
        self.tiles.get(&at).map(TileHazard::of)
    }
}

impl LineOfSight for TileMap {
    /// Bresenham walk from `from` to `to` on one level. Every tile strictly
    /// between the endpoints must be known and transparent.
    fn has_line_of_sight(&self, from: Point, to: Point) -> bool {
        if from.z != to.z {
            return false;
        }
        bresenham(from, to).is_some_and(|line| {
            line.iter()
                .filter(|p| **p != from && **p != to)
                .all(|p| !self.blocks_sight(*p))
        })
    }
}

/// Points on the Bresenham line from `from` to `to`, both included.
/// `None` if a coordinate step overflows.
fn bresenham(from: Point, to: Point) -> Option<Vec<Point>> {
    let (x0, y0) = (i64::from(from.x), i64::from(from.y));
    let (x1, y1) = (i64::from(to.x), i64::from(to.y));
    let dx = x1.checked_sub(x0)?.abs();
    let dy = y1.checked_sub(y0)?.abs().checked_neg()?;
    let sx: i64 = if x0 < x1 { 1 } else { -1 };
    let sy: i64 = if y0 < y1 { 1 } else { -1 };

    let mut err = dx.checked_add(dy)?;
    let (mut x, mut y) = (x0, y0);
    let mut line = Vec::new();
    loop {
        line.push(Point::new(
            i32::try_from(x).ok()?,
            i32::try_from(y).ok()?,
            from.z,
        ));
        if x == x1 && y == y1 {
            return Some(line);
        }
        let doubled = err.checked_mul(2)?;
        if doubled >= dy {
            err = err.checked_add(dy)?;
            x = x.checked_add(sx)?;
        }
        if doubled <= dx {
            err = err.checked_add(dx)?;
            y = y.checked_add(sy)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use dormant_types::FieldKind;

    use super::*;

    fn open_room(width: i32, height: i32) -> TileMap {
        let mut map = TileMap::new();
        for y in 0..height {
            for x in 0..width {
                map.insert(Point::new(x, y, 0), Tile::floor());
            }
        }
        map
    }

    #[test]
    fn unknown_tile_has_no_hazard_data() {
        let map = open_room(2, 2);
        assert!(map.hazard_at(Point::new(0, 0, 0)).is_some());
        assert!(map.hazard_at(Point::new(5, 5, 0)).is_none());
    }

    #[test]
    fn add_field_only_on_known_tiles() {
        let mut map = open_room(2, 2);
        assert!(map.add_field(Point::new(1, 1, 0), Field::new(FieldKind::Fire, 2)));
        assert!(!map.add_field(Point::new(9, 9, 0), Field::new(FieldKind::Fire, 2)));
        let hazard = map.hazard_at(Point::new(1, 1, 0));
        assert_eq!(hazard.map(|h| h.fields.len()), Some(1));
    }

    #[test]
    fn bresenham_includes_endpoints() {
        let line = bresenham(Point::new(0, 0, 0), Point::new(4, 2, 0));
        let line = line.unwrap_or_default();
        assert_eq!(line.first(), Some(&Point::new(0, 0, 0)));
        assert_eq!(line.last(), Some(&Point::new(4, 2, 0)));
        assert_eq!(line.len(), 5);
    }

    #[test]
    fn walls_block_sight() {
        let mut map = open_room(5, 3);
        assert!(map.has_line_of_sight(Point::new(0, 1, 0), Point::new(4, 1, 0)));
        map.insert(Point::new(2, 1, 0), Tile::wall());
        assert!(!map.has_line_of_sight(Point::new(0, 1, 0), Point::new(4, 1, 0)));
        // An adjacent wall target is still visible.
        assert!(map.has_line_of_sight(Point::new(1, 1, 0), Point::new(2, 1, 0)));
    }

    #[test]
    fn other_levels_are_not_visible() {
        let map = open_room(3, 3);
        assert!(!map.has_line_of_sight(Point::new(0, 0, 0), Point::new(0, 0, 1)));
    }
}
