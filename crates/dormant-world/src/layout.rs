//! ASCII layouts for building maps in tests and scenarios.
//!
//! Each character of each row maps to a tile through a legend. Row `r`,
//! column `c` lands at `origin + (c, r)`. Every character's locations are
//! also recorded so callers can spawn agents on them.

use std::collections::BTreeMap;

use dormant_types::Point;

use crate::error::WorldError;
use crate::tile::Tile;
use crate::tile_map::TileMap;

/// Result of parsing a layout.
#[derive(Debug, Clone, Default)]
pub struct ParsedLayout {
    /// The tiles.
    pub map: TileMap,
    /// Locations of every character, in row-major order.
    pub marks: BTreeMap<char, Vec<Point>>,
}

impl ParsedLayout {
    /// Locations marked with `ch`, in row-major order.
    pub fn marked(&self, ch: char) -> &[Point] {
        self.marks.get(&ch).map_or(&[], Vec::as_slice)
    }
}

/// Parse `rows` into a map using `legend`.
///
/// # Errors
///
/// Returns [`WorldError::UnknownLayoutChar`] for a character missing from
/// the legend and [`WorldError::LayoutOutOfRange`] if a coordinate does not
/// fit.
pub fn parse_layout(
    rows: &[&str],
    legend: &BTreeMap<char, Tile>,
    origin: Point,
) -> Result<ParsedLayout, WorldError> {
    let mut parsed = ParsedLayout::default();
    for (row, line) in rows.iter().enumerate() {
        for (column, ch) in line.chars().enumerate() {
            let tile = legend
                .get(&ch)
                .ok_or(WorldError::UnknownLayoutChar { ch, row, column })?;
            let at = locate(origin, row, column)
                .ok_or(WorldError::LayoutOutOfRange { row, column })?;
            parsed.map.insert(at, tile.clone());
            parsed.marks.entry(ch).or_default().push(at);
        }
    }
    Ok(parsed)
}

fn locate(origin: Point, row: usize, column: usize) -> Option<Point> {
    let dx = i32::try_from(column).ok()?;
    let dy = i32::try_from(row).ok()?;
    origin.offset(dx, dy)
}
