use serde::{Deserialize, Serialize};

use crate::model::WorldState;

/// Rectangle of the world the observer map draws.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CageBounds {
    /// Leftmost column.
    pub min_x: i32,
    /// Rightmost column.
    pub max_x: i32,
    /// Bottom row.
    pub min_y: i32,
    /// Top row.
    pub max_y: i32,
}

impl Default for CageBounds {
    fn default() -> Self {
        Self {
            min_x: -5,
            max_x: 15,
            min_y: -5,
            max_y: 15,
        }
    }
}

impl CageBounds {
    /// Columns in the grid.
    #[must_use]
    pub fn width(&self) -> usize {
        usize::try_from(self.max_x - self.min_x + 1).unwrap_or(0)
    }

    /// Rows in the grid.
    #[must_use]
    pub fn height(&self) -> usize {
        usize::try_from(self.max_y - self.min_y + 1).unwrap_or(0)
    }

    fn cell(&self, (x, y): (i32, i32)) -> Option<(usize, usize)> {
        let col = usize::try_from(x - self.min_x).ok()?;
        let row = usize::try_from(self.max_y - y).ok()?;
        (col < self.width() && row < self.height()).then_some((col, row))
    }
}

/// Observer-only symbolic map. Top row is `max_y`.
#[must_use]
pub fn ascii_map(world: &WorldState, bounds: CageBounds) -> String {
    let mut grid = vec![vec![" ."; bounds.width()]; bounds.height()];
    for place in world.places.values() {
        if let Some((col, row)) = bounds.cell(place.pos) {
            grid[row][col] = place.kind.glyph();
        }
    }
    grid.iter()
        .map(|row| row.concat())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::{Place, PlaceKind};

    #[test]
    fn draws_places_with_inverted_y() {
        let mut world = WorldState::new(0);
        world.add_place(Place::new("h", "Hospital", PlaceKind::Hospital, (0, 0)));
        world.add_place(Place::new("p", "Park", PlaceKind::Park, (1, 1)));
        world.add_place(Place::new("far", "Far", PlaceKind::Shops, (99, 99)));
        let bounds = CageBounds {
            min_x: 0,
            max_x: 2,
            min_y: 0,
            max_y: 1,
        };
        let map = ascii_map(&world, bounds);
        assert_eq!(map, " . P .\n H . .");
    }

    #[test]
    fn default_bounds_are_21_square() {
        let bounds = CageBounds::default();
        assert_eq!(bounds.width(), 21);
        assert_eq!(bounds.height(), 21);
    }
}
