//! Tile contents: terrain, furniture, fields, and vehicle parts.

use dormant_types::{FieldKind, VehicleId};
use serde::{Deserialize, Serialize};

/// Base terrain of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// Walkable open floor.
    #[default]
    Floor,
    /// Solid wall; blocks movement and sight.
    Wall,
}

impl Terrain {
    /// Whether agents can stand on this terrain.
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Floor)
    }

    /// Whether this terrain blocks line of sight.
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Wall)
    }
}

/// Furniture placed on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Furniture {
    /// Loose rubble. Passable, but agents standing on it lose their footing.
    Rubble,
}

impl Furniture {
    /// Whether standing on this furniture confers unstable footing.
    pub const fn is_unstable(self) -> bool {
        matches!(self, Self::Rubble)
    }
}

/// A field of some kind and strength occupying a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Field {
    /// What the field is.
    pub kind: FieldKind,
    /// Strength, 1 (weak) and up.
    pub intensity: u8,
}

impl Field {
    /// Create a field.
    pub const fn new(kind: FieldKind, intensity: u8) -> Self {
        Self { kind, intensity }
    }

    /// Danger this field poses to an agent that is not immune to it.
    pub fn danger(self) -> u32 {
        self.kind.base_danger().saturating_mul(u32::from(self.intensity))
    }
}

/// Everything on one map square.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Base terrain.
    pub terrain: Terrain,
    /// Furniture, if any.
    pub furniture: Option<Furniture>,
    /// Active fields. At most one field of each kind.
    pub fields: Vec<Field>,
    /// Vehicle with a boardable part on this tile.
    pub vehicle: Option<VehicleId>,
}

impl Tile {
    /// A bare floor tile.
    pub fn floor() -> Self {
        Self::default()
    }

    /// A wall tile.
    pub fn wall() -> Self {
        Self {
            terrain: Terrain::Wall,
            ..Self::default()
        }
    }

    /// Builder: place furniture.
    #[must_use]
    pub const fn with_furniture(mut self, furniture: Furniture) -> Self {
        self.furniture = Some(furniture);
        self
    }

    /// Builder: add or replace a field.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.set_field(field);
        self
    }

    /// Builder: park a vehicle part here.
    #[must_use]
    pub const fn with_vehicle(mut self, vehicle: VehicleId) -> Self {
        self.vehicle = Some(vehicle);
        self
    }

    /// Add `field`, replacing any field of the same kind.
    pub fn set_field(&mut self, field: Field) {
        if let Some(existing) = self.fields.iter_mut().find(|f| f.kind == field.kind) {
            *existing = field;
        } else {
            self.fields.push(field);
        }
    }

    /// Remove the field of `kind`. Returns `true` if one was present.
    pub fn remove_field(&mut self, kind: FieldKind) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| f.kind != kind);
        self.fields.len() != before
    }

    /// Whether agents can stand here.
    pub const fn is_passable(&self) -> bool {
        self.terrain.is_passable()
    }

    /// Whether standing here confers unstable footing.
    pub fn is_unstable(&self) -> bool {
        self.furniture.is_some_and(Furniture::is_unstable)
    }

    /// Whether a vehicle seat can be boarded here.
    pub const fn is_boardable(&self) -> bool {
        self.vehicle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_danger_scales_with_intensity() {
        assert_eq!(Field::new(FieldKind::Acid, 3).danger(), 6);
        assert_eq!(Field::new(FieldKind::Smoke, 1).danger(), 1);
        assert_eq!(Field::new(FieldKind::Fire, 0).danger(), 0);
    }

    #[test]
    fn set_field_replaces_same_kind() {
        let mut tile = Tile::floor().with_field(Field::new(FieldKind::Acid, 1));
        tile.set_field(Field::new(FieldKind::Acid, 3));
        tile.set_field(Field::new(FieldKind::Smoke, 2));
        assert_eq!(tile.fields.len(), 2);
        assert!(tile.fields.contains(&Field::new(FieldKind::Acid, 3)));
        assert!(tile.remove_field(FieldKind::Acid));
        assert!(!tile.remove_field(FieldKind::Acid));
    }

    #[test]
    fn flags_follow_contents() {
        let rubble = Tile::floor().with_furniture(Furniture::Rubble);
        assert!(rubble.is_passable());
        assert!(rubble.is_unstable());
        assert!(!Tile::wall().is_passable());
        assert!(Tile::floor().with_vehicle(VehicleId::new()).is_boardable());
    }
}
