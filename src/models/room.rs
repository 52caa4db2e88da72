//! Room model.
//!
//! Rooms are always available at every quantum; only feature matching
//! (for practical sessions) restricts candidacy. Room double-booking and
//! capacity are outside the evaluated constraint set.

use serde::{Deserialize, Serialize};

/// A teaching room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Seat capacity.
    pub capacity: i32,
    /// Equipment/type features (e.g. "lab", "projector").
    pub features: Vec<String>,
}

impl Room {
    /// Creates a new room with capacity 1.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity: 1,
            features: Vec::new(),
        }
    }

    /// Sets the room name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the seat capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Adds a feature.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Whether this room has a given feature.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Whether this room has every feature in `required`.
    pub fn supports_all(&self, required: &[String]) -> bool {
        required.iter().all(|f| self.has_feature(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::new("R1")
            .with_name("Lab 101")
            .with_capacity(30)
            .with_feature("lab")
            .with_feature("projector");

        assert_eq!(r.id, "R1");
        assert_eq!(r.capacity, 30);
        assert!(r.has_feature("lab"));
        assert!(!r.has_feature("whiteboard"));
    }

    #[test]
    fn test_supports_all() {
        let r = Room::new("R1").with_feature("lab").with_feature("projector");
        assert!(r.supports_all(&["lab".into()]));
        assert!(r.supports_all(&["lab".into(), "projector".into()]));
        assert!(!r.supports_all(&["lab".into(), "3d-printer".into()]));
        assert!(r.supports_all(&[])); // no requirements
    }
}
