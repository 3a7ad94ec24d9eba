//! Blueprint types

use serde::{Deserialize, Serialize};

use super::Point;

/// A named drawing owned by an author.
///
/// Identified by the composite key `(author, name)`. The authoritative
/// backend creates blueprints implicitly on the first successful write;
/// the relay never deletes one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blueprint {
    pub author: String,
    pub name: String,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Blueprint {
    /// Create a blueprint seeded with a single point
    pub fn seeded(author: String, name: String, point: Point) -> Self {
        Self {
            author,
            name,
            points: vec![point],
        }
    }

    /// Room identifier for this blueprint's fan-out group
    pub fn room_id(author: &str, name: &str) -> String {
        format!("blueprints.{}.{}", author, name)
    }
}
