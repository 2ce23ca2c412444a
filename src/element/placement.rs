//! Where an element sits on the canvas.
//!
//! Placement never influences simulation; it is carried so that rebuilds
//! and saves reproduce the element in the same spot.

/// Which side an element's inputs face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serialize", serde(rename_all = "UPPERCASE"))]
pub enum Orientation {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Orientation::Left => "LEFT",
            Orientation::Right => "RIGHT",
            Orientation::Up => "UP",
            Orientation::Down => "DOWN",
        };
        f.write_str(s)
    }
}

/// Canvas position plus orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub x: i32,
    pub y: i32,
    pub direction: Orientation,
}

impl Placement {
    pub fn new(x: i32, y: i32, direction: Orientation) -> Self {
        Placement { x, y, direction }
    }

    /// Same spot, default orientation.
    pub fn at(x: i32, y: i32) -> Self {
        Placement::new(x, y, Orientation::default())
    }
}
