use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::geometry::{Point, Transform};
use crate::layer::LayerId;

/// Direction a port faces. Serialized as its angle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Orientation {
    East,
    North,
    West,
    South,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::East,
        Orientation::North,
        Orientation::West,
        Orientation::South,
    ];

    pub fn degrees(self) -> f64 {
        match self {
            Orientation::East => 0.0,
            Orientation::North => 90.0,
            Orientation::West => 180.0,
            Orientation::South => 270.0,
        }
    }

    fn quarter_turns(self) -> i64 {
        match self {
            Orientation::East => 0,
            Orientation::North => 1,
            Orientation::West => 2,
            Orientation::South => 3,
        }
    }

    fn from_quarter_turns(turns: i64) -> Self {
        match turns.rem_euclid(4) {
            0 => Orientation::East,
            1 => Orientation::North,
            2 => Orientation::West,
            _ => Orientation::South,
        }
    }

    /// True for East and West, whose port width spans the y extent.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Orientation::East | Orientation::West)
    }

    /// Orientation after placement. Transforms are restricted to quarter turns.
    pub fn transformed(self, t: &Transform) -> Self {
        let mut turns = self.quarter_turns();
        if t.mirror_x {
            turns = -turns;
        }
        Self::from_quarter_turns(turns + t.quarter_turns())
    }
}

impl TryFrom<f64> for Orientation {
    type Error = LayoutError;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        match degrees {
            d if d == 0.0 => Ok(Orientation::East),
            d if d == 90.0 => Ok(Orientation::North),
            d if d == 180.0 => Ok(Orientation::West),
            d if d == 270.0 || d == -90.0 => Ok(Orientation::South),
            d => Err(LayoutError::InvalidOrientation(d)),
        }
    }
}

impl From<Orientation> for f64 {
    fn from(o: Orientation) -> Self {
        o.degrees()
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

/// What a port connects to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortType {
    Electrical,
    Optical,
    Pad,
}

impl PortType {
    pub fn as_str(self) -> &'static str {
        match self {
            PortType::Electrical => "electrical",
            PortType::Optical => "optical",
            PortType::Pad => "pad",
        }
    }

    /// Name prefix used when ports are renumbered; pad ports keep their names.
    pub fn rename_prefix(self) -> Option<&'static str> {
        match self {
            PortType::Electrical => Some("e"),
            PortType::Optical => Some("o"),
            PortType::Pad => None,
        }
    }
}

impl FromStr for PortType {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electrical" => Ok(PortType::Electrical),
            "optical" => Ok(PortType::Optical),
            "pad" => Ok(PortType::Pad),
            other => Err(LayoutError::UnknownPortType(other.to_string())),
        }
    }
}

impl fmt::Display for PortType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed, oriented connection point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub name: String,
    pub center: Point,
    pub width: f64,
    pub orientation: Orientation,
    pub layer: LayerId,
    pub port_type: PortType,
}

impl Port {
    pub fn new(
        name: &str,
        center: Point,
        width: f64,
        orientation: Orientation,
        layer: LayerId,
        port_type: PortType,
    ) -> Self {
        Self {
            name: name.to_string(),
            center,
            width,
            orientation,
            layer,
            port_type,
        }
    }

    pub fn transformed(&self, t: &Transform) -> Port {
        Port {
            center: t.apply(&self.center),
            width: self.width * t.scale,
            orientation: self.orientation.transformed(t),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orientation_from_degrees() {
        assert_eq!(Orientation::try_from(0.0), Ok(Orientation::East));
        assert_eq!(Orientation::try_from(90.0), Ok(Orientation::North));
        assert_eq!(Orientation::try_from(180.0), Ok(Orientation::West));
        assert_eq!(Orientation::try_from(270.0), Ok(Orientation::South));
        assert_eq!(Orientation::try_from(-90.0), Ok(Orientation::South));
        assert_eq!(
            Orientation::try_from(45.0),
            Err(LayoutError::InvalidOrientation(45.0))
        );
    }

    #[test]
    fn test_orientation_serde() {
        assert_eq!(serde_json::to_string(&Orientation::North).unwrap(), "90.0");
        let o: Orientation = serde_json::from_str("-90").unwrap();
        assert_eq!(o, Orientation::South);
        assert!(serde_json::from_str::<Orientation>("45").is_err());
    }

    #[test]
    fn test_orientation_under_mirror() {
        let mirror = Transform::mirror_about_x(0.0);
        assert_eq!(Orientation::East.transformed(&mirror), Orientation::West);
        assert_eq!(Orientation::North.transformed(&mirror), Orientation::North);
        assert_eq!(Orientation::South.transformed(&mirror), Orientation::South);
    }

    #[test]
    fn test_port_type_parse() {
        assert_eq!("optical".parse::<PortType>(), Ok(PortType::Optical));
        assert!("thermal".parse::<PortType>().is_err());
        assert_eq!(serde_json::to_string(&PortType::Pad).unwrap(), "\"pad\"");
    }
}
