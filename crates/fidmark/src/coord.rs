//! Fixed-size 3D coordinates and axis labels.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::fiducial::FiducialError;

/// A single (x, y, z) triple in 32-bit precision.
pub type Coordinate = Vector3<f32>;

/// Number of components every coordinate-typed value must carry.
pub const XYZ_LEN: usize = 3;

/// Image axis label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in storage order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis inside a [`Coordinate`].
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Parse a single axis letter, case-insensitive.
    pub fn from_char(c: char) -> Result<Self, FiducialError> {
        match c.to_ascii_lowercase() {
            'x' => Ok(Self::X),
            'y' => Ok(Self::Y),
            'z' => Ok(Self::Z),
            _ => Err(FiducialError::UnknownAxis(c)),
        }
    }

    /// Parse a run of axis letters such as `"xY"`.
    ///
    /// Repeated letters are kept, so `"xx"` yields two `X` entries.
    pub fn parse_list(labels: &str) -> Result<Vec<Self>, FiducialError> {
        labels.chars().map(Self::from_char).collect()
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        };
        write!(f, "{}", c)
    }
}

/// Build a [`Coordinate`] from a slice, rejecting anything but 3 components.
///
/// `what` names the argument in the resulting error.
pub fn xyz_from_slice(what: &'static str, values: &[f32]) -> Result<Coordinate, FiducialError> {
    match values {
        [x, y, z] => Ok(Coordinate::new(*x, *y, *z)),
        _ => Err(FiducialError::Dimension {
            what,
            expected: XYZ_LEN,
            got: values.len(),
        }),
    }
}

/// Copy a coordinate out as a plain array.
pub fn to_array(v: &Coordinate) -> [f32; 3] {
    [v.x, v.y, v.z]
}
