//! Single 3D landmark with unit-aware transforms.
//!
//! A [`Fiducial`] holds one position together with the image geometry needed
//! to move it between millimetre and pixel space. All transforms mutate in
//! place and return `&mut Self`, so calls chain:
//!
//! ```
//! use fidmark::{Axis, Fiducial};
//!
//! let mut f = Fiducial::with_geometry(&[10.0, 20.0, 30.0], &[0.5, 0.5, 2.0], &[0.0; 3], None)?;
//! f.flip(&[Axis::X]).to_pix();
//! assert_eq!(f.position(), [-20.0, 40.0, 15.0]);
//! # Ok::<(), fidmark::FiducialError>(())
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coord::{self, Axis, Coordinate};

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors raised while building or mutating a [`Fiducial`].
#[derive(Debug, Clone, PartialEq)]
pub enum FiducialError {
    /// A coordinate-typed argument did not have exactly three components.
    Dimension {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// An axis label outside `{x, y, z}`.
    UnknownAxis(char),
}

impl std::fmt::Display for FiducialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dimension {
                what,
                expected,
                got,
            } => write!(f, "{}: expected {} components, got {}", what, expected, got),
            Self::UnknownAxis(c) => write!(f, "unknown axis '{}' (expected x, y or z)", c),
        }
    }
}

impl std::error::Error for FiducialError {}

// ── Types ──────────────────────────────────────────────────────────────────

/// Unit the position is currently expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitMode {
    #[default]
    Millimeter,
    Pixel,
}

/// Image geometry attached to a fiducial.
///
/// Doubles as the on-disk geometry config (JSON) used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FiducialHeader {
    /// Physical size of one pixel step along x, y, z.
    pub spacing: [f32; 3],
    /// Offset vector.
    pub origin: [f32; 3],
}

impl Default for FiducialHeader {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_SPACING,
            origin: DEFAULT_ORIGIN,
        }
    }
}

impl FiducialHeader {
    /// Load a header from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let data = std::fs::read_to_string(path)?;
        let header: Self = serde_json::from_str(&data)?;
        Ok(header)
    }
}

pub const DEFAULT_SPACING: [f32; 3] = [1.0, 1.0, 1.0];
pub const DEFAULT_ORIGIN: [f32; 3] = [0.0, 0.0, 0.0];

/// Validated constructor arguments, kept verbatim for [`Fiducial::reset`].
#[derive(Debug, Clone, PartialEq)]
struct FiducialInit {
    position: Coordinate,
    spacing: Coordinate,
    origin: Coordinate,
    name: Option<String>,
}

/// A named 3D landmark with spacing/origin metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Fiducial {
    position: Coordinate,
    spacing: Coordinate,
    origin: Coordinate,
    name: Option<String>,
    unit_mode: UnitMode,
    init: FiducialInit,
}

impl Fiducial {
    /// Create a fiducial in millimetres with unit spacing and zero origin.
    pub fn new(position: &[f32]) -> Result<Self, FiducialError> {
        Self::with_geometry(position, &DEFAULT_SPACING, &DEFAULT_ORIGIN, None)
    }

    /// Create a fiducial with explicit spacing, origin and optional name.
    ///
    /// Every vector must have exactly three components.
    pub fn with_geometry(
        position: &[f32],
        spacing: &[f32],
        origin: &[f32],
        name: Option<String>,
    ) -> Result<Self, FiducialError> {
        let init = FiducialInit {
            position: coord::xyz_from_slice("position", position)?,
            spacing: coord::xyz_from_slice("spacing", spacing)?,
            origin: coord::xyz_from_slice("origin", origin)?,
            name,
        };
        Ok(Self::from_init(init))
    }

    /// Create a fiducial from a position and a [`FiducialHeader`].
    pub fn with_header(position: [f32; 3], header: &FiducialHeader, name: Option<String>) -> Self {
        Self::from_init(FiducialInit {
            position: Coordinate::from(position),
            spacing: Coordinate::from(header.spacing),
            origin: Coordinate::from(header.origin),
            name,
        })
    }

    fn from_init(init: FiducialInit) -> Self {
        Self {
            position: init.position,
            spacing: init.spacing,
            origin: init.origin,
            name: init.name.clone(),
            unit_mode: UnitMode::Millimeter,
            init,
        }
    }

    /// Discard every transform and restore the construction-time state.
    pub fn reset(&mut self) -> &mut Self {
        let init = self.init.clone();
        *self = Self::from_init(init);
        self
    }

    /// Current position `(x, y, z)`.
    pub fn position(&self) -> [f32; 3] {
        coord::to_array(&self.position)
    }

    /// Per-axis spacing `(x, y, z)`.
    pub fn spacing(&self) -> [f32; 3] {
        coord::to_array(&self.spacing)
    }

    /// Origin offset `(x, y, z)`.
    pub fn origin(&self) -> [f32; 3] {
        coord::to_array(&self.origin)
    }

    /// Alias of [`Fiducial::origin`].
    pub fn offset(&self) -> [f32; 3] {
        self.origin()
    }

    /// Snapshot of spacing and origin. Later mutations do not affect it.
    pub fn header(&self) -> FiducialHeader {
        FiducialHeader {
            spacing: self.spacing(),
            origin: self.origin(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Rename the fiducial. [`Fiducial::reset`] restores the original name.
    pub fn set_name(&mut self, name: Option<String>) -> &mut Self {
        self.name = name;
        self
    }

    pub fn unit_mode(&self) -> UnitMode {
        self.unit_mode
    }

    pub fn is_mm(&self) -> bool {
        self.unit_mode == UnitMode::Millimeter
    }

    /// Accumulate `delta` into the origin offset.
    ///
    /// The position itself is not moved.
    pub fn translation(&mut self, delta: &[f32]) -> Result<&mut Self, FiducialError> {
        let delta = coord::xyz_from_slice("translation", delta)?;
        self.origin += delta;
        Ok(self)
    }

    /// Negate the position component of every listed axis.
    ///
    /// An axis listed twice is flipped twice.
    pub fn flip(&mut self, axes: &[Axis]) -> &mut Self {
        for axis in axes {
            let i = axis.index();
            self.position[i] = -self.position[i];
        }
        self
    }

    /// Like [`Fiducial::flip`] but takes axis letters, e.g. `"xY"`.
    ///
    /// Nothing is flipped if any letter is invalid.
    pub fn flip_labels(&mut self, labels: &str) -> Result<&mut Self, FiducialError> {
        let axes = Axis::parse_list(labels)?;
        Ok(self.flip(&axes))
    }

    /// Divide the position by spacing. No-op when already in pixels.
    pub fn to_pix(&mut self) -> &mut Self {
        if self.unit_mode == UnitMode::Millimeter {
            self.position = self.position.component_div(&self.spacing);
            self.unit_mode = UnitMode::Pixel;
        }
        self
    }

    /// Multiply the position by spacing. No-op when already in millimetres.
    pub fn to_mm(&mut self) -> &mut Self {
        if self.unit_mode == UnitMode::Pixel {
            self.position = self.position.component_mul(&self.spacing);
            self.unit_mode = UnitMode::Millimeter;
        }
        self
    }
}

impl std::fmt::Display for Fiducial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [x, y, z] = self.position();
        write!(f, "[{}, {}, {}]", x, y, z)
    }
}
