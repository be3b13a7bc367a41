//! Markups fiducial file (`.fcsv`, version 4.10) codec.
//!
//! The format is line oriented. Lines starting with `#` are comments, every
//! other line is one comma-separated record of 14 columns:
//!
//! ```text
//! # Markups fiducial file version = 4.10
//! # CoordinateSystem = 0
//! # columns = id,x,y,z,ow,ox,oy,oz,vis,sel,lock,label,desc,associatedNodeID
//! vtkMRMLMarkupsFiducialNode_0,1.000,2.000,3.000,0.000,0.000,0.000,1.000,1,1,0,ptA,,vtkMRMLScalarVolumeNode1
//! ```
//!
//! Decoding keeps only x/y/z, the label and (optionally) the radius stored in
//! the `desc` column. Fields are never quoted, so a comma inside a label
//! corrupts the record.

mod read;
mod write;

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub use read::{parse_record, read_markups, read_markups_file};
pub use write::{format_record, write_markups, write_markups_file, write_markups_with_radius};

/// Fixed header emitted before any record.
pub const HEADER_LINES: [&str; 3] = [
    "# Markups fiducial file version = 4.10",
    "# CoordinateSystem = 0",
    "# columns = id,x,y,z,ow,ox,oy,oz,vis,sel,lock,label,desc,associatedNodeID",
];

/// Radius used when the `desc` column is empty.
pub const DEFAULT_RADIUS: f32 = 1.0;

/// Prefix of the synthesized per-record id.
pub const NODE_ID_PREFIX: &str = "vtkMRMLMarkupsFiducialNode_";

/// Trailing `associatedNodeID` column.
pub const ASSOCIATED_NODE_ID: &str = "vtkMRMLScalarVolumeNode1";

// ── Error type ─────────────────────────────────────────────────────────────

/// Errors raised while reading or writing markup files.
#[derive(Debug)]
pub enum MarkupError {
    /// A record line has fewer than 4 comma-separated fields.
    TooFewFields { line: usize, got: usize },
    /// A coordinate or radius field is not a valid float.
    InvalidNumber {
        line: usize,
        column: usize,
        value: String,
    },
    /// Underlying read/write failure.
    Io(std::io::Error),
}

impl MarkupError {
    /// `true` for malformed content, `false` for I/O failures.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, Self::Io(_))
    }
}

impl std::fmt::Display for MarkupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TooFewFields { line, got } => write!(
                f,
                "line {}: record has {} fields, need at least {}",
                line,
                got,
                read::MIN_FIELDS
            ),
            Self::InvalidNumber {
                line,
                column,
                value,
            } => write!(
                f,
                "line {}: column {} is not a number: {:?}",
                line, column, value
            ),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for MarkupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MarkupError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ── Types ──────────────────────────────────────────────────────────────────

/// One decoded record: position plus optional radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkupPoint {
    pub xyz: [f32; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f32>,
}

impl MarkupPoint {
    pub fn new(xyz: [f32; 3]) -> Self {
        Self { xyz, radius: None }
    }

    pub fn with_radius(xyz: [f32; 3], radius: f32) -> Self {
        Self {
            xyz,
            radius: Some(radius),
        }
    }

    /// `(x, y, z, radius)` when a radius was captured.
    pub fn xyzr(&self) -> Option<[f32; 4]> {
        self.radius.map(|r| [self.xyz[0], self.xyz[1], self.xyz[2], r])
    }
}

impl From<[f32; 3]> for MarkupPoint {
    fn from(xyz: [f32; 3]) -> Self {
        Self::new(xyz)
    }
}

/// Insertion-ordered mapping `label -> point`.
///
/// Re-inserting a label replaces its value but keeps the slot of its first
/// occurrence, so write order follows first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkupFile {
    entries: Vec<(String, MarkupPoint)>,
    /// label -> index into `entries`.
    label_to_idx: HashMap<String, usize>,
}

impl MarkupFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns the previous value for `label`, if any.
    pub fn insert(&mut self, label: impl Into<String>, point: MarkupPoint) -> Option<MarkupPoint> {
        let label = label.into();
        if let Some(&idx) = self.label_to_idx.get(&label) {
            let prev = std::mem::replace(&mut self.entries[idx].1, point);
            return Some(prev);
        }
        self.label_to_idx.insert(label.clone(), self.entries.len());
        self.entries.push((label, point));
        None
    }

    pub fn get(&self, label: &str) -> Option<&MarkupPoint> {
        self.label_to_idx.get(label).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.label_to_idx.contains_key(label)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in write order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// `(label, point)` pairs in write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MarkupPoint)> + '_ {
        self.entries.iter().map(|(l, p)| (l.as_str(), p))
    }
}

impl<L: Into<String>> FromIterator<(L, MarkupPoint)> for MarkupFile {
    fn from_iter<I: IntoIterator<Item = (L, MarkupPoint)>>(iter: I) -> Self {
        let mut file = Self::new();
        for (label, point) in iter {
            file.insert(label, point);
        }
        file
    }
}

impl IntoIterator for MarkupFile {
    type Item = (String, MarkupPoint);
    type IntoIter = std::vec::IntoIter<(String, MarkupPoint)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for MarkupFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, point) in &self.entries {
            map.serialize_entry(label, point)?;
        }
        map.end()
    }
}
