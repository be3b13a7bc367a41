//! fidmark — fiducial markup files and unit-aware 3D landmarks.
//!
//! Two independent pieces:
//!
//! 1. **Markup codec** – reads and writes the Markups fiducial text format
//!    (version 4.10, 14 columns) into an insertion-ordered
//!    `label -> (x, y, z[, radius])` mapping.
//! 2. **Fiducial** – a single landmark with spacing/origin metadata and
//!    in-place, chainable transforms: millimetre ↔ pixel conversion, axis
//!    flips, origin translation and reset.
//!
//! A typical flow decodes a file, wraps each record into a [`Fiducial`]
//! (see [`fiducials_from_markups`]), transforms it, and writes the result
//! back with [`write_markups_file`].
//!
//! # Example
//!
//! ```
//! use std::io::Cursor;
//! use fidmark::{read_markups, Fiducial};
//!
//! let text = "vtkMRMLMarkupsFiducialNode_0,1.000,2.000,3.000,0,0,0,1,1,1,0,ptA,,node1\n";
//! let file = read_markups(Cursor::new(text), false)?;
//! let point = file.get("ptA").unwrap();
//!
//! let mut fid = Fiducial::with_geometry(&point.xyz, &[0.5, 0.5, 1.0], &[0.0; 3], Some("ptA".into()))?;
//! fid.to_pix();
//! assert_eq!(fid.position(), [2.0, 4.0, 3.0]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod coord;
mod fiducial;
mod landmarks;
mod markup;

pub use coord::{Axis, Coordinate};
pub use fiducial::{Fiducial, FiducialError, FiducialHeader, UnitMode, DEFAULT_ORIGIN, DEFAULT_SPACING};
pub use landmarks::{fiducials_from_markups, markups_from_fiducials};
pub use markup::{
    format_record, parse_record, read_markups, read_markups_file, write_markups, write_markups_file,
    write_markups_with_radius, MarkupError, MarkupFile, MarkupPoint, DEFAULT_RADIUS, HEADER_LINES,
};
