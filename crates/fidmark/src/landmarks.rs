//! Conversion between decoded markup files and [`Fiducial`] values.

use crate::fiducial::{Fiducial, FiducialHeader};
use crate::markup::{MarkupFile, MarkupPoint};

/// Wrap every record into a named [`Fiducial`] sharing `header`'s geometry.
///
/// Output order follows the file. Radii are not carried over.
pub fn fiducials_from_markups(file: &MarkupFile, header: &FiducialHeader) -> Vec<Fiducial> {
    file.iter()
        .map(|(label, point)| Fiducial::with_header(point.xyz, header, Some(label.to_string())))
        .collect()
}

/// Collect fiducials back into a [`MarkupFile`], positions in millimetres.
///
/// Pixel-mode fiducials are converted on a copy. Unnamed fiducials get an
/// empty label, and later fiducials win on label collisions.
pub fn markups_from_fiducials<'a, I>(fiducials: I) -> MarkupFile
where
    I: IntoIterator<Item = &'a Fiducial>,
{
    fiducials
        .into_iter()
        .map(|f| {
            let mut mm = f.clone();
            mm.to_mm();
            let label = f.name().unwrap_or_default().to_string();
            (label, MarkupPoint::new(mm.position()))
        })
        .collect()
}
