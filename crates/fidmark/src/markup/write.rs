use std::io::Write;
use std::path::Path;

use super::{
    MarkupError, MarkupFile, MarkupPoint, ASSOCIATED_NODE_ID, DEFAULT_RADIUS, HEADER_LINES,
    NODE_ID_PREFIX,
};

/// Orientation, visibility, selection and lock columns written for every record.
const FIXED_COLUMNS: &str = "0.000,0.000,0.000,1.000,1,1,0";

/// Render one record line (without the trailing newline).
///
/// The id is synthesized from `index`. With `with_radius` the `desc` column
/// carries the radius, falling back to [`DEFAULT_RADIUS`].
pub fn format_record(index: usize, label: &str, point: &MarkupPoint, with_radius: bool) -> String {
    let [x, y, z] = point.xyz;
    let desc = if with_radius {
        format!("{:.3}", point.radius.unwrap_or(DEFAULT_RADIUS))
    } else {
        String::new()
    };
    format!(
        "{NODE_ID_PREFIX}{index},{x:.3},{y:.3},{z:.3},{FIXED_COLUMNS},{label},{desc},{ASSOCIATED_NODE_ID}"
    )
}

/// Encode with an empty `desc` column.
pub fn write_markups<W: Write>(writer: W, file: &MarkupFile) -> Result<(), MarkupError> {
    encode_into(writer, file, false)
}

/// Encode with each point's radius in the `desc` column.
pub fn write_markups_with_radius<W: Write>(writer: W, file: &MarkupFile) -> Result<(), MarkupError> {
    encode_into(writer, file, true)
}

/// Encode to `path` atomically.
///
/// The content is written to a temporary file next to `path` and renamed
/// over it, so a failure never leaves a truncated file behind.
pub fn write_markups_file(
    path: &Path,
    file: &MarkupFile,
    with_radius: bool,
) -> Result<(), MarkupError> {
    let mut buf = Vec::new();
    encode_into(&mut buf, file, with_radius)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&buf)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| MarkupError::Io(e.error))?;

    tracing::debug!("wrote {} fiducials to {}", file.len(), path.display());
    Ok(())
}

fn encode_into<W: Write>(
    mut writer: W,
    file: &MarkupFile,
    with_radius: bool,
) -> Result<(), MarkupError> {
    for line in HEADER_LINES {
        writeln!(writer, "{}", line)?;
    }
    for (i, (label, point)) in file.iter().enumerate() {
        writeln!(writer, "{}", format_record(i, label, point, with_radius))?;
    }
    writer.flush()?;
    Ok(())
}
