use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{MarkupError, MarkupFile, MarkupPoint, DEFAULT_RADIUS};

/// Smallest record that still has x/y/z at columns 1..4.
pub(super) const MIN_FIELDS: usize = 4;

const SEPARATOR: char = ',';
const COMMENT_PREFIX: char = '#';

/// Decode a markup file from a path.
pub fn read_markups_file(path: &Path, with_radius: bool) -> Result<MarkupFile, MarkupError> {
    let file = File::open(path)?;
    tracing::debug!("reading markups from {}", path.display());
    read_markups(BufReader::new(file), with_radius)
}

/// Decode a markup file from any buffered reader.
///
/// Comment lines are skipped. The first malformed record aborts the whole
/// decode. Later records overwrite earlier ones with the same label.
pub fn read_markups<R: BufRead>(reader: R, with_radius: bool) -> Result<MarkupFile, MarkupError> {
    let mut file = MarkupFile::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with(COMMENT_PREFIX) {
            continue;
        }
        let (label, point) = parse_record(&line, i + 1, with_radius)?;
        if file.insert(label, point).is_some() {
            tracing::warn!("line {}: duplicate label overwrites earlier record", i + 1);
        }
    }
    tracing::debug!("decoded {} fiducials", file.len());
    Ok(file)
}

/// Parse one record line into `(label, point)`.
///
/// `line_no` is only used for error reporting. The label is taken verbatim
/// from the third-from-last column; the radius (when requested) from the
/// second-from-last, defaulting to [`DEFAULT_RADIUS`] when empty.
pub fn parse_record(
    line: &str,
    line_no: usize,
    with_radius: bool,
) -> Result<(String, MarkupPoint), MarkupError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let cells: Vec<&str> = line.split(SEPARATOR).collect();
    let n = cells.len();
    if n < MIN_FIELDS {
        return Err(MarkupError::TooFewFields {
            line: line_no,
            got: n,
        });
    }

    let mut xyz = [0.0f32; 3];
    for (k, v) in xyz.iter_mut().enumerate() {
        *v = parse_f32(cells[k + 1], line_no, k + 1)?;
    }

    let label = cells[n - 3].to_string();
    let radius = if with_radius {
        let raw = cells[n - 2];
        Some(if raw.is_empty() {
            DEFAULT_RADIUS
        } else {
            parse_f32(raw, line_no, n - 2)?
        })
    } else {
        None
    };

    Ok((label, MarkupPoint { xyz, radius }))
}

fn parse_f32(raw: &str, line: usize, column: usize) -> Result<f32, MarkupError> {
    raw.trim()
        .parse::<f32>()
        .map_err(|_| MarkupError::InvalidNumber {
            line,
            column,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# Markups fiducial file version = 4.10
# CoordinateSystem = 0
# columns = id,x,y,z,ow,ox,oy,oz,vis,sel,lock,label,desc,associatedNodeID
vtkMRMLMarkupsFiducialNode_0,-31.250,12.000,88.125,0.000,0.000,0.000,1.000,1,1,0,rt_ASIS,,vtkMRMLScalarVolumeNode1
vtkMRMLMarkupsFiducialNode_1,30.500,11.750,87.000,0.000,0.000,0.000,1.000,1,1,0,lt_ASIS,2.5,vtkMRMLScalarVolumeNode1
";

    fn decode(text: &str, with_radius: bool) -> Result<MarkupFile, MarkupError> {
        read_markups(Cursor::new(text), with_radius)
    }

    #[test]
    fn decodes_minimal_record() {
        let file = decode(
            "vtkMRMLMarkupsFiducialNode_0,1.000,2.000,3.000,0,0,0,1,1,1,0,ptA,,node1\n",
            false,
        )
        .unwrap();
        assert_eq!(file.len(), 1);
        assert_eq!(file.get("ptA"), Some(&MarkupPoint::new([1.0, 2.0, 3.0])));
    }

    #[test]
    fn skips_comments_and_keeps_order() {
        let file = decode(SAMPLE, false).unwrap();
        assert_eq!(file.labels().collect::<Vec<_>>(), vec!["rt_ASIS", "lt_ASIS"]);
        assert_eq!(file.get("rt_ASIS").unwrap().xyz, [-31.25, 12.0, 88.125]);
        assert_eq!(file.get("lt_ASIS").unwrap().radius, None);
    }

    #[test]
    fn radius_defaults_to_one_when_empty() {
        let file = decode(SAMPLE, true).unwrap();
        assert_eq!(file.get("rt_ASIS").unwrap().radius, Some(1.0));
        assert_eq!(
            file.get("lt_ASIS").unwrap().xyzr(),
            Some([30.5, 11.75, 87.0, 2.5])
        );
    }

    #[test]
    fn non_numeric_radius_is_a_parse_error() {
        let err = decode("id,1,2,3,0,0,0,1,1,1,0,p,wide,node\n", true).unwrap_err();
        assert!(matches!(
            err,
            MarkupError::InvalidNumber { line: 1, column: 12, .. }
        ));
        // Ignored when radius is not requested.
        assert!(decode("id,1,2,3,0,0,0,1,1,1,0,p,wide,node\n", false).is_ok());
    }

    #[test]
    fn line_without_commas_fails() {
        let err = decode("#comment\nbadline\n", false).unwrap_err();
        assert!(err.is_parse_error());
        assert!(matches!(err, MarkupError::TooFewFields { line: 2, got: 1 }));
    }

    #[test]
    fn blank_line_fails() {
        let err = decode("id,1,2,3,0,0,0,1,1,1,0,a,,n\n\nid,4,5,6,0,0,0,1,1,1,0,b,,n\n", false)
            .unwrap_err();
        assert!(matches!(err, MarkupError::TooFewFields { line: 2, .. }));
    }

    #[test]
    fn non_numeric_coordinate_fails_whole_file() {
        let text = "id,1,2,3,0,0,0,1,1,1,0,a,,n\nid,1,oops,3,0,0,0,1,1,1,0,b,,n\n";
        match decode(text, false).unwrap_err() {
            MarkupError::InvalidNumber {
                line,
                column,
                value,
            } => {
                assert_eq!(line, 2);
                assert_eq!(column, 2);
                assert_eq!(value, "oops");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_label_overwrites_in_first_slot() {
        let text = "\
id,1,1,1,0,0,0,1,1,1,0,a,,n
id,2,2,2,0,0,0,1,1,1,0,b,,n
id,3,3,3,0,0,0,1,1,1,0,a,,n
";
        let file = decode(text, false).unwrap();
        assert_eq!(file.labels().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(file.get("a").unwrap().xyz, [3.0, 3.0, 3.0]);
    }

    #[test]
    fn crlf_and_padded_numbers_are_accepted() {
        let file = decode("id, 1.5 ,2,3,0,0,0,1,1,1,0, spaced label ,,n\r\n", true).unwrap();
        let p = file.get(" spaced label ").unwrap();
        assert_eq!(p.xyz, [1.5, 2.0, 3.0]);
        assert_eq!(p.radius, Some(1.0));
    }

    #[test]
    fn four_field_record_uses_negative_indices() {
        // With only four columns the label is column 1 and the radius column 2.
        let (label, point) = parse_record("id,7,8,9", 1, true).unwrap();
        assert_eq!(label, "7");
        assert_eq!(point.xyzr(), Some([7.0, 8.0, 9.0, 8.0]));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_markups_file(&dir.path().join("absent.fcsv"), false).unwrap_err();
        assert!(matches!(err, MarkupError::Io(_)));
    }
}
