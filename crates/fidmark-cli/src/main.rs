//! fidmark CLI — inspect and transform Markups fiducial files.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use fidmark::{
    fiducials_from_markups, markups_from_fiducials, read_markups_file, write_markups_file, Axis,
    FiducialHeader, MarkupFile, MarkupPoint,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "fidmark")]
#[command(about = "Read, convert and rewrite Markups fiducial (.fcsv) landmark files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a fiducial file and print it as JSON.
    Show(CliShowArgs),

    /// Flip axes and/or convert to pixel space, then rewrite the file.
    Transform(CliTransformArgs),

    /// Print a geometry (spacing/origin) JSON template.
    Header {
        #[command(flatten)]
        geometry: CliGeometryArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct CliShowArgs {
    /// Path to the input .fcsv file.
    #[arg(long)]
    input: PathBuf,

    /// Read the radius from the desc column (defaults to 1.0 when empty).
    #[arg(long)]
    with_radius: bool,

    /// Write JSON to this path instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CliTransformArgs {
    /// Path to the input .fcsv file.
    #[arg(long)]
    input: PathBuf,

    /// Path of the .fcsv file to write.
    #[arg(long)]
    out: PathBuf,

    /// Axes to negate, e.g. "xy" for RAS <-> LPS.
    #[arg(long, default_value = "")]
    flip: String,

    /// Write positions divided by spacing (pixel space) instead of millimetres.
    #[arg(long)]
    to_pix: bool,

    /// Carry radii from the desc column through to the output.
    #[arg(long)]
    with_radius: bool,

    #[command(flatten)]
    geometry: CliGeometryArgs,
}

#[derive(Debug, Clone, Args, Default)]
struct CliGeometryArgs {
    /// Geometry JSON file: {"spacing": [x, y, z], "origin": [x, y, z]}.
    #[arg(long)]
    header: Option<PathBuf>,

    /// Pixel spacing "x,y,z" (mm). Overrides the header file.
    #[arg(long, value_parser = parse_xyz)]
    spacing: Option<[f32; 3]>,

    /// Origin "x,y,z". Overrides the header file.
    #[arg(long, value_parser = parse_xyz, allow_hyphen_values = true)]
    origin: Option<[f32; 3]>,
}

impl CliGeometryArgs {
    fn to_core(&self) -> CliResult<FiducialHeader> {
        let mut header = match &self.header {
            Some(path) => FiducialHeader::from_json_file(path).map_err(|e| -> CliError {
                format!("failed to load header {}: {}", path.display(), e).into()
            })?,
            None => FiducialHeader::default(),
        };
        if let Some(spacing) = self.spacing {
            header.spacing = spacing;
        }
        if let Some(origin) = self.origin {
            header.origin = origin;
        }
        if header.spacing.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err("spacing components must be finite and non-zero".into());
        }
        Ok(header)
    }
}

fn parse_xyz(raw: &str) -> Result<[f32; 3], String> {
    let values = raw
        .split(',')
        .map(|v| v.trim().parse::<f32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid number in {:?}: {}", raw, e))?;
    <[f32; 3]>::try_from(values.as_slice())
        .map_err(|_| format!("expected 3 comma-separated values, got {}", values.len()))
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Show(args) => run_show(&args),
        Commands::Transform(args) => run_transform(&args),
        Commands::Header { geometry } => run_header(&geometry),
    }
}

// ── show ───────────────────────────────────────────────────────────────

fn run_show(args: &CliShowArgs) -> CliResult<()> {
    tracing::info!("Loading fiducials: {}", args.input.display());
    let file = read_markups_file(&args.input, args.with_radius)?;
    tracing::info!("Decoded {} fiducials", file.len());

    let json = serde_json::to_string_pretty(&file)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, &json)?;
            tracing::info!("JSON written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ── transform ──────────────────────────────────────────────────────────

fn run_transform(args: &CliTransformArgs) -> CliResult<()> {
    let header = args.geometry.to_core()?;
    let axes = Axis::parse_list(&args.flip)?;

    tracing::info!("Loading fiducials: {}", args.input.display());
    let file = read_markups_file(&args.input, args.with_radius)?;

    let mut fids = fiducials_from_markups(&file, &header);
    for f in &mut fids {
        f.flip(&axes);
        if args.to_pix {
            f.to_pix();
        }
    }

    let out = if args.to_pix {
        // Pixel positions are written as-is.
        fids.iter()
            .map(|f| {
                let label = f.name().unwrap_or_default().to_string();
                (label, MarkupPoint::new(f.position()))
            })
            .collect::<MarkupFile>()
    } else {
        markups_from_fiducials(&fids)
    };
    let out = carry_radii(out, &file);

    write_markups_file(&args.out, &out, args.with_radius)?;
    tracing::info!(
        "Wrote {} fiducials to {} (flip={:?}, unit={})",
        out.len(),
        args.out.display(),
        args.flip,
        if args.to_pix { "pixel" } else { "mm" },
    );
    Ok(())
}

fn carry_radii(out: MarkupFile, src: &MarkupFile) -> MarkupFile {
    out.into_iter()
        .map(|(label, mut point)| {
            point.radius = src.get(&label).and_then(|p| p.radius);
            (label, point)
        })
        .collect()
}

// ── header ─────────────────────────────────────────────────────────────

fn run_header(geometry: &CliGeometryArgs) -> CliResult<()> {
    let header = geometry.to_core()?;
    println!("{}", serde_json::to_string_pretty(&header)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_xyz_accepts_three_values() {
        assert_eq!(parse_xyz("0.5, 0.5,2").unwrap(), [0.5, 0.5, 2.0]);
        assert_eq!(parse_xyz("-1,-2,-3").unwrap(), [-1.0, -2.0, -3.0]);
    }

    #[test]
    fn parse_xyz_rejects_bad_input() {
        assert!(parse_xyz("1,2").unwrap_err().contains("got 2"));
        assert!(parse_xyz("1,2,3,4").is_err());
        assert!(parse_xyz("1,x,3").is_err());
    }

    #[test]
    fn geometry_flags_override_defaults() {
        let args = CliGeometryArgs {
            header: None,
            spacing: Some([0.5, 0.5, 1.0]),
            origin: None,
        };
        let header = args.to_core().unwrap();
        assert_eq!(header.spacing, [0.5, 0.5, 1.0]);
        assert_eq!(header.origin, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn zero_spacing_is_rejected() {
        let args = CliGeometryArgs {
            spacing: Some([1.0, 0.0, 1.0]),
            ..Default::default()
        };
        assert!(args.to_core().is_err());
    }

    #[test]
    fn cli_parses_transform() {
        let cli = Cli::try_parse_from([
            "fidmark",
            "transform",
            "--input",
            "a.fcsv",
            "--out",
            "b.fcsv",
            "--flip",
            "xy",
            "--spacing",
            "0.5,0.5,1",
            "--origin",
            "-10,0,5",
            "--to-pix",
        ])
        .unwrap();
        match cli.command {
            Commands::Transform(args) => {
                assert_eq!(args.flip, "xy");
                assert!(args.to_pix);
                assert_eq!(args.geometry.spacing, Some([0.5, 0.5, 1.0]));
                assert_eq!(args.geometry.origin, Some([-10.0, 0.0, 5.0]));
            }
            _ => panic!("expected transform"),
        }
    }

    #[test]
    fn radii_follow_labels() {
        let src: MarkupFile = [("a", MarkupPoint::with_radius([0.0; 3], 3.0))]
            .into_iter()
            .collect();
        let out: MarkupFile = [("a", MarkupPoint::new([1.0; 3]))].into_iter().collect();
        let merged = carry_radii(out, &src);
        assert_eq!(merged.get("a").unwrap().xyzr(), Some([1.0, 1.0, 1.0, 3.0]));
    }
}
