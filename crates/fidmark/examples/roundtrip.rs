//! Read an .fcsv file, flip x/y (RAS <-> LPS), and write it back.
//!
//! ```text
//! cargo run -p fidmark --example roundtrip -- in.fcsv out.fcsv
//! ```

use std::path::PathBuf;

use fidmark::{
    fiducials_from_markups, markups_from_fiducials, read_markups_file, write_markups_file, Axis,
    FiducialHeader,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        return Err("usage: roundtrip <in.fcsv> <out.fcsv>".into());
    };

    let file = read_markups_file(&PathBuf::from(&input), false)?;
    let mut fids = fiducials_from_markups(&file, &FiducialHeader::default());
    for f in &mut fids {
        f.flip(&[Axis::X, Axis::Y]);
        println!("{:>24}  {}", f.name().unwrap_or("-"), f);
    }

    write_markups_file(&PathBuf::from(&output), &markups_from_fiducials(&fids), false)?;
    println!("wrote {} fiducials to {}", fids.len(), output);
    Ok(())
}
