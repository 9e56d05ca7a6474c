// src/io/csv.rs

use crate::error::Result;
use crate::model::result::AtomResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const HEADER: &str = "Element,Atom index,e_tot,OS,spin,Orbital";

/// Shortest round-trip float text, always with a decimal point or exponent
/// (`7.0`, `0.25`, `1e-5`).
pub fn format_float(v: f64) -> String {
    format!("{:?}", v)
}

pub fn format_row(row: &AtomResult) -> String {
    format!(
        "{},{},{},{},{},{}",
        row.element,
        row.index,
        format_float(row.e_tot),
        format_float(row.oxidation_state),
        format_float(row.spin),
        row.block
    )
}

/// Writes the header followed by one line per row. Each row is preceded by
/// a newline, so the file carries no trailing newline.
pub fn write_to<W: Write>(out: &mut W, rows: &[AtomResult]) -> Result<()> {
    write!(out, "{}", HEADER)?;
    for row in rows {
        write!(out, "\n{}", format_row(row))?;
    }
    Ok(())
}

pub fn write(path: &Path, rows: &[AtomResult]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    write_to(&mut out, rows)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    fn row(index: &str, e_tot: f64) -> AtomResult {
        AtomResult {
            element: "Fe".into(),
            index: index.into(),
            sort_key: (index.len(), index.to_string()),
            e_tot,
            oxidation_state: 8.0 - e_tot,
            spin: 3.5,
            block: Block::D,
        }
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(7.0), "7.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(-1.5), "-1.5");
    }

    #[test]
    fn test_write_layout() {
        let mut buf = Vec::new();
        write_to(&mut buf, &[row("3", 6.0), row("12", 5.5)]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "Element,Atom index,e_tot,OS,spin,Orbital\nFe,3,6.0,2.0,3.5,d\nFe,12,5.5,2.5,3.5,d"
        );
    }

    #[test]
    fn test_header_only() {
        let mut buf = Vec::new();
        write_to(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), HEADER);
    }
}
