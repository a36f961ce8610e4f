//! CSV output of batch records.
use std::path::Path;

use pseudo_points::prelude::*;

const HEADER: [&str; 6] = [
    "parent_id",
    "xy_orig",
    "xy_pseudo",
    "iterations",
    "duration",
    "status",
];

/// Write one row per record with the columns `parent_id, xy_orig, xy_pseudo, iterations, duration, status`.
///
/// Coordinate pairs are written as a single quoted `"x, y"` field; exhausted
/// records carry the sentinel pair.
pub fn write_records_csv(path: impl AsRef<Path>, records: &[PseudoPointRecord]) -> anyhow::Result<()> {
    let mut out = csv::Writer::from_path(path.as_ref())?;
    out.write_record(HEADER)?;
    for r in records {
        out.write_record([
            r.seed_id.clone(),
            r.xy_orig(),
            r.xy_pseudo(),
            r.attempts.to_string(),
            r.elapsed.as_secs_f64().to_string(),
            r.status.as_str().to_owned(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use glam::DVec2;

    use super::*;

    fn record(id: &str, point: DVec2, attempts: u64, status: RecordStatus) -> PseudoPointRecord {
        PseudoPointRecord {
            seed_id: id.into(),
            seed: DVec2::new(10.0, 20.5),
            point,
            attempts,
            elapsed: Duration::from_millis(250),
            status,
        }
    }

    #[test]
    fn writes_header_and_one_row_per_record() {
        let file = tempfile::NamedTempFile::with_suffix(".csv").expect("temp file");
        let records = vec![
            record("p1", DVec2::new(12.0, 18.0), 3, RecordStatus::Solved),
            record("p2", SENTINEL_POINT, 101, RecordStatus::MaxAttemptsReached),
        ];

        write_records_csv(file.path(), &records).expect("csv written");
        let text = std::fs::read_to_string(file.path()).expect("readable");
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "parent_id,xy_orig,xy_pseudo,iterations,duration,status");
        assert_eq!(lines[1], r#"p1,"10, 20.5","12, 18",3,0.25,solved"#);
        assert_eq!(
            lines[2],
            r#"p2,"10, 20.5","-9999, -9999",101,0.25,maximum iterations reached"#
        );
    }

    #[test]
    fn rows_read_back_as_six_fields() {
        let file = tempfile::NamedTempFile::with_suffix(".csv").expect("temp file");
        let records = vec![record("id, with comma", DVec2::ONE, 1, RecordStatus::Solved)];
        write_records_csv(file.path(), &records).expect("csv written");

        let mut reader = csv::Reader::from_path(file.path()).expect("readable");
        let rows: Vec<csv::StringRecord> = reader
            .records()
            .collect::<std::result::Result<_, _>>()
            .expect("parsable");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 6);
        assert_eq!(&rows[0][0], "id, with comma");
        assert_eq!(&rows[0][2], "1, 1");
    }
}
