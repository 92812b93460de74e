//! Session export: pure text assembly plus the thin file writers around it.
//!
//! `build_csv` is a pure function of its inputs and never touches storage;
//! the writers below own the I/O and wrap failures with context.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use time::OffsetDateTime;

use crate::format;
use crate::model::LapRecord;

const CSV_HEADER: &str = "Lap Number, Lap Time (sec), Lap Time (display), \
                          Total Time (sec), Total Time (display), Timestamp";

/// Assemble the delimited session text: a metadata block, a blank separator,
/// the column header and one row per lap in recording order. A session with
/// zero laps still gets its metadata block and header. Lap timestamps are
/// shifted to `saved_at`'s offset so all stamps in one export agree.
pub fn build_csv(
    session_name: &str,
    laps: &[LapRecord],
    total_seconds: f64,
    saved_at: OffsetDateTime,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Session Information");
    let _ = writeln!(out, "Session Name, {}", csv_field(session_name));
    let _ = writeln!(out, "Save Date, {}", format::format_date_time(saved_at));
    let _ = writeln!(out, "Total Laps, {}", laps.len());
    let _ = writeln!(
        out,
        "Total Time, {}",
        format::format_clock(total_seconds).unwrap_or_default()
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{CSV_HEADER}");
    for lap in laps {
        let _ = writeln!(
            out,
            "{}, {:.3}, {}, {:.3}, {}, {}",
            lap.tag,
            lap.lap_seconds,
            format::format_clock(lap.lap_seconds).unwrap_or_default(),
            lap.total_seconds,
            format::format_clock(lap.total_seconds).unwrap_or_default(),
            format::format_date_time_ms(lap.timestamp.to_offset(saved_at.offset())),
        );
    }
    out
}

/// Quote a field when it contains the delimiter, a quote or a line break.
/// Only the user-supplied session name can need this; every other field is
/// produced by our own formatters.
fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

/// Serializable projection of a session for JSON export. Timestamps are
/// pre-formatted strings matching the delimited output.
#[derive(Debug, Serialize)]
pub struct SessionExport {
    pub session_name: String,
    pub saved_at: String,
    pub total_laps: usize,
    pub total_seconds: f64,
    pub total_display: String,
    pub laps: Vec<LapRow>,
}

#[derive(Debug, Serialize)]
pub struct LapRow {
    pub tag: u8,
    pub lap_seconds: f64,
    pub lap_display: String,
    pub total_seconds: f64,
    pub total_display: String,
    pub timestamp: String,
}

/// Build the JSON projection from the same inputs as [`build_csv`].
pub fn build_export(
    session_name: &str,
    laps: &[LapRecord],
    total_seconds: f64,
    saved_at: OffsetDateTime,
) -> SessionExport {
    SessionExport {
        session_name: session_name.to_string(),
        saved_at: format::format_date_time(saved_at),
        total_laps: laps.len(),
        total_seconds,
        total_display: format::format_clock(total_seconds).unwrap_or_default(),
        laps: laps
            .iter()
            .map(|lap| LapRow {
                tag: lap.tag,
                lap_seconds: lap.lap_seconds,
                lap_display: format::format_clock(lap.lap_seconds).unwrap_or_default(),
                total_seconds: lap.total_seconds,
                total_display: format::format_clock(lap.total_seconds).unwrap_or_default(),
                timestamp: format::format_date_time_ms(
                    lap.timestamp.to_offset(saved_at.offset()),
                ),
            })
            .collect(),
    }
}

/// Default export location: the user documents directory, falling back to the
/// home directory, then the current directory.
pub fn default_export_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `<session name>_<YYYYmmdd_HHMMSS>.<ext>`, with path-hostile characters
/// stripped out of the name.
pub fn default_file_name(session_name: &str, saved_at: OffsetDateTime, ext: &str) -> String {
    let stem: String = session_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            other => other,
        })
        .collect();
    format!("{}_{}.{}", stem, format::file_stamp(saved_at), ext)
}

/// Write the delimited session text to `path`.
pub fn export_csv(
    path: &Path,
    session_name: &str,
    laps: &[LapRecord],
    total_seconds: f64,
    saved_at: OffsetDateTime,
) -> Result<()> {
    std::fs::write(path, build_csv(session_name, laps, total_seconds, saved_at))
        .with_context(|| format!("write session export to {}", path.display()))
}

/// Write the JSON projection to `path`.
pub fn export_json(path: &Path, export: &SessionExport) -> Result<()> {
    let text = serde_json::to_string_pretty(export).context("serialize session to JSON")?;
    std::fs::write(path, text)
        .with_context(|| format!("write session export to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn saved_at() -> OffsetDateTime {
        datetime!(2025-06-01 10:30:00 UTC)
    }

    fn lap(tag: u8, lap_seconds: f64, total_seconds: f64) -> LapRecord {
        LapRecord {
            tag,
            lap_seconds,
            total_seconds,
            timestamp: datetime!(2025-06-01 10:29:42.123 UTC),
        }
    }

    #[test]
    fn emits_metadata_block_and_rows_for_two_lap_session() {
        let laps = [lap(1, 5.247, 5.247), lap(2, 7.147, 12.394)];
        let text = build_csv("Sprint Drill", &laps, 12.394, saved_at());

        assert!(text.starts_with("# Session Information\n"));
        assert!(text.contains("Session Name, Sprint Drill\n"));
        assert!(text.contains("Save Date, 2025-06-01 10:30:00\n"));
        assert!(text.contains("Total Laps, 2\n"));
        assert!(text.contains("Total Time, 00:12.39\n"));
        assert!(text.contains(
            "1, 5.247, 00:05.24, 5.247, 00:05.24, 2025-06-01 10:29:42.123\n"
        ));
        assert!(text.contains(
            "2, 7.147, 00:07.14, 12.394, 00:12.39, 2025-06-01 10:29:42.123\n"
        ));
    }

    #[test]
    fn zero_laps_still_produce_metadata_and_header() {
        let text = build_csv("Empty", &[], 0.0, saved_at());
        assert!(text.contains("Total Laps, 0\n"));
        assert!(text.contains("Total Time, 00:00.00\n"));
        assert!(text.ends_with("Timestamp\n"));
    }

    #[test]
    fn session_name_with_delimiter_is_quoted() {
        let text = build_csv("Morning, Intervals", &[], 0.0, saved_at());
        assert!(text.contains("Session Name, \"Morning, Intervals\"\n"));

        let text = build_csv("say \"go\"", &[], 0.0, saved_at());
        assert!(text.contains("Session Name, \"say \"\"go\"\"\"\n"));
    }

    #[test]
    fn identical_inputs_produce_identical_text() {
        let laps = [lap(4, 2.001, 2.001)];
        assert_eq!(
            build_csv("Twice", &laps, 2.001, saved_at()),
            build_csv("Twice", &laps, 2.001, saved_at())
        );
    }

    #[test]
    fn lap_rows_round_trip_through_the_delimited_text() {
        let laps = [
            lap(7, 3.141, 3.141),
            lap(7, 2.718, 5.859),
            lap(0, 10.0, 15.859),
        ];
        let text = build_csv("Round Trip", &laps, 15.859, saved_at());

        let rows: Vec<&str> = text
            .lines()
            .skip_while(|line| !line.starts_with("Lap Number"))
            .skip(1)
            .collect();
        assert_eq!(rows.len(), laps.len());

        for (row, original) in rows.iter().zip(&laps) {
            let fields: Vec<&str> = row.split(", ").collect();
            assert_eq!(fields.len(), 6);
            assert_eq!(fields[0].parse::<u8>().unwrap(), original.tag);
            let lap_seconds: f64 = fields[1].parse().unwrap();
            let total_seconds: f64 = fields[3].parse().unwrap();
            // Three fraction digits in the export bound the loss.
            assert!((lap_seconds - original.lap_seconds).abs() < 5e-4);
            assert!((total_seconds - original.total_seconds).abs() < 5e-4);
        }
    }

    #[test]
    fn json_projection_matches_the_delimited_values() {
        let laps = [lap(1, 5.247, 5.247), lap(2, 7.147, 12.394)];
        let export = build_export("Sprint Drill", &laps, 12.394, saved_at());

        assert_eq!(export.total_laps, 2);
        assert_eq!(export.total_display, "00:12.39");
        assert_eq!(export.laps[1].tag, 2);
        assert_eq!(export.laps[1].lap_display, "00:07.14");
        assert_eq!(export.laps[1].timestamp, "2025-06-01 10:29:42.123");
    }

    #[test]
    fn default_file_name_combines_name_and_stamp() {
        assert_eq!(
            default_file_name("Sprint Drill", saved_at(), "csv"),
            "Sprint Drill_20250601_103000.csv"
        );
        assert_eq!(
            default_file_name("a/b:c", saved_at(), "json"),
            "a-b-c_20250601_103000.json"
        );
    }
}
