//! JSON import and export of saved ranges.
//!
//! The file is a flat array of `{ id, startDate, endDate, label, color }`
//! records with ISO-8601 timestamps, as saved by the browser calendar.

use std::io::{Read, Write};

use anyhow::{Context, Result, bail};

use crate::types::Range;

/// Writes `ranges` as a pretty-printed JSON array.
pub fn export_ranges<W: Write>(ranges: &[Range], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, ranges).context("Failed to serialize ranges")?;
    writeln!(writer)?;
    Ok(())
}

/// Reads a JSON array of ranges, rejecting records that could not have been saved.
pub fn import_ranges<R: Read>(reader: R) -> Result<Vec<Range>> {
    let ranges: Vec<Range> =
        serde_json::from_reader(reader).context("Failed to parse ranges file")?;
    for (index, range) in ranges.iter().enumerate() {
        if range.label.trim().is_empty() {
            bail!("Range #{index} ('{}') has an empty label", range.id);
        }
        if range.end_date < range.start_date {
            bail!("Range #{index} ('{}') ends before it starts", range.id);
        }
    }
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local};

    const BROWSER_EXPORT: &str = r##"[
        {
            "id": "1738368000000",
            "startDate": "2026-02-02T00:00:00.000Z",
            "endDate": "2026-02-06T23:59:59.999Z",
            "label": "Ski trip",
            "color": "#f7d4d4"
        },
        {
            "id": "1738454400000",
            "startDate": "2026-02-10T00:00:00.000+01:00",
            "endDate": "2026-02-10T23:59:59.999+01:00",
            "label": "Dentist",
            "color": "hsl(210, 70%, 90%)"
        }
    ]"##;

    #[test]
    fn test_import_browser_export() {
        let ranges = import_ranges(BROWSER_EXPORT.as_bytes()).unwrap();
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].id, "1738368000000");
        assert_eq!(ranges[0].label, "Ski trip");
        assert_eq!(ranges[1].color, "hsl(210, 70%, 90%)");
        let expected: DateTime<Local> = DateTime::parse_from_rfc3339("2026-02-02T00:00:00Z")
            .unwrap()
            .with_timezone(&Local);
        assert_eq!(ranges[0].start_date, expected);
    }

    #[test]
    fn test_export_uses_camel_case_fields_in_order() {
        let ranges = import_ranges(BROWSER_EXPORT.as_bytes()).unwrap();
        let mut out = Vec::new();
        export_ranges(&ranges[..1], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let positions: Vec<usize> = ["\"id\"", "\"startDate\"", "\"endDate\"", "\"label\"", "\"color\""]
            .iter()
            .map(|field| text.find(field).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{text}");
        assert!(!text.contains("start_date"));

        let reread = import_ranges(text.as_bytes()).unwrap();
        assert_eq!(reread, ranges[..1].to_vec());
    }

    #[test]
    fn test_import_rejects_invalid_records() {
        let reversed = r##"[{"id":"r","startDate":"2026-02-06T00:00:00Z","endDate":"2026-02-02T00:00:00Z","label":"Backwards","color":"#ffffff"}]"##;
        assert!(import_ranges(reversed.as_bytes()).is_err());

        let unlabeled = r##"[{"id":"u","startDate":"2026-02-02T00:00:00Z","endDate":"2026-02-02T23:59:59Z","label":"  ","color":"#ffffff"}]"##;
        assert!(import_ranges(unlabeled.as_bytes()).is_err());

        assert!(import_ranges("{\"not\":\"an array\"}".as_bytes()).is_err());
        assert!(import_ranges("[{\"id\":\"missing-fields\"}]".as_bytes()).is_err());
    }

    #[test]
    fn test_empty_array_round_trips() {
        let mut out = Vec::new();
        export_ranges(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
        assert!(import_ranges("[]".as_bytes()).unwrap().is_empty());
    }
}
