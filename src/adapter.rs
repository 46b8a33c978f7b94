//! Behavior log adapter
//!
//! Discovers per-video CSV logs and parses them into `BehaviorEvent`s. Logs
//! have no header row; the behavior label, start time and duration sit in the
//! 1st, 3rd and 5th columns.

use crate::error::AggregateError;
use crate::types::{BehaviorEvent, VideoEvents};
use crate::writer::is_output_file_name;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const BEHAVIOR_COLUMN: usize = 0;
const START_COLUMN: usize = 2;
const DURATION_COLUMN: usize = 4;

/// Minimum number of fields a log record must carry
const MIN_FIELDS: usize = DURATION_COLUMN + 1;

/// List the input logs in `dir`, sorted by file name.
///
/// Only regular `*.csv` files directly inside `dir` are returned. Tables this
/// crate writes (`cumulative_<behavior>_times.csv`) are excluded so a run whose
/// output directory is its input directory never reads its own output.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, AggregateError> {
    if !dir.is_dir() {
        return Err(AggregateError::NotADirectory(dir.to_path_buf()));
    }

    let mut inputs = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| AggregateError::io(dir, e))? {
        let entry = entry.map_err(|e| AggregateError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".csv") {
            continue;
        }
        if is_output_file_name(name) {
            debug!(file = name, "skipping previously written output table");
            continue;
        }
        inputs.push(path);
    }

    inputs.sort();
    Ok(inputs)
}

/// Video identifier for a log file (its name without extension)
pub fn video_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read and parse one log file
pub fn read_video_file(path: &Path) -> Result<VideoEvents, AggregateError> {
    let file = File::open(path).map_err(|e| AggregateError::io(path, e))?;
    parse_events(&video_id(path), file)
}

/// Parse a headerless behavior log.
///
/// Start time and duration are coerced to numbers; a value that does not parse
/// leaves the event in place with the field unset so the behavior still gets a
/// (possibly all-zero) row. The first record fixes the log's width: a later
/// record may be shorter (missing trailing columns) but never wider. Records
/// with fewer than five fields or a blank behavior label, and logs with no
/// records at all, are errors.
pub fn parse_events<R: Read>(video_id: &str, reader: R) -> Result<VideoEvents, AggregateError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut events = Vec::new();
    let mut skipped = 0;
    let mut width: Option<usize> = None;

    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let expected = *width.get_or_insert(record.len());

        if record.len() < MIN_FIELDS || record.len() > expected {
            return Err(AggregateError::MalformedRecord {
                video: video_id.to_string(),
                line,
                expected: expected.max(MIN_FIELDS),
                fields: record.len(),
            });
        }

        let behavior = normalize_behavior(&record[BEHAVIOR_COLUMN]);
        if behavior.is_empty() {
            return Err(AggregateError::BlankBehavior {
                video: video_id.to_string(),
                line,
            });
        }

        let event = BehaviorEvent {
            behavior,
            start_sec: coerce_seconds(&record[START_COLUMN]),
            duration_sec: coerce_seconds(&record[DURATION_COLUMN]),
        };
        if event.span().is_none() {
            debug!(
                video = video_id,
                behavior = %event.behavior,
                start = &record[START_COLUMN],
                duration = &record[DURATION_COLUMN],
                "non-numeric timing, event contributes no duration"
            );
            skipped += 1;
        }
        events.push(event);
    }

    if width.is_none() {
        return Err(AggregateError::EmptyInput(video_id.to_string()));
    }

    Ok(VideoEvents {
        video_id: video_id.to_string(),
        events,
        skipped,
    })
}

/// Case-fold a behavior label so `Groom` and `groom` aggregate together
pub fn normalize_behavior(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Parse a seconds field, treating unparsable and NaN values as missing
fn coerce_seconds(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_positional_columns() {
        let log = "Groom,x,250,x,100,note\nrear,x,10.5,x,2.25\n";
        let parsed = parse_events("video1", log.as_bytes()).unwrap();

        assert_eq!(parsed.video_id, "video1");
        assert_eq!(parsed.skipped, 0);
        assert_eq!(
            parsed.events,
            vec![
                BehaviorEvent {
                    behavior: "groom".to_string(),
                    start_sec: Some(250.0),
                    duration_sec: Some(100.0),
                },
                BehaviorEvent {
                    behavior: "rear".to_string(),
                    start_sec: Some(10.5),
                    duration_sec: Some(2.25),
                },
            ]
        );
    }

    #[test]
    fn test_non_numeric_fields_are_coerced_to_missing() {
        let log = "groom,a,abc,b,10\nrear,a,5,b,\nsniff,a,NaN,b,3\n";
        let parsed = parse_events("v", log.as_bytes()).unwrap();

        assert_eq!(parsed.events.len(), 3);
        assert_eq!(parsed.skipped, 3);
        assert_eq!(parsed.events[0].start_sec, None);
        assert_eq!(parsed.events[1].duration_sec, None);
        assert_eq!(parsed.events[2].start_sec, None);
        assert!(parsed.events.iter().all(|e| e.span().is_none()));
    }

    #[test]
    fn test_quoted_labels_and_whitespace() {
        let log = "\"Walk, Fast\",x, 1 ,x,2 \n";
        let parsed = parse_events("v", log.as_bytes()).unwrap();
        assert_eq!(parsed.events[0].behavior, "walk, fast");
        assert_eq!(parsed.events[0].span(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_blank_label_is_error() {
        let log = "groom,x,1,x,2\n ,x,1,x,2\n";
        let err = parse_events("v", log.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            AggregateError::BlankBehavior { ref video, line: 2 } if video == "v"
        ));
    }

    #[test]
    fn test_short_record_is_error() {
        let log = "groom,x,1,x,2\nrear,x,3\n";
        let err = parse_events("v", log.as_bytes()).unwrap_err();
        match err {
            AggregateError::MalformedRecord {
                video,
                line,
                expected,
                fields,
            } => {
                assert_eq!(video, "v");
                assert_eq!(line, 2);
                assert_eq!(expected, 5);
                assert_eq!(fields, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_wider_than_first_is_error() {
        let log = "groom,x,1,x,2\nrear,x,3,x,4,extra,more\n";
        let err = parse_events("v", log.as_bytes()).unwrap_err();
        match err {
            AggregateError::MalformedRecord {
                line,
                expected,
                fields,
                ..
            } => {
                assert_eq!(line, 2);
                assert_eq!(expected, 5);
                assert_eq!(fields, 7);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_narrower_than_first_is_accepted() {
        let log = "groom,x,1,x,2,note\nrear,x,3,x,4\n";
        let parsed = parse_events("v", log.as_bytes()).unwrap();
        assert_eq!(parsed.events.len(), 2);
        assert_eq!(parsed.events[1].span(), Some((3.0, 4.0)));
    }

    #[test]
    fn test_empty_log_is_error() {
        let err = parse_events("empty", "".as_bytes()).unwrap_err();
        assert!(matches!(err, AggregateError::EmptyInput(ref v) if v == "empty"));
    }

    #[test]
    fn test_discover_inputs_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "a.csv", "notes.txt", "cumulative_groom_times.csv"] {
            fs::write(dir.path().join(name), "groom,x,1,x,2\n").unwrap();
        }
        fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let inputs = discover_inputs(dir.path()).unwrap();
        let names: Vec<String> = inputs.iter().map(|p| video_id(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_discover_inputs_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.csv");
        fs::write(&file, "groom,x,1,x,2\n").unwrap();

        assert!(matches!(
            discover_inputs(&file),
            Err(AggregateError::NotADirectory(_))
        ));
    }

    #[test]
    fn test_video_id_strips_extension() {
        assert_eq!(video_id(Path::new("/data/mouse_03.csv")), "mouse_03");
    }
}
