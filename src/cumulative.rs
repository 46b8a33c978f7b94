//! Per-video cumulative binning
//!
//! Splits every event of a video across the configured bins, totals each
//! behavior per bin, then turns the totals into running sums.

use crate::bins::{split_duration, TimeBin};
use crate::types::{CumulativeRow, VideoEvents};
use std::collections::HashMap;

/// Build one cumulative row per behavior seen in `video`.
///
/// Rows follow the order in which behaviors first appear in the log. A
/// behavior whose events were all skipped still gets an all-zero row.
pub fn bin_video(video: &VideoEvents, bins: &[TimeBin]) -> Vec<CumulativeRow> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Vec<f64>> = HashMap::new();

    for event in &video.events {
        let raw = totals.entry(event.behavior.as_str()).or_insert_with(|| {
            order.push(event.behavior.as_str());
            vec![0.0; bins.len()]
        });

        if let Some((start, duration)) = event.span() {
            for (index, overlap) in split_duration(start, duration, bins) {
                raw[index] += overlap;
            }
        }
    }

    order
        .into_iter()
        .map(|behavior| CumulativeRow {
            video_id: video.video_id.clone(),
            behavior: behavior.to_string(),
            values: running_sum(&totals[behavior]),
        })
        .collect()
}

/// Left-to-right running sum: `out[i] = raw[0] + ... + raw[i]`
pub fn running_sum(raw: &[f64]) -> Vec<f64> {
    raw.iter()
        .scan(0.0, |acc, value| {
            *acc += value;
            Some(*acc)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::BinConfig;
    use crate::types::BehaviorEvent;
    use pretty_assertions::assert_eq;

    fn event(behavior: &str, start: Option<f64>, duration: Option<f64>) -> BehaviorEvent {
        BehaviorEvent {
            behavior: behavior.to_string(),
            start_sec: start,
            duration_sec: duration,
        }
    }

    fn video(events: Vec<BehaviorEvent>) -> VideoEvents {
        VideoEvents {
            video_id: "video1".to_string(),
            events,
            skipped: 0,
        }
    }

    #[test]
    fn test_running_sum() {
        assert_eq!(running_sum(&[1.0, 0.0, 2.5, 0.5]), vec![1.0, 1.0, 3.5, 4.0]);
        assert!(running_sum(&[]).is_empty());
    }

    #[test]
    fn test_single_event_spanning_two_bins() {
        let bins = BinConfig::new(3000.0, 300.0).unwrap().bins();
        let rows = bin_video(&video(vec![event("groom", Some(250.0), Some(100.0))]), &bins);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].behavior, "groom");
        assert_eq!(rows[0].video_id, "video1");
        assert_eq!(
            rows[0].values,
            vec![50.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 100.0]
        );
    }

    #[test]
    fn test_behaviors_in_first_seen_order() {
        let bins = BinConfig::default().bins();
        let rows = bin_video(
            &video(vec![
                event("rear", Some(0.0), Some(10.0)),
                event("groom", Some(400.0), Some(20.0)),
                event("rear", Some(700.0), Some(30.0)),
            ]),
            &bins,
        );

        let names: Vec<&str> = rows.iter().map(|r| r.behavior.as_str()).collect();
        assert_eq!(names, vec!["rear", "groom"]);
        assert_eq!(rows[0].values, vec![10.0, 10.0, 40.0, 40.0, 40.0, 40.0]);
        assert_eq!(rows[1].values, vec![0.0, 20.0, 20.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn test_skipped_events_yield_zero_row() {
        let bins = BinConfig::default().bins();
        let rows = bin_video(
            &video(vec![
                event("sniff", None, Some(10.0)),
                event("sniff", Some(5.0), Some(-3.0)),
            ]),
            &bins,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].values, vec![0.0; 6]);
        assert_eq!(rows[0].total(), 0.0);
    }

    #[test]
    fn test_event_past_window_is_clipped() {
        let bins = BinConfig::default().bins();
        let rows = bin_video(&video(vec![event("walk", Some(1750.0), Some(200.0))]), &bins);
        assert_eq!(rows[0].total(), 50.0);
    }
}
