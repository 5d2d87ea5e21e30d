use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::metadata::VideoRecord;

/// Look-back windows, all relative to the time the report is assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GrowthWindow {
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
    #[serde(rename = "6m")]
    LastSixMonths,
}

impl GrowthWindow {
    pub const ALL: [GrowthWindow; 3] = [
        GrowthWindow::LastWeek,
        GrowthWindow::LastMonth,
        GrowthWindow::LastSixMonths,
    ];

    pub fn days(&self) -> i64 {
        match self {
            GrowthWindow::LastWeek => 7,
            GrowthWindow::LastMonth => 30,
            GrowthWindow::LastSixMonths => 180,
        }
    }

    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - Duration::days(self.days())
    }
}

impl fmt::Display for GrowthWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthWindow::LastWeek => write!(f, "Last 7 Days"),
            GrowthWindow::LastMonth => write!(f, "Last 30 Days"),
            GrowthWindow::LastSixMonths => write!(f, "Last 6 Months"),
        }
    }
}

/// Per-publish-date sums; all four vectors have the same length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthSeries {
    pub dates: Vec<NaiveDate>,
    pub views: Vec<u64>,
    pub likes: Vec<u64>,
    pub comments: Vec<u64>,
}

impl GrowthSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthReport {
    /// `None` for a window no video was published in
    pub windows: BTreeMap<GrowthWindow, Option<GrowthSeries>>,
}

impl GrowthReport {
    pub fn series(&self, window: GrowthWindow) -> Option<&GrowthSeries> {
        self.windows.get(&window).and_then(|series| series.as_ref())
    }
}

/// Bucket videos by UTC publish date for every window
pub fn growth_report(videos: &[VideoRecord], now: DateTime<Utc>) -> GrowthReport {
    let windows = GrowthWindow::ALL
        .iter()
        .map(|window| (*window, window_series(videos, window.start(now), now)))
        .collect();

    GrowthReport { windows }
}

fn window_series(videos: &[VideoRecord], start: DateTime<Utc>, now: DateTime<Utc>) -> Option<GrowthSeries> {
    let mut buckets: BTreeMap<NaiveDate, (u64, u64, u64)> = BTreeMap::new();

    for video in videos
        .iter()
        .filter(|v| v.published_at >= start && v.published_at <= now)
    {
        let entry = buckets.entry(video.published_at.date_naive()).or_default();
        entry.0 += video.view_count;
        entry.1 += video.like_count;
        entry.2 += video.comment_count;
    }

    if buckets.is_empty() {
        return None;
    }

    let mut series = GrowthSeries::default();
    for (date, (views, likes, comments)) in buckets {
        series.dates.push(date);
        series.views.push(views);
        series.likes.push(likes);
        series.comments.push(comments);
    }
    Some(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Thumbnails;
    use chrono::TimeZone;

    fn video(id: &str, published_at: DateTime<Utc>, views: u64) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: id.to_string(),
            published_at,
            view_count: views,
            like_count: views / 10,
            comment_count: views / 100,
            duration: "PT5M".to_string(),
            thumbnails: Thumbnails::default(),
            tags: Vec::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_same_day_videos_are_summed() {
        let videos = vec![
            video("a", Utc.with_ymd_and_hms(2024, 6, 28, 9, 0, 0).unwrap(), 1000),
            video("b", Utc.with_ymd_and_hms(2024, 6, 28, 18, 0, 0).unwrap(), 500),
            video("c", Utc.with_ymd_and_hms(2024, 6, 29, 9, 0, 0).unwrap(), 200),
        ];
        let report = growth_report(&videos, now());
        let week = report.series(GrowthWindow::LastWeek).unwrap();

        assert_eq!(
            week.dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 29).unwrap()
            ]
        );
        assert_eq!(week.views, vec![1500, 200]);
        assert_eq!(week.likes, vec![150, 20]);
        assert_eq!(week.comments, vec![15, 2]);
    }

    #[test]
    fn test_videos_outside_window_do_not_contribute() {
        // Same calendar day as the week's start, but a few hours before it
        let just_outside = Utc.with_ymd_and_hms(2024, 6, 23, 6, 0, 0).unwrap();
        let inside = Utc.with_ymd_and_hms(2024, 6, 23, 18, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let videos = vec![video("early", just_outside, 999), video("late", inside, 10), video("old", old, 5000)];

        let report = growth_report(&videos, now());

        let week = report.series(GrowthWindow::LastWeek).unwrap();
        assert_eq!(week.views, vec![10]);

        let month = report.series(GrowthWindow::LastMonth).unwrap();
        assert_eq!(month.views, vec![1009]);

        let half_year = report.series(GrowthWindow::LastSixMonths).unwrap();
        assert_eq!(half_year.views, vec![5000, 1009]);
        assert_eq!(half_year.len(), 2);
    }

    #[test]
    fn test_empty_window_is_absent() {
        let videos = vec![video("old", Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(), 5000)];
        let report = growth_report(&videos, now());

        assert_eq!(report.windows.len(), 3);
        assert!(report.series(GrowthWindow::LastWeek).is_none());
        assert!(report.series(GrowthWindow::LastMonth).is_none());
        assert!(report.series(GrowthWindow::LastSixMonths).is_some());
    }

    #[test]
    fn test_no_videos() {
        let report = growth_report(&[], now());
        for window in GrowthWindow::ALL {
            assert_eq!(report.windows.get(&window), Some(&None));
        }
    }
}
