//! The update pipeline: fetch every tracked post, amend today's record,
//! persist the sequence.

use std::fmt::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::info;

use crate::config::TrackerConfig;
use crate::fetch::Fetcher;
use crate::record::{record_for_date, DailyRecord};
use crate::store::{load_records, save_records};
use crate::utils::format_number;

/// Fetch the current view count for every configured post and fold the
/// results into the record for `today`. Nothing is written unless every
/// post yields a count.
pub fn update_views(config: &TrackerConfig, fetcher: &Fetcher, today: NaiveDate) -> Result<()> {
    let start = Instant::now();
    let mut records = load_records(&config.data_file)?;
    let entry = record_for_date(&mut records, today);

    for post in &config.posts {
        let views = fetcher
            .fetch_views(&post.url)
            .with_context(|| format!("fetching views for {}", post.label))?;
        info!(
            action = "update",
            component = "tracker",
            post = post.label.as_str(),
            views = views,
            "Collected view count"
        );
        entry.set_views(&post.key, views);
    }

    save_records(&config.data_file, &records)?;
    info!(
        action = "update",
        component = "tracker",
        record_count = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "Update complete"
    );
    Ok(())
}

/// Print the most recent standings to stdout. Handicaps shift the ranking
/// but the stored counts stay raw.
pub fn print_report(config: &TrackerConfig) -> Result<()> {
    let records = load_records(&config.data_file)?;
    print!("{}", render_report(config, &records));
    Ok(())
}

/// Render the standings for the latest record: each post's raw count, the
/// adjusted score where a handicap applies, then the leader or a tie by
/// adjusted score. The ranking line is suppressed while any post still has
/// no count.
fn render_report(config: &TrackerConfig, records: &[DailyRecord]) -> String {
    let Some(latest) = records.last() else {
        return "No view data collected yet.\n".to_string();
    };

    let mut out = String::new();
    let _ = writeln!(out, "Standings for {}:", latest.date);

    let mut standings: Vec<(String, u64)> = Vec::new();
    let mut complete = true;
    for post in &config.posts {
        match latest.views_for(&post.key) {
            Some(raw) => {
                let adjusted = adjusted_views(raw, post.handicap);
                if adjusted == raw {
                    let _ = writeln!(out, "  {}: {} views", post.label, format_number(raw));
                } else {
                    let _ = writeln!(
                        out,
                        "  {}: {} views ({} adjusted)",
                        post.label,
                        format_number(raw),
                        format_number(adjusted)
                    );
                }
                standings.push((post.label.clone(), adjusted));
            }
            None => {
                let _ = writeln!(out, "  {}: no data", post.label);
                complete = false;
            }
        }
    }

    if complete && standings.len() > 1 {
        standings.sort_by(|a, b| b.1.cmp(&a.1));
        if standings[0].1 == standings[1].1 {
            let _ = writeln!(
                out,
                "Tied at {} adjusted views.",
                format_number(standings[0].1)
            );
        } else {
            let _ = writeln!(
                out,
                "{} leads by {} adjusted views.",
                standings[0].0,
                format_number(standings[0].1 - standings[1].1)
            );
        }
    }
    out
}

/// Clamped so a handicap can never push a score below zero.
fn adjusted_views(raw: u64, handicap: Option<i64>) -> u64 {
    (raw as i64 + handicap.unwrap_or(0)).max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn two_post_config() -> TrackerConfig {
        TrackerConfig::new(PathBuf::from("data/views.json"))
    }

    fn filled_record(date: NaiveDate, mike: u64, yann: u64) -> DailyRecord {
        let mut record = DailyRecord::new(date);
        record.set_views("mike", mike);
        record.set_views("yann", yann);
        record
    }

    #[test]
    fn handicap_is_additive() {
        assert_eq!(adjusted_views(1_000, Some(-200)), 800);
    }

    #[test]
    fn missing_handicap_leaves_the_count_alone() {
        assert_eq!(adjusted_views(1_000, None), 1_000);
    }

    #[test]
    fn adjusted_views_never_go_negative() {
        assert_eq!(adjusted_views(100, Some(-200)), 0);
    }

    #[test]
    fn empty_history_prints_a_notice() {
        let report = render_report(&two_post_config(), &[]);
        assert_eq!(report, "No view data collected yet.\n");
    }

    #[test]
    fn report_names_the_leader_with_margin() {
        let config = two_post_config();
        let report = render_report(&config, &[filled_record(day(3), 1_000, 1_500)]);

        assert!(report.contains("Standings for 2024-01-03:"));
        assert!(report.contains("Mike: 1,000 views"));
        assert!(report.contains("Yann: 1,500 views (1,300 adjusted)"));
        assert!(report.contains("Yann leads by 300 adjusted views."));
    }

    #[test]
    fn handicap_can_flip_the_leader() {
        let config = two_post_config();
        let report = render_report(&config, &[filled_record(day(1), 1_000, 1_100)]);

        assert!(report.contains("Yann: 1,100 views (900 adjusted)"));
        assert!(report.contains("Mike leads by 100 adjusted views."));
    }

    #[test]
    fn equal_adjusted_scores_are_a_tie() {
        let config = two_post_config();
        let report = render_report(&config, &[filled_record(day(1), 800, 1_000)]);

        assert!(report.contains("Tied at 800 adjusted views."));
        assert!(!report.contains("leads by"));
    }

    #[test]
    fn missing_count_suppresses_the_ranking() {
        let config = two_post_config();
        let mut record = DailyRecord::new(day(1));
        record.set_views("mike", 900);
        let report = render_report(&config, &[record]);

        assert!(report.contains("Mike: 900 views"));
        assert!(report.contains("Yann: no data"));
        assert!(!report.contains("leads by"));
        assert!(!report.contains("Tied at"));
    }

    #[test]
    fn only_the_latest_record_is_reported() {
        let config = two_post_config();
        let history = [
            filled_record(day(1), 100, 300),
            filled_record(day(2), 400, 350),
        ];
        let report = render_report(&config, &history);

        assert!(report.contains("Standings for 2024-01-02:"));
        assert!(!report.contains("2024-01-01"));
    }
}
