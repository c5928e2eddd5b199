//! Video catalog normalization.
//!
//! The catalog is a markdown file with one `## Title` block per video and
//! loosely formatted field lines under each heading. Parsing never fails:
//! missing fields are filled from [`placeholder`].

pub mod placeholder;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest id produced from a title.
const MAX_ID_LEN: usize = 50;

/// Shortest free-text line taken as a description.
const MIN_DESCRIPTION_LEN: usize = 20;

/// A normalized video entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub duration: String,
    pub views: u64,
    pub published_at: DateTime<Utc>,
    pub url: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// Parse a markdown catalog.
///
/// `now` is used as `publishedAt` for entries without a valid date.
pub fn parse_catalog(content: &str, now: DateTime<Utc>) -> Vec<VideoEntry> {
    let mut blocks: Vec<(&str, Vec<&str>)> = Vec::new();

    for line in content.lines() {
        if let Some(title) = heading(line) {
            blocks.push((title, Vec::new()));
        } else if let Some((_, lines)) = blocks.last_mut() {
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line);
            }
        }
    }

    blocks
        .into_iter()
        .filter(|(title, _)| !title.is_empty())
        .enumerate()
        .map(|(i, (title, lines))| parse_block(i + 1, title, &lines, now))
        .collect()
}

/// The entry with the most views. The first one wins a tie.
pub fn featured_video(videos: &[VideoEntry]) -> Option<&VideoEntry> {
    videos.iter().fold(None, |best, v| match best {
        Some(b) if b.views >= v.views => Some(b),
        _ => Some(v),
    })
}

/// Distinct categories in first-seen order.
pub fn categories(videos: &[VideoEntry]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for video in videos {
        if !seen.contains(&video.category) {
            seen.push(video.category.clone());
        }
    }
    seen
}

/// URL-safe id from a title: `"VIP Referral Program"` → `"vip-referral-program"`.
pub fn video_id(title: &str) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(MAX_ID_LEN)
        .collect()
}

fn heading(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("##")?;
    if rest.starts_with(char::is_whitespace) {
        Some(rest.trim().trim_start_matches('#').trim())
    } else {
        None
    }
}

/// Value of `**Name:** value` or `Name: value`.
fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let bold = format!("**{}:**", name);
    let plain = format!("{}:", name);
    line.strip_prefix(bold.as_str())
        .or_else(|| line.strip_prefix(plain.as_str()))
        .map(str::trim)
}

fn parse_views(value: &str) -> u64 {
    value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(char::is_ascii_digit)
        .collect::<String>()
        .parse()
        .unwrap_or(0)
}

fn parse_published(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_block(position: usize, title: &str, lines: &[&str], now: DateTime<Utc>) -> VideoEntry {
    let id = video_id(title);
    let mut description = String::new();
    let mut duration = String::new();
    let mut views = 0;
    let mut url = String::new();
    let mut category = "general".to_string();
    let mut tags = Vec::new();
    let mut published_at = now;

    for line in lines {
        if let Some(v) = field(line, "Description") {
            description = v.to_string();
        } else if let Some(v) = field(line, "Duration") {
            duration = v.to_string();
        } else if let Some(v) = field(line, "Views") {
            views = parse_views(v);
        } else if let Some(v) = field(line, "URL") {
            url = v.to_string();
        } else if let Some(v) = field(line, "Category") {
            category = v.to_lowercase();
        } else if let Some(v) = field(line, "Tags") {
            tags = v
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from)
                .collect();
        } else if let Some(v) = field(line, "Published") {
            match parse_published(v) {
                Some(dt) => published_at = dt,
                None => debug!("Ignoring unparseable date {:?} for {}", v, title),
            }
        } else if description.is_empty() && line.chars().count() > MIN_DESCRIPTION_LEN {
            description = line.to_string();
        }
    }

    if description.is_empty() {
        description = placeholder::description(title, &category);
    }
    if duration.is_empty() || duration == "0:00" {
        duration = placeholder::duration(title, &category);
    }
    if views == 0 {
        views = placeholder::views(title, &category);
    }
    if url.is_empty() {
        url = format!("https://youtube.com/watch?v={}", id);
    }

    VideoEntry {
        id,
        title: title.to_string(),
        description,
        thumbnail: format!("/images/video-thumb-{}.jpg", position),
        duration,
        views,
        published_at,
        url,
        category,
        tags,
    }
}

/// Catalog written when no source file exists yet.
pub const SAMPLE_CATALOG: &str = "# ERIFY Video Previews

This file contains video recaps and previews for the ERIFY Analytics Dashboard.

## ERIFY Supreme 4 Launch Event
**Description:** Exclusive behind-the-scenes look at the Supreme 4 Crown Seal launch event featuring luxury fintech innovations and VIP announcements.
**Duration:** 4:32
**Views:** 15,420
**Category:** launch
**URL:** https://youtube.com/watch?v=erify-supreme4-launch
**Published:** 2025-01-15

## VIP Referral Program Deep Dive
**Description:** Complete walkthrough of the ERIFY VIP referral system, commission structures, and how to maximize your earnings with proven strategies.
**Duration:** 6:15
**Views:** 8,750
**Category:** tutorial
**URL:** https://youtube.com/watch?v=vip-referral-deep-dive
**Published:** 2025-01-14

## Luxury Fintech Challenge Highlights
**Description:** Best moments from our recent luxury fintech challenge featuring top participants, innovative solutions, and exclusive prizes.
**Duration:** 3:28
**Views:** 12,340
**Category:** highlights
**URL:** https://youtube.com/watch?v=luxury-fintech-challenge
**Published:** 2025-01-13

## Analytics Dashboard Tutorial
**Description:** Learn how to navigate and interpret your ERIFY analytics dashboard for maximum insights, tracking performance, and data-driven decisions.
**Duration:** 5:47
**Views:** 6,890
**Category:** tutorial
**URL:** https://youtube.com/watch?v=analytics-dashboard-tutorial
**Published:** 2025-01-12

## ERIFY Brand Evolution Journey
**Description:** The complete story of ERIFY's brand transformation from startup to luxury fintech powerhouse, featuring exclusive interviews and insights.
**Duration:** 7:23
**Views:** 9,650
**Category:** highlights
**URL:** https://youtube.com/watch?v=erify-brand-evolution
**Published:** 2025-01-11
";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_sample_catalog() {
        let videos = parse_catalog(SAMPLE_CATALOG, now());

        assert_eq!(videos.len(), 5);
        let first = &videos[0];
        assert_eq!(first.id, "erify-supreme-4-launch-event");
        assert_eq!(first.title, "ERIFY Supreme 4 Launch Event");
        assert_eq!(first.views, 15420);
        assert_eq!(first.duration, "4:32");
        assert_eq!(first.category, "launch");
        assert_eq!(first.thumbnail, "/images/video-thumb-1.jpg");
        assert_eq!(first.url, "https://youtube.com/watch?v=erify-supreme4-launch");
        assert_eq!(
            first.published_at,
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
        );

        assert_eq!(categories(&videos), vec!["launch", "tutorial", "highlights"]);
        assert_eq!(featured_video(&videos).map(|v| v.id.as_str()), Some(first.id.as_str()));
    }

    #[test]
    fn test_preamble_is_ignored() {
        let videos = parse_catalog("# Catalog\n\nSome introduction text that is long.\n\n## Only Video\nViews: 10\n", now());
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].title, "Only Video");
        assert_eq!(videos[0].views, 10);
    }

    #[test]
    fn test_missing_fields_are_back_filled() {
        let content = "## Weekly Recap\nCategory: Highlights\n";
        let videos = parse_catalog(content, now());
        let video = &videos[0];

        assert!(video.views > 0);
        assert_eq!(video.views, placeholder::views("Weekly Recap", "highlights"));
        assert_eq!(video.duration, placeholder::duration("Weekly Recap", "highlights"));
        assert!(video.description.starts_with("Best moments from weekly recap"));
        assert_eq!(video.url, "https://youtube.com/watch?v=weekly-recap");
        assert_eq!(video.published_at, now());
        assert!(video.tags.is_empty());

        assert_eq!(parse_catalog(content, now()), videos);
    }

    #[test]
    fn test_plain_fields_and_free_text_description() {
        let content = "## Getting Started!\n\
                       This line is long enough to be a description.\n\
                       Duration: 0:00\n\
                       Views: about 1,234 so far\n\
                       Tags: intro, , basics \n\
                       Published: 2025-02-01T10:30:00Z\n";
        let video = &parse_catalog(content, now())[0];

        assert_eq!(video.id, "getting-started");
        assert_eq!(video.description, "This line is long enough to be a description.");
        assert_eq!(video.views, 1234);
        assert_ne!(video.duration, "0:00");
        assert_eq!(video.tags, vec!["intro", "basics"]);
        assert_eq!(
            video.published_at,
            Utc.with_ymd_and_hms(2025, 2, 1, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_keeps_default() {
        let video = &parse_catalog("## Clip\nPublished: someday\n", now())[0];
        assert_eq!(video.published_at, now());
    }

    #[test]
    fn test_featured_video_first_wins_tie() {
        let content = "## A\nViews: 500\n## B\nViews: 900\n## C\nViews: 900\n";
        let videos = parse_catalog(content, now());
        assert_eq!(featured_video(&videos).unwrap().title, "B");
        assert!(featured_video(&[]).is_none());
    }

    #[test]
    fn test_video_id_slug() {
        assert_eq!(video_id("ERIFY's  Brand -- Journey"), "erifys-brand----journey");
        assert_eq!(video_id(&"x".repeat(80)).len(), 50);
    }
}
