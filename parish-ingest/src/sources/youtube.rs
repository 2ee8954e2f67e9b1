//! YouTube livestream title importer.
//!
//! Sunday livestreams are titled `Sermon Title | Scripture | M.D.YY`;
//! special services (weddings, congregational meetings, holiday services)
//! carry only a bare title. This source parses a list of video titles,
//! one per line, into candidate records.

use super::tsv::scripture_book;
use chrono::NaiveDate;
use parish_common::archive::{SermonRecord, SermonSource};
use regex::Regex;
use tracing::warn;

/// Split out of a raw video title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTitle {
    pub title: String,
    pub scripture: Option<String>,
    pub date_str: Option<String>,
}

/// Parse `Title | Scripture | Date`, tolerating missing segments.
///
/// The middle segment is scripture only when it looks like a
/// chapter:verse reference; otherwise it is taken as the date.
pub fn parse_video_title(raw: &str) -> ParsedTitle {
    let verse = Regex::new(r"\d+:\d+").expect("static regex");
    let parts: Vec<&str> = raw.split('|').map(|p| p.trim()).collect();

    let title = parts.first().copied().unwrap_or(raw).to_string();
    let mut scripture = None;
    let mut date_str = None;

    if parts.len() >= 2 {
        if verse.is_match(parts[1]) {
            scripture = Some(parts[1].to_string());
        } else {
            date_str = Some(parts[1].to_string());
        }
    }
    if parts.len() >= 3 {
        date_str = Some(parts[2].to_string());
    }

    ParsedTitle { title, scripture, date_str }
}

/// Parse a livestream date in `M.D.YY` or `M.DD.YYYY` form.
/// Two-digit years are taken as 20YY.
pub fn parse_dot_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let month = parts[0].parse::<u32>().ok()?;
    let day = parts[1].parse::<u32>().ok()?;
    let mut year = parts[2].parse::<i32>().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Determine the sermon series from title and scripture.
///
/// The rules reflect how the congregation actually titles streams: special
/// services are recognized by keyword, preaching series by the scripture
/// book, with a handful of named series overriding the book.
pub fn determine_series(title: &str, scripture: Option<&str>) -> String {
    let character_of_church = title.contains("Church")
        && (title.contains("Character")
            || title.contains("Ethic")
            || title.contains("Identity")
            || title.contains("Fruit"));

    let Some(scripture) = scripture else {
        if title.contains("Christmas") || title.contains("Covenant Promises") {
            return "Christmas".to_string();
        }
        if title.contains("Wedding") {
            return "Special Events".to_string();
        }
        if title.contains("Congregational Meeting") {
            return "Church Business".to_string();
        }
        return parish_common::archive::record::DEFAULT_SERIES.to_string();
    };

    match scripture_book(scripture) {
        Some(book) => {
            if character_of_church {
                return "The Character of the Church".to_string();
            }
            if title.contains("Family of God") {
                return "Ephesians".to_string();
            }
            if book.eq_ignore_ascii_case("luke") {
                return "Luke".to_string();
            }
            book
        }
        None => parish_common::archive::record::DEFAULT_SERIES.to_string(),
    }
}

/// Parse a file of video titles, one per line, into candidate records.
///
/// Titles with no recognizable date still produce records; they land in
/// the archive's no-date bucket rather than being dropped.
pub fn parse_title_list(text: &str) -> Vec<SermonRecord> {
    let mut records = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parsed = parse_video_title(line);
        let date = parsed
            .date_str
            .as_deref()
            .and_then(parse_dot_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        if date.is_empty() {
            warn!("No parseable date in video title {:?}", line);
        }

        let series = determine_series(&parsed.title, parsed.scripture.as_deref());

        let mut record = SermonRecord::new(parsed.title, date);
        record.scripture = parsed.scripture.clone().unwrap_or_default();
        record.source = SermonSource::Youtube;
        record.series = series.clone();
        if series != parish_common::archive::record::DEFAULT_SERIES {
            record.tags.push(series);
        }
        if let Some(book) = parsed.scripture.as_deref().and_then(scripture_book) {
            if !record.tags.contains(&book) {
                record.tags.push(book);
            }
        }
        record.build_search_keywords();
        records.push(record);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_full_title() {
        let parsed = parse_video_title("A Life of Readiness | Luke 12:35-59 | 1.25.26");
        assert_eq!(parsed.title, "A Life of Readiness");
        assert_eq!(parsed.scripture.as_deref(), Some("Luke 12:35-59"));
        assert_eq!(parsed.date_str.as_deref(), Some("1.25.26"));
    }

    #[test]
    fn bare_title_has_no_scripture_or_date() {
        let parsed = parse_video_title("Wedding 2024");
        assert_eq!(parsed.title, "Wedding 2024");
        assert!(parsed.scripture.is_none());
        assert!(parsed.date_str.is_none());
    }

    #[test]
    fn dot_dates() {
        assert_eq!(parse_dot_date("1.25.26"), NaiveDate::from_ymd_opt(2026, 1, 25));
        assert_eq!(parse_dot_date("12.28.25"), NaiveDate::from_ymd_opt(2025, 12, 28));
        assert_eq!(parse_dot_date("13.1.25"), None);
        assert_eq!(parse_dot_date("Streamed"), None);
    }

    #[test]
    fn series_rules() {
        assert_eq!(
            determine_series("The Character of the Church: Humility", Some("Luke 6:37-42")),
            "The Character of the Church"
        );
        assert_eq!(
            determine_series("Living as the Family of God", Some("Ephesians 4:1-6")),
            "Ephesians"
        );
        assert_eq!(determine_series("Fertile Ears", Some("Luke 8:4-21")), "Luke");
        assert_eq!(
            determine_series("Christ at the Center of It All", Some("Revelation 1:1-20")),
            "Revelation"
        );
        assert_eq!(determine_series("The Covenant Promises of Christmas", None), "Christmas");
        assert_eq!(determine_series("Wedding 2024", None), "Special Events");
        assert_eq!(
            determine_series("Congregational Meeting September 2025", None),
            "Church Business"
        );
        assert_eq!(
            determine_series("Sunday Worship", None),
            "The Sunday Sermon"
        );
    }

    #[test]
    fn title_list_produces_records() {
        let text = "A Life of Readiness | Luke 12:35-59 | 1.25.26\n\
                    Wedding 2024\n";
        let records = parse_title_list(text);
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].date, "2026-01-25");
        assert_eq!(records[0].series, "Luke");
        assert_eq!(records[0].tags, vec!["Luke".to_string()]);

        // Undated record retained with empty date
        assert_eq!(records[1].date, "");
        assert_eq!(records[1].series, "Special Events");
    }
}
