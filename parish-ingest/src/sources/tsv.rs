//! Historical sermon archive importer.
//!
//! Parses spreadsheet exports of the sermon archive: a header row naming
//! the columns (`Title`, `Speaker`, `Date`, `Scripture`, `Series`,
//! `Episode`, `Episode_Absolute`), followed by one row per sermon. Both
//! tab-separated and multi-space-separated layouts occur in the wild.

use chrono::NaiveDate;
use parish_common::archive::{SermonRecord, SermonSource};
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Parse a date cell in `M/D/YYYY` or `YYYY-MM-DD` form
pub fn parse_archive_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() == 3 {
        if let (Ok(month), Ok(day), Ok(year)) = (
            parts[0].parse::<u32>(),
            parts[1].parse::<u32>(),
            parts[2].parse::<i32>(),
        ) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                return Some(date);
            }
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parse a full spreadsheet export into candidate records.
///
/// Rows without a title are ignored; rows with an unparseable date are
/// warned about and skipped, since the archive keys historical entries by
/// date. IDs are left empty for the reorganizer to assign.
pub fn parse_archive(text: &str) -> Vec<SermonRecord> {
    let mut lines = text.trim().lines();
    let Some(header_line) = lines.next() else {
        return Vec::new();
    };

    let multi_space = Regex::new(r"\s{2,}").expect("static regex");
    let tab_separated = header_line.contains('\t');
    let split = |line: &str| -> Vec<String> {
        if tab_separated {
            line.split('\t').map(|c| c.trim().to_string()).collect()
        } else {
            multi_space.split(line).map(|c| c.trim().to_string()).collect()
        }
    };

    let headers: Vec<String> = split(header_line).into_iter().filter(|h| !h.is_empty()).collect();
    if headers.is_empty() {
        warn!("Could not parse headers from first line of archive input");
        return Vec::new();
    }

    let mut records = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let mut row = split(line);
        row.resize(headers.len().max(row.len()), String::new());

        let cells: HashMap<&str, &str> = headers
            .iter()
            .zip(row.iter())
            .map(|(h, c)| (h.as_str(), c.as_str()))
            .collect();

        if let Some(record) = parse_row(&cells) {
            records.push(record);
        }
    }
    records
}

fn parse_row(cells: &HashMap<&str, &str>) -> Option<SermonRecord> {
    let get = |key: &str| cells.get(key).copied().unwrap_or("").trim().to_string();

    let title = get("Title");
    if title.is_empty() {
        return None;
    }

    let raw_date = get("Date");
    let Some(date) = parse_archive_date(&raw_date) else {
        warn!("Skipping archive entry with invalid date {:?} (Title: {})", raw_date, title);
        return None;
    };

    let speaker = match get("Speaker") {
        s if s.is_empty() => "Unknown Speaker".to_string(),
        s => s,
    };
    let scripture = get("Scripture");
    let series = match get("Series") {
        s if s.is_empty() => parish_common::archive::record::DEFAULT_SERIES.to_string(),
        s => s,
    };

    let mut record = SermonRecord::new(title, date.format("%Y-%m-%d").to_string());
    record.author = speaker;
    record.scripture = scripture.clone();
    record.source = SermonSource::Archive;
    record.series = series.clone();
    record.episode_number = get("Episode").parse::<i64>().ok();
    record.episode_absolute = get("Episode_Absolute").parse::<i64>().ok();

    if !series.is_empty() && series != parish_common::archive::record::DEFAULT_SERIES {
        record.tags.push(series);
    }
    if let Some(book) = scripture_book(&scripture) {
        if !record.tags.contains(&book) {
            record.tags.push(book);
        }
    }
    record.build_search_keywords();

    Some(record)
}

/// Leading book name of a scripture reference, e.g. "Luke" from "Luke 12:35-59"
pub fn scripture_book(scripture: &str) -> Option<String> {
    let re = Regex::new(r"^([A-Za-z]+)").expect("static regex");
    re.captures(scripture.trim())
        .map(|c| c.get(1).expect("group 1").as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Title\tSpeaker\tDate\tScripture\tSeries\tEpisode\n\
        Grace Abounding\tJohn Smith\t1/7/2024\tRomans 5:20\tRomans\t3\n\
        Faith Alone\t\t3/5/2023\t\t\t\n\
        No Date Here\tJane Doe\tsoon\tPsalm 23\t\t\n";

    #[test]
    fn parses_tab_separated_rows() {
        let records = parse_archive(SAMPLE);
        // The "soon" row is dropped for its unparseable date
        assert_eq!(records.len(), 2);

        let grace = &records[0];
        assert_eq!(grace.title, "Grace Abounding");
        assert_eq!(grace.author, "John Smith");
        assert_eq!(grace.date, "2024-01-07");
        assert_eq!(grace.series, "Romans");
        assert_eq!(grace.episode_number, Some(3));
        assert_eq!(grace.tags, vec!["Romans".to_string()]);
        assert!(grace.search_keywords.contains("grace abounding"));
        assert!(grace.id.is_empty(), "id assignment belongs to the reorganizer");
    }

    #[test]
    fn missing_speaker_gets_placeholder() {
        let records = parse_archive(SAMPLE);
        assert_eq!(records[1].author, "Unknown Speaker");
        assert_eq!(records[1].series, "The Sunday Sermon");
    }

    #[test]
    fn parses_multi_space_layout() {
        let text = "Title    Speaker    Date\n\
            Hope Renewed    Mary Jones    2024-06-02\n";
        let records = parse_archive(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Hope Renewed");
        assert_eq!(records[0].date, "2024-06-02");
    }

    #[test]
    fn archive_date_formats() {
        assert_eq!(
            parse_archive_date("1/1/2002"),
            NaiveDate::from_ymd_opt(2002, 1, 1)
        );
        assert_eq!(
            parse_archive_date("2024-01-07"),
            NaiveDate::from_ymd_opt(2024, 1, 7)
        );
        assert_eq!(parse_archive_date("13/45/2024"), None);
        assert_eq!(parse_archive_date(""), None);
    }

    #[test]
    fn scripture_book_extraction() {
        assert_eq!(scripture_book("Luke 12:35-59"), Some("Luke".to_string()));
        assert_eq!(scripture_book(""), None);
    }
}
