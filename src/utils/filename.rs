use crate::utils::constants::{FILENAME_DATE_LEN, FILENAME_DATE_OFFSET};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

/// Date embedded in a daily file name (e.g., L3_ozone_omi_20041001.txt -> 2004-10-01)
pub fn extract_date_from_filename(path: &Path) -> Option<NaiveDate> {
    let filename = path.file_name()?.to_str()?;
    let digits = filename.get(FILENAME_DATE_OFFSET..FILENAME_DATE_OFFSET + FILENAME_DATE_LEN)?;

    NaiveDate::parse_from_str(digits, "%Y%m%d").ok()
}

/// Date written in a header day label (e.g., "Oct  1, 2004")
pub fn parse_day_label(label: &str) -> Option<NaiveDate> {
    let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&normalized, "%b %d, %Y").ok()
}

/// Default output name `{YYYYMMDD}.{extension}`, dated from the file name or the
/// day label; otherwise the sanitized label, then the input file stem.
pub fn default_output_filename(input: &Path, day_label: &str, extension: &str) -> PathBuf {
    let stem = extract_date_from_filename(input)
        .or_else(|| parse_day_label(day_label))
        .map(|date| date.format("%Y%m%d").to_string())
        .or_else(|| sanitize(day_label))
        .or_else(|| {
            input
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(sanitize)
        })
        .unwrap_or_else(|| "ozone-map".to_string());

    PathBuf::from(format!("{}.{}", stem, extension))
}

fn sanitize(text: &str) -> Option<String> {
    let cleaned: String = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_date_from_filename() {
        let date = extract_date_from_filename(Path::new("data/L3_ozone_omi_20041001.txt"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2004, 10, 1));

        assert_eq!(extract_date_from_filename(Path::new("short.txt")), None);
        assert_eq!(
            extract_date_from_filename(Path::new("L3_ozone_omi_2004XX01.txt")),
            None
        );
    }

    #[test]
    fn test_parse_day_label() {
        assert_eq!(
            parse_day_label("Oct  1, 2004"),
            NaiveDate::from_ymd_opt(2004, 10, 1)
        );
        assert_eq!(
            parse_day_label("Dec 31, 2004"),
            NaiveDate::from_ymd_opt(2004, 12, 31)
        );
        assert_eq!(parse_day_label("not a date"), None);
    }

    #[test]
    fn test_default_output_filename() {
        assert_eq!(
            default_output_filename(Path::new("L3_ozone_omi_20041001.txt"), "Oct  2, 2004", "png"),
            PathBuf::from("20041001.png")
        );
        assert_eq!(
            default_output_filename(Path::new("today.txt"), "Oct  2, 2004", "png"),
            PathBuf::from("20041002.png")
        );
        assert_eq!(
            default_output_filename(Path::new("today.txt"), "Day 275??", "parquet"),
            PathBuf::from("Day_275.parquet")
        );
        assert_eq!(
            default_output_filename(Path::new("today.txt"), "   ", "csv"),
            PathBuf::from("today.csv")
        );
    }
}
