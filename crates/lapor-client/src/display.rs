//! Text formatting shared by the list views.

use chrono::{Datelike, NaiveDate};

/// Descriptions longer than this are cut in list rows.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 140;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// `dd MMM yyyy` with Indonesian month abbreviations, `-` when absent.
#[must_use]
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || "-".to_string(),
        |date| {
            let month = MONTHS
                .get(date.month0() as usize)
                .copied()
                .unwrap_or_default();
            format!("{:02} {month} {}", date.day(), date.year())
        },
    )
}

/// Cut `text` to `limit` characters, appending `…` when shortened.
#[must_use]
pub fn truncate(text: &str, limit: usize) -> (String, bool) {
    let trimmed = text.trim();
    if trimmed.chars().count() <= limit {
        return (trimmed.to_string(), false);
    }
    let head: String = trimmed.chars().take(limit).collect();
    (format!("{}…", head.trim_end()), true)
}

/// Human label for the pager: `Menampilkan a - b dari n laporan`.
#[must_use]
pub fn showing_label(window: &crate::PageWindow) -> String {
    format!(
        "Menampilkan {} - {} dari {} laporan",
        window.first_row(),
        window.end,
        window.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::{PAGE_SIZE, PageWindow};

    #[test]
    fn dates_use_indonesian_months() {
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2024, 1, 5)), "05 Jan 2024");
        assert_eq!(format_date(NaiveDate::from_ymd_opt(2023, 8, 17)), "17 Agu 2023");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn truncation_counts_characters() {
        let (short, cut) = truncate("  pendek  ", DESCRIPTION_PREVIEW_CHARS);
        assert_eq!((short.as_str(), cut), ("pendek", false));

        let long = "é".repeat(DESCRIPTION_PREVIEW_CHARS + 1);
        let (preview, cut) = truncate(&long, DESCRIPTION_PREVIEW_CHARS);
        assert!(cut);
        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW_CHARS + 1);
        assert!(preview.ends_with('…'));
    }

    #[test]
    fn showing_label_matches_window() {
        assert_eq!(
            showing_label(&PageWindow::new(25, 3, PAGE_SIZE)),
            "Menampilkan 21 - 25 dari 25 laporan"
        );
        assert_eq!(
            showing_label(&PageWindow::new(0, 1, PAGE_SIZE)),
            "Menampilkan 0 - 0 dari 0 laporan"
        );
    }
}
