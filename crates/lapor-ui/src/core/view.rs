//! Presentation helpers shared by pages: badges, stat tiles and pager labels.

use lapor_api_models::{ReportStatus, ValidationErrors};
use lapor_client::display::showing_label;
use lapor_client::{PageWindow, ReportStats, SortDirection, SortKey, SortState};

/// CSS modifier for a status badge.
#[must_use]
pub const fn status_class(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Baru => "badge-baru",
        ReportStatus::Diproses => "badge-diproses",
        ReportStatus::Selesai => "badge-selesai",
    }
}

/// Translation key for a status label.
#[must_use]
pub const fn status_key(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::Baru => "status.baru",
        ReportStatus::Diproses => "status.diproses",
        ReportStatus::Selesai => "status.selesai",
    }
}

/// One home-page tile: variant, translation key and value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatTile {
    /// CSS variant.
    pub variant: &'static str,
    /// Translation key of the label.
    pub label_key: &'static str,
    /// Count, or `…` while loading.
    pub value: String,
}

/// Tiles for the home page hero.
#[must_use]
pub fn stat_tiles(stats: &ReportStats, loading: bool) -> Vec<StatTile> {
    let value = |count: usize| {
        if loading {
            "…".to_string()
        } else {
            count.to_string()
        }
    };
    vec![
        StatTile {
            variant: "total",
            label_key: "home.stat_total",
            value: value(stats.total),
        },
        StatTile {
            variant: "baru",
            label_key: "home.stat_baru",
            value: value(stats.baru),
        },
        StatTile {
            variant: "diproses",
            label_key: "home.stat_diproses",
            value: value(stats.diproses),
        },
        StatTile {
            variant: "selesai",
            label_key: "home.stat_selesai",
            value: value(stats.selesai),
        },
    ]
}

/// Sort arrow shown next to a column header.
#[must_use]
pub fn sort_indicator(sort: SortState, column: SortKey) -> &'static str {
    if sort.key != column {
        return "";
    }
    match sort.direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    }
}

/// `{page_label} {page} {of} {pages}`, e.g. `Hal 2 dari 5`.
#[must_use]
pub fn page_label(window: &PageWindow, page_word: &str, of_word: &str) -> String {
    format!(
        "{page_word} {} {of_word} {}",
        window.page, window.total_pages
    )
}

/// Text and button state of the pager. Always rendered, even for an empty
/// list, which reads `Hal 1 dari 1` with every button disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagerState {
    /// `Menampilkan a - b dari n laporan`.
    pub showing: String,
    /// `Hal x dari y`.
    pub label: String,
    /// First and previous are disabled.
    pub at_start: bool,
    /// Next and last are disabled.
    pub at_end: bool,
}

/// Pager model for a window, with translated label words.
#[must_use]
pub fn pager_state(window: &PageWindow, page_word: &str, of_word: &str) -> PagerState {
    PagerState {
        showing: showing_label(window),
        label: page_label(window, page_word, of_word),
        at_start: !window.has_prev(),
        at_end: !window.has_next(),
    }
}

/// First message for a field, for rendering beside its input.
#[must_use]
pub fn field_error(errors: &ValidationErrors, field: &str) -> Option<String> {
    errors.first(field).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiles_show_ellipsis_while_loading() {
        let stats = ReportStats {
            total: 5,
            baru: 2,
            diproses: 2,
            selesai: 1,
        };
        let loading = stat_tiles(&stats, true);
        assert!(loading.iter().all(|tile| tile.value == "…"));
        let loaded = stat_tiles(&stats, false);
        assert_eq!(loaded[0].value, "5");
        assert_eq!(loaded[3].label_key, "home.stat_selesai");
    }

    #[test]
    fn sort_indicator_marks_active_column() {
        let sort = SortState::default();
        assert_eq!(sort_indicator(sort, SortKey::Tanggal), "▼");
        assert_eq!(sort_indicator(sort, SortKey::Nama), "");
        assert_eq!(
            sort_indicator(sort.toggled(SortKey::Nama), SortKey::Nama),
            "▲"
        );
    }

    #[test]
    fn pager_label_uses_translated_words() {
        let window = PageWindow::new(23, 2, 10);
        assert_eq!(page_label(&window, "Hal", "dari"), "Hal 2 dari 3");
        assert_eq!(status_class(ReportStatus::Selesai), "badge-selesai");
    }

    #[test]
    fn empty_list_still_gets_a_disabled_pager() {
        let pager = pager_state(&PageWindow::new(0, 1, 10), "Hal", "dari");
        assert_eq!(pager.label, "Hal 1 dari 1");
        assert_eq!(pager.showing, "Menampilkan 0 - 0 dari 0 laporan");
        assert!(pager.at_start && pager.at_end);

        let middle = pager_state(&PageWindow::new(23, 2, 10), "Hal", "dari");
        assert!(!middle.at_start && !middle.at_end);
    }

    #[test]
    fn field_error_takes_first_message() {
        let mut errors = ValidationErrors::new();
        errors.add("foto", "Ukuran gambar maksimal 5 MB.");
        errors.add("foto", "lain");
        assert_eq!(
            field_error(&errors, "foto").as_deref(),
            Some("Ukuran gambar maksimal 5 MB.")
        );
        assert_eq!(field_error(&errors, "nama"), None);
    }
}
