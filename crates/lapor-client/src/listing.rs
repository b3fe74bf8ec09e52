//! Pure search, sort, pagination and summary helpers over a fetched report set.

use std::cmp::Ordering;
use std::ops::Range;

use lapor_api_models::{Report, ReportStatus};

/// Rows per page.
pub const PAGE_SIZE: usize = 10;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Reporter name.
    Nama,
    /// Address.
    Alamat,
    /// Description.
    Deskripsi,
    /// Incident date.
    Tanggal,
    /// Processing status.
    Status,
}

impl SortKey {
    /// Column identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nama => "nama",
            Self::Alamat => "alamat",
            Self::Deskripsi => "deskripsi",
            Self::Tanggal => "tanggal",
            Self::Status => "status",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    /// The other direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Active sort column and direction. Defaults to newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    /// Column.
    pub key: SortKey,
    /// Direction.
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            key: SortKey::Tanggal,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Clicking the active column flips it; another column starts ascending.
    #[must_use]
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self {
                key,
                direction: SortDirection::Ascending,
            }
        }
    }
}

/// Case-insensitive substring match on name, address and description.
/// A blank query matches everything.
#[must_use]
pub fn matches_query(report: &Report, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [report.nama.as_str(), report.alamat.as_str(), report.description()]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Compare two reports on one column in ascending order.
///
/// Dates compare by value with absent dates lowest; every other column
/// compares case-insensitively as text.
#[must_use]
pub fn compare_reports(a: &Report, b: &Report, key: SortKey) -> Ordering {
    match key {
        SortKey::Tanggal => a.tanggal.cmp(&b.tanggal),
        SortKey::Nama => compare_text(&a.nama, &b.nama),
        SortKey::Alamat => compare_text(&a.alamat, &b.alamat),
        SortKey::Deskripsi => compare_text(a.description(), b.description()),
        SortKey::Status => compare_text(a.status.as_str(), b.status.as_str()),
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Filter then sort, returning references into `reports`.
#[must_use]
pub fn filter_and_sort<'a>(reports: &'a [Report], query: &str, sort: SortState) -> Vec<&'a Report> {
    let mut rows: Vec<&Report> = reports
        .iter()
        .filter(|report| matches_query(report, query))
        .collect();
    rows.sort_by(|a, b| {
        let ordering = compare_reports(a, b, sort.key);
        match sort.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    rows
}

/// One page's position within a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// 1-based page after clamping.
    pub page: usize,
    /// Page count, at least 1.
    pub total_pages: usize,
    /// Items in the whole result set.
    pub total: usize,
    /// Offset of the first item on this page.
    pub start: usize,
    /// Offset one past the last item on this page.
    pub end: usize,
}

impl PageWindow {
    /// Clamp `requested` into `[1, ceil(total / page_size)]` and compute offsets.
    #[must_use]
    pub fn new(total: usize, requested: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size).max(1);
        let page = requested.clamp(1, total_pages);
        let start = ((page - 1) * page_size).min(total);
        let end = (start + page_size).min(total);
        Self {
            page,
            total_pages,
            total,
            start,
            end,
        }
    }

    /// Offsets covered by this page.
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// 1-based number of the first row shown, 0 when empty.
    #[must_use]
    pub const fn first_row(&self) -> usize {
        if self.total == 0 { 0 } else { self.start + 1 }
    }

    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Counts per status for the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// All reports.
    pub total: usize,
    /// Status `baru` (including unknown values).
    pub baru: usize,
    /// Status `diproses`.
    pub diproses: usize,
    /// Status `selesai`.
    pub selesai: usize,
}

impl ReportStats {
    /// Tally a report set.
    #[must_use]
    pub fn from_reports(reports: &[Report]) -> Self {
        reports.iter().fold(Self::default(), |mut stats, report| {
            stats.total += 1;
            match report.status {
                ReportStatus::Baru => stats.baru += 1,
                ReportStatus::Diproses => stats.diproses += 1,
                ReportStatus::Selesai => stats.selesai += 1,
            }
            stats
        })
    }
}
