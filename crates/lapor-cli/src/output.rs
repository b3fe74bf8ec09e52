//! Output renderers and formatting helpers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use lapor_api_models::Report;
use lapor_client::display::{format_date, showing_label, truncate};
use lapor_client::{PageWindow, ReportStats, Session};
use serde::Serialize;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const TABLE_DESCRIPTION_CHARS: usize = 40;
const TABLE_COLUMN_CHARS: usize = 24;

#[derive(Serialize)]
struct ReportPage<'a> {
    page: usize,
    total_pages: usize,
    total: usize,
    reports: &'a [&'a Report],
}

pub(crate) fn render_report_page(
    reports: &[&Report],
    window: &PageWindow,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&ReportPage {
            page: window.page,
            total_pages: window.total_pages,
            total: window.total,
            reports,
        }),
        OutputFormat::Table => {
            print!("{}", format_report_table(reports, window));
            Ok(())
        }
    }
}

pub(crate) fn format_report_table(reports: &[&Report], window: &PageWindow) -> String {
    let mut out = String::new();
    if window.total == 0 {
        out.push_str("Belum ada laporan.\n");
    } else {
        let _ = writeln!(
            out,
            "{:>3} {:<8} {:<11} {:<8} {:<24} {:<24} DESKRIPSI",
            "NO", "ID", "TANGGAL", "STATUS", "NAMA", "ALAMAT"
        );
    }
    for (offset, report) in reports.iter().enumerate() {
        let (nama, _) = truncate(&report.nama, TABLE_COLUMN_CHARS);
        let (alamat, _) = truncate(&report.alamat, TABLE_COLUMN_CHARS);
        let (deskripsi, _) = truncate(report.description(), TABLE_DESCRIPTION_CHARS);
        let _ = writeln!(
            out,
            "{:>3} {:<8} {:<11} {:<8} {:<24} {:<24} {}",
            window.first_row() + offset,
            report.id.as_str(),
            format_date(report.tanggal),
            report.status.as_str(),
            nama,
            alamat,
            if deskripsi.is_empty() { "-" } else { &deskripsi }
        );
    }
    let _ = writeln!(out, "{}", showing_label(window));
    let _ = writeln!(out, "Hal {} dari {}", window.page, window.total_pages);
    out
}

pub(crate) fn render_report_detail(report: &Report, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table => {
            print!("{}", format_report_detail(report));
            Ok(())
        }
    }
}

pub(crate) fn format_report_detail(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "id: {}", report.id);
    let _ = writeln!(out, "nama: {}", report.nama);
    let _ = writeln!(out, "alamat: {}", report.alamat);
    let _ = writeln!(out, "tanggal: {}", format_date(report.tanggal));
    let _ = writeln!(out, "status: {}", report.status.as_str());
    if !report.description().is_empty() {
        let _ = writeln!(out, "deskripsi: {}", report.description());
    }
    let _ = writeln!(out, "foto: {}", report.photo().unwrap_or("-"));
    out
}

pub(crate) fn render_session(session: &Session, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "authenticated": session.is_authenticated(),
            "name": session.name,
            "role": session.role.map(|role| role.as_str()),
            "initials": session.initials(),
        })),
        OutputFormat::Table => {
            if session.is_authenticated() {
                println!("name: {}", session.display_name().unwrap_or("-"));
                println!(
                    "role: {}",
                    session.role.map_or("-", |role| role.as_str())
                );
                println!("initials: {}", session.initials());
            } else {
                println!("not signed in");
            }
            Ok(())
        }
    }
}

pub(crate) fn render_stats(stats: &ReportStats, format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(&json!({
            "total": stats.total,
            "baru": stats.baru,
            "diproses": stats.diproses,
            "selesai": stats.selesai,
        })),
        OutputFormat::Table => {
            println!("total: {}", stats.total);
            println!("baru: {}", stats.baru);
            println!("diproses: {}", stats.diproses);
            println!("selesai: {}", stats.selesai);
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use lapor_api_models::{ReportId, ReportStatus};

    fn report(id: u64, nama: &str, deskripsi: Option<&str>) -> Report {
        Report {
            id: ReportId::from(id),
            nama: nama.into(),
            alamat: "Jl. Melati 4".into(),
            deskripsi: deskripsi.map(str::to_string),
            tanggal: NaiveDate::from_ymd_opt(2024, 5, 3),
            status: ReportStatus::Diproses,
            foto: None,
        }
    }

    #[test]
    fn table_numbers_rows_from_page_offset() {
        let second = report(11, "Budi", Some("Jalan berlubang di depan sekolah dasar negeri"));
        let rows = vec![&second];
        let window = PageWindow::new(11, 2, 10);
        let table = format_report_table(&rows, &window);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with(" NO ID"));
        assert!(lines[1].starts_with(" 11 11"));
        assert!(lines[1].contains("03 Mei 2024"));
        assert!(lines[1].contains("diproses"));
        assert!(lines[1].ends_with('…'));
        assert_eq!(lines[2], "Menampilkan 11 - 11 dari 11 laporan");
        assert_eq!(lines[3], "Hal 2 dari 2");
    }

    #[test]
    fn empty_table_prints_placeholder() {
        let table = format_report_table(&[], &PageWindow::new(0, 1, 10));
        assert_eq!(
            table,
            "Belum ada laporan.\nMenampilkan 0 - 0 dari 0 laporan\nHal 1 dari 1\n"
        );
    }

    #[test]
    fn detail_lists_fields_and_placeholders() {
        let detail = format_report_detail(&report(7, "Sari", None));
        assert!(detail.contains("id: 7\n"));
        assert!(detail.contains("tanggal: 03 Mei 2024\n"));
        assert!(!detail.contains("deskripsi:"));
        assert!(detail.ends_with("foto: -\n"));
    }
}
