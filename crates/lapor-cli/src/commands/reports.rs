use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

use anyhow::anyhow;
use lapor_api_models::{Report, ReportId};
use lapor_client::listing::filter_and_sort;
use lapor_client::{
    ClientError, HttpRequest, HttpTransport, Method, PAGE_SIZE, PageWindow, PhotoUpload, ReportDraft,
    ReportStats, SavedReport, SortDirection, SortKey, SortState,
};
use tracing::{info, warn};

use crate::cli::{
    CreateArgs, ListArgs, OrderArg, OutputFormat, PhotoArgs, RemoveArgs, ShowArgs, UpdateArgs,
};
use crate::client::{AppContext, CliError, CliResult};
use crate::images::content_type_for;
use crate::output::{render_report_detail, render_report_page, render_stats};

pub(crate) async fn handle_list(
    ctx: &AppContext,
    args: ListArgs,
    format: OutputFormat,
) -> CliResult<()> {
    ctx.require_session()?;
    let reports = ctx.repository.list().await?;
    let (rows, window) = select_page(&reports, &args);
    render_report_page(&rows, &window, format)
}

/// Filter, sort and clamp the requested page.
pub(crate) fn select_page<'a>(reports: &'a [Report], args: &ListArgs) -> (Vec<&'a Report>, PageWindow) {
    let key = SortKey::from(args.sort);
    let direction = match (args.order, key) {
        (Some(OrderArg::Asc), _) => SortDirection::Ascending,
        (Some(OrderArg::Desc), _) | (None, SortKey::Tanggal) => SortDirection::Descending,
        (None, _) => SortDirection::Ascending,
    };
    let query = args.search.as_deref().unwrap_or_default();
    let filtered = filter_and_sort(reports, query, SortState { key, direction });
    let window = PageWindow::new(filtered.len(), args.page, PAGE_SIZE);
    let rows = filtered[window.range()].to_vec();
    (rows, window)
}

pub(crate) async fn handle_show(
    ctx: &AppContext,
    args: ShowArgs,
    format: OutputFormat,
) -> CliResult<()> {
    ctx.require_session()?;
    let report = ctx.repository.get(&ReportId::new(args.id)).await?;
    render_report_detail(&report, format)
}

pub(crate) async fn handle_create(ctx: &AppContext, args: CreateArgs) -> CliResult<()> {
    ctx.require_session()?;
    let draft = ReportDraft {
        nama: args.nama,
        alamat: args.alamat,
        deskripsi: args.deskripsi,
        tanggal: args.tanggal,
        status: None,
        foto: args.foto.as_deref().map(read_photo).transpose()?,
    };
    draft.validate_create().map_err(ClientError::Validation)?;

    let saved = ctx.repository.create(draft.into_create_form()).await?;
    print_saved(&saved, "Laporan berhasil dikirim.");
    Ok(())
}

pub(crate) async fn handle_update(ctx: &AppContext, args: UpdateArgs) -> CliResult<()> {
    ctx.require_session()?;
    let id = ReportId::new(args.id);
    let current = ctx.repository.get(&id).await?;

    let mut draft = ReportDraft::from_report(&current);
    if let Some(nama) = args.nama {
        draft.nama = nama;
    }
    if let Some(alamat) = args.alamat {
        draft.alamat = alamat;
    }
    if let Some(deskripsi) = args.deskripsi {
        draft.deskripsi = deskripsi;
    }
    if let Some(tanggal) = args.tanggal {
        draft.tanggal = tanggal;
    }
    if let Some(status) = args.status {
        draft.status = Some(status.into());
    }
    draft.foto = args.foto.as_deref().map(read_photo).transpose()?;
    draft.validate_edit().map_err(ClientError::Validation)?;

    let saved = ctx.repository.update(&id, draft.into_update_form()).await?;
    print_saved(&saved, "Laporan berhasil diperbarui.");
    Ok(())
}

pub(crate) async fn handle_remove(ctx: &AppContext, args: RemoveArgs) -> CliResult<()> {
    ctx.require_session()?;
    if !args.yes && !confirm_delete(&args.id)? {
        println!("Dibatalkan.");
        return Ok(());
    }
    let id = ReportId::new(args.id);
    ctx.repository.delete(&id).await?;
    info!(report = %id, "report deleted");
    println!("Laporan {id} dihapus.");
    Ok(())
}

/// Download a report photo, preferring the authenticated endpoint and falling
/// back to public storage.
pub(crate) async fn handle_photo(ctx: &AppContext, args: PhotoArgs) -> CliResult<()> {
    let report = ctx.repository.get(&ReportId::new(args.id)).await?;
    let foto = report
        .photo()
        .ok_or_else(|| CliError::validation(format!("report {} has no photo", report.id)))?;

    match ctx.images.load(foto).await {
        Ok(handle) => {
            fs::copy(handle.url(), &args.out).map_err(|err| {
                CliError::failure(anyhow!("failed to write {}: {err}", args.out.display()))
            })?;
        }
        Err(err) => {
            let url = ctx.images.public_url(foto);
            warn!(error = %err, url = %url, "protected photo fetch failed; trying public storage");
            let response = ctx
                .transport
                .send(HttpRequest::new(Method::Get, url.clone()))
                .await?;
            if !response.is_success() {
                return Err(CliError::failure(anyhow!(
                    "photo unavailable at {url} (status {})",
                    response.status
                )));
            }
            fs::write(&args.out, &response.body).map_err(|err| {
                CliError::failure(anyhow!("failed to write {}: {err}", args.out.display()))
            })?;
        }
    }
    println!("{}", args.out.display());
    Ok(())
}

pub(crate) async fn handle_stats(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    ctx.require_session()?;
    let reports = ctx.repository.list().await?;
    render_stats(&ReportStats::from_reports(&reports), format)
}

fn read_photo(path: &Path) -> CliResult<PhotoUpload> {
    let bytes = fs::read(path)
        .map_err(|err| CliError::failure(anyhow!("failed to read {}: {err}", path.display())))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| CliError::validation("photo path must name a file"))?
        .to_string();
    Ok(PhotoUpload {
        filename,
        content_type: content_type_for(path).to_string(),
        bytes,
    })
}

fn print_saved(saved: &SavedReport, default_message: &str) {
    println!("{}", saved.message.as_deref().unwrap_or(default_message));
    if let Some(report) = &saved.report {
        println!("id: {}", report.id);
    }
}

fn confirm_delete(id: &str) -> CliResult<bool> {
    if !io::stdin().is_terminal() {
        return Err(CliError::validation(
            "refusing to delete without confirmation; pass --yes when running non-interactively",
        ));
    }
    print!("Hapus laporan {id}? [y/N] ");
    io::stdout()
        .flush()
        .map_err(|err| CliError::failure(anyhow!("failed to write prompt: {err}")))?;
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .map_err(|err| CliError::failure(anyhow!("failed to read confirmation: {err}")))?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "ya" | "yes"))
}
