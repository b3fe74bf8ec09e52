//! Argument parsing and command dispatch.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use lapor_api_models::ReportStatus;
use lapor_client::SortKey;
use reqwest::Url;
use tracing::debug;
use uuid::Uuid;

use crate::client::{AppContext, CliDependencies, CliResult, parse_url};
use crate::commands::{auth, reports};
use crate::logging::{LoggingConfig, init_logging};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Parses CLI arguments, executes the requested command and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&LoggingConfig::from_env()) {
        eprintln!("warning: {err:#}");
    }
    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let deps = match CliDependencies::from_cli(&cli, &trace_id) {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli, &deps).await {
        Ok(()) => {
            debug!(command = command_name, trace_id = %trace_id, "command completed");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            debug!(command = command_name, trace_id = %trace_id, exit_code, "command failed");
            eprintln!("error: {}", err.display_message());
            exit_code
        }
    }
}

async fn dispatch(cli: Cli, deps: &CliDependencies) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli, deps)?;
    let output = cli.output;

    match cli.command {
        Command::Login(args) => auth::handle_login(&ctx, args).await,
        Command::Register(args) => auth::handle_register(&ctx, args).await,
        Command::Logout => auth::handle_logout(&ctx).await,
        Command::Whoami => auth::handle_whoami(&ctx, output),
        Command::Ls(args) => reports::handle_list(&ctx, args, output).await,
        Command::Show(args) => reports::handle_show(&ctx, args, output).await,
        Command::Create(args) => reports::handle_create(&ctx, args).await,
        Command::Update(args) => reports::handle_update(&ctx, args).await,
        Command::Rm(args) => reports::handle_remove(&ctx, args).await,
        Command::Foto(args) => reports::handle_photo(&ctx, args).await,
        Command::Stats => reports::handle_stats(&ctx, output).await,
    }
}

#[derive(Parser)]
#[command(name = "lapor", about = "Administrative CLI for LaporOnline incident reports")]
pub(crate) struct Cli {
    #[arg(
        long,
        global = true,
        env = "LAPOR_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(long, global = true, env = "LAPOR_STORAGE_URL", value_parser = parse_url)]
    pub(crate) storage_url: Option<Url>,
    #[arg(long, global = true, env = "LAPOR_SESSION_FILE")]
    pub(crate) session_file: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        env = "LAPOR_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Sign in and store the session token.
    Login(LoginArgs),
    /// Create an account.
    Register(RegisterArgs),
    /// End the session (server logout is best-effort).
    Logout,
    /// Show the stored session.
    Whoami,
    /// List reports with search, sort and paging.
    Ls(ListArgs),
    /// Show one report.
    Show(ShowArgs),
    /// Submit a new report.
    Create(CreateArgs),
    /// Edit a report.
    Update(UpdateArgs),
    /// Delete a report.
    Rm(RemoveArgs),
    /// Download a report photo.
    Foto(PhotoArgs),
    /// Count reports per status.
    Stats,
}

#[derive(Args, Debug)]
pub(crate) struct LoginArgs {
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, env = "LAPOR_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    #[arg(long)]
    pub(crate) name: String,
    #[arg(long)]
    pub(crate) email: String,
    #[arg(long, env = "LAPOR_PASSWORD", hide_env_values = true)]
    pub(crate) password: Option<String>,
    #[arg(long)]
    pub(crate) password_confirmation: Option<String>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Case-insensitive text matched against name, address and description.
    #[arg(long)]
    pub(crate) search: Option<String>,
    #[arg(long, value_enum, default_value_t = SortArg::Tanggal)]
    pub(crate) sort: SortArg,
    /// Defaults to descending for dates and ascending otherwise.
    #[arg(long, value_enum)]
    pub(crate) order: Option<OrderArg>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
}

#[derive(Args, Debug)]
pub(crate) struct ShowArgs {
    pub(crate) id: String,
}

#[derive(Args, Debug)]
pub(crate) struct CreateArgs {
    #[arg(long)]
    pub(crate) nama: String,
    #[arg(long)]
    pub(crate) alamat: String,
    #[arg(long)]
    pub(crate) deskripsi: String,
    /// Incident date as YYYY-MM-DD.
    #[arg(long)]
    pub(crate) tanggal: String,
    #[arg(long)]
    pub(crate) foto: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct UpdateArgs {
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) nama: Option<String>,
    #[arg(long)]
    pub(crate) alamat: Option<String>,
    #[arg(long)]
    pub(crate) deskripsi: Option<String>,
    #[arg(long)]
    pub(crate) tanggal: Option<String>,
    #[arg(long, value_enum)]
    pub(crate) status: Option<StatusArg>,
    #[arg(long)]
    pub(crate) foto: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct RemoveArgs {
    pub(crate) id: String,
    /// Skip the confirmation prompt.
    #[arg(long)]
    pub(crate) yes: bool,
}

#[derive(Args, Debug)]
pub(crate) struct PhotoArgs {
    pub(crate) id: String,
    #[arg(long)]
    pub(crate) out: PathBuf,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum, PartialEq, Eq)]
pub(crate) enum SortArg {
    Nama,
    Alamat,
    Deskripsi,
    #[default]
    Tanggal,
    Status,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Nama => Self::Nama,
            SortArg::Alamat => Self::Alamat,
            SortArg::Deskripsi => Self::Deskripsi,
            SortArg::Tanggal => Self::Tanggal,
            SortArg::Status => Self::Status,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub(crate) enum OrderArg {
    Asc,
    Desc,
}

#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub(crate) enum StatusArg {
    Baru,
    Diproses,
    Selesai,
}

impl From<StatusArg> for ReportStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Baru => Self::Baru,
            StatusArg::Diproses => Self::Diproses,
            StatusArg::Selesai => Self::Selesai,
        }
    }
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Login(_) => "login",
        Command::Register(_) => "register",
        Command::Logout => "logout",
        Command::Whoami => "whoami",
        Command::Ls(_) => "ls",
        Command::Show(_) => "show",
        Command::Create(_) => "create",
        Command::Update(_) => "update",
        Command::Rm(_) => "rm",
        Command::Foto(_) => "foto",
        Command::Stats => "stats",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "lapor",
            "ls",
            "--search",
            "banjir",
            "--sort",
            "nama",
            "--order",
            "desc",
            "--api-url",
            "https://lapor.example.id/api",
            "--format",
            "json",
        ])
        .expect("arguments parse");
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.api_url.as_str(), "https://lapor.example.id/api");
        let Command::Ls(args) = cli.command else {
            panic!("expected ls");
        };
        assert_eq!(args.sort, SortArg::Nama);
        assert_eq!(args.order, Some(OrderArg::Desc));
        assert_eq!(args.search.as_deref(), Some("banjir"));
        assert_eq!(command_label(&Command::Stats), "stats");
    }

    #[test]
    fn rejects_invalid_urls() {
        assert!(Cli::try_parse_from(["lapor", "--api-url", "not a url", "whoami"]).is_err());
    }
}
