use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetfill::{FillConfig, FillError, FillPlan, FormParts, fill_template, parse_payload};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sheetfill", version, about = "Fill xlsx templates from a JSON cell map")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace). RUST_LOG wins when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill a template and write the resulting workbook.
    Fill(FillArgs),
    /// Print the fill plan a payload resolves to, without touching a workbook.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct PayloadArgs {
    /// JSON payload file.
    #[arg(long)]
    payload: Option<PathBuf>,

    /// JSON payload given inline.
    #[arg(long = "payload-json", value_name = "JSON")]
    payload_json: Option<String>,
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// YAML file with fill defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Row for the first position when the payload names none.
    #[arg(
        long = "start-row",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(sheetfill::ROW_MAX))
    )]
    start_row: Option<u32>,

    /// Largest accepted template or payload, in bytes.
    #[arg(long = "max-upload-bytes")]
    max_upload_bytes: Option<usize>,
}

#[derive(Args, Debug)]
struct FillArgs {
    /// xlsx template.
    #[arg(long)]
    template: PathBuf,

    #[command(flatten)]
    payload: PayloadArgs,

    /// Where to write the filled workbook.
    #[arg(long, short)]
    out: PathBuf,

    /// Suggested download filename reported alongside the output.
    #[arg(long)]
    filename: Option<String>,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    payload: PayloadArgs,

    #[command(flatten)]
    config: ConfigArgs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Fill(args) => run_fill(args),
        Command::Plan(args) => run_plan(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(err),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Fill errors print their JSON body; caller mistakes exit with 2, the rest with 1.
fn report_error(err: anyhow::Error) -> ExitCode {
    match err.downcast_ref::<FillError>() {
        Some(fill) => {
            tracing::debug!(status = fill.status_code(), "fill failed");
            match serde_json::to_string_pretty(&fill.to_body()) {
                Ok(body) => eprintln!("{body}"),
                Err(_) => eprintln!("error: {fill}"),
            }
            if fill.is_caller_error() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
        None => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn load_config(args: &ConfigArgs) -> Result<FillConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let yaml = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            FillConfig::from_yaml_str(&yaml)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => FillConfig::default(),
    };
    if let Some(row) = args.start_row {
        config = config.with_default_start_row(row)?;
    }
    if let Some(limit) = args.max_upload_bytes {
        config = config.with_max_upload_bytes(limit);
    }
    Ok(config)
}

fn read_file(path: &Path, what: &str) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read {what} {}", path.display()))
}

fn run_fill(args: FillArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    if let Some(name) = args.filename {
        config = config.with_output_filename(name);
    }

    let mut parts = FormParts::new().with_binary("template", read_file(&args.template, "template")?);
    parts = match (args.payload.payload, args.payload.payload_json) {
        (Some(path), _) => parts.with_binary("payload", read_file(&path, "payload")?),
        (None, Some(json)) => parts.with_text("payload", json),
        (None, None) => parts,
    };

    let outcome = fill_template(parts, &config)?;
    fs::write(&args.out, &outcome.document.bytes)
        .with_context(|| format!("failed to write {}", args.out.display()))?;

    tracing::info!(
        out = %args.out.display(),
        disposition = outcome.document.content_disposition().as_str(),
        "wrote filled workbook"
    );
    println!("{}", serde_json::to_string(&outcome.report)?);
    Ok(())
}

fn run_plan(args: PlanArgs) -> Result<()> {
    let config = load_config(&args.config)?;
    let raw = match (args.payload.payload, args.payload.payload_json) {
        (Some(path), _) => String::from_utf8_lossy(&read_file(&path, "payload")?).into_owned(),
        (None, Some(json)) => json,
        (None, None) => String::new(),
    };
    let payload = parse_payload(&raw)?;
    let plan = FillPlan::build(&payload, &config)?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
