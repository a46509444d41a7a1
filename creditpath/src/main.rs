use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use creditpathlib::{
    client::PredictionClient,
    config::ClientConfig,
    error::{Result, RiskError},
    fields::map_form_fields,
    formats::{
        csv::{export_file_name, Csv},
        json::Json,
    },
    model::BorrowerRecord,
    render::{render_batch, render_single, BatchSummary, Formatter, ResultView},
    session::{ResultsBuffer, SubmitGate},
    traits::{ReadFormat, WriteFormat},
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, ValueEnum)]
enum Fmt {
    Csv,
    Json,
}

impl Fmt {
    fn extension(self) -> &'static str {
        match self {
            Fmt::Csv => "csv",
            Fmt::Json => "json",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "creditpath", version, about = "Loan default risk predictions from the command line")]
struct Cli {
    /// TOML-файл настроек
    #[arg(long)]
    config: Option<PathBuf>,

    /// Адрес сервиса прогнозов (перекрывает base_url из настроек)
    #[arg(long)]
    base_url: Option<String>,

    /// Фильтр логов tracing, например `info` или `creditpathlib=debug`
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Прогноз для одного заёмщика
    Predict {
        /// Поле в виде name=value; допускаются короткие имена формы (age, income, ...)
        #[arg(short = 'f', long = "field", value_parser = parse_field, required = true)]
        fields: Vec<(String, String)>,
    },
    /// Пакетный прогноз по файлу
    Batch {
        /// Входной файл
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,

        /// Файл выгрузки (по умолчанию loan_predictions_<время>.csv в export_dir)
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,

        #[arg(long = "in-format", value_enum, default_value = "csv")]
        in_format: Fmt,

        #[arg(long = "out-format", value_enum, default_value = "csv")]
        out_format: Fmt,
    },
    /// Состояние сервиса
    Health,
    /// Сведения о модели
    ModelInfo,
}

fn parse_field(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    if name.trim().is_empty() {
        return Err(format!("empty field name in '{s}'"));
    }
    Ok((name.trim().to_string(), value.to_string()))
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    }
    .with_base_url(cli.base_url)?;

    let client = PredictionClient::http(cfg.base_url.clone());
    let fmt = Formatter::new(cfg.currency_symbol.clone());
    let gate = SubmitGate::new();

    match cli.command {
        Command::Predict { fields } => {
            let record = map_form_fields(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            let _guard = gate.try_begin()?;
            let result = client.predict_one(&record).await?;
            print!("{}", render_single(&ResultView::from_result(&result, &fmt)));
        }
        Command::Batch { input, output, in_format, out_format } => {
            let path = input.ok_or_else(|| RiskError::InvalidInput("Please select a file to upload".into()))?;
            let records = read_borrowers(&path, in_format)?;

            let mut buffer = ResultsBuffer::new();
            {
                let _guard = gate.try_begin()?;
                buffer.replace(client.predict_batch(&records).await?);
            }
            let batch = buffer.current().ok_or(RiskError::NoData)?;

            let summary = BatchSummary::from_results(&batch.predictions);
            print!("{}", render_batch(batch, &summary, &fmt));

            let out_path = output.unwrap_or_else(|| {
                cfg.export_dir
                    .join(export_file_name(Local::now().naive_local()))
                    .with_extension(out_format.extension())
            });
            let mut w = BufWriter::new(File::create(&out_path)?);
            match out_format {
                Fmt::Csv => buffer.export(&mut w)?,
                Fmt::Json => Json::write(&mut w, &batch.predictions)?,
            }
            w.flush()?;
            println!("Results exported to {}", out_path.display());
        }
        Command::Health => {
            println!("{}", serde_json::to_string_pretty(&client.health().await?)?);
        }
        Command::ModelInfo => {
            println!("{}", serde_json::to_string_pretty(&client.model_info().await?)?);
        }
    }
    Ok(())
}

fn read_borrowers(path: &Path, format: Fmt) -> Result<Vec<BorrowerRecord>> {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(format.extension()));
    if !ext_ok {
        return Err(RiskError::InvalidInput(format!(
            "Please upload a .{} file: {}",
            format.extension(),
            path.display()
        )));
    }
    if !path.is_file() {
        return Err(RiskError::InvalidInput(format!("File not found: {}", path.display())));
    }

    let br = BufReader::new(File::open(path)?);
    let records = match format {
        Fmt::Csv => Csv::read(br),
        Fmt::Json => Json::read(br),
    }?;
    tracing::info!(rows = records.len(), path = %path.display(), "borrowers loaded");
    Ok(records)
}
