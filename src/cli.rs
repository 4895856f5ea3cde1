/*!
chartform Command Line Interface

Provides commands for inspecting table schemas and rendering charts from
bundled datasets, local files, URLs or pasted JSON.
*/

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use chartform::chart::{build_chart_spec, ChartForm, ChartType};
use chartform::diagnostics::TracingDiagnostics;
use chartform::naming;
use chartform::reader::{data, load_table, quote_identifier, LoadSource, PolarsReader, Reader};
use chartform::schema::query_schema;
use chartform::writer::{HtmlWriter, VegaLiteWriter, Writer};
use chartform::{Settings, VERSION};

#[derive(Parser)]
#[command(name = "chartform")]
#[command(about = "Inspect tabular data and build charts from it")]
#[command(version = VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the bundled datasets
    Datasets,

    /// Print the schema summary of a data source as JSON
    Schema {
        /// Data source: builtin:<name>, json:<text>, an http(s) URL or a file path
        #[arg(long)]
        source: String,

        /// Table name to load the source under
        #[arg(long)]
        table: Option<String>,

        /// Number of sample values per column
        #[arg(long)]
        sample_size: Option<usize>,

        /// JSON settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render a chart of a data source
    Chart {
        /// Data source: builtin:<name>, json:<text>, an http(s) URL or a file path
        #[arg(long)]
        source: String,

        /// Chart type (line, grouped-column, stacked-column, 100-stacked-column, bar)
        #[arg(long)]
        chart_type: ChartType,

        /// Column on the x axis
        #[arg(long)]
        x: Option<String>,

        /// Column on the y axis, or `count` for the number of records
        #[arg(long)]
        y: Option<String>,

        /// Column to colour series by
        #[arg(long)]
        color_by: Option<String>,

        /// Table name to load the source under
        #[arg(long)]
        table: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Vegalite)]
        writer: OutputFormat,

        /// Output file path (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,

        /// JSON settings file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Vegalite,
    Html,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Datasets => {
            for name in data::builtin_names() {
                println!("builtin:{}", name);
            }
        }

        Commands::Schema {
            source,
            table,
            sample_size,
            config,
        } => {
            let mut settings = load_settings(config.as_ref())?;
            if let Some(n) = sample_size {
                settings.sample_size = n;
            }

            let reader = PolarsReader::new();
            let (source, table) = load_source(&reader, &source, table)?;
            tracing::debug!(source = %source.identity(), table = %table, "Extracting schema");

            match query_schema(&reader, &table, settings.sample_size, &TracingDiagnostics) {
                Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
                None => std::process::exit(1),
            }
        }

        Commands::Chart {
            source,
            chart_type,
            x,
            y,
            color_by,
            table,
            writer,
            output,
            config,
        } => {
            let settings = load_settings(config.as_ref())?;
            let reader = PolarsReader::new();
            let (_, table) = load_source(&reader, &source, table)?;

            let Some(summary) =
                query_schema(&reader, &table, settings.sample_size, &TracingDiagnostics)
            else {
                std::process::exit(1);
            };

            let form = ChartForm {
                chart_type,
                x,
                y: y.map(|y| {
                    if y == "count" && summary.column("count").is_none() {
                        naming::COUNT_FIELD.to_string()
                    } else {
                        y
                    }
                }),
                color_by,
            };
            let element =
                build_chart_spec(&form, &table, &summary, &settings, &TracingDiagnostics);

            let df = reader.execute_sql(&format!("SELECT * FROM {}", quote_identifier(&table)))?;
            let rendered = match writer {
                OutputFormat::Vegalite => VegaLiteWriter::new().write(&element, &df)?,
                OutputFormat::Html => HtmlWriter::new().write(&element, &df)?,
            };

            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write '{}'", path.display()))?;
                    tracing::info!(path = %path.display(), "Wrote chart");
                }
                None => println!("{}", rendered),
            }
        }
    }

    Ok(())
}

fn load_settings(config: Option<&PathBuf>) -> anyhow::Result<Settings> {
    match config {
        Some(path) => Ok(Settings::from_file(path)?),
        None => Ok(Settings::default()),
    }
}

/// Load `source` into the reader, returning the parsed source and its table name
fn load_source(
    reader: &PolarsReader,
    source: &str,
    table: Option<String>,
) -> anyhow::Result<(LoadSource, String)> {
    let source: LoadSource = source.parse()?;
    let table = table.unwrap_or_else(|| default_table_name(&source));
    load_table(reader, &source, &table)?;
    Ok((source, table))
}

fn default_table_name(source: &LoadSource) -> String {
    match source {
        LoadSource::Builtin(name) => naming::builtin_data_table(name),
        LoadSource::File(_) | LoadSource::Url(_) | LoadSource::Json(_) | LoadSource::Frame(_) => {
            "data".to_string()
        }
    }
}
