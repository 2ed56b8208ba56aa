use petalplot::{
    boxplot_view, plot_all, reported, scatter_view, BoxPlotView, ChartConfig, ChartError,
    ChartField, ChartResult, ChartView, Format, Selector, SelectorBuilder,
};

use clap::{Args, Parser, Subcommand};
use eyre::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_PATH: &str = "iris.csv";

#[derive(Parser)]
#[command(author, version, about, long_about)]
struct Cli {
    /// Config file to use instead of the discovered .petalplot-config
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GroupFilter {
    #[arg(long)]
    exclude_group_regex: Option<String>,

    #[arg(long)]
    include_group_regex: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Petal length against petal width, coloured by species
    Scatter {
        /// Path to the dataset
        #[arg(default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Output file, stdout if absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,

        #[command(flatten)]
        filter: GroupFilter,
    },
    /// Quartiles of one field per species
    Boxplot {
        /// Path to the dataset
        #[arg(default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        /// Output file, stdout if absent
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,

        #[arg(long, value_enum)]
        field: Option<ChartField>,

        /// Stop whiskers at the furthest observation and draw outliers
        #[arg(long)]
        clip: bool,

        #[command(flatten)]
        filter: GroupFilter,
    },
    /// Print the per-group box plot statistics
    Summary {
        /// Path to the dataset
        #[arg(default_value = DEFAULT_DATA_PATH)]
        data: PathBuf,

        #[arg(long, value_enum)]
        field: Option<ChartField>,

        #[arg(long)]
        clip: bool,

        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: GroupFilter,
    },
    /// Render both charts next to `prefix`
    All {
        /// Path to the dataset
        data: PathBuf,

        prefix: PathBuf,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,

        #[command(flatten)]
        filter: GroupFilter,
    },
}

fn get_config(path: Option<&Path>) -> Result<ChartConfig> {
    match path {
        Some(path) => ChartConfig::from_path(path).map_err(|e| e.into()),
        None => ChartConfig::discover().map_err(|e| e.into()),
    }
}

fn build_selector(filter: &GroupFilter) -> Result<Selector> {
    let mut builder = SelectorBuilder::new();
    if let Some(re) = &filter.exclude_group_regex {
        let re = regex::Regex::new(re).map_err(|e| eyre::eyre!("regex error: {:?}", e))?;
        builder = builder.group_exclude(re);
    }
    if let Some(re) = &filter.include_group_regex {
        let re = regex::Regex::new(re).map_err(|e| eyre::eyre!("regex error: {:?}", e))?;
        builder = builder.group_include(re);
    }
    Ok(builder.build())
}

fn boxplot_config(mut config: ChartConfig, field: Option<ChartField>, clip: bool) -> ChartConfig {
    if let Some(field) = field {
        config.boxplot.field = field;
    }
    if clip {
        config.boxplot.clip_to_observed_range = true;
    }
    config
}

/// Write a chart to `output`, or to stdout
fn emit(view: &impl ChartView, output: Option<&Path>, format: Format) -> ChartResult<()> {
    match output {
        Some(path) => view.write_to(path, format),
        None => {
            let mut stdout = std::io::stdout().lock();
            view.render(&mut stdout, format)?;
            stdout
                .flush()
                .map_err(|e| ChartError::io_err(e, "flushing stdout"))
        }
    }
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = get_config(cli.config.as_deref())?;

    match cli.command {
        Command::Scatter {
            data,
            output,
            format,
            filter,
        } => {
            let selector = build_selector(&filter)?;
            let Some(view) = reported(scatter_view(&data, &config, &selector))? else {
                return Ok(ExitCode::FAILURE);
            };
            emit(&view, output.as_deref(), format)?;
        }
        Command::Boxplot {
            data,
            output,
            format,
            field,
            clip,
            filter,
        } => {
            let selector = build_selector(&filter)?;
            let config = boxplot_config(config, field, clip);
            let Some(view) = reported(boxplot_view(&data, &config, &selector))? else {
                return Ok(ExitCode::FAILURE);
            };
            emit(&view, output.as_deref(), format)?;
        }
        Command::Summary {
            data,
            field,
            clip,
            json,
            filter,
        } => {
            let selector = build_selector(&filter)?;
            let config = boxplot_config(config, field, clip);
            let Some(view) = reported(boxplot_view(&data, &config, &selector))? else {
                return Ok(ExitCode::FAILURE);
            };
            summary(&view, json)?;
        }
        Command::All {
            data,
            prefix,
            format,
            filter,
        } => {
            let selector = build_selector(&filter)?;
            return all(&config, &data, &prefix, format, &selector);
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn summary(view: &BoxPlotView, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &view.summaries())?;
        writeln!(stdout)?;
    } else {
        view.table(&mut stdout)?;
    }
    Ok(())
}

/// Both charts next to `prefix`
fn all(
    config: &ChartConfig,
    data: &Path,
    prefix: &Path,
    format: Format,
    selector: &Selector,
) -> Result<ExitCode> {
    let written = plot_all(data, prefix, format, config, selector)?;
    if written.failed() > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
