//! Scatter and box plots of grouped measurements, rendered as SVG.
//!
//! Each chart is a single pass: load the dataset, coerce the numeric
//! columns, optionally filter groups, build the scales and draw.

use std::path::{Path, PathBuf};

mod aggregate;
mod boxplot;
mod chart_view;
mod config;
mod dataset;
mod error;
mod model;
mod scatter;

pub mod scale;
pub mod stat;
pub mod svg;

pub use aggregate::*;
pub use boxplot::*;
pub use chart_view::*;
pub use config::*;
pub use dataset::*;
pub use error::*;
pub use model::*;
pub use scatter::*;

/// Load, coerce and filter the records of a dataset
///
/// A failed load is reported here, once, and nothing past the load runs.
pub fn load_records(
    path: &Path,
    config: &ChartConfig,
    selector: &Selector,
) -> ChartResult<Vec<Record>> {
    let dataset = match Dataset::load(path, &config.schema) {
        Ok(dataset) => dataset,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e);
        }
    };
    tracing::info!(records = dataset.len(), "loaded data from {:?}", path);
    if dataset.is_empty() {
        tracing::warn!("{:?} has a header but no records", path);
    }

    let records = dataset
        .coerce(config.coercion)
        .into_iter()
        .filter(|r| selector.filter_group(&r.group))
        .collect::<Vec<_>>();
    tracing::debug!(records = records.len(), "records after coercion and selection");

    Ok(records)
}

pub fn scatter_view(
    path: &Path,
    config: &ChartConfig,
    selector: &Selector,
) -> ChartResult<ScatterView> {
    let records = load_records(path, config, selector)?;
    Ok(ScatterView::new(records, config))
}

pub fn boxplot_view(
    path: &Path,
    config: &ChartConfig,
    selector: &Selector,
) -> ChartResult<BoxPlotView> {
    let records = load_records(path, config, selector)?;
    BoxPlotView::new(&records, config)
}

/// `PREFIX-<chart>.<ext>`, whatever dots `prefix` already has
pub fn chart_path(prefix: &Path, chart: &str, format: Format) -> PathBuf {
    let mut name = prefix.as_os_str().to_owned();
    name.push(format!("-{}.{}", chart, format.extension()));
    PathBuf::from(name)
}

/// Files written by [`plot_all`], `None` where the data failed to load
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlotAll {
    pub scatter: Option<PathBuf>,
    pub boxplot: Option<PathBuf>,
}

impl PlotAll {
    pub fn failed(&self) -> usize {
        [&self.scatter, &self.boxplot]
            .iter()
            .filter(|p| p.is_none())
            .count()
    }
}

/// Load failures are logged where they happen, so they only turn into a
/// missing chart here
pub fn reported<T>(result: ChartResult<T>) -> ChartResult<Option<T>> {
    match result {
        Ok(view) => Ok(Some(view)),
        Err(e) if e.is_load_failure() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Both charts next to `prefix`, each loading the data on its own
///
/// A chart that fails to load does not keep the other one from being drawn.
pub fn plot_all(
    data: &Path,
    prefix: &Path,
    format: Format,
    config: &ChartConfig,
    selector: &Selector,
) -> ChartResult<PlotAll> {
    let mut written = PlotAll::default();

    if let Some(view) = reported(scatter_view(data, config, selector))? {
        let path = chart_path(prefix, "scatter", format);
        view.write_to(&path, format)?;
        written.scatter = Some(path);
    }

    if let Some(view) = reported(boxplot_view(data, config, selector))? {
        let path = chart_path(prefix, "boxplot", format);
        view.write_to(&path, format)?;
        written.boxplot = Some(path);
    }

    Ok(written)
}
