use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::*;

pub(crate) const PETALPLOT_CONFIG_FILENAME: &str = ".petalplot-config";

/// d3's schemeCategory10
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

pub const DEFAULT_BOX_FILL: &str = "#69b3a2";

/// Canvas size and margins
///
/// `width` and `height` are the full canvas; the plot area is what is left
/// after the margins are taken out.
#[derive(serde::Deserialize, Clone, Copy, PartialEq, Debug)]
#[serde(default)]
pub struct Layout {
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            margin_top: 20.0,
            margin_right: 30.0,
            margin_bottom: 50.0,
            margin_left: 50.0,
            width: 600.0,
            height: 400.0,
        }
    }
}

impl Layout {
    /// Width of the plot area
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    /// Height of the plot area
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }
}

/// Which columns of the source file carry the fields we plot
#[derive(serde::Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(default)]
pub struct Schema {
    pub length_column: String,
    pub width_column: String,
    pub group_column: String,
    pub delimiter: char,
}

impl Default for Schema {
    fn default() -> Self {
        Schema {
            length_column: "petal_length".to_string(),
            width_column: "petal_width".to_string(),
            group_column: "species".to_string(),
            delimiter: ',',
        }
    }
}

impl Schema {
    /// The delimiter as the byte the reader splits on
    pub fn delimiter_byte(&self) -> ChartResult<u8> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ChartError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// What to do with rows whose numeric fields fail to parse
#[derive(serde::Deserialize, Clone, Copy, PartialEq, Eq, Debug, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Failed fields become NaN and are plotted anyway
    Passthrough,
    /// Rows with failed fields are dropped
    #[default]
    Skip,
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct ScatterConfig {
    pub radius: f64,
    pub x_label: String,
    pub y_label: String,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        ScatterConfig {
            radius: 5.0,
            x_label: ChartField::Length.label().to_string(),
            y_label: ChartField::Width.label().to_string(),
        }
    }
}

#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct BoxPlotConfig {
    pub field: ChartField,
    pub padding: f64,
    pub whisker_factor: f64,
    pub clip_to_observed_range: bool,
    /// Uniform box colour, palette colours per group when unset
    pub box_fill: Option<String>,
    pub legend: bool,
    pub outlier_radius: f64,
    pub x_label: String,
    /// Title of the value axis, the label of `field` when unset
    pub y_label: Option<String>,
}

impl Default for BoxPlotConfig {
    fn default() -> Self {
        BoxPlotConfig {
            field: ChartField::Length,
            padding: 0.2,
            whisker_factor: 1.5,
            clip_to_observed_range: false,
            box_fill: Some(DEFAULT_BOX_FILL.to_string()),
            legend: false,
            outlier_radius: 3.0,
            x_label: "Species".to_string(),
            y_label: None,
        }
    }
}

/// The whole configuration, as read from the config file
///
/// Every key is optional.
#[derive(serde::Deserialize, Clone, PartialEq, Debug)]
#[serde(default)]
pub struct ChartConfig {
    pub layout: Layout,
    pub schema: Schema,
    pub coercion: CoercionPolicy,
    pub palette: Vec<String>,
    pub scatter: ScatterConfig,
    pub boxplot: BoxPlotConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            layout: Layout::default(),
            schema: Schema::default(),
            coercion: CoercionPolicy::default(),
            palette: CATEGORY10.iter().map(|c| c.to_string()).collect(),
            scatter: ScatterConfig::default(),
            boxplot: BoxPlotConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_path(path: &Path) -> ChartResult<Self> {
        let config_file = File::open(path)
            .map_err(|e| ChartError::io_err(e, format!("opening {:?}", path)))?;
        let reader = BufReader::new(config_file);
        let config: ChartConfig = serde_json::from_reader(reader)
            .map_err(|e| ChartError::Config(path.to_path_buf(), e))?;
        config.schema.delimiter_byte()?;

        Ok(config)
    }

    /// Look for a config file in the current directory and its parents,
    /// falling back to the defaults when there is none
    pub fn discover() -> ChartResult<Self> {
        match find_config_dir() {
            Ok(dir) => {
                let path = dir.join(PETALPLOT_CONFIG_FILENAME);
                tracing::debug!("using config file {:?}", path);
                Self::from_path(&path)
            }
            Err(ChartError::NotFound) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }
}

fn find_config_dir() -> ChartResult<PathBuf> {
    let mut dir: PathBuf = Path::new(".")
        .canonicalize()
        .map_err(|e| ChartError::io_err(e, "failed to canonicalize current dir name"))?;
    loop {
        let file = dir.join(PETALPLOT_CONFIG_FILENAME);
        if file.exists() {
            return Ok(dir);
        }

        if !dir.pop() {
            break;
        }
    }

    Err(ChartError::NotFound)
}
