/// Numeric field of a record
#[derive(
    serde::Deserialize, serde::Serialize, clap::ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Hash,
)]
#[serde(rename_all = "lowercase")]
pub enum ChartField {
    Length,
    Width,
}

impl ChartField {
    /// Axis title used when the config does not give one
    pub fn label(&self) -> &'static str {
        match self {
            ChartField::Length => "Petal Length",
            ChartField::Width => "Petal Width",
        }
    }
}

impl std::fmt::Display for ChartField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ChartField::Length => write!(f, "length"),
            ChartField::Width => write!(f, "width"),
        }
    }
}

/// Output document kind
#[derive(clap::ValueEnum, Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Format {
    #[default]
    Svg,
    Html,
}

impl Format {
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Html => "html",
        }
    }
}

/// Struct to filter out groups
#[derive(Debug, Default)]
pub struct Selector {
    group_exclude: Option<regex::Regex>,
    group_include: Option<regex::Regex>,
}

impl Selector {
    pub fn filter_group(&self, group: &str) -> bool {
        match (&self.group_exclude, &self.group_include) {
            (None, None) => true,
            (Some(ex), None) => !ex.is_match(group),
            (None, Some(in_)) => in_.is_match(group),
            (Some(ex), Some(in_)) => !ex.is_match(group) && in_.is_match(group),
        }
    }
}

#[derive(Default)]
pub struct SelectorBuilder {
    selector: Selector,
}

impl SelectorBuilder {
    pub fn new() -> Self {
        SelectorBuilder {
            selector: Selector::default(),
        }
    }

    pub fn group_exclude(mut self, re: regex::Regex) -> Self {
        self.selector.group_exclude = Some(re);
        self
    }

    pub fn group_include(mut self, re: regex::Regex) -> Self {
        self.selector.group_include = Some(re);
        self
    }

    pub fn build(self) -> Selector {
        self.selector
    }
}
