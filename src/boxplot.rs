use std::io::Write;

use crate::scale::*;
use crate::stat::*;
use crate::svg;
use crate::*;

use cli_table::{format::Justify, Cell, Style, Table};

/// One row of the box plot summary
#[derive(serde::Serialize, Clone, PartialEq, Debug)]
pub struct BoxSummary {
    pub group: String,
    pub count: usize,
    #[serde(flatten)]
    pub quartiles: QuartileSummary,
    pub whiskers: Whiskers,
    pub outliers: Vec<f64>,
}

/// A box per group, with the boxes laid out on a band scale
pub struct BoxPlotView {
    groups: Vec<Group>,
    layout: Layout,
    config: BoxPlotConfig,
    y_label: String,
    x: BandScale,
    y: LinearScale,
    colors: OrdinalScale,
}

impl BoxPlotView {
    pub fn new(records: &[Record], config: &ChartConfig) -> ChartResult<Self> {
        let field = config.boxplot.field;
        let layout = config.layout;
        let groups = aggregate(records, field);

        let x = BandScale::new(
            groups.iter().map(|g| g.key.clone()).collect(),
            (0.0, layout.inner_width()),
            config.boxplot.padding,
        )?;
        let y = LinearScale::new(
            (0.0, float_max(records.iter().map(|r| r.field(field))) + 1.0),
            (layout.inner_height(), 0.0),
        )
        .nice(DEFAULT_TICK_COUNT);

        let mut colors = OrdinalScale::new(config.palette.clone());
        for group in &groups {
            colors.color(&group.key);
        }

        let y_label = config
            .boxplot
            .y_label
            .clone()
            .unwrap_or_else(|| field.label().to_string());

        Ok(BoxPlotView {
            groups,
            layout,
            config: config.boxplot.clone(),
            y_label,
            x,
            y,
            colors,
        })
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn x_scale(&self) -> &BandScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    fn whiskers(&self, group: &Group) -> Whiskers {
        group.whiskers(
            self.config.whisker_factor,
            self.config.clip_to_observed_range,
        )
    }

    fn fill(&self, group: &Group) -> &str {
        match &self.config.box_fill {
            Some(fill) => fill.as_str(),
            None => self.colors.get(&group.key).unwrap_or(DEFAULT_BOX_FILL),
        }
    }

    /// Per group quartiles, whiskers and (when clipping) outliers
    pub fn summaries(&self) -> Vec<BoxSummary> {
        self.groups
            .iter()
            .map(|group| {
                let whiskers = self.whiskers(group);
                let outliers = if self.config.clip_to_observed_range {
                    group.outliers(whiskers).collect()
                } else {
                    Vec::new()
                };
                BoxSummary {
                    group: group.key.clone(),
                    count: group.values.len(),
                    quartiles: group.summary,
                    whiskers,
                    outliers,
                }
            })
            .collect()
    }
}

impl ChartView for BoxPlotView {
    fn container_id(&self) -> &'static str {
        "boxplot"
    }

    fn mark_count(&self) -> usize {
        self.groups.len()
    }

    fn svg<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        svg::open_document(writer, &self.layout)?;
        svg::axis_bottom_band(
            writer,
            &self.x,
            self.layout.inner_height(),
            &self.config.x_label,
        )?;
        svg::axis_left_linear(writer, &self.y, &self.y_label)?;

        let width = self.x.bandwidth();
        for (group, summary) in self.groups.iter().zip(self.summaries()) {
            let x = self.x.map(&group.key).unwrap_or(f64::NAN);
            let center = x + width / 2.0;
            let q = summary.quartiles;

            svg::rect(
                writer,
                x,
                self.y.map(q.q3),
                width,
                self.y.map(q.q1) - self.y.map(q.q3),
                self.fill(group),
            )?;
            svg::line(
                writer,
                (x, self.y.map(q.median)),
                (x + width, self.y.map(q.median)),
                2.0,
            )?;
            svg::line(
                writer,
                (center, self.y.map(q.q3)),
                (center, self.y.map(summary.whiskers.upper)),
                1.0,
            )?;
            svg::line(
                writer,
                (center, self.y.map(q.q1)),
                (center, self.y.map(summary.whiskers.lower)),
                1.0,
            )?;
            for outlier in summary.outliers {
                svg::ring(
                    writer,
                    center,
                    self.y.map(outlier),
                    self.config.outlier_radius,
                )?;
            }
        }

        if self.config.legend {
            let entries = self
                .groups
                .iter()
                .map(|g| (g.key.as_str(), self.fill(g)))
                .collect::<Vec<_>>();
            svg::legend(writer, entries, self.layout.inner_width())?;
        }
        svg::close_document(writer)
    }

    fn table<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        let table = self
            .summaries()
            .into_iter()
            .map(|s| {
                vec![
                    s.group.cell().justify(Justify::Center).bold(true),
                    s.count.cell().justify(Justify::Right),
                    format!("{:.3}", s.quartiles.q1).cell().justify(Justify::Right),
                    format!("{:.3}", s.quartiles.median)
                        .cell()
                        .justify(Justify::Right),
                    format!("{:.3}", s.quartiles.q3).cell().justify(Justify::Right),
                    format!("{:.3}", s.quartiles.iqr).cell().justify(Justify::Right),
                    format!("{:.3}", s.whiskers.lower)
                        .cell()
                        .justify(Justify::Right),
                    format!("{:.3}", s.whiskers.upper)
                        .cell()
                        .justify(Justify::Right),
                    s.outliers.len().cell().justify(Justify::Right),
                ]
            })
            .collect::<Vec<_>>()
            .table()
            .title(vec![
                "Group".cell().justify(Justify::Center).bold(true),
                "#Values".cell().justify(Justify::Center).bold(true),
                "Q1".cell().justify(Justify::Center).bold(true),
                "Median".cell().justify(Justify::Center).bold(true),
                "Q3".cell().justify(Justify::Center).bold(true),
                "IQR".cell().justify(Justify::Center).bold(true),
                "Lower Whisker".cell().justify(Justify::Center).bold(true),
                "Upper Whisker".cell().justify(Justify::Center).bold(true),
                "#Outliers".cell().justify(Justify::Center).bold(true),
            ])
            .bold(true);

        let table_display = table
            .display()
            .map_err(|e| ChartError::io_err(e, "creating table display"))?;
        writeln!(writer, "{}", table_display)
            .map_err(|e| ChartError::io_err(e, "writing table display"))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn records() -> Vec<Record> {
        let mut records = Vec::new();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            records.push(Record::new(v, 0.1, "a"));
        }
        for v in [2.0, 2.5, 3.0, 3.5, 6.9] {
            records.push(Record::new(v, 0.2, "b"));
        }
        records
    }

    fn render(view: &BoxPlotView) -> String {
        let mut out = Vec::new();
        view.svg(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn y_domain_is_nice() {
        let view = BoxPlotView::new(&records(), &ChartConfig::default()).unwrap();
        // 6.9 + 1 rounds up to 8
        assert_eq!(view.y_scale().domain(), (0.0, 8.0));
        assert_eq!(view.y_scale().range(), (330.0, 0.0));
    }

    #[test]
    fn bands_follow_groups() {
        let view = BoxPlotView::new(&records(), &ChartConfig::default()).unwrap();
        assert_eq!(view.x_scale().keys(), &["a".to_string(), "b".to_string()][..]);
        assert_eq!(view.mark_count(), 2);
    }

    #[test]
    fn box_geometry() {
        let view = BoxPlotView::new(&records(), &ChartConfig::default()).unwrap();
        let text = render(&view);

        // 520 / (2 - 0.2 + 0.4) per band, first band after the outer padding
        let x = view.x_scale().map("a").unwrap();
        let width = view.x_scale().bandwidth();
        assert!((x - 0.2 * 520.0 / 2.2).abs() < 1e-9);
        assert!((width - 0.8 * 520.0 / 2.2).abs() < 1e-9);
        let y = |v: f64| view.y_scale().map(v);
        assert!((y(4.0) - 165.0).abs() < 1e-9);

        // group a: q1 = 2, median = 3, q3 = 4, iqr = 2
        assert!(text.contains(&format!(
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#69b3a2" stroke="black"/>"##,
            x,
            y(4.0),
            width,
            y(2.0) - y(4.0)
        )));
        assert!(text.contains(&format!(
            r#"<line x1="{}" x2="{}" y1="{}" y2="{}" stroke="black" stroke-width="2"/>"#,
            x,
            x + width,
            y(3.0),
            y(3.0)
        )));
        // whiskers reach 4 + 3 and 2 - 3 regardless of the data
        assert!(text.contains(&format!(
            r#"y1="{}" y2="{}" stroke="black" stroke-width="1"/>"#,
            y(4.0),
            y(7.0)
        )));
        assert!(text.contains(&format!(
            r#"y1="{}" y2="{}" stroke="black" stroke-width="1"/>"#,
            y(2.0),
            y(-1.0)
        )));
        assert_eq!(text.matches("<rect").count(), 2);
        assert_eq!(text.matches("<line x1").count(), 6);
        assert!(!text.contains("outlier"));
        assert!(!text.contains(r#"class="legend""#));
    }

    #[test]
    fn clipped_whiskers_draw_outliers() {
        let mut config = ChartConfig::default();
        config.boxplot.clip_to_observed_range = true;
        let view = BoxPlotView::new(&records(), &config).unwrap();

        let summaries = view.summaries();
        // group b: q1 = 2.5, q3 = 3.5, iqr = 1, so 6.9 is past 5
        assert_eq!(summaries[1].whiskers, Whiskers { lower: 2.0, upper: 3.5 });
        assert_eq!(summaries[1].outliers, vec![6.9]);
        assert!(summaries[0].outliers.is_empty());

        let text = render(&view);
        assert_eq!(text.matches(r#"class="outlier""#).count(), 1);
    }

    #[test]
    fn palette_fill_and_legend() {
        let mut config = ChartConfig::default();
        config.boxplot.box_fill = None;
        config.boxplot.legend = true;
        let view = BoxPlotView::new(&records(), &config).unwrap();
        let text = render(&view);
        assert!(text.contains(r##"fill="#1f77b4" stroke="black""##));
        assert!(text.contains(r##"fill="#ff7f0e" stroke="black""##));
        assert_eq!(text.matches(r#"class="legend""#).count(), 2);
    }

    #[test]
    fn width_field() {
        let mut config = ChartConfig::default();
        config.boxplot.field = ChartField::Width;
        let view = BoxPlotView::new(&records(), &config).unwrap();
        assert_eq!(view.groups()[0].values, vec![0.1; 5]);
        let text = render(&view);
        assert!(text.contains(">Petal Width</text>"));
    }

    #[test]
    fn value_axis_label() {
        let mut config = ChartConfig::default();
        config.scatter.x_label = "Length (cm)".to_string();
        let text = render(&BoxPlotView::new(&records(), &config).unwrap());
        assert!(text.contains(">Petal Length</text>"));
        assert!(!text.contains("Length (cm)"));

        config.boxplot.y_label = Some("Petal length (cm)".to_string());
        let text = render(&BoxPlotView::new(&records(), &config).unwrap());
        assert!(text.contains(">Petal length (cm)</text>"));
    }

    #[test]
    fn summary_serializes_flat() {
        let view = BoxPlotView::new(&records(), &ChartConfig::default()).unwrap();
        let json = serde_json::to_value(view.summaries()).unwrap();
        assert_eq!(json[0]["group"], "a");
        assert_eq!(json[0]["count"], 5);
        assert_eq!(json[0]["median"], 3.0);
        assert_eq!(json[0]["whiskers"]["upper"], 7.0);
    }
}
