use std::io::Write;

use crate::scale::*;
use crate::stat::*;
use crate::svg;
use crate::*;

use cli_table::{format::Justify, Cell, Style, Table};

/// Length against width, one coloured point per record
pub struct ScatterView {
    records: Vec<Record>,
    layout: Layout,
    config: ScatterConfig,
    x: LinearScale,
    y: LinearScale,
    colors: OrdinalScale,
}

impl ScatterView {
    pub fn new(records: Vec<Record>, config: &ChartConfig) -> Self {
        let layout = config.layout;

        // both axes start at zero, whatever the smallest value is
        let x = LinearScale::new(
            (0.0, float_max(records.iter().map(|r| r.length))),
            (0.0, layout.inner_width()),
        );
        let y = LinearScale::new(
            (0.0, float_max(records.iter().map(|r| r.width))),
            (layout.inner_height(), 0.0),
        );

        let mut colors = OrdinalScale::new(config.palette.clone());
        for record in &records {
            colors.color(&record.group);
        }

        ScatterView {
            records,
            layout,
            config: config.scatter.clone(),
            x,
            y,
            colors,
        }
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    /// Legend entries: group and colour, in first-seen order
    pub fn legend(&self) -> Vec<(&str, &str)> {
        self.colors
            .domain()
            .iter()
            .filter_map(|g| self.colors.get(g).map(|c| (g.as_str(), c)))
            .collect()
    }
}

impl ChartView for ScatterView {
    fn container_id(&self) -> &'static str {
        "scatterplot"
    }

    fn mark_count(&self) -> usize {
        self.records.len()
    }

    fn svg<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        svg::open_document(writer, &self.layout)?;
        svg::axis_bottom_linear(
            writer,
            &self.x,
            self.layout.inner_height(),
            &self.config.x_label,
        )?;
        svg::axis_left_linear(writer, &self.y, &self.config.y_label)?;

        for record in &self.records {
            let fill = self.colors.get(&record.group).unwrap_or("black");
            svg::circle(
                writer,
                self.x.map(record.length),
                self.y.map(record.width),
                self.config.radius,
                fill,
            )?;
        }

        svg::legend(writer, self.legend(), self.layout.inner_width())?;
        svg::close_document(writer)
    }

    fn table<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        let rows = self
            .colors
            .domain()
            .iter()
            .map(|group| {
                let members = self.records.iter().filter(|r| &r.group == group);
                let count = members.clone().count();
                let max_length = float_max(members.clone().map(|r| r.length));
                let max_width = float_max(members.map(|r| r.width));
                vec![
                    group.cell().justify(Justify::Center).bold(true),
                    count.cell().justify(Justify::Right),
                    format!("{:.3}", max_length).cell().justify(Justify::Right),
                    format!("{:.3}", max_width).cell().justify(Justify::Right),
                ]
            })
            .collect::<Vec<_>>();

        let table = rows
            .table()
            .title(vec![
                "Group".cell().justify(Justify::Center).bold(true),
                "#Points".cell().justify(Justify::Center).bold(true),
                format!("Max {}", self.config.x_label)
                    .cell()
                    .justify(Justify::Center)
                    .bold(true),
                format!("Max {}", self.config.y_label)
                    .cell()
                    .justify(Justify::Center)
                    .bold(true),
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
