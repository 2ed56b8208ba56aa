use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::*;

/// This trait represents a chart that can be drawn, tabulated, etc.
pub trait ChartView {
    /// Id of the element hosting the chart in an HTML page
    fn container_id(&self) -> &'static str;

    /// Number of data marks the chart draws
    fn mark_count(&self) -> usize;

    fn svg<W: Write>(&self, writer: &mut W) -> ChartResult<()>;
    fn table<W: Write>(&self, writer: &mut W) -> ChartResult<()>;

    /// A minimal page with the chart inside its container
    fn html<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        writeln!(
            writer,
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{0}</title>\n</head>\n<body>\n<div id=\"{0}\">",
            self.container_id()
        )
        .map_err(|e| ChartError::io_err(e, "writing html"))?;
        self.svg(writer)?;
        writeln!(writer, "</div>\n</body>\n</html>")
            .map_err(|e| ChartError::io_err(e, "writing html"))
    }

    fn render<W: Write>(&self, writer: &mut W, format: Format) -> ChartResult<()> {
        match format {
            Format::Svg => self.svg(writer),
            Format::Html => self.html(writer),
        }
    }

    /// Render into `prefix` with the extension of `format`
    fn plot(&self, prefix: &Path, format: Format) -> ChartResult<PathBuf> {
        let mut path: PathBuf = prefix.into();
        if !path.set_extension(format.extension()) {
            return Err(ChartError::PathCreateError(
                path,
                format.extension().to_string(),
            ));
        }

        self.write_to(&path, format)?;
        Ok(path)
    }

    /// Render into exactly `path`
    fn write_to(&self, path: &Path, format: Format) -> ChartResult<()> {
        let file = File::create(path)
            .map_err(|e| ChartError::io_err(e, format!("creating {}", path.to_string_lossy())))?;
        let mut writer = BufWriter::new(file);
        self.render(&mut writer, format)?;
        writer
            .flush()
            .map_err(|e| ChartError::io_err(e, format!("writing {}", path.to_string_lossy())))?;

        tracing::info!("wrote {}", path.to_string_lossy());
        Ok(())
    }
}
