//! SVG primitives and d3-style axes
//!
//! Everything is written straight to the output as text. Coordinates are
//! written as they come, NaN included.

use std::io::Write;

use crate::scale::*;
use crate::*;

const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
/// Crisp 1px lines land on half pixels
const OFFSET: f64 = 0.5;
const LEGEND_SWATCH: f64 = 18.0;
const LEGEND_PITCH: f64 = 20.0;
const AXIS_LABEL_OFFSET: f64 = 40.0;

fn svg_err(e: std::io::Error) -> ChartError {
    ChartError::io_err(e, "writing svg")
}

/// Escape text for use in element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Format tick values with as many decimals as the tick step needs
pub fn tick_format(ticks: &[f64]) -> impl Fn(f64) -> String {
    let step = match ticks {
        [a, b, ..] => (b - a).abs(),
        _ => 1.0,
    };
    let precision = if step > 0.0 && step.is_finite() {
        (-step.log10().floor()).max(0.0) as usize
    } else {
        0
    };
    move |v| format!("{:.*}", precision, v)
}

/// Opens the canvas and the plot group, shifted by the margins
pub fn open_document<W: Write>(writer: &mut W, layout: &Layout) -> ChartResult<()> {
    writeln!(
        writer,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}" height="{1}" viewBox="0 0 {0} {1}">"#,
        layout.width, layout.height
    )
    .map_err(svg_err)?;
    writeln!(
        writer,
        r#"<g transform="translate({},{})">"#,
        layout.margin_left, layout.margin_top
    )
    .map_err(svg_err)
}

pub fn close_document<W: Write>(writer: &mut W) -> ChartResult<()> {
    writeln!(writer, "</g>\n</svg>").map_err(svg_err)
}

pub fn circle<W: Write>(writer: &mut W, cx: f64, cy: f64, r: f64, fill: &str) -> ChartResult<()> {
    writeln!(
        writer,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        cx,
        cy,
        r,
        escape(fill)
    )
    .map_err(svg_err)
}

/// Unfilled circle, for outliers
pub fn ring<W: Write>(writer: &mut W, cx: f64, cy: f64, r: f64) -> ChartResult<()> {
    writeln!(
        writer,
        r#"<circle class="outlier" cx="{}" cy="{}" r="{}" fill="none" stroke="black"/>"#,
        cx, cy, r
    )
    .map_err(svg_err)
}

pub fn rect<W: Write>(
    writer: &mut W,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: &str,
) -> ChartResult<()> {
    writeln!(
        writer,
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="black"/>"#,
        x,
        y,
        width,
        height,
        escape(fill)
    )
    .map_err(svg_err)
}

pub fn line<W: Write>(
    writer: &mut W,
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    stroke_width: f64,
) -> ChartResult<()> {
    writeln!(
        writer,
        r#"<line x1="{}" x2="{}" y1="{}" y2="{}" stroke="black" stroke-width="{}"/>"#,
        x1, x2, y1, y2, stroke_width
    )
    .map_err(svg_err)
}

/// Horizontal axis along the bottom of the plot area
///
/// `ticks` are pairs of position and label.
fn axis_bottom<W: Write>(
    writer: &mut W,
    ticks: &[(f64, String)],
    range: (f64, f64),
    inner_height: f64,
    label: &str,
) -> ChartResult<()> {
    writeln!(
        writer,
        r#"<g class="axis axis-bottom" transform="translate(0,{})" fill="none" font-size="10" font-family="sans-serif" text-anchor="middle">"#,
        inner_height
    )
    .map_err(svg_err)?;
    writeln!(
        writer,
        r#"<path class="domain" stroke="currentColor" d="M{0},{2}V{3}H{1}V{2}"/>"#,
        range.0 + OFFSET,
        range.1 + OFFSET,
        TICK_SIZE,
        OFFSET
    )
    .map_err(svg_err)?;
    for (x, text) in ticks {
        writeln!(
            writer,
            r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="{}"/><text fill="currentColor" y="{}" dy="0.71em">{}</text></g>"#,
            x + OFFSET,
            TICK_SIZE,
            TICK_SIZE + TICK_PADDING,
            escape(text)
        )
        .map_err(svg_err)?;
    }
    writeln!(
        writer,
        r#"<text class="label" x="{}" y="{}" fill="black">{}</text>"#,
        (range.0 + range.1) / 2.0,
        AXIS_LABEL_OFFSET,
        escape(label)
    )
    .map_err(svg_err)?;
    writeln!(writer, "</g>").map_err(svg_err)
}

pub fn axis_bottom_linear<W: Write>(
    writer: &mut W,
    scale: &LinearScale,
    inner_height: f64,
    label: &str,
) -> ChartResult<()> {
    let values = scale.ticks(DEFAULT_TICK_COUNT);
    let format = tick_format(&values);
    let ticks = values
        .iter()
        .map(|v| (scale.map(*v), format(*v)))
        .collect::<Vec<_>>();
    let (r0, r1) = scale.range();
    axis_bottom(writer, &ticks, (r0.min(r1), r0.max(r1)), inner_height, label)
}

/// Band axis: one tick in the middle of each band
pub fn axis_bottom_band<W: Write>(
    writer: &mut W,
    scale: &BandScale,
    inner_height: f64,
    label: &str,
) -> ChartResult<()> {
    let ticks = scale
        .keys()
        .iter()
        .filter_map(|k| scale.map(k).map(|x| (x + scale.bandwidth() / 2.0, k.clone())))
        .collect::<Vec<_>>();
    let (r0, r1) = scale.range();
    axis_bottom(writer, &ticks, (r0.min(r1), r0.max(r1)), inner_height, label)
}

/// Vertical axis along the left of the plot area
pub fn axis_left_linear<W: Write>(
    writer: &mut W,
    scale: &LinearScale,
    label: &str,
) -> ChartResult<()> {
    let values = scale.ticks(DEFAULT_TICK_COUNT);
    let format = tick_format(&values);
    let (r0, r1) = scale.range();
    let (top, bottom) = (r0.min(r1), r0.max(r1));

    writeln!(
        writer,
        r#"<g class="axis axis-left" fill="none" font-size="10" font-family="sans-serif" text-anchor="end">"#
    )
    .map_err(svg_err)?;
    writeln!(
        writer,
        r#"<path class="domain" stroke="currentColor" d="M-{0},{1}H{2}V{3}H-{0}"/>"#,
        TICK_SIZE,
        bottom + OFFSET,
        OFFSET,
        top + OFFSET
    )
    .map_err(svg_err)?;
    for v in values {
        writeln!(
            writer,
            r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-{}"/><text fill="currentColor" x="-{}" dy="0.32em">{}</text></g>"#,
            scale.map(v) + OFFSET,
            TICK_SIZE,
            TICK_SIZE + TICK_PADDING,
            format(v)
        )
        .map_err(svg_err)?;
    }
    writeln!(
        writer,
        r#"<text class="label" transform="rotate(-90)" x="{}" y="-{}" fill="black" text-anchor="middle">{}</text>"#,
        -(top + bottom) / 2.0,
        AXIS_LABEL_OFFSET,
        escape(label)
    )
    .map_err(svg_err)?;
    writeln!(writer, "</g>").map_err(svg_err)
}

/// Colour swatches with their labels, stacked in the top right corner
pub fn legend<'a, W: Write>(
    writer: &mut W,
    entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    inner_width: f64,
) -> ChartResult<()> {
    for (i, (label, color)) in entries.into_iter().enumerate() {
        writeln!(
            writer,
            r#"<g class="legend" transform="translate(0,{})">"#,
            i as f64 * LEGEND_PITCH
        )
        .map_err(svg_err)?;
        writeln!(
            writer,
            r#"<rect x="{}" width="{2}" height="{2}" fill="{}"/>"#,
            inner_width - LEGEND_SWATCH,
            escape(color),
            LEGEND_SWATCH
        )
        .map_err(svg_err)?;
        writeln!(
            writer,
            r#"<text x="{}" y="{}" dy=".35em" style="text-anchor: end">{}</text>"#,
            inner_width - LEGEND_SWATCH - 6.0,
            LEGEND_SWATCH / 2.0,
            escape(label)
        )
        .map_err(svg_err)?;
        writeln!(writer, "</g>").map_err(svg_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(f: impl FnOnce(&mut Vec<u8>) -> ChartResult<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escape_markup() {
        assert_eq!(escape("a<b & \"c\""), "a&lt;b &amp; &quot;c&quot;");
        assert_eq!(escape("setosa"), "setosa");
    }

    #[test]
    fn tick_format_precision() {
        assert_eq!(tick_format(&[0.0, 1.0])(3.0), "3");
        assert_eq!(tick_format(&[0.0, 0.5])(1.0), "1.0");
        assert_eq!(tick_format(&[0.0, 0.2])(0.4), "0.4");
        assert_eq!(tick_format(&[0.0, 20.0])(40.0), "40");
        assert_eq!(tick_format(&[7.0])(7.0), "7");
    }

    #[test]
    fn document_uses_layout() {
        let text = render(|w| {
            open_document(w, &Layout::default())?;
            close_document(w)
        });
        assert!(text.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="600" height="400""#));
        assert!(text.contains(r#"<g transform="translate(50,20)">"#));
        assert!(text.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn bottom_axis_ticks() {
        let scale = LinearScale::new((0.0, 5.0), (0.0, 500.0));
        let text = render(|w| axis_bottom_linear(w, &scale, 330.0, "Petal Length"));
        assert!(text.contains(r#"transform="translate(0,330)""#));
        assert_eq!(text.matches(r#"class="tick""#).count(), 11);
        assert!(text.contains(r#"<g class="tick" transform="translate(100.5,0)">"#));
        assert!(text.contains(">1.0</text>"));
        assert!(text.contains(">Petal Length</text>"));
    }

    #[test]
    fn left_axis_is_inverted() {
        let scale = LinearScale::new((0.0, 2.0), (300.0, 0.0));
        let text = render(|w| axis_left_linear(w, &scale, "Petal Width"));
        assert!(text.contains(r#"<g class="tick" transform="translate(0,300.5)">"#));
        assert!(text.contains(r#"<g class="tick" transform="translate(0,0.5)">"#));
        assert!(text.contains(r#"transform="rotate(-90)" x="-150""#));
    }

    #[test]
    fn band_axis_centers_labels() {
        let scale = BandScale::with_padding(
            vec!["a".to_string(), "b".to_string()],
            (0.0, 200.0),
            0.0,
            0.0,
        )
        .unwrap();
        let text = render(|w| axis_bottom_band(w, &scale, 100.0, "Species"));
        assert!(text.contains(r#"translate(50.5,0)"#));
        assert!(text.contains(r#"translate(150.5,0)"#));
        assert!(text.contains(">b</text>"));
    }

    #[test]
    fn legend_rows() {
        let text = render(|w| legend(w, [("setosa", "#1f77b4"), ("versicolor", "#ff7f0e")], 520.0));
        assert_eq!(text.matches(r#"class="legend""#).count(), 2);
        assert!(text.contains(r#"translate(0,20)"#));
        assert!(text.contains(r##"<rect x="502" width="18" height="18" fill="#ff7f0e"/>"##));
        assert!(text.contains(r#"<text x="496" y="9""#));
    }
}
