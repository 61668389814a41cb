//! Balance-over-time line chart.
//!
//! The renderer never owns a drawing target. Callers hand in a [`Surface`]
//! of known pixel size and get one polyline drawn on it.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    pub margin: f64,
    pub color: String,
    pub line_width: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            margin: 20.0,
            color: "#007bff".to_string(),
            line_width: 2.0,
        }
    }
}

/// A 2D drawing target with the origin in the top left corner.
pub trait Surface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    fn clear(&mut self);
    fn stroke_polyline(&mut self, points: &[Point], style: &ChartStyle);
}

/// Map a balance series onto surface coordinates.
///
/// Index spreads linearly from `margin` to `width - margin`. Values are
/// inverted so the maximum lands on `margin` and the minimum on
/// `height - margin`. A flat series uses a range of 1.
pub fn plot_points(data: &[i64], width: f64, height: f64, margin: f64) -> Vec<Point> {
    let (Some(&min), Some(&max)) = (data.iter().min(), data.iter().max()) else {
        return Vec::new();
    };
    let chart_width = width - margin * 2.0;
    let chart_height = height - margin * 2.0;
    let range = match (max - min) as f64 {
        r if r == 0.0 => 1.0,
        r => r,
    };
    let x_step = if data.len() > 1 {
        chart_width / (data.len() - 1) as f64
    } else {
        0.0
    };
    let y_scale = chart_height / range;

    data.iter()
        .enumerate()
        .map(|(i, &value)| Point {
            x: margin + i as f64 * x_step,
            y: margin + (max - value) as f64 * y_scale,
        })
        .collect()
}

/// Clear the surface and draw the balance trajectory on it.
pub fn render_balance_chart<S: Surface + ?Sized>(
    surface: &mut S,
    data: &[i64],
    style: &ChartStyle,
) {
    surface.clear();
    if data.is_empty() {
        return;
    }
    let points = plot_points(data, surface.width(), surface.height(), style.margin);
    surface.stroke_polyline(&points, style);
}

/// Escape text for use inside a double-quoted XML attribute.
fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Surface that records into an SVG document.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    width: u32,
    height: u32,
    elements: Vec<String>,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32) -> Self {
        SvgSurface {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn to_svg(&self) -> String {
        let (w, h) = (self.width, self.height);
        let mut out = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\">\n"
        );
        out.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        for element in &self.elements {
            out.push_str("  ");
            out.push_str(element);
            out.push('\n');
        }
        out.push_str("</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn height(&self) -> f64 {
        self.height as f64
    }

    fn clear(&mut self) {
        self.elements.clear();
    }

    fn stroke_polyline(&mut self, points: &[Point], style: &ChartStyle) {
        let mut coords = String::new();
        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                coords.push(' ');
            }
            let _ = write!(coords, "{:.2},{:.2}", p.x, p.y);
        }
        self.elements.push(format!(
            "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" \
             stroke-linejoin=\"round\"/>",
            coords,
            escape_attr(&style.color),
            style.line_width
        ));
    }
}
