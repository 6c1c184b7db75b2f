//! SVG rendering of profiles and centers.
//!
//! Produces a self-contained SVG document: one thin polyline per profile in
//! its cluster's color, plus one heavy polyline per center drawn over a
//! white underlay so centers stay readable on top of dense profile bundles.
//! The vertical range tracks the centers (with a 5% margin), not the
//! profiles, so outlier profiles clip instead of flattening the picture.

use crate::error::{Error, Result};
use crate::scale::ScalingMode;

/// Default line colors, cycled when there are more clusters than colors.
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Visual parameters for [`render_svg`].
#[derive(Debug, Clone)]
pub struct RenderStyle {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Unit shown on the vertical axis, wrapped by the scaling mode name.
    pub unit: String,
    /// Cluster colors, cycled by cluster index.
    pub palette: Vec<String>,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            width: 960,
            height: 600,
            unit: "RPKM".to_string(),
            palette: PALETTE.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl RenderStyle {
    fn color(&self, cluster: usize) -> &str {
        &self.palette[cluster % self.palette.len()]
    }

    fn y_label(&self, mode: ScalingMode) -> String {
        match mode {
            ScalingMode::Identity => self.unit.clone(),
            _ => format!("{}({})", mode.name().to_uppercase(), self.unit),
        }
    }
}

const MARGIN_LEFT: f32 = 70.0;
const MARGIN_RIGHT: f32 = 120.0;
const MARGIN_TOP: f32 = 40.0;
const MARGIN_BOTTOM: f32 = 110.0;

/// Renders scaled profiles and fitted centers as an SVG document.
///
/// `vectors` are the scaled profiles the fit ran on, `labels` their cluster
/// indices, and `mode` the scaling that produced them (it only affects the
/// axis caption).
pub fn render_svg(
    centers: &[Vec<f32>],
    labels: &[usize],
    vectors: &[Vec<f32>],
    axes: &[String],
    mode: ScalingMode,
    style: &RenderStyle,
) -> Result<String> {
    if centers.is_empty() || vectors.is_empty() || axes.is_empty() {
        return Err(Error::EmptyInput);
    }
    if labels.len() != vectors.len() {
        return Err(Error::InvalidParameter {
            name: "labels",
            message: "must have one entry per profile",
        });
    }
    if style.palette.is_empty() {
        return Err(Error::InvalidParameter {
            name: "palette",
            message: "must have at least one color",
        });
    }
    for v in centers.iter().chain(vectors) {
        if v.len() != axes.len() {
            return Err(Error::DimensionMismatch {
                expected: axes.len(),
                found: v.len(),
            });
        }
    }

    let width = style.width as f32;
    let height = style.height as f32;
    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;

    // Vertical range follows the centers, padded by 5% of their span.
    let mut lo = f32::INFINITY;
    let mut hi = f32::NEG_INFINITY;
    for v in centers.iter().flatten() {
        lo = lo.min(*v);
        hi = hi.max(*v);
    }
    let margin = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    let (lo, hi) = (lo - margin, hi + margin);

    let x_at = |axis: usize| {
        if axes.len() == 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + plot_w * axis as f32 / (axes.len() - 1) as f32
        }
    };
    let y_at = |value: f32| MARGIN_TOP + (1.0 - (value - lo) / (hi - lo)) * plot_h;
    let points = |v: &[f32]| {
        v.iter()
            .enumerate()
            .map(|(axis, &value)| format!("{:.2},{:.2}", x_at(axis), y_at(value)))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let mut svg = String::new();
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">\n",
        w = style.width,
        h = style.height
    ));
    svg.push_str(&format!(
        "  <rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
        style.width, style.height
    ));
    svg.push_str(&format!(
        "  <clipPath id=\"plot\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" \
         height=\"{:.2}\"/></clipPath>\n",
        MARGIN_LEFT, MARGIN_TOP, plot_w, plot_h
    ));
    svg.push_str(&format!(
        "  <text x=\"{:.2}\" y=\"22\" font-size=\"15\" text-anchor=\"middle\" \
         fill=\"#111111\">K-Means Clustering</text>\n",
        width / 2.0
    ));

    // Horizontal gridlines with value captions.
    for tick in 0..=4 {
        let value = lo + (hi - lo) * tick as f32 / 4.0;
        let y = y_at(value);
        svg.push_str(&format!(
            "  <line x1=\"{:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" \
             stroke=\"#dddddd\" stroke-width=\"1\"/>\n",
            MARGIN_LEFT,
            MARGIN_LEFT + plot_w
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"11\" text-anchor=\"end\" \
             fill=\"#333333\">{value:.2}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0
        ));
    }

    // Axis captions along the bottom, rotated to read upward.
    for (axis, label) in axes.iter().enumerate() {
        let x = x_at(axis);
        let y = MARGIN_TOP + plot_h + 10.0;
        svg.push_str(&format!(
            "  <text x=\"{x:.2}\" y=\"{y:.2}\" font-size=\"11\" text-anchor=\"end\" \
             fill=\"#333333\" transform=\"rotate(-90 {x:.2} {y:.2})\">{}</text>\n",
            xml_escape(label)
        ));
    }

    // Vertical axis caption.
    let label_y = MARGIN_TOP + plot_h / 2.0;
    svg.push_str(&format!(
        "  <text x=\"18\" y=\"{label_y:.2}\" font-size=\"12\" text-anchor=\"middle\" \
         fill=\"#333333\" transform=\"rotate(-90 18 {label_y:.2})\">{}</text>\n",
        xml_escape(&style.y_label(mode))
    ));

    svg.push_str("  <g clip-path=\"url(#plot)\">\n");
    for (vector, &label) in vectors.iter().zip(labels) {
        svg.push_str(&format!(
            "    <polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"0.6\" \
             opacity=\"0.6\"/>\n",
            points(vector),
            style.color(label)
        ));
    }
    for (cluster, center) in centers.iter().enumerate() {
        let path = points(center);
        svg.push_str(&format!(
            "    <polyline points=\"{path}\" fill=\"none\" stroke=\"white\" \
             stroke-width=\"4\"/>\n"
        ));
        svg.push_str(&format!(
            "    <polyline points=\"{path}\" fill=\"none\" stroke=\"{}\" \
             stroke-width=\"2\"/>\n",
            style.color(cluster)
        ));
    }
    svg.push_str("  </g>\n");

    // Legend, one entry per cluster.
    for cluster in 0..centers.len() {
        let x = MARGIN_LEFT + plot_w + 16.0;
        let y = MARGIN_TOP + 14.0 + cluster as f32 * 18.0;
        svg.push_str(&format!(
            "  <line x1=\"{x:.2}\" y1=\"{y:.2}\" x2=\"{:.2}\" y2=\"{y:.2}\" stroke=\"{}\" \
             stroke-width=\"2\"/>\n",
            x + 22.0,
            style.color(cluster)
        ));
        svg.push_str(&format!(
            "  <text x=\"{:.2}\" y=\"{:.2}\" font-size=\"11\" fill=\"#333333\">{cluster}</text>\n",
            x + 28.0,
            y + 4.0
        ));
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
