//! Bar chart of keyword frequencies rendered as a standalone SVG document.

use crate::analysis::TermCount;
use std::fmt::Write;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 500;
const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 50;
const MARGIN_BOTTOM: u32 = 140;
const BAR_COLOR: &str = "#87ceeb";

/// Bars drawn when the caller does not ask for a specific count.
pub const DEFAULT_CHART_TOP_N: usize = 10;

pub const DEFAULT_TITLE: &str = "Frequência de Termos de PI e Contrafação";

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// One bar per term, in the order given. Labels are rotated 45 degrees under the axis.
pub fn render_svg(terms: &[TermCount], title: &str) -> String {
    let plot_w = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) as f64;
    let plot_h = (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) as f64;
    let base_y = (MARGIN_TOP as f64) + plot_h;
    let max = terms.iter().map(|t| t.count).max().unwrap_or(0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">"#
    );
    let _ = writeln!(svg, r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"<text x="{}" y="30" font-size="18" text-anchor="middle">{}</text>"#,
        WIDTH / 2,
        escape(title)
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{base_y}" x2="{}" y2="{base_y}" stroke="black"/>"#,
        WIDTH - MARGIN_RIGHT
    );
    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT}" y1="{MARGIN_TOP}" x2="{MARGIN_LEFT}" y2="{base_y}" stroke="black"/>"#
    );

    if terms.is_empty() || max == 0 {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-size="14" text-anchor="middle" fill="gray">no keywords found</text>"#,
            WIDTH / 2,
            MARGIN_TOP as f64 + plot_h / 2.0
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let slot = plot_w / terms.len() as f64;
    let bar_w = slot * 0.7;
    for (i, t) in terms.iter().enumerate() {
        let h = plot_h * t.count as f64 / max as f64;
        let x = MARGIN_LEFT as f64 + slot * i as f64 + (slot - bar_w) / 2.0;
        let y = base_y - h;
        let cx = x + bar_w / 2.0;
        let _ = writeln!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{BAR_COLOR}"><title>{}: {}</title></rect>"#,
            escape(&t.term),
            t.count
        );
        let _ = writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
            y - 4.0,
            t.count
        );
        let label_y = base_y + 14.0;
        let _ = writeln!(
            svg,
            r#"<text x="{cx:.1}" y="{label_y:.1}" font-size="12" text-anchor="end" transform="rotate(-45 {cx:.1} {label_y:.1})">{}</text>"#,
            escape(&t.term)
        );
    }
    svg.push_str("</svg>\n");
    svg
}
