//! Small dependency-free charts: horizontal bars and an SVG pie.

use std::f64::consts::PI;

use dioxus::prelude::*;

use crate::{domain::ChartPoint, ui::theme};

const PIE_CENTER: f64 = 50.0;
const PIE_RADIUS: f64 = 45.0;

#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percent: f64,
    pub color: &'static str,
    /// SVG path data. `None` when the slice is the whole disc.
    pub path: Option<String>,
}

/// Lays the points out clockwise from twelve o'clock. Zero counts are skipped.
pub fn pie_slices(points: &[ChartPoint]) -> Vec<PieSlice> {
    let total: usize = points.iter().map(|p| p.count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut start = -PI / 2.0;
    points
        .iter()
        .enumerate()
        .filter(|(_, point)| point.count > 0)
        .map(|(index, point)| {
            let fraction = point.count as f64 / total as f64;
            let sweep = fraction * 2.0 * PI;
            let path = (point.count < total).then(|| arc_path(start, start + sweep));
            start += sweep;
            PieSlice {
                label: point.label.clone(),
                count: point.count,
                percent: fraction * 100.0,
                color: theme::category_color(&point.label, index),
                path,
            }
        })
        .collect()
}

fn arc_path(from: f64, to: f64) -> String {
    let (x0, y0) = polar(from);
    let (x1, y1) = polar(to);
    let large_arc = u8::from(to - from > PI);
    format!(
        "M {PIE_CENTER} {PIE_CENTER} L {x0:.3} {y0:.3} A {PIE_RADIUS} {PIE_RADIUS} 0 {large_arc} 1 {x1:.3} {y1:.3} Z"
    )
}

fn polar(angle: f64) -> (f64, f64) {
    (
        PIE_CENTER + PIE_RADIUS * angle.cos(),
        PIE_CENTER + PIE_RADIUS * angle.sin(),
    )
}

/// Bar lengths relative to the largest value, in percent.
pub fn bar_widths(points: &[ChartPoint]) -> Vec<f64> {
    let max = points.iter().map(|p| p.count).max().unwrap_or(0);
    points
        .iter()
        .map(|p| {
            if max == 0 {
                0.0
            } else {
                p.count as f64 / max as f64 * 100.0
            }
        })
        .collect()
}

#[component]
pub fn BarChart(
    title: String,
    points: Vec<ChartPoint>,
    #[props(default = "No data available".to_string())] empty_message: String,
    footnote: Option<String>,
) -> Element {
    let widths = bar_widths(&points);
    let has_data = points.iter().any(|p| p.count > 0);
    let bars: Vec<(usize, ChartPoint, f64)> = points
        .into_iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (point, width))| (index, point, width))
        .collect();

    rsx! {
        div {
            class: "{theme::panel()} chart",
            h3 { class: "chart__title", "{title}" }
            if has_data {
                ul {
                    class: "bar-chart",
                    for (index, point, width) in bars {
                        li {
                            key: "{point.label}",
                            class: "bar-chart__row",
                            span { class: "bar-chart__label", title: "{point.label}", "{point.label}" }
                            span {
                                class: "bar-chart__track",
                                span {
                                    class: "bar-chart__bar",
                                    style: "width: {width:.1}%; background: {theme::palette_color(index)}",
                                }
                            }
                            span { class: "bar-chart__count", "{point.count}" }
                        }
                    }
                }
            } else {
                p { class: "chart__empty", "{empty_message}" }
            }
            if let Some(note) = footnote {
                p { class: "chart__footnote", "{note}" }
            }
        }
    }
}

#[component]
pub fn PieChart(
    title: String,
    points: Vec<ChartPoint>,
    #[props(default = "No data available".to_string())] empty_message: String,
) -> Element {
    let slices = pie_slices(&points);

    rsx! {
        div {
            class: "{theme::panel()} chart",
            h3 { class: "chart__title", "{title}" }
            if slices.is_empty() {
                p { class: "chart__empty", "{empty_message}" }
            } else {
                div {
                    class: "pie-chart",
                    svg {
                        class: "pie-chart__disc",
                        view_box: "0 0 100 100",
                        for slice in slices.iter() {
                            if let Some(outline) = slice.path.clone() {
                                path {
                                    key: "{slice.label}",
                                    d: "{outline}",
                                    fill: "{slice.color}",
                                    title { "{slice.label}: {slice.count}" }
                                }
                            } else {
                                circle {
                                    key: "{slice.label}",
                                    cx: "{PIE_CENTER}",
                                    cy: "{PIE_CENTER}",
                                    r: "{PIE_RADIUS}",
                                    fill: "{slice.color}",
                                }
                            }
                        }
                    }
                    ul {
                        class: "pie-chart__legend",
                        for slice in slices.iter() {
                            li {
                                key: "{slice.label}",
                                span { class: "legend-swatch", style: "background: {slice.color}" }
                                "{slice.label} ({slice.count}, {slice.percent:.0}%)"
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(label: &str, count: usize) -> ChartPoint {
        ChartPoint {
            label: label.into(),
            count,
        }
    }

    #[test]
    fn slices_cover_the_whole_disc() {
        let slices = pie_slices(&[point("OPEN", 3), point("CLOSED", 1), point("IN PROGRESS", 0)]);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].percent - 75.0).abs() < 1e-9);
        assert!((slices.iter().map(|s| s.percent).sum::<f64>() - 100.0).abs() < 1e-9);
        assert_eq!(slices[0].color, "#FF8042");
        // 75% needs the large-arc flag, 25% does not.
        assert!(slices[0].path.as_deref().is_some_and(|p| p.contains(" 0 1 1 ")));
        assert!(slices[1].path.as_deref().is_some_and(|p| p.contains(" 0 0 1 ")));
    }

    #[test]
    fn single_category_is_a_full_circle() {
        let slices = pie_slices(&[point("High", 4)]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].path, None);
    }

    #[test]
    fn empty_input_has_no_slices() {
        assert!(pie_slices(&[]).is_empty());
        assert!(pie_slices(&[point("Low", 0)]).is_empty());
    }

    #[test]
    fn bars_scale_to_largest() {
        assert_eq!(bar_widths(&[point("Gladstone", 4), point("Newcastle", 2)]), vec![100.0, 50.0]);
        assert_eq!(bar_widths(&[point("Gladstone", 0)]), vec![0.0]);
    }
}
