//! SVG analytics charts.
//!
//! Charts are drawn with plotters' SVG backend, so no font stack is needed at
//! runtime: text goes into the document as `<text>` elements.

use std::{f64::consts::PI, str::FromStr};

use chrono::NaiveDateTime;
use plotters::{
    coord::{
        ranged1d::{IntoSegmentedCoord, SegmentValue},
        Shift,
    },
    drawing::DrawingAreaErrorKind,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    error::ExportError,
    query::{DailyCount, IssueCount},
    session::SessionContext,
    utils::{format_timestamp, DATE_FMT},
};

const WIDTH: u32 = 1000;
const HEIGHT: u32 = 600;
const FONT: &str = "sans-serif";

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type DrawResult = Result<(), DrawingAreaErrorKind<std::io::Error>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Daily,
    Issues,
    Pie,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Daily => "daily",
            ChartKind::Issues => "issues",
            ChartKind::Pie => "pie",
        }
    }
}

impl FromStr for ChartKind {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ChartKind::Daily),
            "issues" => Ok(ChartKind::Issues),
            "pie" => Ok(ChartKind::Pie),
            other => Err(ExportError::UnknownChart(other.to_string())),
        }
    }
}

/// Identifies whose analytics a chart shows and when it was drawn.
pub struct ChartTitle<'a> {
    pub session: &'a SessionContext,
    pub generated_at: NaiveDateTime,
}

impl ChartTitle<'_> {
    fn owner(&self) -> String {
        let session = self.session;
        format!(
            "Analytics for {} - {} - {}",
            session.technician_name,
            session.technician_expertise.as_deref().unwrap_or(""),
            session.technician_location.as_deref().unwrap_or(""),
        )
    }

    fn generated(&self) -> String {
        format!("Generated: {}", format_timestamp(&self.generated_at))
    }
}

pub fn daily_chart(title: &ChartTitle<'_>, daily: &[DailyCount]) -> Result<String, ExportError> {
    render(title, "Daily Appointments Trend", |area| {
        if daily.is_empty() {
            return no_data(area, "No data available for the selected period");
        }

        let days = daily.len() as i32;
        let labels: Vec<String> = daily
            .iter()
            .map(|row| row.date.format(DATE_FMT).to_string())
            .collect();
        let points: Vec<(SegmentValue<i32>, f64)> = daily
            .iter()
            .enumerate()
            .map(|(i, row)| (SegmentValue::CenterOf(i as i32), row.count as f64))
            .collect();
        let top = daily.iter().map(|row| row.count).max().unwrap_or(0) as f64 * 1.15 + 1.0;

        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d((0..days).into_segmented(), 0f64..top)?;

        let label_at = |value: &SegmentValue<i32>| match value {
            SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(daily.len() + 1)
            .x_label_formatter(&label_at)
            .x_desc("Date")
            .y_desc("Number of Appointments")
            .draw()?;

        chart.draw_series(LineSeries::new(points.iter().cloned(), BLUE.stroke_width(2)))?;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(point.clone(), 4, BLUE.filled())),
        )?;
        chart.draw_series(points.iter().map(|(x, y)| {
            EmptyElement::at((x.clone(), *y))
                + Text::new(
                    format!("{}", *y as i64),
                    (0, -18),
                    label_style(14, HPos::Center, VPos::Top),
                )
        }))?;
        Ok(())
    })
}

pub fn issue_bar_chart(title: &ChartTitle<'_>, issues: &[IssueCount]) -> Result<String, ExportError> {
    render(title, "Issue Types Distribution", |area| {
        if issues.is_empty() {
            return no_data(area, "No data available for issue types");
        }

        let rows = issues.len() as i32;
        // Most frequent issue on top.
        let row_of = |i: usize| rows - 1 - i as i32;
        let right = issues.iter().map(|row| row.count).max().unwrap_or(0) as f64 * 1.15 + 1.0;

        let mut chart = ChartBuilder::on(area)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..right, (0..rows).into_segmented())?;

        let label_at = |value: &SegmentValue<i32>| match value {
            SegmentValue::CenterOf(y) if (0..rows).contains(y) => {
                issues[(rows - 1 - y) as usize].intent.clone()
            }
            _ => String::new(),
        };
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(issues.len() + 1)
            .y_label_formatter(&label_at)
            .x_desc("Number of Appointments")
            .y_desc("Issue Type")
            .draw()?;

        chart.draw_series(issues.iter().enumerate().map(|(i, row)| {
            let y = row_of(i);
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(y)),
                    (row.count as f64, SegmentValue::Exact(y + 1)),
                ],
                Palette99::pick(i).filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))?;
        chart.draw_series(issues.iter().enumerate().map(|(i, row)| {
            EmptyElement::at((row.count as f64, SegmentValue::CenterOf(row_of(i))))
                + Text::new(
                    row.count.to_string(),
                    (4, 0),
                    label_style(14, HPos::Left, VPos::Center),
                )
        }))?;
        Ok(())
    })
}

pub fn issue_pie_chart(title: &ChartTitle<'_>, issues: &[IssueCount]) -> Result<String, ExportError> {
    render(title, "Issue Types Distribution (Pie Chart)", |area| {
        let total: i64 = issues.iter().map(|row| row.count).sum();
        if total <= 0 {
            return no_data(area, "No data available for issue types");
        }

        let (width, height) = area.dim_in_pixel();
        let radius = (f64::from(height.min(width)) / 2.0 - 30.0).max(10.0);
        let center = (radius as i32 + 60, height as i32 / 2);
        let at = |angle: f64, r: f64| {
            (
                center.0 + (r * angle.cos()).round() as i32,
                center.1 - (r * angle.sin()).round() as i32,
            )
        };

        // Counter-clockwise from twelve o'clock.
        let mut start = PI / 2.0;
        for (i, row) in issues.iter().enumerate() {
            let share = row.count as f64 / total as f64;
            let sweep = 2.0 * PI * share;
            let steps = ((share * 180.0).ceil() as usize).max(2);

            let mut outline = Vec::with_capacity(steps + 2);
            outline.push(center);
            outline.extend((0..=steps).map(|s| at(start + sweep * s as f64 / steps as f64, radius)));
            area.draw(&Polygon::new(outline, Palette99::pick(i).filled()))?;

            area.draw(&Text::new(
                format!("{:.1}%", share * 100.0),
                at(start + sweep / 2.0, radius * 0.65),
                label_style(13, HPos::Center, VPos::Center),
            ))?;
            start += sweep;
        }

        let legend_x = center.0 + radius as i32 + 60;
        for (i, row) in issues.iter().enumerate() {
            let y = 30 + i as i32 * 24;
            area.draw(&Rectangle::new(
                [(legend_x, y), (legend_x + 16, y + 16)],
                Palette99::pick(i).filled(),
            ))?;
            area.draw(&Text::new(
                row.intent.as_str(),
                (legend_x + 24, y + 8),
                label_style(14, HPos::Left, VPos::Center),
            ))?;
        }
        Ok(())
    })
}

fn render<F>(title: &ChartTitle<'_>, heading: &str, draw: F) -> Result<String, ExportError>
where
    F: FnOnce(&Area<'_>) -> DrawResult,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (WIDTH, HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;
        let body = root
            .titled(heading, (FONT, 24))
            .and_then(|area| area.titled(&title.owner(), (FONT, 16)))
            .and_then(|area| area.titled(&title.generated(), (FONT, 13)))
            .map_err(render_error)?;
        draw(&body).map_err(render_error)?;
        root.present().map_err(render_error)?;
    }
    Ok(svg)
}

fn no_data(area: &Area<'_>, message: &str) -> DrawResult {
    let (width, height) = area.dim_in_pixel();
    area.draw(&Text::new(
        message,
        (width as i32 / 2, height as i32 / 2),
        label_style(20, HPos::Center, VPos::Center),
    ))
}

fn label_style(size: u32, h: HPos, v: VPos) -> TextStyle<'static> {
    (FONT, size).into_font().color(&BLACK).pos(Pos::new(h, v))
}

fn render_error<E: std::fmt::Display>(err: E) -> ExportError {
    tracing::error!("chart rendering failed: {}", err);
    ExportError::Render(err.to_string())
}
