use crate::text::{Line, Span};
use crossterm::style::Color;

pub struct ChartSeries<'a> {
    pub name: &'a str,
    pub glyph: char,
    pub color: Color,
    pub points: &'a [Option<f64>],
}

const AXIS_WIDTH: usize = 8;
const COLUMN_WIDTH: usize = 3;

/// Text line chart. One column per sample, shared y scale from zero to the
/// largest value; the first series wins where glyphs overlap.
pub fn line_chart(series: &[ChartSeries<'_>], x_labels: (&str, &str), height: usize) -> Vec<Line> {
    let height = height.max(2);
    let columns = series.iter().map(|s| s.points.len()).max().unwrap_or(0);
    let max = series
        .iter()
        .flat_map(|s| s.points.iter().flatten())
        .fold(0.0_f64, |acc, v| acc.max(*v))
        .max(1.0);

    let level = |value: f64| -> usize {
        let scaled = (value / max * (height - 1) as f64).round();
        (scaled.max(0.0) as usize).min(height - 1)
    };

    let mut lines = Vec::with_capacity(height + 1);
    for row in (0..height).rev() {
        let axis = if row == height - 1 {
            format!("{:>6.0} |", max)
        } else if row == 0 {
            format!("{:>6} |", 0)
        } else {
            format!("{:>6} |", "")
        };
        let mut line: Line = vec![Span::raw(axis)];

        for col in 0..columns {
            let hit = series.iter().find(|s| {
                s.points
                    .get(col)
                    .copied()
                    .flatten()
                    .map(|v| level(v) == row)
                    .unwrap_or(false)
            });
            match hit {
                Some(s) => line.push(Span::colored(format!(" {} ", s.glyph), s.color)),
                None => line.push(Span::raw(" ".repeat(COLUMN_WIDTH))),
            }
        }
        lines.push(line);
    }

    let span = columns * COLUMN_WIDTH;
    let (first, last) = x_labels;
    let gap = span
        .saturating_sub(first.chars().count() + last.chars().count())
        .max(1);
    let footer = if columns == 0 {
        format!("{:>w$}(no samples yet)", "", w = AXIS_WIDTH)
    } else if columns == 1 {
        format!("{:>w$}{first}", "", w = AXIS_WIDTH)
    } else {
        format!("{:>w$}{first}{}{last}", "", " ".repeat(gap), w = AXIS_WIDTH)
    };
    lines.push(vec![Span::raw(footer)]);
    lines
}

pub fn legend(series: &[ChartSeries<'_>]) -> Line {
    let mut line = Vec::new();
    for (idx, s) in series.iter().enumerate() {
        if idx > 0 {
            line.push(Span::raw("  "));
        }
        line.push(Span::colored(s.glyph.to_string(), s.color));
        line.push(Span::raw(format!(" {}", s.name)));
    }
    line
}

pub struct Bar<'a> {
    pub label: &'a str,
    pub value: f64,
    pub unit: &'a str,
    pub color: Color,
}

/// Horizontal bars scaled to the largest value.
pub fn bar_chart(bars: &[Bar<'_>], width: usize, ascii_only: bool) -> Vec<Line> {
    let fill = if ascii_only { "#" } else { "█" };
    let label_width = bars
        .iter()
        .map(|b| b.label.chars().count())
        .max()
        .unwrap_or(0);
    let max = bars.iter().fold(0.0_f64, |acc, b| acc.max(b.value)).max(1.0);

    bars.iter()
        .map(|bar| {
            let filled = ((bar.value / max) * width as f64).round() as usize;
            let filled = filled.min(width);
            vec![
                Span::raw(format!("{:<label_width$} |", bar.label)),
                Span::colored(fill.repeat(filled), bar.color),
                Span::raw(format!(
                    "{}| {:.2} {}",
                    " ".repeat(width - filled),
                    bar.value,
                    bar.unit
                )),
            ]
        })
        .collect()
}
