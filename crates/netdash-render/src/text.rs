use crossterm::style::{style, Color, Stylize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOpts {
    /// No ANSI escapes.
    pub plain: bool,
    /// No glyphs outside ASCII.
    pub ascii_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub color: Option<Color>,
}

impl Span {
    pub fn raw(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn colored(text: impl Into<String>, color: Color) -> Self {
        Self {
            text: text.into(),
            color: Some(color),
        }
    }
}

pub type Line = Vec<Span>;

pub fn line(text: impl Into<String>) -> Line {
    vec![Span::raw(text)]
}

pub fn line_width(line: &[Span]) -> usize {
    line.iter().map(|span| span.text.chars().count()).sum()
}

/// Clips to `width` columns, then applies color unless plain.
pub fn finish(line: &[Span], width: usize, opts: &UiOpts) -> String {
    let mut out = String::new();
    let mut left = width;
    for span in line {
        if left == 0 {
            break;
        }
        let text: String = span.text.chars().take(left).collect();
        left -= text.chars().count();
        match span.color {
            Some(color) if !opts.plain => out.push_str(&style(text).with(color).to_string()),
            _ => out.push_str(&text),
        }
    }
    out
}

pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Left-aligns into exactly `width` columns.
pub fn fit(text: &str, width: usize) -> String {
    let clipped: String = text.chars().take(width).collect();
    let pad = width - clipped.chars().count();
    format!("{clipped}{}", " ".repeat(pad))
}
