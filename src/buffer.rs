//! Buffer output: plain text and styled ratatui lines from a render pass.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::collections::HashMap;

use crate::render::Render;
use crate::view::Derived;

/// Highlight group name to terminal style.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    styles: HashMap<String, Style>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, group: impl Into<String>, style: Style) -> Self {
        self.styles.insert(group.into(), style);
        self
    }

    /// Unknown groups render unstyled.
    pub fn style(&self, group: &str) -> Style {
        self.styles.get(group).copied().unwrap_or_default()
    }

    /// Styles for the groups named by the default settings.
    pub fn terminal_default() -> Self {
        Self::new()
            .with("TreeFolder", Style::new().fg(Color::Blue).add_modifier(Modifier::BOLD))
            .with("TreeLink", Style::new().fg(Color::Cyan))
            .with("TreeOrphanLink", Style::new().fg(Color::Red))
            .with("TreeExecutable", Style::new().fg(Color::Green).add_modifier(Modifier::BOLD))
            .with("TreeOtherWritable", Style::new().fg(Color::Blue).bg(Color::Green))
            .with("TreeStickyWritable", Style::new().fg(Color::Black).bg(Color::Green))
            .with("TreeStickyDir", Style::new().fg(Color::White).bg(Color::Blue))
            .with("TreePipe", Style::new().fg(Color::Yellow))
            .with("TreeSocket", Style::new().fg(Color::Magenta))
            .with("TreeBlockDevice", Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .with("TreeCharDevice", Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .with("TreeQuickFix", Style::new().fg(Color::Red))
            .with("TreeVersionControl", Style::new().fg(Color::DarkGray))
    }
}

/// Lines joined with `\n`, without badges.
pub fn to_text(derived: &Derived<'_>) -> String {
    derived
        .rendered
        .iter()
        .map(|r| r.line.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lines with badges appended, space-separated.
pub fn to_text_with_badges(derived: &Derived<'_>) -> String {
    derived
        .rendered
        .iter()
        .map(|r| {
            let mut line = r.line.clone();
            for badge in &r.badges {
                line.push(' ');
                line.push_str(&badge.text);
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a render pass into styled ratatui `Line` objects.
pub fn to_lines(derived: &Derived<'_>, palette: &Palette) -> Vec<Line<'static>> {
    derived
        .rendered
        .iter()
        .map(|r| render_to_line(r, palette))
        .collect()
}

/// Split one line at its highlight byte offsets.
///
/// Spans that fall outside the line or off a char boundary are dropped
/// rather than panicking.
fn render_to_line(render: &Render, palette: &Palette) -> Line<'static> {
    let text = render.line.as_str();
    let mut spans = Vec::new();
    let mut cursor = 0;

    let mut highlights: Vec<_> = render.highlights.iter().collect();
    highlights.sort_by_key(|h| h.begin);

    for hl in highlights {
        if hl.begin < cursor {
            continue;
        }
        let (Some(gap), Some(body)) = (text.get(cursor..hl.begin), text.get(hl.begin..hl.end))
        else {
            continue;
        };
        if !gap.is_empty() {
            spans.push(Span::raw(gap.to_string()));
        }
        spans.push(Span::styled(body.to_string(), palette.style(&hl.group)));
        cursor = hl.end;
    }
    if let Some(rest) = text.get(cursor..) {
        if !rest.is_empty() {
            spans.push(Span::raw(rest.to_string()));
        }
    }

    for badge in &render.badges {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(badge.text.clone(), palette.style(&badge.group)));
    }

    Line::from(spans)
}

/// Extract plain text from a `Line`.
pub fn line_to_plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}
