use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::{MacdSignal, Sentiment, Severity, TrendDirection};

/// Style for a composite score badge: green above 85, amber above 75,
/// gray otherwise (the thresholds the report cards use).
pub fn score_style(score: i32) -> Style {
    let color = if score > 85 {
        Color::Green
    } else if score > 75 {
        Color::Yellow
    } else {
        Color::Gray
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Style a change percentage green/red by sign.
pub fn change_style(change: f64) -> Style {
    if change >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Info => Color::Green,
        Severity::Warning => Color::Yellow,
        Severity::Critical => Color::Red,
    }
}

pub fn sentiment_label(sentiment: Sentiment) -> (&'static str, Color) {
    match sentiment {
        Sentiment::Positive => ("Positive", Color::Green),
        Sentiment::Neutral => ("Neutral", Color::Gray),
        Sentiment::Negative => ("Negative", Color::Red),
    }
}

pub fn macd_label(macd: MacdSignal) -> &'static str {
    match macd {
        MacdSignal::Bullish => "Bullish",
        MacdSignal::Bearish => "Bearish",
        MacdSignal::Flat => "Flat",
    }
}

pub fn trend_label(trend: TrendDirection) -> &'static str {
    match trend {
        TrendDirection::Up => "Up",
        TrendDirection::Down => "Down",
        TrendDirection::Sideways => "Sideways",
    }
}

/// Vertical tab bar / content / status bar split shared by every view.
pub struct AppLayout {
    pub tab_bar: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tab bar
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        Self {
            tab_bar: chunks[0],
            content: chunks[1],
            status_bar: chunks[2],
        }
    }
}

/// Render a labelled key/value line, e.g. "P/E Ratio: 4.5x".
pub fn kv_line<'a>(label: &'a str, value: String, value_color: Color) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{}: ", label), Style::default().fg(Color::Yellow)),
        Span::styled(value, Style::default().fg(value_color)),
    ])
}

/// Render a bordered paragraph with a title; the workhorse panel widget.
pub fn panel(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>) {
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_style_thresholds() {
        assert_eq!(score_style(90).fg, Some(Color::Green));
        assert_eq!(score_style(80).fg, Some(Color::Yellow));
        assert_eq!(score_style(75).fg, Some(Color::Gray));
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(Severity::Critical), Color::Red);
        assert_eq!(severity_color(Severity::Info), Color::Green);
    }
}
