use super::centered_rect_lines;
use crate::app::App;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Error dialog shown after a failed load
pub fn render_error(f: &mut Frame, app: &App) {
    let Some(message) = &app.state.last_error else {
        return;
    };

    // Estimate wrapped lines at ~70 columns
    let estimated_lines: usize = message
        .lines()
        .map(|line| (line.chars().count() / 70).max(1))
        .sum();
    let height = (estimated_lines + 7).min(20) as u16;

    let area = centered_rect_lines(70, height, f.area());
    f.render_widget(Clear, area);

    let mut text = vec![
        Line::from(Span::styled(
            "<Load failed>",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    for line in message.lines() {
        text.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(Color::White),
        )));
    }
    text.push(Line::from(""));
    text.push(Line::from(vec![
        Span::styled(" OK ", Style::default().fg(Color::Black).bg(Color::Magenta)),
        Span::raw("    "),
        Span::styled("R", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::styled(" retry", Style::default().fg(Color::DarkGray)),
    ]));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}
