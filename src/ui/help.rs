use super::centered_rect;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame) {
    let area = centered_rect(60, 70, f.area());

    f.render_widget(Clear, area);

    let help_text: Vec<Line<'static>> = vec![
        Line::from(""),
        create_section("Navigation"),
        create_key_line("j / ↓", "Move down"),
        create_key_line("k / ↑", "Move up"),
        create_key_line("gg / Home", "Go to top"),
        create_key_line("G / End", "Go to bottom"),
        create_key_line("PgUp / Ctrl+b", "Page up"),
        create_key_line("PgDn / Ctrl+f", "Page down"),
        Line::from(""),
        create_section("Rows"),
        create_key_line("Space", "Select / unselect row"),
        create_key_line("/", "Filter rows"),
        create_key_line("Esc", "Clear filter or selection"),
        create_key_line("R", "Reload artifact"),
        Line::from(""),
        create_section("General"),
        create_key_line("?", "Toggle help"),
        create_key_line("q / Ctrl+c", "Quit"),
    ];

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_text).block(block);

    f.render_widget(paragraph, area);
}

fn create_section(title: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        format!("  {} ", title),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

fn create_key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::raw("    "),
        Span::styled(
            format!("{:>15}", key),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}
