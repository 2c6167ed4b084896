use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::Cell,
};
use std::collections::HashSet;

/// Build a table cell whose characters matching `query` use `match_style`
pub fn fuzzy_cell(
    text: &str,
    query: &str,
    matcher: &SkimMatcherV2,
    base_style: Style,
    match_style: Style,
) -> Cell<'static> {
    let matched: HashSet<usize> = match matcher.fuzzy_indices(text, query.trim()) {
        Some((_, indices)) if !query.trim().is_empty() => indices.into_iter().collect(),
        _ => return Cell::from(format!(" {}", text)).style(base_style),
    };

    Cell::from(Line::from(highlight_spans(text, &matched, base_style, match_style)))
}

/// Split `text` into runs of matched / unmatched characters
fn highlight_spans(
    text: &str,
    matched: &HashSet<usize>,
    base_style: Style,
    match_style: Style,
) -> Vec<Span<'static>> {
    let mut spans = vec![Span::styled(" ", base_style)];
    let mut run = String::new();
    let mut run_matched = false;

    for (idx, ch) in text.chars().enumerate() {
        let is_match = matched.contains(&idx);
        if is_match != run_matched && !run.is_empty() {
            let style = if run_matched { match_style } else { base_style };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_matched = is_match;
        run.push(ch);
    }

    if !run.is_empty() {
        let style = if run_matched { match_style } else { base_style };
        spans.push(Span::styled(run, style));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_highlight_spans_groups_runs() {
        let base = Style::default();
        let hit = Style::default().fg(Color::Green);
        let matched: HashSet<usize> = [0, 1, 4].into_iter().collect();

        let spans = highlight_spans("abcde", &matched, base, hit);
        let parts: Vec<(&str, bool)> = spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style == hit))
            .collect();

        assert_eq!(
            parts,
            vec![(" ", false), ("ab", true), ("cd", false), ("e", true)]
        );
    }

    #[test]
    fn test_highlight_spans_no_matches() {
        let spans = highlight_spans("xyz", &HashSet::new(), Style::default(), Style::default());
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content, "xyz");
    }
}
