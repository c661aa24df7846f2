mod grid;
mod list;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use lazy_pager::{Phase, PhaseKind, Surface, Trailer};

use crate::app::App;
use crate::config::LayoutKind;
use crate::demo_source::FetchError;

/// Header, status bar and the body's two border rows.
const CHROME_ROWS: u16 = 4;

/// Rows available to list or grid content in a terminal `height` rows tall.
pub fn body_rows(height: u16) -> usize {
    usize::from(height.saturating_sub(CHROME_ROWS))
}

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let phase = app.pager.phase();

    render_header(frame, app, &phase, chunks[0]);
    render_body(frame, app, &phase, chunks[1]);
    render_status_bar(frame, app, &phase, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, phase: &Phase<u32, String, FetchError>, area: Rect) {
    let page = phase
        .requested_key()
        .map(|page| format!("page {}", page))
        .unwrap_or_else(|| "no page yet".to_string());
    let layout = match app.view.layout {
        LayoutKind::List => "list",
        LayoutKind::Grid => "grid",
    };
    let title = format!(
        "lazy-pager - {} | {} items | {}",
        page,
        phase.item_count().unwrap_or(0),
        layout
    );

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, app: &App, phase: &Phase<u32, String, FetchError>, area: Rect) {
    let surface = phase.surface();
    let indicator = app.indicators.for_surface(&surface).cloned().unwrap_or_default();

    let block = Block::default().borders(Borders::ALL).title("Items");

    match surface {
        Surface::Blank => frame.render_widget(block, area),
        Surface::FirstPageProgress => {
            let body = Paragraph::new(Span::styled(indicator, Style::default().fg(Color::Yellow)))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(body, area);
        }
        Surface::FirstPageError(err) => {
            let lines = vec![
                Line::from(Span::styled(
                    indicator,
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(err.to_string()),
                Line::from(Span::styled("r: retry", Style::default().fg(Color::Gray))),
            ];
            let body = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(body, area);
        }
        Surface::Content { items, trailer } => {
            let trailer = trailer.map(|trailer| trailer_line(&trailer, indicator));
            let block = block.title(format!("Items ({})", items.len()));
            match app.view.layout {
                LayoutKind::List => list::render(frame, app, items, trailer, block, area),
                LayoutKind::Grid => grid::render(frame, app, items, trailer, block, area),
            }
        }
    }
}

fn trailer_line(trailer: &Trailer<'_, FetchError>, indicator: String) -> Line<'static> {
    match trailer {
        Trailer::NewPageProgress => {
            Line::from(Span::styled(indicator, Style::default().fg(Color::Yellow)))
        }
        Trailer::NewPageError(err) => Line::from(vec![
            Span::styled(indicator, Style::default().fg(Color::Red)),
            Span::raw(": "),
            Span::raw(err.to_string()),
            Span::styled("  (r: retry)", Style::default().fg(Color::Gray)),
        ]),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, phase: &Phase<u32, String, FetchError>, area: Rect) {
    let status = if let Some(notice) = &app.notice {
        Line::from(vec![Span::styled(
            format!("Error: {}", notice),
            Style::default().fg(Color::Red),
        )])
    } else {
        match phase.kind() {
            PhaseKind::Loading => Line::from(vec![Span::styled(
                "Loading...",
                Style::default().fg(Color::Yellow),
            )]),
            PhaseKind::Error => Line::from(vec![Span::styled(
                "Request failed | r: retry | R: refresh | q: quit",
                Style::default().fg(Color::Red),
            )]),
            PhaseKind::Loaded if phase.is_last_page() => Line::from(vec![Span::styled(
                "End of list | j/k/g/G: nav | R: refresh | t: layout | q: quit",
                Style::default().fg(Color::Gray),
            )]),
            PhaseKind::Initial | PhaseKind::Loaded => Line::from(vec![Span::styled(
                "j/k/g/G: nav | Ctrl+d/u: page | R: refresh | t: layout | q: quit",
                Style::default().fg(Color::Gray),
            )]),
        }
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_rows_excludes_chrome() {
        assert_eq!(body_rows(24), 20);
        assert_eq!(body_rows(3), 0);
    }
}
