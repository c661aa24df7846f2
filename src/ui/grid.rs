use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::app::App;

pub fn render(
    frame: &mut Frame,
    app: &App,
    items: &[String],
    trailer: Option<Line<'static>>,
    block: Block<'_>,
    area: Rect,
) {
    let view = &app.view;
    let columns = view.columns();
    let inner_width = usize::from(area.width.saturating_sub(2));
    let cell = (inner_width / columns).max(1);

    let mut lines: Vec<Line> = items
        .chunks(columns)
        .enumerate()
        .skip(view.offset)
        .take(view.rows())
        .map(|(row, chunk)| {
            let spans = chunk
                .iter()
                .enumerate()
                .map(|(col, item)| {
                    let index = row * columns + col;
                    let text = fit(item, cell.saturating_sub(1));
                    let style = if index == view.cursor {
                        Style::default()
                            .fg(Color::Yellow)
                            .bg(Color::DarkGray)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Span::styled(format!("{:<width$}", text, width = cell), style)
                })
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect();

    // The indicator spans a full row below the last item row.
    if let Some(line) = trailer {
        let row = view.row_of(items.len());
        if row >= view.offset && row < view.offset + view.rows() {
            let line = if view.cursor >= items.len() {
                line.style(Style::default().bg(Color::DarkGray))
            } else {
                line
            };
            lines.push(line);
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn fit(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
