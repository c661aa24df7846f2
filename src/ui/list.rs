use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, List, ListItem, ListState};
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
    let mut rows: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.view.cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::styled(item.clone(), style))
        })
        .collect();

    if let Some(line) = trailer {
        rows.push(ListItem::new(line));
    }

    let list = List::new(rows)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default()
        .with_offset(app.view.offset)
        .with_selected(Some(app.view.cursor));

    frame.render_stateful_widget(list, area, &mut state);
}
