//! Render functions for the TUI.

use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::App;
use crate::feed::SortOrder;
use crate::util::text::{display_width, format_views, truncate_to_width};
use crate::util::time::relative_time;

use super::status;

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render function.
///
/// Records the list viewport height on `app` so the event loop can translate
/// scroll position into the last-item visibility signal.
pub(super) fn render(f: &mut Frame, app: &mut App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        app.list_visible_rows = 0;
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_filter_bar(f, app, chunks[0]);
    render_list(f, app, chunks[1]);
    status::render(f, app, chunks[2]);
}

/// The New/Old filter tabs. The pending-backfill case keeps the outgoing tab
/// highlighted, matching the deferred activation.
fn render_filter_bar(f: &mut Frame, app: &App, area: Rect) {
    let orders = [SortOrder::Newest, SortOrder::Oldest];
    let titles: Vec<Line> = orders.iter().map(|o| Line::from(o.label())).collect();
    let selected = orders
        .iter()
        .position(|o| *o == app.feed.active_order())
        .unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, area);
}

/// The scrolling video list, with a trailing loading or end-of-feed row.
fn render_list(f: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Videos");
    let inner = block.inner(area);
    f.render_widget(block, area);

    app.list_visible_rows = inner.height as usize;
    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let videos = app.feed.displayed();
    let order = app.feed.active_order();

    if videos.is_empty() {
        let msg = if app.controller.is_loading(order) {
            "Loading videos..."
        } else {
            "No videos"
        };
        f.render_widget(
            Paragraph::new(msg).style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let now = Utc::now();
    let mut lines: Vec<Line> = Vec::with_capacity(inner.height as usize);
    let start = app.list_offset.min(videos.len());
    let end = (start + inner.height as usize).min(videos.len());

    for (idx, video) in videos[start..end].iter().enumerate() {
        let absolute = start + idx;

        let meta = format!(
            "  {} · {} views · {}",
            app.authors.display_name(&video.author_id),
            format_views(video.views),
            relative_time(video.created_at, now),
        );
        let title_width = (inner.width as usize).saturating_sub(display_width(&meta));
        let title = truncate_to_width(&video.title, title_width);

        let style = if absolute == app.selected {
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(title.into_owned(), style),
            Span::styled(meta, style.patch(Style::default().fg(Color::Gray))),
        ]));
    }

    // Trailing row: loading indicator while a fetch is in flight, or the end
    // marker once the order is exhausted and fully scrolled.
    if lines.len() < inner.height as usize {
        if app.controller.is_loading(order) {
            lines.push(Line::from(Span::styled(
                "Loading more...",
                Style::default().fg(Color::DarkGray),
            )));
        } else if app.feed.is_exhausted(order) && end == videos.len() {
            lines.push(Line::from(Span::styled(
                "End of feed",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}
