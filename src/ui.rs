//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, Focus};
use crate::config::UiSettings;
use crate::engine::{PlaybackState, Status};

const CHOOSER_HELP: &str =
    "[j/k] up/down | [tab] files/sessions | [enter] open | [g/G] top/bottom | [r] rescan | [q] quit";

/// Everything the player screen shows, sampled once per frame.
#[derive(Debug, Clone)]
pub struct PlayerPanel {
    pub name: String,
    pub status: Status,
    pub spend_time: u64,
    pub finished_times: u32,
    pub help: String,
}

fn padded_left() -> Padding {
    Padding {
        left: 1,
        right: 0,
        top: 0,
        bottom: 0,
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    // Keep the popup smaller and avoid covering the entire UI.
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(5);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Window of `total` rows of height `height` keeping `selected` centered when possible.
/// Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn state_text(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, app: &App, player: Option<&PlayerPanel>, ui_settings: &UiSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" shadowing ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    let help = match player {
        Some(panel) => {
            draw_player(frame, panel, chunks[1]);
            panel.help.as_str()
        }
        None => {
            draw_chooser(frame, app, chunks[1]);
            CHOOSER_HELP
        }
    };

    let footer = Paragraph::new(help)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(padded_left()),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[2]);

    if let Some(notice) = &app.notice {
        let popup_area = centered_rect_sized(60, 6, chunks[1]);
        frame.render_widget(Clear, popup_area);
        let popup = Paragraph::new(notice.as_str())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" info (any key closes) ")
                    .padding(padded_left()),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(popup, popup_area);
    }
}

fn draw_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: Vec<String>,
    selected: usize,
    focused: bool,
) {
    let total = rows.len();
    let (start, end, selected_in_window) =
        visible_window(total, area.height.saturating_sub(2) as usize, selected);

    let items: Vec<ListItem> = rows
        .into_iter()
        .skip(start)
        .take(end - start)
        .map(ListItem::new)
        .collect();

    let highlight = if focused {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(highlight)
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_in_window));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_chooser(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let dir = app.current_dir.as_deref().unwrap_or(".");
    let files: Vec<String> = app
        .files
        .iter()
        .map(|e| format!("{}  [{}]", e.name, e.duration_label()))
        .collect();
    draw_list(
        frame,
        columns[0],
        &format!(" files: {dir} "),
        files,
        app.selected_file,
        app.focus == Focus::Files,
    );

    let sessions: Vec<String> = app
        .sessions
        .iter()
        .map(|s| {
            format!(
                "{}  ({} bookmarks, {}x, {} listened)",
                s.name,
                s.time_stamp.len(),
                s.finished_times,
                crate::engine::format_time(s.spend_time as f64)
            )
        })
        .collect();
    draw_list(
        frame,
        columns[1],
        " sessions ",
        sessions,
        app.selected_session,
        app.focus == Focus::Sessions,
    );
}

fn draw_player(frame: &mut Frame, panel: &PlayerPanel, area: Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    let status = &panel.status;
    let pause_hint = if status.pause_enabled {
        "space pauses"
    } else {
        "↑ plays"
    };
    let info = format!(
        "{} • {} • {}\nListened: {} • Finished: {}x",
        panel.name,
        state_text(status.state),
        pause_hint,
        crate::engine::format_time(panel.spend_time as f64),
        panel.finished_times
    );
    let info_par = Paragraph::new(info)
        .block(Block::bordered().padding(padded_left()).title(" session "))
        .wrap(Wrap { trim: true });
    frame.render_widget(info_par, rows[0]);

    let gauge = Gauge::default()
        .block(
            Block::bordered().title(format!(" bookmark {} ", status.bookmark_label)),
        )
        .gauge_style(Style::default().add_modifier(Modifier::BOLD))
        .ratio(status.ratio())
        .label(format!("{} / {}", status.elapsed, status.total));
    frame.render_widget(gauge, rows[1]);
}
