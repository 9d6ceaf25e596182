use chrono::{DateTime, Local};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, List, ListItem, Paragraph,
        Tabs, Wrap,
    },
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use std::time::Instant;

use crate::dashboard::{
    ClientState, FieldId, FieldKind, Section, StatusIndicator, ToastLevel, ToastPhase,
};

const CARD_COLUMNS: usize = 4;
const TOAST_WIDTH: u16 = 48;

pub fn draw(f: &mut Frame, state: &ClientState, now: DateTime<Local>, tick: Instant) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], state);
    draw_tabs(f, chunks[1], state);

    match state.nav.active() {
        Section::Dashboard => draw_dashboard(f, chunks[2], state, now),
        Section::Trades => draw_trades(f, chunks[2], state),
        Section::Signals => draw_signals(f, chunks[2], state),
        Section::Logs => draw_logs(f, chunks[2], state),
        Section::Settings => draw_settings(f, chunks[2], state),
    }

    draw_footer(f, chunks[3], state);
    draw_toasts(f, state, tick);
}

fn indicator_color(indicator: StatusIndicator) -> Color {
    match indicator {
        StatusIndicator::Online => Color::Green,
        StatusIndicator::Offline => Color::Gray,
        StatusIndicator::Error => Color::Red,
    }
}

fn draw_header(f: &mut Frame, area: Rect, state: &ClientState) {
    let color = indicator_color(state.indicator);
    let toggle_style = if state.toggle.is_running() {
        Style::default().fg(Color::Black).bg(Color::Red)
    } else {
        Style::default().fg(Color::Black).bg(Color::Green)
    };

    let line = Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(
            state.indicator.text(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(format!(" {} ", state.toggle.label()), toggle_style),
        Span::styled("  [s]", Style::default().fg(Color::DarkGray)),
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Trading Bot Dashboard "),
    );
    f.render_widget(header, area);
}

fn draw_tabs(f: &mut Frame, area: Rect, state: &ClientState) {
    let titles: Vec<Line> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| Line::from(format!("{} {}", i + 1, s.title())))
        .collect();
    let selected = Section::ALL
        .iter()
        .position(|s| state.nav.is_active(*s))
        .unwrap_or_default();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(selected)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn draw_dashboard(f: &mut Frame, area: Rect, state: &ClientState, now: DateTime<Local>) {
    let asset_rows = state.assets.len().div_ceil(CARD_COLUMNS).max(1) as u16;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(asset_rows * 3 + 2),
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    let uptime = state.uptime(now);
    let summary = [
        ("Total Value", state.summary.total_value.as_str()),
        ("Daily Change", state.summary.daily_change.as_str()),
        ("Top Asset", state.summary.top_asset.as_str()),
        ("Uptime", uptime.as_str()),
    ];
    for ((title, value), area) in summary.iter().zip(cards.iter()) {
        let card = Paragraph::new(Span::styled(
            *value,
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(*title));
        f.render_widget(card, *area);
    }

    draw_chart(f, rows[1], state);
    draw_assets(f, rows[2], state);
}

fn draw_chart(f: &mut Frame, area: Rect, state: &ClientState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Portfolio Value ");

    let points = state.chart.points();
    let (Some((start, end)), Some((lo, hi))) =
        (state.chart.time_bounds(), state.chart.value_bounds())
    else {
        let empty = Paragraph::new("No portfolio history yet")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, area);
        return;
    };

    let pad = ((hi - lo) * 0.05).max(1.0);
    let (y_min, y_max) = (lo - pad, hi + pad);
    let x_min = start.timestamp() as f64;
    let x_max = (end.timestamp() as f64).max(x_min + 1.0);
    let mid = start + (end - start) / 2;

    let datasets = vec![Dataset::default()
        .name("Portfolio Value")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(start.format("%H:%M").to_string()),
                    Span::raw(mid.format("%H:%M").to_string()),
                    Span::raw(end.format("%H:%M").to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{:.2}", y_min)),
                    Span::raw(format!("{:.2}", (y_min + y_max) / 2.0)),
                    Span::raw(format!("{:.2}", y_max)),
                ]),
        );
    f.render_widget(chart, area);
}

fn draw_assets(f: &mut Frame, area: Rect, state: &ClientState) {
    let block = Block::default().borders(Borders::ALL).title(" Assets ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.assets.is_empty() {
        return;
    }

    let row_count = state.assets.len().div_ceil(CARD_COLUMNS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); row_count])
        .split(inner);

    for (row, chunk) in rows.iter().zip(state.assets.chunks(CARD_COLUMNS)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, CARD_COLUMNS as u32); CARD_COLUMNS])
            .split(*row);
        for (card, col) in chunk.iter().zip(cols.iter()) {
            let widget = Paragraph::new(card.amount.as_str())
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title(card.asset.as_str()));
            f.render_widget(widget, *col);
        }
    }
}

fn draw_trades(f: &mut Frame, area: Rect, state: &ClientState) {
    let items: Vec<ListItem> = state
        .trades
        .iter()
        .map(|line| ListItem::new(line.as_str()))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Recent Trades ({}) ", state.trades.len())),
    );
    f.render_widget(list, area);
}

fn draw_signals(f: &mut Frame, area: Rect, state: &ClientState) {
    let block = Block::default().borders(Borders::ALL).title(" Trading Signals ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if state.signals.is_empty() {
        return;
    }

    let row_count = state.signals.len().div_ceil(CARD_COLUMNS);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(6); row_count])
        .split(inner);

    for (row, chunk) in rows.iter().zip(state.signals.chunks(CARD_COLUMNS)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, CARD_COLUMNS as u32); CARD_COLUMNS])
            .split(*row);
        for (card, col) in chunk.iter().zip(cols.iter()) {
            let lines: Vec<Line> = card
                .lines()
                .into_iter()
                .map(|text| {
                    let color = if text.contains("Bullish") {
                        Color::Green
                    } else if text.contains("Bearish") {
                        Color::Red
                    } else {
                        Color::White
                    };
                    Line::styled(text, Style::default().fg(color))
                })
                .collect();
            let widget = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(card.asset.as_str()));
            f.render_widget(widget, *col);
        }
    }
}

fn draw_logs(f: &mut Frame, area: Rect, state: &ClientState) {
    let block = Block::default().borders(Borders::ALL).title(" Logs ");
    let visible = block.inner(area).height as usize;
    let total = state.logs.lines().count();
    // Pinned to the newest line.
    let scroll = total.saturating_sub(visible) as u16;

    let logs = Paragraph::new(state.logs.as_str())
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(logs, area);
}

fn draw_settings(f: &mut Frame, area: Rect, state: &ClientState) {
    let title = if state.settings.is_dirty() {
        " Settings (unsaved, Enter to save) "
    } else {
        " Settings "
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(3); FieldId::ALL.len()])
        .split(inner);

    for (field, row) in state.settings.fields().iter().zip(rows.iter()) {
        let selected = field.id == state.settings.selected();
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let field_block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(field.id.label());

        match field.id.kind() {
            FieldKind::Slider => {
                let (min, max, _) = field.id.range();
                let span = (max - min).to_f64().unwrap_or(1.0);
                let ratio = ((field.value() - min).to_f64().unwrap_or(0.0) / span).clamp(0.0, 1.0);
                let gauge = Gauge::default()
                    .block(field_block)
                    .gauge_style(Style::default().fg(Color::Cyan))
                    .ratio(ratio)
                    .label(field.output_text());
                f.render_widget(gauge, *row);
            }
            FieldKind::Number => {
                let input = Paragraph::new(field.output_text()).block(field_block);
                f.render_widget(input, *row);
            }
        }
    }
}

fn draw_footer(f: &mut Frame, area: Rect, state: &ClientState) {
    let mut text = String::from("q quit  Tab/1-5 sections  s start/stop  r refresh");
    if state.nav.is_active(Section::Settings) {
        text.push_str("  ↑↓ field  ←→ adjust  Enter save");
    }
    if let Some(at) = state.last_update {
        text.push_str(&format!("  | updated {}", at.format("%H:%M:%S")));
    }
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn toast_color(level: ToastLevel) -> Color {
    match level {
        ToastLevel::Success => Color::Green,
        ToastLevel::Warning => Color::Yellow,
        ToastLevel::Error => Color::Red,
        ToastLevel::Info => Color::Blue,
    }
}

/// Stacks live toasts in the bottom-right corner, newest at the bottom.
fn draw_toasts(f: &mut Frame, state: &ClientState, now: Instant) {
    if state.toasts.is_empty() {
        return;
    }
    let screen = f.area();
    let width = TOAST_WIDTH.min(screen.width);
    let shown: Vec<_> = state.toasts.shown(now).collect();

    let mut bottom = screen.bottom().saturating_sub(1);
    for (toast, phase) in shown.into_iter().rev() {
        if bottom < screen.top() + 3 {
            break;
        }
        let area = Rect::new(screen.right().saturating_sub(width), bottom - 3, width, 3);
        bottom -= 3;

        let mut style = Style::default().fg(toast_color(toast.level));
        if phase == ToastPhase::Hiding {
            style = style.add_modifier(Modifier::DIM);
        }
        let message = if toast.repeats > 1 {
            format!("{} (x{})", toast.message, toast.repeats)
        } else {
            toast.message.clone()
        };

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(message)
                .style(style)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(style)),
            area,
        );
    }
}
