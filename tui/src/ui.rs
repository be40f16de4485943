//! Rendering.
//!
//! Layout:
//!   ┌─── header ──────────────────────────────────────────────────────────┐
//!   │  ACS 藥物禁忌症核對                               已執行 1/3        │
//!   ├─── checklist ───────────────────────────────────────────────────────┤
//!   │  ▾ Aspirin 3顆 ▶️需做EKG  (5/5)                                     │
//!   │      [x] ...                                                        │
//!   │      ▶ 口服3顆(300mg)絞碎吞下  ⚠️ 點擊紀錄時間                       │
//!   │  ▸ NTG最多 3顆 ▶️T2可協助給予  (0/6)                                │
//!   ├─── status ──────────────────────────────────────────────────────────┤
//!   ├─── footer (key bindings) ───────────────────────────────────────────┤
//!   └─────────────────────────────────────────────────────────────────────┘

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use unicode_width::UnicodeWidthChar;

use acscheck_contracts::catalog::DrugDefinition;

use crate::app::{App, Row, StatusKind, RESET_PROMPT};

const TITLE: &str = "ACS 藥物禁忌症核對";

/// Indent of a check row up to its label: `"     [ ] "`.
const CHECK_INDENT: usize = 9;

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(6),    // checklist
            Constraint::Length(3), // status
            Constraint::Length(3), // footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_checklist(f, chunks[1], app);
    render_status(f, chunks[2], app);
    render_footer(f, chunks[3], app);

    if app.confirming_reset() {
        render_reset_modal(f, f.area());
    }
}

fn bordered() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let store = app.store();
    let administered = store
        .catalog()
        .iter()
        .filter(|drug| store.is_administered(&drug.id))
        .count();

    let line = Line::from(vec![
        Span::styled(
            format!("{}    ", TITLE),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("已執行 {}/{}", administered, store.catalog().len()),
            Style::default().fg(Color::Gray),
        ),
    ]);
    f.render_widget(Paragraph::new(line).block(bordered()), area);
}

fn render_checklist(f: &mut Frame, area: Rect, app: &App) {
    // Inside the two border columns, after the checkbox.
    let label_width = usize::from(area.width.saturating_sub(2)).saturating_sub(CHECK_INDENT);

    let items: Vec<ListItem> = app
        .rows()
        .into_iter()
        .filter_map(|row| {
            let drug = app.drug_at(row.drug())?;
            Some(match row {
                Row::Drug(index) => drug_header(app, drug, app.open_drug() == Some(index)),
                Row::Check { item, .. } => check_item(app, drug, item, label_width),
                Row::Action(_) => action_item(app, drug),
                Row::Pending(_) => pending_item(),
            })
        })
        .collect();

    let list = List::new(items)
        .block(bordered().title(" 藥物 "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(app.cursor()));
    f.render_stateful_widget(list, area, &mut state);
}

fn drug_header<'a>(app: &App, drug: &'a DrugDefinition, open: bool) -> ListItem<'a> {
    let store = app.store();
    let arrow = if open { "▾" } else { "▸" };

    let mut spans = vec![
        Span::styled(format!(" {} ", arrow), Style::default().fg(Color::DarkGray)),
        Span::styled(drug.name.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(
            drug.dose_highlight.as_str(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ];
    if !drug.suffix_note.is_empty() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(drug.suffix_note.as_str(), Style::default().fg(Color::Gray)));
    }

    if store.is_administered(&drug.id) {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            " 已完成 ",
            Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    } else if let Some((cleared, total)) = store.progress(&drug.id) {
        let color = if cleared == total { Color::Green } else { Color::Gray };
        spans.push(Span::styled(
            format!("  ({}/{})", cleared, total),
            Style::default().fg(color),
        ));
    }

    let mut text = Text::from(Line::from(spans));
    if open && !store.is_administered(&drug.id) {
        text.push_line(Line::from(Span::styled(
            "     請確認無以下禁忌症：",
            Style::default().fg(Color::Red),
        )));
    }
    ListItem::new(text)
}

/// A check row; long labels wrap to `label_width` with continuation lines
/// aligned under the first character of the label.
fn check_item<'a>(
    app: &App,
    drug: &'a DrugDefinition,
    item: usize,
    label_width: usize,
) -> ListItem<'a> {
    let Some(check) = drug.checklist.get(item) else {
        return ListItem::new("");
    };
    let store = app.store();
    let cleared = store.is_cleared(&drug.id, &check.id);
    let locked = store.is_administered(&drug.id);

    let mark = if cleared { "[x]" } else { "[ ]" };
    let style = match (locked, cleared) {
        (true, _) => Style::default().fg(Color::DarkGray),
        (false, true) => Style::default().fg(Color::Green),
        (false, false) => Style::default().fg(Color::White),
    };

    let lines: Vec<Line> = wrap_label(&check.label, label_width)
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let lead = if i == 0 {
                format!("     {} ", mark)
            } else {
                " ".repeat(CHECK_INDENT)
            };
            Line::from(vec![Span::styled(lead, style), Span::styled(part, style)])
        })
        .collect();
    ListItem::new(Text::from(lines))
}

/// Split `label` into pieces no wider than `width` terminal columns.
fn wrap_label(label: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for c in label.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(c);
        used += w;
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

fn pending_item() -> ListItem<'static> {
    ListItem::new(Line::from(Span::styled(
        "     ▷ 請先勾選確認所有禁忌症以解鎖給藥選項",
        Style::default().fg(Color::DarkGray),
    )))
}

fn action_item<'a>(app: &App, drug: &'a DrugDefinition) -> ListItem<'a> {
    let record = app.store().record(&drug.id);
    let line = match record.and_then(|r| r.administered_time.as_deref()) {
        Some(time) => Line::from(vec![
            Span::styled("     ✓ ", Style::default().fg(Color::Green)),
            Span::styled(drug.action_label.as_str(), Style::default().fg(Color::Gray)),
            Span::styled(
                format!("  已執行於 {}", time),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]),
        None => Line::from(vec![
            Span::styled("     ▶ ", Style::default().fg(Color::Yellow)),
            Span::styled(drug.action_label.as_str(), Style::default().fg(Color::White)),
            Span::styled(
                "  ⚠️ 點擊紀錄時間",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
    };
    ListItem::new(line)
}

fn render_status(f: &mut Frame, area: Rect, app: &App) {
    let line = match app.status() {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Info => Color::Green,
                StatusKind::Warn => Color::Yellow,
            };
            Line::from(Span::styled(format!(" {}", status.text), Style::default().fg(color)))
        }
        None => Line::from(Span::styled(
            " 依序確認禁忌症，全部確認後才能紀錄給藥時間",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line).block(bordered()), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Cyan));

    let spans = if app.confirming_reset() {
        vec![key(" [y] "), Span::raw("確定重置  "), key("[n/Esc] "), Span::raw("取消")]
    } else {
        vec![
            key(" [↑/↓] "),
            Span::raw("移動  "),
            key("[Enter/Space] "),
            Span::raw("展開/勾選  "),
            key("[a] "),
            Span::raw("紀錄時間  "),
            key("[R] "),
            Span::raw("重置  "),
            key("[q] "),
            Span::raw("離開"),
        ]
    };
    f.render_widget(Paragraph::new(Line::from(spans)).block(bordered()), area);
}

fn render_reset_modal(f: &mut Frame, area: Rect) {
    let modal = centered(area, 52, 7);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            RESET_PROMPT,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[y] ", Style::default().fg(Color::Red)),
            Span::raw("確定重置    "),
            Span::styled("[n] ", Style::default().fg(Color::Cyan)),
            Span::raw("取消"),
        ]),
    ];

    let block = Block::default()
        .title(" 重置 ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    f.render_widget(Clear, modal);
    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        modal,
    );
}

/// A `width` x `height` rect centered in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
