//! TUI views and rendering

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use trainapi::PlanStatus;

use crate::workflow::NoticeLevel;

use super::state::{AppState, InteractionMode, Row};

/// Main render function
pub fn render(state: &AppState, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Plan tree
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(state, frame, chunks[0]);
    render_plan_tree(state, frame, chunks[1]);
    render_footer(state, frame, chunks[2]);

    match &state.interaction {
        InteractionMode::Help => render_help_overlay(frame, chunks[1]),
        InteractionMode::Confirm(dialog) => render_confirm_overlay(frame, chunks[1], dialog),
        InteractionMode::Remarks(dialog) => render_remarks_overlay(frame, chunks[1], dialog),
        InteractionMode::Normal => {}
    }
}

/// Render the header bar
fn render_header(state: &AppState, frame: &mut Frame, area: Rect) {
    let identity = state.identity_label.as_deref().unwrap_or("not signed in");

    let header = Paragraph::new(vec![Line::from(vec![
        Span::styled(
            "Planboard ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(identity, Style::default().fg(Color::Yellow)),
        Span::raw(" │ "),
        Span::styled(
            format!("{} pending", state.counts.pending),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{} in progress", state.counts.in_progress),
            Style::default().fg(Color::Green),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{} completed", state.counts.completed),
            Style::default().fg(Color::Blue),
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{} rejected", state.counts.rejected),
            Style::default().fg(Color::Red),
        ),
    ])])
    .block(Block::default().borders(Borders::ALL).title(" Day Plans "));

    frame.render_widget(header, area);
}

fn status_color(status: PlanStatus) -> Color {
    match status {
        PlanStatus::Draft => Color::Gray,
        PlanStatus::Pending => Color::Yellow,
        PlanStatus::InProgress => Color::Green,
        PlanStatus::Completed => Color::Blue,
        PlanStatus::Rejected => Color::Red,
    }
}

/// Render the expandable plan/task/checkbox tree
fn render_plan_tree(state: &AppState, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = state
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let content = match row {
                Row::Plan {
                    date,
                    trainee,
                    status,
                    has_eod,
                    expanded,
                    ..
                } => {
                    let arrow = if *expanded { "▾" } else { "▸" };
                    let mut spans = vec![
                        Span::styled(format!("{} ", arrow), Style::default().fg(Color::DarkGray)),
                        Span::styled(format!("{}  ", date), Style::default().add_modifier(Modifier::BOLD)),
                        Span::raw(format!("{:<24} ", trainee)),
                        Span::styled(
                            format!("{:<12}", status.to_string()),
                            Style::default().fg(status_color(*status)),
                        ),
                    ];
                    if *has_eod {
                        spans.push(Span::styled(" [EOD]", Style::default().fg(Color::Cyan)));
                    }
                    Line::from(spans)
                }
                Row::Task {
                    title,
                    time_allocation,
                    status,
                    expanded,
                    has_checkboxes,
                    ..
                } => {
                    let arrow = match (has_checkboxes, expanded) {
                        (false, _) => " ",
                        (true, true) => "▾",
                        (true, false) => "▸",
                    };
                    let time = if time_allocation.is_empty() {
                        String::new()
                    } else {
                        format!("{}  ", time_allocation)
                    };
                    Line::from(vec![
                        Span::raw("    "),
                        Span::styled(format!("{} ", arrow), Style::default().fg(Color::DarkGray)),
                        Span::styled(time, Style::default().fg(Color::DarkGray)),
                        Span::raw(format!("{}  ", title)),
                        Span::styled(format!("({})", status), Style::default().fg(Color::DarkGray)),
                    ])
                }
                Row::Checkbox { label, checked } => {
                    let mark = if *checked { "[x]" } else { "[ ]" };
                    Line::from(vec![
                        Span::raw("        "),
                        Span::styled(
                            format!("{} ", mark),
                            Style::default().fg(if *checked { Color::Green } else { Color::DarkGray }),
                        ),
                        Span::raw(label.clone()),
                    ])
                }
            };

            if i == state.selected {
                ListItem::new(content).style(Style::default().bg(Color::DarkGray).fg(Color::White))
            } else {
                ListItem::new(content)
            }
        })
        .collect();

    let title = if state.rows.is_empty() { " Plans (none) " } else { " Plans " };
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(list, area);
}

/// Render the footer: status message when present, key hints otherwise
fn render_footer(state: &AppState, frame: &mut Frame, area: Rect) {
    let footer = if let Some(message) = &state.status_message {
        let color = match message.level {
            NoticeLevel::Info => Color::Green,
            NoticeLevel::Warn => Color::Yellow,
            NoticeLevel::Error => Color::Red,
        };
        Paragraph::new(Line::from(Span::styled(
            format!(" {}", message.text),
            Style::default().fg(color),
        )))
        .block(Block::default().borders(Borders::ALL))
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(" q", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit "),
            Span::styled(" ?", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Help "),
            Span::styled(" ↑↓", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Navigate "),
            Span::styled(" ⏎", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Expand "),
            Span::styled(" a", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Approve "),
            Span::styled(" x", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Reject "),
            Span::styled(" d", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Delete "),
            Span::styled(" r", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" Refresh "),
        ]))
        .block(Block::default().borders(Borders::ALL))
    };

    frame.render_widget(footer, area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("q, Ctrl+c  ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
        Line::from(vec![
            Span::styled("?, F1      ", Style::default().fg(Color::Cyan)),
            Span::raw("Toggle help"),
        ]),
        Line::from(vec![
            Span::styled("↑/↓, j/k   ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate rows"),
        ]),
        Line::from(vec![
            Span::styled("g / G      ", Style::default().fg(Color::Cyan)),
            Span::raw("First / last row"),
        ]),
        Line::from(vec![
            Span::styled("Enter, Spc ", Style::default().fg(Color::Cyan)),
            Span::raw("Expand/collapse plan or task"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled("Actions", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(vec![
            Span::styled("a          ", Style::default().fg(Color::Cyan)),
            Span::raw("Approve selected plan"),
        ]),
        Line::from(vec![
            Span::styled("x          ", Style::default().fg(Color::Cyan)),
            Span::raw("Reject selected plan (remarks required)"),
        ]),
        Line::from(vec![
            Span::styled("d          ", Style::default().fg(Color::Cyan)),
            Span::raw("Delete selected plan"),
        ]),
        Line::from(vec![
            Span::styled("r          ", Style::default().fg(Color::Cyan)),
            Span::raw("Refresh from server"),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(help, popup_area);
}

/// Render the delete confirmation dialog
fn render_confirm_overlay(frame: &mut Frame, area: Rect, dialog: &super::state::ConfirmDialog) {
    let popup_area = centered_rect(50, 20, area);
    frame.render_widget(Clear, popup_area);

    let yes_style = if dialog.selected_yes {
        Style::default().fg(Color::Black).bg(Color::Red)
    } else {
        Style::default().fg(Color::Red)
    };
    let no_style = if dialog.selected_yes {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::Black).bg(Color::Gray)
    };

    let content = vec![
        Line::from(dialog.message.as_str()),
        Line::from(""),
        Line::from(vec![
            Span::raw("      "),
            Span::styled("[ Yes ]", yes_style),
            Span::raw("   "),
            Span::styled("[ No ]", no_style),
        ]),
    ];

    let confirm = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(" Confirm "))
        .wrap(Wrap { trim: true });

    frame.render_widget(confirm, popup_area);
}

/// Render the reviewer remarks input dialog
fn render_remarks_overlay(frame: &mut Frame, area: Rect, dialog: &super::state::RemarksDialog) {
    let popup_area = centered_rect(60, 25, area);
    frame.render_widget(Clear, popup_area);

    let mut content = vec![
        Line::from(format!("Rejecting plan {}", dialog.plan_id)),
        Line::from(""),
        Line::from(vec![
            Span::raw("> "),
            Span::raw(dialog.buffer.as_str()),
            Span::styled("█", Style::default().fg(Color::Gray)),
        ]),
    ];
    if let Some(hint) = &dialog.hint {
        content.push(Line::from(""));
        content.push(Line::from(Span::styled(
            hint.as_str(),
            Style::default().fg(Color::Yellow),
        )));
    }
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        "Enter to submit, Esc to cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let remarks = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title(" Remarks "))
        .wrap(Wrap { trim: true });

    frame.render_widget(remarks, popup_area);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
