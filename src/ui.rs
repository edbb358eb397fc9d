use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap,
};

use crate::app::{App, BookingField, Mode, View};
use crate::dates;
use crate::models::{Appointment, AppointmentStatus, ApprovalStatus};
use crate::storage::ThemePreference;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = theme_from(app.theme);
    draw_background(frame, size, &theme);

    match app.view {
        View::Review => draw_review(frame, app, size, &theme),
        View::Appointments => draw_intake(frame, app, size, &theme),
    }

    match app.mode {
        Mode::Loading => draw_overlay(frame, size, "Loading data from the shop API...", &theme),
        Mode::Login => draw_login(frame, app, size, &theme),
        Mode::Reject => draw_reject_dialog(frame, app, size, &theme),
        Mode::Search => draw_search_input(frame, app, size, &theme),
        Mode::FromDate => draw_from_date_input(frame, app, size, &theme),
        Mode::Reschedule => draw_reschedule_input(frame, app, size, &theme),
        Mode::Booking => draw_booking_form(frame, app, size, &theme),
        Mode::CustomerHistory => draw_customer_history(frame, app, size, &theme),
        Mode::Browse => {}
    }

    if matches!(app.mode, Mode::Browse) && !app.show_help {
        if let Some(toast) = app.active_toast() {
            draw_toast(frame, size, &toast.message, toast.is_error, &theme);
        }
    }

    if app.show_help {
        draw_help(frame, size, &theme);
    }
}

fn draw_review(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let content = area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(content);

    let header = Paragraph::new(vec![
        review_title_line(app, theme),
        review_metrics_line(app, theme),
    ])
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(header, chunks[0]);

    let header_row = Row::new(vec![
        Cell::from("Employee"),
        Cell::from("Logged"),
        Cell::from("Project"),
        Cell::from("Task"),
        Cell::from("Hours"),
        Cell::from("Status"),
        Cell::from("Note"),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD).fg(theme.accent));

    let rows: Vec<Row> = app
        .review
        .filtered()
        .iter()
        .map(|log| {
            Row::new(vec![
                Cell::from(log.employee().to_string()),
                Cell::from(dates::format_timestamp(&log.logged_at)),
                Cell::from(log.project().to_string()),
                Cell::from(log.task().to_string()),
                Cell::from(format!("{:.2}", log.hours)),
                Cell::from(Span::styled(
                    log.approval_status.label(),
                    approval_style(log.approval_status, theme),
                )),
                Cell::from(log.note.clone().unwrap_or_else(|| "-".to_string())),
            ])
            .style(theme.panel_style())
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(18),
            Constraint::Min(14),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Min(10),
        ],
    )
    .header(header_row)
    .block(panel_block("Time Logs", theme))
    .row_highlight_style(
        Style::default()
            .bg(theme.accent)
            .fg(theme.accent_contrast())
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▍ ");

    if app.review.filtered().is_empty() {
        let empty = Paragraph::new("No time logs match the current filters.")
            .alignment(Alignment::Center)
            .block(panel_block("Time Logs", theme))
            .style(theme.muted_style());
        frame.render_widget(empty, chunks[1]);
    } else {
        frame.render_stateful_widget(table, chunks[1], &mut app.review_state);
    }

    let footer = footer_line(
        app,
        "a approve · x reject · c copy · f filter · / search · Tab appointments",
        theme,
    );
    let footer_block = Paragraph::new(footer).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(footer_block, chunks[2]);
}

fn review_title_line(app: &App, theme: &Theme) -> Line<'static> {
    let last_refresh = app
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "Never".to_string());
    Line::from(vec![
        Span::styled("Wrenchdesk", theme.title_style()),
        Span::raw("  "),
        Span::styled("Time Log Review", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled("Filter", theme.muted_style()),
        Span::raw(": "),
        Span::raw(app.review.status_filter.label().to_string()),
        Span::raw("  "),
        Span::styled("Search", theme.muted_style()),
        Span::raw(": "),
        Span::raw(if app.review.search.is_empty() {
            "—".to_string()
        } else {
            app.review.search.clone()
        }),
        Span::raw("  "),
        Span::styled("Last refresh", theme.muted_style()),
        Span::raw(": "),
        Span::raw(last_refresh),
    ])
}

fn review_metrics_line(app: &App, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("Pending approval", theme.muted_style()),
        Span::raw(": "),
        Span::styled(
            app.review.pending_count().to_string(),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("Total hours (filtered)", theme.muted_style()),
        Span::raw(": "),
        Span::styled(
            format!("{:.2}", app.review.total_hours()),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            format!("{} entries", app.review.filtered().len()),
            theme.muted_style(),
        ),
    ])
}

fn draw_intake(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let content = area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(content);

    let stats = app.intake.stats();
    let from_date = app
        .intake
        .from_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "—".to_string());

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Wrenchdesk", theme.title_style()),
            Span::raw("  "),
            Span::styled(
                "Appointment Intake",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Filter", theme.muted_style()),
            Span::raw(": "),
            Span::raw(app.intake.status_filter.label().to_string()),
            Span::raw("  "),
            Span::styled("From", theme.muted_style()),
            Span::raw(": "),
            Span::raw(from_date),
            Span::raw("  "),
            Span::styled("Search", theme.muted_style()),
            Span::raw(": "),
            Span::raw(if app.intake.search.is_empty() {
                "—".to_string()
            } else {
                app.intake.search.clone()
            }),
        ]),
        Line::from(vec![
            Span::styled("Total", theme.muted_style()),
            Span::raw(format!(": {}   ", stats.total)),
            Span::styled("Pending", theme.muted_style()),
            Span::styled(
                format!(": {}   ", stats.pending),
                Style::default().fg(theme.highlight),
            ),
            Span::styled("Confirmed", theme.muted_style()),
            Span::styled(
                format!(": {}   ", stats.confirmed),
                Style::default().fg(theme.accent),
            ),
            Span::styled("Converted", theme.muted_style()),
            Span::styled(
                format!(": {}", stats.converted),
                Style::default().fg(theme.success),
            ),
        ]),
    ])
    .alignment(Alignment::Left)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(header, chunks[0]);

    let visible: Vec<Appointment> = app.intake.visible().into_iter().cloned().collect();
    if visible.is_empty() {
        let empty = Paragraph::new("No appointments match the selected filters.")
            .alignment(Alignment::Center)
            .block(panel_block("Appointments", theme))
            .style(theme.muted_style());
        frame.render_widget(empty, chunks[1]);
    } else {
        let items: Vec<ListItem> = visible
            .iter()
            .map(|appt| appointment_item(appt, app.intake.submitting.as_deref(), theme))
            .collect();
        let list = List::new(items)
            .block(panel_block("Appointments", theme))
            .highlight_style(
                Style::default()
                    .bg(theme.accent)
                    .fg(theme.accent_contrast())
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▍ ");
        frame.render_stateful_widget(list, chunks[1], &mut app.intake_state);
    }

    let footer = footer_line(
        app,
        "c confirm · s start · o complete · x cancel · e reschedule · n new · u customer · d date · f filter",
        theme,
    );
    let footer_block = Paragraph::new(footer).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(footer_block, chunks[2]);
}

fn appointment_item(
    appt: &Appointment,
    submitting: Option<&str>,
    theme: &Theme,
) -> ListItem<'static> {
    let window = format!(
        "{} – {}",
        appt.start_time
            .as_deref()
            .map(dates::format_timestamp)
            .unwrap_or_else(|| "—".to_string()),
        appt.end_time
            .as_deref()
            .map(dates::format_timestamp)
            .unwrap_or_else(|| "—".to_string()),
    );

    let mut title = vec![
        Span::styled(
            appt.service_type.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(appt.status.label(), appointment_style(appt.status, theme)),
    ];
    if submitting == Some(appt.id.as_str()) {
        title.push(Span::styled("  (updating...)", theme.muted_style()));
    }

    let details = Line::from(vec![
        Span::styled("  customer ", theme.muted_style()),
        Span::raw(appt.customer_id.clone()),
        Span::styled("  vehicle ", theme.muted_style()),
        Span::raw(appt.vehicle_id.clone()),
        Span::styled("  ", theme.muted_style()),
        Span::styled(window, theme.muted_style()),
    ]);

    ListItem::new(vec![Line::from(title), details]).style(theme.panel_style())
}

fn footer_line(app: &mut App, keys: &str, theme: &Theme) -> Line<'static> {
    let status = app.status.clone().unwrap_or_default();
    Line::from(vec![
        Span::styled(keys.to_string(), theme.muted_style()),
        Span::raw(" · "),
        Span::styled("r refresh", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("h help", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("q quit", theme.muted_style()),
        if status.is_empty() {
            Span::raw("")
        } else {
            Span::styled(
                format!("   |   {status}"),
                Style::default().fg(theme.error),
            )
        },
    ])
}

fn draw_overlay(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let block = centered_rect(60, 20, area);
    frame.render_widget(Clear, block);
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(panel_block("Status", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_login(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 30, area);
    frame.render_widget(Clear, block);
    let mut lines = vec![
        Line::from("Enter your shop API token"),
        Line::from("Ask your administrator for an admin-scoped token."),
        Line::from(""),
        Line::from(vec![
            Span::styled("Token: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.input.clone()),
        ]),
        Line::from(""),
        Line::from("Press Enter to save, Esc to quit"),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Login", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_reject_dialog(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 50, area);
    frame.render_widget(Clear, block);

    let mut lines = vec![
        Line::from("Provide a reason for rejecting this time log."),
        Line::from("It is added to the log's notes for the employee."),
        Line::from(""),
    ];

    if let Some(draft) = &app.review.draft {
        lines.push(Line::from(vec![
            Span::styled("Employee: ", theme.muted_style()),
            Span::styled(
                draft.log.employee().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Project:  ", theme.muted_style()),
            Span::raw(draft.log.project().to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Task:     ", theme.muted_style()),
            Span::raw(draft.log.task().to_string()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Hours:    ", theme.muted_style()),
            Span::raw(format!("{:.2}", draft.log.hours)),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("Reason: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(draft.reason.clone(), Style::default().fg(theme.accent)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("Enter reject · Esc cancel"));

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Reject Time Log", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_search_input(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(60, 25, area);
    frame.render_widget(Clear, block);

    let target = match app.view {
        View::Review => "employee, project, or task",
        View::Appointments => "service, customer, or vehicle",
    };

    let lines = vec![
        Line::from(format!("Search by {target}.")),
        Line::from(""),
        Line::from(vec![
            Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(app.input.clone(), Style::default().fg(theme.accent)),
        ]),
        Line::from(""),
        Line::from("Filters apply as you type · Enter keep · Esc revert"),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Search", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_from_date_input(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(60, 25, area);
    frame.render_widget(Clear, block);

    let mut lines = vec![
        Line::from("Show appointments starting on or after this date."),
        Line::from(""),
        Line::from(vec![
            Span::styled("Date (YYYY-MM-DD): ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(app.input.clone(), Style::default().fg(theme.accent)),
        ]),
        Line::from(""),
        Line::from("Enter apply · empty clears the date · Esc cancel"),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("From Date", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_reschedule_input(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(60, 30, area);
    frame.render_widget(Clear, block);

    let start_value = if app.slot_form.focus_end {
        Span::raw(app.slot_form.start.clone())
    } else {
        Span::styled(app.slot_form.start.clone(), Style::default().fg(theme.accent))
    };
    let end_value = if app.slot_form.focus_end {
        Span::styled(app.slot_form.end.clone(), Style::default().fg(theme.accent))
    } else {
        Span::raw(app.slot_form.end.clone())
    };

    let mut lines = vec![
        Line::from("New slot (YYYY-MM-DD HH:MM). Availability is checked first."),
        Line::from(""),
        Line::from(vec![
            Span::styled("Start: ", Style::default().add_modifier(Modifier::BOLD)),
            start_value,
        ]),
        Line::from(vec![
            Span::styled("End:   ", Style::default().add_modifier(Modifier::BOLD)),
            end_value,
        ]),
        Line::from(""),
        Line::from("Tab switch field · Enter apply · Esc cancel"),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Reschedule Appointment", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_booking_form(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 55, area);
    frame.render_widget(Clear, block);

    let mut lines = vec![
        Line::from("Book a new appointment. Availability is checked on submit."),
        Line::from(""),
    ];

    for field in BookingField::ALL {
        let value = app.booking.field(field).to_string();
        let value_span = if app.booking.focused() == field {
            Span::styled(value, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(value)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<26}", field.label()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            value_span,
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from("Tab/Down next · Shift+Tab/Up previous · Enter book · Esc cancel"));

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("New Appointment", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_customer_history(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let block = centered_rect(75, 65, area);
    frame.render_widget(Clear, block);

    if app.customer_history.is_empty() {
        let empty = Paragraph::new("No appointments on file for this customer.")
            .alignment(Alignment::Center)
            .block(panel_block("Customer Appointments", theme))
            .style(theme.muted_style());
        frame.render_widget(empty, block);
        return;
    }

    let history: Vec<Appointment> = app.customer_history.clone();
    let items: Vec<ListItem> = history
        .iter()
        .map(|appt| appointment_item(appt, None, theme))
        .collect();
    let title = format!("Customer Appointments ({})", history[0].customer_id);
    let list = List::new(items)
        .block(panel_block(&title, theme))
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_contrast())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▍ ");
    frame.render_stateful_widget(list, block, &mut app.history_state);
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, is_error: bool, theme: &Theme) {
    let rect = toast_rect(message, area);

    frame.render_widget(Clear, rect);
    let style = if is_error {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center)
        .block(panel_block("Notice", theme));
    frame.render_widget(paragraph, rect);
}

/// Bottom-right toast placement, shrunk to whatever width the terminal has.
fn toast_rect(message: &str, area: Rect) -> Rect {
    let max_width = area.width.saturating_sub(2);
    let width = (message.len() as u16 + 6).clamp(20.min(max_width), max_width);
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 4);
    Rect::new(x, y, width, height)
}

fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 70, area);
    frame.render_widget(Clear, block);

    let header_style = Style::default().add_modifier(Modifier::BOLD).fg(theme.accent);
    let key_style = Style::default().fg(theme.highlight);

    let rows = vec![
        Row::new(vec![
            Cell::from(Span::styled("Views", header_style)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("Tab / 1 / 2", key_style)),
            Cell::from("Switch between time logs and appointments"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("Up/Down", key_style)),
            Cell::from("Move selection"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("f", key_style)),
            Cell::from("Cycle status filter"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("/", key_style)),
            Cell::from("Search"),
        ]),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        Row::new(vec![
            Cell::from(Span::styled("Time logs", header_style)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("a", key_style)),
            Cell::from("Approve selected pending log"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("x", key_style)),
            Cell::from("Reject selected pending log (asks for a reason)"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("c", key_style)),
            Cell::from("Copy the filtered table to the clipboard"),
        ]),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        Row::new(vec![
            Cell::from(Span::styled("Appointments", header_style)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("c / s / o", key_style)),
            Cell::from("Confirm / start / complete"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("x", key_style)),
            Cell::from("Cancel (records who cancelled)"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("e", key_style)),
            Cell::from("Reschedule to a new slot"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("n", key_style)),
            Cell::from("Book a new appointment"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("u", key_style)),
            Cell::from("All appointments for the selected customer"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("d", key_style)),
            Cell::from("From-date filter"),
        ]),
        Row::new(vec![Cell::from(""), Cell::from("")]),
        Row::new(vec![
            Cell::from(Span::styled("General", header_style)),
            Cell::from(""),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("r", key_style)),
            Cell::from("Refresh from the server"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("m", key_style)),
            Cell::from("Toggle theme"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("h / Esc", key_style)),
            Cell::from("Close help"),
        ]),
        Row::new(vec![
            Cell::from(Span::styled("q", key_style)),
            Cell::from("Quit"),
        ]),
    ];

    let table = Table::new(rows, [Constraint::Length(16), Constraint::Min(10)])
        .block(panel_block("Help", theme))
        .column_spacing(2);

    frame.render_widget(table, block);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    vertical[1]
}

fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(Style::default().bg(theme.bg).fg(theme.text));
    frame.render_widget(block, area);
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .style(theme.panel_style())
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            theme.title_style(),
        )))
}

fn approval_style(status: ApprovalStatus, theme: &Theme) -> Style {
    match status {
        ApprovalStatus::Pending => Style::default().fg(theme.highlight),
        ApprovalStatus::Approved => Style::default().fg(theme.success),
        ApprovalStatus::Rejected => Style::default().fg(theme.error),
    }
}

fn appointment_style(status: AppointmentStatus, theme: &Theme) -> Style {
    match status {
        AppointmentStatus::Pending => Style::default().fg(theme.highlight),
        AppointmentStatus::Confirmed => Style::default().fg(theme.accent),
        AppointmentStatus::InProgress => Style::default().fg(theme.success),
        AppointmentStatus::Completed => Style::default().fg(theme.muted),
        AppointmentStatus::Cancelled => Style::default().fg(theme.error),
    }
}

#[derive(Clone, Copy)]
struct Theme {
    bg: Color,
    panel: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    highlight: Color,
    success: Color,
    error: Color,
    accent_dark: Color,
}

impl Theme {
    fn panel_style(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    fn accent_contrast(&self) -> Color {
        if matches!(self.bg, Color::Rgb(240, 242, 246)) {
            self.accent_dark
        } else {
            Color::Black
        }
    }
}

fn theme_from(pref: ThemePreference) -> Theme {
    match pref {
        ThemePreference::Terminal => Theme {
            bg: Color::Reset,
            panel: Color::Reset,
            border: Color::DarkGray,
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            highlight: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            accent_dark: Color::Black,
        },
        ThemePreference::Dark => Theme {
            bg: Color::Rgb(14, 16, 24),
            panel: Color::Rgb(22, 26, 38),
            border: Color::Rgb(56, 70, 96),
            text: Color::Rgb(222, 228, 244),
            muted: Color::Rgb(140, 155, 180),
            accent: Color::Rgb(96, 192, 220),
            highlight: Color::Rgb(250, 200, 110),
            success: Color::Rgb(125, 215, 150),
            error: Color::Rgb(250, 125, 125),
            accent_dark: Color::Rgb(20, 55, 80),
        },
        ThemePreference::Light => Theme {
            bg: Color::Rgb(240, 242, 246),
            panel: Color::Rgb(255, 255, 255),
            border: Color::Rgb(205, 215, 230),
            text: Color::Rgb(30, 36, 48),
            muted: Color::Rgb(95, 115, 140),
            accent: Color::Rgb(40, 130, 170),
            highlight: Color::Rgb(220, 140, 40),
            success: Color::Rgb(40, 145, 95),
            error: Color::Rgb(205, 65, 80),
            accent_dark: Color::Rgb(16, 40, 60),
        },
    }
}
