mod components;

use std::sync::OnceLock;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};

use crate::app::{
    App, Popup, Screen, Tab, INVITE_FIELD_BUTTONS, INVITE_FIELD_CONTACT, INVITE_FIELD_NAME,
    INVITE_FIELD_RELATION, ONBOARDING_SLIDES,
};
use crate::catalog::Category;
use crate::family::invite::{ContactMethod, InvitationFlow, InviteStep, Relationship, DEMO_CODE};
use crate::family::share::{ShareChannel, INVITE_LINK};
use crate::family::{self, MemberStatus, MAX_MEMBERS};
use crate::notify::ToastKind;
use crate::player::{format_time, Playback};
use crate::theme::Theme;

use components::{progress_bar, step_dots};

// Load theme colors once at startup
static THEME: OnceLock<Theme> = OnceLock::new();

fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::load)
}

// Helper functions to get theme colors
fn accent() -> Color { theme().accent }
fn accent_bright() -> Color { theme().accent_bright }
fn inactive() -> Color { theme().inactive }
fn success() -> Color { theme().success }
fn warning() -> Color { theme().warning }
fn danger() -> Color { theme().danger }
fn text() -> Color { theme().text }
fn text_dim() -> Color { theme().text_dim }
fn bg_selected() -> Color { theme().bg_selected }
fn header() -> Color { theme().header }

fn avatar_color(index: usize) -> Color {
    let palette = &theme().avatars;
    palette[index % palette.len()]
}

pub fn draw(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Onboarding => draw_onboarding(f, app),
        Screen::Profiles => draw_profiles(f, app),
        Screen::Dashboard => draw_dashboard(f, app),
        Screen::Player => draw_player(f, app),
    }

    // Draw popups on top
    match app.popup {
        Popup::None => {}
        Popup::Invite => draw_invite_popup(f, app),
        Popup::Share => draw_share_popup(f, app),
        Popup::ConfirmRemove => draw_confirm_popup(f, app),
        Popup::Help => draw_help_popup(f),
    }
}

// ---- onboarding ----

fn draw_onboarding(f: &mut Frame, app: &App) {
    let area = centered_rect(70, 60, f.area());
    let (title, description) = ONBOARDING_SLIDES[app.onboarding_step.min(ONBOARDING_SLIDES.len() - 1)];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(2),
            Constraint::Length(2),
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled("▶ ", Style::default().fg(header())),
        Span::styled("FAMSTREAM", Style::default().fg(header()).add_modifier(Modifier::BOLD)),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(logo, chunks[0]);

    let heading = Paragraph::new(Span::styled(
        title,
        Style::default().fg(accent()).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[1]);

    let body = Paragraph::new(Span::styled(description, Style::default().fg(text_dim())))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(body, chunks[2]);

    let dots = Paragraph::new(step_dots(
        app.onboarding_step,
        ONBOARDING_SLIDES.len(),
        Style::default().fg(accent()),
        Style::default().fg(inactive()),
    ))
    .alignment(Alignment::Center);
    f.render_widget(dots, chunks[3]);

    let last = app.onboarding_step + 1 == ONBOARDING_SLIDES.len();
    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(
            if last { " start │ " } else { " next │ " },
            Style::default().fg(text_dim()),
        ),
        Span::styled("s", Style::default().fg(accent())),
        Span::styled(" skip", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[4]);
}

// ---- profile picker ----

fn draw_profiles(f: &mut Frame, app: &App) {
    let area = centered_rect(80, 60, f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(2),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(area);

    let heading = Paragraph::new(Span::styled(
        "Who's watching?",
        Style::default().fg(accent()).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[0]);

    let sub = Paragraph::new(Span::styled(
        "Pick your profile for personal recommendations",
        Style::default().fg(text_dim()),
    ))
    .alignment(Alignment::Center);
    f.render_widget(sub, chunks[1]);

    if app.profiles.is_empty() {
        let empty = Paragraph::new("No profiles yet")
            .style(Style::default().fg(text_dim()))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[2]);
    } else {
        let constraints: Vec<Constraint> = app
            .profiles
            .iter()
            .map(|_| Constraint::Ratio(1, app.profiles.len() as u32))
            .collect();
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(chunks[2]);

        for (i, profile) in app.profiles.iter().enumerate() {
            let selected = i == app.selected_profile;
            let border = if selected { accent() } else { inactive() };
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border));

            let name_style = if selected {
                Style::default().fg(text()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(text_dim())
            };
            let card = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("({})", profile.initials),
                    Style::default()
                        .fg(avatar_color(profile.color))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(profile.name.clone(), name_style)),
            ])
            .alignment(Alignment::Center)
            .block(block);
            f.render_widget(card, cells[i]);
        }
    }

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("←→", Style::default().fg(accent())),
        Span::styled(" choose │ ", Style::default().fg(text_dim())),
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(" watch │ ", Style::default().fg(text_dim())),
        Span::styled("q", Style::default().fg(accent())),
        Span::styled(" quit", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, chunks[3]);
}

// ---- dashboard ----

fn draw_dashboard(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header with tabs
            Constraint::Length(1), // info line
            Constraint::Min(5),    // tab content
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    draw_dashboard_header(f, app, chunks[0]);
    draw_info_line(f, app, chunks[1]);
    match app.tab {
        Tab::Catalog => draw_catalog(f, app, chunks[2]),
        Tab::Family => draw_family(f, app, chunks[2]),
    }
    draw_footer(f, app, chunks[3]);
}

fn draw_dashboard_header(f: &mut Frame, app: &App, area: Rect) {
    let tab_style = |active: bool| {
        if active {
            Style::default().fg(header()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        }
    };

    let mut spans = vec![
        Span::styled("▶ FAMSTREAM  ", Style::default().fg(header()).add_modifier(Modifier::BOLD)),
        Span::styled("Home", tab_style(app.tab == Tab::Catalog)),
        Span::styled("  ", Style::default()),
        Span::styled("Family", tab_style(app.tab == Tab::Family)),
    ];

    if app.tab == Tab::Catalog {
        spans.push(Span::styled("   │ ", Style::default().fg(inactive())));
        for category in Category::ALL {
            let style = if category == app.category {
                Style::default().fg(accent()).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(text_dim())
            };
            spans.push(Span::styled(format!("{} ", category.label()), style));
        }
        spans.push(Span::styled("│ ", Style::default().fg(inactive())));
        let search_style = if app.search_active {
            Style::default().fg(accent())
        } else {
            Style::default().fg(text_dim())
        };
        let cursor = if app.search_active { "_" } else { "" };
        spans.push(Span::styled(
            format!("Search: {}{}", app.search_query, cursor),
            search_style,
        ));
    }

    let head = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(inactive())),
    );
    f.render_widget(head, area);
}

fn draw_info_line(f: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(ref toast) = app.toast {
        let color = match toast.kind {
            ToastKind::Info => warning(),
            ToastKind::Success => success(),
            ToastKind::Error => danger(),
        };
        Line::from(vec![
            Span::styled(toast.title.clone(), Style::default().fg(color).add_modifier(Modifier::BOLD)),
            Span::styled(" │ ", Style::default().fg(text_dim())),
            Span::styled(toast.body.clone(), Style::default().fg(color)),
        ])
    } else {
        let slots = app.roster.free_slots();
        Line::from(Span::styled(
            format!(
                "{}/{} family members · {} free slot{}",
                app.roster.len(),
                MAX_MEMBERS,
                slots,
                if slots == 1 { "" } else { "s" }
            ),
            Style::default().fg(text_dim()),
        ))
    };

    let info = Paragraph::new(line).alignment(Alignment::Center);
    f.render_widget(info, area);
}

fn draw_catalog(f: &mut Frame, app: &App, area: Rect) {
    let continue_entries = app
        .active_profile
        .map(|id| app.watch_log.for_profile(id))
        .unwrap_or(&[]);

    let mut constraints = Vec::new();
    if !continue_entries.is_empty() {
        constraints.push(Constraint::Length(4));
    }
    let rows = app.visible_rows();
    for _ in &rows {
        constraints.push(Constraint::Ratio(1, rows.len().max(1) as u32));
    }
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut chunk_idx = 0;
    if !continue_entries.is_empty() {
        draw_continue_watching(f, continue_entries, chunks[chunk_idx]);
        chunk_idx += 1;
    }

    for (row_idx, row) in rows.iter().enumerate() {
        draw_movie_row(f, app, row_idx, row, chunks[chunk_idx]);
        chunk_idx += 1;
    }
}

fn draw_continue_watching(
    f: &mut Frame,
    entries: &[crate::profiles::WatchProgress],
    area: Rect,
) {
    let block = Block::default()
        .title(Span::styled(" Continue watching ", Style::default().fg(text_dim())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));

    let mut spans = Vec::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  │  ", Style::default().fg(inactive())));
        }
        spans.push(Span::styled(entry.title.clone(), Style::default().fg(text())));
        spans.push(Span::styled(
            format!(" · {} · {}%", entry.detail, entry.percent),
            Style::default().fg(text_dim()),
        ));
    }

    let list = Paragraph::new(Line::from(spans)).block(block);
    f.render_widget(list, area);
}

fn draw_movie_row(f: &mut Frame, app: &App, row_idx: usize, row: &crate::catalog::MovieRow, area: Rect) {
    let is_active = row_idx == app.selected_row;
    let border_color = if is_active { accent() } else { inactive() };
    let title_style = if is_active {
        Style::default().fg(accent()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(inactive())
    };

    let block = Block::default()
        .title(Span::styled(format!(" {} ", row.title), title_style))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if row.movies.is_empty() {
        let empty = Paragraph::new("  Nothing matches the current filters")
            .style(Style::default().fg(text_dim()))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let mut spans = vec![Span::raw(" ")];
    for (i, movie) in row.movies.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let selected = is_active && i == app.selected_movie;
        let style = if selected {
            Style::default().bg(bg_selected()).fg(text()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text())
        };
        spans.push(Span::styled(format!(" {} ", movie.title), style));
        spans.push(Span::styled(
            format!("{} · ★{:.1} · {}", movie.genre, movie.rating, movie.year),
            Style::default().fg(text_dim()),
        ));
        if movie.is_new {
            spans.push(Span::styled(" NEW", Style::default().fg(accent_bright())));
        }
    }

    let list = Paragraph::new(Line::from(spans))
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(list, area);
}

// ---- family tab ----

fn draw_family(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // plan summary
            Constraint::Length(9),  // savings
            Constraint::Min(5),     // member list
        ])
        .split(area);

    draw_plan_summary(f, app, chunks[0]);
    draw_savings(f, app, chunks[1]);
    draw_member_list(f, app, chunks[2]);
}

fn draw_plan_summary(f: &mut Frame, app: &App, area: Rect) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let savings = family::savings(app.roster.len());

    let stat = |title: &str, value: String, detail: String| {
        Paragraph::new(vec![
            Line::from(Span::styled(value, Style::default().fg(text()).add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(detail, Style::default().fg(text_dim()))),
        ])
        .block(
            Block::default()
                .title(Span::styled(format!(" {title} "), Style::default().fg(text_dim())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(inactive())),
        )
    };

    f.render_widget(
        stat(
            "Family plan",
            format!("₽{} / month", family::FAMILY_PRICE),
            format!("₽{} per member", savings.per_member_price),
        ),
        cells[0],
    );
    f.render_widget(
        stat(
            "Members",
            format!("{}/{}", app.roster.len(), MAX_MEMBERS),
            "active subscription".to_string(),
        ),
        cells[1],
    );
    f.render_widget(
        stat(
            "Next billing",
            "15.02".to_string(),
            "renews automatically".to_string(),
        ),
        cells[2],
    );
}

fn draw_savings(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Your savings ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(inactive()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let savings = family::savings(app.roster.len());
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("₽{} ", savings.per_member_saving.max(0)),
                Style::default().fg(success()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("saved per member every month vs an individual plan ", Style::default().fg(text_dim())),
            Span::styled(
                format!("(₽{} → ₽{})", family::INDIVIDUAL_PRICE, savings.per_member_price),
                Style::default().fg(text_dim()),
            ),
        ]),
        Line::from(vec![
            Span::styled(
                format!("₽{} ", savings.total_saving.max(0)),
                Style::default().fg(success()).add_modifier(Modifier::BOLD),
            ),
            Span::styled("total family savings every month", Style::default().fg(text_dim())),
        ]),
        Line::from(""),
    ];

    for count in 1..=MAX_MEMBERS {
        let percent = family::family_saving_percent(count);
        let is_current = count == app.roster.len();
        let label_style = if is_current {
            Style::default().fg(text()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        };
        let bar_style = if is_current {
            Style::default().fg(accent())
        } else {
            Style::default().fg(inactive())
        };
        let mut spans = vec![Span::styled(
            format!("{count} member{} ", if count == 1 { " " } else { "s" }),
            label_style,
        )];
        spans.extend(
            progress_bar(
                percent.clamp(0, 100) as u8,
                20,
                bar_style,
                Style::default().fg(inactive()),
            )
            .spans,
        );
        spans.push(Span::styled(format!(" {percent:>3}%"), label_style));
        lines.push(Line::from(spans));
    }

    let body = Paragraph::new(lines);
    f.render_widget(body, inner);
}

fn draw_member_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(Span::styled(" Family members ", Style::default().fg(accent()).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    let table_header = Row::new(vec![
        Span::styled("", Style::default().fg(header())),
        Span::styled("Name", Style::default().fg(header())),
        Span::styled("Contact", Style::default().fg(header())),
        Span::styled("Joined", Style::default().fg(header())),
        Span::styled("Verified via", Style::default().fg(header())),
    ]);

    let rows: Vec<Row> = app
        .roster
        .members()
        .iter()
        .enumerate()
        .map(|(i, member)| {
            let row_style = if i == app.selected_member {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default()
            };

            let mut name = member.name.clone();
            if member.is_owner {
                name.push_str("  [owner]");
            }
            if member.status == MemberStatus::Pending {
                name.push_str("  [pending]");
            }
            let name_color = if member.is_owner { accent_bright() } else { text() };

            let verified = member
                .verification
                .map(|m| m.label())
                .unwrap_or("—");

            Row::new(vec![
                Span::styled(
                    format!("({})", member.initials),
                    Style::default().fg(avatar_color(i)),
                ),
                Span::styled(name, Style::default().fg(name_color)),
                Span::styled(member.contact.clone(), Style::default().fg(text_dim())),
                Span::styled(
                    member.joined.format("%d.%m.%Y").to_string(),
                    Style::default().fg(text_dim()),
                ),
                Span::styled(verified.to_string(), Style::default().fg(text_dim())),
            ])
            .style(row_style)
        })
        .collect();

    let widths = vec![
        Constraint::Length(6),
        Constraint::Percentage(32),
        Constraint::Percentage(28),
        Constraint::Percentage(14),
        Constraint::Percentage(16),
    ];

    let table = Table::new(rows, widths)
        .header(table_header.style(Style::default()))
        .block(block);

    f.render_widget(table, area);
}

// ---- player ----

fn draw_player(f: &mut Frame, app: &App) {
    let Some(pb) = app.playback.as_ref() else {
        return;
    };
    let area = f.area();

    if !pb.controls_visible() {
        let glyph = if pb.playing { "▶" } else { "⏸" };
        let center = Paragraph::new(Span::styled(
            glyph,
            Style::default().fg(inactive()).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        let middle = centered_rect(20, 20, area);
        f.render_widget(center, middle);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title bar
            Constraint::Min(3),    // stage
            Constraint::Length(3), // progress + controls
        ])
        .split(area);

    draw_player_title(f, pb, chunks[0]);

    let glyph = if pb.playing { "▶ playing" } else { "⏸ paused" };
    let stage = Paragraph::new(Span::styled(glyph, Style::default().fg(text_dim())))
        .alignment(Alignment::Center);
    let middle = centered_rect(30, 30, chunks[1]);
    f.render_widget(stage, middle);

    draw_player_controls(f, pb, chunks[2]);
}

fn draw_player_title(f: &mut Frame, pb: &Playback, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("{}  ", pb.title),
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        ),
        Span::styled("2024 · Drama · 2h 02m", Style::default().fg(text_dim())),
        Span::styled(
            if pb.fullscreen { "  [fullscreen]" } else { "" },
            Style::default().fg(text_dim()),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(inactive())),
    );
    f.render_widget(title, area);
}

fn draw_player_controls(f: &mut Frame, pb: &Playback, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let ratio = if pb.duration == 0 {
        0.0
    } else {
        pb.position as f64 / pb.duration as f64
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(accent()))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{} / {}", format_time(pb.position), format_time(pb.duration)),
            Style::default().fg(text()),
        ));
    f.render_widget(gauge, chunks[0]);

    let volume_icon = match pb.volume {
        0 => "🔇",
        1..=49 => "🔉",
        _ => "🔊",
    };
    let state = Paragraph::new(Line::from(vec![
        Span::styled(
            if pb.playing { "▶ " } else { "⏸ " },
            Style::default().fg(accent()),
        ),
        Span::styled(format!("{volume_icon} {}%", pb.volume), Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(state, chunks[1]);

    let hints = Paragraph::new(Line::from(vec![
        Span::styled("Space", Style::default().fg(accent())),
        Span::styled(" play/pause │ ", Style::default().fg(text_dim())),
        Span::styled("←→", Style::default().fg(accent())),
        Span::styled(" ±10s │ ", Style::default().fg(text_dim())),
        Span::styled("-+", Style::default().fg(accent())),
        Span::styled(" volume │ ", Style::default().fg(text_dim())),
        Span::styled("f", Style::default().fg(accent())),
        Span::styled(" fullscreen │ ", Style::default().fg(text_dim())),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::styled(" back", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hints, chunks[2]);
}

// ---- footer ----

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let hints: Vec<(&str, &str)> = match app.tab {
        Tab::Catalog => vec![
            ("↑↓←→", "Nav"),
            ("Enter", "Play"),
            ("/", "Search"),
            ("c", "Category"),
            ("Tab", "Family"),
            ("p", "Profiles"),
            ("?", "Help"),
        ],
        Tab::Family => vec![
            ("↑↓", "Nav"),
            ("i", "Invite"),
            ("s", "Share"),
            ("d", "Remove"),
            ("Tab", "Catalog"),
            ("?", "Help"),
        ],
    };

    // Responsive: show fewer hints on narrow terminals
    let max_hints = if area.width < 60 {
        4
    } else if area.width < 80 {
        5
    } else {
        hints.len()
    };

    let hint_spans: Vec<Span> = hints
        .iter()
        .take(max_hints)
        .flat_map(|(key, action)| {
            vec![
                Span::styled(*key, Style::default().fg(accent())),
                Span::styled(format!(" {} │ ", action), Style::default().fg(text_dim())),
            ]
        })
        .collect();

    let footer = Paragraph::new(Line::from(hint_spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}

// ---- popups ----

fn draw_invite_popup(f: &mut Frame, app: &App) {
    let Some(flow) = app.invite.as_ref() else {
        return;
    };
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 90 { 90 } else { 60 },
        if area.height < 30 { 90 } else { 75 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Add a family member ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    f.render_widget(block, popup_area);

    match flow.step {
        InviteStep::Method => draw_invite_method(f, app, flow, popup_area),
        InviteStep::Contact if !flow.code_sent => draw_invite_contact(f, app, flow, popup_area),
        InviteStep::Contact => draw_invite_code(f, app, flow, popup_area),
    }
}

fn draw_invite_method(f: &mut Frame, app: &App, flow: &InvitationFlow, area: Rect) {
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "How should we reach them?",
            Style::default().fg(text()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Confirming the relationship takes one verification code",
            Style::default().fg(text_dim()),
        )),
    ]);
    f.render_widget(intro, inner[0]);

    let option = |idx: usize, method: ContactMethod, title: &str, hint: &str| {
        let highlighted = app.invite_method_cursor == idx;
        let chosen = flow.method == Some(method);
        let border = if highlighted { accent() } else { inactive() };
        let marker = if chosen { "(•)" } else { "( )" };
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" {marker} "), Style::default().fg(accent())),
            Span::styled(title.to_string(), Style::default().fg(text()).add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {hint}"), Style::default().fg(text_dim())),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
    };

    f.render_widget(
        option(0, ContactMethod::Email, "Email", "we'll send the code to their inbox"),
        inner[1],
    );
    f.render_widget(
        option(1, ContactMethod::Phone, "Phone number", "we'll text the code via SMS"),
        inner[2],
    );

    let shield = Paragraph::new(vec![
        Line::from(Span::styled("Fraud protection", Style::default().fg(warning()))),
        Line::from(Span::styled(
            "Relationship confirmation keeps strangers off your plan",
            Style::default().fg(text_dim()),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::LEFT)
            .border_style(Style::default().fg(warning())),
    );
    f.render_widget(shield, inner[3]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(accent())),
        Span::styled(" move │ ", Style::default().fg(text_dim())),
        Span::styled("Space", Style::default().fg(accent())),
        Span::styled(" select │ ", Style::default().fg(text_dim())),
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(" continue │ ", Style::default().fg(text_dim())),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::styled(" cancel", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, inner[4]);
}

fn input_box<'a>(title: &'a str, value: String, focused: bool) -> Paragraph<'a> {
    let border = if focused { accent() } else { inactive() };
    let cursor = if focused { "_" } else { "" };
    Paragraph::new(format!("{value}{cursor}"))
        .style(Style::default().fg(text()))
        .block(
            Block::default()
                .title(Span::styled(
                    format!(" {title} "),
                    Style::default().fg(if focused { accent() } else { header() }),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        )
}

fn draw_invite_contact(f: &mut Frame, app: &App, flow: &InvitationFlow, area: Rect) {
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    f.render_widget(
        input_box(
            "Full name",
            flow.member_name.clone(),
            app.invite_focus == INVITE_FIELD_NAME,
        ),
        inner[0],
    );

    let contact_title = match flow.method {
        Some(ContactMethod::Phone) => "Phone number",
        _ => "Email address",
    };
    f.render_widget(
        input_box(
            contact_title,
            flow.contact.clone(),
            app.invite_focus == INVITE_FIELD_CONTACT,
        ),
        inner[1],
    );

    // relationship selector
    let rel_focused = app.invite_focus == INVITE_FIELD_RELATION;
    let rel_border = if rel_focused { accent() } else { inactive() };
    let mut rel_spans = vec![Span::raw(" ")];
    for (i, rel) in Relationship::ALL.iter().enumerate() {
        if i > 0 {
            rel_spans.push(Span::styled(" · ", Style::default().fg(inactive())));
        }
        let chosen = flow.relationship == Some(*rel);
        let style = if chosen {
            Style::default().fg(accent()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(text_dim())
        };
        rel_spans.push(Span::styled(rel.label(), style));
    }
    let rel = Paragraph::new(Line::from(rel_spans)).block(
        Block::default()
            .title(Span::styled(
                " Relationship ",
                Style::default().fg(if rel_focused { accent() } else { header() }),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(rel_border)),
    );
    f.render_widget(rel, inner[2]);

    // action buttons
    let buttons_focused = app.invite_focus == INVITE_FIELD_BUTTONS;
    let button = |label: &str, selected: bool, color: Color| {
        let style = if selected && buttons_focused {
            Style::default().fg(color).bg(bg_selected()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("[ {label} ]"), style)
    };
    let buttons = Paragraph::new(Line::from(vec![
        button("Send confirmation code", app.invite_button == 0, success()),
        Span::raw("   "),
        button("Back", app.invite_button == 1, text_dim()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if buttons_focused { accent() } else { inactive() })),
    );
    f.render_widget(buttons, inner[3]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Tab", Style::default().fg(accent())),
        Span::styled(" next field │ ", Style::default().fg(text_dim())),
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(" confirm │ ", Style::default().fg(text_dim())),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::styled(" cancel", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, inner[4]);
}

fn draw_invite_code(f: &mut Frame, app: &App, flow: &InvitationFlow, area: Rect) {
    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(area);

    let sent_to = Paragraph::new(vec![
        Line::from(Span::styled("Code sent", Style::default().fg(success()).add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!(
                "Check the {} at {}",
                flow.method.map(|m| m.inbox_hint()).unwrap_or("inbox"),
                flow.contact
            ),
            Style::default().fg(text_dim()),
        )),
    ]);
    f.render_widget(sent_to, inner[0]);

    f.render_widget(
        input_box("Confirmation code", flow.code_input.clone(), app.invite_focus == 0),
        inner[1],
    );

    let demo_hint = Paragraph::new(Span::styled(
        format!("Demo build accepts: {DEMO_CODE}"),
        Style::default().fg(text_dim()),
    ));
    f.render_widget(demo_hint, inner[2]);

    let buttons_focused = app.invite_focus == 1;
    let button = |label: &str, selected: bool, color: Color| {
        let style = if selected && buttons_focused {
            Style::default().fg(color).bg(bg_selected()).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("[ {label} ]"), style)
    };
    let buttons = Paragraph::new(Line::from(vec![
        button("Confirm", app.invite_button == 0, success()),
        Span::raw("   "),
        button("Send again", app.invite_button == 1, text_dim()),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if buttons_focused { accent() } else { inactive() })),
    );
    f.render_widget(buttons, inner[3]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(" confirm │ ", Style::default().fg(text_dim())),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::styled(" edit details", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, inner[4]);
}

fn draw_share_popup(f: &mut Frame, app: &App) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 90 } else { 55 },
        if area.height < 30 { 80 } else { 60 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(Span::styled(" Invite via link ", Style::default().fg(accent())))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent()));

    f.render_widget(block, popup_area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(popup_area);

    let link = Paragraph::new(INVITE_LINK)
        .style(Style::default().fg(text()))
        .block(
            Block::default()
                .title(Span::styled(" Invite link ", Style::default().fg(header())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(inactive())),
        );
    f.render_widget(link, inner[0]);

    let rows: Vec<Row> = ShareChannel::ALL
        .iter()
        .enumerate()
        .map(|(i, channel)| {
            let row_style = if i == app.share_cursor {
                Style::default().bg(bg_selected()).fg(text())
            } else {
                Style::default()
            };
            Row::new(vec![
                Span::styled(format!("  {}", channel.label()), Style::default().fg(text())),
                Span::styled(channel.hint(), Style::default().fg(text_dim())),
            ])
            .style(row_style)
        })
        .collect();
    let widths = [Constraint::Percentage(40), Constraint::Percentage(60)];
    let table = Table::new(rows, widths);
    f.render_widget(table, inner[1]);

    let how = Paragraph::new(Span::styled(
        "Send the link to a relative; once they confirm the relationship they join the plan",
        Style::default().fg(text_dim()),
    ))
    .wrap(Wrap { trim: true });
    f.render_widget(how, inner[2]);

    let hint = Paragraph::new(Line::from(vec![
        Span::styled("↑↓", Style::default().fg(accent())),
        Span::styled(" choose │ ", Style::default().fg(text_dim())),
        Span::styled("Enter", Style::default().fg(accent())),
        Span::styled(" build link │ ", Style::default().fg(text_dim())),
        Span::styled("Esc", Style::default().fg(accent())),
        Span::styled(" close", Style::default().fg(text_dim())),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(hint, inner[3]);
}

fn draw_confirm_popup(f: &mut Frame, app: &App) {
    let popup_area = centered_rect(45, 25, f.area());

    f.render_widget(Clear, popup_area);

    let name = app
        .member_to_remove
        .and_then(|id| app.roster.members().iter().find(|m| m.id == id))
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "this member".to_string());

    let confirm = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Remove {name} from the family plan?"),
            Style::default().fg(warning()),
        )),
        Line::from(Span::styled(
            "They will lose access to all content",
            Style::default().fg(text_dim()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", Style::default().fg(danger()).add_modifier(Modifier::BOLD)),
            Span::raw(" Remove   "),
            Span::styled("n", Style::default().fg(success()).add_modifier(Modifier::BOLD)),
            Span::raw(" Keep"),
        ]),
    ])
    .block(
        Block::default()
            .title(Span::styled(" Remove member? ", Style::default().fg(warning())))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(warning())),
    )
    .alignment(Alignment::Center);

    f.render_widget(confirm, popup_area);
}

fn draw_help_popup(f: &mut Frame) {
    let area = f.area();
    let popup_area = centered_rect(
        if area.width < 80 { 95 } else { 60 },
        if area.height < 40 { 90 } else { 70 },
        area,
    );

    f.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(Span::styled("═══ Navigation ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Tab       ", Style::default().fg(accent())),
            Span::raw("Switch between Home and Family"),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓ j/k   ", Style::default().fg(accent())),
            Span::raw("Move through rows and lists"),
        ]),
        Line::from(vec![
            Span::styled("  p         ", Style::default().fg(accent())),
            Span::raw("Back to the profile picker"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Catalog ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  /         ", Style::default().fg(accent())),
            Span::raw("Search titles"),
        ]),
        Line::from(vec![
            Span::styled("  c         ", Style::default().fg(accent())),
            Span::raw("Cycle category filter"),
        ]),
        Line::from(vec![
            Span::styled("  Enter     ", Style::default().fg(accent())),
            Span::raw("Play the selected title"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Family ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  i         ", Style::default().fg(accent())),
            Span::raw("Invite a member (code verification)"),
        ]),
        Line::from(vec![
            Span::styled("  s         ", Style::default().fg(accent())),
            Span::raw("Share the invite link"),
        ]),
        Line::from(vec![
            Span::styled("  d         ", Style::default().fg(accent())),
            Span::raw("Remove the selected member"),
        ]),
        Line::from(""),
        Line::from(Span::styled("═══ Player ═══", Style::default().fg(header()).add_modifier(Modifier::BOLD))),
        Line::from(vec![
            Span::styled("  Space     ", Style::default().fg(accent())),
            Span::raw("Play / pause"),
        ]),
        Line::from(vec![
            Span::styled("  ←/→       ", Style::default().fg(accent())),
            Span::raw("Seek 10 seconds"),
        ]),
        Line::from(vec![
            Span::styled("  -/+       ", Style::default().fg(accent())),
            Span::raw("Volume"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Press ", Style::default().fg(text_dim())),
            Span::styled("?", Style::default().fg(accent())),
            Span::styled("/", Style::default().fg(text_dim())),
            Span::styled("Esc", Style::default().fg(accent())),
            Span::styled(" to close", Style::default().fg(text_dim())),
        ]),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .title(Span::styled(" famstream Help ", Style::default().fg(accent())))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent())),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(help, popup_area);
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

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
