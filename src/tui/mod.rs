// TUI module for rendering the terminal interface
pub mod colors;
pub mod helpers;
pub mod input;
pub mod settings;

// Re-exports
pub use colors::*;
pub use helpers::{calculate_progress, format_file_size};
pub use input::{
    handle_confirm_input, handle_key_event, handle_prompt_input, handle_settings_input, KeyAction,
    KeyBindings, KeyTrigger, PromptInput, SettingsInput,
};
pub use settings::SettingsState;
use settings::DELETE_ROW;

use crate::domain::{CullSession, SessionState, SessionStats};
use crate::preview::{FileInfo, PreviewCache};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Wrap},
    Frame,
};
use std::path::Path;

/// UI view state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Main image browsing view
    Browsing,
    /// Help overlay visible
    Help,
    /// Key binding and cull mode editor
    Settings,
    /// Typing the path of a directory to load
    OpenPrompt,
    /// Confirmation dialog for a permanent delete
    ConfirmDelete,
    /// Welcome screen shown on first launch
    Welcome,
    /// Summary screen shown on quit
    Summary,
}

fn rounded_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR))
}

fn overlay_block(title: &str, accent: ratatui::style::Color) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(accent))
        .style(Style::default().bg(BG_DARK))
}

fn heading(text: &str) -> Line<'_> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Renders the main view: header, image, status line and controls
pub fn render_browser(
    frame: &mut Frame,
    session: &CullSession,
    status: &str,
    bindings: &KeyBindings,
    preview: &mut PreviewCache,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header with progress
            Constraint::Min(0),    // Image
            Constraint::Length(1), // Status line
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], session);
    render_content(frame, chunks[1], session, preview);
    render_status_line(frame, chunks[2], status);
    render_footer(frame, chunks[3], session, bindings);
}

fn render_header(frame: &mut Frame, area: Rect, session: &CullSession) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(area);

    let (title_text, file_info) = match session.current() {
        Some(path) => {
            let details = match FileInfo::from_path(path) {
                Ok(info) => vec![
                    Span::styled(
                        info.name,
                        Style::default()
                            .fg(TEXT_PRIMARY)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!(
                            "({} • {})",
                            format_file_size(info.size),
                            info.modified.format("%Y-%m-%d %H:%M")
                        ),
                        Style::default().fg(TEXT_SECONDARY),
                    ),
                ],
                Err(_) => vec![Span::styled(
                    path.display().to_string(),
                    Style::default().fg(TEXT_PRIMARY),
                )],
            };
            (
                format!(" Image {}/{} ", session.index() + 1, session.len()),
                details,
            )
        }
        None => {
            let text = match session.source_dir() {
                Some(dir) => dir.display().to_string(),
                None => "No directory loaded".to_string(),
            };
            (
                " PicCull ".to_string(),
                vec![Span::styled(text, Style::default().fg(TEXT_SECONDARY))],
            )
        }
    };

    let title_line = Line::from(vec![Span::styled(
        title_text,
        Style::default()
            .fg(ACCENT_HIGHLIGHT)
            .add_modifier(Modifier::BOLD),
    )]);

    let header = Paragraph::new(vec![title_line, Line::from(file_info)])
        .block(
            Block::default()
                .borders(Borders::TOP | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(header, chunks[0]);

    let stats = session.stats();
    let progress = calculate_progress(stats.culled, stats.found);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::BOTTOM | Borders::LEFT | Borders::RIGHT)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .gauge_style(Style::default().fg(ACCENT_PRIMARY).bg(BG_DARK))
        .ratio(progress)
        .label(format!("culled {}/{}", stats.culled, stats.found));

    frame.render_widget(gauge, chunks[1]);
}

fn render_content(frame: &mut Frame, area: Rect, session: &CullSession, preview: &mut PreviewCache) {
    match session.state() {
        SessionState::Empty => frame.render_widget(
            message_widget(
                "No Directory Loaded",
                &["Press o to choose a directory of images."],
            ),
            area,
        ),
        SessionState::Exhausted => frame.render_widget(
            message_widget(
                "All Done",
                &[
                    "No more images in the directory.",
                    "Step back to review, or press o to load another directory.",
                ],
            ),
            area,
        ),
        SessionState::Browsing => {
            if let Some(path) = session.current() {
                render_image(frame, area, path, preview);
            }
        }
    }
}

fn render_image(frame: &mut Frame, area: Rect, path: &Path, preview: &mut PreviewCache) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let block = rounded_block().title(format!(" {} ", name));
    let inner = block.inner(area);

    match preview.render(path, inner.width, inner.height) {
        Ok(rendered) => {
            // Vertically center the picture
            let pad = (inner.height as usize).saturating_sub(rendered.lines.len()) / 2;
            let mut lines = vec![Line::from(""); pad];
            lines.extend(rendered.lines.iter().cloned());

            let paragraph = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center);
            frame.render_widget(paragraph, area);
        }
        Err(e) => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    "  [!] Cannot display image",
                    Style::default()
                        .fg(ACCENT_PRIMARY)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(format!("  {}", e)),
            ];

            let paragraph = Paragraph::new(lines)
                .block(block.border_style(Style::default().fg(ACCENT_PRIMARY)))
                .style(Style::default().fg(TEXT_PRIMARY))
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
    }
}

fn message_widget<'a>(title: &'a str, body: &[&'a str]) -> Paragraph<'a> {
    let mut lines = vec![Line::from(""), Line::from(""), heading(title), Line::from("")];
    lines.extend(
        body.iter()
            .map(|text| Line::from(Span::styled(*text, Style::default().fg(TEXT_SECONDARY)))),
    );

    Paragraph::new(lines)
        .block(rounded_block())
        .alignment(Alignment::Center)
}

fn render_status_line(frame: &mut Frame, area: Rect, status: &str) {
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(status, Style::default().fg(TEXT_PRIMARY)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Key hint for the footer. Disabled controls are dimmed.
fn control<'a>(key: String, label: &'a str, enabled: bool) -> [Span<'a>; 3] {
    let (key_style, label_style) = if enabled {
        (
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(TEXT_SECONDARY),
        )
    } else {
        (
            Style::default().fg(TEXT_DISABLED),
            Style::default()
                .fg(TEXT_DISABLED)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    };
    [
        Span::styled(format!("{} ", key), key_style),
        Span::styled(label, label_style),
        Span::styled("  │  ", Style::default().fg(BORDER_COLOR)),
    ]
}

fn render_footer(frame: &mut Frame, area: Rect, session: &CullSession, bindings: &KeyBindings) {
    let cull_label = if session.delete_on_cull() {
        "Delete"
    } else {
        "Cull"
    };

    let mut spans: Vec<Span> = Vec::new();
    spans.extend(control(
        bindings.previous.to_string(),
        "Prev",
        session.can_go_prev(),
    ));
    spans.extend(control(bindings.next.to_string(), "Next", session.can_go_next()));
    spans.extend(control(bindings.cull.to_string(), cull_label, session.can_cull()));
    spans.extend(control("o".to_string(), "Open", true));
    spans.extend(control(
        "f".to_string(),
        "Culled",
        session.culled_dir_exists(),
    ));
    spans.extend(control("s".to_string(), "Settings", true));
    spans.extend(control("?".to_string(), "Help", true));
    spans.extend(control("q".to_string(), "Quit", true));
    // Drop the trailing separator
    spans.pop();

    let footer = Paragraph::new(Line::from(spans))
        .block(rounded_block())
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn shortcut_line<'a>(key: String, description: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), Style::default().fg(ACCENT_SECONDARY)),
        Span::raw(description),
    ])
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame, bindings: &KeyBindings) {
    let help_area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, help_area);

    let block = overlay_block(" Help ", ACCENT_HIGHLIGHT);
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_lines = vec![
        Line::from(""),
        heading("Keyboard Shortcuts"),
        Line::from(""),
        shortcut_line(format!("{} / h", bindings.previous), "Previous image"),
        shortcut_line(format!("{} / l", bindings.next), "Next image"),
        shortcut_line(bindings.cull.to_string(), "Cull image"),
        Line::from(""),
        shortcut_line("o".to_string(), "Load directory"),
        shortcut_line("f".to_string(), "Open culled folder"),
        shortcut_line("s".to_string(), "Settings"),
        shortcut_line("?".to_string(), "Toggle help"),
        shortcut_line("q / Esc".to_string(), "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Culled images go to pic-culled/ inside the loaded directory.",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines)
        .alignment(Alignment::Left)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders the settings overlay for a draft
pub fn render_settings_overlay(frame: &mut Frame, settings: &SettingsState) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(" Settings ", ACCENT_HIGHLIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let row_style = |row: usize| {
        if row == settings.selected {
            Style::default()
                .fg(BG_DARK)
                .bg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_PRIMARY)
        }
    };

    let mut lines = vec![Line::from(""), heading("Key Bindings"), Line::from("")];

    for (row, action) in KeyAction::REBINDABLE.iter().enumerate() {
        let key = if settings.capturing && row == settings.selected {
            "press a key…".to_string()
        } else {
            settings
                .bindings
                .get(*action)
                .map(|t| t.to_string())
                .unwrap_or_default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<20}", action.label()), row_style(row)),
            Span::styled(format!(" {:<14}", key), row_style(row)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("  {:<20}", "Delete on cull"),
            row_style(DELETE_ROW),
        ),
        Span::styled(
            format!(" {:<14}", if settings.delete_on_cull { "on" } else { "off" }),
            row_style(DELETE_ROW),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  ↑↓ select   Enter rebind   d toggle delete   a apply   Esc discard",
        Style::default().fg(TEXT_SECONDARY),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

/// Renders the directory prompt with the text typed so far
pub fn render_open_prompt(frame: &mut Frame, input: &str) {
    let area = centered_rect(70, 30, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(" Load Directory ", ACCENT_HIGHLIGHT);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "  Directory path:",
            Style::default().fg(TEXT_SECONDARY),
        )),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled(input, Style::default().fg(TEXT_PRIMARY)),
            Span::styled("█", Style::default().fg(ACCENT_HIGHLIGHT)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter load   Esc cancel   Ctrl+U clear",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Renders the confirmation dialog for a permanent delete
pub fn render_confirm_delete_overlay(frame: &mut Frame, path: &Path) {
    let confirm_area = centered_rect(50, 50, frame.area());
    frame.render_widget(Clear, confirm_area);

    let block = overlay_block(" ⚠ Confirm Delete ", ACCENT_PRIMARY);
    let inner = block.inner(confirm_area);
    frame.render_widget(block, confirm_area);

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let size = FileInfo::from_path(path)
        .map(|info| format_file_size(info.size))
        .unwrap_or_else(|_| "unknown".to_string());

    let confirm_lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Delete this image permanently?",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  File: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(name, Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(vec![
            Span::styled("  Size: ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled(size, Style::default().fg(TEXT_PRIMARY)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "This cannot be undone.",
            Style::default().fg(ACCENT_PRIMARY),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Y]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("es  "),
            Span::styled("[Enter]", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("     "),
            Span::styled("[N]", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("o  "),
            Span::styled("[Esc]", Style::default().fg(ACCENT_SECONDARY)),
        ]),
    ];

    let paragraph = Paragraph::new(confirm_lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Renders the welcome dialog overlay
pub fn render_welcome_overlay(frame: &mut Frame, bindings: &KeyBindings) {
    let area = centered_rect(80, 80, frame.area());
    frame.render_widget(Clear, area);

    let key_style = Style::default()
        .fg(ACCENT_SECONDARY)
        .add_modifier(Modifier::BOLD);

    let welcome_lines = vec![
        Line::from(""),
        heading("Welcome to PicCull!"),
        Line::from(""),
        Line::from("PicCull steps through the images of a directory so you can weed out the ones you don't want."),
        Line::from(""),
        heading("Quick Start:"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  1. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Press "),
            Span::styled("o", key_style),
            Span::raw(" to load a directory (or pass it on the command line)"),
        ]),
        Line::from(vec![
            Span::styled("  2. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Browse with "),
            Span::styled(bindings.previous.to_string(), key_style),
            Span::raw(" and "),
            Span::styled(bindings.next.to_string(), key_style),
        ]),
        Line::from(vec![
            Span::styled("  3. ", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("Press "),
            Span::styled(bindings.cull.to_string(), key_style),
            Span::raw(" to cull the image you are looking at"),
        ]),
        Line::from(""),
        heading("Where do culled images go?"),
        Line::from(""),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("They are moved to "),
            Span::styled("pic-culled/", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" inside the loaded directory"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Press "),
            Span::styled("f", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" to open that folder in your file manager"),
        ]),
        Line::from(vec![
            Span::styled("  •  ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("Enable "),
            Span::styled("delete on cull", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" in settings ("),
            Span::styled("s", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(") to remove files instead"),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to start...",
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )]),
    ];

    let welcome_text = Paragraph::new(welcome_lines)
        .block(overlay_block(" Welcome ", ACCENT_HIGHLIGHT))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false });

    frame.render_widget(welcome_text, area);
}

/// Renders the summary screen shown on quit
pub fn render_summary(frame: &mut Frame, stats: &SessionStats) {
    let summary_area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, summary_area);

    let block = overlay_block(" Session Complete ", ACCENT_HIGHLIGHT);
    let inner = block.inner(summary_area);
    frame.render_widget(block, summary_area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Summary",
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("   Images found:  "),
            Span::styled(
                stats.found.to_string(),
                Style::default()
                    .fg(ACCENT_HIGHLIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("   → ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("Moved:    "),
            Span::styled(
                stats.moved.to_string(),
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("   ✗ ", Style::default().fg(ACCENT_PRIMARY)),
            Span::raw("Deleted:  "),
            Span::styled(
                stats.deleted.to_string(),
                Style::default()
                    .fg(ACCENT_PRIMARY)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("   ✓ ", Style::default().fg(ACCENT_SECONDARY)),
            Span::raw("Kept:     "),
            Span::styled(
                stats.remaining.to_string(),
                Style::default().fg(ACCENT_SECONDARY),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to exit",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(Style::default().fg(TEXT_PRIMARY));

    frame.render_widget(paragraph, inner);
}

/// Helper to create a centered rect
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
