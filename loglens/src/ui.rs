//! UI rendering for the TUI.

use loglens_core::format::{category_label, format_relative_time};
use loglens_core::{
    ChatMessage, InsightModel, NoticeLevel, SectionKind, ThreatCategory, ThreatLevel,
};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus};

/// Orange for suspicious activity
const ORANGE: Color = Color::Rgb(255, 165, 0);
/// Border color for the focused input
const BORDER_FOCUS: Color = Color::Rgb(0, 180, 180);
/// Border color for unfocused blocks
const BORDER_DIM: Color = Color::Rgb(90, 90, 90);

/// Badge color and label for a threat category.
fn threat_style(category: ThreatCategory) -> (Color, &'static str) {
    let color = match category {
        ThreatCategory::Critical => Color::Red,
        ThreatCategory::Warning => Color::Yellow,
        ThreatCategory::Normal => Color::Green,
        ThreatCategory::Unknown => Color::Gray,
    };
    (color, category_label(category))
}

fn section_color(kind: SectionKind) -> Color {
    match kind {
        SectionKind::Findings => Color::Blue,
        SectionKind::Anomalies => Color::Red,
        SectionKind::SuspiciousActivities => ORANGE,
        SectionKind::Insights => Color::Yellow,
        SectionKind::Recommendations => Color::Green,
    }
}

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Layout: header, two panels, footer
    let chunks = Layout::vertical([
        Constraint::Length(2), // Header
        Constraint::Min(8),    // Panels
        Constraint::Length(1), // Footer
    ])
    .split(area);

    render_header(frame, chunks[0]);

    let panels =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(chunks[1]);
    render_left_panel(frame, app, panels[0]);
    render_right_panel(frame, app, panels[1]);

    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new("loglens · log analysis")
        .style(Style::default().fg(Color::Cyan).bold())
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn input_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused { BORDER_FOCUS } else { BORDER_DIM };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

/// Left panel: file field and summary.
fn render_left_panel(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // File input
        Constraint::Min(3),    // Summary
    ])
    .split(area);

    let focused = app.focus == Focus::File;
    let mut spans = vec![Span::raw(app.file_input.clone())];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(BORDER_FOCUS)));
    }
    let input = Paragraph::new(Line::from(spans))
        .block(input_block(" Log file (Enter to upload) ", focused));
    frame.render_widget(input, chunks[0]);

    let lines = match app.session.state().insights() {
        Some(model) => build_insight_lines(model),
        None => vec![Line::from(Span::styled(
            "Upload a log file to see summary.",
            Style::default().fg(Color::DarkGray).italic(),
        ))],
    };

    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Summary ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_DIM)),
        );
    frame.render_widget(summary, chunks[1]);
}

fn build_insight_lines(model: &InsightModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(error) = &model.analysis_error {
        lines.push(Line::from(vec![
            Span::styled("Analysis error: ", Style::default().fg(Color::Red).bold()),
            Span::raw(error.clone()),
        ]));
        lines.push(Line::raw(""));
    }

    if let Some(summary) = &model.summary {
        let mut header = vec![Span::styled(
            "System Diagnostics",
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(level) = &model.threat_level {
            let level = ThreatLevel::parse(level);
            let (color, label) = threat_style(level.category());
            header.push(Span::raw("  "));
            header.push(Span::styled(
                format!(" Threat: {} ", level),
                Style::default().fg(Color::Black).bg(color).bold(),
            ));
            header.push(Span::styled(
                format!(" {}", label),
                Style::default().fg(Color::DarkGray),
            ));
        }
        lines.push(Line::from(header));
        lines.push(Line::raw(summary.clone()));
    }

    for section in model.non_empty_sections() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(section_color(section.kind))
                .add_modifier(Modifier::BOLD),
        )));
        for item in section.items {
            lines.push(Line::raw(format!("  • {}", item)));
        }
    }

    lines
}

/// Right panel: conversation, question field, notice line.
fn render_right_panel(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Min(3),    // Chat
        Constraint::Length(3), // Question input
        Constraint::Length(1), // Notice
    ])
    .split(area);

    render_chat(frame, app, chunks[0]);

    let focused = app.focus == Focus::Question;
    let send = if app.send_disabled() { "[...]" } else { "[Send]" };
    let mut spans = vec![Span::raw(app.session.state().pending_question().to_string())];
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(BORDER_FOCUS)));
    }
    let title = format!(" Ask about your logs... {} ", send);
    let input = Paragraph::new(Line::from(spans)).block(input_block(&title, focused));
    frame.render_widget(input, chunks[1]);

    render_notice(frame, app, chunks[2]);
}

fn render_chat(frame: &mut Frame, app: &App, area: Rect) {
    let conversation = app.session.state().conversation();
    let lines: Vec<Line<'static>> = conversation.iter().flat_map(format_message).collect();

    let inner_width = area.width.saturating_sub(2).max(1);
    let inner_height = area.height.saturating_sub(2);
    let total = wrapped_height(&lines, inner_width);
    let offset = total
        .saturating_sub(inner_height)
        .saturating_sub(app.chat_scroll);

    let chat = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((offset, 0))
        .block(
            Block::default()
                .title(format!(" Questions ({}) ", conversation.len()))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_DIM)),
        );
    frame.render_widget(chat, area);
}

fn format_message(msg: &ChatMessage) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if msg.is_user() {
        lines.push(Line::from(vec![
            Span::styled("you › ", Style::default().fg(Color::Cyan).bold()),
            Span::raw(msg.text.clone()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("assistant › ", Style::default().fg(Color::Green).bold()),
            Span::raw(msg.text.clone()),
        ]));
        for (title, items) in [
            ("Findings:", msg.detail_findings()),
            ("Recommendations:", msg.detail_recommendations()),
        ] {
            if items.is_empty() {
                continue;
            }
            lines.push(Line::from(Span::styled(
                format!("    {}", title),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for item in items {
                lines.push(Line::raw(format!("      • {}", item)));
            }
        }
    }

    lines.push(Line::raw(""));
    lines
}

/// Rows the lines occupy once wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().max(1).div_ceil(width))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_notice(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };

    let color = match notice.level {
        NoticeLevel::Info => Color::Green,
        NoticeLevel::Error => Color::Red,
    };
    let line = Line::from(vec![
        Span::styled(format!(" {}", notice.message), Style::default().fg(color)),
        Span::styled(
            format!("  {}", format_relative_time(notice.raised_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut footer_spans = vec![
        Span::styled(" Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" switch field  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" upload/send  "),
        Span::styled("Ctrl-E", Style::default().fg(Color::Yellow)),
        Span::raw(" export report  "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ];

    let pending = app.session.in_flight();
    if pending > 0 {
        footer_spans.push(Span::raw("  │ "));
        footer_spans.push(Span::styled(
            format!("● {} pending", pending),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(footer_spans)), area);
}
