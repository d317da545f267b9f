use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::App;
use crate::detail::{DetailView, Phase};
use crate::types::{ComicDetail, ComicSummary};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    match app.view.phase() {
        Phase::NotFound => render_centered(
            frame,
            area,
            Line::from(Span::styled(
                "Comic not found",
                Style::default().fg(Color::Gray),
            )),
        ),
        Phase::Loading => render_centered(
            frame,
            area,
            Line::from(vec![
                Span::styled(
                    SPINNER[app.ticks % SPINNER.len()],
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(" Loading..."),
            ]),
        ),
        Phase::Error(message) => render_error(frame, message, area),
        Phase::Ready => render_ready(frame, app, area),
    }
}

fn render_centered(frame: &mut Frame, area: Rect, line: Line) {
    let top = area.height.saturating_sub(1) / 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(top), Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Something went wrong",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Red))),
    ];
    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    frame.render_widget(body, area);
}

fn render_ready(frame: &mut Frame, app: &App, area: Rect) {
    let view = &app.view;
    let (Some(comic), Some(detail)) = (view.comic(), view.detail()) else {
        return;
    };

    let resume_height = if view.show_resume() { 4 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Length(resume_height),
            Constraint::Length(8),
            Constraint::Min(3),
        ])
        .split(area);

    render_summary(frame, comic, detail, chunks[0]);
    if resume_height > 0 {
        render_resume(frame, view, chunks[1]);
    }

    let synopsis = Paragraph::new(detail.synopsis())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("Synopsis"));
    frame.render_widget(synopsis, chunks[2]);

    render_chapters(frame, view, app.grid_columns, chunks[3]);
}

fn render_summary(frame: &mut Frame, comic: &ComicSummary, detail: &ComicDetail, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(Span::styled(
            comic.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Chapter: ", label),
            Span::styled(comic.chapter.as_str(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::styled("Source: ", label),
            Span::styled(
                format!(" {} ", detail.creator()),
                Style::default().fg(Color::White).bg(Color::Blue),
            ),
        ]),
        Line::from(vec![
            Span::styled("Cover: ", label),
            Span::styled(comic.image.as_str(), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let summary =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Comic"));
    frame.render_widget(summary, area);
}

fn render_resume(frame: &mut Frame, view: &DetailView, area: Rect) {
    let Some(history) = view.history() else {
        return;
    };
    let lines = vec![
        Line::from(vec![
            Span::styled("Last read: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("Chapter {}", history.last_chapter),
                Style::default().fg(Color::Magenta),
            ),
        ]),
        Line::from(vec![
            Span::styled("[c]", Style::default().fg(Color::Green)),
            Span::raw(format!(" continue chapter {}", history.last_chapter)),
        ]),
    ];

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(Span::styled(
                " Continue Reading ",
                Style::default().add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(panel, area);
}

fn render_chapters(frame: &mut Frame, view: &DetailView, columns: usize, area: Rect) {
    let chapters = view.chapters();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Chapters ({}) ", chapters.len()));

    if chapters.is_empty() {
        let empty = Paragraph::new("No chapters")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    }

    let columns = columns.max(1);
    let cell_width = (area.width.saturating_sub(2) as usize / columns).max(4);
    let visible_rows = area.height.saturating_sub(2).max(1) as usize;
    let selected_row = view.selected() / columns;
    let first_row = (selected_row + 1).saturating_sub(visible_rows);

    let lines: Vec<Line> = chapters
        .chunks(columns)
        .enumerate()
        .skip(first_row)
        .take(visible_rows)
        .map(|(row, cells)| {
            let spans = cells
                .iter()
                .enumerate()
                .map(|(col, chapter)| {
                    let index = row * columns + col;
                    let mut style = if view.is_current(chapter) {
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::Cyan)
                    };
                    if index == view.selected() {
                        style = style.add_modifier(Modifier::REVERSED);
                    }
                    let width = cell_width - 1;
                    let label = fit(chapter.chapter.as_str(), width);
                    Span::styled(format!("{:^width$}", label), style)
                })
                .flat_map(|cell| [cell, Span::raw(" ")])
                .collect::<Vec<_>>();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Truncate to `width` chars, marking the cut with `~`.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}
