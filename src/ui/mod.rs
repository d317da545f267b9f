mod detail;
mod popup;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::App;
use crate::detail::Phase;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    detail::render(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if let Some(message) = &app.alert {
        popup::render_alert(frame, "Notice", message);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.view.comic() {
        Some(comic) if !comic.title.is_empty() => format!("komik - {}", comic.title),
        _ => format!("komik - {}", app.view.route_id()),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(error) = &app.error {
        Line::from(vec![Span::styled(
            format!("Error: {}", error),
            Style::default().fg(Color::Red),
        )])
    } else {
        let help = match app.view.phase() {
            Phase::Loading => "Loading... | q: quit",
            Phase::NotFound => "H: home | q: quit",
            Phase::Error(_) => "r: retry | H: home | q: quit",
            Phase::Ready if app.view.show_resume() => {
                "h/j/k/l: nav | Enter: read | s: from start | c: continue | o: cover | H: home | q: quit"
            }
            Phase::Ready => "h/j/k/l: nav | Enter: read | s: from start | o: cover | H: home | q: quit",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
