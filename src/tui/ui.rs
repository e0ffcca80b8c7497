//! Stateless UI rendering for tic-tac-toe.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::App;
use crate::games::tictactoe::{GameMode, GameView, Player, Position};

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(1), // Mode
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Status
            Constraint::Length(3), // Error / notice
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    let title = Paragraph::new("Gemini Tic-Tac-Toe")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    draw_mode(frame, chunks[1], app.view().mode);
    draw_board(frame, chunks[2], app.view(), app.cursor());
    draw_status(frame, chunks[3], app);
    draw_messages(frame, chunks[4], app);

    let help = Paragraph::new("arrows/1-9 move · enter play · m mode · r restart · q quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[5]);
}

fn draw_mode(frame: &mut Frame, area: Rect, mode: GameMode) {
    let spans: Vec<Span> = [GameMode::Human, GameMode::Ai]
        .into_iter()
        .flat_map(|option| {
            let style = if option == mode {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(format!(" {} ", option.label()), style), Span::raw("  ")]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn draw_board(frame: &mut Frame, area: Rect, view: &GameView, cursor: Position) {
    let board_area = center_rect(area, 40, 11);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(board_area);

    for row in 0..3 {
        draw_row(frame, rows[row * 2], view, cursor, row * 3);
    }
    draw_separator(frame, rows[1]);
    draw_separator(frame, rows[3]);
}

fn draw_row(frame: &mut Frame, area: Rect, view: &GameView, cursor: Position, start: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
            Constraint::Length(1),
            Constraint::Length(12),
        ])
        .split(area);

    for col in 0..3 {
        draw_cell(frame, cols[col * 2], view, cursor, start + col);
    }
    draw_separator_vertical(frame, cols[1]);
    draw_separator_vertical(frame, cols[3]);
}

fn draw_cell(frame: &mut Frame, area: Rect, view: &GameView, cursor: Position, cell: usize) {
    let (symbol, base_style) = match view.board[cell] {
        None => (format!("{}", cell + 1), Style::default().fg(Color::DarkGray)),
        Some(Player::X) => (
            "X".to_string(),
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        ),
        Some(Player::O) => (
            "O".to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };

    let style = if view.is_winning_cell(cell) {
        base_style.bg(Color::Green).fg(Color::Black)
    } else if cell == cursor.to_index() {
        base_style.bg(Color::White).fg(Color::Black)
    } else {
        base_style
    };

    // Vertically center the mark in its 3-line cell.
    let paragraph = Paragraph::new(vec![
        Line::from(Span::styled("            ", style)),
        Line::from(Span::styled(format!("{:^12}", symbol), style)),
        Line::from(Span::styled("            ", style)),
    ])
    .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let (text, color) = if view.ai_thinking {
        (format!("{} is thinking...", app.provider_name()), Color::Magenta)
    } else if view.status.is_over() {
        (format!("{} (press r to play again)", view.status_line()), Color::Green)
    } else {
        (view.status_line(), Color::Yellow)
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_messages(frame: &mut Frame, area: Rect, app: &App) {
    let (text, style) = match (app.view().error.as_deref(), app.notice()) {
        (Some(error), _) => (error, Style::default().fg(Color::White).bg(Color::Red)),
        (None, Some(notice)) => (notice, Style::default().fg(Color::Yellow)),
        (None, None) => return,
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn draw_separator(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new("─".repeat(area.width as usize))
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn draw_separator_vertical(frame: &mut Frame, area: Rect) {
    let sep = Paragraph::new(vec![Line::from("│"), Line::from("│"), Line::from("│")])
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, area);
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
