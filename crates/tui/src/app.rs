use std::{cmp, io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};
use trilha_core::{
    board::BOARD_ROWS,
    models::{Player, PlayerId},
    PopupState, Reveal, TileClass, TriviaGame,
};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_NAME_LEN: usize = 32;
const TOKENS_PER_TILE: usize = 4;
const BOARD_COLUMNS: usize = 7;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    selection_fg: Color,
    success: Color,
    warning: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            selection_fg: Color::White,
            success: Color::Green,
            warning: Color::Yellow,
            danger: Color::Red,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NamePromptModal {
    input: String,
    cursor: usize,
}

impl NamePromptModal {
    fn move_cursor(&mut self, delta: isize) {
        if delta < 0 {
            if let Some(ch) = self.input[..self.cursor].chars().next_back() {
                self.cursor -= ch.len_utf8();
            }
        } else if let Some(ch) = self.input[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.input.len();
    }

    fn insert(&mut self, ch: char) {
        if self.input.chars().count() >= MAX_NAME_LEN || ch.is_control() {
            return;
        }
        self.input.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(ch) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.input.remove(self.cursor);
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.input.len() {
            self.input.remove(self.cursor);
        }
    }

    fn display_cursor(&self) -> u16 {
        self.input[..self.cursor].chars().count() as u16
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end for a trivia game.
pub struct TrilhaApp {
    game: TriviaGame,
    state: UiState,
    name_prompt: Option<NamePromptModal>,
    theme: Theme,
}

impl TrilhaApp {
    pub fn new(game: TriviaGame) -> Self {
        Self {
            game,
            state: UiState::default(),
            name_prompt: None,
            theme: Theme::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.state
            .set_status("Press a to add a player".to_string());

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) => self.handle_key(key),
                Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => {}
                None => break,
            }
            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        info!("Terminal restored");
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        let result = if self.name_prompt.is_some() {
            self.handle_name_prompt_key(key);
            Ok(())
        } else if self.game.popup().is_open() {
            self.handle_popup_key(key)
        } else {
            self.handle_board_key(key)
        };
        if let Err(err) = result {
            self.state.set_status(format!("{err}"));
        }
    }

    fn handle_name_prompt_key(&mut self, key: KeyEvent) {
        let Some(prompt) = self.name_prompt.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.name_prompt = None;
                self.state.set_status("Add player cancelled".to_string());
            }
            KeyCode::Enter => {
                let name = prompt.input.clone();
                self.name_prompt = None;
                if let Some(id) = self.game.add_player(&name) {
                    self.state.cursor = self.game.players().len().saturating_sub(1);
                    let label = self.player_name(id);
                    self.state.set_status(format!("{label} joined the game"));
                }
            }
            KeyCode::Left => prompt.move_cursor(-1),
            KeyCode::Right => prompt.move_cursor(1),
            KeyCode::Home => prompt.move_home(),
            KeyCode::End => prompt.move_end(),
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Delete => prompt.delete(),
            KeyCode::Char(ch) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    prompt.insert(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('c') => {
                let answer = self.game.mark_correct()?.answer.clone();
                self.state.set_status(format!("Correct: {answer}"));
            }
            KeyCode::Char('w') => {
                let moved = self.game.mark_incorrect()?;
                let name = self
                    .game
                    .popup_player()
                    .map(|player| player.name.clone())
                    .unwrap_or_else(|| "Player".to_string());
                match moved {
                    Some(position) => self
                        .state
                        .set_status(format!("Wrong answer: {name} steps back to {position}")),
                    None => self.state.set_status("Wrong answer".to_string()),
                }
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.game.close_popup();
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('q') => {
                self.state.should_quit = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Char('a') => {
                self.name_prompt = Some(NamePromptModal::default());
            }
            KeyCode::Char('x') | KeyCode::Delete => {
                if let Some(id) = self.selected_player() {
                    if let Some(player) = self.game.remove_player(id) {
                        self.state.set_status(format!("{} left the game", player.name));
                    }
                    self.clamp_cursor();
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(id) = self.selected_player() {
                    self.game.increment(id)?;
                }
            }
            KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => {
                if let Some(id) = self.selected_player() {
                    self.game.decrement(id)?;
                }
            }
            KeyCode::Enter => {
                let mover = self
                    .game
                    .pending()
                    .map(|pending| pending.player_id)
                    .or_else(|| self.selected_player());
                if let Some(id) = mover {
                    let landing = self.game.confirm(id)?;
                    let name = self.player_name(landing.player_id);
                    let message = if landing.popup_opened {
                        format!("{name} landed on {}", self.game.tile_label(landing.position))
                    } else {
                        format!("{name} moved to {}", landing.position)
                    };
                    self.state.set_status(message);
                }
            }
            KeyCode::Esc => {
                if let Some(id) = self.game.cancel() {
                    let name = self.player_name(id);
                    self.state.set_status(format!("Movement of {name} cancelled"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.game.players().len();
        if len == 0 {
            self.state.cursor = 0;
            return;
        }
        let next = (self.state.cursor as isize + delta).clamp(0, len as isize - 1);
        self.state.cursor = next as usize;
    }

    fn clamp_cursor(&mut self) {
        let len = self.game.players().len();
        if self.state.cursor >= len {
            self.state.cursor = len.saturating_sub(1);
        }
    }

    fn selected_player(&self) -> Option<PlayerId> {
        self.game
            .players()
            .get(self.state.cursor)
            .map(|player| player.id)
    }

    fn player_name(&self, id: PlayerId) -> String {
        self.game
            .registry()
            .get(id)
            .map(|player| player.name.clone())
            .unwrap_or_else(|| "Player".to_string())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(3)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(34),
                Constraint::Min(40),
                Constraint::Length(30),
            ])
            .split(rows[0]);

        self.render_players(frame, columns[0]);
        self.render_board(frame, columns[1]);
        self.render_help(frame, columns[2]);
        self.render_status(frame, rows[1]);

        if self.game.popup().is_open() {
            self.render_popup(frame, area);
        }
        if let Some(prompt) = &self.name_prompt {
            self.render_name_prompt(frame, prompt);
        }
    }

    fn render_players(&self, frame: &mut Frame, area: Rect) {
        let pending = self.game.pending().copied();
        let items: Vec<ListItem> = self
            .game
            .players()
            .iter()
            .map(|player| {
                let enabled = self.game.can_move(player.id);
                let name_style = if enabled {
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(self.theme.muted)
                };
                let mut spans = vec![
                    Span::styled(player.name.clone(), name_style),
                    Span::raw(format!("  Pos: {}", player.position_label())),
                ];
                if let Some(pending) = pending.filter(|p| p.player_id == player.id) {
                    if pending.accumulated_delta != 0 {
                        spans.push(Span::styled(
                            format!("  ({:+})", pending.accumulated_delta),
                            Style::default().fg(self.theme.success),
                        ));
                    }
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(self.state.cursor));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Players"))
            .highlight_style(
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_board(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Board");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Ratio(1, BOARD_ROWS.len() as u32);
                BOARD_ROWS.len()
            ])
            .split(inner);
        let mover = self.game.pending().map(|pending| pending.player_id);

        for (row, positions) in BOARD_ROWS.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Ratio(1, BOARD_COLUMNS as u32);
                    BOARD_COLUMNS
                ])
                .split(row_areas[row]);
            for (slot, &position) in positions.iter().enumerate() {
                let column = if positions.len() == BOARD_COLUMNS {
                    slot
                } else if slot == 0 {
                    0
                } else {
                    BOARD_COLUMNS - 1
                };
                self.render_tile(frame, cells[column], position, mover);
            }
        }
    }

    fn render_tile(&self, frame: &mut Frame, area: Rect, position: i32, mover: Option<PlayerId>) {
        let players: Vec<&Player> = self.game.registry().players_at(position).collect();
        let border_color = if mover.is_some_and(|id| players.iter().any(|p| p.id == id)) {
            self.theme.warning
        } else {
            match self.game.tile_class(position) {
                TileClass::Location => self.theme.accent,
                TileClass::Special => self.theme.danger,
                TileClass::Event => self.theme.success,
                TileClass::Unknown | TileClass::Unmapped => self.theme.muted,
            }
        };

        let mut lines: Vec<Line> = players
            .iter()
            .take(TOKENS_PER_TILE)
            .map(|player| {
                Line::from(Span::styled(
                    player.name.clone(),
                    Style::default().fg(self.theme.primary_fg),
                ))
            })
            .collect();
        if players.len() > TOKENS_PER_TILE {
            lines.push(Line::from(format!("+{}", players.len() - TOKENS_PER_TILE)));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(self.game.tile_label(position));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_popup(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(cmp::min(64, area.width.saturating_sub(4)), 14, area);
        frame.render_widget(Clear, popup);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();
        if let Some(player) = self.game.popup_player() {
            lines.push(Line::from(Span::styled(
                format!("For {}", player.name),
                Style::default().fg(self.theme.muted),
            )));
            lines.push(Line::from(""));
        }

        let (title, footer) = match self.game.popup() {
            PopupState::Closed => return,
            PopupState::NotFound { tile_id } => {
                debug!(tile_id, "Rendering not-found popup");
                ("No question found", "Esc close")
            }
            PopupState::Event { kind } => {
                lines.push(Line::from(Span::styled(
                    kind.title(),
                    bold.fg(self.theme.warning),
                )));
                lines.push(Line::from(kind.message()));
                ("Trick or Treat", "Esc close")
            }
            PopupState::Special { detail, .. } => {
                lines.push(Line::from(detail.question.clone()));
                ("Special Tile", "Esc close")
            }
            PopupState::Question { detail, reveal, .. } => {
                lines.push(Line::from(detail.question.clone()));
                lines.push(Line::from(""));
                match reveal {
                    Reveal::Hidden => {}
                    Reveal::Correct => {
                        lines.push(Line::from(vec![
                            Span::styled("Answer: ", bold.fg(self.theme.success)),
                            Span::raw(detail.answer.clone()),
                        ]));
                        if let Some(bonus) = detail.bonus.as_deref().filter(|b| !b.is_empty()) {
                            lines.push(Line::from(vec![
                                Span::styled("Bonus: ", bold.fg(self.theme.success)),
                                Span::raw(bonus.to_string()),
                            ]));
                        }
                    }
                    Reveal::Incorrect => {
                        if let Some(drawback) =
                            detail.drawback.as_deref().filter(|d| !d.is_empty())
                        {
                            lines.push(Line::from(vec![
                                Span::styled("Challenge: ", bold.fg(self.theme.danger)),
                                Span::raw(drawback.to_string()),
                            ]));
                        }
                    }
                }
                if *reveal == Reveal::Hidden {
                    ("Question", "c correct · w wrong · Esc close")
                } else {
                    ("Question", "Esc close")
                }
            }
        };

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            footer,
            Style::default().fg(self.theme.muted),
        )));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }

    fn render_name_prompt(&self, frame: &mut Frame, prompt: &NamePromptModal) {
        let frame_area = frame.size();
        let width = cmp::max(cmp::min(48_u16, frame_area.width.saturating_sub(4)), 24_u16);
        let area = centered_rect(width, 6, frame_area);
        frame.render_widget(Clear, area);

        let input_line = Line::from(vec![
            Span::styled("> ", Style::default().fg(self.theme.accent)),
            Span::raw(prompt.input.clone()),
        ]);
        let helper = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" add  "),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]);
        let paragraph = Paragraph::new(vec![
            Line::from("Player name"),
            input_line,
            Line::from(""),
            helper,
        ])
        .block(Block::default().borders(Borders::ALL).title("Add Player"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);

        let cursor_x = (area.x + 3 + prompt.display_cursor())
            .min(area.x + area.width.saturating_sub(2));
        frame.set_cursor(cursor_x, area.y + 2);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Commands");
        let mut lines = self
            .help_entries()
            .into_iter()
            .map(Line::from)
            .collect::<Vec<_>>();
        if let Some(pending) = self.game.pending() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!(
                    "{} moving ({:+})",
                    self.player_name(pending.player_id),
                    pending.accumulated_delta
                ),
                Style::default().fg(self.theme.warning),
            )));
        }
        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn help_entries(&self) -> Vec<&'static str> {
        let mut entries = vec![
            "a     add player",
            "x     remove player",
            "j/k   select player",
            "+/-   move selected",
        ];
        let confirmable = self
            .game
            .pending()
            .is_some_and(|pending| self.game.can_confirm(pending.player_id));
        if confirmable {
            entries.push("Enter confirm move");
        }
        if self.game.pending().is_some() {
            entries.push("Esc   cancel move");
        }
        entries.push("q     quit");
        entries
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");
        let paragraph = Paragraph::new(vec![Line::from(self.state.status.clone())])
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

struct UiState {
    cursor: usize,
    status: String,
    should_quit: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            cursor: 0,
            status: "Ready".to_string(),
            should_quit: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: String) {
        self.status = format!("[{}] {}", Local::now().format("%H:%M:%S"), message);
    }
}
