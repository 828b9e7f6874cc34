//! Terminal user interface for ninjaview
//!
//! Renders the build as it happens: a progress gauge, the list of finished
//! edges, the captured output of the selected edge, and its dependencies.

use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use regex::Regex;

use crate::config::Config;
use crate::error::Result;
use crate::models::BuildEdge;
use crate::parsers::structlog::StructLogMessage;
use crate::state::BuildState;

/// TUI application state
pub struct App {
    /// Folded build state
    state: BuildState,
    /// Selection in the finished-edge list
    list_state: ListState,
    /// Active filter over edge summaries
    filter: Option<Regex>,
    /// Filter prompt buffer, `Some` while the prompt is open
    filter_input: Option<String>,
    /// Last filter compile error, shown in the status line
    filter_error: Option<String>,
    /// Keyboard poll interval
    tick_rate: Duration,
    /// Messages drained per tick
    max_messages_per_tick: usize,
    /// Whether the log stream has ended
    stream_done: bool,
}

impl App {
    /// Create a new app state
    pub fn new(config: &Config) -> Self {
        Self {
            state: BuildState::new(),
            list_state: ListState::default(),
            filter: None,
            filter_input: None,
            filter_error: None,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            max_messages_per_tick: config.ui.max_messages_per_tick,
            stream_done: false,
        }
    }

    /// Finished edges matching the current filter, in finish order
    fn visible(&self) -> Vec<&BuildEdge> {
        self.state
            .finished_edges()
            .filter(|edge| match &self.filter {
                Some(re) => re.is_match(&edge.summary()),
                None => true,
            })
            .collect()
    }

    /// Move the selection by `offset`, clamping to the visible list
    fn select(&mut self, offset: isize) {
        let len = self.visible().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let selected = self.list_state.selected().unwrap_or(0);
            let new = usize::saturating_add_signed(selected, offset).min(len - 1);
            self.list_state.select(Some(new));
        }
    }

    /// Jump the selection to an absolute position, clamped
    fn select_abs(&mut self, position: usize) {
        let len = self.visible().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(position.min(len - 1)));
        }
    }

    /// Drain pending log messages without blocking
    fn drain_messages(&mut self, receiver: &Receiver<StructLogMessage>) {
        for _ in 0..self.max_messages_per_tick {
            match receiver.try_recv() {
                Ok(message) => {
                    self.state.apply(message);
                    if self.list_state.selected().is_none() {
                        self.select_abs(0);
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.stream_done = true;
                    break;
                }
            }
        }
    }

    /// Apply the filter prompt buffer; empty input clears the filter
    fn apply_filter(&mut self) {
        let Some(input) = self.filter_input.take() else {
            return;
        };
        self.filter_error = None;
        if input.is_empty() {
            self.filter = None;
        } else {
            match Regex::new(&input) {
                Ok(re) => self.filter = Some(re),
                Err(e) => self.filter_error = Some(e.to_string()),
            }
        }
        self.select_abs(0);
    }

    /// Handle a key press; returns true when the app should quit
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Some(input) = self.filter_input.as_mut() {
            match code {
                KeyCode::Enter => self.apply_filter(),
                KeyCode::Esc => {
                    self.filter_input = None;
                }
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Char(c) => input.push(c),
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('j') | KeyCode::Down => self.select(1),
            KeyCode::Char('k') | KeyCode::Up => self.select(-1),
            KeyCode::Char('g') | KeyCode::Home => self.select_abs(0),
            KeyCode::Char('G') | KeyCode::End => self.select_abs(usize::MAX),
            KeyCode::Char('/') => {
                self.filter_input = Some(String::new());
                self.filter_error = None;
            }
            _ => {}
        }
        false
    }

    /// Main loop: drain messages, draw, poll keyboard
    fn run(
        &mut self,
        terminal: &mut Terminal<impl Backend>,
        receiver: &Receiver<StructLogMessage>,
    ) -> io::Result<()> {
        loop {
            if !self.stream_done {
                self.drain_messages(receiver);
            }

            terminal.draw(|f| self.ui(f))?;

            if event::poll(self.tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && self.handle_key(key.code) {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn ui(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.size());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(chunks[0]);

        let log_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Percentage(55),
                Constraint::Min(0),
            ])
            .split(columns[0]);

        self.render_gauge(frame, log_chunks[0]);
        self.render_edge_list(frame, log_chunks[1]);
        self.render_output(frame, log_chunks[2]);
        self.render_dependencies(frame, columns[1]);
        self.render_status_bar(frame, chunks[1]);
    }

    fn render_gauge(&self, frame: &mut Frame, area: Rect) {
        let gauge = Gauge::default()
            .block(Block::default().title("Progress").borders(Borders::ALL))
            .gauge_style(Style::default().fg(Color::Cyan))
            .label(format!(
                "{} / {}",
                self.state.finished_count(),
                self.state.total_edges()
            ))
            .ratio(self.state.progress());
        frame.render_widget(gauge, area);
    }

    fn render_edge_list(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .visible()
            .iter()
            .map(|edge| {
                let style = if edge.is_failed() {
                    Style::default().bg(Color::Red)
                } else {
                    Style::default()
                };
                ListItem::new(edge.summary()).style(style)
            })
            .collect();

        let title = match &self.filter {
            Some(re) => format!("Log entries (/{}/)", re.as_str()),
            None => "Log entries".to_string(),
        };

        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol(">> ")
            .repeat_highlight_symbol(true);

        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_output(&self, frame: &mut Frame, area: Rect) {
        let output = self
            .selected_edge()
            .and_then(|edge| edge.output.clone())
            .unwrap_or_default();

        let paragraph = Paragraph::new(output)
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Command output").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_dependencies(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();

        if let Some(edge) = self.selected_edge() {
            lines.push(Line::from(Span::styled(
                "Inputs",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for input in &edge.inputs {
                lines.push(Line::from(format!("  {}", input.display())));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Outputs",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for output in &edge.outputs {
                lines.push(Line::from(format!("  {}", output.display())));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().title("Dependencies").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(input) = &self.filter_input {
            Line::from(vec![
                Span::raw(" filter: /"),
                Span::raw(input.clone()),
                Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])
        } else {
            let mut spans = vec![Span::styled(
                format!(
                    " {} - {} / {}",
                    self.state.status(),
                    self.state.finished_count(),
                    self.state.total_edges()
                ),
                Style::default().fg(Color::DarkGray),
            )];
            if self.state.failed_count() > 0 {
                spans.push(Span::styled(
                    format!("  {} failed", self.state.failed_count()),
                    Style::default().fg(Color::Red),
                ));
            }
            if let Some(error) = &self.filter_error {
                spans.push(Span::styled(
                    format!("  bad filter: {}", error),
                    Style::default().fg(Color::Yellow),
                ));
            }
            if self.stream_done {
                spans.push(Span::styled(
                    "  [stream ended, q to quit]",
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        };

        frame.render_widget(Paragraph::new(line), area);
    }

    /// The edge currently selected in the visible list
    fn selected_edge(&self) -> Option<&BuildEdge> {
        let visible = self.visible();
        self.list_state
            .selected()
            .and_then(|i| visible.get(i).copied())
    }
}

/// Run the TUI over a stream of structlog messages
///
/// Sets up the terminal, runs the app loop, and restores the terminal on
/// the way out even when the loop errors.
pub fn run_tui(mut app: App, receiver: &Receiver<StructLogMessage>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal, receiver);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn app() -> App {
        App::new(&Config::default())
    }

    fn feed(app: &mut App, messages: Vec<StructLogMessage>) {
        for message in messages {
            app.state.apply(message);
        }
    }

    fn finished(edge_id: usize, compiler: &str, success: bool) -> Vec<StructLogMessage> {
        vec![
            StructLogMessage::BuildEdgeStarted {
                edge_id,
                compiler: compiler.to_string(),
                inputs: vec![PathBuf::from(format!("{}.c", edge_id))],
                outputs: vec![PathBuf::from(format!("{}.o", edge_id))],
            },
            StructLogMessage::BuildEdgeFinished {
                edge_id,
                success,
                command: String::new(),
                output: String::new(),
            },
        ]
    }

    #[test]
    fn test_select_clamps() {
        let mut app = app();
        feed(&mut app, finished(1, "cc", true));
        feed(&mut app, finished(2, "cc", true));

        app.select_abs(0);
        app.select(10);
        assert_eq!(app.list_state.selected(), Some(1));
        app.select(-10);
        assert_eq!(app.list_state.selected(), Some(0));
    }

    #[test]
    fn test_select_empty_list() {
        let mut app = app();
        app.select(1);
        assert_eq!(app.list_state.selected(), None);
    }

    #[test]
    fn test_filter_narrows_visible() {
        let mut app = app();
        feed(&mut app, finished(1, "cc", true));
        feed(&mut app, finished(2, "link", true));

        app.filter_input = Some("link".to_string());
        app.apply_filter();

        let visible = app.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].compiler, "link");
    }

    #[test]
    fn test_invalid_filter_reported() {
        let mut app = app();
        app.filter_input = Some("(".to_string());
        app.apply_filter();

        assert!(app.filter.is_none());
        assert!(app.filter_error.is_some());
    }

    #[test]
    fn test_empty_filter_clears() {
        let mut app = app();
        app.filter = Some(Regex::new("cc").unwrap());
        app.filter_input = Some(String::new());
        app.apply_filter();
        assert!(app.filter.is_none());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Esc));
        assert!(!app.handle_key(KeyCode::Char('j')));
    }

    #[test]
    fn test_filter_prompt_captures_keys() {
        let mut app = app();
        app.handle_key(KeyCode::Char('/'));
        assert!(app.filter_input.is_some());

        // 'q' goes into the prompt instead of quitting
        assert!(!app.handle_key(KeyCode::Char('q')));
        assert_eq!(app.filter_input.as_deref(), Some("q"));

        app.handle_key(KeyCode::Backspace);
        assert_eq!(app.filter_input.as_deref(), Some(""));

        app.handle_key(KeyCode::Esc);
        assert!(app.filter_input.is_none());
    }
}
