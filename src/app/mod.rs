use crate::actions::{ApplyTarget, Clipboard, LoggingApplyTarget, SystemClipboard};
use crate::config::Config;
use crate::state::{BlockKey, ConsoleState};
use crate::terminal::TerminalGuard;
use crate::ui::header::{header_lines, render_header, HEADER_ROWS};
use crate::ui::layout::split_console_layout;
use crate::ui::render::{render_history, render_status_line, HistoryScroll};
use crate::ui::{render_message, BlockDecor, ConsoleInput, InputEvent, KeyOutcome, Theme};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::Terminal;
use std::time::{Duration, Instant};

const SCROLL_STEP: usize = 5;
const PULSE_DIVISOR: usize = 3;
const IDLE_HINT: &str = "Tab focus code · Ctrl+T add context · /demo · /help";
const HELP_TEXT: &str = "Enter send · Shift+Enter newline · Esc stop · Enter accept · Tab/Shift+Tab focus code · Ctrl+Y copy · Ctrl+P apply · Ctrl+T context · PgUp/PgDn scroll · /demo /clear /quit";

/// The console: message state, prompt, and the terminal session driving them.
pub struct App {
    config: Config,
    theme: Theme,
    state: ConsoleState,
    input: ConsoleInput,
    clipboard: Box<dyn Clipboard>,
    apply_target: Option<Box<dyn ApplyTarget>>,
    focus: Option<BlockKey>,
    scroll: HistoryScroll,
    pulse: usize,
    history_rows: usize,
    history_viewport: usize,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_collaborators(
            config,
            Box::new(SystemClipboard::default()),
            Some(Box::new(LoggingApplyTarget::default())),
        )
    }

    pub fn with_collaborators(
        config: Config,
        clipboard: Box<dyn Clipboard>,
        apply_target: Option<Box<dyn ApplyTarget>>,
    ) -> Self {
        Self {
            theme: Theme::new(config.colors_enabled),
            state: ConsoleState::new(&config),
            input: ConsoleInput::default(),
            clipboard,
            apply_target,
            focus: None,
            scroll: HistoryScroll::default(),
            pulse: 0,
            history_rows: 0,
            history_viewport: 0,
            should_quit: false,
            config,
        }
    }

    pub fn state(&self) -> &ConsoleState {
        &self.state
    }

    pub fn input(&self) -> &ConsoleInput {
        &self.input
    }

    pub fn focus(&self) -> Option<BlockKey> {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut guard = TerminalGuard::enter()?;
        tracing::info!(title = %self.config.title, "console started");

        let mut tick = tokio::time::interval(self.state.tick_interval());
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        while !self.should_quit {
            self.draw(guard.terminal())?;
            self.process_events()?;
            if self.should_quit {
                break;
            }

            tokio::select! {
                _ = tick.tick() => self.on_tick(Instant::now()),
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("interrupted");
                    self.should_quit = true;
                }
            }
        }

        tracing::info!(messages = self.state.messages().len(), "console closed");
        Ok(())
    }

    fn process_events(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Paste(text) => {
                    self.input.paste(&text);
                }
                Event::Key(key)
                    if key.kind == KeyEventKind::Press || key.kind == KeyEventKind::Repeat =>
                {
                    self.handle_key(key, Instant::now());
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.state.tick(now) && self.state.is_generating() {
            self.scroll.follow_tail();
        }
        if self.state.is_generating() {
            self.pulse = self.pulse.wrapping_add(1);
        }
        self.sync_surfaces();
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::PageUp => {
                self.scroll
                    .scroll_up(SCROLL_STEP, self.history_rows, self.history_viewport);
                return;
            }
            KeyCode::PageDown => {
                self.scroll
                    .scroll_down(SCROLL_STEP, self.history_rows, self.history_viewport);
                return;
            }
            _ => {}
        }

        match self.input.handle_key(key) {
            KeyOutcome::Event(event) => self.on_input_event(event, now),
            KeyOutcome::Handled => {}
            KeyOutcome::Ignored => match key.code {
                KeyCode::Tab => self.cycle_focus(true),
                KeyCode::BackTab => self.cycle_focus(false),
                KeyCode::Char('y') if ctrl => self.copy_focused(now),
                KeyCode::Char('p') if ctrl => self.apply_focused(),
                _ => {}
            },
        }
        self.sync_surfaces();
    }

    fn on_input_event(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::Submit(text) => {
                if text.starts_with('/') {
                    self.run_local_command(&text, now);
                } else if self.state.send(&text, now).is_some() {
                    self.scroll.follow_tail();
                }
            }
            InputEvent::Stop => {
                if self.state.stop() {
                    self.state.set_status("Stopped");
                }
            }
            InputEvent::Accept => {
                if self.state.accept() {
                    self.state.set_status("Accepted");
                }
            }
            InputEvent::AddContext(reference) => {
                tracing::debug!(name = %reference.name, "context attached");
                self.state
                    .set_status(format!("Added {} to context", reference.label()));
            }
        }
    }

    fn run_local_command(&mut self, command: &str, now: Instant) {
        match command.trim() {
            "/demo" => {
                if self.state.start_demo(now) {
                    self.scroll.follow_tail();
                }
            }
            "/clear" => {
                self.state.clear();
                self.focus = None;
                self.scroll = HistoryScroll::default();
            }
            "/help" => self.state.set_status(HELP_TEXT),
            "/quit" | "/exit" | "/q" => self.should_quit = true,
            other => self.state.set_status(format!("Unknown command {other}")),
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let blocks = self.state.code_blocks();
        if blocks.is_empty() {
            self.focus = None;
            return;
        }
        let current = self
            .focus
            .and_then(|key| blocks.iter().position(|candidate| *candidate == key));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => blocks.len() - 1,
            (Some(idx), true) => (idx + 1) % blocks.len(),
            (Some(idx), false) => (idx + blocks.len() - 1) % blocks.len(),
        };
        self.focus = Some(blocks[next]);
        self.state
            .set_status(format!("Code block {}/{}", next + 1, blocks.len()));
    }

    fn copy_focused(&mut self, now: Instant) {
        match self.focus {
            Some(key) => {
                self.state.copy_block(key, self.clipboard.as_mut(), now);
            }
            None => self.state.set_status("Tab to a code block first"),
        }
    }

    fn apply_focused(&mut self) {
        let Some(key) = self.focus else {
            self.state.set_status("Tab to a code block first");
            return;
        };
        let target = self
            .apply_target
            .as_mut()
            .map(|target| target.as_mut() as &mut dyn ApplyTarget);
        if !self.state.apply_block(key, target) {
            self.state.set_status("This block has no target file");
        }
    }

    /// Keep the prompt and focus consistent with the message list.
    fn sync_surfaces(&mut self) {
        self.input.set_generating(self.state.is_generating());
        if let Some(key) = self.focus {
            if self.state.attachment_at(key).is_none() {
                self.focus = None;
            }
        }
    }

    pub fn history_lines(&self, width: usize) -> Vec<Line<'static>> {
        let state = &self.state;
        let is_copied = |key: BlockKey| state.is_copied(key);
        let decor = BlockDecor {
            focused: self.focus,
            is_copied: &is_copied,
            apply_wired: self.apply_target.is_some(),
        };
        state
            .messages()
            .iter()
            .flat_map(|message| {
                render_message(message, &self.theme, &decor, width, self.pulse / PULSE_DIVISOR)
            })
            .collect()
    }

    pub fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let size = terminal.size()?;
        let input_rows = self
            .input
            .height(size.width)
            .min(size.height.saturating_sub(HEADER_ROWS + 2).max(1));
        let layout = split_console_layout(
            Rect::new(0, 0, size.width, size.height),
            HEADER_ROWS,
            input_rows,
        );
        let lines = self.history_lines(layout.history.width as usize);
        self.history_rows = lines.len();
        self.history_viewport = layout.history.height as usize;

        let status = self.state.status().unwrap_or(IDLE_HINT).to_string();
        let theme = self.theme;
        let scroll = self.scroll;
        let input = &self.input;
        let pulse = self.pulse / PULSE_DIVISOR;
        let (title, command_line) = (&self.config.title, &self.config.command_line);

        terminal.draw(|frame| {
            render_header(frame, layout.header, title, command_line, &theme);
            render_history(frame, layout.history, lines, &scroll, &theme);
            render_status_line(frame, layout.status, &status, &theme);
            input.render(frame, layout.input, &theme, pulse);
            input.render_picker(frame, layout.input, &theme);
        })?;
        Ok(())
    }
}

/// Header and startup conversation as plain text, for output that is not a terminal.
pub fn plain_transcript(config: &Config, width: usize) -> String {
    let theme = Theme::new(false);
    let state = ConsoleState::new(config);
    let decor = BlockDecor::plain();

    let header = header_lines(&config.title, &config.command_line, &theme, width);
    let body = state
        .messages()
        .iter()
        .flat_map(|message| render_message(message, &theme, &decor, width, 0));

    let mut out = String::new();
    for line in header.into_iter().chain(body) {
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        out.push_str(text.trim_end());
        out.push('\n');
    }
    out
}
