use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Terminal;
use unicode_width::UnicodeWidthStr;

use crate::cli::{self, SESSION_HELP};
use crate::core::command::Backend;
use crate::core::error::AppError;
use crate::core::form::{DropZone, FormController};
use crate::core::formatter::{format_option_lines, format_plain, format_status_line};
use crate::core::media::{FileKind, SelectedFile};
use crate::core::status::StatusKind;

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self, AppError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        stdout.execute(EnableBracketedPaste)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = stdout.execute(DisableBracketedPaste);
        let _ = stdout.execute(LeaveAlternateScreen);
    }
}

const DIVIDER_MARKER: &str = "<divider>";

#[derive(Debug)]
struct AppState {
    form: FormController,
    input: String,
    history: Vec<String>,
    should_quit: bool,
    scroll_offset: usize,
    view_lines: usize,
    tick: u64,
}

impl AppState {
    fn new(mut form: FormController) -> Self {
        form.drag_enter(DropZone::VIDEO);
        Self {
            form,
            input: String::new(),
            history: vec![
                "Welcome to submerge-gen. Type 'help' for commands.".to_string(),
                "Drop or paste a file path onto the highlighted zone; Tab switches zones.".to_string(),
            ],
            should_quit: false,
            scroll_offset: 0,
            view_lines: 1,
            tick: 0,
        }
    }

    fn push_history(&mut self, line: impl Into<String>) {
        const MAX_LINES: usize = 500;
        if self.history.len() >= MAX_LINES {
            let drain_count = self.history.len().saturating_sub(MAX_LINES - 1);
            self.history.drain(0..drain_count);
        }
        self.history.push(line.into());
        self.clamp_scroll();
    }

    fn set_view_lines(&mut self, lines: usize) {
        self.view_lines = lines.max(1);
        self.clamp_scroll();
    }

    fn scroll_up(&mut self, lines: usize) {
        let max_scroll = self.max_scroll();
        self.scroll_offset = (self.scroll_offset + lines).min(max_scroll);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    fn scroll_top(&mut self) {
        self.scroll_offset = self.max_scroll();
    }

    fn scroll_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    fn max_scroll(&self) -> usize {
        self.history.len().saturating_sub(self.view_lines)
    }

    fn clamp_scroll(&mut self) {
        let max_scroll = self.max_scroll();
        if self.scroll_offset > max_scroll {
            self.scroll_offset = max_scroll;
        }
    }

    fn hovered_zone(&self) -> DropZone {
        self.form.hover().unwrap_or(DropZone::VIDEO)
    }

    fn switch_zone(&mut self) {
        let current = self.hovered_zone();
        let next = if current == DropZone::VIDEO {
            DropZone::SUBTITLE
        } else {
            DropZone::VIDEO
        };
        self.form.drag_leave(current);
        self.form.drag_enter(next);
    }

    /// A terminal drop arrives as pasted, shell-quoted paths.
    fn handle_paste(&mut self, text: &str) {
        let zone = self.hovered_zone();
        let files: Vec<SelectedFile> = match cli::split_words(text.trim()) {
            Ok(paths) => paths.iter().map(|path| SelectedFile::from_path(path)).collect(),
            Err(err) => {
                self.push_history(format!("error: {err}"));
                return;
            }
        };

        if let Some(Ok(())) = self.form.drop_files(zone, files) {
            if let Some(file) = self.form.selected(zone.kind) {
                let line = format!("Dropped {}: {}", zone.kind.label(), file.name());
                self.push_history(line);
            }
        }
        // Keep the zone highlighted so the next drop lands in the same place.
        self.form.drag_enter(zone);
    }

    /// The commands land in the output panel; a failed guard only updates the status.
    fn generate(&mut self) {
        if self.form.generate().is_err() {
            return;
        }
        if !self.history.is_empty() {
            self.push_history(DIVIDER_MARKER);
        }
        if let Some(status) = self.form.status() {
            let line = format_status_line(status);
            self.push_history(line);
        }
        self.scroll_bottom();
    }

    fn command_output_lines(&self) -> Vec<String> {
        self.form
            .generated()
            .map(|command| {
                format_plain(command, &Backend::ALL)
                    .lines()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn toggle_option(&mut self, index: usize) {
        let options = self.form.options_mut();
        match index {
            0 => options.add_metadata = !options.add_metadata,
            1 => options.clear_subs = !options.clear_subs,
            2 => options.metadata_only = !options.metadata_only,
            _ => {}
        }
    }
}

pub fn run(form: FormController) -> Result<(), AppError> {
    let _guard = TerminalGuard::enter()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(form);

    loop {
        let size = terminal.size()?;
        let output_height = command_output_height(&app);
        let history_height = size.height.saturating_sub(16 + output_height).max(3) as usize;
        app.set_view_lines(history_height.saturating_sub(2).max(1));
        app.tick = app.tick.wrapping_add(1);

        terminal.draw(|frame| draw(frame, &app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(&mut app, key),
                Event::Paste(text) => {
                    if app.form.alert().is_none() {
                        app.handle_paste(&text);
                    }
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // The alert blocks everything else until it is acknowledged.
    if app.form.alert().is_some() {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            if let Some(alert) = app.form.dismiss_alert() {
                app.push_history(format!("!! {alert}"));
            }
        }
        return;
    }

    match key.code {
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => app.generate(),
        KeyCode::Char(ch) => app.input.push(ch),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Tab | KeyCode::BackTab => app.switch_zone(),
        KeyCode::F(2) => app.toggle_option(0),
        KeyCode::F(3) => app.toggle_option(1),
        KeyCode::F(4) => app.toggle_option(2),
        KeyCode::F(5) => app.generate(),
        KeyCode::Enter => {
            let line = app.input.trim().to_string();
            app.input.clear();
            if !line.is_empty() {
                handle_line(app, line);
            }
        }
        KeyCode::PageUp => {
            let step = app.view_lines.saturating_sub(1).max(1);
            app.scroll_up(step);
        }
        KeyCode::PageDown => {
            let step = app.view_lines.saturating_sub(1).max(1);
            app.scroll_down(step);
        }
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Home => app.scroll_top(),
        KeyCode::End => app.scroll_bottom(),
        KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
}

fn handle_line(app: &mut AppState, line: String) {
    let trimmed = line.trim();

    if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
        app.should_quit = true;
        return;
    }

    if trimmed.eq_ignore_ascii_case("clear") {
        app.history.clear();
        app.scroll_bottom();
        return;
    }

    if !app.history.is_empty() {
        app.push_history(DIVIDER_MARKER);
    }
    app.push_history(format!(">> {trimmed}"));

    if trimmed.eq_ignore_ascii_case("help") {
        for help in SESSION_HELP {
            app.push_history(help);
        }
        app.push_history("Keys: Tab zone  F2 metadata  F3 clear-subs  F4 metadata-only  F5/Ctrl+G generate");
        return;
    }

    match cli::parse_line(trimmed) {
        Ok(command) => {
            for text in cli::apply(&mut app.form, command) {
                app.push_history(text);
            }
        }
        Err(err) => {
            for text in err.trim_end().lines() {
                app.push_history(text.to_string());
            }
        }
    }
}

fn draw(frame: &mut ratatui::Frame, app: &AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Length(7),
            Constraint::Length(command_output_height(app)),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(frame.size());

    frame.render_widget(render_header(app, layout[0].width as usize), layout[0]);

    let zones = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    frame.render_widget(render_drop_zone(app, DropZone::VIDEO), zones[0]);
    frame.render_widget(render_drop_zone(app, DropZone::SUBTITLE), zones[1]);

    frame.render_widget(render_options(app), layout[2]);

    if app.form.generated().is_some() {
        frame.render_widget(render_command_output(app), layout[3]);
    }

    let history = render_history(app, layout[4].height as usize, layout[4].width as usize);
    frame.render_widget(history, layout[4]);

    let input_area = layout[5];
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().title("Input").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(input, input_area);
    let (cursor_x, cursor_y) = cursor_position(input_area, &app.input);
    frame.set_cursor(cursor_x, cursor_y);

    if let Some(alert) = app.form.alert() {
        let area = centered_rect(50, 5, frame.size());
        frame.render_widget(Clear, area);
        frame.render_widget(render_alert(alert), area);
    }
}

fn render_header(app: &AppState, width: usize) -> Paragraph<'static> {
    let (label, message, style) = match app.form.status() {
        Some(status) => {
            let color = match status.kind {
                StatusKind::Processing => Color::Yellow,
                StatusKind::Success => Color::Green,
                StatusKind::Error => Color::Red,
            };
            (
                format!("{:?}", status.kind),
                status.message.clone(),
                Style::default().fg(color),
            )
        }
        None => ("Idle".to_string(), String::new(), Style::default()),
    };

    let mut text = vec![Line::from(vec![
        Span::raw("Status: "),
        Span::styled(label, style),
        Span::raw("  "),
        Span::styled(message, style),
    ])];

    if app.form.status().is_some_and(|status| status.shows_progress()) {
        let bar_width = width.saturating_sub(4).clamp(10, 40);
        text.push(Line::from(render_progress_bar(app.tick, bar_width)));
    }

    Paragraph::new(text)
        .block(Block::default().title("submerge-gen").borders(Borders::ALL))
        .wrap(Wrap { trim: true })
}

fn render_progress_bar(tick: u64, width: usize) -> String {
    let width = width.max(10);
    let mut bar = String::with_capacity(width + 2);
    bar.push('[');
    let pos = (tick as usize) % width;
    for idx in 0..width {
        if idx == pos {
            bar.push('>');
        } else if idx < pos {
            bar.push('=');
        } else {
            bar.push(' ');
        }
    }
    bar.push(']');
    bar
}

fn render_drop_zone(app: &AppState, zone: DropZone) -> Paragraph<'static> {
    let hovered = app.form.hover() == Some(zone);
    let border_style = if hovered {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let hint = format!("Drop a {} file here", zone.kind.label().to_lowercase());
    let mut lines = vec![Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))];
    if let Some(file) = app.form.selected(zone.kind) {
        lines.push(Line::from(Span::styled(
            file.name().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let title = match zone.kind {
        FileKind::Video => "Video file",
        FileKind::Subtitle => "Subtitle file",
    };
    Paragraph::new(lines)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .wrap(Wrap { trim: true })
}

/// Hidden until the first successful generate, like the page's output region.
fn command_output_height(app: &AppState) -> u16 {
    if app.form.generated().is_some() {
        7
    } else {
        0
    }
}

fn render_command_output(app: &AppState) -> Paragraph<'static> {
    let lines: Vec<Line> = app
        .command_output_lines()
        .into_iter()
        .map(Line::from)
        .collect();
    Paragraph::new(lines)
        .block(Block::default().title("Command").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
}

/// Cursor cell after the typed text, measured in display columns and kept
/// inside the input box.
fn cursor_position(area: Rect, input: &str) -> (u16, u16) {
    let inner_right = u32::from(area.x) + u32::from(area.width.saturating_sub(2));
    let x = (u32::from(area.x) + 1 + input.width() as u32).min(inner_right);
    (x as u16, area.y + 1)
}

fn render_options(app: &AppState) -> Paragraph<'static> {
    let lines: Vec<Line> = format_option_lines(app.form.options())
        .into_iter()
        .map(Line::from)
        .collect();
    Paragraph::new(lines).block(
        Block::default()
            .title("Options (F2 metadata, F3 clear-subs, F4 metadata-only, F5 generate)")
            .borders(Borders::ALL),
    )
}

fn render_history(app: &AppState, height: usize, width: usize) -> Paragraph<'static> {
    let max_lines = height.saturating_sub(2).max(1);
    let end = app.history.len().saturating_sub(app.scroll_offset);
    let start = end.saturating_sub(max_lines);
    let divider_width = width.saturating_sub(2).max(1);
    let divider = "─".repeat(divider_width);
    let lines: Vec<Line> = app.history[start..end]
        .iter()
        .map(|line| {
            if line == DIVIDER_MARKER {
                Line::from(Span::raw(divider.clone()))
            } else {
                Line::from(line.clone())
            }
        })
        .collect();

    Paragraph::new(lines)
        .block(Block::default().title("Session").borders(Borders::ALL))
        .wrap(Wrap { trim: false })
}

fn render_alert(message: &str) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Press Enter to continue"),
    ])
    .block(Block::default().title("Alert").borders(Borders::ALL))
    .wrap(Wrap { trim: true })
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_line(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            handle_key(app, key(KeyCode::Char(ch)));
        }
        handle_key(app, key(KeyCode::Enter));
    }

    #[test]
    fn paste_drops_first_path_on_hovered_zone() {
        let mut app = AppState::new(FormController::default());
        app.handle_paste("'/home/me/My Movie.MKV' /home/me/other.mp4");
        assert_eq!(app.form.video().unwrap().name(), "My Movie.MKV");
        assert!(app.form.subtitle().is_none());

        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.form.hover(), Some(DropZone::SUBTITLE));
        app.handle_paste("/home/me/subs.srt\n");
        assert_eq!(app.form.subtitle().unwrap().name(), "subs.srt");
        assert_eq!(app.form.hover(), Some(DropZone::SUBTITLE));
    }

    #[test]
    fn alert_blocks_input_until_dismissed() {
        let mut app = AppState::new(FormController::default());
        app.handle_paste("notes.txt");
        assert!(app.form.video().is_none());
        assert_eq!(app.form.alert(), Some("Please select a valid video file!"));

        handle_key(&mut app, key(KeyCode::Char('x')));
        assert!(app.input.is_empty());
        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.form.alert().is_none());
        assert_eq!(app.history.last().unwrap(), "!! Please select a valid video file!");
    }

    #[test]
    fn typed_commands_and_function_keys_generate() {
        let mut app = AppState::new(FormController::default());
        type_line(&mut app, "video clip.mkv");
        handle_key(&mut app, key(KeyCode::F(4)));
        assert!(app.form.options().metadata_only);
        assert_eq!(command_output_height(&app), 0);
        handle_key(&mut app, key(KeyCode::F(5)));

        assert_eq!(
            app.command_output_lines(),
            vec![
                "Generated Command CPP:",
                "./subMerge.exe -i \"clip.mkv\" -m",
                "",
                "Generated Command Python:",
                "python main.py -i \"clip.mkv\" -m",
            ]
        );
        assert_eq!(command_output_height(&app), 7);
        assert_eq!(app.form.status().unwrap().kind, StatusKind::Success);
        assert_eq!(app.history[app.history.len() - 2], DIVIDER_MARKER);
    }

    #[test]
    fn failed_generate_leaves_output_and_log_alone() {
        let mut app = AppState::new(FormController::default());
        let history_before = app.history.clone();
        handle_key(&mut app, KeyEvent::new(KeyCode::Char('g'), KeyModifiers::CONTROL));
        handle_key(&mut app, key(KeyCode::F(5)));
        assert!(app.form.generated().is_none());
        assert!(app.command_output_lines().is_empty());
        assert_eq!(app.form.status().unwrap().message, "Please select a video file!");
        assert_eq!(app.history, history_before);
    }

    #[test]
    fn windows_paths_dropped_keep_their_names() {
        let mut app = AppState::new(FormController::default());
        app.handle_paste(r"C:\Videos\Movie.MP4");
        assert_eq!(app.form.video().unwrap().name(), "Movie.MP4");

        app.handle_paste(r#""C:\My Videos\a.mkv""#);
        assert_eq!(app.form.video().unwrap().name(), "a.mkv");

        handle_key(&mut app, key(KeyCode::Tab));
        app.handle_paste(r"/home/me/My\ Subs.srt");
        assert_eq!(app.form.subtitle().unwrap().name(), "My Subs.srt");
    }

    #[test]
    fn cursor_uses_display_width_and_stays_in_box() {
        let area = Rect::new(0, 20, 30, 3);
        assert_eq!(cursor_position(area, "abc"), (4, 21));
        assert_eq!(cursor_position(area, "فیلم"), (5, 21));
        assert_eq!(cursor_position(area, "影片"), (5, 21));
        assert_eq!(cursor_position(area, &"x".repeat(100)), (28, 21));
    }

    #[test]
    fn popup_fits_very_wide_terminals() {
        let area = Rect::new(0, 0, 2000, 50);
        let popup = centered_rect(50, 5, area);
        assert_eq!(popup.width, 1000);
        assert_eq!(popup.x, 500);
        assert_eq!(popup.y, 22);
    }

    #[test]
    fn progress_bar_advances_with_tick() {
        assert_eq!(render_progress_bar(0, 10), "[>         ]");
        assert_eq!(render_progress_bar(3, 10), "[===>      ]");
    }
}
