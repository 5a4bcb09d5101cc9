use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use furigana_config::{Settings, SettingsStore};
use furigana_engine::{
    BaseCharset, Cmd, DecorationSet, EditorState, EditorView, ExtensionConfig, LineSegment,
    Matcher, RenderContext, Renderer, SelectionRange, StaticAnnotator, layout_line,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env, fs,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};

fn usage(program: &str) -> ! {
    eprintln!("Usage:");
    eprintln!("  {program} render <file.md>   Print annotated HTML");
    eprintln!("  {program} edit <file.md>     Edit with live furigana overlays");
    eprintln!("  {program} toggle             Flip the furiganaSource preference");
    process::exit(1);
}

/// Matcher for the configured base ranges, or the built-in one.
fn matcher_from_settings(settings: &Settings) -> Result<Matcher> {
    match settings.base_range_pairs() {
        Some(pairs) => {
            let charset = BaseCharset::from(pairs);
            Matcher::new(&charset).context("Invalid base_ranges in settings")
        }
        None => Ok(Matcher::default()),
    }
}

fn render_file(path: &Path, settings: &Settings) -> Result<()> {
    let markdown = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut renderer = Renderer::new();
    renderer.register(StaticAnnotator::new(matcher_from_settings(settings)?));

    let ctx = RenderContext {
        source_path: Some(path.to_path_buf()),
    };
    println!("{}", renderer.render_html(&markdown, &ctx));
    Ok(())
}

struct App {
    path: PathBuf,
    view: EditorView,
    store: SettingsStore,
    /// First visible line
    scroll: usize,
    /// Text area height from the last draw
    height: usize,
    dirty: bool,
    status: String,
}

impl App {
    fn new(path: PathBuf, store: SettingsStore) -> Result<Self> {
        let bytes = if path.exists() {
            fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            Vec::new()
        };
        let state = EditorState::from_bytes(&bytes)?;
        let config = ExtensionConfig::from_preference(store.furigana_source());
        let matcher = matcher_from_settings(store.settings())?;
        let view = EditorView::with_matcher(state, config, matcher)?;

        Ok(Self {
            path,
            view,
            store,
            scroll: 0,
            height: 0,
            dirty: false,
            status: String::new(),
        })
    }

    fn cursor(&self) -> usize {
        self.view.state().cursor()
    }

    fn move_to(&mut self, offset: usize) -> Result<()> {
        self.view.dispatch(Cmd::SetSelection {
            ranges: vec![SelectionRange::cursor(offset)],
        })?;
        Ok(())
    }

    fn insert(&mut self, text: &str) -> Result<()> {
        let at = self.cursor();
        self.view.dispatch(Cmd::InsertText {
            at,
            text: text.to_string(),
        })?;
        self.dirty = true;
        self.move_to(at + text.len())
    }

    fn backspace(&mut self) -> Result<()> {
        let at = self.cursor();
        if let Some(prev) = self.view.state().prev_char_offset(at) {
            self.view.dispatch(Cmd::Delete { range: prev..at })?;
            self.dirty = true;
            self.move_to(prev)?;
        }
        Ok(())
    }

    fn move_horizontal(&mut self, forward: bool) -> Result<()> {
        let state = self.view.state();
        let at = self.cursor();
        let target = if forward {
            state.next_char_offset(at)
        } else {
            state.prev_char_offset(at)
        };
        match target {
            Some(offset) => self.move_to(offset),
            None => Ok(()),
        }
    }

    /// Move to the same character column on the neighbouring line.
    fn move_vertical(&mut self, down: bool) -> Result<()> {
        let state = self.view.state();
        let at = self.cursor();
        let line = state.line_of_offset(at);
        let target_line = if down {
            if line + 1 >= state.line_count() {
                return Ok(());
            }
            line + 1
        } else {
            match line.checked_sub(1) {
                Some(line) => line,
                None => return Ok(()),
            }
        };

        let column = state.slice(state.offset_of_line(line)..at).chars().count();
        let (start, text) = line_text(state, target_line);
        let offset = text
            .char_indices()
            .nth(column)
            .map_or(start + text.len(), |(i, _)| start + i);
        self.move_to(offset)
    }

    fn save(&mut self) -> Result<()> {
        fs::write(&self.path, self.view.state().text())
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.dirty = false;
        self.status = format!("Saved {}", self.path.display());
        log::info!("saved {}", self.path.display());
        Ok(())
    }

    fn toggle_furigana(&mut self) -> Result<()> {
        let enabled = self.store.toggle_furigana_source()?;
        self.view.reconfigure(ExtensionConfig::from_preference(enabled))?;
        self.status = format!("Furigana overlay {}", if enabled { "on" } else { "off" });
        Ok(())
    }

    /// Keep the cursor line on screen and report the visible range to the view.
    fn sync_viewport(&mut self) -> Result<()> {
        let state = self.view.state();
        let cursor_line = state.line_of_offset(self.cursor());
        let height = self.height.max(1);
        if cursor_line < self.scroll {
            self.scroll = cursor_line;
        } else if cursor_line >= self.scroll + height {
            self.scroll = cursor_line + 1 - height;
        }

        let range = state.offset_of_line(self.scroll)..state.offset_of_line(self.scroll + height);
        if range != state.viewport() {
            self.view.dispatch(Cmd::SetViewport { range })?;
        }
        Ok(())
    }

    /// Returns `false` when the editor should close.
    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Ok(false),
            KeyCode::Char('q') if ctrl => return Ok(false),
            KeyCode::Char('s') if ctrl => self.save()?,
            KeyCode::Char('t') if ctrl => self.toggle_furigana()?,
            KeyCode::Char(ch) if !ctrl => {
                let mut buf = [0u8; 4];
                self.insert(ch.encode_utf8(&mut buf))?;
            }
            KeyCode::Enter => self.insert("\n")?,
            KeyCode::Tab => self.insert("\t")?,
            KeyCode::Backspace => self.backspace()?,
            KeyCode::Left => self.move_horizontal(false)?,
            KeyCode::Right => self.move_horizontal(true)?,
            KeyCode::Up => self.move_vertical(false)?,
            KeyCode::Down => self.move_vertical(true)?,
            KeyCode::Home => {
                let state = self.view.state();
                let start = state.offset_of_line(state.line_of_offset(self.cursor()));
                self.move_to(start)?;
            }
            KeyCode::End => {
                let state = self.view.state();
                let (start, text) = line_text(state, state.line_of_offset(self.cursor()));
                self.move_to(start + text.len())?;
            }
            _ => {}
        }
        Ok(true)
    }
}

/// Start offset and text of `line`, without its line break.
///
/// The empty line after a trailing newline has no `LineRef` and starts at the end.
fn line_text(state: &EditorState, line: usize) -> (usize, String) {
    state.lines().nth(line).map_or_else(
        || (state.len(), String::new()),
        |found| (found.span.start, found.content().to_string()),
    )
}

fn cursor_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

/// Raw text spans, with the character under `cursor` (a line-relative offset) highlighted.
fn text_spans(text: &str, seg_start: usize, cursor: Option<usize>, spans: &mut Vec<Span<'static>>) {
    let Some(cursor) = cursor.filter(|c| *c >= seg_start && *c < seg_start + text.len()) else {
        spans.push(Span::raw(text.to_string()));
        return;
    };
    let split = cursor - seg_start;
    let (before, rest) = text.split_at(split);
    let mut chars = rest.chars();
    let under = chars.next().map(String::from).unwrap_or_default();
    if !before.is_empty() {
        spans.push(Span::raw(before.to_string()));
    }
    spans.push(Span::styled(under, cursor_style()));
    let after = chars.as_str();
    if !after.is_empty() {
        spans.push(Span::raw(after.to_string()));
    }
}

/// Build one display line: overlays drawn as base text followed by its reading.
fn display_line(
    text: &str,
    line_start: usize,
    cursor: Option<usize>,
    decorations: &DecorationSet,
) -> Line<'static> {
    let mut spans = Vec::new();
    let mut pos = 0;

    for segment in layout_line(text, line_start, decorations) {
        match segment {
            LineSegment::Text(raw) => {
                text_spans(raw, pos, cursor, &mut spans);
                pos += raw.len();
            }
            LineSegment::Overlay(record) => {
                for unit in &record.units {
                    spans.push(Span::styled(
                        unit.base.clone(),
                        Style::default().fg(Color::Cyan),
                    ));
                    spans.push(Span::styled(
                        format!("({})", unit.reading),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                pos = record.to - line_start;
            }
        }
    }

    if cursor == Some(text.len()) {
        spans.push(Span::styled(" ", cursor_style()));
    }
    Line::from(spans)
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)].as_ref())
        .split(f.area());

    let title = format!(
        "{}{}",
        app.path.display(),
        if app.dirty { " [+]" } else { "" }
    );
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(chunks[0]);
    app.height = inner.height as usize;

    let state = app.view.state();
    let decorations = app.view.decorations();
    let cursor = app.cursor();
    let cursor_line = state.line_of_offset(cursor);
    let last_line = state.line_count().max(1);

    let lines: Vec<Line> = (app.scroll..last_line.min(app.scroll + app.height))
        .map(|number| {
            let (start, text) = line_text(state, number);
            // A cursor between `\r` and `\n` is drawn at the end of the line.
            let line_cursor = (number == cursor_line).then(|| (cursor - start).min(text.len()));
            display_line(&text, start, line_cursor, &decorations)
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

    let overlay = if app.view.config().furigana_overlay {
        "on"
    } else {
        "off"
    };
    let status = Line::from(vec![
        Span::styled(
            format!(" furigana: {overlay} "),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        Span::raw(format!(" {}", app.status)),
    ]);
    f.render_widget(Paragraph::new(status), chunks[1]);

    let help = Line::from(vec![
        Span::raw("Esc/Ctrl-Q: Quit | "),
        Span::raw("Ctrl-S: Save | "),
        Span::raw("Ctrl-T: Toggle furigana | "),
        Span::raw("Arrows: Move"),
    ]);
    f.render_widget(Paragraph::new(help), chunks[2]);
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;
        app.sync_viewport()?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match app.handle_key(key) {
                Ok(true) => {}
                Ok(false) => return Ok(()),
                Err(e) => {
                    log::warn!("command failed: {e}");
                    app.status = format!("Error: {e}");
                }
            }
        }
    }
}

fn edit_file(path: PathBuf, store: SettingsStore) -> Result<()> {
    let mut app = App::new(path, store)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("furigana-cli", String::as_str);

    let store = match SettingsStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!(
                "Fix or remove the config file at {}",
                Settings::config_path().display()
            );
            process::exit(1);
        }
    };

    match args.get(1..).unwrap_or_default() {
        [cmd, file] if cmd == "render" => render_file(Path::new(file), store.settings()),
        [cmd, file] if cmd == "edit" => edit_file(PathBuf::from(file), store),
        [cmd] if cmd == "toggle" => {
            let mut store = store;
            let enabled = store.toggle_furigana_source()?;
            println!("furiganaSource = {enabled} ({})", store.path().display());
            Ok(())
        }
        _ => usage(program),
    }
}
