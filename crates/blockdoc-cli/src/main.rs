use anyhow::Result;
use blockdoc_config::Config;
use blockdoc_engine::editing::{Block, BlockId, Document, Editor, EditorOptions};
use blockdoc_engine::{BlockRegistry, blocks, io};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block as UiBlock, Borders, List, ListItem, ListState, Paragraph},
};
use std::{
    env,
    io::stdout,
    path::PathBuf,
    process,
    time::{Duration, Instant},
};

struct App {
    document_path: PathBuf,
    editor: Editor,
    block_list_state: ListState,
    status: String,
    dirty: bool,
}

impl App {
    fn new(document_path: PathBuf, options: EditorOptions) -> Result<Self> {
        let mut editor = Editor::with_options(BlockRegistry::with_defaults(), options);

        let document = if document_path.exists() {
            io::read_document(&document_path)?
        } else {
            log::info!(
                "No document at {}, starting empty",
                document_path.display()
            );
            Document::new()
        };
        editor.load(document);

        let mut app = Self {
            document_path,
            editor,
            block_list_state: ListState::default(),
            status: String::new(),
            dirty: false,
        };

        if !app.editor.order().is_empty() {
            app.block_list_state.select(Some(0));
        }

        Ok(app)
    }

    fn selected_id(&self) -> Option<BlockId> {
        let index = self.block_list_state.selected()?;
        self.editor.order().get(index).copied()
    }

    fn next_block(&mut self) {
        let len = self.editor.order().len();
        if len == 0 {
            return;
        }
        let i = match self.block_list_state.selected() {
            Some(i) => (i + 1) % len,
            None => 0,
        };
        self.block_list_state.select(Some(i));
    }

    fn previous_block(&mut self) {
        let len = self.editor.order().len();
        if len == 0 {
            return;
        }
        let i = match self.block_list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.block_list_state.select(Some(i));
    }

    fn move_selected(&mut self, offset: isize) {
        let Some(index) = self.block_list_state.selected() else {
            return;
        };
        let len = self.editor.order().len();
        let target = index as isize + offset;
        if target < 0 || target as usize >= len {
            return;
        }
        let target = target as usize;

        let mut order = self.editor.order().to_vec();
        order.swap(index, target);
        self.editor.set_order(order);
        self.block_list_state.select(Some(target));
        self.dirty = true;
        self.status = "Moved block".to_string();
    }

    fn insert_below(&mut self) {
        let index = match self.block_list_state.selected() {
            Some(i) => i + 1,
            None => self.editor.order().len(),
        };
        match self.editor.insert_default_block(index) {
            Ok(id) => {
                self.block_list_state.select(Some(index));
                self.dirty = true;
                self.status = format!("Inserted {id}");
            }
            Err(e) => self.status = format!("Insert failed: {e}"),
        }
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        if self.editor.remove_block(id) {
            let len = self.editor.order().len();
            if len == 0 {
                self.block_list_state.select(None);
            } else if let Some(i) = self.block_list_state.selected() {
                self.block_list_state.select(Some(i.min(len - 1)));
            }
            self.dirty = true;
            self.status = "Deleted block".to_string();
        }
    }

    /// Applies the first inactive tune of the selected block, cycling its
    /// style (bullet → numbered → bullet for lists).
    fn tune_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(block) = self.editor.block(id) else {
            return;
        };
        let Some(definition) = self.editor.registry().get(&block.kind) else {
            return;
        };
        let next = definition
            .tunes()
            .iter()
            .find(|tune| !(tune.is_active)(&block.data))
            .map(|tune| tune.name);
        match next {
            Some(name) => {
                if self.editor.apply_tune(id, name) {
                    self.dirty = true;
                    self.status = format!("Applied tune: {name}");
                }
            }
            None => self.status = "No tunes for this block".to_string(),
        }
    }

    fn undo(&mut self) {
        if self.editor.undo() {
            self.dirty = true;
            self.status = format!("Undo ({} left)", self.editor.history().undo_depth());
            self.clamp_selection();
        } else {
            self.status = "Nothing to undo".to_string();
        }
    }

    fn redo(&mut self) {
        if self.editor.redo() {
            self.dirty = true;
            self.status = format!("Redo ({} left)", self.editor.history().redo_depth());
            self.clamp_selection();
        } else {
            self.status = "Nothing to redo".to_string();
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.editor.order().len();
        if len == 0 {
            self.block_list_state.select(None);
        } else if let Some(i) = self.block_list_state.selected() {
            self.block_list_state.select(Some(i.min(len - 1)));
        } else {
            self.block_list_state.select(Some(0));
        }
    }

    fn save(&mut self) {
        self.editor.flush_history();
        match io::write_document(&self.document_path, self.editor.document()) {
            Ok(()) => {
                self.dirty = false;
                self.status = format!("Saved {}", self.document_path.display());
            }
            Err(e) => self.status = format!("Save failed: {e}"),
        }
    }

    fn block_summary(&self, block: &Block) -> String {
        let text = match block.kind.as_str() {
            blocks::paragraph::KIND => block
                .data
                .get("text")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            blocks::list::KIND => {
                let items = blocks::list::items(&block.data);
                format!("{} item(s)", items.len())
            }
            _ => String::new(),
        };
        let mut summary: String = text.chars().take(40).collect();
        if summary.len() < text.len() {
            summary.push('…');
        }
        summary
    }

    fn render_selected_content(&self) -> Vec<String> {
        let Some(block) = self.selected_id().and_then(|id| self.editor.block(id)) else {
            return vec!["No block selected".to_string()];
        };

        let mut lines = vec![format!("id:   {}", block.id), format!("kind: {}", block.kind)];
        lines.push(String::new());

        match block.kind.as_str() {
            blocks::list::KIND => {
                let marker = if blocks::list::style(&block.data) == blocks::list::STYLE_ORDERED {
                    "1."
                } else {
                    "•"
                };
                for item in blocks::list::items(&block.data) {
                    lines.push(format!("{marker} {item}"));
                }
            }
            _ => match serde_json::to_string_pretty(&block.data) {
                Ok(rendered) => lines.extend(rendered.lines().map(|s| s.to_string())),
                Err(e) => lines.push(format!("Error rendering block: {e}")),
            },
        }

        lines
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <document.json>", args[0]);
        process::exit(1);
    }
    let document_path = PathBuf::from(&args[1]);

    let options = match Config::load() {
        Ok(Some(config)) => EditorOptions {
            history_cap: config.history_cap,
            quiet_period: Duration::from_millis(config.history_quiet_ms),
            default_kind: config.default_block,
        },
        Ok(None) => EditorOptions::default(),
        Err(e) => {
            eprintln!(
                "Error: Failed to load config file at {}: {e}",
                Config::config_path().display()
            );
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(document_path, options)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    loop {
        terminal.draw(|f| ui(f, app))?;

        // Poll so pending coalesced edits flush once the quiet period passes
        // even with no further input.
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => return Ok(()),
                    KeyCode::Down | KeyCode::Char('j') => app.next_block(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_block(),
                    KeyCode::Char('J') => app.move_selected(1),
                    KeyCode::Char('K') => app.move_selected(-1),
                    KeyCode::Char('o') => app.insert_below(),
                    KeyCode::Char('d') => app.delete_selected(),
                    KeyCode::Char('t') => app.tune_selected(),
                    KeyCode::Char('u') => app.undo(),
                    KeyCode::Char('r') => app.redo(),
                    KeyCode::Char('w') => app.save(),
                    _ => {}
                }
            }
        } else {
            app.editor.tick(Instant::now());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(f.area());

    // Block list panel
    let block_items: Vec<ListItem> = app
        .editor
        .order()
        .iter()
        .map(|id| {
            let label = match app.editor.block(*id) {
                Some(block) => format!("{} {}", block.kind, app.block_summary(block)),
                None => format!("missing {id}"),
            };
            ListItem::new(vec![Line::from(vec![Span::raw(label)])])
        })
        .collect();

    let title = if app.dirty { "Blocks *" } else { "Blocks" };
    let blocks_list = List::new(block_items)
        .block(UiBlock::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));

    f.render_stateful_widget(blocks_list, chunks[0], &mut app.block_list_state);

    // Content panel
    let content_text: Vec<Line> = app
        .render_selected_content()
        .into_iter()
        .map(Line::from)
        .collect();

    let content = Paragraph::new(content_text)
        .block(UiBlock::default().borders(Borders::ALL).title("Block"))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(content, chunks[1]);

    // Status line + key help at bottom
    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("j/k: Select | "),
        Span::raw("J/K: Move | "),
        Span::raw("o: Insert | d: Delete | t: Tune | "),
        Span::raw("u: Undo | r: Redo | w: Save"),
    ]);
    let status_text = Line::from(Span::raw(app.status.clone()));

    let help = Paragraph::new(vec![status_text, help_text]).block(UiBlock::default());

    let bottom_chunk = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    f.render_widget(help, bottom_chunk[1]);
}
