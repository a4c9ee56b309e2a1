//! Ratatui front end: search box with autocomplete, facet sidebar, results
//! list with paging, and an add-document overlay.
//!
//! The event loop stays single threaded. Engine calls run on the async
//! runtime and report back over a channel; every search carries a sequence
//! number so a slow response can never overwrite a newer one. Add and
//! delete re-run the current search on success, and failures land in the
//! status line instead of disappearing.

use std::io;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use crossbeam_channel::{Receiver, Sender, unbounded};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use lru::LruCache;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use serde_json::{Value, json};
use tokio::runtime::Handle;

use crate::config::AppConfig;
use crate::engine::client::EngineClient;
use crate::engine::types::SearchResponse;
use crate::export::strip_highlight_tags;
use crate::model::{SearchHit, Sport};
use crate::query::builder::QueryBuilder;
use crate::query::facets::{self, AgeBucket, FacetCounts, FacetSelection};
use crate::ui::date_input;

const SUGGEST_CACHE_SIZE: usize = 64;
const TICK: Duration = Duration::from_millis(50);

pub fn run_tui(cfg: AppConfig, handle: Handle) -> Result<()> {
    let client = EngineClient::from_config(&cfg.engine)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, App::new(cfg, client, handle));

    teardown_terminal()?;
    result
}

fn event_loop(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    // The original searches on initial load before any input.
    app.spawn_search(0);

    loop {
        terminal.draw(|f| app.draw(f))?;

        if crossterm::event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }

        while let Ok(msg) = app.rx.try_recv() {
            app.handle_engine_event(msg);
        }

        app.flush_debounce();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn teardown_terminal() -> Result<()> {
    let mut stdout = io::stdout();
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen)?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pane {
    Search,
    Results,
    Facets,
}

enum EngineEvent {
    SearchDone {
        seq: u64,
        page: usize,
        result: Result<SearchResponse, String>,
    },
    SuggestDone {
        seq: u64,
        term: String,
        titles: Vec<String>,
    },
    MutationDone {
        result: Result<String, String>,
    },
}

/// One selectable row of the facet sidebar.
enum FacetEntry {
    Title(String, u64),
    Popularity(u8, &'static str, u64),
    Age(AgeBucket, u64),
}

struct App {
    cfg: AppConfig,
    client: EngineClient,
    builder: QueryBuilder,
    handle: Handle,
    tx: Sender<EngineEvent>,
    rx: Receiver<EngineEvent>,

    pane: Pane,
    input: String,
    results: Vec<SearchHit>,
    selected: usize,
    total: u64,
    page: usize,
    facets: FacetCounts,
    selection: FacetSelection,
    facet_cursor: usize,

    suggestions: Vec<String>,
    suggest_cache: LruCache<String, Vec<String>>,

    search_seq: u64,
    applied_seq: u64,
    suggest_seq: u64,
    debounce_due: Option<Instant>,

    form: Option<AddForm>,
    pending_delete: Option<String>,
    status: Option<String>,
    error: Option<String>,
    should_quit: bool,
}

impl App {
    fn new(cfg: AppConfig, client: EngineClient, handle: Handle) -> Self {
        let builder = QueryBuilder::from_config(&cfg.search);
        let (tx, rx) = unbounded();
        Self {
            cfg,
            client,
            builder,
            handle,
            tx,
            rx,
            pane: Pane::Search,
            input: String::new(),
            results: Vec::new(),
            selected: 0,
            total: 0,
            page: 0,
            facets: FacetCounts::default(),
            selection: FacetSelection::default(),
            facet_cursor: 0,
            suggestions: Vec::new(),
            suggest_cache: LruCache::new(
                NonZeroUsize::new(SUGGEST_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ),
            search_seq: 0,
            applied_seq: 0,
            suggest_seq: 0,
            debounce_due: None,
            form: None,
            pending_delete: None,
            status: None,
            error: None,
            should_quit: false,
        }
    }

    // ---- engine calls ----------------------------------------------------

    fn search_body(&self, page: usize) -> Value {
        let size = self.cfg.search.page_size;
        let now = Utc::now();
        let mut body = json!({
            "from": page * size,
            "size": size,
            "aggs": facets::aggregations(now),
            "highlight": {
                "fields": {"title": {"fragment_size": 100, "number_of_fragments": 1}}
            },
        });
        let query = self.builder.query_for(&self.input);
        if let Some(q) = facets::wrap_query(query, self.selection.filter_clauses(now)) {
            body["query"] = q;
        }
        body
    }

    fn spawn_search(&mut self, page: usize) {
        self.search_seq += 1;
        let seq = self.search_seq;
        let body = self.search_body(page);
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = client.search(&body).await.map_err(|e| e.to_string());
            let _ = tx.send(EngineEvent::SearchDone { seq, page, result });
        });
    }

    fn spawn_suggest(&mut self, term: String) {
        let Some(query) = self.builder.query_for(&term) else {
            return;
        };
        self.suggest_seq += 1;
        let seq = self.suggest_seq;
        let body = json!({
            "size": self.cfg.autocomplete.size,
            "query": query,
            "_source": ["title"],
        });
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let titles = match client.search(&body).await {
                Ok(response) => suggestion_titles(response),
                // autocomplete is best effort; the main search surfaces errors
                Err(err) => {
                    tracing::debug!("suggest failed: {err}");
                    Vec::new()
                }
            };
            let _ = tx.send(EngineEvent::SuggestDone { seq, term, titles });
        });
    }

    fn spawn_create(&mut self, doc: Sport) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = client
                .create_document(&doc)
                .await
                .map(|r| format!("indexed as {}", r.id))
                .map_err(|e| e.to_string());
            let _ = tx.send(EngineEvent::MutationDone { result });
        });
    }

    fn spawn_delete(&mut self, id: String) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        self.handle.spawn(async move {
            let result = client
                .delete_document(&id)
                .await
                .map(|r| format!("{} {}", r.result, id))
                .map_err(|e| e.to_string());
            let _ = tx.send(EngineEvent::MutationDone { result });
        });
    }

    // ---- input -----------------------------------------------------------

    fn on_input_changed(&mut self) {
        self.page = 0;
        if self.cfg.ui.debounce_ms == 0 {
            self.spawn_search(0);
        } else {
            self.debounce_due =
                Some(Instant::now() + Duration::from_millis(self.cfg.ui.debounce_ms));
        }

        let term = self.input.clone();
        if term.chars().count() >= self.cfg.autocomplete.min_chars {
            if let Some(cached) = self.suggest_cache.get(&term) {
                self.suggestions = cached.clone();
            } else {
                self.spawn_suggest(term);
            }
        } else {
            self.suggestions.clear();
        }
    }

    fn flush_debounce(&mut self) {
        if let Some(due) = self.debounce_due
            && Instant::now() >= due
        {
            self.debounce_due = None;
            self.spawn_search(self.page);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.form.is_some() {
            self.handle_form_key(key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('n') {
            self.form = Some(AddForm::default());
            return;
        }

        match self.pane {
            Pane::Search => self.handle_search_key(key),
            Pane::Results => self.handle_results_key(key),
            Pane::Facets => self.handle_facets_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.push(c);
                self.on_input_changed();
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.on_input_changed();
            }
            KeyCode::Enter => {
                self.debounce_due = None;
                self.page = 0;
                self.suggestions.clear();
                self.spawn_search(0);
            }
            KeyCode::Tab => {
                if let Some(first) = self.suggestions.first().cloned() {
                    self.input = first;
                    self.suggestions.clear();
                    self.on_input_changed();
                } else {
                    self.pane = Pane::Results;
                }
            }
            KeyCode::Down => self.pane = Pane::Results,
            KeyCode::Esc => self.suggestions.clear(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        // A pending delete survives only its confirmation keypress.
        let pending = self.pending_delete.take();

        match key.code {
            KeyCode::Char('y') => {
                if let Some(id) = pending {
                    self.status = None;
                    self.spawn_delete(id);
                }
            }
            KeyCode::Char('d') => {
                if let Some(hit) = self.results.get(self.selected) {
                    self.status = Some(format!(
                        "delete \"{}\"? press y to confirm",
                        strip_highlight_tags(hit.display_title())
                    ));
                    self.pending_delete = Some(hit.id.clone());
                }
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.results.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Left | KeyCode::PageUp => {
                if self.page > 0 {
                    self.page -= 1;
                    self.spawn_search(self.page);
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                let size = self.cfg.search.page_size;
                if ((self.page + 1) * size) < self.total as usize {
                    self.page += 1;
                    self.spawn_search(self.page);
                }
            }
            KeyCode::Tab => self.pane = Pane::Facets,
            KeyCode::Esc => self.pane = Pane::Search,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_facets_key(&mut self, key: KeyEvent) {
        let entries = self.facet_entries();
        match key.code {
            KeyCode::Up => self.facet_cursor = self.facet_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.facet_cursor + 1 < entries.len() {
                    self.facet_cursor += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(entry) = entries.get(self.facet_cursor) {
                    self.toggle_facet(entry);
                    self.page = 0;
                    self.spawn_search(0);
                }
            }
            KeyCode::Char('c') => {
                if !self.selection.is_empty() {
                    self.selection.clear();
                    self.page = 0;
                    self.spawn_search(0);
                }
            }
            KeyCode::Tab => self.pane = Pane::Search,
            KeyCode::Esc => self.pane = Pane::Search,
            KeyCode::Char('q') => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.submit_form();
            return;
        }

        match key.code {
            KeyCode::Esc => self.form = None,
            KeyCode::Tab | KeyCode::Down => form.active = (form.active + 1) % FORM_FIELDS.len(),
            KeyCode::BackTab | KeyCode::Up => {
                form.active = (form.active + FORM_FIELDS.len() - 1) % FORM_FIELDS.len();
            }
            KeyCode::Enter => {
                if form.active + 1 < FORM_FIELDS.len() {
                    form.active += 1;
                } else {
                    self.submit_form();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.buffers[form.active].push(c);
            }
            KeyCode::Backspace => {
                form.buffers[form.active].pop();
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        match form.to_sport() {
            Ok(doc) => {
                self.form = None;
                self.status = Some("adding document...".into());
                self.spawn_create(doc);
            }
            Err(msg) => form.error = Some(msg),
        }
    }

    fn toggle_facet(&mut self, entry: &FacetEntry) {
        match entry {
            FacetEntry::Title(title, _) => {
                if self.selection.title.as_deref() == Some(title) {
                    self.selection.title = None;
                } else {
                    self.selection.title = Some(title.clone());
                }
            }
            FacetEntry::Popularity(min, _, _) => {
                if self.selection.min_popularity == Some(*min) {
                    self.selection.min_popularity = None;
                } else {
                    self.selection.min_popularity = Some(*min);
                }
            }
            FacetEntry::Age(bucket, _) => {
                if self.selection.age == Some(*bucket) {
                    self.selection.age = None;
                } else {
                    self.selection.age = Some(*bucket);
                }
            }
        }
    }

    // ---- engine events ---------------------------------------------------

    fn handle_engine_event(&mut self, msg: EngineEvent) {
        match msg {
            EngineEvent::SearchDone { seq, page, result } => {
                if seq <= self.applied_seq {
                    return; // stale response from an older keystroke
                }
                self.applied_seq = seq;
                match result {
                    Ok(response) => {
                        self.error = None;
                        self.total = response.hits.total.value;
                        if let Some(aggs) = &response.aggregations {
                            self.facets = facets::parse_aggregations(aggs);
                        }
                        self.page = page;
                        self.results = response.into_hits();
                        if self.selected >= self.results.len() {
                            self.selected = self.results.len().saturating_sub(1);
                        }
                        // A delete can empty the last page; fall back one.
                        if self.results.is_empty() && self.page > 0 && self.total > 0 {
                            self.page -= 1;
                            self.spawn_search(self.page);
                        }
                    }
                    Err(err) => self.error = Some(err),
                }
            }
            EngineEvent::SuggestDone { seq, term, titles } => {
                self.suggest_cache.put(term, titles.clone());
                if seq == self.suggest_seq
                    && self.input.chars().count() >= self.cfg.autocomplete.min_chars
                {
                    self.suggestions = titles;
                }
            }
            EngineEvent::MutationDone { result } => match result {
                Ok(msg) => {
                    self.status = Some(msg);
                    self.error = None;
                    // the original reloads the page here; re-running the
                    // current search is the TUI equivalent
                    self.spawn_search(self.page);
                }
                Err(err) => self.error = Some(err),
            },
        }
    }

    fn facet_entries(&self) -> Vec<FacetEntry> {
        let mut entries = Vec::new();

        for (min, label) in facets::popularity_buckets() {
            let count = lookup(&self.facets.popularity, label);
            entries.push(FacetEntry::Popularity(min, label, count));
        }
        for bucket in AgeBucket::all() {
            let count = lookup(&self.facets.event_date, bucket.label());
            entries.push(FacetEntry::Age(*bucket, count));
        }
        for (title, count) in &self.facets.titles {
            entries.push(FacetEntry::Title(title.clone(), *count));
        }

        entries
    }

    // ---- drawing ---------------------------------------------------------

    fn draw(&self, f: &mut Frame) {
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.area());

        self.draw_search_box(f, chunks[0]);

        let main =
            Layout::horizontal([Constraint::Length(34), Constraint::Min(0)]).split(chunks[1]);
        self.draw_sidebar(f, main[0]);
        self.draw_results(f, main[1]);
        self.draw_footer(f, chunks[2]);

        if self.pane == Pane::Search && !self.suggestions.is_empty() && self.form.is_none() {
            self.draw_suggestions(f, chunks[0]);
        }
        if let Some(form) = &self.form {
            draw_form(f, form);
        }
    }

    fn pane_style(&self, pane: Pane) -> Style {
        if self.pane == pane && self.form.is_none() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        }
    }

    fn draw_search_box(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.pane_style(Pane::Search))
            .title("Search (prefix d=, c=, s= matches a single field)");
        let text = if self.pane == Pane::Search && self.form.is_none() {
            format!("{}\u{2588}", self.input)
        } else {
            self.input.clone()
        };
        f.render_widget(Paragraph::new(text).block(block), area);
    }

    fn draw_suggestions(&self, f: &mut Frame, header: Rect) {
        let height = self.suggestions.len() as u16 + 2;
        let width = header.width.saturating_sub(4).min(60);
        let area =
            Rect::new(header.x + 2, header.y + header.height, width, height).intersection(f.area());
        if area.width < 5 || area.height < 3 {
            return;
        }

        let items: Vec<ListItem> = self
            .suggestions
            .iter()
            .map(|s| ListItem::new(s.as_str()))
            .collect();
        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Suggestions (Tab to accept)"),
        );
        f.render_widget(Clear, area);
        f.render_widget(list, area);
    }

    fn draw_sidebar(&self, f: &mut Frame, area: Rect) {
        let mut items: Vec<ListItem> = Vec::new();
        let entries = self.facet_entries();

        items.push(ListItem::new(Line::from(Span::styled(
            "Popularity (from 1 to 5)",
            Style::default().add_modifier(Modifier::BOLD),
        ))));
        let mut rows = Vec::new();
        for entry in &entries {
            let (label, count, active) = match entry {
                FacetEntry::Popularity(min, label, count) => {
                    (label.to_string(), *count, self.selection.min_popularity == Some(*min))
                }
                FacetEntry::Age(bucket, count) => (
                    bucket.label().to_string(),
                    *count,
                    self.selection.age == Some(*bucket),
                ),
                FacetEntry::Title(title, count) => (
                    title.clone(),
                    *count,
                    self.selection.title.as_deref() == Some(title),
                ),
            };
            let marker = if active { "[x]" } else { "[ ]" };
            rows.push(format!("{marker} {label} ({count})"));
        }

        // Section headers are fixed; the facet cursor indexes into `rows`.
        let popularity_rows = facets::popularity_buckets().len();
        let age_rows = AgeBucket::all().len();
        for (i, row) in rows.iter().enumerate() {
            if i == popularity_rows {
                items.push(ListItem::new(Line::from(Span::styled(
                    "Date",
                    Style::default().add_modifier(Modifier::BOLD),
                ))));
            }
            if i == popularity_rows + age_rows {
                items.push(ListItem::new(Line::from(Span::styled(
                    "Title",
                    Style::default().add_modifier(Modifier::BOLD),
                ))));
            }
            let style = if self.pane == Pane::Facets && i == self.facet_cursor {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            items.push(ListItem::new(Line::from(Span::styled(row.clone(), style))));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.pane_style(Pane::Facets))
            .title("Facets");
        f.render_widget(List::new(items).block(block), area);
    }

    fn draw_results(&self, f: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .results
            .iter()
            .map(|hit| {
                let title = strip_highlight_tags(hit.display_title());
                let meta = format!(
                    "{} | popularity {} | {}",
                    if hit.event_date.is_empty() {
                        "no date"
                    } else {
                        hit.event_date.as_str()
                    },
                    hit.popularity,
                    hit.sport_type.join(", "),
                );
                ListItem::new(vec![
                    Line::from(Span::styled(
                        title,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
                ])
            })
            .collect();

        let title = format!(
            "Results {} ",
            paging_info(self.total, self.page, self.cfg.search.page_size, self.results.len())
        );
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.pane_style(Pane::Results))
            .title(title);
        let list = List::new(items).block(block).highlight_symbol("> ");

        let mut state = ListState::default();
        if !self.results.is_empty() && self.pane == Pane::Results {
            state.select(Some(self.selected));
        }
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let message = if let Some(err) = &self.error {
            Line::from(Span::styled(
                format!("error: {err}"),
                Style::default().fg(Color::Red),
            ))
        } else if let Some(status) = &self.status {
            Line::from(Span::styled(status.clone(), Style::default().fg(Color::Green)))
        } else {
            Line::from("")
        };

        let help = Line::from(Span::styled(
            "Tab panes | Enter search/toggle | \u{2190}\u{2192} page | Ctrl+N add | d delete | c clear facets | q quit",
            Style::default().fg(Color::DarkGray),
        ));

        f.render_widget(Paragraph::new(vec![message, help]), area);
    }
}

fn lookup(counts: &[(String, u64)], label: &str) -> u64 {
    counts
        .iter()
        .find(|(key, _)| key == label)
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

fn suggestion_titles(response: SearchResponse) -> Vec<String> {
    let mut titles = Vec::new();
    for hit in response.into_hits() {
        let title = strip_highlight_tags(hit.display_title());
        if !title.is_empty() && !titles.contains(&title) {
            titles.push(title);
        }
    }
    titles
}

fn paging_info(total: u64, page: usize, page_size: usize, shown: usize) -> String {
    if total == 0 {
        return "(0 results)".into();
    }
    let from = page * page_size + 1;
    let to = page * page_size + shown;
    format!("({from}-{to} of {total})")
}

const FORM_FIELDS: [&str; 7] = [
    "Title",
    "Event date",
    "Sport types (comma separated)",
    "Description",
    "Content",
    "Snippet",
    "Popularity (0-5)",
];

struct AddForm {
    buffers: [String; 7],
    active: usize,
    error: Option<String>,
}

impl Default for AddForm {
    fn default() -> Self {
        Self {
            buffers: std::array::from_fn(|_| String::new()),
            active: 0,
            error: None,
        }
    }
}

impl AddForm {
    /// Build the document to index. Unfilled fields become blank values,
    /// never omitted keys.
    fn to_sport(&self) -> Result<Sport, String> {
        let date_input = self.buffers[1].trim();
        let event_date = if date_input.is_empty() {
            String::new()
        } else {
            date_input::parse_event_date(date_input)
                .ok_or_else(|| format!("unrecognized date '{date_input}'"))?
        };

        let rating_input = self.buffers[6].trim();
        let popularity = if rating_input.is_empty() {
            0
        } else {
            rating_input
                .parse::<i64>()
                .map(Sport::clamp_popularity)
                .map_err(|_| "popularity must be a number".to_string())?
        };

        Ok(Sport {
            title: self.buffers[0].trim().to_string(),
            event_date,
            popularity,
            sport_type: Sport::parse_sport_types(&self.buffers[2]),
            description: self.buffers[3].trim().to_string(),
            content: self.buffers[4].trim().to_string(),
            snippet: self.buffers[5].trim().to_string(),
        })
    }
}

fn draw_form(f: &mut Frame, form: &AddForm) {
    let area = centered_rect(f.area(), 64, FORM_FIELDS.len() as u16 + 4);

    let mut lines: Vec<Line> = FORM_FIELDS
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if i == form.active {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            Line::from(Span::styled(
                format!("{label}: {}", form.buffers[i]),
                style,
            ))
        })
        .collect();
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Add Sport (Ctrl+S submit, Esc cancel)");
    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered_rect(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect::new(
        outer.x + (outer.width - width) / 2,
        outer.y + (outer.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_form_builds_blank_document() {
        let form = AddForm::default();
        let doc = form.to_sport().unwrap();
        assert_eq!(doc, Sport::default());

        // every key present even when blank
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 7);
    }

    #[test]
    fn test_form_parses_fields() {
        let mut form = AddForm::default();
        form.buffers[0] = "City Marathon".into();
        form.buffers[1] = "04/19/1998".into();
        form.buffers[2] = "running, road".into();
        form.buffers[6] = "9".into();

        let doc = form.to_sport().unwrap();
        assert_eq!(doc.title, "City Marathon");
        assert_eq!(doc.event_date, "1998-04-19");
        assert_eq!(doc.sport_type, vec!["running", "road"]);
        assert_eq!(doc.popularity, 5); // clamped
    }

    #[test]
    fn test_form_rejects_bad_date() {
        let mut form = AddForm::default();
        form.buffers[1] = "next tuesday".into();
        assert!(form.to_sport().is_err());
    }

    #[test]
    fn test_form_rejects_non_numeric_popularity() {
        let mut form = AddForm::default();
        form.buffers[6] = "high".into();
        assert!(form.to_sport().is_err());
    }

    #[test]
    fn test_paging_info() {
        assert_eq!(paging_info(0, 0, 20, 0), "(0 results)");
        assert_eq!(paging_info(45, 0, 20, 20), "(1-20 of 45)");
        assert_eq!(paging_info(45, 2, 20, 5), "(41-45 of 45)");
    }

    #[test]
    fn test_suggestion_titles_dedup() {
        let response: SearchResponse = serde_json::from_value(json!({
            "hits": {"total": {"value": 3}, "hits": [
                {"_id": "1", "_source": {"title": "Derby"}},
                {"_id": "2", "_source": {"title": "Derby"}},
                {"_id": "3", "_source": {"title": "Regatta"},
                 "highlight": {"title": ["<em>Regatta</em>"]}},
            ]}
        }))
        .unwrap();
        assert_eq!(suggestion_titles(response), vec!["Derby", "Regatta"]);
    }
}
