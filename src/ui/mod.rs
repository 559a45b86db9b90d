use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::{self, InsightProvider};
use crate::data::ReportRepository;
use crate::models::{PortfolioModeKind, StockPick, TimeWindow};
use crate::query::{self, ScreenerRow, SortDirection, SortField};
use crate::scoring::{composite_score, score_breakdown};
use crate::utils;

pub mod components;

use components::AppLayout;

const OFFLINE_MESSAGE: &str = "AI commentary is disabled in offline mode.";

/// Dashboard tabs, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Sectors,
    Screener,
    Portfolio,
    Alerts,
    Analyzer,
}

impl Tab {
    const ALL: [Tab; 6] = [
        Tab::Dashboard,
        Tab::Sectors,
        Tab::Screener,
        Tab::Portfolio,
        Tab::Alerts,
        Tab::Analyzer,
    ];

    fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Sectors => "Sectors",
            Tab::Screener => "Screener",
            Tab::Portfolio => "Portfolio",
            Tab::Alerts => "Alerts",
            Tab::Analyzer => "Analyzer",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }

    fn previous(&self) -> Tab {
        Tab::ALL[(self.index() + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Completion messages from spawned insight tasks, delivered to the UI
/// loop over a channel. Each carries the generation it was spawned for;
/// completions from a superseded generation are dropped.
#[derive(Debug)]
pub enum UiUpdate {
    StockInsight { generation: u64, text: String },
    FileInsight { generation: u64, text: String },
}

/// Main application state
pub struct App {
    repo: ReportRepository,
    provider: Option<Arc<dyn InsightProvider>>,
    update_tx: mpsc::Sender<UiUpdate>,
    update_rx: mpsc::Receiver<UiUpdate>,

    tab: Tab,
    status_message: String,
    should_quit: bool,

    // Sectors tab
    sector_list_state: ListState,

    // Screener tab
    search_query: String,
    sort_field: SortField,
    sort_direction: SortDirection,
    screener_state: TableState,

    // Stock detail overlay
    detail_symbol: Option<String>,
    insight_text: Option<String>,
    insight_loading: bool,
    insight_generation: u64,

    // Portfolio tab
    mode_index: usize,

    // Alerts tab
    alert_window: TimeWindow,

    // Analyzer tab
    file_path_input: String,
    analysis_text: Option<String>,
    analysis_loading: bool,
    analysis_generation: u64,
}

/// Run the dashboard over the given repository. `provider` is `None` in
/// offline mode; every insight panel then shows a fixed notice instead
/// of calling out.
pub async fn run(repo: ReportRepository, provider: Option<Arc<dyn InsightProvider>>) -> Result<()> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(repo, provider);
    let result = app.run_loop(&mut terminal).await;

    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

impl App {
    pub fn new(repo: ReportRepository, provider: Option<Arc<dyn InsightProvider>>) -> Self {
        let (update_tx, update_rx) = mpsc::channel(16);
        let mut sector_list_state = ListState::default();
        sector_list_state.select(Some(0));
        let mut screener_state = TableState::default();
        screener_state.select(Some(0));

        Self {
            repo,
            provider,
            update_tx,
            update_rx,
            tab: Tab::Dashboard,
            status_message: "Ready".to_string(),
            should_quit: false,
            sector_list_state,
            search_query: String::new(),
            sort_field: SortField::Score,
            sort_direction: SortDirection::Descending,
            screener_state,
            detail_symbol: None,
            insight_text: None,
            insight_loading: false,
            insight_generation: 0,
            mode_index: 0,
            alert_window: TimeWindow::LastMonth,
            file_path_input: String::new(),
            analysis_text: None,
            analysis_loading: false,
            analysis_generation: 0,
        }
    }

    /// Main application loop: draw, drain task completions, poll input.
    async fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            self.drain_updates();

            if event::poll(std::time::Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    /// Apply completed insight tasks, dropping stale generations so a
    /// slow early request can never overwrite a newer result.
    fn drain_updates(&mut self) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                UiUpdate::StockInsight { generation, text } => {
                    if generation == self.insight_generation {
                        self.insight_text = Some(text);
                        self.insight_loading = false;
                    } else {
                        debug!("dropping stale stock insight (generation {})", generation);
                    }
                }
                UiUpdate::FileInsight { generation, text } => {
                    if generation == self.analysis_generation {
                        self.analysis_text = Some(text);
                        self.analysis_loading = false;
                    } else {
                        debug!("dropping stale file insight (generation {})", generation);
                    }
                }
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        // Detail overlay captures input ahead of the tab underneath.
        if self.detail_symbol.is_some() {
            match key {
                KeyCode::Esc | KeyCode::Char('b') => {
                    self.detail_symbol = None;
                    self.insight_text = None;
                    self.insight_loading = false;
                }
                KeyCode::Char('a') => self.request_insight_for_detail(),
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::BackTab => self.tab = self.tab.previous(),
            _ => match self.tab {
                Tab::Dashboard => self.handle_dashboard_key(key),
                Tab::Sectors => self.handle_sectors_key(key),
                Tab::Screener => self.handle_screener_key(key),
                Tab::Portfolio => self.handle_portfolio_key(key),
                Tab::Alerts => self.handle_alerts_key(key),
                Tab::Analyzer => self.handle_analyzer_key(key),
            },
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_sectors_key(&mut self, key: KeyCode) {
        let count = self.repo.picks().len();
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Down => self.move_sector_selection(count, 1),
            KeyCode::Up => self.move_sector_selection(count, -1),
            KeyCode::Enter => {
                if let Some(index) = self.sector_list_state.selected() {
                    let symbol = self
                        .grouped_picks()
                        .get(index)
                        .map(|pick| pick.symbol.clone());
                    if let Some(symbol) = symbol {
                        self.open_detail(symbol);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_screener_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.search_query.is_empty() {
                    self.should_quit = true;
                } else {
                    self.search_query.clear();
                }
            }
            KeyCode::Down => {
                let count = self.current_rows().len();
                self.move_table_selection(count, 1);
            }
            KeyCode::Up => {
                let count = self.current_rows().len();
                self.move_table_selection(count, -1);
            }
            KeyCode::Enter => {
                if let Some(index) = self.screener_state.selected() {
                    if let Some(row) = self.current_rows().get(index) {
                        let symbol = row.symbol.clone();
                        self.open_detail(symbol);
                    }
                }
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            // Digits never occur in NSE tickers, so they are safe to
            // reserve for sort control while everything else types.
            KeyCode::Char(c @ '1'..='4') => {
                let index = (c as usize) - ('1' as usize);
                self.sort_field = SortField::ALL[index];
                self.status_message = format!("Sorting by {}", self.sort_field.label());
            }
            KeyCode::Char('0') => {
                self.sort_direction = self.sort_direction.toggled();
            }
            KeyCode::Char(c) => {
                self.search_query.push(c);
            }
            _ => {}
        }
    }

    fn handle_portfolio_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Left => {
                self.mode_index =
                    (self.mode_index + PortfolioModeKind::ALL.len() - 1) % PortfolioModeKind::ALL.len();
            }
            KeyCode::Right | KeyCode::Char('m') => {
                self.mode_index = (self.mode_index + 1) % PortfolioModeKind::ALL.len();
            }
            _ => {}
        }
    }

    fn handle_alerts_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('1') => self.alert_window = TimeWindow::Last24h,
            KeyCode::Char('2') => self.alert_window = TimeWindow::LastWeek,
            KeyCode::Char('3') => self.alert_window = TimeWindow::LastMonth,
            _ => {}
        }
    }

    fn handle_analyzer_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                if self.file_path_input.is_empty() {
                    self.should_quit = true;
                } else {
                    self.file_path_input.clear();
                }
            }
            KeyCode::Enter => self.analyze_file(),
            KeyCode::Backspace => {
                self.file_path_input.pop();
            }
            KeyCode::Char(c) => {
                self.file_path_input.push(c);
            }
            _ => {}
        }
    }

    fn move_sector_selection(&mut self, count: usize, delta: i64) {
        if count == 0 {
            return;
        }
        let current = self.sector_list_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(count as i64) as usize;
        self.sector_list_state.select(Some(next));
    }

    fn move_table_selection(&mut self, count: usize, delta: i64) {
        if count == 0 {
            return;
        }
        let current = self.screener_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(count as i64) as usize;
        self.screener_state.select(Some(next));
    }

    /// Picks flattened in sector-group order, matching the sectors list.
    fn grouped_picks(&self) -> Vec<&StockPick> {
        query::group_by_sector(self.repo.picks())
            .into_iter()
            .flat_map(|(_, members)| members)
            .collect()
    }

    /// Screener rows for the current query, sort field and direction.
    fn current_rows(&self) -> Vec<ScreenerRow> {
        let matches: Vec<StockPick> = query::search(self.repo.picks(), &self.search_query)
            .into_iter()
            .cloned()
            .collect();
        let mut rows = query::screener_rows(&matches, self.repo.weights());
        query::sort_rows(&mut rows, self.sort_field, self.sort_direction);
        rows
    }

    fn find_pick(&self, symbol: &str) -> Option<&StockPick> {
        self.repo.picks().iter().find(|p| p.symbol == symbol)
    }

    /// Open the deep-dive overlay for a symbol and immediately request
    /// commentary for it, as selecting a card does.
    fn open_detail(&mut self, symbol: String) {
        self.detail_symbol = Some(symbol);
        self.request_insight_for_detail();
    }

    fn request_insight_for_detail(&mut self) {
        let Some(symbol) = self.detail_symbol.clone() else {
            return;
        };
        let Some(pick) = self.find_pick(&symbol).cloned() else {
            return;
        };

        self.insight_generation += 1;
        let generation = self.insight_generation;
        self.insight_text = None;

        match &self.provider {
            Some(provider) => {
                self.insight_loading = true;
                let provider = provider.clone();
                let tx = self.update_tx.clone();
                tokio::spawn(async move {
                    let text = api::request_stock_insight(provider.as_ref(), &pick).await;
                    let _ = tx.send(UiUpdate::StockInsight { generation, text }).await;
                });
            }
            None => {
                self.insight_loading = false;
                self.insight_text = Some(OFFLINE_MESSAGE.to_string());
            }
        }
    }

    /// Read the file at the typed path and forward it to the analyzer.
    fn analyze_file(&mut self) {
        let path = self.file_path_input.trim().to_string();
        if path.is_empty() {
            self.status_message = "Enter a file path to analyze".to_string();
            return;
        }

        let data = match std::fs::read(&path) {
            Ok(data) => data,
            Err(e) => {
                self.status_message = format!("Cannot read {}: {}", path, e);
                return;
            }
        };
        let mime_type = utils::mime_type_for_path(&path).to_string();

        self.analysis_generation += 1;
        let generation = self.analysis_generation;
        self.analysis_text = None;

        match &self.provider {
            Some(provider) => {
                self.analysis_loading = true;
                self.status_message = format!("Analyzing {} ({})...", path, mime_type);
                let provider = provider.clone();
                let tx = self.update_tx.clone();
                tokio::spawn(async move {
                    let text = api::request_file_insight(provider.as_ref(), &data, &mime_type).await;
                    let _ = tx.send(UiUpdate::FileInsight { generation, text }).await;
                });
            }
            None => {
                self.analysis_loading = false;
                self.analysis_text = Some(OFFLINE_MESSAGE.to_string());
            }
        }
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let layout = AppLayout::new(f.area());
        self.render_tab_bar(f, layout.tab_bar);

        if self.detail_symbol.is_some() {
            self.render_detail(f, layout.content);
        } else {
            match self.tab {
                Tab::Dashboard => self.render_dashboard(f, layout.content),
                Tab::Sectors => self.render_sectors(f, layout.content),
                Tab::Screener => self.render_screener(f, layout.content),
                Tab::Portfolio => self.render_portfolio(f, layout.content),
                Tab::Alerts => self.render_alerts(f, layout.content),
                Tab::Analyzer => self.render_analyzer(f, layout.content),
            }
        }

        self.render_status_bar(f, layout.status_bar);
    }

    fn render_tab_bar(&self, f: &mut Frame, area: Rect) {
        let titles: Vec<&str> = Tab::ALL.iter().map(|t| t.title()).collect();
        let tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Mapato Bora - NSE Strategic Analytics"),
            )
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .select(self.tab.index());
        f.render_widget(tabs, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let hint = if self.detail_symbol.is_some() {
            "a: refresh commentary | b/Esc: back | q: quit"
        } else {
            match self.tab {
                Tab::Dashboard => "Tab: switch views | q: quit",
                Tab::Sectors => "↑/↓: navigate | Enter: deep dive | Tab: switch views | q: quit",
                Tab::Screener => {
                    "Type to filter | 1-4: sort field | 0: direction | Enter: deep dive | Esc: clear"
                }
                Tab::Portfolio => "←/→: switch mode | Tab: switch views | q: quit",
                Tab::Alerts => "1: 24h | 2: 1w | 3: 1m | Tab: switch views | q: quit",
                Tab::Analyzer => "Type a file path | Enter: analyze | Esc: clear",
            }
        };

        let content = vec![
            Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
            Line::from(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::Cyan),
            )),
        ];
        let paragraph = Paragraph::new(content).block(Block::default().borders(Borders::ALL));
        f.render_widget(paragraph, area);
    }

    fn render_dashboard(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(6), Constraint::Min(0)])
            .split(area);

        let report = self.repo.report();
        let mut summary_lines = vec![Line::from("")];
        for index in &report.market_snapshot.indices {
            summary_lines.push(Line::from(vec![
                Span::raw(format!("  {}: ", index.name)),
                Span::styled(format!("{:.1}", index.value), Style::default().fg(Color::White)),
                Span::raw(" ("),
                Span::styled(
                    utils::format_change_pct(index.change_pct),
                    components::change_style(index.change_pct),
                ),
                Span::raw(")"),
            ]));
        }
        summary_lines.push(Line::from(vec![
            Span::raw("  Market PE: "),
            Span::styled(format!("{:.1}x", report.audit.market_pe), Style::default().fg(Color::White)),
            Span::raw("   Total Cap: "),
            Span::styled(
                utils::format_market_cap(report.audit.market_cap_kes),
                Style::default().fg(Color::White),
            ),
            Span::raw(format!("   As of: {}", report.as_of)),
        ]));
        components::panel(f, chunks[0], "Market Summary", summary_lines);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(chunks[1]);

        // Top pick per sector, the report's headline card.
        let tops = query::top_pick_per_sector(self.repo.picks(), self.repo.weights());
        let mut top_lines = vec![Line::from("")];
        for (sector, pick, score) in &tops {
            top_lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<8}", pick.symbol),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<20}", sector.display_name())),
                Span::styled(format!("score {:>3}", score), components::score_style(*score)),
                Span::raw("  "),
                Span::raw(utils::format_price(pick.current_price)),
            ]));
        }

        // Yearly conviction holdings sit below the tactical list.
        for yearly in self.repo.yearly_picks() {
            top_lines.push(Line::from(""));
            top_lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", yearly.symbol),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("[{} holding, {} review]", yearly.role, yearly.monitoring.review_cycle),
                    Style::default().fg(Color::Gray),
                ),
            ]));
            top_lines.push(Line::from(Span::styled(
                format!(
                    "    {} | {} | {}",
                    yearly.thesis.fundamentals,
                    yearly.thesis.dividend_policy,
                    yearly.thesis.re_rating_path
                ),
                Style::default().fg(Color::DarkGray),
            )));
            top_lines.push(Line::from(Span::styled(
                format!(
                    "    Risk: {}. Watch: {}.",
                    yearly.risk_summary,
                    yearly.monitoring.events.join(", ")
                ),
                Style::default().fg(Color::DarkGray),
            )));
        }
        components::panel(f, body[0], "Top Picks & Yearly Holdings", top_lines);

        let mut rotation_lines = vec![Line::from("")];
        for signal in &report.sector_rotation {
            rotation_lines.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", signal.sector),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("[{}] ", signal.action)),
                Span::styled(signal.signal.clone(), Style::default().fg(Color::Gray)),
            ]));
            rotation_lines.push(Line::from(Span::styled(
                format!("    {}", signal.evidence),
                Style::default().fg(Color::DarkGray),
            )));
        }
        rotation_lines.push(Line::from(""));
        for snapshot in &report.market_snapshot.sectors {
            rotation_lines.push(Line::from(vec![
                Span::raw(format!("  {:<16}", snapshot.name)),
                Span::raw(format!("{:>12}", utils::format_market_cap(snapshot.market_cap_kes))),
                Span::styled(
                    format!("  yield {:.1}%", snapshot.div_yield_pct),
                    Style::default().fg(Color::Green),
                ),
            ]));
        }
        rotation_lines.push(Line::from(""));
        for change in &report.audit.changes_vs_prior {
            rotation_lines.push(Line::from(Span::styled(
                format!("  Δ {}", change),
                Style::default().fg(Color::DarkGray),
            )));
        }
        rotation_lines.push(Line::from(Span::styled(
            format!(
                "  Sources: {}. {}",
                report.audit.data_sources.join(", "),
                report.audit.assumptions.join(" ")
            ),
            Style::default().fg(Color::DarkGray),
        )));
        components::panel(f, body[1], "Sector Rotation & Snapshot", rotation_lines);
    }

    fn render_sectors(&mut self, f: &mut Frame, area: Rect) {
        let table = self.repo.weights().clone();
        let groups = query::group_by_sector(self.repo.picks());
        let tops = query::top_pick_per_sector(self.repo.picks(), &table);

        let mut items: Vec<ListItem> = Vec::new();
        for (sector, members) in &groups {
            for pick in members {
                let score = composite_score(pick, &table);
                let is_top = tops
                    .iter()
                    .any(|(s, top, _)| s == sector && top.symbol == pick.symbol);
                let badge = if is_top { " ★ TOP PICK" } else { "" };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<8}", pick.symbol),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{:<20}", sector.display_name())),
                    Span::styled(format!("score {:>3}", score), components::score_style(score)),
                    Span::raw(format!(
                        "  {:>12}  target {}",
                        utils::format_price(pick.current_price),
                        utils::format_price(pick.fair_value_target_kes),
                    )),
                    Span::styled(badge, Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
                ])));
            }
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Picks by Sector"))
            .highlight_style(
                Style::default()
                    .bg(Color::LightBlue)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("→ ");
        f.render_stateful_widget(list, area, &mut self.sector_list_state);
    }

    fn render_screener(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let direction_label = match self.sort_direction {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        };
        let query_line = Line::from(vec![
            Span::raw(self.search_query.clone()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("   [sort: {} {}]", self.sort_field.label(), direction_label),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        let input = Paragraph::new(query_line)
            .block(Block::default().borders(Borders::ALL).title("Filter (symbol or sector)"));
        f.render_widget(input, chunks[0]);

        let rows_data = self.current_rows();
        let rows: Vec<Row> = rows_data
            .iter()
            .map(|row| {
                let change = row
                    .change_pct
                    .map(utils::format_change_pct)
                    .unwrap_or_else(|| "-".to_string());
                Row::new(vec![
                    row.symbol.clone(),
                    row.sector.display_name().to_string(),
                    format!("{:.2}", row.price),
                    change,
                    row.score.to_string(),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(20),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(7),
            ],
        )
        .header(
            Row::new(vec!["Symbol", "Sector", "Price", "Change %", "Score"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Screener ({} matches)", rows_data.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::LightBlue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );
        f.render_stateful_widget(table, chunks[1], &mut self.screener_state);
    }

    fn render_portfolio(&self, f: &mut Frame, area: Rect) {
        let kind = PortfolioModeKind::ALL[self.mode_index];
        let mut lines = vec![Line::from("")];

        if let Some(mode) = self.repo.portfolio_mode(kind) {
            let total: f64 = mode.allocation.iter().map(|a| a.weight_pct).sum();
            for item in &mode.allocation {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("  {:<8}", item.symbol),
                        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("{:>5.1}%  ", item.weight_pct)),
                    // Simple bar so weights read at a glance.
                    Span::styled(
                        "█".repeat((item.weight_pct / 2.0).round() as usize),
                        Style::default().fg(Color::Green),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw("  Deployed: "),
                Span::styled(format!("{:.1}%", total), Style::default().fg(Color::White)),
                Span::styled("  (remainder in cash)", Style::default().fg(Color::DarkGray)),
            ]));
            if let Some(var) = mode.var_95_pct {
                lines.push(components::kv_line("  VaR 95%", format!("{:.1}%", var), Color::Red));
            }
            if let Some(notes) = &mode.notes {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("  \"{}\"", notes),
                    Style::default().fg(Color::Gray),
                )));
            }
        } else {
            lines.push(Line::from("  No allocation defined for this mode."));
        }

        components::panel(
            f,
            area,
            &format!("Portfolio Deployment - {}", kind.label()),
            lines,
        );
    }

    fn render_alerts(&self, f: &mut Frame, area: Rect) {
        let alerts = query::filter_alerts(self.repo.alerts(), self.alert_window);
        let mut lines = vec![Line::from("")];
        for alert in &alerts {
            let color = components::severity_color(alert.severity);
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  [{:<11}] ", alert.kind.label()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("{:<8}", alert.symbol),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(format!("{:<20}", alert.sector.display_name())),
                Span::styled(format!("({})", alert.window.label()), Style::default().fg(Color::DarkGray)),
            ]));
            lines.push(Line::from(Span::styled(
                format!("      {}", alert.message),
                Style::default().fg(Color::Gray),
            )));
        }
        if alerts.is_empty() {
            lines.push(Line::from("  No alerts in this window."));
        }

        components::panel(
            f,
            area,
            &format!("Risk Alert Board - {}", self.alert_window.label()),
            lines,
        );
    }

    fn render_analyzer(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let input = Paragraph::new(Line::from(vec![
            Span::raw(self.file_path_input.clone()),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("File to analyze (image, PDF, text, audio, video)"),
        );
        f.render_widget(input, chunks[0]);

        let mut lines = vec![Line::from("")];
        if self.analysis_loading {
            lines.push(Line::from(Span::styled(
                "  Analyzing attachment...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(text) = &self.analysis_text {
            for paragraph in text.split('\n') {
                lines.push(Line::from(format!("  {}", paragraph)));
            }
        } else {
            lines.push(Line::from(Span::styled(
                "  Enter a path and press Enter to request AI commentary on the file.",
                Style::default().fg(Color::Gray),
            )));
        }
        components::panel(f, chunks[1], "Analysis", lines);
    }

    fn render_detail(&self, f: &mut Frame, area: Rect) {
        let Some(symbol) = &self.detail_symbol else {
            return;
        };
        let Some(pick) = self.find_pick(symbol) else {
            components::panel(f, area, "Stock Deep Dive", vec![Line::from("Unknown symbol.")]);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let breakdown = score_breakdown(pick, self.repo.weights());
        let mut left = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    format!("  {} ", pick.symbol),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("({})", pick.sector)),
            ]),
            Line::from(""),
            components::kv_line("  Price", utils::format_price(pick.current_price), Color::White),
            components::kv_line(
                "  Entry Range",
                format!(
                    "{} - {}",
                    utils::format_price(pick.buy_range_kes.low),
                    utils::format_price(pick.buy_range_kes.high)
                ),
                Color::White,
            ),
            components::kv_line(
                "  Fair Value Target",
                utils::format_price(pick.fair_value_target_kes),
                Color::Green,
            ),
            components::kv_line("  P/E", format!("{:.1}x", pick.valuation.pe), Color::Cyan),
            components::kv_line("  P/B", format!("{:.1}x", pick.valuation.pb), Color::Cyan),
            components::kv_line(
                "  Div Yield",
                format!("{:.1}%", pick.valuation.div_yield_pct),
                Color::Cyan,
            ),
            components::kv_line(
                "  Stop Loss",
                utils::format_price(pick.risk_controls.stop_kes),
                Color::Red,
            ),
            components::kv_line(
                "  Max Drawdown",
                format!("{:.1}%", pick.risk_controls.max_drawdown_pct),
                Color::Red,
            ),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Composite Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    breakdown.composite.to_string(),
                    components::score_style(breakdown.composite),
                ),
                Span::styled(
                    format!(
                        "  (Q {:.0} / V {:.0} / M {:.0} / C {:.0})",
                        breakdown.quality, breakdown.valuation, breakdown.momentum, breakdown.catalysts
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Catalysts:", Style::default().fg(Color::Yellow))),
        ];
        for catalyst in &pick.catalysts {
            left.push(Line::from(format!("   • {}", catalyst)));
        }
        left.push(Line::from(""));
        left.push(Line::from(Span::styled(
            format!("  {}", pick.notes),
            Style::default().fg(Color::Gray),
        )));
        components::panel(f, chunks[0], &format!("Stock Deep Dive - {}", pick.symbol), left);

        let mut right = vec![Line::from("")];
        if let Some(headline) = &pick.news_headline {
            right.push(Line::from(Span::styled(
                format!("  {}", headline),
                Style::default().fg(Color::White),
            )));
            if let Some(sentiment) = pick.recent_sentiment {
                let (label, color) = components::sentiment_label(sentiment);
                right.push(Line::from(vec![
                    Span::raw("  Sentiment: "),
                    Span::styled(label, Style::default().fg(color)),
                ]));
            }
            right.push(Line::from(""));
        }
        if let Some(technicals) = &pick.technicals {
            right.push(components::kv_line("  RSI", format!("{:.0}", technicals.rsi), Color::Cyan));
            right.push(components::kv_line(
                "  MACD",
                components::macd_label(technicals.macd).to_string(),
                Color::Cyan,
            ));
            right.push(components::kv_line(
                "  24h Volume",
                utils::format_volume(technicals.volume_24h),
                Color::Cyan,
            ));
            right.push(components::kv_line(
                "  Trend",
                components::trend_label(technicals.trend).to_string(),
                Color::Cyan,
            ));
            right.push(Line::from(""));
        }

        right.push(Line::from(Span::styled(
            "  AI Validation",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )));
        if self.insight_loading {
            right.push(Line::from(Span::styled(
                "  Simulating alpha capture...",
                Style::default().fg(Color::Yellow),
            )));
        } else if let Some(text) = &self.insight_text {
            for paragraph in text.split('\n') {
                right.push(Line::from(format!("  {}", paragraph)));
            }
        }
        right.push(Line::from(""));
        right.push(Line::from(vec![
            Span::raw("  Confidence "),
            Span::styled(
                format!("{:.0}", pick.confidence.score),
                Style::default().fg(Color::White),
            ),
            Span::styled(
                format!(" - {}", pick.confidence.explanation),
                Style::default().fg(Color::Gray),
            ),
        ]));
        components::panel(f, chunks[1], "News, Technicals & AI Commentary", right);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ReportRepository;

    #[test]
    fn test_tab_cycle_wraps() {
        assert_eq!(Tab::Analyzer.next(), Tab::Dashboard);
        assert_eq!(Tab::Dashboard.previous(), Tab::Analyzer);
    }

    #[tokio::test]
    async fn test_stale_insight_is_dropped() {
        let mut app = App::new(ReportRepository::with_seed_data(), None);
        app.detail_symbol = Some("EQTY".to_string());
        app.insight_generation = 2;
        app.insight_loading = true;

        app.update_tx
            .send(UiUpdate::StockInsight { generation: 1, text: "stale".to_string() })
            .await
            .unwrap();
        app.update_tx
            .send(UiUpdate::StockInsight { generation: 2, text: "fresh".to_string() })
            .await
            .unwrap();
        app.drain_updates();

        assert_eq!(app.insight_text.as_deref(), Some("fresh"));
        assert!(!app.insight_loading);
    }

    #[test]
    fn test_offline_detail_sets_notice_without_spawning() {
        let mut app = App::new(ReportRepository::with_seed_data(), None);
        app.open_detail("EQTY".to_string());
        assert_eq!(app.insight_text.as_deref(), Some(OFFLINE_MESSAGE));
        assert!(!app.insight_loading);
    }

    #[test]
    fn test_screener_query_narrows_rows() {
        let mut app = App::new(ReportRepository::with_seed_data(), None);
        let all = app.current_rows().len();
        app.search_query = "finance".to_string();
        let finance = app.current_rows().len();
        assert!(finance > 0);
        assert!(finance < all);
    }
}
