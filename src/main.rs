use std::io;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph};

use matchlens::aggregate::{PlayerLine, Scope};
use matchlens::category::Category;
use matchlens::config::Config;
use matchlens::display::{count_source_label, format_confidence, format_span, or_dash};
use matchlens::loader::spawn_loader;
use matchlens::logging::init_file_logging;
use matchlens::normalize::Bucket;
use matchlens::state::{AppState, Delta, LoaderCommand, Phase, apply_delta, phase_label};

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<LoaderCommand>>,
    video: Option<String>,
    export_dir: PathBuf,
}

impl App {
    fn new(
        cmd_tx: Option<mpsc::Sender<LoaderCommand>>,
        video: Option<String>,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            video,
            export_dir,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('u') | KeyCode::Char('U') => self.request_upload(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('f') | KeyCode::Tab => self.state.cycle_filter(true),
            KeyCode::Char('F') | KeyCode::BackTab => self.state.cycle_filter(false),
            KeyCode::Char('t') | KeyCode::Char('T') => self.state.cycle_bucket(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.request_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
    }

    fn send(&mut self, cmd: LoaderCommand, what: &str) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {what} unavailable"));
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {what} request failed"));
            return false;
        }
        true
    }

    fn request_upload(&mut self) {
        if self.state.is_busy() {
            self.state.push_log("[INFO] Upload already in progress");
            return;
        }
        let video = self.video.clone();
        if self.send(LoaderCommand::Upload { video }, "Upload") {
            self.state.phase = Phase::Uploading { progress: 0 };
        }
    }

    fn request_reload(&mut self) {
        if self.state.is_busy() {
            self.state.push_log("[INFO] Load already in progress");
            return;
        }
        let _ = self.send(LoaderCommand::Reload, "Reload");
    }

    fn request_export(&mut self) {
        let Some(view) = self.state.view.clone() else {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        };
        if self.state.export.active && !self.state.export.done {
            self.state.push_log("[INFO] Export already running");
            return;
        }
        let name = format!("matchlens_{}.xlsx", Local::now().format("%Y%m%d_%H%M%S"));
        let path = self.export_dir.join(name);
        let _ = self.send(
            LoaderCommand::Export {
                path,
                view: Box::new(view),
            },
            "Export",
        );
    }
}

fn main() -> io::Result<()> {
    let config = Config::from_env();
    if let Some(path) = &config.log_file
        && let Err(err) = init_file_logging(path)
    {
        eprintln!("warning: {err:#}");
    }

    let mut video = None;
    let mut load_now = false;
    for arg in std::env::args().skip(1) {
        if arg == "--load" {
            load_now = true;
        } else if video.is_none() {
            video = Some(arg);
        }
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let export_dir = config.export_dir.clone();
    spawn_loader(config, tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx), video, export_dir);
    if load_now {
        app.request_reload();
    }
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }
        app.state.maybe_clear_export(Instant::now());

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    if app.state.view.is_some() {
        render_dashboard(frame, chunks[1], &app.state);
    } else {
        render_upload(frame, chunks[1], &app.state);
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let matchup = match &state.view {
        Some(view) => format!(
            "{} vs {}",
            view.team_name(Bucket::Blue),
            view.team_name(Bucket::Red)
        ),
        None => "No match loaded".to_string(),
    };
    let line1 = format!(
        "  MATCHLENS | {matchup} | {}",
        phase_label(&state.phase)
    );
    let loaded = state.loaded_at.as_deref().unwrap_or("never");
    let fp = state.fingerprint.as_deref().unwrap_or("-");
    let source = if state.source.is_empty() { "-" } else { state.source.as_str() };
    let line2 = format!("  Source: {source} | Loaded: {loaded} | Payload: {fp}");
    let line3 = match &state.phase {
        Phase::Failed(msg) => format!("  {msg}"),
        _ => String::new(),
    };
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    if state.view.is_none() {
        return "u Upload | r Load | ? Help | q Quit".to_string();
    }
    "u Upload | r Reload | f/Tab Category | t Team | j/k Scroll | e Export | ? Help | q Quit"
        .to_string()
}

fn render_upload(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(area);

    let prompt = match &state.phase {
        Phase::Idle => "Upload match video\n\nPress u to upload (simulated), or r to load the analytics file directly.",
        Phase::Uploading { .. } => "Uploading match video...",
        Phase::Loading => "Analysing match...",
        Phase::Ready => "",
        Phase::Failed(_) => "Loading failed. Press u or r to try again.",
    };
    let intro = Paragraph::new(prompt)
        .block(Block::default().title("Upload").borders(Borders::ALL));
    frame.render_widget(intro, rows[0]);

    render_progress(frame, rows[1], &state.phase);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[3]);
}

fn render_progress(frame: &mut Frame, area: Rect, phase: &Phase) {
    let (ratio, label) = match phase {
        Phase::Uploading { progress } => (f64::from(*progress) / 100.0, format!("{progress}%")),
        Phase::Loading => (1.0, "processing".to_string()),
        _ => return,
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Indexed(105)))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let busy = state.is_busy();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if busy { 3 } else { 0 }),
            Constraint::Length(4),
            Constraint::Length(9),
            Constraint::Min(5),
            Constraint::Length(5),
        ])
        .split(area);

    if busy {
        render_progress(frame, rows[0], &state.phase);
    }

    render_summary_cards(frame, rows[1], state);

    let teams = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_team_table(frame, teams[0], state, Bucket::Blue);
    render_team_table(frame, teams[1], state, Bucket::Red);

    render_events(frame, rows[3], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[4]);
}

fn render_summary_cards(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(counts) = state.counts(Scope::Global) else {
        return;
    };
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 8); 8])
        .split(area);

    for (idx, category) in Category::ALL.into_iter().enumerate() {
        let count = counts.get(category);
        let text = format!("{}\n{}", count.value, count_source_label(count.source));
        let card = Paragraph::new(text)
            .style(Style::default().fg(card_color(category)))
            .block(Block::default().title(category.title()).borders(Borders::ALL));
        frame.render_widget(card, cols[idx]);
    }
}

fn card_color(category: Category) -> Color {
    match category {
        Category::Goal | Category::Penalty => Color::Yellow,
        Category::Pass | Category::Corner => Color::LightBlue,
        Category::Tackle | Category::Freekick => Color::Green,
        Category::MissShot | Category::Save => Color::Magenta,
    }
}

fn render_team_table(frame: &mut Frame, area: Rect, state: &AppState, bucket: Bucket) {
    let Some(view) = &state.view else {
        return;
    };
    let (title, color) = match bucket {
        Bucket::Blue => (format!("{} (home)", view.team_name(bucket)), Color::LightBlue),
        _ => (format!("{} (opposition)", view.team_name(bucket)), Color::LightRed),
    };
    let players = state.players(bucket);
    let text = if players.is_empty() {
        "No players attributed".to_string()
    } else {
        player_table_text(&players)
    };
    let table = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    frame.render_widget(table, area);
}

fn player_table_text(players: &[PlayerLine]) -> String {
    let mut lines = vec![format!(
        "{:<6} {:<18} {:>5} {:>6} {:>7}",
        "#", "Player", "Goals", "Passes", "Tackles"
    )];
    for line in players {
        lines.push(format!(
            "{:<6} {:<18} {:>5} {:>6} {:>7}",
            truncate(&line.key.to_string(), 6),
            truncate(&or_dash(line.name.as_deref()), 18),
            line.goals,
            line.passes,
            line.tackles
        ));
    }
    lines.join("\n")
}

fn render_events(frame: &mut Frame, area: Rect, state: &AppState) {
    let events = state.visible_events();
    let title = format!(
        "Events | team: {} | category: {} | {} shown",
        state.bucket.label(),
        state.filter.token(),
        events.len()
    );
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || inner.width == 0 {
        return;
    }

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(inner);

    let header = Paragraph::new(format!(
        "{:<6} {:<16} {:<12} {:>5} {:<13} {:<7} {}",
        "Jersey", "Player", "Type", "Conf", "Time", "From", "Notes"
    ))
    .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(header, sections[0]);

    if events.is_empty() {
        let empty = Paragraph::new("No events detected for this selection")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, sections[1]);
        return;
    }

    let visible = sections[1].height as usize;
    let (start, end) = visible_range(state.selected, events.len(), visible);
    let lines: Vec<Line> = (start..end)
        .map(|idx| {
            let e = events[idx];
            let text = format!(
                "{:<6} {:<16} {:<12} {:>5} {:<13} {:<7} {}",
                truncate(&or_dash(e.event.player_jersey_number.as_deref()), 6),
                truncate(&or_dash(e.event.player_name.as_deref()), 16),
                truncate(&e.event.event_type, 12),
                format_confidence(e.event.confidence),
                format_span(e),
                e.team_source.map(|s| s.label()).unwrap_or("-"),
                or_dash(e.event.notes.as_deref())
            );
            let style = if idx == state.selected {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::styled(text, style)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), sections[1]);
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Matchlens - Help",
        "",
        "Data:",
        "  u            Upload match video (simulated)",
        "  r            Reload analytics",
        "  e            Export to xlsx",
        "",
        "Events table:",
        "  f / Tab      Next category",
        "  F / S-Tab    Previous category",
        "  t            Cycle team (red/blue/undetermined)",
        "  j/k or ↑/↓   Scroll",
        "",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
