mod app;

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

use app::{AppState, FeedStatus};
use contest_dashboard::config::{Config, TUI_FETCH_POLL_MS, TUI_TICK_MS};
use contest_dashboard::now_secs;
use contest_dashboard::report::{format_total, Report};
use contest_dashboard::types::{Rate, WindowMode};

const PINK: Color = Color::LightMagenta;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> io::Result<()> {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    let client = match cfg.http_client() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("HTTP client error: {e}");
            std::process::exit(1);
        }
    };

    let mut app = AppState::new(cfg);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut table_state = TableState::default();

    // One fetch per launch, in the background so "Loading..." is drawn
    // while it runs; [r] refetches on demand.
    app.start_refresh(&client);

    let result = run_loop(&mut terminal, &mut app, &client, &mut table_state);

    // Restore terminal regardless of result
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Blocks on terminal events; the fetch runs on another runtime worker.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    client: &reqwest::Client,
    table_state: &mut TableState,
) -> io::Result<()> {
    let tick = Duration::from_millis(TUI_TICK_MS);
    let fetch_poll = Duration::from_millis(TUI_FETCH_POLL_MS);

    loop {
        if app.poll_refresh() {
            table_state.select(None);
        }

        // Windows slide with the wall clock, so rebuild against a fresh "now".
        let report = app.report(now_secs());
        terminal.draw(|f| render(f, app, &report, table_state))?;

        let timeout = if app.is_refreshing() { fetch_poll } else { tick };
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        // Raw mode turns Ctrl-C into a plain key event.
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.start_refresh(client),
                        KeyCode::Char('h') | KeyCode::Char('H') => app.set_mode(WindowMode::Hourly),
                        KeyCode::Char('d') | KeyCode::Char('D') => app.set_mode(WindowMode::Daily),
                        KeyCode::Tab => app.toggle_mode(),
                        KeyCode::Down | KeyCode::Char('j') => {
                            let max = report.recent.len().saturating_sub(1);
                            let next = table_state.selected().map_or(0, |i| (i + 1).min(max));
                            table_state.select(Some(next));
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            let prev = table_state
                                .selected()
                                .map_or(0, |i| i.saturating_sub(1));
                            table_state.select(Some(prev));
                        }
                        _ => {}
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(f: &mut Frame, app: &AppState, report: &Report, table_state: &mut TableState) {
    let area = f.area();

    // Outer vertical split: header | body | footer
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    if report.is_loading() {
        let loading = Paragraph::new("Loading...").block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(loading, chunks[1]);
    } else {
        render_body(f, report, table_state, chunks[1]);
    }
    render_footer(f, chunks[2]);
}

fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let (status_text, status_color) = match app.status {
        FeedStatus::Loading => ("◌ loading".to_string(), Color::Yellow),
        FeedStatus::Empty => ("✗ no data".to_string(), Color::Red),
        FeedStatus::Ready => (format!("● {} records", app.records.len()), Color::Green),
    };

    let skipped = app.stats.rejected_shape + app.stats.rejected_timestamp;

    let mut spans = vec![
        Span::styled(
            " Succinct Contests  ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(status_text, Style::default().fg(status_color)),
        Span::raw("  │  "),
        Span::styled(format!("{} window", app.mode), Style::default().fg(Color::White)),
    ];
    if let Some(at) = app.last_refresh {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(
            format!("fetched {}s ago", at.elapsed().as_secs()),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if skipped > 0 {
        spans.push(Span::raw("  │  "));
        spans.push(Span::styled(
            format!("{skipped} skipped"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(paragraph, area);
}

fn render_body(f: &mut Frame, report: &Report, table_state: &mut TableState, area: Rect) {
    // Vertical split: stats panel | recent contests
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_stats(f, report, parts[0]);
    render_contests_table(f, report, table_state, parts[1]);
}

fn render_stats(f: &mut Frame, report: &Report, area: Rect) {
    let s = &report.summary;
    let span = s.mode.span_label();

    let mode_tab = |mode: WindowMode| {
        let style = if s.mode == mode {
            Style::default().fg(PINK).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Span::styled(mode.to_string(), style)
    };

    let lines = vec![
        Line::from(vec![mode_tab(WindowMode::Hourly), Span::raw("  "), mode_tab(WindowMode::Daily)]),
        Line::from(""),
        Line::from(vec![
            Span::raw(format!("Bids ({span})  ")),
            Span::styled(format_total(s.bids_total), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            rate_span(s.bids_rate),
            Span::raw("      "),
            Span::raw(format!("Points ({span})  ")),
            Span::styled(format_total(s.points_total), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            rate_span(s.points_rate),
        ]),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(paragraph, area);
}

fn rate_span(rate: Rate) -> Span<'static> {
    let color = if rate.is_undefined() {
        Color::DarkGray
    } else if rate.is_non_negative() {
        Color::Green
    } else {
        Color::Red
    };
    Span::styled(rate.to_string(), Style::default().fg(color))
}

fn render_contests_table(f: &mut Frame, report: &Report, state: &mut TableState, area: Rect) {
    let header_cells = [
        ("Time", Color::White),
        ("Bids", Color::LightGreen),
        ("Stars", PINK),
        ("Multiplier", Color::LightYellow),
        ("Prize", Color::LightRed),
    ]
    .into_iter()
    .map(|(h, c)| Cell::from(h).style(Style::default().fg(c).add_modifier(Modifier::BOLD)));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = report
        .recent
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.clock.clone()),
                Cell::from(r.bids.clone()).style(Style::default().fg(Color::LightGreen)),
                Cell::from(r.stars.clone()).style(Style::default().fg(PINK)),
                Cell::from(r.multiplier.clone()).style(Style::default().fg(Color::LightYellow)),
                Cell::from(r.prize.clone()).style(Style::default().fg(Color::LightRed)),
            ])
        })
        .collect();

    let title = format!(" Last {} Contest ", report.recent.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Min(6),
            Constraint::Min(6),
            Constraint::Min(10),
            Constraint::Min(6),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                title,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
    )
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(table, area, state);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled(" [q] ", Style::default().fg(Color::Yellow)),
        Span::raw("quit  "),
        Span::styled("[h/d/Tab] ", Style::default().fg(Color::Yellow)),
        Span::raw("hourly/daily  "),
        Span::styled("[r] ", Style::default().fg(Color::Yellow)),
        Span::raw("refetch  "),
        Span::styled("[↑↓ / j k] ", Style::default().fg(Color::Yellow)),
        Span::raw("scroll"),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(Color::White));
    f.render_widget(paragraph, area);
}
