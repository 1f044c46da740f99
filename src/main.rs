use std::io;
use std::time::{Duration, Instant};

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
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset as ChartDataset,
    GraphType, Paragraph, Wrap,
};

use fc25_lens::aggregate::{AggregateTable, GroupKey};
use fc25_lens::attributes::Attribute;
use fc25_lens::config::{self, AppConfig};
use fc25_lens::dataset::Gender;
use fc25_lens::selection::Selection;
use fc25_lens::state::{AppState, Focus, Screen, focus_label, screen_label};
use fc25_lens::store::DataStore;
use fc25_lens::views::{AgeView, GenderView, ViewKind, ViewOutput};

const PALETTE: [Color; 6] = [
    Color::Cyan,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::LightRed,
    Color::LightBlue,
];
const MEN_COLOR: Color = Color::Blue;
const WOMEN_COLOR: Color = Color::Rgb(255, 165, 0);

struct App {
    state: AppState,
    store: DataStore,
}

impl App {
    fn new(store: DataStore) -> Self {
        let mut state = AppState::new(&store.config);
        for note in store.load_notes() {
            state.push_log(note);
        }
        state.push_log(format!("[INFO] {}", store.describe()));
        Self { state, store }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.state.should_quit = true,
            KeyCode::Char('1') => self.state.set_screen(Screen::Home),
            KeyCode::Char('2') => self.state.set_screen(Screen::View(ViewKind::RegionComparison)),
            KeyCode::Char('3') => self.state.set_screen(Screen::View(ViewKind::GenderComparison)),
            KeyCode::Char('4') => self.state.set_screen(Screen::View(ViewKind::AgeTrend)),
            KeyCode::Tab => self.state.cycle_focus(),
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('+') => self.state.adjust(1),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('-') => self.state.adjust(-1),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_current(),
            KeyCode::Char('a') | KeyCode::Char('A') => self.state.select_all(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.state.reset_defaults();
                self.state.push_log("[INFO] Selections reset to defaults");
            }
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            _ => {}
        }
        self.state.recompute(&self.store);
    }
}

fn main() -> anyhow::Result<()> {
    config::load_env_files();
    let store = DataStore::open(AppConfig::from_env())?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(store);
    let res = run_app(&mut terminal, &mut app);

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

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
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

        if app.state.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::Home => render_home(frame, chunks[1], &app.store),
        Screen::View(kind) => render_view(frame, chunks[1], &app.state, kind),
    }

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let title = match state.screen {
        Screen::Home => "FC25 LENS | Reflecting Stereotypes in Football".to_string(),
        Screen::View(kind) => format!(
            "FC25 LENS | {} | {} | Focus: {}",
            screen_label(state.screen),
            kind.title(),
            focus_label(state.focus)
        ),
    };
    let line1 = format!("  .-.  {}", title);
    let line2 = " ( o )".to_string();
    let line3 = "  '-'".to_string();
    format!("{line1}\n{line2}\n{line3}")
}

fn footer_text(state: &AppState) -> String {
    let keys = match state.screen {
        Screen::Home => "1 Home | 2 Africa | 3 Men vs Women | 4 Ages | ? Help | q Quit",
        Screen::View(_) => {
            "1-4 Pages | Tab Focus | j/k Move | Space Toggle | a All | h/l Adjust | r Reset | ? Help | q Quit"
        }
    };
    format!("{keys}\n{}", console_text(state))
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_home(frame: &mut Frame, area: Rect, store: &DataStore) {
    let text = [
        "Reflecting Stereotypes in Football Using EA FC 25 Data",
        "",
        "How player attributes in EA FC 25 reflect or reinforce stereotypes based on",
        "ethnicity, gender, and age.",
        "",
        "2  Africa        Compare traits across North Africa, Rest of Africa and Rest of World.",
        "3  Men vs Women  Scatter two attributes by gender with a fitted trend per gender.",
        "4  Ages          Track how selected traits change across ages (goalkeepers excluded).",
        "",
        "Select one to five traits per chart. Press ? for keys.",
    ]
    .join("\n");
    let body = format!("{text}\n\n{}", store.describe());
    let home = Paragraph::new(body)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Home").borders(Borders::ALL));
    frame.render_widget(home, area);
}

fn render_view(frame: &mut Frame, area: Rect, state: &AppState, kind: ViewKind) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    render_controls(frame, cols[0], state, kind);

    match &state.output {
        None => {
            let empty = Paragraph::new("Computing...").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, cols[1]);
        }
        Some(Err(err)) => {
            let warning = Paragraph::new(format!("⚠ {err}"))
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true })
                .block(Block::default().title(kind.title()).borders(Borders::ALL));
            frame.render_widget(warning, cols[1]);
        }
        Some(Ok(ViewOutput::Region(table))) => render_region(frame, cols[1], table),
        Some(Ok(ViewOutput::Gender(view))) => render_gender(frame, cols[1], view),
        Some(Ok(ViewOutput::Age(view))) => render_ages(frame, cols[1], view),
    }
}

fn render_controls(frame: &mut Frame, area: Rect, state: &AppState, kind: ViewKind) {
    match kind {
        ViewKind::RegionComparison => {
            let lines = attribute_lines(state, &state.region_attributes, area.height);
            render_list(frame, area, "Traits (1-5)", lines, state.focus == Focus::Attributes);
        }
        ViewKind::GenderComparison => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(4)])
                .split(area);
            let leagues = state.league_selection();
            let mut lines = Vec::new();
            let all_mark = if leagues.is_all() { "[x]" } else { "[ ]" };
            lines.push(Line::from(format!("{all_mark} All (a)")));
            for (idx, league) in state.league_options.iter().enumerate() {
                let checked = match &leagues {
                    Selection::All => false,
                    Selection::Specific(items) => items.contains(league),
                };
                let mark = if checked { "[x]" } else { "[ ]" };
                let style = cursor_style(state.focus == Focus::Leagues && idx == state.cursor);
                lines.push(Line::styled(format!("{mark} {league}"), style));
            }
            render_list(frame, rows[0], "Leagues", lines, state.focus == Focus::Leagues);

            let axes = vec![
                Line::styled(
                    format!("X: < {} >", state.x_attribute),
                    cursor_style(state.focus == Focus::XAxis),
                ),
                Line::styled(
                    format!("Y: < {} >", state.y_attribute),
                    cursor_style(state.focus == Focus::YAxis),
                ),
            ];
            let focused = matches!(state.focus, Focus::XAxis | Focus::YAxis);
            render_list(frame, rows[1], "Axes", axes, focused);
        }
        ViewKind::AgeTrend => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(4)])
                .split(area);
            let lines = attribute_lines(state, &state.age_attributes, rows[0].height);
            render_list(frame, rows[0], "Traits (1-5)", lines, state.focus == Focus::Attributes);

            let ages = vec![
                Line::styled(
                    format!("Min age: < {} >", state.age_min),
                    cursor_style(state.focus == Focus::MinAge),
                ),
                Line::styled(
                    format!("Max age: < {} >", state.age_max),
                    cursor_style(state.focus == Focus::MaxAge),
                ),
            ];
            let focused = matches!(state.focus, Focus::MinAge | Focus::MaxAge);
            render_list(frame, rows[1], "Age range", ages, focused);
        }
    }
}

fn attribute_lines(
    state: &AppState,
    selection: &Selection<Attribute>,
    height: u16,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut reserved = 2;
    if state.offers_all_attributes() {
        let all_mark = if selection.is_all() { "[x]" } else { "[ ]" };
        lines.push(Line::from(format!("{all_mark} All (a)")));
        reserved += 1;
    }

    let visible = height.saturating_sub(reserved) as usize;
    let (start, end) = visible_range(state.cursor, Attribute::ALL.len(), visible);
    for idx in start..end {
        let attr = Attribute::ALL[idx];
        let checked = match selection {
            Selection::All => false,
            Selection::Specific(items) => items.contains(&attr),
        };
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = cursor_style(state.focus == Focus::Attributes && idx == state.cursor);
        lines.push(Line::styled(format!("{mark} {attr}"), style));
    }
    lines
}

fn render_list(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line>, focused: bool) {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let list = Paragraph::new(lines).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(list, area);
}

fn cursor_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    } else {
        Style::default()
    }
}

fn render_region(frame: &mut Frame, area: Rect, table: &AggregateTable) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title("Comparison of Physical Features by Region")
                .borders(Borders::ALL),
        )
        .bar_width(4)
        .bar_gap(0)
        .group_gap(3);

    for attribute in &table.attributes {
        let bars: Vec<Bar> = table
            .rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                row.mean(*attribute).map(|mean| {
                    Bar::default()
                        .value(mean.round() as u64)
                        .text_value(format!("{mean:.0}"))
                        .style(Style::default().fg(PALETTE[idx % PALETTE.len()]))
                })
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(attribute.label()))
                .bars(&bars),
        );
    }
    frame.render_widget(chart, rows[0]);

    let legend: Vec<Span> = table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            Span::styled(
                format!("■ {}  ", row.key),
                Style::default().fg(PALETTE[idx % PALETTE.len()]),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(legend)), rows[1]);
}

fn render_gender(frame: &mut Frame, area: Rect, view: &GenderView) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let series: Vec<(Gender, Vec<(f64, f64)>)> = Gender::BOTH
        .iter()
        .map(|g| (*g, view.points_for(*g).map(|p| (p.x, p.y)).collect()))
        .collect();

    let mut datasets = Vec::new();
    for (gender, points) in &series {
        if points.is_empty() {
            continue;
        }
        datasets.push(
            ChartDataset::default()
                .name(format!("{} ({})", gender.label(), points.len()))
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(gender_color(*gender)))
                .data(points),
        );
    }
    for trend in &view.trends {
        datasets.push(
            ChartDataset::default()
                .name(format!("{} trend", trend.group.short_label()))
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(
                    Style::default()
                        .fg(gender_color(trend.group))
                        .add_modifier(Modifier::BOLD),
                )
                .data(&trend.points),
        );
    }

    let (x_lo, x_hi) = bounds(view.points.iter().map(|p| p.x));
    let (y_lo, y_hi) = bounds(view.points.iter().map(|p| p.y));
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title("Comparison of Player Attributes by Gender")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title(view.x.label())
                .bounds([x_lo, x_hi])
                .labels(axis_labels(x_lo, x_hi)),
        )
        .y_axis(
            Axis::default()
                .title(view.y.label())
                .bounds([y_lo, y_hi])
                .labels(axis_labels(y_lo, y_hi)),
        );
    frame.render_widget(chart, rows[0]);

    let mut summary = Vec::new();
    for row in &view.summary.rows {
        let means = view
            .summary
            .attributes
            .iter()
            .map(|attr| format!("{attr} {}", format_mean(row.mean(*attr))))
            .collect::<Vec<_>>()
            .join(" | ");
        let fit = match &row.key {
            GroupKey::Gender(g) => view
                .trend_for(*g)
                .map(|t| format!(" | slope {:+.2}", t.fit.slope))
                .unwrap_or_else(|| " | no trend (too few points)".to_string()),
            _ => String::new(),
        };
        summary.push(Line::from(format!("{}: {}{}", row.key, means, fit)));
    }
    frame.render_widget(Paragraph::new(summary), rows[1]);
}

fn render_ages(frame: &mut Frame, area: Rect, view: &AgeView) {
    let table = &view.table;
    let series: Vec<(Attribute, Vec<(f64, f64)>)> = table
        .attributes
        .iter()
        .map(|attr| {
            let points = table
                .rows
                .iter()
                .filter_map(|row| match (&row.key, row.mean(*attr)) {
                    (GroupKey::Age(age), Some(mean)) => {
                        Some((*age as f64, mean))
                    }
                    _ => None,
                })
                .collect();
            (*attr, points)
        })
        .collect();

    if series.iter().all(|(_, points)| points.is_empty()) {
        let empty = Paragraph::new("No players in this age range")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Trends in Player Attributes by Age").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let datasets: Vec<ChartDataset> = series
        .iter()
        .enumerate()
        .map(|(idx, (attr, points))| {
            ChartDataset::default()
                .name(attr.label())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(PALETTE[idx % PALETTE.len()]))
                .data(points)
        })
        .collect();

    let x_lo = view.range.min as f64;
    let x_hi = view.range.max as f64;
    let (y_lo, y_hi) = bounds(series.iter().flat_map(|(_, p)| p.iter().map(|(_, y)| *y)));
    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title("Trends in Player Attributes by Age")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("Age")
                .bounds([x_lo, x_hi])
                .labels(axis_labels(x_lo, x_hi)),
        )
        .y_axis(
            Axis::default()
                .title("Average")
                .bounds([y_lo, y_hi])
                .labels(axis_labels(y_lo, y_hi)),
        );
    frame.render_widget(chart, area);
}

fn gender_color(gender: Gender) -> Color {
    match gender {
        Gender::Men => MEN_COLOR,
        Gender::Women => WOMEN_COLOR,
    }
}

fn format_mean(mean: Option<f64>) -> String {
    match mean {
        Some(v) => format!("{v:.1}"),
        None => "n/a".to_string(),
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 100.0);
    }
    if (hi - lo).abs() < f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    ((lo - pad).floor(), (hi + pad).ceil())
}

fn axis_labels(lo: f64, hi: f64) -> Vec<Span<'static>> {
    let mid = (lo + hi) / 2.0;
    vec![
        Span::raw(format!("{lo:.0}")),
        Span::raw(format!("{mid:.0}")),
        Span::raw(format!("{hi:.0}")),
    ]
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

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FC25 Lens - Help",
        "",
        "Pages:",
        "  1            Home",
        "  2            Africa (regions)",
        "  3            Men vs Women",
        "  4            Ages",
        "",
        "Controls:",
        "  Tab          Next control",
        "  j/k or ↑/↓   Move / step value",
        "  h/l or ←/→   Step axis or age",
        "  Space/Enter  Toggle item",
        "  a            Select all leagues",
        "  r            Reset page defaults",
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
