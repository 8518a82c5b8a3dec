//! Full-screen public view: the comparison bars for the selected year, plus
//! the monthly line when a single category is selected.

use crate::error::AppError;
use crate::models::view::{SeriesKind, ViewData};
use crate::operations::views;
use crate::presentation::chart::{
    ALL_CATEGORIES, BarChartData, LineChartData, NO_DATA_AT_ALL, comparison_chart, no_data_message,
    trend_chart,
};
use crate::presentation::format::compact_rupiah;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Rect, Style},
    style::Modifier,
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
enum Content {
    NoDataAtAll,
    NoData(String),
    Charts {
        bars: BarChartData,
        trend: Option<LineChartData>,
    },
}

struct DashboardState {
    years: Vec<i32>,
    // Index 0 of the category selector is "all categories".
    categories: Vec<String>,
    year_idx: usize,
    category_idx: usize,
    content: Content,
}

impl DashboardState {
    fn load(conn: &Connection, year: Option<i32>, category: Option<&str>) -> Result<Self, AppError> {
        let years = views::available_years(conn)?;
        let categories = views::available_categories(conn)?;

        let year_idx = year
            .and_then(|y| years.iter().position(|candidate| *candidate == y))
            .unwrap_or(0);
        let category_idx = category
            .and_then(|c| categories.iter().position(|candidate| candidate == c))
            .map(|idx| idx + 1)
            .unwrap_or(0);

        let mut state = Self {
            years,
            categories,
            year_idx,
            category_idx,
            content: Content::NoDataAtAll,
        };
        state.recompute(conn)?;
        Ok(state)
    }

    fn selected_year(&self) -> Option<i32> {
        self.years.get(self.year_idx).copied()
    }

    fn selected_category(&self) -> Option<&str> {
        self.category_idx
            .checked_sub(1)
            .and_then(|idx| self.categories.get(idx))
            .map(String::as_str)
    }

    fn recompute(&mut self, conn: &Connection) -> Result<(), AppError> {
        let has_data = views::has_any_data(conn)?;
        let year = match self.selected_year() {
            Some(year) if has_data => year,
            _ => {
                self.content = Content::NoDataAtAll;
                return Ok(());
            }
        };
        let category = self.selected_category().map(str::to_string);

        self.content = match views::comparison_view(conn, year, category.as_deref())? {
            ViewData::NoData => Content::NoData(no_data_message(year, category.as_deref())),
            ViewData::Ready(view) => {
                let trend = match category.as_deref() {
                    Some(category) => views::monthly_trend(conn, year, category)?
                        .ready()
                        .map(|trend| trend_chart(&trend)),
                    None => None,
                };
                Content::Charts {
                    bars: comparison_chart(&view),
                    trend,
                }
            }
        };
        Ok(())
    }

    fn reload(&mut self, conn: &Connection) -> Result<(), AppError> {
        let year = self.selected_year();
        let category = self.selected_category().map(str::to_string);
        *self = Self::load(conn, year, category.as_deref())?;
        Ok(())
    }

    fn shift_year(&mut self, delta: isize) {
        self.year_idx = cycle(self.year_idx, self.years.len(), delta);
    }

    fn shift_category(&mut self, delta: isize) {
        self.category_idx = cycle(self.category_idx, self.categories.len() + 1, delta);
    }
}

fn cycle(current: usize, len: usize, delta: isize) -> usize {
    if len == 0 {
        return 0;
    }
    let len = len as isize;
    ((current as isize + delta).rem_euclid(len)) as usize
}

pub fn run_dashboard(conn: &Connection, year: Option<i32>, category: Option<&str>) -> Result<(), AppError> {
    let mut state = DashboardState::load(conn, year, category)?;

    enter_screen(
        enable_raw_mode,
        || {
            let mut out = io::stdout();
            execute!(out, EnterAlternateScreen)
        },
        disable_raw_mode,
    )?;
    let stdout = io::stdout();

    let result = (|| -> Result<(), AppError> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        loop {
            terminal.draw(|frame| {
                let size = frame.area();
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(3),
                    ])
                    .split(size);

                render_header(frame, layout[0], &state);
                render_body(frame, layout[1], &state);
                render_footer(frame, layout[2]);
            })?;

            if event::poll(std::time::Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if handle_key(conn, &mut state, key)? {
                        break;
                    }
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

/// Raw mode is switched back off when the alternate screen cannot be
/// entered.
fn enter_screen(
    enable: impl FnOnce() -> io::Result<()>,
    enter: impl FnOnce() -> io::Result<()>,
    disable: impl FnOnce() -> io::Result<()>,
) -> io::Result<()> {
    enable()?;
    if let Err(e) = enter() {
        if let Err(restore) = disable() {
            warn!(error = %restore, "could not leave raw mode");
        }
        return Err(e);
    }
    Ok(())
}

fn handle_key(conn: &Connection, state: &mut DashboardState, key: KeyEvent) -> Result<bool, AppError> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
        KeyCode::Left => state.shift_year(-1),
        KeyCode::Right => state.shift_year(1),
        KeyCode::Up => state.shift_category(-1),
        KeyCode::Down => state.shift_category(1),
        KeyCode::Char('r') => {
            state.reload(conn)?;
            return Ok(false);
        }
        _ => return Ok(false),
    }
    state.recompute(conn)?;
    Ok(false)
}

fn render_header(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    let year = state
        .selected_year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    let category = state.selected_category().unwrap_or(ALL_CATEGORIES);

    let line = Line::from(vec![
        Span::styled(
            "Sistem Informasi Pajak Daerah",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::raw(format!("Tahun: {}", year)),
        Span::raw("  |  "),
        Span::raw(format!("Jenis Pajak: {}", category)),
    ]);

    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(line).block(block).alignment(Alignment::Left), area);
}

fn render_footer(frame: &mut ratatui::Frame, area: Rect) {
    let hint = "←/→ year  ↑/↓ category  r reload  q/Esc exit";
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(hint)
            .block(block)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_body(frame: &mut ratatui::Frame, area: Rect, state: &DashboardState) {
    match &state.content {
        Content::NoDataAtAll => render_message(frame, area, NO_DATA_AT_ALL),
        Content::NoData(message) => render_message(frame, area, message),
        Content::Charts { bars, trend: None } => render_bar_chart(frame, area, bars),
        Content::Charts {
            bars,
            trend: Some(trend),
        } => {
            let halves = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            render_bar_chart(frame, halves[0], bars);
            render_line_chart(frame, halves[1], trend);
        }
    }
}

fn render_message(frame: &mut ratatui::Frame, area: Rect, message: &str) {
    let block = Block::default().borders(Borders::ALL);
    let paragraph = Paragraph::new(message)
        .block(block)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn series_color(kind: SeriesKind) -> Color {
    match kind {
        SeriesKind::Target => Color::Yellow,
        SeriesKind::Realization => Color::Cyan,
    }
}

fn bar_value(amount: Decimal) -> u64 {
    amount.trunc().to_u64().unwrap_or(0)
}

fn render_bar_chart(frame: &mut ratatui::Frame, area: Rect, data: &BarChartData) {
    let block = Block::default()
        .title(Line::from(vec![
            Span::styled(data.title.clone(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled("■ Target", Style::default().fg(series_color(SeriesKind::Target))),
            Span::raw(" "),
            Span::styled("■ Realization", Style::default().fg(series_color(SeriesKind::Realization))),
        ]))
        .borders(Borders::ALL);

    let bar_count: usize = data.groups.iter().map(|g| g.bars.len()).sum::<usize>().max(1);
    let inner_width = area.width.saturating_sub(2) as usize;
    let gaps = data.groups.len().saturating_sub(1) * 3 + bar_count;
    let bar_width = (inner_width.saturating_sub(gaps) / bar_count).clamp(3, 12) as u16;

    let mut chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .max(bar_value(data.max_value()).max(1))
        .bar_gap(1)
        .group_gap(3);

    for group in &data.groups {
        let bars: Vec<Bar> = group
            .bars
            .iter()
            .map(|bar| {
                Bar::default()
                    .value(bar_value(bar.value))
                    .text_value(compact_rupiah(bar.value))
                    .style(Style::default().fg(series_color(bar.kind)))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(group.label.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}

fn render_line_chart(frame: &mut ratatui::Frame, area: Rect, data: &LineChartData) {
    let points: Vec<(f64, f64)> = data
        .points
        .iter()
        .map(|p| (p.month as f64, p.value.to_f64().unwrap_or(0.0)))
        .collect();
    let max_value = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max).max(1.0);

    let dataset = Dataset::default()
        .name("Realisasi")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(series_color(SeriesKind::Realization)))
        .data(&points);

    let y_labels = vec![
        compact_rupiah(Decimal::ZERO),
        compact_rupiah(Decimal::from_f64_retain(max_value / 2.0).unwrap_or_default()),
        compact_rupiah(Decimal::from_f64_retain(max_value).unwrap_or_default()),
    ];

    let chart = Chart::new(vec![dataset])
        .block(Block::default().title(data.title.clone()).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Bulan")
                .bounds([1.0, 12.0])
                .labels(data.axis_labels.to_vec()),
        )
        .y_axis(Axis::default().bounds([0.0, max_value]).labels(y_labels));

    frame.render_widget(chart, area);
}
