use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, List, ListItem, ListState, Paragraph},
};
use crate::tui::app::{App, Focus, StatusKind, View};
use crate::tui::theme::{parse_hex, Theme};
use fecviz_core::{HistogramView, Node};

/// One bar as read back from the histogram scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneBar {
    pub bin: usize,
    pub height: f64,
    pub label: String,
    pub label_fill: String,
    pub fill: String,
}

pub fn render(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
        .split(area);
    render_topbar(frame, app, chunks[0], theme);
    let mid = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(0)])
        .split(chunks[1]);
    render_sidebar(frame, app, mid[0], theme);
    render_histogram(frame, app, mid[1], theme);
    render_bottombar(frame, app, chunks[2], theme);
    if app.view == View::Help { render_help(frame, area); }
}

fn render_topbar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let color = app.histogram.color_state();
    let badge = Span::styled(format!("[{color:?}]"), Style::default().fg(theme.badge(color)));
    let filter = app.selected_state.as_deref().unwrap_or("all states");
    let info = format!(" {} | {} records | {}", app.input_path, app.records.len(), filter);
    let line = Line::from(vec![badge, Span::raw(info)]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn render_sidebar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let focused = app.focus == Focus::Sidebar;
    let block = Block::default().borders(Borders::ALL).title("States")
        .border_style(if focused { Style::default().fg(theme.highlight) } else { Style::default() });
    let mut items = vec![ListItem::new(format!("All {:>10}", app.records.len()))];
    items.extend(app.states.iter().map(|s| {
        let active = app.selected_state.as_deref() == Some(s.as_str());
        let marker = if active { "*" } else { " " };
        ListItem::new(Line::from(vec![
            Span::raw(format!("{marker}{:<4}", truncate(s, 4))),
            Span::styled(format!("{:>9}", app.count_for(s)), Style::default().fg(theme.muted)),
        ]))
    }));
    let mut state = ListState::default();
    state.select(Some(app.sidebar_selected.min(items.len().saturating_sub(1))));
    let list = List::new(items).block(block).highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_histogram(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let focused = app.focus == Focus::Main;
    let block = Block::default().borders(Borders::ALL).title("Contribution sizes")
        .border_style(if focused { Style::default().fg(theme.highlight) } else { Style::default() });
    let bars = scene_bars(&app.histogram);
    if bars.is_empty() {
        frame.render_widget(Paragraph::new("No contributions to show.").block(block), area);
        return;
    }
    let ticks = axis_labels(&app.histogram);
    let canvas = app.histogram.config().height.max(1.0);
    let inner_width = area.width.saturating_sub(2) as usize;
    let bar_width = (inner_width / bars.len().max(1)).saturating_sub(1).clamp(3, 12) as u16;
    let chart_bars: Vec<Bar> = bars.iter().map(|b| {
        let lower = if b.bin == 0 { "$0".to_string() } else { ticks.get(b.bin - 1).cloned().unwrap_or_default() };
        Bar::default()
            .value(b.height.max(0.0) as u64)
            .label(Line::from(lower))
            .text_value(b.label.clone())
            .style(Style::default().fg(parse_hex(&b.fill, theme.primary)))
            .value_style(Style::default().fg(parse_hex(&b.label_fill, theme.fg)).bg(parse_hex(&b.fill, theme.primary)))
    }).collect();
    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width)
        .bar_gap(1)
        .max(canvas as u64)
        .data(BarGroup::default().bars(&chart_bars));
    frame.render_widget(chart, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(Span::styled("Keybindings", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  q        Quit"),
        Line::from("  ?        Toggle help"),
        Line::from("  Tab      Cycle focus"),
        Line::from("  j/k      Navigate states"),
        Line::from("  Enter    Filter to state"),
        Line::from("  s/S      Next/previous state"),
        Line::from("  a        All states"),
        Line::from("  c        Cycle color state"),
        Line::from("  e        Export SVG"),
        Line::from("  Esc      Back"),
    ];
    let popup = centered_rect(50, 60, area);
    frame.render_widget(ratatui::widgets::Clear, popup);
    frame.render_widget(Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Help (?)")), popup);
}

fn render_bottombar(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled(format!(" {}", app.status_msg), Style::default().fg(status_color(app.status_kind, theme))),
        Span::raw(" | q:quit ?:help Tab:focus s/S:state a:all c:color e:export"),
    ]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bg).fg(theme.fg)), area);
}

fn status_color(kind: StatusKind, theme: &Theme) -> ratatui::style::Color {
    match kind {
        StatusKind::Info => theme.fg,
        StatusKind::Success => theme.success,
        StatusKind::Error => theme.error,
    }
}

/// Bars in bin order, read from the rect and text of each bar group.
pub fn scene_bars(view: &HistogramView) -> Vec<SceneBar> {
    let mut bars: Vec<SceneBar> = view.bar_nodes().filter_map(scene_bar).collect();
    bars.sort_by_key(|b| b.bin);
    bars
}

fn scene_bar(group: &Node) -> Option<SceneBar> {
    let bin = group.attr("data-bin")?.parse().ok()?;
    let rect = group.children().iter().find(|c| c.kind.tag() == "rect")?;
    let text = group.children().iter().find(|c| c.text_content().is_some())?;
    Some(SceneBar {
        bin,
        height: rect.attr_f64("height")?,
        label: text.text_content()?.to_string(),
        label_fill: text.attr("fill").unwrap_or("grey").to_string(),
        fill: rect.attr("fill").unwrap_or_default().to_string(),
    })
}

/// Tick labels of the x axis, left to right.
pub fn axis_labels(view: &HistogramView) -> Vec<String> {
    view.axis_node()
        .map(|axis| {
            axis.select_all("tick")
                .filter_map(|t| t.children().iter().find_map(|c| c.text_content()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn centered_rect(px: u16, py: u16, r: Rect) -> Rect {
    let v = Layout::default().direction(Direction::Vertical).constraints([Constraint::Percentage((100-py)/2), Constraint::Percentage(py), Constraint::Percentage((100-py)/2)]).split(r);
    Layout::default().direction(Direction::Horizontal).constraints([Constraint::Percentage((100-px)/2), Constraint::Percentage(px), Constraint::Percentage((100-px)/2)]).split(v[1])[1]
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max { s.to_owned() } else { format!("{}\u{2026}", s.chars().take(max.saturating_sub(1)).collect::<String>()) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fecviz_core::{ContributionRecord, Dispatch};
    use ratatui::{backend::TestBackend, Terminal};

    fn view() -> HistogramView {
        let mut v = HistogramView::new("#h", Dispatch::detached());
        v.render(&[
            ContributionRecord::new("CA", 10.0),
            ContributionRecord::new("CA", 10.0),
            ContributionRecord::new("CA", 600.0),
        ]);
        v
    }

    #[test]
    fn reads_bars_back_from_scene() {
        let bars = scene_bars(&view());
        assert_eq!(bars.len(), 9);
        assert_eq!(bars[0].height, 450.0);
        assert_eq!(bars[0].label, "2");
        assert_eq!(bars[0].label_fill, "white");
        assert_eq!(bars[3].height, 225.0);
        assert_eq!(bars[1].label_fill, "grey");
        assert_eq!(bars[0].fill, "#ff9933");
    }

    #[test]
    fn reads_axis_labels() {
        assert_eq!(axis_labels(&view())[3], "$1k");
    }

    #[test]
    fn status_tone_picks_theme_color() {
        let theme = Theme::dark();
        assert_eq!(status_color(StatusKind::Error, &theme), theme.error);
        assert_eq!(status_color(StatusKind::Success, &theme), theme.success);
        assert_eq!(status_color(StatusKind::Info, &theme), theme.fg);
    }

    #[test]
    fn draws_without_panicking() {
        let mut app = crate::tui::app::App::new("x.csv".into(), fecviz_common::Config::default()).unwrap();
        app.set_records(vec![ContributionRecord::new("CA", 10.0)]);
        app.drain_events();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        app.view = View::Help;
        terminal.draw(|f| render(f, &app)).unwrap();
    }
}
