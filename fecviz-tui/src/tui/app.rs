use crate::tui::theme::Theme;
use fecviz_common::{Config, ContributionRecord};
use fecviz_core::{
    categories, filter_category, write_svg, Dispatch, HistogramView, ViewEvent,
};
use std::sync::mpsc::Receiver;
use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Histogram,
    Help,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Focus {
    Sidebar,
    Main,
}

/// Tone of the bottom bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

pub struct App {
    pub input_path: String,
    pub records: Vec<ContributionRecord>,
    pub states: Vec<String>,
    pub selected_state: Option<String>, // None shows every state
    pub sidebar_selected: usize,       // 0 is "All", then states in order
    pub view: View,
    pub focus: Focus,
    pub histogram: HistogramView,
    pub dispatch: Dispatch,
    pub events_rx: Receiver<ViewEvent>,
    pub status_msg: String,
    pub status_kind: StatusKind,
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub watch_rx: Option<Receiver<()>>, // reload events from filesystem watcher
    pub reload_rx: Option<Receiver<Result<Vec<ContributionRecord>, String>>>,
}

impl App {
    pub fn new(input_path: String, config: Config) -> fecviz_common::Result<Self> {
        let (dispatch, events_rx) = fecviz_core::channel();
        let histogram =
            HistogramView::with_config("#histogram", dispatch.clone(), config.histogram.clone())?;
        Ok(Self {
            input_path,
            records: Vec::new(),
            states: Vec::new(),
            selected_state: None,
            sidebar_selected: 0,
            view: View::Histogram,
            focus: Focus::Sidebar,
            histogram,
            dispatch,
            events_rx,
            status_msg: String::from("Loading..."),
            status_kind: StatusKind::Info,
            should_quit: false,
            theme: Theme::from_name(&config.display.theme),
            config,
            watch_rx: None,
            reload_rx: None,
        })
    }

    /// Replaces the dataset, keeping the state filter when that state still exists.
    pub fn set_records(&mut self, records: Vec<ContributionRecord>) {
        self.states = categories(&records);
        self.records = records;
        if let Some(s) = &self.selected_state {
            if !self.states.contains(s) {
                self.selected_state = None;
            }
        }
        self.sidebar_selected = self.sidebar_index_of_selection();
        self.publish();
    }

    pub fn visible_records(&self) -> Vec<ContributionRecord> {
        filter_category(&self.records, self.selected_state.as_deref())
    }

    /// Sends the filtered records to the histogram through the dispatch channel.
    pub fn publish(&mut self) {
        let visible = self.visible_records();
        if let Err(e) = self.dispatch.send(ViewEvent::DataUpdated(visible)) {
            warn!(error = %e, "dispatch failed");
            self.set_status(StatusKind::Error, format!("dispatch failed: {e}"));
        }
    }

    /// Applies every event waiting on the dispatch channel.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(ev) = self.events_rx.try_recv() {
            self.histogram.handle_event(ev);
            applied += 1;
        }
        applied
    }

    pub fn sidebar_len(&self) -> usize {
        self.states.len() + 1
    }

    pub fn sidebar_down(&mut self) {
        if self.sidebar_selected + 1 < self.sidebar_len() {
            self.sidebar_selected += 1;
        }
    }

    pub fn sidebar_up(&mut self) {
        if self.sidebar_selected > 0 {
            self.sidebar_selected -= 1;
        }
    }

    pub fn select_sidebar(&mut self) {
        self.selected_state = match self.sidebar_selected {
            0 => None,
            i => self.states.get(i - 1).cloned(),
        };
        self.publish();
    }

    /// Moves the state filter forward or back, wrapping through "All".
    pub fn cycle_state(&mut self, forward: bool) {
        let len = self.sidebar_len();
        let cur = self.sidebar_index_of_selection();
        self.sidebar_selected = if forward { (cur + 1) % len } else { (cur + len - 1) % len };
        self.select_sidebar();
    }

    pub fn show_all(&mut self) {
        self.sidebar_selected = 0;
        self.select_sidebar();
    }

    pub fn cycle_color(&mut self) {
        let next = self.histogram.color_state().next();
        if let Err(e) = self.dispatch.send(ViewEvent::ColorChanged(next)) {
            self.set_status(StatusKind::Error, format!("dispatch failed: {e}"));
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Sidebar => Focus::Main,
            Focus::Main => Focus::Sidebar,
        };
    }

    pub fn export_svg(&mut self) {
        let name = match &self.selected_state {
            Some(s) => format!("histogram-{s}.svg"),
            None => "histogram.svg".to_string(),
        };
        let out = std::path::Path::new(&self.config.export.output_dir).join(name);
        match write_svg(self.histogram.surface(), &out) {
            Ok(()) => self.set_status(StatusKind::Success, format!("exported {}", out.display())),
            Err(e) => {
                warn!(error = %e, path = %out.display(), "export failed");
                self.set_status(StatusKind::Error, format!("export failed: {e}"));
            }
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, msg: impl Into<String>) {
        self.status_kind = kind;
        self.status_msg = msg.into();
    }

    pub fn count_for(&self, state: &str) -> usize {
        self.records.iter().filter(|r| r.category == state).count()
    }

    fn sidebar_index_of_selection(&self) -> usize {
        self.selected_state
            .as_ref()
            .and_then(|s| self.states.iter().position(|x| x == s))
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}
