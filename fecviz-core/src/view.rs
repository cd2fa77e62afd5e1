//! Histogram of contribution sizes drawn into a [`Surface`].
//!
//! Each [`HistogramView::render`] buckets the records into fixed amount ranges,
//! sizes one bar per bin by its count, reconciles the bars with the previous
//! frame and redraws the x axis.

use crate::bins::{bucket, max_bin_count, BinBoundaries, HistogramBin};
use crate::cache::{CachedScale, ScaleCache};
use crate::dispatch::{Dispatch, ViewEvent};
use crate::format::{format_bin_count, si_currency};
use crate::scale::{round_half_up, LinearScale, ScaleState, ThresholdScale};
use crate::scene::{join, Node, Surface};
use fecviz_common::{ContributionRecord, HistogramConfig, JoinKeyPolicy, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const BAR_CLASS: &str = "bar";
pub const AXIS_CLASS: &str = "x axis";

const LABEL_INSET: f64 = 12.0;
const LABEL_LIFT: f64 = -4.0;
const LABEL_MIN_BAR: f64 = 14.0; // shorter bars get their label above them
const TICK_SIZE: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorState {
    #[default]
    Default = 0,
    Primary = 1,
    Secondary = 2,
}

impl ColorState {
    pub fn next(self) -> Self {
        match self {
            ColorState::Default => ColorState::Primary,
            ColorState::Primary => ColorState::Secondary,
            ColorState::Secondary => ColorState::Default,
        }
    }
}

/// Geometry of one drawn bar, derived from a bin.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSpec {
    pub index: usize,
    pub count: u64,
    pub height: f64, // rounded pixels
}

pub struct HistogramView {
    config: HistogramConfig,
    boundaries: BinBoundaries,
    dispatch: Dispatch,
    surface: Surface,
    scales: Option<ScaleState>,
    cache: ScaleCache,
    color: ColorState,
    bins: Vec<HistogramBin>,
    transition_generation: u64,
}

impl HistogramView {
    /// A view with the default 330x450 layout and contribution-size bins.
    pub fn new(container: impl Into<String>, dispatch: Dispatch) -> Self {
        Self::build(container.into(), dispatch, HistogramConfig::default(), BinBoundaries::default())
    }

    pub fn with_config(
        container: impl Into<String>,
        dispatch: Dispatch,
        config: HistogramConfig,
    ) -> Result<Self> {
        let boundaries = BinBoundaries::new(&config.thresholds)?;
        Ok(Self::build(container.into(), dispatch, config, boundaries))
    }

    fn build(
        container: String,
        dispatch: Dispatch,
        config: HistogramConfig,
        boundaries: BinBoundaries,
    ) -> Self {
        let surface = Surface::new(container, config.width, config.height + config.margin_bottom);
        let cache = ScaleCache::new(config.cache_policy);
        Self {
            config,
            boundaries,
            dispatch,
            surface,
            scales: None,
            cache,
            color: ColorState::Default,
            bins: Vec::new(),
            transition_generation: 0,
        }
    }

    pub fn render(&mut self, records: &[ContributionRecord]) {
        let bins = bucket(records, &self.boundaries);
        self.ensure_scales(records, &bins);

        let bars = if records.is_empty() { Vec::new() } else { self.bar_specs(&bins) };
        self.bins = bins;
        self.reconcile_bars(&bars);
        self.draw_axis();
    }

    /// Heights for every bin, scaled so the fullest bin spans the canvas.
    pub fn bar_specs(&self, bins: &[HistogramBin]) -> Vec<BarSpec> {
        let height_scale =
            LinearScale::new((0.0, max_bin_count(bins) as f64), (0.0, self.config.height));
        bins.iter()
            .enumerate()
            .map(|(index, b)| BarSpec {
                index,
                count: b.count,
                height: round_half_up(height_scale.apply(b.count as f64)),
            })
            .collect()
    }

    fn join_key(&self, bar: &BarSpec) -> String {
        match self.config.join_key {
            JoinKeyPolicy::BinIndex => bar.index.to_string(),
            JoinKeyPolicy::ScaledHeight => bar.height.to_string(),
        }
    }

    fn reconcile_bars(&mut self, bars: &[BarSpec]) {
        let incoming: Vec<String> = bars.iter().map(|b| self.join_key(b)).collect();
        let new_nodes: Vec<Node> =
            bars.iter().zip(&incoming).map(|(b, key)| self.bar_node(b, key)).collect();

        let root = self.surface.root_mut();
        let (mut existing, others): (Vec<Node>, Vec<Node>) =
            root.children_mut().drain(..).partition(|n| n.has_class(BAR_CLASS));
        let existing_keys: Vec<String> =
            existing.iter().map(|n| n.key.clone().unwrap_or_default()).collect();
        let plan = join(&existing_keys, &incoming);
        debug!(
            enter = plan.enter.len(),
            update = plan.update.len(),
            exit = plan.exit.len(),
            "histogram bars joined"
        );

        for &(node_idx, data_idx) in &plan.update {
            existing[node_idx] = new_nodes[data_idx].clone();
        }
        let mut kept: Vec<Node> = existing
            .into_iter()
            .enumerate()
            .filter(|(i, _)| plan.exit.binary_search(i).is_err())
            .map(|(_, n)| n)
            .collect();
        kept.extend(plan.enter.iter().map(|&d| new_nodes[d].clone()));
        kept.sort_by_key(|n| n.attr("data-bin").and_then(|b| b.parse::<usize>().ok()));

        let mut children = kept;
        children.extend(others);
        root.replace_children(children);
    }

    fn bar_step(&self) -> f64 {
        ((self.config.width - 10.0) / self.boundaries.len() as f64).floor() + 1.0
    }

    fn bar_node(&self, bar: &BarSpec, key: &str) -> Node {
        let step = self.bar_step();
        let top = self.config.height - bar.height;
        let tall = bar.height > LABEL_MIN_BAR;
        let rect = Node::rect()
            .with_attr("y", top)
            .with_attr("fill", &self.config.bar_fill)
            .with_attr("height", bar.height)
            .with_attr("width", format!("{}px", self.config.bar_width));
        let label = Node::text(format_bin_count(bar.count).to_string())
            .with_attr("dx", step / 2.0 - 14.0)
            .with_attr("y", top)
            .with_attr("font-family", "sans-serif")
            .with_attr("font-size", "12px")
            .with_attr("dy", if tall { LABEL_INSET } else { LABEL_LIFT })
            .with_attr("fill", if tall { "white" } else { "grey" });
        Node::group()
            .with_class(BAR_CLASS)
            .with_key(key)
            .with_attr("data-bin", bar.index)
            .with_attr("transform", format!("translate({},0)", bar.index as f64 * step + 3.0))
            .with_child(rect)
            .with_child(label)
    }

    /// Draws the bottom axis once scales exist; later calls restart its transition.
    pub fn draw_axis(&mut self) {
        let Some(scales) = &self.scales else {
            debug!("axis skipped: scales not set");
            return;
        };
        let ticks = axis_ticks(&scales.x_scale);
        let height = self.config.height;
        self.transition_generation += 1;
        let generation = self.transition_generation;
        let duration = Duration::from_millis(self.config.transition_ms);

        let root = self.surface.root_mut();
        if root.select_mut(AXIS_CLASS).is_none() {
            root.append(
                Node::group()
                    .with_class(AXIS_CLASS)
                    .with_attr("transform", format!("translate(0,{height})")),
            );
        }
        let Some(axis) = root.select_mut(AXIS_CLASS) else {
            return;
        };
        axis.replace_children(ticks);
        axis.start_transition(duration, generation);
    }

    /// Computes scales for `records`, or restores them when the signature was
    /// seen before. Returns the bins cached with those scales.
    pub fn set_scale(&mut self, records: &[ContributionRecord]) -> Vec<HistogramBin> {
        let sig = self.cache.signature(records);
        if let Some(hit) = self.cache.get(&sig) {
            debug!(signature = %sig, "scale cache hit");
            self.scales = Some(hit.scales.clone());
            return hit.bins.clone();
        }
        let bins = bucket(records, &self.boundaries);
        self.store_scales(sig, records, &bins);
        bins
    }

    fn ensure_scales(&mut self, records: &[ContributionRecord], bins: &[HistogramBin]) {
        let sig = self.cache.signature(records);
        match self.cache.get(&sig) {
            Some(hit) => {
                debug!(signature = %sig, "scale cache hit");
                self.scales = Some(hit.scales.clone());
            }
            None => self.store_scales(sig, records, bins),
        }
    }

    fn store_scales(&mut self, sig: String, records: &[ContributionRecord], bins: &[HistogramBin]) {
        let max_amount = records
            .iter()
            .map(|r| r.amount)
            .filter(|a| a.is_finite())
            .fold(None, |acc: Option<f64>, a| Some(acc.map_or(a, |m| m.max(a))))
            .unwrap_or(0.0);
        let scales = ScaleState {
            x_scale: ThresholdScale::evenly_spaced(self.boundaries.thresholds(), self.config.width),
            y_scale: LinearScale::new((0.0, max_amount), (0.0, self.config.height)),
        };
        debug!(signature = %sig, max_amount, "scales computed");
        self.cache.insert(sig, CachedScale::new(scales.clone(), bins));
        self.scales = Some(scales);
    }

    pub fn has_scale_set(&self) -> bool {
        self.scales.is_some()
    }

    pub fn set_histogram_color(&mut self, state: ColorState) {
        self.color = state;
    }

    pub fn handle_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::DataUpdated(records) => self.render(&records),
            ViewEvent::ColorChanged(state) => self.set_histogram_color(state),
        }
    }

    pub fn color_state(&self) -> ColorState {
        self.color
    }

    pub fn scale_state(&self) -> Option<&ScaleState> {
        self.scales.as_ref()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Bins from the most recent render.
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    pub fn boundaries(&self) -> &BinBoundaries {
        &self.boundaries
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn bar_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.surface.root().select_all(BAR_CLASS)
    }

    pub fn axis_node(&self) -> Option<&Node> {
        self.surface.root().children().iter().find(|n| n.has_class(AXIS_CLASS))
    }
}

fn axis_ticks(x_scale: &ThresholdScale) -> Vec<Node> {
    let mut nodes: Vec<Node> = x_scale
        .domain()
        .iter()
        .map(|&t| {
            Node::group()
                .with_class("tick")
                .with_attr("transform", format!("translate({},0)", x_scale.apply(t)))
                .with_child(Node::path().with_attr("d", format!("M0,0V{TICK_SIZE}")))
                .with_child(
                    Node::text(si_currency(t, 1))
                        .with_attr("y", TICK_SIZE + 3.0)
                        .with_attr("dy", ".71em")
                        .with_attr("style", "text-anchor: middle"),
                )
        })
        .collect();
    let (r0, r1) = x_scale.range_extent();
    nodes.push(
        Node::path()
            .with_class("domain")
            .with_attr("d", format!("M{r0},{TICK_SIZE}V0H{r1}V{TICK_SIZE}")),
    );
    nodes
}
