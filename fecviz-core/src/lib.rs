pub mod bins;
pub mod cache;
pub mod dispatch;
pub mod format;
pub mod records;
pub mod scale;
pub mod scene;
pub mod svg;
pub mod view;

pub use bins::{bucket, max_bin_count, BinBoundaries, HistogramBin};
pub use cache::{signature, CachedScale, ScaleCache, SCALE_CACHE_CAPACITY};
pub use dispatch::{channel, Dispatch, ViewEvent};
pub use fecviz_common::{ContributionRecord, FecVizError, Result};
pub use format::{format_bin_count, si_currency, si_format, CountLabel};
pub use records::{categories, filter_category, load_records, parse_csv, parse_json};
pub use scale::{LinearScale, ScaleState, ThresholdScale};
pub use scene::{join, JoinPlan, Node, NodeKind, Surface, Transition};
pub use svg::{to_svg, write_svg};
pub use view::{BarSpec, ColorState, HistogramView, AXIS_CLASS, BAR_CLASS};
