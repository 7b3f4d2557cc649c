pub mod band_scale;
pub mod ordinal_scale;
pub mod primitives;
pub mod scale;
pub mod threshold_scale;
pub mod ticks;
pub mod time_scale;
pub mod treemap;
pub mod types;

pub use band_scale::BandScale;
pub use ordinal_scale::OrdinalScale;
pub use scale::{LinearScale, extent};
pub use threshold_scale::{BucketExtent, ThresholdScale};
pub use ticks::{nice_ticks, stepped_range, tick_step};
pub use time_scale::{TimeInterval, TimeScale, multi_scale_format};
pub use treemap::{GOLDEN_RATIO, Hierarchical, Treemap, TreemapLayout, TreemapNode, squarify};
pub use types::{Padding, Point, Rect, Viewport};
