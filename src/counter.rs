mod detection;
mod events;
mod filters;
mod geometry;
mod identity;
mod track_state;
mod zone_counter;

pub use detection::Detection;
pub use events::{Event, EventKind, EventLog};
pub use filters::GeometryFilter;
pub use geometry::{BBox, Zone, center_dist};
pub use identity::{DisplayState, IdentityRegistry};
pub use track_state::{AlertState, TrackState, TrackTable};
pub use zone_counter::{CounterConfig, FrameResult, ZoneCounter};
