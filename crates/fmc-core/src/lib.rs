//! Core logic for the FMC flight plan generator.
//!
//! The interesting part is [`SequenceStore`]: a dense, 1-based ordered list
//! of route legs that can be appended to, shifted and deleted from without
//! ever exposing a duplicate or missing position. Around it sit the
//! great-circle distance math, the route assembler and the two output
//! encodings (portable route text and KML map overlay).

pub mod error;
pub mod export;
pub mod geo;
pub mod models;
pub mod reference;
pub mod route;
pub mod sequence;

pub use error::{FormatError, ReferenceError, RouteError};
pub use export::{parse_portable_format, to_map_overlay, to_portable_format};
pub use geo::{leg_distance, round_to, EARTH_RADIUS_NM};
pub use models::{Coordinates, CoordinateSource, Endpoint, Endpoints, Leg, NewLeg, ShiftDirection};
pub use reference::ReferenceData;
pub use route::{assemble, total_distance, LegDistance, RouteDocument, SessionContext};
pub use sequence::SequenceStore;
