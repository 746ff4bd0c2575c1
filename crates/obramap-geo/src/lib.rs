//! Obramap Geo - the geospatial core.
//!
//! This crate owns the two pieces with real domain logic:
//!
//! - the **geometry decoder**: WKB bytes from the upstream API into the
//!   textual coordinate representation stored per obra, plus the inverse
//!   parse back into numeric coordinate rings ([`wkb`], [`coords`]);
//! - the **proximity engine**: great-circle evaluation of which single
//!   obra (if any) the user currently qualifies as being "at"
//!   ([`distance`], [`proximity`], [`tracking`]).

pub mod coords;
pub mod distance;
pub mod proximity;
pub mod tracking;
pub mod wkb;

pub use coords::{encode, parse_text, wkb_hex_to_text, CoordParseError};
pub use distance::{haversine_distance_meters, EARTH_RADIUS_M};
pub use proximity::{evaluate, ObraSite, ProximityHit, SiteIndex};
pub use tracking::{ActiveObra, TrackingSession};
pub use wkb::{parse_wkb, WkbError};
