//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod timezone;

pub use geo_location::GeoLocation;
pub use timezone::Timezone;
