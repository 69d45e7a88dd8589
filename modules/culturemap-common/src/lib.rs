pub mod config;
pub mod error;
pub mod file_config;
pub mod geo;
pub mod types;

pub use config::Config;
pub use error::{CultureMapError, Result};
pub use file_config::{load_config, FileConfig};
pub use geo::{haversine_distance, haversine_distance_meters, haversine_km, DistanceUnit, GeoPoint};
pub use types::*;
