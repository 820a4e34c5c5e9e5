//! Domain types for stockcast

pub mod bar;
pub mod feature;
pub mod series;

pub use bar::Bar;
pub use feature::{Feature, FeatureSource};
pub use series::PriceSeries;
