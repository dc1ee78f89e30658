pub mod assembler;

pub use crate::domain::isoline::{IsolineQuery, IsolineRequest, RangeParam, TravelMode};
pub use crate::domain::ports::{GeometrySource, IsolineProvider};
pub use crate::utils::error::Result;
