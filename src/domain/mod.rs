// Domain layer: GeoJSON contract, isoline request model and the ports both backends implement.

pub mod isoline;
pub mod model;
pub mod ports;
