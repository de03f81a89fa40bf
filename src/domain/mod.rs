// Domain layer: models and ports. No HTTP or config details here.

pub mod model;
pub mod ports;
