// Domain layer: the analysis record and the ports to external systems.

pub mod model;
pub mod ports;
