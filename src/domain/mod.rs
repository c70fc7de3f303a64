// Domain layer: records, step tables and ports. No I/O here.

pub mod model;
pub mod ports;
pub mod steps;
