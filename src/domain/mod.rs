// Domain layer: the sheet record, its derived totals and the ports the pipeline talks to.

pub mod coercion;
pub mod company;
pub mod model;
pub mod ports;
