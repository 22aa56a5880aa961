// Domain layer: catalog records, the destination schema and the ports the engine talks through.

pub mod model;
pub mod ports;
