// Adapters layer: concrete implementations of the domain ports (CSV files, log sinks).

pub mod csv_io;
pub mod diagnostics;
