// Domain layer: records, the upload template and the ports the pipeline talks through.

pub mod model;
pub mod ports;
