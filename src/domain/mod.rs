// Domain layer: catalog models and ports. Concrete examples live under solid/ and patterns/.

pub mod model;
pub mod ports;
