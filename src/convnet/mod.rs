mod config;
mod net;
mod params;

pub use config::ConvNetConfig;
pub use net::ThreeLayerConvNet;
pub use params::{ConvNetGrads, ConvNetParams};
