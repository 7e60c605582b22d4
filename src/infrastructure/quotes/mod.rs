pub mod chart;
pub mod relay;
pub mod relay_source;
