pub mod asset_class;
pub mod progress;
pub mod retry_policy;
pub mod sort;
