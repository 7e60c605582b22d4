pub mod attribution;
pub mod batch_fetch;
pub mod refresh;
pub mod retry;
