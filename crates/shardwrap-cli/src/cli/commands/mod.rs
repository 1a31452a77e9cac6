pub mod dispatch;
pub mod plan;
pub mod workers;

pub use dispatch::dispatch;
