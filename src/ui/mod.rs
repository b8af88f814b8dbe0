pub mod agenda;
pub mod navigation;

pub use navigation::{DateRange, ViewCursor};
