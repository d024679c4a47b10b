pub mod session;

pub use session::{Tracker, TrackerSettings};
