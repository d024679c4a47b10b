pub mod debounce;
pub mod error;
pub mod migrations;
pub mod repository;

pub use debounce::WriteDebouncer;
pub use error::StoreError;
pub use repository::DayStore;
