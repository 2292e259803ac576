pub mod loader;

pub use loader::{RecordSnapshot, RecordSource, RecordStore};
