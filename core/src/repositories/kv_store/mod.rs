//! Key-value store module.

mod r#trait;
pub use r#trait::KeyValueStore;

mod mock;
pub use mock::MockKeyValueStore;
