mod kv;
mod preferences;
mod schema;
mod types;

pub use kv::{
    load_json, save_json, KeyValueStore, MemoryStore, CUSTOM_KEYWORDS_KEY, SELECTED_KEYWORDS_KEY,
};
pub use schema::Database;
pub use types::{DatabaseError, StoreError};
