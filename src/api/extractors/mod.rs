//! Custom request extractors.

mod user_key;
mod validated_json;

pub use user_key::UserKey;
pub use validated_json::ValidatedJson;
