pub mod base;
pub mod mongodb_source;
pub mod plain_source;
pub mod policy;

pub use base::{create_profile_source, ProfileSource, SourceConfig};
pub use policy::{is_allowed, AccessPolicy, ALWAYS_ALLOWED};
