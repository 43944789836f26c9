// Utilities shared by the resolver and the session

pub mod paths;

pub use paths::{descriptor_path, resource_dir, schema_name};
