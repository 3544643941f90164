pub mod config;
pub mod format;
pub mod serialize;

pub use config::{dump_config_to_string, load_config_as, load_config_from_file, save_config_to_file};
pub use format::{dumps, ConsumerFormatter};
pub use serialize::{serialize_to_json, SerializableValue};
