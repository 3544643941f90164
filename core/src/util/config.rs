use crate::prelude::{UtilError, UtilResult};
use log::debug;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// First application tag found anywhere in `value`, keys included.
fn find_tag(value: &Value) -> Option<String> {
    match value {
        Value::Tagged(tagged) => Some(tagged.tag.to_string()),
        Value::Sequence(items) => items.iter().find_map(find_tag),
        Value::Mapping(map) => map
            .iter()
            .find_map(|(key, value)| find_tag(key).or_else(|| find_tag(value))),
        _ => None,
    }
}

/// Loads a YAML config file and hands the document back.
///
/// `<<` merge keys are resolved and application tags such as `!actor` are
/// rejected, so only plain YAML data comes back. Interpreting keys is the
/// caller's job; nothing is validated or cached.
pub fn load_config_from_file<P: AsRef<Path>>(path: P) -> UtilResult<Value> {
    let path_ref = path.as_ref();
    let parse_error = |source: serde_yaml::Error| UtilError::ConfigParse {
        path: path_ref.to_path_buf(),
        source,
    };
    let contents = fs::read_to_string(path_ref).map_err(|source| UtilError::ConfigAccess {
        path: path_ref.to_path_buf(),
        source,
    })?;
    let mut config: Value = serde_yaml::from_str(&contents).map_err(parse_error)?;
    config.apply_merge().map_err(parse_error)?;
    if let Some(tag) = find_tag(&config) {
        return Err(parse_error(serde::de::Error::custom(format!(
            "could not determine a constructor for the tag {}",
            tag
        ))));
    }
    debug!(
        "loaded config {} ({} bytes)",
        path_ref.display(),
        contents.len()
    );
    Ok(config)
}

/// Loads a YAML config file into a typed structure.
pub fn load_config_as<T, P>(path: P) -> UtilResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path_ref = path.as_ref();
    let value = load_config_from_file(path_ref)?;
    serde_yaml::from_value(value).map_err(|source| UtilError::ConfigParse {
        path: path_ref.to_path_buf(),
        source,
    })
}

pub fn dump_config_to_string(config: &Value) -> UtilResult<String> {
    serde_yaml::to_string(config).map_err(UtilError::ConfigDump)
}

pub fn save_config_to_file<P: AsRef<Path>>(path: P, config: &Value) -> UtilResult<()> {
    let path_ref = path.as_ref();
    let text = dump_config_to_string(config)?;
    fs::write(path_ref, &text).map_err(|source| UtilError::ConfigAccess {
        path: path_ref.to_path_buf(),
        source,
    })?;
    debug!("wrote config {} ({} bytes)", path_ref.display(), text.len());
    Ok(())
}
