//! Dictionary construction from configuration

use std::path::Path;

use crate::observability::Logger;
use crate::source::{DictionarySource, FileSource};

use super::config::{DictionaryConfig, SourceConfig};
use super::direct::DirectDictionary;
use super::errors::{DictionaryError, DictionaryResult};

/// Layout name of a direct dictionary
pub const DIRECT_LAYOUT: &str = "direct";

/// Builds a direct dictionary from a parsed configuration and a source
pub fn create_direct_dictionary(
    config: &DictionaryConfig,
    source: Box<dyn DictionarySource>,
) -> DictionaryResult<DirectDictionary> {
    if config.layout != DIRECT_LAYOUT {
        return Err(DictionaryError::UnsupportedLayout {
            dictionary: config.full_name(),
            layout: config.layout.clone(),
        });
    }

    DirectDictionary::new(
        config.database.clone(),
        config.name.clone(),
        config.structure.clone(),
        source,
        config.lifetime,
        None,
    )
}

/// Loads a configuration file and builds the dictionary it describes.
///
/// Relative source paths resolve against the configuration file's directory.
/// Applies the configured log level before construction.
pub fn open_dictionary(path: &Path) -> DictionaryResult<DirectDictionary> {
    let config = DictionaryConfig::load(path)?;
    if let Some(level) = config.log_level() {
        Logger::set_min_severity(level);
    }

    let source: Box<dyn DictionarySource> = match &config.source {
        SourceConfig::File {
            path: source_path,
            format,
            block_size,
        } => {
            let resolved = match path.parent() {
                Some(dir) if source_path.is_relative() => dir.join(source_path),
                _ => source_path.clone(),
            };
            Box::new(FileSource::for_structure(
                resolved,
                *format,
                *block_size,
                &config.structure,
            ))
        }
    };

    create_direct_dictionary(&config, source)
}
