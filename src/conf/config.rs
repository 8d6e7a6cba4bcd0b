use std::path::Path;

use crate::{
    conf::{RenderConfig, TableConfig},
    core::DbfError::{self, ConfigParsingError},
};
use config::{Config as CConfig, Environment, FileFormat};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, DbfError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }

    /// Defaults, overlaid by the TOML file at `path` if given, overlaid by
    /// `DBASE3_<SECTION>__<KEY>` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Config, DbfError> {
        let mut builder = CConfig::builder();
        if let Some(path) = path {
            let name = path.to_str().ok_or_else(|| {
                ConfigParsingError(format!("config path {} is not UTF-8", path.display()))
            })?;
            builder = builder.add_source(config::File::new(name, FileFormat::Toml));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("DBASE3")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }
}
