use serde::{Deserialize, Serialize};

/// Separators and switches for the text renderers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    /// Between fields in `csv` output.
    #[serde(default = "RenderConfig::default_field_separator")]
    pub field_separator: String,
    /// Between fields in `list` output.
    #[serde(default = "RenderConfig::default_list_separator")]
    pub list_separator: String,
    #[serde(default = "RenderConfig::default_record_separator")]
    pub record_separator: String,
    /// Emit a row of field names before `csv` output.
    #[serde(default)]
    pub csv_header: bool,
}

impl RenderConfig {
    fn default_field_separator() -> String {
        String::from(",")
    }

    fn default_list_separator() -> String {
        String::from("|")
    }

    fn default_record_separator() -> String {
        String::from("\n")
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            field_separator: Self::default_field_separator(),
            list_separator: Self::default_list_separator(),
            record_separator: Self::default_record_separator(),
            csv_header: false,
        }
    }
}
