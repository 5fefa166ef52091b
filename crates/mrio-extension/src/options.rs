//! Options for extension conversion and characterization.

use serde::{Deserialize, Serialize};

use mrio_bridge::{BridgeAlias, BridgeConfig, ConvertOptions};
use mrio_validate::ValidationOptions;

/// Bridge header naming the extension a rule belongs to.
pub const DEFAULT_SOURCE_COLUMN: &str = "extension";

/// Options for [`Extension::convert`](crate::Extension::convert) and
/// [`convert_extensions`](crate::convert_extensions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConvertOptions {
    pub bridge: BridgeConfig,
    pub convert: ConvertOptions,
    pub validation: ValidationOptions,
    /// Refuse to convert when the bridge table declares incompatible units.
    pub enforce_units: bool,
}

impl Default for ExtensionConvertOptions {
    fn default() -> Self {
        Self {
            bridge: BridgeConfig::default(),
            convert: ConvertOptions::default(),
            validation: ValidationOptions::default(),
            enforce_units: true,
        }
    }
}

impl ExtensionConvertOptions {
    #[must_use]
    pub fn with_bridge(mut self, bridge: BridgeConfig) -> Self {
        self.bridge = bridge;
        self
    }

    #[must_use]
    pub fn with_convert(mut self, convert: ConvertOptions) -> Self {
        self.convert = convert;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    #[must_use]
    pub fn with_enforce_units(mut self, enforce: bool) -> Self {
        self.enforce_units = enforce;
        self
    }

    /// Header of the source column, falling back to `"extension"`.
    pub fn source_column(&self) -> &str {
        self.bridge
            .source_column
            .as_deref()
            .unwrap_or(DEFAULT_SOURCE_COLUMN)
    }
}

/// Options for characterization.
///
/// A characterization table is a bridge table whose `name_column` holds the
/// new label for the first row level of the extension. All other row levels
/// are summed away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterizeOptions {
    /// Column with the impact names; also the new row level name.
    pub name_column: String,
    pub factor_column: String,
    /// Column with the unit of each impact.
    pub unit_column: String,
    /// Column with the expected unit of the characterized stressor.
    pub orig_unit_column: String,
    /// Column naming the source extension in the multi-extension form.
    pub source_column: String,
    /// Name of the result; a leading `_` appends it to the source name.
    pub name: String,
    /// Return the validation report without characterizing.
    pub only_validation: bool,
    /// Match stressor, region and sector cells verbatim.
    pub literal_labels: bool,
    pub validation: ValidationOptions,
}

impl Default for CharacterizeOptions {
    fn default() -> Self {
        Self {
            name_column: "impact".to_string(),
            factor_column: "factor".to_string(),
            unit_column: "impact_unit".to_string(),
            orig_unit_column: "stressor_unit".to_string(),
            source_column: DEFAULT_SOURCE_COLUMN.to_string(),
            name: "_characterized".to_string(),
            only_validation: false,
            literal_labels: true,
            validation: ValidationOptions::default(),
        }
    }
}

impl CharacterizeOptions {
    #[must_use]
    pub fn with_name_column(mut self, column: impl Into<String>) -> Self {
        self.name_column = column.into();
        self
    }

    #[must_use]
    pub fn with_factor_column(mut self, column: impl Into<String>) -> Self {
        self.factor_column = column.into();
        self
    }

    #[must_use]
    pub fn with_unit_columns(mut self, unit: impl Into<String>, orig_unit: impl Into<String>) -> Self {
        self.unit_column = unit.into();
        self.orig_unit_column = orig_unit.into();
        self
    }

    #[must_use]
    pub fn with_source_column(mut self, column: impl Into<String>) -> Self {
        self.source_column = column.into();
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_only_validation(mut self, only: bool) -> Self {
        self.only_validation = only;
        self
    }

    #[must_use]
    pub fn with_literal_labels(mut self, literal: bool) -> Self {
        self.literal_labels = literal;
        self
    }

    #[must_use]
    pub fn with_validation(mut self, validation: ValidationOptions) -> Self {
        self.validation = validation;
        self
    }

    /// Name of the characterized extension derived from `source`.
    pub fn result_name(&self, source: &str) -> String {
        if self.name.starts_with('_') {
            format!("{source}{}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Bridge configuration reading the characterization columns, with the
    /// name column bridged from `first_level`.
    pub fn bridge_config(&self, first_level: &str) -> BridgeConfig {
        BridgeConfig::default()
            .with_factor_column(self.factor_column.as_str())
            .with_unit_columns(Some(self.orig_unit_column.as_str()), Some(self.unit_column.as_str()))
            .with_bridge_alias(BridgeAlias::new(
                self.name_column.as_str(),
                self.name_column.as_str(),
                first_level,
            ))
            .with_literal_constraints(self.literal_labels)
    }
}
