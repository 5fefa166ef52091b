//! The extension bundle and its single-source operations.

use std::fmt;

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mrio_bridge::{BridgeSpec, ConvertOptions, RowOrder, apply};
use mrio_model::{Axis, LabeledTable, UnitTable};
use mrio_validate::{ValidationOptions, ValidationReport, validate};

use crate::error::{ExtensionError, Result};
use crate::options::{CharacterizeOptions, ExtensionConvertOptions};

/// One of the tables an extension carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Account {
    /// Flows by industry.
    F,
    /// Flows by final demand category.
    FY,
    /// Coefficients by industry.
    S,
    /// Coefficients by final demand category.
    SY,
}

impl Account {
    pub const ALL: [Account; 4] = [Account::F, Account::FY, Account::S, Account::SY];

    pub fn as_str(self) -> &'static str {
        match self {
            Account::F => "F",
            Account::FY => "F_Y",
            Account::S => "S",
            Account::SY => "S_Y",
        }
    }

    pub fn is_final_demand(self) -> bool {
        matches!(self, Account::FY | Account::SY)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-linked tables of one satellite account plus their units.
///
/// Every present table shares the row axis of the unit table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    name: String,
    f: Option<LabeledTable>,
    f_y: Option<LabeledTable>,
    s: Option<LabeledTable>,
    s_y: Option<LabeledTable>,
    unit: UnitTable,
}

/// Validation report of a conversion, with the result unless it was refused.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub report: ValidationReport,
    /// `None` when unit errors stopped the conversion or only validation
    /// was requested.
    pub extension: Option<Extension>,
}

impl ConversionOutcome {
    pub fn is_refused(&self) -> bool {
        self.extension.is_none()
    }
}

impl Extension {
    pub fn new(name: impl Into<String>, unit: UnitTable) -> Self {
        Self {
            name: name.into(),
            f: None,
            f_y: None,
            s: None,
            s_y: None,
            unit,
        }
    }

    /// Attach `table` as `account`, replacing any previous table.
    ///
    /// # Errors
    ///
    /// [`ExtensionError::RowMismatch`] if the table rows differ from the
    /// rows of the unit table.
    pub fn with_account(mut self, account: Account, table: LabeledTable) -> Result<Self> {
        if table.rows() != self.unit.rows() {
            return Err(ExtensionError::RowMismatch {
                extension: self.name,
                account: account.as_str(),
            });
        }
        *self.slot(account) = Some(table);
        Ok(self)
    }

    fn slot(&mut self, account: Account) -> &mut Option<LabeledTable> {
        match account {
            Account::F => &mut self.f,
            Account::FY => &mut self.f_y,
            Account::S => &mut self.s,
            Account::SY => &mut self.s_y,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn unit(&self) -> &UnitTable {
        &self.unit
    }

    pub fn account(&self, account: Account) -> Option<&LabeledTable> {
        match account {
            Account::F => self.f.as_ref(),
            Account::FY => self.f_y.as_ref(),
            Account::S => self.s.as_ref(),
            Account::SY => self.s_y.as_ref(),
        }
    }

    pub fn f(&self) -> Option<&LabeledTable> {
        self.f.as_ref()
    }

    pub fn f_y(&self) -> Option<&LabeledTable> {
        self.f_y.as_ref()
    }

    pub fn s(&self) -> Option<&LabeledTable> {
        self.s.as_ref()
    }

    pub fn s_y(&self) -> Option<&LabeledTable> {
        self.s_y.as_ref()
    }

    pub fn has_account(&self, account: Account) -> bool {
        self.account(account).is_some()
    }

    /// Present tables in `F`, `F_Y`, `S`, `S_Y` order.
    pub fn accounts(&self) -> impl Iterator<Item = (Account, &LabeledTable)> {
        Account::ALL
            .into_iter()
            .filter_map(|account| self.account(account).map(|table| (account, table)))
    }

    pub fn rows(&self) -> &Axis {
        self.unit.rows()
    }

    pub fn row_level_names(&self) -> &[String] {
        self.unit.rows().names()
    }

    /// `F`, or `S` when flows are absent.
    pub fn primary(&self) -> Option<(Account, &LabeledTable)> {
        self.accounts()
            .find(|(account, _)| matches!(account, Account::F | Account::S))
    }

    /// Row level names followed by every column level name of the present
    /// tables, without duplicates.
    pub fn level_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.row_level_names().iter().map(String::as_str).collect();
        for (_, table) in self.accounts() {
            for name in table.columns().names() {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
        }
        names
    }

    /// Distinct labels of column level `level` across the industry tables.
    pub fn column_labels(&self, level: &str) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for (account, table) in self.accounts() {
            if account.is_final_demand() {
                continue;
            }
            for label in table.columns().unique_level_values(level).unwrap_or_default() {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }
        labels
    }

    /// Check `spec` against the units, regions and sectors of this extension.
    pub fn validate(&self, spec: &BridgeSpec, options: &ValidationOptions) -> ValidationReport {
        let regions = self.column_labels(&options.region_level);
        let sectors = self.column_labels(&options.sector_level);
        validate(spec, &self.unit, &regions, &sectors, options)
    }

    /// Parse `bridge` against this extension and convert.
    pub fn convert_with_table(
        &self,
        bridge: &DataFrame,
        name: &str,
        options: &ExtensionConvertOptions,
    ) -> Result<ConversionOutcome> {
        let spec = BridgeSpec::parse(bridge, &self.level_names(), &options.bridge)?;
        self.convert(&spec, name, options)
    }

    /// Convert every table of the extension with one bridge table.
    ///
    /// The returned unit table takes the declared target units. With
    /// `enforce_units`, unit findings in the report stop the conversion and
    /// the outcome carries no extension.
    pub fn convert(
        &self,
        spec: &BridgeSpec,
        name: &str,
        options: &ExtensionConvertOptions,
    ) -> Result<ConversionOutcome> {
        let report = self.validate(spec, &options.validation);
        if options.enforce_units && report.has_unit_errors() {
            warn!(extension = %self.name, "conversion refused: bridge table declares incompatible units");
            return Ok(ConversionOutcome {
                report,
                extension: None,
            });
        }
        let extension = self.apply_spec(spec, name, &options.convert)?;
        Ok(ConversionOutcome {
            report,
            extension: Some(extension),
        })
    }

    /// Characterize with a table of characterization factors.
    pub fn characterize(&self, factors: &DataFrame, options: &CharacterizeOptions) -> Result<ConversionOutcome> {
        let first_level = self.first_row_level()?;
        let config = options.bridge_config(first_level);
        let spec = BridgeSpec::parse(factors, &self.level_names(), &config)?;
        self.characterize_with(&spec, options)
    }

    pub(crate) fn characterize_with(
        &self,
        spec: &BridgeSpec,
        options: &CharacterizeOptions,
    ) -> Result<ConversionOutcome> {
        let report = self.validate(spec, &options.validation);
        if options.only_validation {
            return Ok(ConversionOutcome {
                report,
                extension: None,
            });
        }
        if report.has_unit_errors() {
            warn!(extension = %self.name, "characterization refused: unit errors in factors");
            return Ok(ConversionOutcome {
                report,
                extension: None,
            });
        }
        let name = options.result_name(&self.name);
        let extension = self.apply_spec(spec, &name, &ConvertOptions::default())?;
        Ok(ConversionOutcome {
            report,
            extension: Some(extension),
        })
    }

    pub(crate) fn first_row_level(&self) -> Result<&str> {
        self.row_level_names()
            .first()
            .map(String::as_str)
            .ok_or_else(|| ExtensionError::MissingAccount {
                extension: self.name.clone(),
            })
    }

    /// Apply `spec` to every table, keying all results on the rows of the
    /// converted primary table.
    fn apply_spec(&self, spec: &BridgeSpec, name: &str, options: &ConvertOptions) -> Result<Extension> {
        let (primary_account, primary) = self.primary().ok_or_else(|| ExtensionError::MissingAccount {
            extension: self.name.clone(),
        })?;
        let first = apply(primary, spec, options)?;
        let keyed = options
            .clone()
            .with_row_order(RowOrder::Explicit(first.table.rows().entries().to_vec()));

        let rows = first.table.rows().len();
        let mut out = Extension::new(name, first.units).with_account(primary_account, first.table)?;
        for (account, table) in self.accounts() {
            if account == primary_account {
                continue;
            }
            let converted = apply(table, spec, &keyed)?;
            out = out.with_account(account, converted.table)?;
        }

        info!(
            source = %self.name,
            result = name,
            rows,
            accounts = out.accounts().count(),
            "converted extension"
        );
        Ok(out)
    }
}
