//! Configuration form: the "Basic Information" values of the simulated pump.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PumpSimError, ValidationError};

/// Kind of pump being simulated.
///
/// `Unset` is the placeholder option of the type selector; it is a valid
/// in-memory value but can never be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum PumpType {
    Unset = 0,
    Wired = 1,
    #[default]
    Wireless = 2,
}

impl PumpType {
    pub const ALL: [Self; 3] = [Self::Unset, Self::Wired, Self::Wireless];

    /// Numeric code used by selectors and translation keys (`BASIC.FORM.TYPES.<code>`).
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn is_set(self) -> bool {
        !matches!(self, Self::Unset)
    }
}

impl TryFrom<u8> for PumpType {
    type Error = ValidationError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Unset),
            1 => Ok(Self::Wired),
            2 => Ok(Self::Wireless),
            other => Err(ValidationError::InvalidPumpType(other)),
        }
    }
}

impl From<PumpType> for u8 {
    fn from(value: PumpType) -> Self {
        value.code()
    }
}

/// Battery percentage reported by the pump. Only quarter steps exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BatteryThreshold {
    Quarter,
    Half,
    ThreeQuarters,
    #[default]
    Full,
}

impl BatteryThreshold {
    pub const ALL: [Self; 4] = [Self::Quarter, Self::Half, Self::ThreeQuarters, Self::Full];

    #[must_use]
    pub fn percent(self) -> u16 {
        match self {
            Self::Quarter => 25,
            Self::Half => 50,
            Self::ThreeQuarters => 75,
            Self::Full => 100,
        }
    }
}

impl TryFrom<u16> for BatteryThreshold {
    type Error = ValidationError;

    fn try_from(percent: u16) -> Result<Self, Self::Error> {
        match percent {
            25 => Ok(Self::Quarter),
            50 => Ok(Self::Half),
            75 => Ok(Self::ThreeQuarters),
            100 => Ok(Self::Full),
            other => Err(ValidationError::InvalidBatteryThreshold(other)),
        }
    }
}

impl From<BatteryThreshold> for u16 {
    fn from(value: BatteryThreshold) -> Self {
        value.percent()
    }
}

impl std::fmt::Display for BatteryThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Insulin reservoir level in units, always within `0..=300`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "u16")]
pub struct ReservoirLevel(u16);

impl ReservoirLevel {
    pub const MIN: u16 = 0;
    pub const MAX: u16 = 300;

    /// Build a level, clamping `units` into `0..=300`.
    #[must_use]
    pub fn clamped(units: i64) -> Self {
        let clamped = units.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        // The clamp above guarantees the value fits.
        Self(u16::try_from(clamped).unwrap_or(Self::MAX))
    }

    #[must_use]
    pub fn units(self) -> u16 {
        self.0
    }
}

impl Default for ReservoirLevel {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

impl From<i64> for ReservoirLevel {
    fn from(units: i64) -> Self {
        Self::clamped(units)
    }
}

impl From<ReservoirLevel> for u16 {
    fn from(value: ReservoirLevel) -> Self {
        value.0
    }
}

/// The editable values of the "Basic Information" card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigurationForm {
    pub name: String,
    #[serde(rename = "type")]
    pub pump_type: PumpType,
    #[serde(rename = "reservoir")]
    pub reservoir_level: ReservoirLevel,
    #[serde(rename = "battery")]
    pub battery_threshold: BatteryThreshold,
}

impl ConfigurationForm {
    /// Create a builder for constructing a [`ConfigurationForm`].
    #[must_use]
    pub fn builder() -> ConfigurationFormBuilder {
        ConfigurationFormBuilder::default()
    }

    /// Check the invariants required for submission.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::Validation`] when the pump type is still `Unset`.
    pub fn validate(&self) -> Result<(), PumpSimError> {
        if !self.pump_type.is_set() {
            return Err(ValidationError::UnsetPumpType.into());
        }
        Ok(())
    }

    /// Apply a single field update in place.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Name(name) => self.name = name,
            FieldUpdate::PumpType(pump_type) => self.pump_type = pump_type,
            FieldUpdate::ReservoirLevel(level) => self.reservoir_level = level,
            FieldUpdate::BatteryThreshold(threshold) => self.battery_threshold = threshold,
        }
    }
}

/// Step-by-step builder for [`ConfigurationForm`]. Unset values keep their defaults.
#[derive(Debug, Default)]
pub struct ConfigurationFormBuilder {
    form: ConfigurationForm,
}

impl ConfigurationFormBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.form.name = name.into();
        self
    }

    #[must_use]
    pub fn pump_type(mut self, pump_type: PumpType) -> Self {
        self.form.pump_type = pump_type;
        self
    }

    #[must_use]
    pub fn reservoir_level(mut self, units: i64) -> Self {
        self.form.reservoir_level = ReservoirLevel::clamped(units);
        self
    }

    #[must_use]
    pub fn battery_threshold(mut self, threshold: BatteryThreshold) -> Self {
        self.form.battery_threshold = threshold;
        self
    }

    /// Consume the builder, validate, and return a submittable form.
    ///
    /// # Errors
    ///
    /// Returns [`PumpSimError::Validation`] if the pump type is `Unset`.
    pub fn build(self) -> Result<ConfigurationForm, PumpSimError> {
        self.form.validate()?;
        Ok(self.form)
    }
}

/// Addressable field of [`ConfigurationForm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    #[serde(rename = "type")]
    PumpType,
    #[serde(rename = "reservoir")]
    ReservoirLevel,
    #[serde(rename = "battery")]
    BatteryThreshold,
}

impl FormField {
    /// Key used in HTML forms and JSON bodies.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PumpType => "type",
            Self::ReservoirLevel => "reservoir",
            Self::BatteryThreshold => "battery",
        }
    }
}

impl FromStr for FormField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "type" | "pump_type" => Ok(Self::PumpType),
            "reservoir" | "reservoir_level" => Ok(Self::ReservoirLevel),
            "battery" | "battery_threshold" => Ok(Self::BatteryThreshold),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A typed new value for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    Name(String),
    PumpType(PumpType),
    ReservoirLevel(ReservoirLevel),
    BatteryThreshold(BatteryThreshold),
}

impl FieldUpdate {
    /// Parse a display string coming from the presentation layer.
    ///
    /// Battery values accept an optional trailing `%`; reservoir values are
    /// clamped rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for unknown fields or values that do not
    /// parse for the targeted field.
    pub fn parse(field: &str, raw: &str) -> Result<Self, ValidationError> {
        let field = field.parse::<FormField>()?;
        let raw = raw.trim();
        let invalid = || ValidationError::InvalidFieldValue {
            field: field.key(),
            value: raw.to_string(),
        };

        match field {
            FormField::Name => Ok(Self::Name(raw.to_string())),
            FormField::PumpType => {
                let code = raw.parse::<u8>().map_err(|_| invalid())?;
                Ok(Self::PumpType(PumpType::try_from(code)?))
            }
            FormField::ReservoirLevel => {
                let units = raw.parse::<i64>().map_err(|_| invalid())?;
                Ok(Self::ReservoirLevel(ReservoirLevel::clamped(units)))
            }
            FormField::BatteryThreshold => {
                let percent = raw
                    .strip_suffix('%')
                    .unwrap_or(raw)
                    .parse::<u16>()
                    .map_err(|_| invalid())?;
                Ok(Self::BatteryThreshold(BatteryThreshold::try_from(percent)?))
            }
        }
    }

    #[must_use]
    pub fn field(&self) -> FormField {
        match self {
            Self::Name(_) => FormField::Name,
            Self::PumpType(_) => FormField::PumpType,
            Self::ReservoirLevel(_) => FormField::ReservoirLevel,
            Self::BatteryThreshold(_) => FormField::BatteryThreshold,
        }
    }
}
