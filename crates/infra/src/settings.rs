//! Per-business store preferences: receipt header, tax, theme.

use serde::{Deserialize, Serialize};

use ticketpos_core::{BusinessId, DomainError, DomainResult, Money};

use crate::error::ServiceError;
use crate::store::{BusinessStore, InMemoryBusinessStore};

/// Details printed on receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            name: "Mi Tienda".to_string(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
        }
    }
}

/// Tax rate in basis points (`2100` = 21%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    pub const MAX: TaxRate = TaxRate(10_000);

    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    pub const fn basis_points(self) -> u32 {
        self.0
    }

    /// Parse a percentage such as `"21"` or `"10.5"` (at most two decimals).
    pub fn parse(percent: &str) -> DomainResult<Self> {
        let scaled = Money::parse(percent)
            .map_err(|_| DomainError::validation(format!("invalid tax rate: {percent:?}")))?;
        let basis_points = u32::try_from(scaled.cents())
            .map_err(|_| DomainError::validation(format!("tax rate out of range: {percent}")))?;
        Ok(Self(basis_points))
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        Self(2_100)
    }
}

impl core::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}%", Money::from_cents(u64::from(self.0)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSettings {
    pub enabled: bool,
    pub rate: TaxRate,
}

impl TaxSettings {
    /// Tax owed on `subtotal`; zero while tax is disabled.
    pub fn tax_for(&self, subtotal: Money) -> DomainResult<Money> {
        if !self.enabled {
            return Ok(Money::ZERO);
        }
        subtotal
            .checked_percent(self.rate.basis_points())
            .ok_or_else(DomainError::amount_overflow)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub tax: TaxSettings,
    pub theme: Theme,
}

impl Settings {
    pub fn validate(&self) -> DomainResult<()> {
        if self.store.name.trim().is_empty() {
            return Err(DomainError::validation("store name must not be empty"));
        }
        let email = self.store.email.trim();
        if !email.is_empty() && !email.contains('@') {
            return Err(DomainError::validation(format!("invalid store email: {email}")));
        }
        if self.tax.rate > TaxRate::MAX {
            return Err(DomainError::validation(format!(
                "tax rate must be between 0% and 100%, got {}",
                self.tax.rate
            )));
        }
        Ok(())
    }
}

/// Saved settings per business; unsaved businesses read the defaults.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore<S = InMemoryBusinessStore<(), Settings>> {
    store: S,
}

impl InMemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S> InMemorySettingsStore<S>
where
    S: BusinessStore<(), Settings>,
{
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self, business_id: BusinessId) -> Result<Settings, ServiceError> {
        Ok(self.store.get(business_id, &())?.unwrap_or_default())
    }

    pub fn save(&self, business_id: BusinessId, settings: Settings) -> Result<(), ServiceError> {
        settings.validate()?;
        self.store.upsert(business_id, (), settings)?;
        tracing::info!(business_id = %business_id, "settings saved");
        Ok(())
    }

    /// Flip light/dark and persist; returns the new theme.
    pub fn toggle_theme(&self, business_id: BusinessId) -> Result<Theme, ServiceError> {
        let mut settings = self.load(business_id)?;
        settings.theme = settings.theme.toggle();
        let theme = settings.theme;
        self.store.upsert(business_id, (), settings)?;
        Ok(theme)
    }
}
