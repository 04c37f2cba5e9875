use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    core::Location,
    error::TariffError,
    prelude::*,
    tariff::{merced::MercedRates, modesto::ModestoRates, pge::SubscriptionTiers},
};

/// All the rate plans, loaded once and never changed afterwards.
///
/// [`Default`] holds the published rates. A TOML file with the same layout replaces them:
///
/// ```toml
/// [merced.summer]
/// customer_charge = 350.0
/// demand_charge_per_kw = 28.0
/// energy_charge_per_kwh = 0.0678
///
/// [modesto.winter]
/// fixed_monthly_charge = 192.0
/// demand_charge_per_kw = 19.37
/// energy_charge = { on_peak = 0.09851, off_peak = 0.07572 }
///
/// [pge.BEV-1]
/// subscription_charge_per_block = 12.41
/// block_size = 10
/// energy_charge = { peak = 0.4004, off_peak = 0.20839, super_off_peak = 0.18173 }
/// overage_fee_per_kw = 2.48
/// ```
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateCatalog {
    pub merced: MercedRates,
    pub modesto: ModestoRates,
    pub pge: SubscriptionTiers,
}

impl RateCatalog {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read the rate catalog from `{}`", path.display()))?;
        let catalog = Self::from_toml_str(&text)?;
        info!("loaded the rate catalog");
        Ok(catalog)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let catalog: Self = toml::from_str(text).context("failed to parse the rate catalog")?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check that every rate and charge is non-negative and every block is non-empty.
    pub fn validate(&self) -> Result<(), TariffError> {
        for (season, plan) in self.merced.iter() {
            plan.validate(&format!("Merced {season}"))?;
        }
        for (season, plan) in self.modesto.iter() {
            plan.validate(&format!("Modesto {season}"))?;
        }
        for (tier, plan) in self.pge.iter() {
            plan.validate(&format!("PG&E {tier}"))?;
        }
        Ok(())
    }

    /// Rate schedule of the utility that bills the location.
    pub const fn schedule(&self, location: Location) -> RateSchedule<'_> {
        match location {
            Location::Modesto => RateSchedule::Modesto(&self.modesto),
            Location::Merced => RateSchedule::Merced(&self.merced),
            Location::Pge => RateSchedule::Pge(&self.pge),
        }
    }
}

/// Every plan of a single utility, handed back next to the breakdown for display.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RateSchedule<'a> {
    Modesto(&'a ModestoRates),
    Merced(&'a MercedRates),
    Pge(&'a SubscriptionTiers),
}

impl RateSchedule<'_> {
    #[must_use]
    pub const fn location(self) -> Location {
        match self {
            Self::Modesto(_) => Location::Modesto,
            Self::Merced(_) => Location::Merced,
            Self::Pge(_) => Location::Pge,
        }
    }
}
