use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::{Period, SessionDistribution},
    error::TariffError,
    quantity::{Quantity, energy::KilowattHours, power::Kilowatts},
};

/// Charging site hardware.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Builder)]
pub struct Site {
    /// Rated power of every installed charger.
    #[builder(default = Site::DEFAULT_CHARGER_POWER)]
    pub charger_power: Kilowatts,

    /// Total number of installed chargers, only needed for the worst case.
    pub n_installed_chargers: Option<u32>,
}

impl Site {
    pub const DEFAULT_CHARGER_POWER: Kilowatts = Quantity(150.0);

    pub fn validate(&self) -> Result<(), TariffError> {
        ensure_positive("charger_power", self.charger_power.0)?;
        if let Some(n_installed_chargers) = self.n_installed_chargers {
            ensure_positive("n_installed_chargers", f64::from(n_installed_chargers))?;
        }
        Ok(())
    }
}

/// Counts and amounts must be finite and greater than zero.
pub(crate) fn ensure_positive(field: &'static str, value: f64) -> Result<(), TariffError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TariffError::InvalidParameter { field, value })
    }
}

impl Default for Site {
    fn default() -> Self {
        Self { charger_power: Self::DEFAULT_CHARGER_POWER, n_installed_chargers: None }
    }
}

/// Monthly charging activity, shared by all the tariffs.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct SessionProfile {
    /// Number of charging sessions per month.
    pub n_sessions: u32,

    /// Energy delivered per session.
    pub kwh_per_session: KilowattHours,

    pub distribution: SessionDistribution,

    /// Actual maximum number of cars charging at once.
    pub actual_max_simultaneous: u32,

    /// Assume all installed chargers run at once instead of the actual maximum.
    #[builder(default)]
    pub worst_case: bool,
}

impl SessionProfile {
    pub fn validate(&self) -> Result<(), TariffError> {
        ensure_positive("n_sessions", f64::from(self.n_sessions))?;
        ensure_positive("kwh_per_session", self.kwh_per_session.0)?;
        ensure_positive("actual_max_simultaneous", f64::from(self.actual_max_simultaneous))
    }

    #[must_use]
    pub fn total_energy(&self) -> KilowattHours {
        self.kwh_per_session * f64::from(self.n_sessions)
    }

    /// Monthly energy per time-of-use period, for every period in the distribution.
    pub fn energy_by_period(&self) -> impl Iterator<Item = (Period, KilowattHours)> + '_ {
        self.distribution.split(self.total_energy())
    }

    /// Number of chargers assumed to run at the same time.
    pub fn n_simultaneous(&self, site: &Site) -> Result<u32, TariffError> {
        if self.worst_case {
            site.n_installed_chargers.ok_or(TariffError::UnknownInstalledChargers)
        } else {
            Ok(self.actual_max_simultaneous)
        }
    }

    /// Peak power drawn by the site during the month.
    pub fn max_demand(&self, site: &Site) -> Result<Kilowatts, TariffError> {
        Ok(site.charger_power * f64::from(self.n_simultaneous(site)?))
    }
}
