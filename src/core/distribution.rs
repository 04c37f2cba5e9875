use std::{
    collections::BTreeMap,
    fmt::{Display, Formatter},
    str::FromStr,
};

use enumset::EnumSet;
use itertools::Itertools;
use serde::Serialize;

use crate::{core::Period, error::TariffError, prelude::*, quantity::energy::KilowattHours};

/// Share of the monthly sessions that fall into each time-of-use period.
///
/// Every fraction is within `[0, 1]`. The fractions are not required to add up to one:
/// a distribution that does not is used as given, with a warning.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SessionDistribution(BTreeMap<Period, f64>);

impl SessionDistribution {
    const SUM_TOLERANCE: f64 = 1e-9;

    pub fn try_from_fractions(
        fractions: impl IntoIterator<Item = (Period, f64)>,
    ) -> Result<Self, TariffError> {
        let mut inner = BTreeMap::new();
        for (period, fraction) in fractions {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(TariffError::InvalidFraction { period, fraction });
            }
            if inner.insert(period, fraction).is_some() {
                return Err(TariffError::DuplicatePeriod(period));
            }
        }
        let this = Self(inner);
        let total = this.total_fraction();
        if (total - 1.0).abs() > Self::SUM_TOLERANCE {
            warn!(total, "session fractions do not add up to one, using them as is");
        }
        Ok(this)
    }

    /// Build from fractions known to be within `[0, 1]`.
    pub(crate) fn from_trusted(fractions: impl IntoIterator<Item = (Period, f64)>) -> Self {
        Self(fractions.into_iter().collect())
    }

    #[must_use]
    pub fn get(&self, period: Period) -> Option<f64> {
        self.0.get(&period).copied()
    }

    /// Fraction of the period, which the tariff requires to be present.
    pub fn fraction(&self, period: Period) -> Result<f64, TariffError> {
        self.get(period).ok_or(TariffError::MissingDistributionKey(period))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.0.iter().map(|(period, fraction)| (*period, *fraction))
    }

    #[must_use]
    pub fn periods(&self) -> EnumSet<Period> {
        self.0.keys().copied().collect()
    }

    #[must_use]
    pub fn total_fraction(&self) -> f64 {
        self.0.values().sum()
    }

    /// Split the total energy across the periods.
    pub fn split(
        &self,
        total: KilowattHours,
    ) -> impl Iterator<Item = (Period, KilowattHours)> + '_ {
        self.iter().map(move |(period, fraction)| (period, total * fraction))
    }
}

impl Display for SessionDistribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let entries = self.iter().map(|(period, fraction)| format!("{period}={fraction}")).join(",");
        f.write_str(&entries)
    }
}

/// Parse `period=fraction` pairs separated by commas, for example `peak=0.2,off_peak=0.8`.
impl FromStr for SessionDistribution {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fractions: Vec<(Period, f64)> = s
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let (period, fraction) = entry
                    .split_once('=')
                    .ok_or_else(|| TariffError::MalformedDistribution(entry.to_owned()))?;
                let fraction = fraction
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| TariffError::MalformedDistribution(entry.to_owned()))?;
                Ok((period.parse::<Period>()?, fraction))
            })
            .collect::<Result<_, TariffError>>()?;
        Self::try_from_fractions(fractions)
    }
}
