use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{
    core::{Period, SessionDistribution},
    error::TariffError,
};

/// Utility whose tariff bills the charging site.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Location {
    /// Modesto Irrigation District: fixed charge, time-of-use energy, and demand charge.
    Modesto,

    /// City of Merced: customer charge, flat energy rate, demand charge, and a mandated surcharge.
    Merced,

    /// PG&E business EV rates: subscribed kW blocks, time-of-use energy, and overage fees.
    #[serde(rename = "PG&E")]
    Pge,
}

impl Location {
    pub const ALL: [Self; 3] = [Self::Modesto, Self::Merced, Self::Pge];

    /// Session split used when the caller does not provide one.
    #[must_use]
    pub fn default_distribution(self) -> SessionDistribution {
        let fractions: &[(Period, f64)] = match self {
            Self::Modesto => {
                &[(Period::OnPeak, 0.3), (Period::PartialPeak, 0.3), (Period::OffPeak, 0.4)]
            }
            Self::Merced => &[(Period::OnPeak, 1.0)],
            Self::Pge => &[(Period::Peak, 0.2), (Period::OffPeak, 0.5), (Period::SuperOffPeak, 0.3)],
        };
        SessionDistribution::from_trusted(fractions.iter().copied())
    }

    /// Human-readable explanation of the parameters the tariff takes.
    #[must_use]
    pub const fn notes(self) -> &'static str {
        match self {
            Self::Modesto => {
                "Monthly cost = fixed charge + time-of-use energy charge + demand charge.\n\
                 Sessions split across on-peak, partial-peak (summer only), and off-peak periods; \
                 periods the season does not price are left out of the energy charge.\n\
                 Demand is the maximum number of simultaneously charging cars times the charger \
                 power, or every installed charger in the worst case."
            }
            Self::Merced => {
                "Monthly cost = customer charge + energy charge + demand charge + mandated charge.\n\
                 The energy rate is flat, so the session split does not change the energy charge.\n\
                 The mandated charge is a percentage of the other three.\n\
                 Demand is the maximum number of simultaneously charging cars times the charger \
                 power, or every installed charger in the worst case."
            }
            Self::Pge => {
                "Monthly cost = energy charge + subscription charge + overage fee.\n\
                 Sessions must be split across peak, off-peak, and super off-peak periods.\n\
                 The subscription buys enough whole kW blocks to cover the predefined number of \
                 simultaneously charging cars; actual demand above the subscription is billed as \
                 an overage fee.\n\
                 The worst case assumes every installed charger runs at once, which may cause a \
                 high overage fee."
            }
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Modesto => "Modesto",
            Self::Merced => "Merced",
            Self::Pge => "PG&E",
        })
    }
}

impl FromStr for Location {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "modesto" => Ok(Self::Modesto),
            "merced" => Ok(Self::Merced),
            "pg&e" | "pge" => Ok(Self::Pge),
            _ => Err(TariffError::UnsupportedLocation(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("PG&E".parse::<Location>(), Ok(Location::Pge));
        assert_eq!("Merced".parse::<Location>(), Ok(Location::Merced));
        assert_eq!("modesto".parse::<Location>(), Ok(Location::Modesto));
        assert_eq!(" pge ".parse::<Location>(), Ok(Location::Pge));
    }

    #[test]
    fn test_unsupported_location() {
        assert_eq!(
            "Fresno".parse::<Location>(),
            Err(TariffError::UnsupportedLocation("Fresno".to_owned()))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for location in Location::ALL {
            assert_eq!(location.to_string().parse::<Location>(), Ok(location));
        }
    }
}
