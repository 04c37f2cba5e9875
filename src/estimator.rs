use bon::Builder;
use serde::Serialize;

use crate::{
    catalog::{RateCatalog, RateSchedule},
    core::{Location, Site},
    error::TariffError,
    prelude::*,
    quantity::{cost::Cost, energy::KilowattHours},
    tariff::{
        merced::{self, MercedBreakdown, MercedParameters},
        modesto::{self, ModestoBreakdown, ModestoParameters},
        pge::{self, PgeBreakdown, PgeParameters},
    },
};

/// Parameters of a single tariff: the variant decides which utility bills them.
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::From)]
#[serde(untagged)]
pub enum Parameters {
    Modesto(ModestoParameters),
    Merced(MercedParameters),
    Pge(PgeParameters),
}

impl Parameters {
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Modesto(_) => Location::Modesto,
            Self::Merced(_) => Location::Merced,
            Self::Pge(_) => Location::Pge,
        }
    }
}

/// Input parameters echoed together with every line item and the total.
#[derive(Clone, Debug, PartialEq, Serialize, derive_more::From)]
#[serde(tag = "location")]
pub enum CostBreakdown {
    Modesto(ModestoBreakdown),
    Merced(MercedBreakdown),

    #[serde(rename = "PG&E")]
    Pge(PgeBreakdown),
}

impl CostBreakdown {
    #[must_use]
    pub const fn location(&self) -> Location {
        match self {
            Self::Modesto(_) => Location::Modesto,
            Self::Merced(_) => Location::Merced,
            Self::Pge(_) => Location::Pge,
        }
    }

    /// Location together with the season or the subscription, for example `PG&E BEV-1`.
    #[must_use]
    pub fn plan_name(&self) -> String {
        match self {
            Self::Modesto(breakdown) => format!("Modesto {}", breakdown.parameters.season),
            Self::Merced(breakdown) => format!("Merced {}", breakdown.parameters.season),
            Self::Pge(breakdown) => format!("PG&E {}", breakdown.parameters.subscription),
        }
    }

    #[must_use]
    pub const fn total_energy(&self) -> KilowattHours {
        match self {
            Self::Modesto(breakdown) => breakdown.total_energy,
            Self::Merced(breakdown) => breakdown.total_energy,
            Self::Pge(breakdown) => breakdown.total_energy,
        }
    }

    #[must_use]
    pub const fn total_cost(&self) -> Cost {
        match self {
            Self::Modesto(breakdown) => breakdown.total_cost,
            Self::Merced(breakdown) => breakdown.total_cost,
            Self::Pge(breakdown) => breakdown.total_cost,
        }
    }

    #[must_use]
    pub const fn energy_cost(&self) -> Cost {
        match self {
            Self::Modesto(breakdown) => breakdown.energy_cost,
            Self::Merced(breakdown) => breakdown.energy_cost,
            Self::Pge(breakdown) => breakdown.energy_cost,
        }
    }

    /// Named costs that add up to the total.
    #[must_use]
    pub fn line_items(&self) -> Vec<(&'static str, Cost)> {
        match self {
            Self::Modesto(breakdown) => breakdown.line_items().to_vec(),
            Self::Merced(breakdown) => breakdown.line_items().to_vec(),
            Self::Pge(breakdown) => breakdown.line_items().to_vec(),
        }
    }
}

/// Dispatches the parameters to the tariff of the selected location.
#[derive(Builder)]
pub struct Estimator<'a> {
    catalog: &'a RateCatalog,

    #[builder(default)]
    site: Site,
}

impl<'a> Estimator<'a> {
    /// Select the tariff by the location name and calculate the monthly cost.
    ///
    /// Returns the rate schedule of the location next to the breakdown.
    pub fn calculate_cost(
        &self,
        location: &str,
        parameters: &Parameters,
    ) -> Result<(RateSchedule<'a>, CostBreakdown), TariffError> {
        self.calculate_at(location.parse()?, parameters)
    }

    #[instrument(skip_all, fields(%location))]
    pub fn calculate_at(
        &self,
        location: Location,
        parameters: &Parameters,
    ) -> Result<(RateSchedule<'a>, CostBreakdown), TariffError> {
        let breakdown: CostBreakdown = match (location, parameters) {
            (Location::Modesto, Parameters::Modesto(parameters)) => {
                modesto::calculate(&self.catalog.modesto, &self.site, parameters)?.into()
            }
            (Location::Merced, Parameters::Merced(parameters)) => {
                merced::calculate(&self.catalog.merced, &self.site, parameters)?.into()
            }
            (Location::Pge, Parameters::Pge(parameters)) => {
                pge::calculate(&self.catalog.pge, &self.site, parameters)?.into()
            }
            (location, parameters) => {
                return Err(TariffError::LocationMismatch {
                    location,
                    parameters: parameters.location(),
                });
            }
        };
        Ok((self.catalog.schedule(location), breakdown))
    }

    /// Calculate the cost at the location the parameters belong to.
    pub fn calculate(&self, parameters: &Parameters) -> Result<CostBreakdown, TariffError> {
        let (_, breakdown) = self.calculate_at(parameters.location(), parameters)?;
        Ok(breakdown)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::{
        core::{Period, Season, SessionDistribution, SessionProfile},
        tariff::pge::SubscriptionTier,
    };

    fn profile(distribution: &[(Period, f64)]) -> SessionProfile {
        SessionProfile::builder()
            .n_sessions(1000)
            .kwh_per_session(KilowattHours::from(100.0))
            .distribution(SessionDistribution::from_trusted(distribution.iter().copied()))
            .actual_max_simultaneous(10)
            .build()
    }

    fn modesto() -> Parameters {
        ModestoParameters::builder()
            .profile(profile(&[
                (Period::OnPeak, 0.3),
                (Period::PartialPeak, 0.3),
                (Period::OffPeak, 0.4),
            ]))
            .build()
            .into()
    }

    fn pge() -> Parameters {
        PgeParameters::builder()
            .profile(profile(&[
                (Period::Peak, 0.2),
                (Period::OffPeak, 0.3),
                (Period::SuperOffPeak, 0.5),
            ]))
            .predefined_max_simultaneous(10)
            .subscription(SubscriptionTier::Bev1)
            .build()
            .into()
    }

    #[test]
    fn test_dispatch_by_name() {
        let catalog = RateCatalog::default();
        let estimator = Estimator::builder().catalog(&catalog).build();

        let (schedule, breakdown) = estimator.calculate_cost("Modesto", &modesto()).unwrap();
        assert_eq!(schedule, RateSchedule::Modesto(&catalog.modesto));
        assert_eq!(breakdown.location(), Location::Modesto);
        assert_abs_diff_eq!(breakdown.total_cost().0, 39_902.1, epsilon = 1e-6);

        let (schedule, breakdown) = estimator.calculate_cost("PG&E", &pge()).unwrap();
        assert_eq!(schedule, RateSchedule::Pge(&catalog.pge));
        assert_eq!(breakdown.plan_name(), "PG&E BEV-1");
        assert_abs_diff_eq!(breakdown.total_cost().0, 25_207.7, epsilon = 1e-6);
    }

    #[test]
    fn test_unsupported_location() {
        let catalog = RateCatalog::default();
        let estimator = Estimator::builder().catalog(&catalog).build();
        assert_eq!(
            estimator.calculate_cost("Sacramento", &modesto()),
            Err(TariffError::UnsupportedLocation("Sacramento".to_owned()))
        );
    }

    #[test]
    fn test_location_mismatch() {
        let catalog = RateCatalog::default();
        let estimator = Estimator::builder().catalog(&catalog).build();
        assert_eq!(
            estimator.calculate_cost("Merced", &pge()),
            Err(TariffError::LocationMismatch {
                location: Location::Merced,
                parameters: Location::Pge,
            })
        );
    }

    #[test]
    fn test_line_items_add_up() {
        let catalog = RateCatalog::default();
        let site = Site::builder().n_installed_chargers(16).build();
        let estimator = Estimator::builder().catalog(&catalog).site(site).build();
        let merced = MercedParameters::builder()
            .profile(profile(&[(Period::OnPeak, 1.0)]))
            .season(Season::Winter)
            .build();
        for parameters in [modesto(), pge(), merced.into()] {
            let breakdown = estimator.calculate(&parameters).unwrap();
            let sum: f64 = breakdown.line_items().iter().map(|(_, cost)| cost.0).sum();
            assert_abs_diff_eq!(breakdown.total_cost().0, sum, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_serialized_breakdown_echoes_parameters() {
        let catalog = RateCatalog::default();
        let estimator = Estimator::builder().catalog(&catalog).build();
        let breakdown = estimator.calculate(&pge()).unwrap();
        let json = serde_json::to_value(&breakdown).unwrap();
        assert_eq!(json["location"], "PG&E");
        assert_eq!(json["subscription"], "BEV-1");
        assert_eq!(json["n_sessions"], 1000);
        assert_eq!(json["predefined_max_simultaneous"], 10);
        assert_eq!(json["distribution"]["super_off_peak"], 0.5);
        assert_eq!(json["n_blocks"], 150);
    }
}
