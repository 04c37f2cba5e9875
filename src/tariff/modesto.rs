use std::collections::BTreeMap;

use bon::Builder;
use enumset::EnumSet;
use serde::{Deserialize, Serialize};

use crate::{
    core::{Period, Season, SessionProfile, Site},
    error::TariffError,
    prelude::*,
    quantity::{
        Quantity,
        cost::Cost,
        energy::KilowattHours,
        power::Kilowatts,
        rate::{KilowattHourRate, KilowattRate},
    },
    tariff::{SeasonalRates, ensure_rate},
};

/// Modesto Irrigation District rate plan for one season.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TouDemandPlan {
    pub fixed_monthly_charge: Cost,
    pub demand_charge_per_kw: KilowattRate,

    /// Energy rate of every period the season prices.
    pub energy_charge: BTreeMap<Period, KilowattHourRate>,
}

impl TouDemandPlan {
    #[must_use]
    pub fn periods(&self) -> EnumSet<Period> {
        self.energy_charge.keys().copied().collect()
    }

    pub(crate) fn validate(&self, plan: &str) -> Result<(), TariffError> {
        ensure_rate(plan, "fixed_monthly_charge", self.fixed_monthly_charge.0)?;
        ensure_rate(plan, "demand_charge_per_kw", self.demand_charge_per_kw.0)?;
        self.energy_charge
            .values()
            .try_for_each(|rate| ensure_rate(plan, "energy_charge", rate.0))
    }
}

pub type ModestoRates = SeasonalRates<TouDemandPlan>;

impl Default for ModestoRates {
    fn default() -> Self {
        Self {
            summer: TouDemandPlan {
                fixed_monthly_charge: Quantity(192.00),
                demand_charge_per_kw: Quantity(19.37),
                energy_charge: BTreeMap::from([
                    (Period::OnPeak, Quantity(0.14252)),
                    (Period::PartialPeak, Quantity(0.11169)),
                    (Period::OffPeak, Quantity(0.07572)),
                ]),
            },
            winter: TouDemandPlan {
                fixed_monthly_charge: Quantity(192.00),
                demand_charge_per_kw: Quantity(19.37),
                energy_charge: BTreeMap::from([
                    (Period::OnPeak, Quantity(0.09851)),
                    (Period::OffPeak, Quantity(0.07572)),
                ]),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct ModestoParameters {
    #[serde(flatten)]
    pub profile: SessionProfile,

    #[builder(default)]
    pub season: Season,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModestoBreakdown {
    #[serde(flatten)]
    pub parameters: ModestoParameters,

    pub total_energy: KilowattHours,
    pub max_demand: Kilowatts,
    pub fixed_monthly_charge: Cost,
    pub energy_cost: Cost,
    pub demand_charge: Cost,
    pub total_cost: Cost,

    /// Distribution periods that the season does not price, left out of the energy cost.
    pub ignored_periods: Vec<Period>,
}

impl ModestoBreakdown {
    #[must_use]
    pub const fn line_items(&self) -> [(&'static str, Cost); 3] {
        [
            ("Fixed monthly charge", self.fixed_monthly_charge),
            ("Energy cost", self.energy_cost),
            ("Demand charge", self.demand_charge),
        ]
    }
}

/// Fixed charge, time-of-use energy charge, and demand charge.
///
/// Sessions in a period the season has no rate for (`partial_peak` in winter, for example)
/// are silently left out of the energy cost. They are listed in
/// [`ModestoBreakdown::ignored_periods`].
#[instrument(skip_all, fields(season = %parameters.season))]
pub fn calculate(
    rates: &ModestoRates,
    site: &Site,
    parameters: &ModestoParameters,
) -> Result<ModestoBreakdown, TariffError> {
    site.validate()?;
    parameters.profile.validate()?;
    let plan = rates.get(parameters.season);
    let profile = &parameters.profile;

    let total_energy = profile.total_energy();
    let max_demand = profile.max_demand(site)?;

    let energy_cost = profile
        .energy_by_period()
        .filter_map(|(period, energy)| {
            let rate = plan.energy_charge.get(&period)?;
            debug!(%period, %energy, %rate, "energy");
            Some(energy * *rate)
        })
        .sum::<Cost>();
    let ignored_periods = profile.distribution.periods() - plan.periods();
    if !ignored_periods.is_empty() {
        debug!(?ignored_periods, "the season does not price these periods, ignoring");
    }
    let demand_charge = max_demand * plan.demand_charge_per_kw;
    let total_cost = plan.fixed_monthly_charge + energy_cost + demand_charge;
    info!(%max_demand, %energy_cost, %demand_charge, %total_cost, "calculated");

    Ok(ModestoBreakdown {
        parameters: parameters.clone(),
        total_energy,
        max_demand,
        fixed_monthly_charge: plan.fixed_monthly_charge,
        energy_cost,
        demand_charge,
        total_cost,
        ignored_periods: ignored_periods.iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::core::SessionDistribution;

    fn parameters(season: Season) -> ModestoParameters {
        ModestoParameters::builder()
            .profile(
                SessionProfile::builder()
                    .n_sessions(1000)
                    .kwh_per_session(KilowattHours::from(100.0))
                    .distribution(SessionDistribution::from_trusted([
                        (Period::OnPeak, 0.3),
                        (Period::PartialPeak, 0.3),
                        (Period::OffPeak, 0.4),
                    ]))
                    .actual_max_simultaneous(10)
                    .build(),
            )
            .season(season)
            .build()
    }

    #[test]
    fn test_summer() {
        let breakdown =
            calculate(&ModestoRates::default(), &Site::default(), &parameters(Season::Summer))
                .unwrap();
        assert_abs_diff_eq!(breakdown.fixed_monthly_charge.0, 192.0);
        assert_abs_diff_eq!(breakdown.energy_cost.0, 10_655.1, epsilon = 1e-6);
        assert_abs_diff_eq!(breakdown.demand_charge.0, 29_055.0, epsilon = 1e-6);
        assert_abs_diff_eq!(breakdown.total_cost.0, 39_902.1, epsilon = 1e-6);
        assert!(breakdown.ignored_periods.is_empty());
    }

    #[test]
    fn test_winter_ignores_partial_peak() {
        let breakdown =
            calculate(&ModestoRates::default(), &Site::default(), &parameters(Season::Winter))
                .unwrap();
        // 30 000 × 0.09851 + 40 000 × 0.07572, the partial peak is not priced:
        assert_abs_diff_eq!(breakdown.energy_cost.0, 5984.1, epsilon = 1e-6);
        assert_eq!(breakdown.ignored_periods, [Period::PartialPeak]);
    }

    #[test]
    fn test_total_is_sum_of_line_items() {
        let breakdown =
            calculate(&ModestoRates::default(), &Site::default(), &parameters(Season::Summer))
                .unwrap();
        let sum: f64 = breakdown.line_items().iter().map(|(_, cost)| cost.0).sum();
        assert_abs_diff_eq!(breakdown.total_cost.0, sum, epsilon = 1e-9);
    }

    #[test]
    fn test_doubling_sessions_doubles_energy_cost() {
        let single = parameters(Season::Summer);
        let mut double = single.clone();
        double.profile.n_sessions *= 2;

        let single = calculate(&ModestoRates::default(), &Site::default(), &single).unwrap();
        let double = calculate(&ModestoRates::default(), &Site::default(), &double).unwrap();
        assert_abs_diff_eq!(double.total_energy.0, 2.0 * single.total_energy.0);
        assert_abs_diff_eq!(double.energy_cost.0, 2.0 * single.energy_cost.0, epsilon = 1e-6);
        assert_abs_diff_eq!(double.demand_charge.0, single.demand_charge.0);
        assert_abs_diff_eq!(double.fixed_monthly_charge.0, single.fixed_monthly_charge.0);
    }

    #[test]
    fn test_nan_energy_is_rejected() {
        let mut parameters = parameters(Season::Summer);
        parameters.profile.kwh_per_session = KilowattHours::from(f64::NAN);
        assert!(matches!(
            calculate(&ModestoRates::default(), &Site::default(), &parameters),
            Err(TariffError::InvalidParameter { field: "kwh_per_session", .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        let parameters = parameters(Season::Summer);
        let rates = ModestoRates::default();
        assert_eq!(
            calculate(&rates, &Site::default(), &parameters),
            calculate(&rates, &Site::default(), &parameters),
        );
    }
}
