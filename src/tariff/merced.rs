use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::{Season, SessionProfile, Site},
    error::TariffError,
    prelude::*,
    quantity::{
        Quantity,
        cost::Cost,
        energy::KilowattHours,
        percent::Percent,
        power::Kilowatts,
        rate::{KilowattHourRate, KilowattRate},
    },
    tariff::{SeasonalRates, ensure_rate},
};

/// City of Merced rate plan for one season: a single energy rate for every period.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlatDemandPlan {
    /// Monthly customer charge.
    pub customer_charge: Cost,

    pub demand_charge_per_kw: KilowattRate,
    pub energy_charge_per_kwh: KilowattHourRate,
}

impl FlatDemandPlan {
    pub(crate) fn validate(&self, plan: &str) -> Result<(), TariffError> {
        ensure_rate(plan, "customer_charge", self.customer_charge.0)?;
        ensure_rate(plan, "demand_charge_per_kw", self.demand_charge_per_kw.0)?;
        ensure_rate(plan, "energy_charge_per_kwh", self.energy_charge_per_kwh.0)
    }
}

pub type MercedRates = SeasonalRates<FlatDemandPlan>;

impl Default for MercedRates {
    fn default() -> Self {
        Self {
            summer: FlatDemandPlan {
                customer_charge: Quantity(350.00),
                demand_charge_per_kw: Quantity(28.00),
                energy_charge_per_kwh: Quantity(0.06780),
            },
            winter: FlatDemandPlan {
                customer_charge: Quantity(350.00),
                demand_charge_per_kw: Quantity(10.00),
                energy_charge_per_kwh: Quantity(0.06780),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct MercedParameters {
    #[serde(flatten)]
    pub profile: SessionProfile,

    #[builder(default)]
    pub season: Season,

    /// Regulatory surcharge on the subtotal.
    #[builder(default = MercedParameters::DEFAULT_MANDATED_CHARGE)]
    pub mandated_charge_percent: Percent,
}

impl MercedParameters {
    pub const DEFAULT_MANDATED_CHARGE: Percent = Percent(5.35);
}

impl MercedParameters {
    pub fn validate(&self) -> Result<(), TariffError> {
        self.profile.validate()?;
        let percent = self.mandated_charge_percent.0;
        if percent.is_finite() && percent >= 0.0 {
            Ok(())
        } else {
            Err(TariffError::InvalidParameter { field: "mandated_charge_percent", value: percent })
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MercedBreakdown {
    #[serde(flatten)]
    pub parameters: MercedParameters,

    pub total_energy: KilowattHours,
    pub max_demand: Kilowatts,
    pub customer_charge: Cost,
    pub energy_cost: Cost,
    pub demand_charge: Cost,
    pub mandated_charge: Cost,
    pub total_cost: Cost,
}

impl MercedBreakdown {
    #[must_use]
    pub const fn line_items(&self) -> [(&'static str, Cost); 4] {
        [
            ("Customer charge", self.customer_charge),
            ("Energy cost", self.energy_cost),
            ("Demand charge", self.demand_charge),
            ("Mandated charge", self.mandated_charge),
        ]
    }
}

/// Customer, energy, and demand charges, plus the mandated percentage on top of them.
#[instrument(skip_all, fields(season = %parameters.season))]
pub fn calculate(
    rates: &MercedRates,
    site: &Site,
    parameters: &MercedParameters,
) -> Result<MercedBreakdown, TariffError> {
    site.validate()?;
    parameters.validate()?;
    let plan = rates.get(parameters.season);
    let profile = &parameters.profile;

    let total_energy = profile.total_energy();
    let max_demand = profile.max_demand(site)?;

    // Flat rate, the period only matters for the logs:
    let energy_cost = profile
        .energy_by_period()
        .map(|(period, energy)| {
            debug!(%period, %energy, "energy");
            energy * plan.energy_charge_per_kwh
        })
        .sum::<Cost>();
    let demand_charge = max_demand * plan.demand_charge_per_kw;
    let subtotal = plan.customer_charge + energy_cost + demand_charge;
    let mandated_charge = subtotal * parameters.mandated_charge_percent.to_proportion();
    let total_cost = subtotal + mandated_charge;
    info!(%max_demand, %energy_cost, %demand_charge, %total_cost, "calculated");

    Ok(MercedBreakdown {
        parameters: parameters.clone(),
        total_energy,
        max_demand,
        customer_charge: plan.customer_charge,
        energy_cost,
        demand_charge,
        mandated_charge,
        total_cost,
    })
}
