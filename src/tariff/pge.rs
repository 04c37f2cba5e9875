use std::{
    fmt::{Display, Formatter},
    str::FromStr,
};

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::{
    core::{Period, SessionProfile, Site, ensure_positive},
    error::TariffError,
    prelude::*,
    quantity::{
        Quantity,
        cost::Cost,
        energy::KilowattHours,
        power::Kilowatts,
        rate::{KilowattHourRate, KilowattRate},
    },
    tariff::ensure_rate,
};

/// PG&E business electric vehicle rate.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SubscriptionTier {
    /// Secondary voltage, 50 kW blocks.
    #[default]
    #[serde(rename = "BEV-2-S")]
    Bev2S,

    /// Up to 100 kW, 10 kW blocks.
    #[serde(rename = "BEV-1")]
    Bev1,

    /// Primary voltage, 50 kW blocks.
    #[serde(rename = "BEV-2-P")]
    Bev2P,
}

impl SubscriptionTier {
    pub const ALL: [Self; 3] = [Self::Bev2S, Self::Bev1, Self::Bev2P];
}

impl Display for SubscriptionTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Bev2S => "BEV-2-S",
            Self::Bev1 => "BEV-1",
            Self::Bev2P => "BEV-2-P",
        })
    }
}

impl FromStr for SubscriptionTier {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BEV-2-S" => Ok(Self::Bev2S),
            "BEV-1" => Ok(Self::Bev1),
            "BEV-2-P" => Ok(Self::Bev2P),
            other => Err(TariffError::UnsupportedSubscriptionType(other.to_owned())),
        }
    }
}

/// Energy rates of the three subscription periods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockEnergyCharge {
    pub peak: KilowattHourRate,
    pub off_peak: KilowattHourRate,
    pub super_off_peak: KilowattHourRate,
}

impl BlockEnergyCharge {
    #[must_use]
    pub const fn by_period(&self) -> [(Period, KilowattHourRate); 3] {
        [
            (Period::Peak, self.peak),
            (Period::OffPeak, self.off_peak),
            (Period::SuperOffPeak, self.super_off_peak),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockSubscriptionPlan {
    pub subscription_charge_per_block: Cost,

    /// Capacity of a single subscription block.
    pub block_size: Kilowatts,

    pub energy_charge: BlockEnergyCharge,

    /// Fee for every kilowatt of actual demand above the subscribed demand.
    pub overage_fee_per_kw: KilowattRate,
}

impl BlockSubscriptionPlan {
    pub(crate) fn validate(&self, plan: &str) -> Result<(), TariffError> {
        ensure_rate(plan, "subscription_charge_per_block", self.subscription_charge_per_block.0)?;
        ensure_rate(plan, "block_size", self.block_size.0)?;
        if self.block_size.0 == 0.0 {
            return Err(TariffError::InvalidRate {
                plan: plan.to_owned(),
                field: "block_size",
                value: self.block_size.0,
            });
        }
        for (_, rate) in self.energy_charge.by_period() {
            ensure_rate(plan, "energy_charge", rate.0)?;
        }
        ensure_rate(plan, "overage_fee_per_kw", self.overage_fee_per_kw.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubscriptionTiers {
    #[serde(rename = "BEV-2-S")]
    pub bev_2_s: BlockSubscriptionPlan,

    #[serde(rename = "BEV-1")]
    pub bev_1: BlockSubscriptionPlan,

    #[serde(rename = "BEV-2-P")]
    pub bev_2_p: BlockSubscriptionPlan,
}

impl SubscriptionTiers {
    #[must_use]
    pub const fn get(&self, tier: SubscriptionTier) -> &BlockSubscriptionPlan {
        match tier {
            SubscriptionTier::Bev2S => &self.bev_2_s,
            SubscriptionTier::Bev1 => &self.bev_1,
            SubscriptionTier::Bev2P => &self.bev_2_p,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SubscriptionTier, &BlockSubscriptionPlan)> {
        SubscriptionTier::ALL.into_iter().map(|tier| (tier, self.get(tier)))
    }
}

impl Default for SubscriptionTiers {
    fn default() -> Self {
        Self {
            bev_2_s: BlockSubscriptionPlan {
                subscription_charge_per_block: Quantity(95.56),
                block_size: Quantity(50.0),
                energy_charge: BlockEnergyCharge {
                    peak: Quantity(0.41522),
                    off_peak: Quantity(0.20199),
                    super_off_peak: Quantity(0.17872),
                },
                overage_fee_per_kw: Quantity(3.82),
            },
            bev_1: BlockSubscriptionPlan {
                subscription_charge_per_block: Quantity(12.41),
                block_size: Quantity(10.0),
                energy_charge: BlockEnergyCharge {
                    peak: Quantity(0.40040),
                    off_peak: Quantity(0.20839),
                    super_off_peak: Quantity(0.18173),
                },
                overage_fee_per_kw: Quantity(2.48),
            },
            bev_2_p: BlockSubscriptionPlan {
                subscription_charge_per_block: Quantity(85.98),
                block_size: Quantity(50.0),
                energy_charge: BlockEnergyCharge {
                    peak: Quantity(0.40635),
                    off_peak: Quantity(0.19747),
                    super_off_peak: Quantity(0.17481),
                },
                overage_fee_per_kw: Quantity(3.44),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct PgeParameters {
    #[serde(flatten)]
    pub profile: SessionProfile,

    /// Number of cars expected to charge at once, used to size the subscription.
    pub predefined_max_simultaneous: u32,

    #[builder(default)]
    pub subscription: SubscriptionTier,
}

impl PgeParameters {
    pub fn validate(&self) -> Result<(), TariffError> {
        self.profile.validate()?;
        ensure_positive("predefined_max_simultaneous", f64::from(self.predefined_max_simultaneous))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PgeBreakdown {
    #[serde(flatten)]
    pub parameters: PgeParameters,

    pub total_energy: KilowattHours,
    pub n_blocks: u32,
    pub subscribed_max_demand: Kilowatts,
    pub actual_max_demand: Kilowatts,
    pub energy_cost: Cost,
    pub subscription_charge: Cost,
    pub overage_fee: Cost,
    pub total_cost: Cost,
}

impl PgeBreakdown {
    #[must_use]
    pub const fn line_items(&self) -> [(&'static str, Cost); 3] {
        [
            ("Energy cost", self.energy_cost),
            ("Subscription charge", self.subscription_charge),
            ("Overage fee", self.overage_fee),
        ]
    }
}

/// Time-of-use energy charge, subscription blocks, and the overage fee.
///
/// Every predefined simultaneous charger reserves as many whole blocks as fit into the charger
/// power. Actual demand above the reservation costs the overage fee, demand below it is not
/// refunded.
#[instrument(skip_all, fields(subscription = %parameters.subscription))]
pub fn calculate(
    tiers: &SubscriptionTiers,
    site: &Site,
    parameters: &PgeParameters,
) -> Result<PgeBreakdown, TariffError> {
    site.validate()?;
    parameters.validate()?;
    let profile = &parameters.profile;
    let total_energy = profile.total_energy();

    let plan = tiers.get(parameters.subscription);
    let mut energy_cost = Cost::ZERO;
    for (period, rate) in plan.energy_charge.by_period() {
        let energy = total_energy * profile.distribution.fraction(period)?;
        debug!(%period, %energy, %rate, "energy");
        energy_cost += energy * rate;
    }

    let n_blocks = parameters
        .predefined_max_simultaneous
        .saturating_mul(site.charger_power.whole_blocks_of(plan.block_size));
    let subscribed_max_demand = plan.block_size * f64::from(n_blocks);
    let actual_max_demand = profile.max_demand(site)?;

    let subscription_charge = plan.subscription_charge_per_block * f64::from(n_blocks);
    let overage = (actual_max_demand - subscribed_max_demand).max(Kilowatts::ZERO);
    let overage_fee = overage * plan.overage_fee_per_kw;
    if overage > Kilowatts::ZERO {
        warn!(%actual_max_demand, %subscribed_max_demand, "actual demand exceeds the subscription");
    }

    let total_cost = energy_cost + subscription_charge + overage_fee;
    info!(n_blocks, %energy_cost, %subscription_charge, %overage_fee, %total_cost, "calculated");

    Ok(PgeBreakdown {
        parameters: parameters.clone(),
        total_energy,
        n_blocks,
        subscribed_max_demand,
        actual_max_demand,
        energy_cost,
        subscription_charge,
        overage_fee,
        total_cost,
    })
}
