use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use evtariff::{
    Parameters,
    core::{Location, Season, SessionDistribution, SessionProfile, Site},
    quantity::{energy::KilowattHours, percent::Percent, power::Kilowatts},
    tariff::{
        merced::MercedParameters,
        modesto::ModestoParameters,
        pge::{PgeParameters, SubscriptionTier},
    },
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// TOML file that replaces the built-in rate catalog.
    #[clap(long = "rates", env = "RATES_PATH")]
    pub rates_path: Option<PathBuf>,

    #[clap(flatten)]
    pub site: SiteArgs,

    #[clap(long, value_enum, default_value = "table", env = "OUTPUT_FORMAT")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables.
    Table,

    /// Everything, including the echoed parameters, as JSON.
    Json,
}

#[derive(Copy, Clone, Parser)]
pub struct SiteArgs {
    /// Rated power of every installed charger.
    #[clap(
        long = "charger-power-kilowatts",
        default_value = "150",
        env = "CHARGER_POWER_KILOWATTS"
    )]
    pub charger_power: Kilowatts,

    /// Total number of installed chargers, required by `--worst-case`.
    #[clap(
        long = "installed-chargers",
        env = "INSTALLED_CHARGERS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub n_installed_chargers: Option<u32>,
}

impl From<SiteArgs> for Site {
    fn from(args: SiteArgs) -> Self {
        Self::builder()
            .charger_power(args.charger_power)
            .maybe_n_installed_chargers(args.n_installed_chargers)
            .build()
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Estimate the monthly cost at a single location.
    #[clap(name = "estimate")]
    Estimate(Box<EstimateArgs>),

    /// Estimate the same charging activity at every location and subscription.
    #[clap(name = "compare")]
    Compare(Box<CompareArgs>),

    /// Show the rate schedules.
    #[clap(name = "rates")]
    Rates(RatesArgs),
}

#[derive(Parser)]
pub struct EstimateArgs {
    #[command(subcommand)]
    pub tariff: TariffCommand,
}

#[derive(Subcommand)]
pub enum TariffCommand {
    /// City of Merced.
    Merced(MercedArgs),

    /// Modesto Irrigation District.
    Modesto(ModestoArgs),

    /// PG&E business EV rates.
    #[clap(name = "pge", alias = "PG&E")]
    Pge(PgeArgs),
}

impl TariffCommand {
    pub fn parameters(&self) -> Parameters {
        match self {
            Self::Merced(args) => args.parameters().into(),
            Self::Modesto(args) => args.parameters().into(),
            Self::Pge(args) => args.parameters().into(),
        }
    }
}

#[derive(Parser)]
pub struct ProfileArgs {
    /// Number of charging sessions per month.
    #[clap(
        long = "sessions",
        default_value = "1000",
        env = "SESSIONS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub n_sessions: u32,

    /// Energy purchased per session.
    #[clap(long, default_value = "100", env = "KWH_PER_SESSION")]
    pub kwh_per_session: KilowattHours,

    /// Actual maximum number of cars charging at once.
    #[clap(
        long = "max-simultaneous",
        default_value = "10",
        env = "MAX_SIMULTANEOUS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub actual_max_simultaneous: u32,

    /// Assume that all the installed chargers run at once.
    #[clap(long, env = "WORST_CASE")]
    pub worst_case: bool,
}

impl ProfileArgs {
    pub fn profile(
        &self,
        distribution: Option<&SessionDistribution>,
        location: Location,
    ) -> SessionProfile {
        SessionProfile::builder()
            .n_sessions(self.n_sessions)
            .kwh_per_session(self.kwh_per_session)
            .distribution(
                distribution.cloned().unwrap_or_else(|| location.default_distribution()),
            )
            .actual_max_simultaneous(self.actual_max_simultaneous)
            .worst_case(self.worst_case)
            .build()
    }
}

#[derive(Parser)]
pub struct MercedArgs {
    #[clap(flatten)]
    pub profile: ProfileArgs,

    /// Session split across the periods, for example `on_peak=1.0`.
    #[clap(long, env = "MERCED_DISTRIBUTION")]
    pub distribution: Option<SessionDistribution>,

    #[clap(long, default_value = "summer", env = "SEASON")]
    pub season: Season,

    /// Mandated charge on top of the subtotal, 3.35–5.35 % in practice.
    #[clap(long, default_value = "5.35", env = "MANDATED_CHARGE_PERCENT")]
    pub mandated_charge_percent: Percent,
}

impl MercedArgs {
    pub fn parameters(&self) -> MercedParameters {
        MercedParameters::builder()
            .profile(self.profile.profile(self.distribution.as_ref(), Location::Merced))
            .season(self.season)
            .mandated_charge_percent(self.mandated_charge_percent)
            .build()
    }
}

#[derive(Parser)]
pub struct ModestoArgs {
    #[clap(flatten)]
    pub profile: ProfileArgs,

    /// Session split across the periods, for example
    /// `on_peak=0.3,partial_peak=0.3,off_peak=0.4`.
    #[clap(long, env = "MODESTO_DISTRIBUTION")]
    pub distribution: Option<SessionDistribution>,

    #[clap(long, default_value = "summer", env = "SEASON")]
    pub season: Season,
}

impl ModestoArgs {
    pub fn parameters(&self) -> ModestoParameters {
        ModestoParameters::builder()
            .profile(self.profile.profile(self.distribution.as_ref(), Location::Modesto))
            .season(self.season)
            .build()
    }
}

#[derive(Parser)]
pub struct PgeArgs {
    #[clap(flatten)]
    pub profile: ProfileArgs,

    /// Session split across the periods, for example
    /// `peak=0.2,off_peak=0.5,super_off_peak=0.3`.
    #[clap(long, env = "PGE_DISTRIBUTION")]
    pub distribution: Option<SessionDistribution>,

    /// Number of cars expected to charge at once, sizes the subscription.
    #[clap(
        long = "predefined-max-simultaneous",
        default_value = "10",
        env = "PREDEFINED_MAX_SIMULTANEOUS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub predefined_max_simultaneous: u32,

    /// `BEV-2-S`, `BEV-1`, or `BEV-2-P`.
    #[clap(long, default_value = "BEV-2-S", env = "SUBSCRIPTION")]
    pub subscription: SubscriptionTier,
}

impl PgeArgs {
    pub fn parameters(&self) -> PgeParameters {
        PgeParameters::builder()
            .profile(self.profile.profile(self.distribution.as_ref(), Location::Pge))
            .predefined_max_simultaneous(self.predefined_max_simultaneous)
            .subscription(self.subscription)
            .build()
    }
}

#[derive(Parser)]
pub struct CompareArgs {
    #[clap(flatten)]
    pub profile: ProfileArgs,

    #[clap(long, default_value = "summer", env = "SEASON")]
    pub season: Season,

    #[clap(long, default_value = "5.35", env = "MANDATED_CHARGE_PERCENT")]
    pub mandated_charge_percent: Percent,

    #[clap(
        long = "predefined-max-simultaneous",
        default_value = "10",
        env = "PREDEFINED_MAX_SIMULTANEOUS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub predefined_max_simultaneous: u32,

    #[clap(long, env = "MERCED_DISTRIBUTION")]
    pub merced_distribution: Option<SessionDistribution>,

    #[clap(long, env = "MODESTO_DISTRIBUTION")]
    pub modesto_distribution: Option<SessionDistribution>,

    #[clap(long, env = "PGE_DISTRIBUTION")]
    pub pge_distribution: Option<SessionDistribution>,
}

impl CompareArgs {
    /// Parameters of every location, and of every PG&E subscription.
    pub fn parameters(&self) -> Vec<Parameters> {
        let mut parameters: Vec<Parameters> = vec![
            MercedParameters::builder()
                .profile(
                    self.profile.profile(self.merced_distribution.as_ref(), Location::Merced),
                )
                .season(self.season)
                .mandated_charge_percent(self.mandated_charge_percent)
                .build()
                .into(),
            ModestoParameters::builder()
                .profile(
                    self.profile.profile(self.modesto_distribution.as_ref(), Location::Modesto),
                )
                .season(self.season)
                .build()
                .into(),
        ];
        let pge_profile = self.profile.profile(self.pge_distribution.as_ref(), Location::Pge);
        parameters.extend(SubscriptionTier::ALL.into_iter().map(|subscription| {
            PgeParameters::builder()
                .profile(pge_profile.clone())
                .predefined_max_simultaneous(self.predefined_max_simultaneous)
                .subscription(subscription)
                .build()
                .into()
        }));
        parameters
    }
}

#[derive(Parser)]
pub struct RatesArgs {
    /// `Modesto`, `Merced`, or `PG&E`, all of them when omitted.
    pub location: Option<Location>,
}
