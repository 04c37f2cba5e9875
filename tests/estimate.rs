use approx::assert_abs_diff_eq;
use evtariff::{
    CostBreakdown,
    Estimator,
    Parameters,
    RateCatalog,
    RateSchedule,
    TariffError,
    core::{Location, Period, Season, SessionDistribution, SessionProfile, Site},
    quantity::{energy::KilowattHours, power::Kilowatts},
    tariff::{
        merced::MercedParameters,
        modesto::ModestoParameters,
        pge::{PgeParameters, SubscriptionTier},
    },
};

fn profile(distribution: &str) -> SessionProfile {
    SessionProfile::builder()
        .n_sessions(1000)
        .kwh_per_session(KilowattHours::from(100.0))
        .distribution(distribution.parse().unwrap())
        .actual_max_simultaneous(10)
        .build()
}

fn merced() -> Parameters {
    MercedParameters::builder().profile(profile("on_peak=1.0")).build().into()
}

fn modesto(season: Season) -> Parameters {
    ModestoParameters::builder()
        .profile(profile("on_peak=0.3,partial_peak=0.3,off_peak=0.4"))
        .season(season)
        .build()
        .into()
}

fn pge() -> Parameters {
    PgeParameters::builder()
        .profile(profile("peak=0.2,off_peak=0.3,super_off_peak=0.5"))
        .predefined_max_simultaneous(10)
        .subscription(SubscriptionTier::Bev1)
        .build()
        .into()
}

#[test]
fn merced_summer() {
    let catalog = RateCatalog::default();
    let estimator = Estimator::builder().catalog(&catalog).build();
    let (schedule, breakdown) = estimator.calculate_cost("Merced", &merced()).unwrap();
    assert_eq!(schedule.location(), Location::Merced);
    let CostBreakdown::Merced(breakdown) = breakdown else {
        panic!("expected a Merced breakdown");
    };
    assert_abs_diff_eq!(breakdown.total_energy.0, 100_000.0);
    assert_abs_diff_eq!(breakdown.max_demand.0, 1500.0);
    assert_abs_diff_eq!(breakdown.energy_cost.0, 6780.0, epsilon = 1e-6);
    assert_abs_diff_eq!(breakdown.demand_charge.0, 42_000.0, epsilon = 1e-6);
    assert_abs_diff_eq!(breakdown.mandated_charge.0, 2628.455, epsilon = 1e-6);
    assert_abs_diff_eq!(breakdown.total_cost.0, 51_758.455, epsilon = 1e-6);
}

#[test]
fn modesto_summer_and_winter() {
    let catalog = RateCatalog::default();
    let estimator = Estimator::builder().catalog(&catalog).build();

    let breakdown = estimator.calculate(&modesto(Season::Summer)).unwrap();
    assert_abs_diff_eq!(breakdown.energy_cost().0, 10_655.1, epsilon = 1e-6);
    assert_abs_diff_eq!(breakdown.total_cost().0, 39_902.1, epsilon = 1e-6);

    let CostBreakdown::Modesto(breakdown) = estimator.calculate(&modesto(Season::Winter)).unwrap()
    else {
        panic!("expected a Modesto breakdown");
    };
    assert_abs_diff_eq!(breakdown.energy_cost.0, 5984.1, epsilon = 1e-6);
    assert_eq!(breakdown.ignored_periods, vec![Period::PartialPeak]);
}

#[test]
fn pge_bev_1() {
    let catalog = RateCatalog::default();
    let estimator = Estimator::builder().catalog(&catalog).build();
    let (schedule, breakdown) = estimator.calculate_cost("PG&E", &pge()).unwrap();
    assert_eq!(schedule, RateSchedule::Pge(&catalog.pge));
    let CostBreakdown::Pge(breakdown) = breakdown else {
        panic!("expected a PG&E breakdown");
    };
    assert_eq!(breakdown.n_blocks, 150);
    assert_abs_diff_eq!(breakdown.subscribed_max_demand.0, 1500.0);
    assert_abs_diff_eq!(breakdown.energy_cost.0, 23_346.2, epsilon = 1e-6);
    assert_abs_diff_eq!(breakdown.subscription_charge.0, 1861.5, epsilon = 1e-6);
    assert_eq!(breakdown.overage_fee.0.to_bits(), 0.0_f64.to_bits());
    assert_abs_diff_eq!(breakdown.total_cost.0, 25_207.7, epsilon = 1e-6);
}

#[test]
fn repeated_estimates_are_identical() {
    let catalog = RateCatalog::default();
    let estimator = Estimator::builder().catalog(&catalog).build();
    for parameters in [merced(), modesto(Season::Summer), pge()] {
        assert_eq!(estimator.calculate(&parameters), estimator.calculate(&parameters));
    }
}

#[test]
fn errors() {
    let catalog = RateCatalog::default();
    let estimator = Estimator::builder().catalog(&catalog).build();

    assert_eq!(
        estimator.calculate_cost("Fresno", &merced()).unwrap_err(),
        TariffError::UnsupportedLocation("Fresno".to_owned()),
    );
    assert_eq!(
        "pg&e=1.0".parse::<SessionDistribution>().unwrap_err(),
        TariffError::UnknownPeriod("pg&e".to_owned()),
    );
    assert_eq!(
        "BEV-3".parse::<SubscriptionTier>().unwrap_err(),
        TariffError::UnsupportedSubscriptionType("BEV-3".to_owned()),
    );

    let without_super_off_peak: Parameters = PgeParameters::builder()
        .profile(profile("peak=0.5,off_peak=0.5"))
        .predefined_max_simultaneous(10)
        .build()
        .into();
    assert_eq!(
        estimator.calculate(&without_super_off_peak).unwrap_err(),
        TariffError::MissingDistributionKey(Period::SuperOffPeak),
    );
}

#[test]
fn invalid_inputs_are_rejected() {
    let catalog = RateCatalog::default();

    let site = Site::builder().charger_power(Kilowatts::from(-150.0)).build();
    let estimator = Estimator::builder().catalog(&catalog).site(site).build();
    assert_eq!(
        estimator.calculate(&merced()).unwrap_err(),
        TariffError::InvalidParameter { field: "charger_power", value: -150.0 },
    );

    let estimator = Estimator::builder().catalog(&catalog).build();
    let nan_energy: Parameters = MercedParameters::builder()
        .profile(SessionProfile {
            kwh_per_session: KilowattHours::from(f64::NAN),
            ..profile("on_peak=1.0")
        })
        .build()
        .into();
    assert!(matches!(
        estimator.calculate(&nan_energy),
        Err(TariffError::InvalidParameter { field: "kwh_per_session", .. })
    ));
}

#[test]
fn worst_case_uses_installed_chargers() {
    let catalog = RateCatalog::default();
    let parameters: Parameters = MercedParameters::builder()
        .profile(SessionProfile { worst_case: true, ..profile("on_peak=1.0") })
        .build()
        .into();

    let estimator = Estimator::builder().catalog(&catalog).build();
    assert_eq!(estimator.calculate(&parameters).unwrap_err(), TariffError::UnknownInstalledChargers);

    let site = Site::builder().n_installed_chargers(20).build();
    let estimator = Estimator::builder().catalog(&catalog).site(site).build();
    let CostBreakdown::Merced(breakdown) = estimator.calculate(&parameters).unwrap() else {
        panic!("expected a Merced breakdown");
    };
    assert_abs_diff_eq!(breakdown.max_demand.0, 3000.0);
    assert_abs_diff_eq!(breakdown.demand_charge.0, 84_000.0, epsilon = 1e-6);
}
