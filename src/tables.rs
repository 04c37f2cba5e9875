use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use evtariff::{
    CostBreakdown,
    RateSchedule,
    core::Period,
    quantity::{cost::Cost, rate::KilowattHourRate},
};
use itertools::{Itertools, MinMaxResult};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

fn cost_cell(cost: Cost) -> Cell {
    Cell::new(cost.round_to_cents()).set_alignment(CellAlignment::Right)
}

#[must_use]
pub fn build_breakdown_table(breakdown: &CostBreakdown) -> Table {
    let mut table = new_table();
    table.set_header(vec![Cell::new(breakdown.plan_name()).add_attribute(Attribute::Bold), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Total energy"),
        Cell::new(breakdown.total_energy()).set_alignment(CellAlignment::Right),
    ]);
    match breakdown {
        CostBreakdown::Modesto(breakdown) => {
            table.add_row(vec![
                Cell::new("Maximum demand"),
                Cell::new(breakdown.max_demand).set_alignment(CellAlignment::Right),
            ]);
            if !breakdown.ignored_periods.is_empty() {
                table.add_row(vec![
                    Cell::new("Unpriced periods").add_attribute(Attribute::Dim),
                    Cell::new(breakdown.ignored_periods.iter().join(", "))
                        .set_alignment(CellAlignment::Right)
                        .fg(Color::DarkYellow),
                ]);
            }
        }
        CostBreakdown::Merced(breakdown) => {
            table.add_row(vec![
                Cell::new("Maximum demand"),
                Cell::new(breakdown.max_demand).set_alignment(CellAlignment::Right),
            ]);
            table.add_row(vec![
                Cell::new("Mandated charge rate"),
                Cell::new(breakdown.parameters.mandated_charge_percent)
                    .set_alignment(CellAlignment::Right),
            ]);
        }
        CostBreakdown::Pge(breakdown) => {
            table.add_row(vec![
                Cell::new("Subscribed blocks"),
                Cell::new(breakdown.n_blocks).set_alignment(CellAlignment::Right),
            ]);
            table.add_row(vec![
                Cell::new("Subscribed demand"),
                Cell::new(breakdown.subscribed_max_demand).set_alignment(CellAlignment::Right),
            ]);
            table.add_row(vec![
                Cell::new("Actual demand"),
                Cell::new(breakdown.actual_max_demand).set_alignment(CellAlignment::Right).fg(
                    if breakdown.actual_max_demand > breakdown.subscribed_max_demand {
                        Color::Red
                    } else {
                        Color::Green
                    },
                ),
            ]);
        }
    }
    for (name, cost) in breakdown.line_items() {
        table.add_row(vec![Cell::new(name), cost_cell(cost)]);
    }
    table.add_row(vec![
        Cell::new("Total cost").add_attribute(Attribute::Bold),
        cost_cell(breakdown.total_cost()).add_attribute(Attribute::Bold),
    ]);
    table
}

fn rate_cell(rate: Option<KilowattHourRate>) -> Cell {
    rate.map_or_else(
        || Cell::new("-").set_alignment(CellAlignment::Center),
        |rate| Cell::new(rate).set_alignment(CellAlignment::Right),
    )
}

#[must_use]
pub fn build_schedule_table(schedule: RateSchedule<'_>) -> Table {
    let mut table = new_table();
    match schedule {
        RateSchedule::Merced(rates) => {
            table.set_header(vec!["Merced", "Customer charge", "Demand charge", "Energy charge"]);
            for (season, plan) in rates.iter() {
                table.add_row(vec![
                    Cell::new(season),
                    Cell::new(plan.customer_charge),
                    Cell::new(plan.demand_charge_per_kw),
                    Cell::new(plan.energy_charge_per_kwh),
                ]);
            }
        }
        RateSchedule::Modesto(rates) => {
            const PERIODS: [Period; 3] = [Period::OnPeak, Period::PartialPeak, Period::OffPeak];
            let mut header = vec![
                Cell::new("Modesto"),
                Cell::new("Fixed charge"),
                Cell::new("Demand charge"),
            ];
            header.extend(PERIODS.map(Cell::new));
            table.set_header(header);
            for (season, plan) in rates.iter() {
                let mut row = vec![
                    Cell::new(season),
                    Cell::new(plan.fixed_monthly_charge),
                    Cell::new(plan.demand_charge_per_kw),
                ];
                row.extend(
                    PERIODS.map(|period| rate_cell(plan.energy_charge.get(&period).copied())),
                );
                table.add_row(row);
            }
        }
        RateSchedule::Pge(tiers) => {
            table.set_header(vec![
                "PG&E",
                "Block",
                "Per block",
                "Peak",
                "Off peak",
                "Super off peak",
                "Overage fee",
            ]);
            for (tier, plan) in tiers.iter() {
                let mut row = vec![
                    Cell::new(tier),
                    Cell::new(plan.block_size),
                    Cell::new(plan.subscription_charge_per_block),
                ];
                row.extend(plan.energy_charge.by_period().map(|(_, rate)| rate_cell(Some(rate))));
                row.push(Cell::new(plan.overage_fee_per_kw));
                table.add_row(row);
            }
        }
    }
    table
}

/// Cheapest plan in green, the most expensive one in red.
#[must_use]
pub fn build_comparison_table(breakdowns: &[CostBreakdown]) -> Table {
    let (cheapest, priciest) =
        match breakdowns.iter().map(|breakdown| breakdown.total_cost().0).minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => (f64::NAN, f64::NAN),
            MinMaxResult::OneElement(total) => (total, total),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

    let mut table = new_table();
    table.set_header(vec!["Plan", "Energy", "Energy cost", "Other charges", "Total"]);
    for breakdown in breakdowns {
        let total = breakdown.total_cost();
        let color = if total.0 == cheapest {
            Color::Green
        } else if total.0 == priciest {
            Color::Red
        } else {
            Color::Reset
        };
        table.add_row(vec![
            Cell::new(breakdown.plan_name()),
            Cell::new(breakdown.total_energy()).set_alignment(CellAlignment::Right),
            cost_cell(breakdown.energy_cost()),
            cost_cell(total - breakdown.energy_cost()),
            cost_cell(total).fg(color),
        ]);
    }
    table
}
