//! Raw counts for one grouping key

use serde::Serialize;
use volley_core::{Action, AnalysisConfig, Event, Outcome, Provenance};
use volley_kpi::calculator::*;
use volley_kpi::{Kpi, KpiResult};
use volley_rally::{AdjacencyEstimate, RallyCounters};

/// Running totals per action/outcome for one (dimension, value)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AggregateBucket {
    pub events: u64,

    pub attack_attempts: u64,
    pub attack_kills: u64,
    /// error, out and net
    pub attack_errors: u64,
    pub attacks_blocked: u64,
    pub attacks_defended: u64,

    pub service_attempts: u64,
    pub service_aces: u64,
    pub service_good: u64,
    pub service_errors: u64,

    pub block_attempts: u64,
    pub block_kills: u64,
    pub block_touches: u64,
    pub block_no_kills: u64,
    pub block_no_touches: u64,
    pub block_errors: u64,

    pub reception_total: u64,
    pub reception_perfect: u64,
    pub reception_good: u64,
    pub reception_poor: u64,
    pub reception_errors: u64,

    pub dig_total: u64,
    pub dig_perfect: u64,
    pub dig_good: u64,
    pub dig_poor: u64,
    pub dig_errors: u64,

    pub set_total: u64,
    pub sets_exceptional: u64,
    pub sets_good: u64,
    pub sets_poor: u64,
    pub set_errors: u64,
    pub kills_from_sets: u64,

    pub serving_rallies: u64,
    pub serving_points_won: u64,
    pub receiving_rallies: u64,
    pub receiving_points_won: u64,

    /// Provenance of the event counts
    pub provenance: Provenance,
    /// Provenance of the rally counters
    pub rally_provenance: Provenance,
}

impl AggregateBucket {
    /// Count one event. `set_converted` marks a set whose next contact was
    /// an attack kill.
    pub fn record(&mut self, event: &Event, set_converted: bool) {
        self.events += 1;
        match event.action {
            Action::Attack => {
                self.attack_attempts += 1;
                match event.outcome {
                    Outcome::Kill => self.attack_kills += 1,
                    Outcome::Blocked => self.attacks_blocked += 1,
                    Outcome::Defended => self.attacks_defended += 1,
                    _ => self.attack_errors += 1,
                }
            }
            Action::Serve => {
                self.service_attempts += 1;
                match event.outcome {
                    Outcome::Ace => self.service_aces += 1,
                    Outcome::Good => self.service_good += 1,
                    _ => self.service_errors += 1,
                }
            }
            Action::Block => {
                self.block_attempts += 1;
                match event.outcome {
                    Outcome::Kill => self.block_kills += 1,
                    Outcome::Touch => self.block_touches += 1,
                    Outcome::BlockNoKill => self.block_no_kills += 1,
                    Outcome::NoTouch => self.block_no_touches += 1,
                    _ => self.block_errors += 1,
                }
            }
            Action::Receive => {
                self.reception_total += 1;
                match event.outcome {
                    Outcome::Perfect => self.reception_perfect += 1,
                    Outcome::Good => self.reception_good += 1,
                    Outcome::Poor => self.reception_poor += 1,
                    _ => self.reception_errors += 1,
                }
            }
            Action::Dig => {
                self.dig_total += 1;
                match event.outcome {
                    Outcome::Perfect => self.dig_perfect += 1,
                    Outcome::Good => self.dig_good += 1,
                    Outcome::Poor => self.dig_poor += 1,
                    _ => self.dig_errors += 1,
                }
            }
            Action::Set => {
                self.set_total += 1;
                match event.outcome {
                    Outcome::Exceptional => self.sets_exceptional += 1,
                    Outcome::Good => self.sets_good += 1,
                    Outcome::Poor => self.sets_poor += 1,
                    _ => self.set_errors += 1,
                }
                self.kills_from_sets += u64::from(set_converted);
            }
        }
    }

    /// Add rally counters from classified points
    pub fn apply_rallies(&mut self, counters: &RallyCounters) {
        self.serving_rallies += counters.serving_rallies;
        self.serving_points_won += counters.serving_points_won;
        self.receiving_rallies += counters.receiving_rallies;
        self.receiving_points_won += counters.receiving_points_won;
        self.rally_provenance = self.rally_provenance.weakest(counters.provenance);
    }

    /// Add rally counters from the adjacency proxy
    pub fn apply_estimate(&mut self, estimate: &AdjacencyEstimate) {
        self.serving_rallies += estimate.serves;
        self.serving_points_won += estimate.aces;
        self.receiving_rallies += estimate.receives_with_attacks;
        self.receiving_points_won += estimate.kills_after_receive;
        self.rally_provenance = self.rally_provenance.weakest(Provenance::ProxyEstimate);
    }

    pub fn has_rallies(&self) -> bool {
        self.serving_rallies + self.receiving_rallies > 0
    }

    /// Compute one KPI from this bucket's counts
    pub fn kpi(&self, kpi: Kpi, config: &AnalysisConfig) -> KpiResult {
        let (value, numerator, denominator) = match kpi {
            Kpi::SideOutEfficiency => (
                calculate_side_out_efficiency(self.receiving_points_won, self.receiving_rallies),
                self.receiving_points_won as f64,
                self.receiving_rallies,
            ),
            Kpi::BreakPointRate => (
                calculate_break_point_rate(self.serving_points_won, self.serving_rallies),
                self.serving_points_won as f64,
                self.serving_rallies,
            ),
            Kpi::AttackKillPct => (
                calculate_attack_kill_pct(self.attack_kills, self.attack_attempts),
                self.attack_kills as f64,
                self.attack_attempts,
            ),
            Kpi::ReceptionQuality => {
                let good = config.reception_credit.credit(
                    self.reception_perfect,
                    self.reception_good,
                    self.reception_poor,
                );
                (
                    calculate_reception_quality(good, self.reception_total),
                    good,
                    self.reception_total,
                )
            }
            Kpi::DigRate => {
                let good = config
                    .dig_credit
                    .credit(self.dig_perfect, self.dig_good, self.dig_poor);
                (calculate_dig_rate(good, self.dig_total), good, self.dig_total)
            }
            Kpi::BlockKillPct => (
                calculate_block_kill_pct(self.block_kills, self.block_attempts),
                self.block_kills as f64,
                self.block_attempts,
            ),
            Kpi::ServeInRate => (
                calculate_serve_in_rate(self.service_aces, self.service_good, self.service_attempts),
                (self.service_aces + self.service_good) as f64,
                self.service_attempts,
            ),
            Kpi::AceRate => (
                calculate_ace_rate(self.service_aces, self.service_attempts),
                self.service_aces as f64,
                self.service_attempts,
            ),
            Kpi::ServeErrorRate => (
                calculate_serve_error_rate(self.service_errors, self.service_attempts),
                self.service_errors as f64,
                self.service_attempts,
            ),
            Kpi::AttackEfficiency => (
                calculate_attack_efficiency(
                    self.attack_kills,
                    self.attack_errors,
                    self.attacks_blocked,
                    self.attack_attempts,
                ),
                self.attack_kills as f64 - self.attack_errors as f64 - self.attacks_blocked as f64,
                self.attack_attempts,
            ),
            Kpi::SetConversion => (
                calculate_set_conversion(self.kills_from_sets, self.set_total),
                self.kills_from_sets as f64,
                self.set_total,
            ),
            Kpi::AceToErrorRatio => (
                calculate_ace_to_error_ratio(self.service_aces, self.service_errors),
                self.service_aces as f64,
                self.service_errors,
            ),
            Kpi::BlockTouchRate => (
                calculate_block_touch_rate(
                    self.block_kills,
                    self.block_touches,
                    self.block_no_kills,
                    self.block_attempts,
                ),
                (self.block_kills + self.block_touches + self.block_no_kills) as f64,
                self.block_attempts,
            ),
        };

        if denominator == 0 {
            return KpiResult::insufficient(kpi);
        }
        let provenance = if kpi.is_rally_based() {
            self.rally_provenance.weakest(self.provenance)
        } else {
            self.provenance
        };
        KpiResult::new(kpi, value, numerator, denominator).with_provenance(provenance)
    }
}
