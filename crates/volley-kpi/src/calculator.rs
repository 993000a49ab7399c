//! Pure KPI ratio functions
//!
//! Each function takes only the counts its formula needs. A zero
//! denominator yields `0.0`; callers decide whether that means "no data"
//! by looking at the denominator, never at the value.

#[inline]
fn ratio(numerator: f64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator / denominator as f64
    }
}

/// Receiving points won / receiving rallies
pub fn calculate_side_out_efficiency(receiving_points_won: u64, receiving_rallies: u64) -> f64 {
    ratio(receiving_points_won as f64, receiving_rallies)
}

/// Serving points won / serving rallies
pub fn calculate_break_point_rate(serving_points_won: u64, serving_rallies: u64) -> f64 {
    ratio(serving_points_won as f64, serving_rallies)
}

pub fn calculate_attack_kill_pct(attack_kills: u64, attack_attempts: u64) -> f64 {
    ratio(attack_kills as f64, attack_attempts)
}

/// Credited good receptions / total receptions. `good_receptions` is
/// fractional under half-credit rules.
pub fn calculate_reception_quality(good_receptions: f64, total_receptions: u64) -> f64 {
    ratio(good_receptions, total_receptions)
}

pub fn calculate_dig_rate(good_digs: f64, total_digs: u64) -> f64 {
    ratio(good_digs, total_digs)
}

pub fn calculate_block_kill_pct(block_kills: u64, block_attempts: u64) -> f64 {
    ratio(block_kills as f64, block_attempts)
}

/// (aces + good serves) / total serves
pub fn calculate_serve_in_rate(aces: u64, good_serves: u64, total_serves: u64) -> f64 {
    ratio((aces + good_serves) as f64, total_serves)
}

pub fn calculate_ace_rate(aces: u64, total_serves: u64) -> f64 {
    ratio(aces as f64, total_serves)
}

pub fn calculate_serve_error_rate(serve_errors: u64, total_serves: u64) -> f64 {
    ratio(serve_errors as f64, total_serves)
}

/// (kills − errors − blocked) / attempts, may be negative
pub fn calculate_attack_efficiency(
    attack_kills: u64,
    attack_errors: u64,
    attacks_blocked: u64,
    attack_attempts: u64,
) -> f64 {
    let net = attack_kills as f64 - attack_errors as f64 - attacks_blocked as f64;
    ratio(net, attack_attempts)
}

pub fn calculate_set_conversion(kills_from_sets: u64, total_sets: u64) -> f64 {
    ratio(kills_from_sets as f64, total_sets)
}

/// Aces per serve error, unbounded above
pub fn calculate_ace_to_error_ratio(aces: u64, serve_errors: u64) -> f64 {
    ratio(aces as f64, serve_errors)
}

/// (kills + touches + block_no_kill) / block attempts
pub fn calculate_block_touch_rate(
    block_kills: u64,
    block_touches: u64,
    block_no_kills: u64,
    block_attempts: u64,
) -> f64 {
    ratio((block_kills + block_touches + block_no_kills) as f64, block_attempts)
}
