//! Certainty-factor arithmetic.

/// Overall certainty reported when no rule fires: no evidence either way.
pub const NO_EVIDENCE: f64 = 0.5;

/// Combine two certainty factors (MYCIN-style).
///
/// Agreeing signs reinforce each other toward +/-1; opposing signs cancel.
/// Opposing factors of full strength (+1 and -1) are a total conflict and
/// combine to 0.
pub fn combine(c1: f64, c2: f64) -> f64 {
    if c1 >= 0.0 && c2 >= 0.0 {
        c1 + c2 * (1.0 - c1)
    } else if c1 < 0.0 && c2 < 0.0 {
        c1 + c2 * (1.0 + c1)
    } else {
        let denominator = 1.0 - c1.abs().min(c2.abs());
        if denominator <= 0.0 {
            0.0
        } else {
            (c1 + c2) / denominator
        }
    }
}

/// Left-fold [`combine`] over `certainties`, seeded with the first one,
/// and round to two decimals. Returns [`NO_EVIDENCE`] for an empty input.
pub fn combine_all<I>(certainties: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut iter = certainties.into_iter();
    let Some(first) = iter.next() else {
        return NO_EVIDENCE;
    };
    round2(iter.fold(first, combine))
}

/// Round to two decimals using the exact decimal value of the float, so
/// values such as 0.995 land the same way every time.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
