//! CPU range-list parsing
//!
//! Accepts the kernel list syntax restricted to plain values and `min-max`
//! ranges: `3`, `0-7`, `0-3,8-11`. The command line normally carries a single
//! value or range; lists show up when a cpuset spans several ranges.

use crate::domain::{CpuRange, RangeError, RangeList, MAX_CPUS};

/// Parse a comma-separated list of CPU values and ranges, keeping input order.
///
/// # Errors
/// `InvalidRange` for empty tokens, non-digit characters, more than one `-`
/// in a token or reversed bounds. `RangeOverflow` for numbers too large to
/// represent.
pub fn parse(input: &str) -> Result<RangeList, RangeError> {
    input.split(',').map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<CpuRange, RangeError> {
    if token.matches('-').count() > 1 {
        return Err(invalid(token, "expected a single CPU or one min-max pair"));
    }

    let range = match token.split_once('-') {
        Some((min, max)) => CpuRange { min: parse_bound(token, min)?, max: parse_bound(token, max)? },
        None => CpuRange::single(parse_bound(token, token)?),
    };

    if range.min > range.max {
        return Err(invalid(token, "range start must not exceed its end"));
    }
    Ok(range)
}

fn parse_bound(token: &str, bound: &str) -> Result<u32, RangeError> {
    if bound.is_empty() {
        return Err(invalid(token, "missing CPU number"));
    }
    // u32::from_str would also take a leading '+'
    if !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(token, "not a non-negative integer"));
    }
    bound
        .parse()
        .map_err(|_| RangeError::RangeOverflow { range: token.to_string(), max: MAX_CPUS - 1 })
}

fn invalid(token: &str, problem: &'static str) -> RangeError {
    RangeError::InvalidRange { token: token.to_string(), problem }
}
