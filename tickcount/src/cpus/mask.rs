//! Fold parsed CPU ranges into a [`CpuMask`].

use crate::domain::{CpuMask, CpuRange, RangeError};

/// OR every range into an initially empty mask.
///
/// # Errors
/// `RangeOverflow` if any range reaches past [`crate::domain::MAX_CPUS`].
pub fn compute(ranges: &[CpuRange]) -> Result<CpuMask, RangeError> {
    ranges.iter().try_fold(CpuMask::new(), |mut mask, range| {
        mask.insert_range(*range)?;
        Ok(mask)
    })
}
