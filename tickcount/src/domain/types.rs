//! Core domain types for tickcount
//!
//! CPU ranges as parsed from the command line or a cpuset, and the
//! fixed-width mask they fold into.

use std::fmt;

use super::errors::RangeError;

/// Number of CPUs a [`CpuMask`] can address. CPU indices run from 0 to
/// `MAX_CPUS - 1`.
pub const MAX_CPUS: u32 = 256;

const WORD_BITS: u32 = u32::BITS;
const WORDS: usize = (MAX_CPUS / WORD_BITS) as usize;

/// Inclusive range of CPU indices (`min <= max`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuRange {
    pub min: u32,
    pub max: u32,
}

impl CpuRange {
    /// A range covering exactly one CPU.
    #[must_use]
    pub fn single(cpu: u32) -> Self {
        Self { min: cpu, max: cpu }
    }
}

impl fmt::Display for CpuRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Ranges in input order. Order does not affect the resulting mask.
pub type RangeList = Vec<CpuRange>;

/// Set of CPUs as a 256-bit mask, bit `i` selecting CPU `i`.
///
/// Renders in the format the kernel uses for cpumask files: lowercase hex in
/// comma-separated 32-bit groups, most significant group first, e.g. `7` for
/// CPUs 0-2 and `1,00000000` for CPU 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuMask {
    // words[0] holds CPUs 0..=31
    words: [u32; WORDS],
}

impl CpuMask {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set every bit in `range`. Bits are only ever added.
    ///
    /// # Errors
    /// `RangeOverflow` if the range reaches past [`MAX_CPUS`], `InvalidRange`
    /// if its bounds are reversed.
    #[allow(clippy::cast_possible_truncation)]
    pub fn insert_range(&mut self, range: CpuRange) -> Result<(), RangeError> {
        if range.min > range.max {
            return Err(RangeError::InvalidRange {
                token: range.to_string(),
                problem: "range start must not exceed its end",
            });
        }
        if range.max >= MAX_CPUS {
            return Err(RangeError::RangeOverflow { range: range.to_string(), max: MAX_CPUS - 1 });
        }

        for word in range.min / WORD_BITS..=range.max / WORD_BITS {
            let base = word * WORD_BITS;
            let lo = range.min.max(base) - base;
            let hi = range.max.min(base + WORD_BITS - 1) - base;
            let width = hi - lo + 1;
            // hi <= 31, so the shifted value always fits in 32 bits
            let sub_mask = ((1u64 << width) - 1) << lo;
            self.words[word as usize] |= sub_mask as u32;
        }
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, cpu: u32) -> bool {
        cpu < MAX_CPUS && self.words[(cpu / WORD_BITS) as usize] & (1 << (cpu % WORD_BITS)) != 0
    }

    /// Number of CPUs selected.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// Selected CPU indices in ascending order.
    pub fn cpus(&self) -> impl Iterator<Item = u32> + '_ {
        (0..MAX_CPUS).filter(|cpu| self.contains(*cpu))
    }
}

impl fmt::LowerHex for CpuMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(top) = self.words.iter().rposition(|w| *w != 0) else {
            return f.write_str("0");
        };
        write!(f, "{:x}", self.words[top])?;
        for word in self.words[..top].iter().rev() {
            write!(f, ",{word:08x}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CpuMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}
