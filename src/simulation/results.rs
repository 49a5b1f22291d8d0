// src/simulation/results.rs
use crate::core::{CqzeError, Outcome};
use std::fmt;

/// Shot counts per computational-basis outcome, as returned by a backend run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counts {
    /// Indexed by `Outcome::bit()`.
    counts: [u64; 2],
}

impl Counts {
    /// Creates counts from the number of `H` (bit 0) and `V` (bit 1) detections.
    pub fn new(h: u64, v: u64) -> Self {
        Self { counts: [h, v] }
    }

    /// Builds counts from bit-string keyed pairs such as `[("0", 998), ("1", 2)]`.
    /// Repeated labels accumulate; missing labels count as zero.
    ///
    /// # Errors
    /// `CqzeError::MalformedInput` for a label other than `"0"`/`"1"` or on overflow.
    pub fn from_labels<I, S>(entries: I) -> Result<Self, CqzeError>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut counts = Counts::default();
        for (label, count) in entries {
            let outcome = Outcome::from_label(label.as_ref()).ok_or_else(|| {
                CqzeError::malformed_input(format!(
                    "unknown outcome label '{}', expected \"0\" or \"1\"",
                    label.as_ref()
                ))
            })?;
            let slot = &mut counts.counts[outcome.bit()];
            *slot = slot.checked_add(count).ok_or_else(|| {
                CqzeError::malformed_input(format!("count overflow for outcome '{}'", outcome.label()))
            })?;
        }
        Ok(counts)
    }

    /// Records a single detection. (Internal visibility)
    pub(crate) fn record(&mut self, outcome: Outcome) {
        self.counts[outcome.bit()] += 1;
    }

    /// Number of shots that resolved to `outcome`.
    pub fn get(&self, outcome: Outcome) -> u64 {
        self.counts[outcome.bit()]
    }

    /// Total shots T.
    pub fn total(&self) -> u64 {
        self.counts[0].saturating_add(self.counts[1])
    }
}

impl fmt::Display for Counts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{'0': {}, '1': {}}}",
            self.get(Outcome::H),
            self.get(Outcome::V)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_labels_accumulates() -> Result<(), CqzeError> {
        let counts = Counts::from_labels([("0", 3), ("1", 4), ("0", 2)])?;
        assert_eq!(counts.get(Outcome::H), 5);
        assert_eq!(counts.get(Outcome::V), 4);
        assert_eq!(counts.total(), 9);
        assert_eq!(counts.to_string(), "{'0': 5, '1': 4}");
        Ok(())
    }

    #[test]
    fn test_from_labels_rejects_unknown_label() {
        let err = Counts::from_labels([("0", 3), ("2", 1)]);
        assert!(matches!(err, Err(CqzeError::MalformedInput { .. })));
    }
}
