// 🔢 Natural Numbers - find the one number taken out of 1..=100
//
// Stands apart from the pipeline; shares no state with it.

use crate::error::NaturalsError;
use std::collections::BTreeSet;

const LOWER: i64 = 1;
const UPPER: i64 = 100;
/// 1 + 2 + ... + 100
const FULL_SUM: i64 = UPPER * (UPPER + 1) / 2;

#[derive(Debug, Clone)]
pub struct NaturalNumbersSet {
    numbers: BTreeSet<i64>,
}

impl Default for NaturalNumbersSet {
    fn default() -> Self {
        Self::new()
    }
}

impl NaturalNumbersSet {
    pub fn new() -> Self {
        NaturalNumbersSet {
            numbers: (LOWER..=UPPER).collect(),
        }
    }

    /// Remove `number` from the set
    pub fn extract(&mut self, number: i64) -> Result<(), NaturalsError> {
        if !(LOWER..=UPPER).contains(&number) {
            return Err(NaturalsError::OutOfRange(number));
        }
        if !self.numbers.remove(&number) {
            return Err(NaturalsError::AlreadyExtracted(number));
        }
        Ok(())
    }

    /// The number that was extracted, derived from the remaining sum.
    ///
    /// Only meaningful after exactly one extraction; anything else is an error.
    pub fn find_missing_number(&self) -> Result<i64, NaturalsError> {
        match self.extracted_count() {
            0 => Err(NaturalsError::NothingExtracted),
            1 => Ok(FULL_SUM - self.numbers.iter().sum::<i64>()),
            n => Err(NaturalsError::AmbiguousMissing(n)),
        }
    }

    pub fn extracted_count(&self) -> usize {
        (UPPER - LOWER + 1) as usize - self.numbers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_extracted_number() {
        let mut set = NaturalNumbersSet::new();
        set.extract(50).unwrap();
        assert_eq!(set.find_missing_number(), Ok(50));

        for n in [1, 100] {
            let mut set = NaturalNumbersSet::new();
            set.extract(n).unwrap();
            assert_eq!(set.find_missing_number(), Ok(n));
        }
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut set = NaturalNumbersSet::new();
        assert_eq!(set.extract(0), Err(NaturalsError::OutOfRange(0)));
        assert_eq!(set.extract(101), Err(NaturalsError::OutOfRange(101)));
        assert_eq!(set.extract(-7), Err(NaturalsError::OutOfRange(-7)));
        assert_eq!(set.extracted_count(), 0);
    }

    #[test]
    fn test_rejects_double_extraction() {
        let mut set = NaturalNumbersSet::new();
        set.extract(7).unwrap();
        assert_eq!(set.extract(7), Err(NaturalsError::AlreadyExtracted(7)));
        assert_eq!(set.find_missing_number(), Ok(7));
    }

    #[test]
    fn test_missing_requires_exactly_one_extraction() {
        let mut set = NaturalNumbersSet::new();
        assert_eq!(set.find_missing_number(), Err(NaturalsError::NothingExtracted));

        set.extract(3).unwrap();
        set.extract(4).unwrap();
        assert_eq!(set.find_missing_number(), Err(NaturalsError::AmbiguousMissing(2)));
    }
}
