//! Discrete speed steps

use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One selectable generation interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedStep {
    pub interval_ms: u64,
    pub label: String,
}

impl SpeedStep {
    pub fn new(interval_ms: u64, label: impl Into<String>) -> Self {
        Self {
            interval_ms,
            label: label.into(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Speed steps ordered from slowest (longest interval) to fastest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeedTable {
    steps: Vec<SpeedStep>,
}

impl SpeedTable {
    pub fn new(steps: Vec<SpeedStep>) -> Result<Self, SimError> {
        if steps.is_empty() {
            return Err(SimError::EmptySpeedTable);
        }

        for (index, step) in steps.iter().enumerate() {
            if step.interval_ms == 0 {
                return Err(SimError::InvalidSpeedStep {
                    index,
                    reason: "interval must be positive",
                });
            }
            if index > 0 && step.interval_ms >= steps[index - 1].interval_ms {
                return Err(SimError::InvalidSpeedStep {
                    index,
                    reason: "intervals must be ordered from slowest to fastest",
                });
            }
        }

        Ok(Self { steps })
    }

    pub fn default_steps() -> Vec<SpeedStep> {
        vec![
            SpeedStep::new(500, "Slow"),
            SpeedStep::new(200, "Normal"),
            SpeedStep::new(50, "Fast"),
            SpeedStep::new(10, "Very Fast"),
            SpeedStep::new(5, "Lightning"),
        ]
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SpeedStep> {
        self.steps.get(index)
    }

    pub fn check_index(&self, index: usize) -> Result<&SpeedStep, SimError> {
        self.steps.get(index).ok_or(SimError::InvalidSpeedIndex {
            index,
            len: self.steps.len(),
        })
    }

    /// Index of the step with exactly this interval
    pub fn position(&self, interval: Duration) -> Option<usize> {
        self.steps.iter().position(|step| step.interval() == interval)
    }

    pub fn steps(&self) -> &[SpeedStep] {
        &self.steps
    }
}

impl Default for SpeedTable {
    fn default() -> Self {
        Self {
            steps: Self::default_steps(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let table = SpeedTable::default();
        assert_eq!(table.len(), 5);
        assert_eq!(table.get(1).unwrap().label, "Normal");
        assert_eq!(table.position(Duration::from_millis(50)), Some(2));
        assert_eq!(table.position(Duration::from_millis(60)), None);
        assert!(SpeedTable::new(SpeedTable::default_steps()).is_ok());
    }

    #[test]
    fn test_empty_table_rejected() {
        assert_eq!(SpeedTable::new(vec![]), Err(SimError::EmptySpeedTable));
    }

    #[test]
    fn test_bad_steps_rejected() {
        let zero = vec![SpeedStep::new(100, "a"), SpeedStep::new(0, "b")];
        assert!(matches!(
            SpeedTable::new(zero),
            Err(SimError::InvalidSpeedStep { index: 1, .. })
        ));

        let unordered = vec![SpeedStep::new(100, "a"), SpeedStep::new(200, "b")];
        assert!(SpeedTable::new(unordered).is_err());
    }

    #[test]
    fn test_check_index() {
        let table = SpeedTable::default();
        assert!(table.check_index(4).is_ok());
        assert_eq!(
            table.check_index(5),
            Err(SimError::InvalidSpeedIndex { index: 5, len: 5 })
        );
    }
}
