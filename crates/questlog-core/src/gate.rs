//! Gates: multi-day boss challenges unlocked by XP.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::progression::Rank;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GateDay {
    pub day_number: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    pub id: String,
    pub rank: Rank,
    pub xp_required: u64,
    pub days: Vec<GateDay>,
    #[serde(default)]
    pub losses: u32,
}

impl Gate {
    /// A fresh gate with `day_count` uncompleted days.
    pub fn new(id: impl Into<String>, rank: Rank, xp_required: u64, day_count: u32) -> Self {
        Gate {
            id: id.into(),
            rank,
            xp_required,
            days: (1..=day_count)
                .map(|day_number| GateDay {
                    day_number,
                    completed: false,
                })
                .collect(),
            losses: 0,
        }
    }

    /// Check that day numbers run 1..=n in order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (position, day) in self.days.iter().enumerate() {
            if day.day_number as usize != position + 1 {
                return Err(ValidationError::InvalidGateDays {
                    position,
                    found: day.day_number,
                });
            }
        }
        Ok(())
    }

    pub fn is_unlocked(&self, player_xp: u64) -> bool {
        player_xp >= self.xp_required
    }

    /// All days completed. A gate with no days is never cleared.
    pub fn is_cleared(&self) -> bool {
        !self.days.is_empty() && self.days.iter().all(|d| d.completed)
    }

    /// Fraction of days completed.
    pub fn progress(&self) -> f64 {
        if self.days.is_empty() {
            return 0.0;
        }
        let done = self.days.iter().filter(|d| d.completed).count();
        done as f64 / self.days.len() as f64
    }

    /// Copy with `day_number` marked complete.
    pub fn complete_day(&self, day_number: u32) -> Result<Gate, ValidationError> {
        self.validate()?;
        let index = (day_number as usize)
            .checked_sub(1)
            .filter(|i| *i < self.days.len())
            .ok_or_else(|| {
                ValidationError::invalid_value(
                    "dayNumber",
                    format!("gate {} has no day {}", self.id, day_number),
                )
            })?;

        let mut gate = self.clone();
        gate.days[index].completed = true;
        Ok(gate)
    }

    /// Copy with one more loss and all day progress reset.
    pub fn record_loss(&self) -> Gate {
        Gate {
            losses: self.losses.saturating_add(1),
            days: self
                .days
                .iter()
                .map(|d| GateDay {
                    completed: false,
                    ..*d
                })
                .collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlocks_at_required_xp() {
        let gate = Gate::new("red-gate", Rank::C, 5000, 3);
        assert!(!gate.is_unlocked(4999));
        assert!(gate.is_unlocked(5000));
    }

    #[test]
    fn new_gate_has_contiguous_days() {
        let gate = Gate::new("g", Rank::E, 0, 5);
        assert!(gate.validate().is_ok());
        assert_eq!(gate.days.iter().map(|d| d.day_number).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn non_contiguous_days_are_invalid() {
        let mut gate = Gate::new("g", Rank::E, 0, 3);
        gate.days[2].day_number = 4;
        assert_eq!(
            gate.validate(),
            Err(ValidationError::InvalidGateDays { position: 2, found: 4 })
        );
        assert!(gate.complete_day(1).is_err());
    }

    #[test]
    fn clearing_all_days() {
        let gate = Gate::new("g", Rank::B, 0, 2);
        let gate = gate.complete_day(1).unwrap();
        assert_eq!(gate.progress(), 0.5);
        assert!(!gate.is_cleared());
        let gate = gate.complete_day(2).unwrap();
        assert!(gate.is_cleared());
        assert!(gate.complete_day(3).is_err());
        assert!(gate.complete_day(0).is_err());
    }

    #[test]
    fn loss_resets_progress() {
        let gate = Gate::new("g", Rank::A, 0, 2).complete_day(1).unwrap().record_loss();
        assert_eq!(gate.losses, 1);
        assert_eq!(gate.progress(), 0.0);
    }

    #[test]
    fn empty_gate_is_never_cleared() {
        let gate = Gate::new("g", Rank::E, 0, 0);
        assert!(!gate.is_cleared());
        assert_eq!(gate.progress(), 0.0);
    }
}
