//! Configuration types for agents and training runs.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, tictactoe::Board};

/// Default amplification applied to Q-values before exponentiating them
/// when an action is sampled. Higher values favour the best-known action
/// more strongly; every action keeps a non-zero probability.
pub const DEFAULT_TEMPERATURE: f64 = 5.0;

/// Configuration for creating a learning agent.
///
/// # Examples
///
/// ```
/// use noughts::config::AgentConfig;
///
/// let config = AgentConfig::new().with_temperature(3.0).with_seed(42);
/// assert_eq!(config.seed, Some(42));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Scale applied to Q-values when sampling actions
    pub temperature: f64,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            seed: None,
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// # Errors
    ///
    /// Returns error if the temperature is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "temperature must be finite and non-negative, got {}",
                    self.temperature
                ),
            });
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Discount factor as a function of a move's distance from the end of the
/// game (1 = the final move).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSchedule {
    /// Same factor at every depth
    Constant(f64),
    /// `initial * decay^(depth - 1)`
    Geometric { initial: f64, decay: f64 },
}

impl DiscountSchedule {
    /// Discount factor for a move at `depth` (1 = the learner's final move)
    pub fn factor(&self, depth: usize) -> f64 {
        match *self {
            DiscountSchedule::Constant(df) => df,
            DiscountSchedule::Geometric { initial, decay } => {
                let exponent = i32::try_from(depth.saturating_sub(1)).unwrap_or(i32::MAX);
                initial * decay.powi(exponent)
            }
        }
    }

    /// # Errors
    ///
    /// Returns error if any parameter lies outside [0, 1].
    pub fn validate(&self) -> Result<()> {
        let values = match *self {
            DiscountSchedule::Constant(df) => vec![("discount factor", df)],
            DiscountSchedule::Geometric { initial, decay } => {
                vec![("initial discount", initial), ("discount decay", decay)]
            }
        };
        for (name, value) in values {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {value}"),
                });
            }
        }
        Ok(())
    }
}

impl Default for DiscountSchedule {
    fn default() -> Self {
        DiscountSchedule::Constant(0.9)
    }
}

/// Which game-and-learn routine the training driver runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingRoutine {
    /// The learner plays its own side; the teacher plays the other
    #[default]
    AgainstTeacher,
    /// The learner plays both sides; the teacher only opens games it starts
    SelfPlay,
}

/// Configuration for a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Learning rate α in (0, 1]
    pub learning_rate: f64,

    /// Discount factor per depth
    pub discount: DiscountSchedule,

    /// Game-and-learn routine
    pub routine: TrainingRoutine,

    /// Board dimension N
    pub board_size: usize,
}

impl TrainingConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount(mut self, discount: DiscountSchedule) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_routine(mut self, routine: TrainingRoutine) -> Self {
        self.routine = routine;
        self
    }

    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    /// # Errors
    ///
    /// Returns error if the learning rate, discount schedule or board size
    /// is out of range.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "learning rate must be in (0, 1], got {}",
                    self.learning_rate
                ),
            });
        }
        if self.board_size == 0 {
            return Err(Error::InvalidBoardSize {
                size: self.board_size,
            });
        }
        self.discount.validate()
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.3,
            discount: DiscountSchedule::default(),
            routine: TrainingRoutine::default(),
            board_size: Board::DEFAULT_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometric_schedule() {
        let schedule = DiscountSchedule::Geometric {
            initial: 0.9,
            decay: 0.5,
        };
        assert!((schedule.factor(1) - 0.9).abs() < 1e-12);
        assert!((schedule.factor(2) - 0.45).abs() < 1e-12);
        assert!((schedule.factor(3) - 0.225).abs() < 1e-12);
    }

    #[test]
    fn test_constant_schedule() {
        let schedule = DiscountSchedule::Constant(0.7);
        assert_eq!(schedule.factor(1), 0.7);
        assert_eq!(schedule.factor(9), 0.7);
    }

    #[test]
    fn test_validation() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(
            TrainingConfig::default()
                .with_learning_rate(0.0)
                .validate()
                .is_err()
        );
        assert!(
            TrainingConfig::default()
                .with_board_size(0)
                .validate()
                .is_err()
        );
        assert!(
            TrainingConfig::default()
                .with_discount(DiscountSchedule::Constant(1.5))
                .validate()
                .is_err()
        );
        assert!(AgentConfig::new().with_temperature(-1.0).validate().is_err());
    }

    #[test]
    fn test_schedule_serde() {
        let schedule = DiscountSchedule::Geometric {
            initial: 1.0,
            decay: 0.8,
        };
        let json = serde_json::to_string(&schedule).unwrap();
        let parsed: DiscountSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schedule);
    }
}
