//! Configuration types.

use std::time::Duration;

use crate::error::TaskError;

/// Drawing task configuration.
#[derive(Debug, Clone)]
pub struct DrawingConfig {
    /// Caption of the drawing canvas; also the element all strokes target.
    pub instructions: String,
    /// Canvas width in host pixels.
    pub width: u32,
    /// Canvas height in host pixels.
    pub height: u32,
    /// Canvas background color.
    pub background: String,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            instructions: "Draw a smiley face".to_string(),
            width: 400,
            height: 300,
            background: "white".to_string(),
        }
    }
}

impl DrawingConfig {
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.instructions.is_empty() {
            return Err(TaskError::invalid("instructions", "must not be empty"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(TaskError::invalid("canvas", "width and height must be positive"));
        }
        Ok(())
    }
}

/// Two-armed-bandit configuration.
#[derive(Debug, Clone)]
pub struct BanditConfig {
    /// Number of trials; also announced to the host as the end condition.
    pub trials: u32,
    /// Reward probabilities. Assigned to the two buttons in a random order
    /// once per session.
    pub rewards: [f64; 2],
    /// How long the reward popup stays up.
    pub pause: Duration,
    /// Caption of the button group.
    pub prompt: String,
    /// Button labels, in display order.
    pub buttons: [String; 2],
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            trials: 20,
            rewards: [0.7, 0.3],
            pause: Duration::from_millis(500),
            prompt: "Click a button".to_string(),
            buttons: ["Button 1".to_string(), "Button 2".to_string()],
        }
    }
}

impl BanditConfig {
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.trials == 0 {
            return Err(TaskError::invalid("trials", "must be at least 1"));
        }
        if let Some(p) = self.rewards.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(TaskError::invalid(
                "rewards",
                format!("probability {p} is outside [0, 1]"),
            ));
        }
        if self.buttons[0] == self.buttons[1] {
            return Err(TaskError::invalid("buttons", "labels must be distinct"));
        }
        Ok(())
    }
}

/// Categorization task configuration.
#[derive(Debug, Clone)]
pub struct CategorizationConfig {
    /// Number of trials; the summary splits the score at `trials / 2`.
    pub trials: u32,
    /// Delay between feedback and the next stimulus.
    pub pause: Duration,
    /// The two category labels. Their order is shuffled once per session;
    /// whichever ends up second is the label for rule members.
    pub category_names: [String; 2],
}

impl Default for CategorizationConfig {
    fn default() -> Self {
        Self {
            trials: 32,
            pause: Duration::from_millis(500),
            category_names: ["Greeble".to_string(), "Groble".to_string()],
        }
    }
}

impl CategorizationConfig {
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.trials == 0 {
            return Err(TaskError::invalid("trials", "must be at least 1"));
        }
        if self.category_names[0] == self.category_names[1] {
            return Err(TaskError::invalid("category_names", "names must be distinct"));
        }
        Ok(())
    }

    /// Question shown above each stimulus.
    pub fn prompt(&self) -> String {
        format!(
            "Is this object a {} or a {}?",
            self.category_names[0], self.category_names[1]
        )
    }
}
