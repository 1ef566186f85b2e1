//! Command-line interface: pick a task and override its defaults.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::{BanditConfig, CategorizationConfig, DrawingConfig};
use crate::error::TaskError;
use crate::tasks::{BanditTask, CategorizationTask, DrawingTask, Task};

#[derive(Debug, Parser)]
#[command(name = "stap-tasks")]
#[command(about = "Stimulus-response tasks speaking JSON lines on stdin/stdout")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Seed for the session's random draws (OS entropy when omitted)
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Free-hand drawing on a path canvas
    Draw(DrawArgs),
    /// Two-armed bandit with probabilistic rewards
    Bandit(BanditArgs),
    /// Shepard-Hovland-Jenkins category learning
    Categorize(CategorizeArgs),
}

#[derive(Debug, Args)]
pub struct DrawArgs {
    /// Caption shown on the canvas
    #[arg(long)]
    pub instructions: Option<String>,

    /// Canvas width
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height
    #[arg(long)]
    pub height: Option<u32>,
}

#[derive(Debug, Args)]
pub struct BanditArgs {
    /// Number of trials
    #[arg(long)]
    pub trials: Option<u32>,

    /// How long the reward stays on screen, in milliseconds
    #[arg(long)]
    pub pause_ms: Option<u64>,
}

#[derive(Debug, Args)]
pub struct CategorizeArgs {
    /// Number of trials
    #[arg(long)]
    pub trials: Option<u32>,

    /// Delay between feedback and the next stimulus, in seconds
    #[arg(long)]
    pub pause_secs: Option<f64>,
}

impl DrawArgs {
    pub fn into_config(self) -> DrawingConfig {
        let defaults = DrawingConfig::default();
        DrawingConfig {
            instructions: self.instructions.unwrap_or(defaults.instructions),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            background: defaults.background,
        }
    }
}

impl BanditArgs {
    pub fn into_config(self) -> BanditConfig {
        let defaults = BanditConfig::default();
        BanditConfig {
            trials: self.trials.unwrap_or(defaults.trials),
            pause: self.pause_ms.map(Duration::from_millis).unwrap_or(defaults.pause),
            ..defaults
        }
    }
}

impl CategorizeArgs {
    pub fn into_config(self) -> Result<CategorizationConfig, TaskError> {
        let defaults = CategorizationConfig::default();
        let pause = match self.pause_secs {
            Some(secs) => Duration::try_from_secs_f64(secs)
                .map_err(|e| TaskError::invalid("pause_secs", e.to_string()))?,
            None => defaults.pause,
        };
        Ok(CategorizationConfig {
            trials: self.trials.unwrap_or(defaults.trials),
            pause,
            ..defaults
        })
    }
}

impl Cli {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Build the selected task with its session already drawn.
    pub fn into_task(self) -> Result<Box<dyn Task>, TaskError> {
        let rng = self.rng();
        Ok(match self.command {
            Command::Draw(args) => Box::new(DrawingTask::new(args.into_config())?),
            Command::Bandit(args) => Box::new(BanditTask::new(args.into_config(), rng)?),
            Command::Categorize(args) => {
                Box::new(CategorizationTask::new(args.into_config()?, rng)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_task_with_overrides() {
        let cli = Cli::try_parse_from(["stap-tasks", "bandit", "--trials", "5", "--pause-ms", "250"])
            .unwrap();
        assert_eq!(cli.seed, None);
        let Command::Bandit(args) = cli.command else {
            panic!("expected bandit");
        };
        let config = args.into_config();
        assert_eq!(config.trials, 5);
        assert_eq!(config.pause, Duration::from_millis(250));
        assert_eq!(config.rewards, [0.7, 0.3]);
    }

    #[test]
    fn seed_is_global() {
        let cli = Cli::try_parse_from(["stap-tasks", "categorize", "--seed", "9"]).unwrap();
        assert_eq!(cli.seed, Some(9));
        assert_eq!(cli.into_task().unwrap().name(), "categorize");
    }

    #[test]
    fn defaults_when_no_flags() {
        let cli = Cli::try_parse_from(["stap-tasks", "draw"]).unwrap();
        let Command::Draw(args) = cli.command else {
            panic!("expected draw");
        };
        let config = args.into_config();
        assert_eq!(config.instructions, "Draw a smiley face");
        assert_eq!((config.width, config.height), (400, 300));
    }

    #[test]
    fn negative_pause_rejected() {
        let args = CategorizeArgs {
            trials: None,
            pause_secs: Some(-1.0),
        };
        assert!(args.into_config().is_err());
    }

    #[test]
    fn zero_trials_rejected_at_build() {
        let cli = Cli::try_parse_from(["stap-tasks", "bandit", "--trials", "0"]).unwrap();
        assert!(cli.into_task().is_err());
    }

    #[test]
    fn requires_a_task() {
        assert!(Cli::try_parse_from(["stap-tasks"]).is_err());
    }
}
