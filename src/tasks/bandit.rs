//! Two-armed bandit with probabilistic rewards.
//!
//! Two buttons pay out 1 with fixed probabilities. The probability pair is
//! assigned to the buttons in a random order at session start, so exactly
//! one button is the better arm for the whole session.

use async_trait::async_trait;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::channels::TaskChannel;
use crate::config::BanditConfig;
use crate::error::{ChannelError, Result, TaskError};
use crate::protocol::{InboundMessage, Message};
use crate::tasks::{Task, TaskOutcome};

/// Title-bar field holding the trial counter.
pub const TRIAL_FIELD: &str = "Trial";
/// Popup field holding the last reward.
pub const REWARD_FIELD: &str = "Reward";

const GOODBYE: &str = "Thank you for your participation.";

/// Reward probability per button, fixed for the session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BanditSession {
    probabilities: [f64; 2],
}

impl BanditSession {
    /// Assign the configured probabilities to the buttons in random order.
    pub fn new<R: Rng + ?Sized>(config: &BanditConfig, rng: &mut R) -> Self {
        let mut probabilities = config.rewards;
        probabilities.shuffle(rng);
        Self { probabilities }
    }

    /// Use `probabilities` as given: button 0 gets the first.
    pub fn fixed(probabilities: [f64; 2]) -> Self {
        Self { probabilities }
    }

    pub fn probability(&self, button: usize) -> f64 {
        self.probabilities[button]
    }

    /// Index of the button with the higher payout.
    pub fn better_button(&self) -> usize {
        usize::from(self.probabilities[1] > self.probabilities[0])
    }
}

/// One Bernoulli draw: 1 when a uniform `[0, 1)` sample is strictly below `p`.
pub fn draw_reward<R: Rng + ?Sized>(p: f64, rng: &mut R) -> u8 {
    u8::from(rng.r#gen::<f64>() < p)
}

/// Totals reported when the task ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BanditOutcome {
    pub trials: u32,
    pub total_reward: u32,
    /// How often each button was chosen.
    pub picks: [u32; 2],
    /// Which button paid more this session.
    pub better_button: usize,
}

pub struct BanditTask<R = StdRng> {
    config: BanditConfig,
    session: BanditSession,
    rng: R,
}

impl<R: Rng + Send> BanditTask<R> {
    /// Validate `config` and draw the session's button assignment from `rng`.
    pub fn new(config: BanditConfig, mut rng: R) -> std::result::Result<Self, TaskError> {
        config.validate()?;
        let session = BanditSession::new(&config, &mut rng);
        Ok(Self {
            config,
            session,
            rng,
        })
    }

    /// Run with a predetermined session instead of a random one.
    pub fn with_session(
        config: BanditConfig,
        session: BanditSession,
        rng: R,
    ) -> std::result::Result<Self, TaskError> {
        config.validate()?;
        Ok(Self {
            config,
            session,
            rng,
        })
    }

    pub fn session(&self) -> &BanditSession {
        &self.session
    }

    /// The three announcement messages: end/goal conditions, the bounded
    /// trial counter, and the button group.
    pub fn setup(&self) -> Vec<Message> {
        let trials = self.config.trials;
        vec![
            Message::field(
                "_task",
                json!({
                    "end": { TRIAL_FIELD: trials },
                    "good": { REWARD_FIELD: 1 },
                }),
            ),
            Message::field(TRIAL_FIELD, json!({ "_nm": { "<=": trials } })),
            Message::field(
                self.config.prompt.as_str(),
                json!(["_i", self.config.buttons[0], self.config.buttons[1]]),
            ),
        ]
    }

    /// Which button an inbound click refers to. Anything that does not name
    /// the first button counts as the second.
    pub fn chosen_button(&self, msg: &InboundMessage) -> std::result::Result<usize, ChannelError> {
        let value = msg.value.as_ref().ok_or_else(|| {
            ChannelError::InvalidMessage(format!("choice from {} carries no value", msg.field))
        })?;
        Ok(if value.mentions(&self.config.buttons[0]) {
            0
        } else {
            1
        })
    }

    /// Draw the reward for pressing `button`.
    pub fn reward(&mut self, button: usize) -> u8 {
        draw_reward(self.session.probability(button), &mut self.rng)
    }
}

#[async_trait]
impl<R: Rng + Send> Task for BanditTask<R> {
    fn name(&self) -> &'static str {
        "bandit"
    }

    async fn run(&mut self, channel: &mut dyn TaskChannel) -> Result<TaskOutcome> {
        for msg in self.setup() {
            channel.send(&msg).await?;
        }

        let pause_ms = self.config.pause.as_secs_f64() * 1000.0;
        let mut outcome = BanditOutcome {
            better_button: self.session.better_button(),
            ..Default::default()
        };

        for trial in 1..=self.config.trials {
            channel.send(&Message::field(TRIAL_FIELD, trial)).await?;

            let choice = channel.recv().await?;
            let button = self.chosen_button(&choice)?;
            let reward = self.reward(button);
            debug!(trial, button, reward, "bandit trial");

            outcome.trials = trial;
            outcome.picks[button] += 1;
            outcome.total_reward += u32::from(reward);

            channel
                .send(&Message::popup(json!({ REWARD_FIELD: reward })))
                .await?;
            channel
                .send(&Message::resume_at(choice.timestamp_ms + pause_ms))
                .await?;
            channel.recv().await?;
            channel.send(&Message::popup(Value::Null)).await?;
        }

        channel.send(&Message::popup(json!([GOODBYE]))).await?;

        info!(
            trials = outcome.trials,
            total_reward = outcome.total_reward,
            better_button = outcome.better_button,
            "bandit finished"
        );
        Ok(TaskOutcome::Bandit(outcome))
    }
}
