//! Shepard, Hovland & Jenkins (1961) category learning.
//!
//! Each stimulus has three binary features. One of four classic rule types
//! decides which four of the eight stimuli belong to the target category.
//! How features are drawn (which visual channel shows which feature, and
//! which polarity) and which label names the target category are fixed
//! once per session.

use async_trait::async_trait;
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::{debug, info};

use crate::channels::TaskChannel;
use crate::config::CategorizationConfig;
use crate::error::{ChannelError, Result, TaskError};
use crate::protocol::{Directive, Item, Message, Options, Shape};
use crate::tasks::{Task, TaskOutcome};

/// Three binary feature values.
pub type Stimulus = [u8; 3];

const TRIAL_FIELD: &str = "Trial";
const FEEDBACK_FIELD: &str = "feedback";
const CORRECT: &str = "Correct";
const INCORRECT: &str = "Incorrect";
const GOODBYE: &str = "Thank you for your participation.";

/// Canonical SHJ category structures. Each lists the four stimuli that
/// belong to the target category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleType {
    I,
    II,
    IV,
    VI,
}

impl RuleType {
    pub const ALL: [RuleType; 4] = [RuleType::I, RuleType::II, RuleType::IV, RuleType::VI];

    pub fn positives(self) -> [Stimulus; 4] {
        match self {
            // one relevant feature
            RuleType::I => [[0, 0, 0], [0, 0, 1], [0, 1, 0], [0, 1, 1]],
            // exclusive-or of the first two features
            RuleType::II => [[0, 0, 0], [0, 0, 1], [1, 1, 0], [1, 1, 1]],
            // prototype plus one-feature neighbors
            RuleType::IV => [[0, 0, 0], [0, 0, 1], [0, 1, 0], [1, 0, 0]],
            // parity
            RuleType::VI => [[0, 0, 0], [1, 0, 1], [1, 1, 0], [0, 1, 1]],
        }
    }

    pub fn contains(self, stimulus: Stimulus) -> bool {
        self.positives().contains(&stimulus)
    }

    /// Roman numeral shown in the summary.
    pub fn label(self) -> &'static str {
        match self {
            RuleType::I => "I",
            RuleType::II => "II",
            RuleType::IV => "IV",
            RuleType::VI => "VI",
        }
    }
}

/// Session-wide randomization, drawn once and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizationSession {
    rule: RuleType,
    /// `dim_to_vis[channel]` is the feature shown on visual channel
    /// `channel` (0 = fill, 1 = line color, 2 = shape).
    dim_to_vis: [usize; 3],
    /// Per feature: draw the opposite polarity.
    val_to_vis: [bool; 3],
    /// The second name labels members of the rule's category.
    category_names: [String; 2],
}

impl CategorizationSession {
    pub fn new<R: Rng + ?Sized>(config: &CategorizationConfig, rng: &mut R) -> Self {
        let rule = RuleType::ALL[rng.gen_range(0..RuleType::ALL.len())];
        let mut dim_to_vis = [0, 1, 2];
        dim_to_vis.shuffle(rng);
        let val_to_vis = [rng.r#gen(), rng.r#gen(), rng.r#gen()];
        let mut category_names = config.category_names.clone();
        category_names.shuffle(rng);
        Self {
            rule,
            dim_to_vis,
            val_to_vis,
            category_names,
        }
    }

    /// Identity feature mapping with the names in the given order.
    pub fn fixed(rule: RuleType, category_names: [String; 2]) -> Self {
        Self {
            rule,
            dim_to_vis: [0, 1, 2],
            val_to_vis: [false; 3],
            category_names,
        }
    }

    pub fn with_mapping(mut self, dim_to_vis: [usize; 3], val_to_vis: [bool; 3]) -> Self {
        self.dim_to_vis = dim_to_vis;
        self.val_to_vis = val_to_vis;
        self
    }

    pub fn rule(&self) -> RuleType {
        self.rule
    }

    pub fn category_names(&self) -> &[String; 2] {
        &self.category_names
    }

    /// Whether answering `label` for `stimulus` is correct: the label at
    /// index 1 means "belongs to the rule". `None` if `label` is not one of
    /// the category names.
    pub fn check_correct(&self, stimulus: Stimulus, label: &str) -> Option<bool> {
        let index = self.category_names.iter().position(|name| name == label)?;
        Some(self.rule.contains(stimulus) == (index == 1))
    }

    /// Visual representation of `stimulus` under this session's mapping.
    pub fn render(&self, stimulus: Stimulus) -> Shape {
        let vis = self.dim_to_vis.map(|dim| {
            let value = stimulus[dim];
            if self.val_to_vis[dim] { 1 - value } else { value }
        });
        Shape {
            w: 40,
            h: 40,
            lw: 10,
            bg: vis[0],
            lc: vis[1] + 2,
            shape: vis[2],
        }
    }
}

/// End-of-session report.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rule: RuleType,
    /// Label of the rule's category.
    pub positive_label: String,
    /// How each member of the rule's category looked this session.
    pub positives: Vec<Shape>,
    pub first_half: u32,
    pub second_half: u32,
}

impl Summary {
    /// Score `correct` trial by trial, splitting at `len / 2`.
    pub fn new(session: &CategorizationSession, correct: &[bool]) -> Self {
        let (first, second) = correct.split_at(correct.len() / 2);
        let count = |half: &[bool]| -> u32 { half.iter().map(|&c| u32::from(c)).sum() };
        Self {
            rule: session.rule,
            positive_label: session.category_names[1].clone(),
            positives: session
                .rule
                .positives()
                .iter()
                .map(|&s| session.render(s))
                .collect(),
            first_half: count(first),
            second_half: count(second),
        }
    }

    pub fn total(&self) -> u32 {
        self.first_half + self.second_half
    }

    pub fn to_message(&self) -> Message {
        let report = Item::new(
            "Experiment Summary",
            vec![
                Item::new("Category Structure Type", self.rule.label()),
                Item::new(self.positive_label.as_str(), self.positives.clone()),
                Item::new(
                    "Score",
                    vec![
                        Item::new("First Half", i64::from(self.first_half)),
                        Item::new("Second Half", i64::from(self.second_half)),
                    ],
                ),
            ],
        );
        Message::directives([Directive::Clear, Directive::text(GOODBYE), report.into()])
    }
}

pub struct CategorizationTask<R = StdRng> {
    config: CategorizationConfig,
    session: CategorizationSession,
    rng: R,
}

impl<R: Rng + Send> CategorizationTask<R> {
    pub fn new(config: CategorizationConfig, mut rng: R) -> std::result::Result<Self, TaskError> {
        config.validate()?;
        let session = CategorizationSession::new(&config, &mut rng);
        Ok(Self {
            config,
            session,
            rng,
        })
    }

    pub fn with_session(
        config: CategorizationConfig,
        session: CategorizationSession,
        rng: R,
    ) -> std::result::Result<Self, TaskError> {
        config.validate()?;
        Ok(Self {
            config,
            session,
            rng,
        })
    }

    pub fn session(&self) -> &CategorizationSession {
        &self.session
    }

    /// Capabilities, success/failure predicates, the end condition, and the
    /// default "disable every input once one is used" behavior.
    pub fn setup(&self) -> Message {
        Message::field(
            "require",
            json!({
                "options": ["T", "R", "in", "onin", "df", "*", "bg", "lc", "shape"],
                "shapes": 2,
                "colors": 4,
            }),
        )
        .with_field(
            "task",
            json!({
                "good": [[FEEDBACK_FIELD, CORRECT]],
                "bad": [[FEEDBACK_FIELD, INCORRECT]],
                "end": [[TRIAL_FIELD, self.config.trials]],
            }),
        )
        .with_field(
            "df",
            json!({
                "onin": {
                    "*": { "scope": 2 },
                    "in": 0,
                }
            }),
        )
    }

    /// Screen for one trial: counter, stimulus, and one button per category.
    pub fn trial_screen(&self, trial: u32, stimulus: Stimulus) -> Message {
        let buttons = self
            .session
            .category_names
            .iter()
            .map(|name| Item::new(name.as_str(), false))
            .collect::<Vec<_>>();
        Message::directives([
            Directive::Clear,
            Item::new(TRIAL_FIELD, i64::from(trial))
                .with_options(Options::new().max(i64::from(self.config.trials)))
                .into(),
            Item::new(self.config.prompt(), vec![self.session.render(stimulus)]).into(),
            Item::anonymous(buttons).into(),
        ])
    }

    pub fn feedback(correct: bool) -> Message {
        let text = if correct { CORRECT } else { INCORRECT };
        let item = Item::new(FEEDBACK_FIELD, text).with_options(Options::new().title(""));
        Message::directives([Directive::from(item)])
    }

    fn random_stimulus(&mut self) -> Stimulus {
        [
            self.rng.gen_range(0..2),
            self.rng.gen_range(0..2),
            self.rng.gen_range(0..2),
        ]
    }
}

#[async_trait]
impl<R: Rng + Send> Task for CategorizationTask<R> {
    fn name(&self) -> &'static str {
        "categorize"
    }

    async fn run(&mut self, channel: &mut dyn TaskChannel) -> Result<TaskOutcome> {
        channel.send(&self.setup()).await?;

        let mut correct = Vec::with_capacity(self.config.trials as usize);
        for trial in 1..=self.config.trials {
            let stimulus = self.random_stimulus();
            channel.send(&self.trial_screen(trial, stimulus)).await?;

            let response = channel.recv().await?;
            if response.value.is_none() {
                return Err(ChannelError::InvalidMessage(format!(
                    "response from {} carries no value",
                    response.field
                ))
                .into());
            }
            let is_correct = self
                .session
                .check_correct(stimulus, &response.field)
                .ok_or_else(|| {
                    ChannelError::InvalidMessage(format!(
                        "{} is not a category name",
                        response.field
                    ))
                })?;
            debug!(trial, ?stimulus, label = %response.field, is_correct, "categorization trial");
            correct.push(is_correct);

            channel.send(&Self::feedback(is_correct)).await?;
            channel
                .send(&Message::pause_for(self.config.pause.as_secs_f64()))
                .await?;
            channel.recv().await?;
        }

        let summary = Summary::new(&self.session, &correct);
        channel.send(&summary.to_message()).await?;

        info!(
            rule = summary.rule.label(),
            first_half = summary.first_half,
            second_half = summary.second_half,
            "categorization finished"
        );
        Ok(TaskOutcome::Categorization(summary))
    }
}
