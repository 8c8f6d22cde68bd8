use crate::error::Result;
use crate::notify::{Message, Observer};
use crate::trainer::{Phase, TrainerState};

/// Accuracy below this value triggers an iteration-limit bump.
pub const ACCURACY_THRESHOLD: f64 = 0.9;

/// Amount added to the iteration limit per adjustment.
pub const ITERATION_STEP: u64 = 100;

/// Logs the trainer's accuracy on `accuracy` messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyLogger;

impl AccuracyLogger {
    /// The line logged for this notification, if the message is relevant.
    pub fn describe(&self, subject: &TrainerState, message: Message) -> Option<String> {
        if !message.is_accuracy() {
            return None;
        }
        Some(format!(
            "{} accuracy: {:.1}%",
            subject.strategy().name(),
            subject.accuracy() * 100.0
        ))
    }
}

impl Observer<TrainerState> for AccuracyLogger {
    fn update(&self, subject: &mut TrainerState, message: Message) -> Result<()> {
        if let Some(line) = self.describe(subject, message) {
            log::info!("{}", line);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "AccuracyLogger"
    }
}

/// Logs training progress on every message that is not an accuracy report.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressMonitor;

impl ProgressMonitor {
    pub fn describe(&self, subject: &TrainerState, message: Message) -> Option<String> {
        if message.is_accuracy() {
            return None;
        }
        Some(format!("Training progress: {}% complete", subject.progress()))
    }
}

impl Observer<TrainerState> for ProgressMonitor {
    fn update(&self, subject: &mut TrainerState, message: Message) -> Result<()> {
        if let Some(line) = self.describe(subject, message) {
            log::info!("{}", line);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ProgressMonitor"
    }
}

/// Raises the fitted model's iteration limit when accuracy is poor.
///
/// The adjustment fires on the tuning notification a trainer sends after
/// scoring: a non-accuracy message while the subject is `Scored`. Earlier
/// notifications in the same run see either a stale accuracy or the
/// accuracy report itself and are ignored, so one run bumps the limit at
/// most once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterChanger;

impl ParameterChanger {
    pub fn should_adjust(&self, subject: &TrainerState, message: Message) -> bool {
        !message.is_accuracy()
            && subject.phase() == Phase::Scored
            && subject.accuracy() < ACCURACY_THRESHOLD
    }
}

impl Observer<TrainerState> for ParameterChanger {
    fn update(&self, subject: &mut TrainerState, message: Message) -> Result<()> {
        if !self.should_adjust(subject, message) {
            return Ok(());
        }

        if let Some(tunable) = subject.iteration_tuning_mut() {
            let next = tunable.max_iterations() + ITERATION_STEP;
            log::info!("Accuracy below 90%, increasing max_iter to {}", next);
            tunable.set_max_iterations(next);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "ParameterChanger"
    }
}
