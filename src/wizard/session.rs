use std::collections::HashMap;

use chrono::Local;
use thiserror::Error;

use super::step::WizardStep;
use crate::engine::{recompute, EngineError};
use crate::models::{default_aggregate, ScopeOneAggregate, Snapshot};
use crate::store::{KeyValueStore, SnapshotStore, StoreError};

/// The discrete user actions the wizard core reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardCommand {
    SubmitRawValues {
        values: HashMap<String, f64>,
        target_year: String,
    },
    SaveSnapshot {
        label: String,
    },
    LoadSnapshot {
        index: usize,
    },
    DeleteSnapshot {
        index: usize,
    },
    GoToStep {
        step: WizardStep,
    },
    NextStep,
    PreviousStep,
}

#[derive(Debug, Error)]
pub enum WizardError {
    #[error("raw values can only be submitted from the input step")]
    NotInInputStep,
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Holds the working aggregate, the active step and a mirror of the
/// persisted snapshot list, and advances all three through `apply`.
pub struct WizardSession<S: KeyValueStore> {
    aggregate: ScopeOneAggregate,
    step: WizardStep,
    snapshots: Vec<Snapshot>,
    store: SnapshotStore<S>,
}

impl<S: KeyValueStore> WizardSession<S> {
    /// Opens a session on the default dataset plus whatever snapshots the
    /// medium already holds.
    pub fn new(medium: S) -> Result<Self, WizardError> {
        Self::with_aggregate(medium, default_aggregate())
    }

    pub fn with_aggregate(medium: S, aggregate: ScopeOneAggregate) -> Result<Self, WizardError> {
        let store = SnapshotStore::new(medium);
        let snapshots = store.list()?;
        Ok(Self {
            aggregate,
            step: WizardStep::INITIAL,
            snapshots,
            store,
        })
    }

    pub fn aggregate(&self) -> &ScopeOneAggregate {
        &self.aggregate
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn apply(&mut self, command: WizardCommand) -> Result<(), WizardError> {
        match command {
            WizardCommand::SubmitRawValues {
                values,
                target_year,
            } => {
                if self.step != WizardStep::Input {
                    return Err(WizardError::NotInInputStep);
                }
                self.aggregate = recompute(&values, &self.aggregate, &target_year)?;
                // A successful submission always lands on the overview.
                self.step = WizardStep::Overview;
            }
            WizardCommand::SaveSnapshot { label } => {
                let label = if label.trim().is_empty() {
                    format!("保存 - {}", Local::now().format("%Y/%-m/%-d"))
                } else {
                    label
                };
                let snapshot = self.store.save(&self.aggregate, &label)?;
                self.snapshots.push(snapshot);
            }
            WizardCommand::LoadSnapshot { index } => {
                // Loading replaces the working aggregate; the step stays
                // where the user is.
                self.aggregate = self.store.load(index)?;
            }
            WizardCommand::DeleteSnapshot { index } => {
                self.store.remove(index)?;
                self.snapshots.remove(index);
            }
            WizardCommand::GoToStep { step } => {
                self.step = step;
            }
            WizardCommand::NextStep => {
                self.step = self.step.next();
            }
            WizardCommand::PreviousStep => {
                self.step = self.step.previous();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn entered(values: &[(&str, f64)]) -> HashMap<String, f64> {
        values
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    fn submit_sample(session: &mut WizardSession<MemoryStore>) {
        session
            .apply(WizardCommand::GoToStep {
                step: WizardStep::Input,
            })
            .expect("go to input");
        session
            .apply(WizardCommand::SubmitRawValues {
                values: entered(&[
                    ("社有車", 100.0),
                    ("定置燃焼機器", 50.0),
                    ("空調設備", 30.0),
                    ("その他", 20.0),
                ]),
                target_year: "2023年度".to_string(),
            })
            .expect("submit raw values");
    }

    #[test]
    fn session_starts_on_overview_with_the_default_dataset() {
        let session = WizardSession::new(MemoryStore::new()).expect("session");
        assert_eq!(session.step(), WizardStep::Overview);
        assert_eq!(session.aggregate(), &default_aggregate());
        assert!(session.snapshots().is_empty());
    }

    #[test]
    fn submit_outside_input_step_is_rejected() {
        let mut session = WizardSession::new(MemoryStore::new()).expect("session");
        let error = session
            .apply(WizardCommand::SubmitRawValues {
                values: entered(&[("社有車", 10.0)]),
                target_year: "2023年度".to_string(),
            })
            .expect_err("submit from overview");

        assert!(matches!(error, WizardError::NotInInputStep));
        assert_eq!(session.aggregate(), &default_aggregate());
    }

    #[test]
    fn submit_from_input_recomputes_and_lands_on_overview() {
        let mut session = WizardSession::new(MemoryStore::new()).expect("session");
        submit_sample(&mut session);

        assert_eq!(session.step(), WizardStep::Overview);
        assert_eq!(session.aggregate().total, 200.0);
        assert_eq!(session.aggregate().categories[0].percentage, 50.0);
    }

    #[test]
    fn empty_label_falls_back_to_a_generated_one() {
        let mut session = WizardSession::new(MemoryStore::new()).expect("session");
        session
            .apply(WizardCommand::SaveSnapshot {
                label: "  ".to_string(),
            })
            .expect("save");

        assert!(session.snapshots()[0].label.starts_with("保存 - "));
    }

    #[test]
    fn load_replaces_the_aggregate_and_keeps_the_step() {
        let mut session = WizardSession::new(MemoryStore::new()).expect("session");
        submit_sample(&mut session);
        session
            .apply(WizardCommand::SaveSnapshot {
                label: "after entry".to_string(),
            })
            .expect("save");
        let saved = session.aggregate().clone();

        session
            .apply(WizardCommand::GoToStep {
                step: WizardStep::Details,
            })
            .expect("go to details");
        session
            .apply(WizardCommand::LoadSnapshot { index: 0 })
            .expect("load");

        assert_eq!(session.step(), WizardStep::Details);
        assert_eq!(session.aggregate(), &saved);
    }

    #[test]
    fn delete_updates_the_mirror_and_shifts_indices() {
        let mut session = WizardSession::new(MemoryStore::new()).expect("session");
        session
            .apply(WizardCommand::SaveSnapshot {
                label: "A".to_string(),
            })
            .expect("save A");
        session
            .apply(WizardCommand::SaveSnapshot {
                label: "B".to_string(),
            })
            .expect("save B");

        session
            .apply(WizardCommand::DeleteSnapshot { index: 0 })
            .expect("delete first");

        assert_eq!(session.snapshots().len(), 1);
        assert_eq!(session.snapshots()[0].label, "B");
    }

    #[test]
    fn session_startup_loads_persisted_snapshots() {
        let mut seeded = SnapshotStore::new(MemoryStore::new());
        seeded
            .save(&default_aggregate(), "earlier run")
            .expect("seed save");

        let session = WizardSession::new(seeded.into_medium()).expect("session");
        assert_eq!(session.snapshots().len(), 1);
        assert_eq!(session.snapshots()[0].label, "earlier run");
    }

    #[test]
    fn step_navigation_saturates_at_both_ends() {
        let mut session = WizardSession::new(MemoryStore::new()).expect("session");

        session.apply(WizardCommand::NextStep).expect("next");
        session.apply(WizardCommand::NextStep).expect("next");
        session.apply(WizardCommand::NextStep).expect("next past end");
        assert_eq!(session.step(), WizardStep::Reduction);

        for _ in 0..4 {
            session.apply(WizardCommand::PreviousStep).expect("previous");
        }
        assert_eq!(session.step(), WizardStep::Input);
    }
}
