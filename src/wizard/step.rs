use serde::{Deserialize, Serialize};

/// The four analysis steps, in navigation order. Only `Input` permits
/// raw-value mutation; the other three present a read view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WizardStep {
    Input,
    Overview,
    Details,
    Reduction,
}

impl WizardStep {
    /// The wizard opens on the overview; data entry is entered only on
    /// explicit request.
    pub const INITIAL: WizardStep = WizardStep::Overview;

    pub fn id(self) -> &'static str {
        match self {
            WizardStep::Input => "input",
            WizardStep::Overview => "overview",
            WizardStep::Details => "details",
            WizardStep::Reduction => "reduction",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "input" => Some(WizardStep::Input),
            "overview" => Some(WizardStep::Overview),
            "details" => Some(WizardStep::Details),
            "reduction" => Some(WizardStep::Reduction),
            _ => None,
        }
    }

    /// Advances one step; a no-op at the terminal step.
    pub fn next(self) -> Self {
        match self {
            WizardStep::Input => WizardStep::Overview,
            WizardStep::Overview => WizardStep::Details,
            WizardStep::Details => WizardStep::Reduction,
            WizardStep::Reduction => WizardStep::Reduction,
        }
    }

    /// Retreats one step; a no-op at the first step.
    pub fn previous(self) -> Self {
        match self {
            WizardStep::Input => WizardStep::Input,
            WizardStep::Overview => WizardStep::Input,
            WizardStep::Details => WizardStep::Overview,
            WizardStep::Reduction => WizardStep::Details,
        }
    }
}
