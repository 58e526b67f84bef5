pub mod session;
pub mod step;

pub use session::{WizardCommand, WizardError, WizardSession};
pub use step::WizardStep;
