//! Workflow helpers chaining context, query and journey calls
//!
//! [`QuickChain`] offers the individual two-step compositions;
//! [`AreaExplorer`] runs the full discover/query/select/plan pipeline and
//! reports failures as data.

mod chain;
mod explorer;
mod selection;
mod settings;
mod stage;

pub use chain::{CategoryResults, ContextQuery, Discovery, JourneyPlan, QuickChain};
pub use explorer::{AreaExplorer, ExplorationResult, ExploreRequest, JourneySummary};
pub use selection::{PoiCandidate, SelectedPoi, score, select_pois};
pub use settings::{SettingsError, WorkflowSettings};
pub use stage::{Stage, WorkflowState};
