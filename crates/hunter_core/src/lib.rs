//! Hunter core: pure observer state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{
    Deal, JobSummary, ObserverPhase, ObserverState, ScanId, ScanParams, ScanSnapshot, ScanStage,
    ScanStats, ScanStatus, Seq,
};
pub use update::update;
pub use view_model::{DashboardView, JobRowView};
