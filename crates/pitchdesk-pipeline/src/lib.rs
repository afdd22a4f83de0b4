//! Two-stage outreach generation: research a company, then draft three
//! personalised emails against the active rightsholder profile.

pub mod error;
pub mod pipeline;
pub mod sources;

pub use error::PipelineError;
pub use pipeline::{Generation, Generator};
pub use sources::{HistorySink, ProfileProvider};
