pub mod growth_stage;
pub mod response;
pub mod violation;

pub use growth_stage::{GrowthStage, StageTargets, UnknownGrowthStage};
pub use response::{AnalysisResponse, Priority, ProductLink, Recommendation};
pub use violation::{Violation, AT_LEAST_ONE_PRODUCT};
