pub mod calculator;
pub mod remote;
pub mod traits;
pub mod types;

pub use calculator::{calculate, LocalAnalyzer};
pub use remote::RemoteAnalyzer;
pub use traits::DealAnalyzer;
pub use types::{DealAnalysisInput, DealMetrics, Roi};
