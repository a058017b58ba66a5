//! Core of the InvestorIQ real-estate marketplace: deal economics, listing
//! search, and the advisor review workflow, over a hosted backend.

pub mod advisor;
pub mod analysis;
pub mod config;
pub mod error;
pub mod filter;
pub mod marketplace;
pub mod models;
pub mod session;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{MarketError, Result, ValidationError};
pub use marketplace::Marketplace;
pub use session::Session;
