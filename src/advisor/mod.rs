pub mod lifecycle;
pub mod linker;

pub use lifecycle::{decide, open_request, Decision, Verdict};
pub use linker::request_for_property;
