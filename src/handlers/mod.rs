// Handler modules
pub mod audit;
pub mod diagnose;
pub mod optimize;
pub mod overview;
pub mod rules;
pub mod utils;

// Re-export all handler functions
pub use audit::handle_audit;
pub use diagnose::handle_diagnose;
pub use optimize::handle_optimize;
pub use overview::handle_overview;
pub use rules::handle_rules;
