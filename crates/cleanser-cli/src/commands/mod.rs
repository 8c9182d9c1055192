//! Command implementations.

pub mod analyze;
pub mod clean;
pub mod init;
pub mod run;

pub use self::analyze::execute_analyze;
pub use self::clean::execute_clean;
pub use self::init::execute_init;
pub use self::run::execute_run;
