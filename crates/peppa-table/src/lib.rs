pub mod advisory;
pub mod config;
pub mod logging;
pub mod scheduler;
pub mod table;

pub use advisory::{Advisor, AdvisoryError, Attempt, CommandAdvisor};
pub use config::{AdvisoryConfig, ConfigError, LoggingConfig, TableConfig, ValidationError};
pub use logging::{LoggingGuard, init_logging};
pub use table::{Table, TableError};
