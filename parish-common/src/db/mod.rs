//! Database layer: initialization, migrations, models, and queries

pub mod counter;
pub mod init;
pub mod migrations;
pub mod models;
pub mod queries;

pub use counter::{allocate_content_id, next_content_id};
pub use init::{ensure_setting, get_setting, init_database};
pub use migrations::run_migrations;
pub use models::*;
