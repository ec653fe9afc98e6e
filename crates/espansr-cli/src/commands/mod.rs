//! Command implementations for espansr-cli

pub mod doctor;
pub mod launcher;
pub mod list;
pub mod restart;
pub mod status;
pub mod sync;
pub mod validate;

pub use doctor::run_doctor;
pub use launcher::run_launcher;
pub use list::run_list;
pub use restart::run_restart;
pub use status::run_status;
pub use sync::run_sync;
pub use validate::run_validate;
