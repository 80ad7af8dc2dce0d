pub mod commands;
pub mod display;
pub mod instance;
pub mod prompt;

pub use self::commands::CliArgs;
