//! Configuration loading

mod file_config;
mod loader;

pub use file_config::{
    FileBehaviorConfig, FileChairmanConfig, FileConfig, FileCouncilConfig, FileCouncilorConfig,
    FileProviderConfig,
};
pub use loader::ConfigLoader;
