pub mod config;
pub mod ids;
pub mod project;

pub use config::{
    AppConfig, ConversionConfig, ExportConfig, HistoryConfig, ServerConfig, UploadConfig,
    UploadFormat,
};
pub use ids::{ProjectId, SessionId};
pub use project::Project;
