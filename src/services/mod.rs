pub mod conversion;
pub mod export;
pub mod session_store;
pub mod source;

pub use conversion::ConversionService;
pub use export::{ExportError, PngExporter};
pub use session_store::{
    InMemorySessionStore, SessionEntry, SessionStore, SharedSession, StoredSource,
};
pub use source::{DecodedSource, SourceDecoder, SourceError};
