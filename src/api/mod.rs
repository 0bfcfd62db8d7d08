pub mod convert;
pub mod edit;
pub mod export;
pub mod sessions;

pub use convert::{handle_convert, ConvertParams, __path_handle_convert};
pub use edit::{
    handle_apply_tool, handle_clear_history, handle_commit, handle_fill, handle_redo,
    handle_revert, handle_set_pixels, handle_undo, EditResponse, FillRequest, HistoryResponse,
    PixelsRequest, ToolRequest, __path_handle_apply_tool, __path_handle_clear_history,
    __path_handle_commit, __path_handle_fill, __path_handle_redo, __path_handle_revert,
    __path_handle_set_pixels, __path_handle_undo,
};
pub use export::{handle_export, ExportParams, __path_handle_export};
pub use sessions::{
    handle_create_session, handle_delete_session, handle_get_session, handle_project,
    handle_update_preferences, HistoryView, PreferencesUpdate, ProjectParams, SessionCreated,
    SessionView, __path_handle_create_session, __path_handle_delete_session,
    __path_handle_get_session, __path_handle_project, __path_handle_update_preferences,
};
