//! Per-session editor context.
//!
//! An [`EditorSession`] owns everything one editor works on: the working
//! grid, its [`EditHistory`], the id of the conversion it is waiting for and
//! the editor [`Preferences`]. Sessions share nothing, so a session needs no
//! internal locking; whoever owns it serializes access.
//!
//! Conversions are asynchronous from the session's point of view:
//! [`begin_conversion`](EditorSession::begin_conversion) hands out a request
//! with a fresh id, superseding any earlier one, and
//! [`complete`](EditorSession::complete) accepts only the response for the
//! latest id. Whole-grid replacement commits to history; cell edits change
//! the working copy only until [`commit`](EditorSession::commit) is called.

mod error;
mod preferences;

pub use error::SessionError;
pub use preferences::{BrushTool, EditorMode, Preferences, BRUSH_SIZE_RANGE};

use crate::api::Config;
use crate::grid::{CellUpdate, Grid};
use crate::history::EditHistory;
use crate::protocol::{
    ConversionPayload, ConversionRequest, ConversionResponse, ConversionResult, RequestId,
    RequestKind,
};
use crate::resample::SourceImage;

/// What [`EditorSession::complete`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A grid result replaced the working grid and was committed
    Applied,
    /// A resample or quantize result, returned to the caller untouched
    Delivered(ConversionResult),
    /// The worker reported an error; it is now the session error
    Failed(String),
    /// The response belongs to a superseded request and was ignored
    Stale,
}

/// Editor state for one user session.
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    grid: Option<Grid>,
    history: EditHistory,
    request_seq: u64,
    pending: Option<RequestId>,
    error: Option<String>,
    preferences: Preferences,
}

impl EditorSession {
    /// Empty session with the default history limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty session keeping up to `limit` history snapshots.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: EditHistory::with_limit(limit),
            ..Self::default()
        }
    }

    /// The working grid.
    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    /// Id of the conversion the session is waiting for.
    pub fn pending_request(&self) -> Option<&RequestId> {
        self.pending.as_ref()
    }

    /// Last conversion error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Whether the working grid differs from the snapshot at the cursor.
    pub fn is_dirty(&self) -> bool {
        self.grid.as_ref() != self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ------------------------------------------------------------------
    // Conversion
    // ------------------------------------------------------------------

    /// Start a conversion, superseding any pending one.
    ///
    /// Ids are `req-1`, `req-2`, ... per session. The session error is
    /// cleared.
    pub fn begin_conversion(
        &mut self,
        kind: RequestKind,
        image: SourceImage,
        config: Config,
    ) -> ConversionRequest {
        self.request_seq += 1;
        let request_id = RequestId::new(format!("req-{}", self.request_seq));
        self.pending = Some(request_id.clone());
        self.error = None;
        ConversionRequest::new(
            kind,
            ConversionPayload {
                image_data: Some(image),
                config: Some(config),
                request_id,
            },
        )
    }

    /// Accept a worker response.
    ///
    /// Responses whose id is not the pending one are [`Completion::Stale`]
    /// and leave the session untouched.
    pub fn complete(&mut self, response: ConversionResponse) -> Completion {
        if self.pending.as_ref() != Some(&response.request_id) {
            return Completion::Stale;
        }
        self.pending = None;

        if let Some(err) = response.error {
            self.error = Some(err.clone());
            return Completion::Failed(err);
        }

        match response.result {
            Some(ConversionResult::Grid(grid)) => {
                self.set_grid(grid);
                Completion::Applied
            }
            Some(other) => Completion::Delivered(other),
            None => {
                let err = "response carried neither result nor error".to_string();
                self.error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    /// Replace the working grid and commit it.
    pub fn set_grid(&mut self, grid: Grid) {
        self.history.commit(&grid);
        self.grid = Some(grid);
        self.preferences.selected_color = 0;
    }

    // ------------------------------------------------------------------
    // Editing (working copy only)
    // ------------------------------------------------------------------

    fn grid_mut(&mut self) -> Result<&mut Grid, SessionError> {
        self.grid.as_mut().ok_or(SessionError::NoGrid)
    }

    /// Set one cell of the working grid.
    pub fn set_cell(&mut self, x: u32, y: u32, color_index: usize) -> Result<bool, SessionError> {
        Ok(self.grid_mut()?.set_cell(x, y, color_index)?)
    }

    /// Apply updates atomically to the working grid.
    pub fn set_cells(&mut self, updates: &[CellUpdate]) -> Result<usize, SessionError> {
        Ok(self.grid_mut()?.set_cells(updates)?)
    }

    /// Paint at `(x, y)` with the selected color and brush size.
    pub fn paint(&mut self, x: u32, y: u32) -> Result<usize, SessionError> {
        let Preferences {
            selected_color,
            brush_size,
            ..
        } = self.preferences;
        Ok(self
            .grid_mut()?
            .paint(x, y, u32::from(brush_size), selected_color)?)
    }

    /// Flood fill from `(x, y)` on the working grid.
    pub fn fill(&mut self, x: u32, y: u32, color_index: usize) -> Result<usize, SessionError> {
        Ok(self.grid_mut()?.flood_fill(x, y, color_index)?)
    }

    /// Eyedropper: select the color index under `(x, y)`.
    pub fn pick(&mut self, x: u32, y: u32) -> Result<usize, SessionError> {
        let grid = self.grid.as_ref().ok_or(SessionError::NoGrid)?;
        let index = grid
            .cell(x, y)
            .map(|c| c.color_index())
            .ok_or(crate::grid::GridError::OutOfBounds { x, y })?;
        self.preferences.selected_color = index;
        Ok(index)
    }

    /// Apply the active tool at `(x, y)`.
    ///
    /// Returns the number of cells changed (0 for the eyedropper).
    pub fn apply_tool(&mut self, x: u32, y: u32) -> Result<usize, SessionError> {
        match self.preferences.tool {
            BrushTool::Pixel => self.paint(x, y),
            BrushTool::Fill => self.fill(x, y, self.preferences.selected_color),
            BrushTool::Eyedropper => self.pick(x, y).map(|_| 0),
        }
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Commit the working grid as a new snapshot.
    pub fn commit(&mut self) -> Result<(), SessionError> {
        let grid = self.grid.as_ref().ok_or(SessionError::NoGrid)?;
        self.history.commit(grid);
        Ok(())
    }

    /// Step back; the working grid becomes the previous snapshot.
    ///
    /// Returns false (and changes nothing) at the start of history.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(grid) => {
                self.grid = Some(grid);
                true
            }
            None => false,
        }
    }

    /// Step forward; returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(grid) => {
                self.grid = Some(grid);
                true
            }
            None => false,
        }
    }

    /// Discard uncommitted edits by restoring the snapshot at the cursor.
    pub fn revert(&mut self) -> bool {
        match self.history.current() {
            Some(snapshot) => {
                self.grid = Some(snapshot.clone());
                true
            }
            None => false,
        }
    }

    /// Forget all snapshots. The working grid is kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // ------------------------------------------------------------------
    // Preferences
    // ------------------------------------------------------------------

    /// Replace the preferences after validating them.
    pub fn set_preferences(&mut self, preferences: Preferences) -> Result<(), SessionError> {
        preferences.validate()?;
        self.preferences = preferences;
        Ok(())
    }

    pub fn set_mode(&mut self, mode: EditorMode) {
        self.preferences.mode = mode;
    }

    pub fn set_tool(&mut self, tool: BrushTool) {
        self.preferences.tool = tool;
    }

    pub fn set_brush_size(&mut self, size: u8) -> Result<(), SessionError> {
        if !BRUSH_SIZE_RANGE.contains(&size) {
            return Err(SessionError::BrushSize(size));
        }
        self.preferences.brush_size = size;
        Ok(())
    }

    pub fn select_color(&mut self, index: usize) {
        self.preferences.selected_color = index;
    }

    pub fn toggle_grid_overlay(&mut self) -> bool {
        self.preferences.show_grid = !self.preferences.show_grid;
        self.preferences.show_grid
    }
}
