//! The interactive pixel grid editor.
//!
//! A [`PixelEditor`] owns the current [`PixelGrid`], a bounded undo history and the tool
//! state. Painting and filling mutate the grid directly; history is captured once per
//! stroke. A stroke is opened with [`PixelEditor::begin_stroke`] (or
//! [`PixelEditor::pointer_down`]) and closed with [`PixelEditor::end_stroke`] (or
//! [`PixelEditor::pointer_up`] / [`PixelEditor::pointer_leave`]).

mod history;
mod tool;

pub use tool::{Tool, ToolState};

use crate::{grid::transparent, PixelGrid, DEFAULT_HISTORY_LIMIT, GRID_CELLS, GRID_SIZE};
use bitvec::vec::BitVec;
use history::History;
use palette::Srgba;

/// Options for a [`PixelEditor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EditorOptions {
    /// The maximum number of history snapshots kept.
    history_limit: usize,
}

impl EditorOptions {
    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self { history_limit: DEFAULT_HISTORY_LIMIT }
    }

    /// Sets the maximum number of history snapshots, including the initial one.
    ///
    /// Once exceeded, the oldest snapshot is dropped. A limit of zero is treated as one.
    #[must_use]
    pub const fn history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// Gets the history limit.
    #[must_use]
    pub const fn get_history_limit(&self) -> usize {
        self.history_limit
    }
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Which buffer is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    /// The editable grid.
    Editor,
    /// A read-only reference image. Edits are rejected.
    Reference,
}

/// The stroke in progress.
#[derive(Debug, Clone, Copy)]
struct Stroke {
    /// The tool active when the stroke began.
    tool: Tool,
    /// Whether the stroke changed the grid.
    dirty: bool,
}

/// Editor for a single [`PixelGrid`] with undo and redo.
///
/// # Examples
/// ```
/// # use pixelette::{PixelEditor, PixelGrid};
/// # use palette::Srgba;
/// let red = Srgba::new(255, 0, 0, 255);
/// let mut editor = PixelEditor::new(PixelGrid::default());
/// editor.set_selected_color(Some(red));
///
/// editor.pointer_down(0, 0);
/// editor.pointer_move(1, 0);
/// editor.pointer_up();
/// assert_eq!(editor.grid().get(1, 0), Some(red));
///
/// editor.undo();
/// assert_eq!(editor.grid(), &PixelGrid::default());
/// ```
#[derive(Debug, Clone)]
pub struct PixelEditor {
    /// The working grid.
    grid: PixelGrid,
    /// Snapshots of committed strokes.
    history: History,
    /// The active tool.
    tools: ToolState,
    /// The paint color, if any.
    selected: Option<Srgba<u8>>,
    /// The last cell written by [`PixelEditor::paint_pixel`] in the current stroke.
    last_painted: Option<(u32, u32)>,
    /// The stroke in progress.
    stroke: Option<Stroke>,
    /// Whether history was captured since the last save.
    unsaved: bool,
    /// Which buffer is shown.
    view: View,
}

impl PixelEditor {
    /// Creates an editor for `grid` with the default [`EditorOptions`].
    #[must_use]
    pub fn new(grid: PixelGrid) -> Self {
        Self::with_options(grid, EditorOptions::new())
    }

    /// Creates an editor for `grid`.
    #[must_use]
    pub fn with_options(grid: PixelGrid, options: EditorOptions) -> Self {
        Self {
            grid,
            history: History::new(grid, options.history_limit),
            tools: ToolState::default(),
            selected: None,
            last_painted: None,
            stroke: None,
            unsaved: false,
            view: View::Editor,
        }
    }

    /// Installs a new grid, resetting history to a single entry.
    ///
    /// The tool and selected color are kept.
    pub fn reset(&mut self, grid: PixelGrid) {
        log::trace!("editor reset");
        self.grid = grid;
        self.history.reset(grid);
        self.last_painted = None;
        self.stroke = None;
        self.unsaved = false;
        self.view = View::Editor;
    }

    /// The working grid.
    #[must_use]
    pub fn grid(&self) -> &PixelGrid {
        &self.grid
    }

    /// Returns the grid for encoding. History is not affected.
    #[must_use]
    pub fn commit(&self) -> PixelGrid {
        self.grid
    }

    /// The active tool.
    #[must_use]
    pub fn tool(&self) -> Tool {
        self.tools.tool()
    }

    /// The full tool state.
    #[must_use]
    pub fn tool_state(&self) -> ToolState {
        self.tools
    }

    /// Switches to `tool`.
    pub fn select_tool(&mut self, tool: Tool) {
        self.tools = self.tools.select(tool);
        log::trace!("selected {tool}");
    }

    /// The paint color.
    #[must_use]
    pub fn selected_color(&self) -> Option<Srgba<u8>> {
        self.selected
    }

    /// Sets the paint color.
    pub fn set_selected_color(&mut self, color: Option<Srgba<u8>>) {
        self.selected = color;
    }

    /// The selected color if it is visible.
    fn paint_color(&self) -> Option<Srgba<u8>> {
        self.selected.filter(|c| c.alpha > 0)
    }

    /// Whether the grid accepts edits.
    fn editable(&self) -> bool {
        self.view == View::Editor
    }

    /// Records that the grid changed.
    fn touched(&mut self) {
        if let Some(stroke) = &mut self.stroke {
            stroke.dirty = true;
        }
    }

    /// Applies the active tool to `(x, y)` as a single paint step.
    ///
    /// The eraser clears the cell to full transparency. Other tools write the selected color,
    /// unless no color is selected or it is fully transparent.
    /// Within a stroke, repeated calls on the same cell are skipped until the stroke ends.
    ///
    /// This never captures history. Returns whether the grid changed.
    pub fn paint_pixel(&mut self, x: u32, y: u32) -> bool {
        if !self.editable() || x >= GRID_SIZE || y >= GRID_SIZE {
            return false;
        }
        if self.stroke.is_some() && self.last_painted == Some((x, y)) {
            return false;
        }

        let color = if self.tool() == Tool::Eraser {
            transparent()
        } else if let Some(color) = self.paint_color() {
            color
        } else {
            return false;
        };

        if self.stroke.is_some() {
            self.last_painted = Some((x, y));
        }
        let changed = self.grid.set(x, y, color);
        if changed {
            log::trace!("painted ({x}, {y})");
            self.touched();
        }
        changed
    }

    /// Replaces the 4-connected region of cells matching the color at `(x, y)` with the
    /// selected color.
    ///
    /// Does nothing if the region already has the selected color or no visible color is
    /// selected. Outside of a stroke, a fill that changes the grid captures history once.
    /// Returns whether the grid changed.
    pub fn flood_fill(&mut self, x: u32, y: u32) -> bool {
        if !self.editable() {
            return false;
        }
        let (Some(target), Some(replacement)) = (self.grid.get(x, y), self.paint_color()) else {
            return false;
        };
        if target == replacement {
            return false;
        }

        let width = GRID_SIZE as usize;
        let cells = self.grid.pixels_mut();
        let mut visited: BitVec = BitVec::repeat(false, GRID_CELLS);
        let mut pending = vec![y as usize * width + x as usize];
        let mut filled = 0;

        while let Some(i) = pending.pop() {
            if visited[i] || cells[i] != target {
                continue;
            }
            visited.set(i, true);
            cells[i] = replacement;
            filled += 1;

            let (cx, cy) = (i % width, i / width);
            if cx > 0 {
                pending.push(i - 1);
            }
            if cx + 1 < width {
                pending.push(i + 1);
            }
            if cy > 0 {
                pending.push(i - width);
            }
            if cy + 1 < width {
                pending.push(i + width);
            }
        }

        log::trace!("filled {filled} cells from ({x}, {y})");
        if self.stroke.is_some() {
            self.touched();
        } else {
            self.capture_history();
        }
        true
    }

    /// Selects the color at `(x, y)` and returns to the tool used before the eyedropper.
    ///
    /// Returns the picked color, or `None` if `(x, y)` is out of bounds.
    pub fn pick_color(&mut self, x: u32, y: u32) -> Option<Srgba<u8>> {
        let color = self.grid.get(x, y)?;
        self.selected = Some(color);
        self.tools = self.tools.after_pick();
        log::trace!("picked {color:?} at ({x}, {y})");
        Some(color)
    }

    /// Pushes the current grid onto the history, discarding any redo entries.
    pub fn capture_history(&mut self) {
        self.last_painted = None;
        self.history.push(self.grid);
        self.unsaved = true;
        log::trace!(
            "captured history {}/{}",
            self.history.index() + 1,
            self.history.len()
        );
    }

    /// Starts a stroke. An open stroke is ended first.
    pub fn begin_stroke(&mut self) {
        self.end_stroke();
        self.stroke = Some(Stroke { tool: self.tool(), dirty: false });
        self.last_painted = None;
    }

    /// Ends the current stroke, capturing history if it changed the grid.
    ///
    /// Returns whether history was captured.
    pub fn end_stroke(&mut self) -> bool {
        self.last_painted = None;
        match self.stroke.take() {
            Some(Stroke { dirty: true, .. }) => {
                self.capture_history();
                true
            }
            _ => false,
        }
    }

    /// Whether a stroke is in progress.
    #[must_use]
    pub fn in_stroke(&self) -> bool {
        self.stroke.is_some()
    }

    /// Begins a stroke at `(x, y)` and applies the active tool there.
    ///
    /// Out of bounds coordinates are ignored.
    pub fn pointer_down(&mut self, x: u32, y: u32) {
        if !self.editable() || x >= GRID_SIZE || y >= GRID_SIZE {
            return;
        }

        self.begin_stroke();
        match self.tool() {
            Tool::Brush | Tool::Eraser => {
                self.paint_pixel(x, y);
            }
            Tool::Bucket => {
                self.flood_fill(x, y);
            }
            Tool::Eyedropper => {
                self.pick_color(x, y);
            }
        }
    }

    /// Continues a brush or eraser stroke at `(x, y)`.
    pub fn pointer_move(&mut self, x: u32, y: u32) {
        if self.stroke.is_some_and(|s| s.tool.is_continuous()) {
            self.paint_pixel(x, y);
        }
    }

    /// Ends the current stroke.
    pub fn pointer_up(&mut self) {
        self.end_stroke();
    }

    /// Ends the current stroke when the pointer leaves the grid.
    pub fn pointer_leave(&mut self) {
        self.end_stroke();
    }

    /// Drops the open stroke, restoring the grid from the current snapshot.
    ///
    /// Returns whether the stroke had changed the grid.
    fn discard_stroke(&mut self) -> bool {
        self.last_painted = None;
        match self.stroke.take() {
            Some(Stroke { dirty: true, .. }) => {
                self.grid = *self.history.current();
                log::trace!("discarded open stroke");
                true
            }
            _ => false,
        }
    }

    /// Restores the previous snapshot. Returns `false` at the oldest snapshot.
    ///
    /// If an open stroke changed the grid, only that stroke is rolled back and the history
    /// index stays put.
    pub fn undo(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        if self.discard_stroke() {
            return true;
        }
        match self.history.undo() {
            Some(grid) => {
                self.grid = *grid;
                log::trace!("undo to {}", self.history.index());
                true
            }
            None => false,
        }
    }

    /// Restores the next snapshot. Returns `false` at the newest snapshot.
    ///
    /// An open stroke is rolled back first.
    pub fn redo(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        let discarded = self.discard_stroke();
        match self.history.redo() {
            Some(grid) => {
                self.grid = *grid;
                log::trace!("redo to {}", self.history.index());
                true
            }
            None => discarded,
        }
    }

    /// Whether [`PixelEditor::undo`] would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`PixelEditor::redo`] would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The number of history snapshots.
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// The position of the current snapshot in the history.
    #[must_use]
    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    /// The maximum number of history snapshots.
    #[must_use]
    pub fn history_limit(&self) -> usize {
        self.history.limit()
    }

    /// Whether history was captured since the editor was created, reset or saved.
    #[must_use]
    pub fn has_unsaved_edits(&self) -> bool {
        self.unsaved
    }

    /// Clears the unsaved edits flag.
    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    /// Switches to the reference view. An open stroke is ended first.
    pub fn show_reference(&mut self) {
        self.end_stroke();
        self.view = View::Reference;
    }

    /// Switches back to the editor, restoring the grid from the current history snapshot.
    pub fn show_editor(&mut self) {
        self.grid = *self.history.current();
        self.view = View::Editor;
    }

    /// Whether the reference view is shown.
    #[must_use]
    pub fn showing_reference(&self) -> bool {
        self.view == View::Reference
    }
}
