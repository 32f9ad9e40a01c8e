//! Contains [`Session`], which ties loading, the pipeline, and the editor together.

use super::{ImageSource, PipelineOptions, PixelArtPipeline};
use crate::{EditorOptions, Palette, PaletteSize, PixelEditor, PixelGrid, Raster, Result};

/// Identifies one call to [`Session::begin_load`].
///
/// Only the ticket of the most recent load can install its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(u64);

/// What [`Session::complete_load`] did with a loaded raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The raster was processed and its grid is now being edited.
    Installed,
    /// A newer load was started or the session was closed. Nothing changed.
    Superseded,
}

/// An editing session: the retained source image, its palette, and the editor for the
/// generated grid.
///
/// Loading is split into [`Session::begin_load`] and [`Session::complete_load`] so that
/// callers can run the load elsewhere. A completion that arrives after a newer load was
/// started, or after [`Session::close`], is ignored.
///
/// # Examples
/// ```
/// # use pixelette::{LoadOutcome, PaletteSize, Raster, Session};
/// # use palette::Srgba;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut session = Session::default();
///
/// let first = session.begin_load();
/// let second = session.begin_load();
/// let raster = Raster::filled(32, 32, Srgba::new(200, 40, 40, 255))?;
///
/// assert_eq!(session.complete_load(first, Ok(raster.clone()))?, LoadOutcome::Superseded);
/// assert_eq!(session.complete_load(second, Ok(raster))?, LoadOutcome::Installed);
///
/// session.set_palette_size(PaletteSize::try_from(4)?);
/// assert!(session.palette().is_some_and(|p| p.len() <= 4));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The pipeline options used for every load.
    options: PipelineOptions,
    /// The options for new editors.
    editor_options: EditorOptions,
    /// The most recently installed source image.
    source: Option<Raster>,
    /// The palette extracted from `source`.
    palette: Option<Palette>,
    /// The editor for the grid generated from `source`.
    editor: Option<PixelEditor>,
    /// The number of loads started so far.
    generation: u64,
    /// Whether [`Session::close`] was called.
    closed: bool,
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new(options: PipelineOptions, editor_options: EditorOptions) -> Self {
        Self {
            options,
            editor_options,
            ..Self::default()
        }
    }

    /// Starts a load, invalidating any load started before.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    /// Whether `ticket` belongs to the latest load of an open session.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        !self.closed && ticket.0 == self.generation
    }

    /// Finishes the load for `ticket`.
    ///
    /// If the ticket is current, the raster is run through the pipeline and its grid is
    /// installed in the editor with a fresh history. Stale tickets are ignored, including
    /// their errors.
    ///
    /// # Errors
    /// Returns the error in `result` if the ticket is current.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Raster>,
    ) -> Result<LoadOutcome> {
        if !self.is_current(ticket) {
            log::debug!("ignoring superseded load {}", ticket.0);
            return Ok(LoadOutcome::Superseded);
        }

        let raster = result?;
        self.install(raster);
        Ok(LoadOutcome::Installed)
    }

    /// Loads a raster from `source` and installs it.
    ///
    /// # Errors
    /// Returns the error of `source`.
    pub async fn load(&mut self, source: &impl ImageSource) -> Result<LoadOutcome> {
        let ticket = self.begin_load();
        let result = source.load().await;
        self.complete_load(ticket, result)
    }

    /// Runs the pipeline on `raster` and hands its grid to the editor.
    fn install(&mut self, raster: Raster) {
        let (palette, grid) = self.run(&raster);
        log::debug!(
            "installed {}x{} raster with {} colors",
            raster.width(),
            raster.height(),
            palette.len()
        );

        if let Some(editor) = &mut self.editor {
            editor.reset(grid);
        } else {
            self.editor = Some(PixelEditor::with_options(grid, self.editor_options));
        }
        self.palette = Some(palette);
        self.source = Some(raster);
    }

    /// Runs the pipeline with the current options.
    fn run(&self, raster: &Raster) -> (Palette, PixelGrid) {
        let pipeline = PixelArtPipeline::with_options(raster, self.options);
        #[cfg(feature = "threads")]
        {
            pipeline.pixel_art_par()
        }
        #[cfg(not(feature = "threads"))]
        {
            pipeline.pixel_art()
        }
    }

    /// Changes the palette size and reruns the pipeline on the retained source image.
    ///
    /// Edits to the previous grid are discarded. Returns whether a grid was regenerated.
    pub fn set_palette_size(&mut self, k: PaletteSize) -> bool {
        self.options.palette_size = k;
        match (self.closed, self.source.take()) {
            (false, Some(raster)) => {
                self.install(raster);
                true
            }
            (_, source) => {
                self.source = source;
                false
            }
        }
    }

    /// Tears the session down. Pending loads complete as [`LoadOutcome::Superseded`].
    pub fn close(&mut self) {
        log::debug!("closing session");
        self.closed = true;
        self.source = None;
        self.palette = None;
        self.editor = None;
    }

    /// Whether [`Session::close`] has not been called.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.closed
    }

    /// The pipeline options.
    #[must_use]
    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// The retained source image.
    #[must_use]
    pub fn source(&self) -> Option<&Raster> {
        self.source.as_ref()
    }

    /// The palette of the current grid.
    #[must_use]
    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    /// The editor, once a load was installed.
    #[must_use]
    pub fn editor(&self) -> Option<&PixelEditor> {
        self.editor.as_ref()
    }

    /// The editor, once a load was installed.
    pub fn editor_mut(&mut self) -> Option<&mut PixelEditor> {
        self.editor.as_mut()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{tests::*, Error};
    use palette::Srgba;

    /// A source that always fails.
    struct Broken;

    impl ImageSource for Broken {
        async fn load(&self) -> Result<Raster> {
            Err(Error::Source("unreachable host".into()))
        }
    }

    #[tokio::test]
    async fn load_installs_grid() {
        let mut session = Session::default();
        let raster = test_raster(48, 48);
        assert_eq!(session.load(&raster).await.unwrap(), LoadOutcome::Installed);

        let editor = session.editor().unwrap();
        assert_eq!(editor.history_len(), 1);
        let palette = session.palette().unwrap();
        assert!(editor.grid().pixels().iter().all(|p| palette.contains(&p.color)));
        assert_eq!(session.source(), Some(&raster));
    }

    #[tokio::test]
    async fn load_error_is_returned() {
        let mut session = Session::default();
        assert_eq!(
            session.load(&Broken).await,
            Err(Error::Source("unreachable host".into()))
        );
        assert!(session.editor().is_none());
    }

    #[tokio::test]
    async fn stale_completion_is_ignored() {
        let mut session = Session::default();
        let red = Raster::filled(16, 16, Srgba::new(255, 0, 0, 255)).unwrap();
        let blue = Raster::filled(16, 16, Srgba::new(0, 0, 255, 255)).unwrap();

        let old = session.begin_load();
        let new = session.begin_load();
        assert!(!session.is_current(old));

        let outcome = session.complete_load(new, blue.load().await).unwrap();
        assert_eq!(outcome, LoadOutcome::Installed);
        let grid = *session.editor().unwrap().grid();

        let outcome = session.complete_load(old, red.load().await).unwrap();
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert_eq!(session.editor().unwrap().grid(), &grid);

        // stale errors are dropped as well
        let outcome = session.complete_load(old, Broken.load().await).unwrap();
        assert_eq!(outcome, LoadOutcome::Superseded);
    }

    #[tokio::test]
    async fn closed_session_ignores_loads() {
        let mut session = Session::default();
        let ticket = session.begin_load();
        session.close();
        assert!(!session.is_open());

        let outcome = session.complete_load(ticket, test_raster(8, 8).load().await).unwrap();
        assert_eq!(outcome, LoadOutcome::Superseded);
        assert!(session.editor().is_none());
        assert_eq!(session.load(&test_raster(8, 8)).await.unwrap(), LoadOutcome::Superseded);
    }

    #[tokio::test]
    async fn palette_size_change_resets_history() {
        let mut session = Session::default();
        assert!(!session.set_palette_size(PaletteSize::MIN));

        session.load(&test_raster(64, 64)).await.unwrap();
        let editor = session.editor_mut().unwrap();
        editor.set_selected_color(Some(Srgba::new(1, 2, 3, 255)));
        editor.pointer_down(0, 0);
        editor.pointer_up();
        assert_eq!(editor.history_len(), 2);

        assert!(session.set_palette_size(PaletteSize::try_from(4).unwrap()));
        assert_eq!(session.options().palette_size.get(), 4);
        let editor = session.editor().unwrap();
        assert_eq!(editor.history_len(), 1);
        assert!(!editor.has_unsaved_edits());
        assert_eq!(editor.selected_color(), Some(Srgba::new(1, 2, 3, 255)));
        assert!(session.palette().unwrap().len() <= 4);
    }

    #[tokio::test]
    async fn editor_options_apply() {
        let mut session =
            Session::new(PipelineOptions::new(), EditorOptions::new().history_limit(2));
        session.load(&Raster::filled(4, 4, Srgba::new(0, 0, 0, 0)).unwrap()).await.unwrap();

        let editor = session.editor_mut().unwrap();
        assert_eq!(editor.grid(), &PixelGrid::default());
        assert_eq!(editor.history_limit(), 2);
    }
}
