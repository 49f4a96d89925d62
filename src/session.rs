//! Crop session: one editor over one image, from load to commit or cancel.
//!
//! [`EditorState`] is pure and knows nothing about pixels. The session pairs
//! it with a [`RasterBackend`] and owns the commit lifecycle:
//!
//! ```text
//! load_image ─► handle(event)* ─► begin_commit ─► render ─► finish_commit
//!                     │                                         │
//!                  preview                          on_commit(buffer, size)
//! ```
//!
//! Every pending commit is stamped with the session generation. Closing the
//! session or loading another image bumps the generation, so a render that
//! finishes afterwards is dropped instead of delivered.

use crate::config::EditorConfig;
use crate::crop::{CropRect, EditorState, InputEvent, ScaleFactors, transition};
use crate::error::{CropError, Result};
use crate::imaging::{self, Dimensions, PixelBuffer, RasterBackend, ResampleFilter};
use tracing::{debug, info, warn};

/// A commit captured at the moment the user applied it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingCommit {
    generation: u64,
    rect: CropRect,
    scale: ScaleFactors,
    target: Option<Dimensions>,
    filter: ResampleFilter,
}

impl PendingCommit {
    /// Rasterize the captured rectangle. Does not touch the session.
    pub fn render(&self, backend: &impl RasterBackend) -> Result<RenderedCommit> {
        let buffer = imaging::render(backend, &self.rect, self.scale, self.target, self.filter)?;
        Ok(RenderedCommit {
            generation: self.generation,
            buffer,
        })
    }
}

/// A finished render waiting to be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCommit {
    generation: u64,
    pub buffer: PixelBuffer,
}

pub struct CropSession<B: RasterBackend> {
    backend: Option<B>,
    state: EditorState,
    filter: ResampleFilter,
    generation: u64,
    open: bool,
}

impl<B: RasterBackend> CropSession<B> {
    /// Open an empty session. Nothing renders until an image is loaded and
    /// the display box is measured.
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            backend: None,
            state: EditorState::new(config.crop),
            filter: config.export.filter,
            generation: 0,
            open: true,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Install a decoded image, replacing any previous one.
    ///
    /// Pending commits for the previous image become stale.
    pub fn load_image(&mut self, backend: B) {
        let Dimensions { width, height } = backend.dimensions();
        self.backend = Some(backend);
        self.generation += 1;
        self.open = true;
        debug!(width, height, generation = self.generation, "image loaded");
        self.state = transition(&self.state, &InputEvent::ImageReady { width, height });
    }

    /// Feed one input event. Ignored once the session is closed.
    pub fn handle(&mut self, event: &InputEvent) {
        if !self.open {
            return;
        }
        self.state = transition(&self.state, event);
    }

    /// Render the current rectangle without ending the session.
    pub fn preview(&self) -> Result<PixelBuffer> {
        let pending = self.begin_commit()?;
        let backend = self.backend.as_ref().ok_or(CropError::NotReady)?;
        Ok(pending.render(backend)?.buffer)
    }

    /// Capture the current rectangle for rasterization.
    pub fn begin_commit(&self) -> Result<PendingCommit> {
        if !self.open {
            return Err(CropError::NotReady);
        }
        let scale = self.state.scale().ok_or(CropError::NotReady)?;
        let rect = self.state.rect.ok_or(CropError::NotReady)?;
        Ok(PendingCommit {
            generation: self.generation,
            rect,
            scale,
            target: self.state.effective_constraint().pixel_target(),
            filter: self.filter,
        })
    }

    /// Deliver a finished render and end the session.
    ///
    /// Returns `false` and drops the buffer if the session was closed or the
    /// image replaced since the commit began.
    pub fn finish_commit<F>(&mut self, rendered: RenderedCommit, on_commit: F) -> bool
    where
        F: FnOnce(PixelBuffer, Dimensions),
    {
        if !self.open || rendered.generation != self.generation {
            warn!(
                pending = rendered.generation,
                current = self.generation,
                open = self.open,
                "discarding stale crop result"
            );
            return false;
        }
        let size = rendered.buffer.dimensions();
        info!(width = size.width, height = size.height, "crop committed");
        self.end();
        on_commit(rendered.buffer, size);
        true
    }

    /// Begin, render and finish in one step.
    ///
    /// On error the session stays open with its rectangle unchanged.
    pub fn commit<F>(&mut self, on_commit: F) -> Result<bool>
    where
        F: FnOnce(PixelBuffer, Dimensions),
    {
        let pending = self.begin_commit()?;
        let backend = self.backend.as_ref().ok_or(CropError::NotReady)?;
        let rendered = pending.render(backend)?;
        Ok(self.finish_commit(rendered, on_commit))
    }

    /// Cancel the session. Any pending commit is discarded.
    pub fn close(&mut self) {
        if self.open {
            debug!(generation = self.generation, "crop session closed");
        }
        self.end();
    }

    fn end(&mut self) {
        self.open = false;
        self.generation += 1;
        self.state.rect = None;
        self.state.interaction = Default::default();
    }
}
