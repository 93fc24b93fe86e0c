//! Parallel band renderer with generation-scoped cancellation.
//!
//! A [`Renderer`] owns the viewport, the pixel surface, and the worker
//! threads of the current render generation. Each draw snapshots the
//! viewport into plane bounds, splits the screen into horizontal bands,
//! and spawns one worker per band; terminate joins them and records
//! whether the generation finished or was cut short.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use tracing::{debug, info, warn};

use deepbrot_core::{EscapeBackend, PlaneBounds, Viewport};

use crate::band::{build_bands, Band};
use crate::cancel::CancelToken;
use crate::error::RenderError;
use crate::palette::Palette;
use crate::surface::PixelSurface;
use crate::Result;

/// Home view: the whole set with a margin.
pub const DEFAULT_ORIGIN_X: f64 = -2.0;
pub const DEFAULT_ORIGIN_Y: f64 = -1.2;
pub const DEFAULT_EXTENT: f64 = 3.0;

/// Wheel-step zoom factors.
pub const ZOOM_IN_FACTOR: f64 = 0.8;
pub const ZOOM_OUT_FACTOR: f64 = 1.2;

/// Default iteration budget per sample.
pub const DEFAULT_ITERATIONS: u32 = 256;

/// Callback fired whenever a band finishes, so a UI can repaint the
/// partially rendered surface.
pub type RepaintHook = Arc<dyn Fn() + Send + Sync>;

/// Lifecycle of the most recent render generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// No generation has run yet.
    Idle,
    /// Workers are attached and may still be producing rows.
    Running,
    /// The last generation wrote every row.
    Completed,
    /// The last generation was stopped before writing every row.
    Cancelled,
}

impl RenderState {
    pub fn label(&self) -> &'static str {
        match self {
            RenderState::Idle => "idle",
            RenderState::Running => "running",
            RenderState::Completed => "completed",
            RenderState::Cancelled => "cancelled",
        }
    }
}

/// Drives one backend over one pixel surface.
pub struct Renderer<B: EscapeBackend> {
    backend: Arc<B>,
    viewport: Viewport<B::Value>,
    screen_width: u32,
    screen_height: u32,
    surface: Arc<PixelSurface>,
    palette: Arc<Palette>,
    repaint: Option<RepaintHook>,
    token: Arc<CancelToken>,
    workers: Vec<JoinHandle<()>>,
    state: RenderState,
    displayed_bounds: Option<PlaneBounds<B::Value>>,
    num_iterations: u32,
    num_threads: u32,
    started_at: Option<Instant>,
}

impl<B: EscapeBackend> Renderer<B> {
    /// Creates a renderer positioned on the home view.
    pub fn new(
        backend: B,
        screen_width: u32,
        screen_height: u32,
        surface: Arc<PixelSurface>,
        palette: Palette,
    ) -> Result<Self> {
        if screen_width == 0 || screen_height == 0 {
            return Err(RenderError::InvalidDimensions {
                width: screen_width,
                height: screen_height,
            });
        }
        let expected = screen_width as usize * screen_height as usize;
        if surface.len() != expected {
            return Err(RenderError::SurfaceSizeMismatch {
                expected,
                actual: surface.len(),
            });
        }
        let viewport = Viewport::new(
            backend.from_f64(DEFAULT_ORIGIN_X)?,
            backend.from_f64(DEFAULT_ORIGIN_Y)?,
            backend.from_f64(DEFAULT_EXTENT)?,
        );
        Ok(Renderer {
            backend: Arc::new(backend),
            viewport,
            screen_width,
            screen_height,
            surface,
            palette: Arc::new(palette),
            repaint: None,
            token: Arc::new(CancelToken::new(0)),
            workers: Vec::new(),
            state: RenderState::Idle,
            displayed_bounds: None,
            num_iterations: DEFAULT_ITERATIONS,
            num_threads: 1,
            started_at: None,
        })
    }

    /// Registers a callback fired after each band completes.
    pub fn with_repaint_hook(mut self, hook: RepaintHook) -> Self {
        self.repaint = Some(hook);
        self
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn viewport(&self) -> &Viewport<B::Value> {
        &self.viewport
    }

    pub fn surface(&self) -> &Arc<PixelSurface> {
        &self.surface
    }

    pub fn screen_width(&self) -> u32 {
        self.screen_width
    }

    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    /// Completed and total rows of the current generation.
    pub fn progress(&self) -> (usize, usize) {
        self.token.progress()
    }

    /// Whether the current generation has been asked to stop. Workers set
    /// this themselves when a backend operation fails, so headless callers
    /// polling [`Renderer::progress`] should also watch this flag.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Repositions the view. A running generation keeps drawing its old
    /// bounds; the next draw picks the new ones up.
    pub fn set_initial_params(&mut self, x_origin: f64, y_origin: f64, extent: f64) -> Result<()> {
        if !(extent > 0.0 && extent.is_finite()) {
            return Err(RenderError::InvalidExtent(extent));
        }
        self.viewport = Viewport::new(
            self.backend.from_f64(x_origin)?,
            self.backend.from_f64(y_origin)?,
            self.backend.from_f64(extent)?,
        );
        self.displayed_bounds = None;
        Ok(())
    }

    /// Starts a new render generation.
    ///
    /// Fails with [`RenderError::RenderActive`] while workers from the
    /// previous generation are still attached; call
    /// [`Renderer::terminate_threads`] first.
    pub fn draw(&mut self, num_iterations: u32, num_threads: u32) -> Result<()> {
        if !self.workers.is_empty() {
            return Err(RenderError::RenderActive);
        }
        if num_iterations == 0 {
            return Err(RenderError::InvalidIterations(num_iterations));
        }
        if num_threads == 0 {
            return Err(RenderError::InvalidThreads(num_threads));
        }
        self.num_iterations = num_iterations;
        self.num_threads = num_threads;
        let bounds =
            self.viewport
                .bounds(self.backend.as_ref(), self.screen_width, self.screen_height)?;
        self.displayed_bounds = Some(bounds.clone());
        let token = Arc::new(CancelToken::new(self.screen_height as usize));
        self.token = Arc::clone(&token);
        self.started_at = Some(Instant::now());
        debug!(
            width = self.screen_width,
            height = self.screen_height,
            num_iterations,
            num_threads,
            backend = self.backend.kind().label(),
            "starting render generation"
        );
        for band in build_bands(self.screen_height, num_threads) {
            let job = BandJob {
                backend: Arc::clone(&self.backend),
                bounds: bounds.clone(),
                band,
                screen_width: self.screen_width,
                screen_height: self.screen_height,
                num_iterations,
                palette: Arc::clone(&self.palette),
                surface: Arc::clone(&self.surface),
                token: Arc::clone(&token),
                repaint: self.repaint.clone(),
            };
            self.workers.push(std::thread::spawn(move || render_band(job)));
        }
        self.state = RenderState::Running;
        Ok(())
    }

    /// Stops the active generation and joins its workers.
    ///
    /// With no workers attached this is a no-op, so it is always safe to
    /// call before mutating the view. The resulting state records whether
    /// the generation had already written every row when it was reaped.
    pub fn terminate_threads(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.token.cancel();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("render worker panicked");
            }
        }
        let (done, total) = self.token.progress();
        self.state = if done >= total {
            RenderState::Completed
        } else {
            RenderState::Cancelled
        };
        let elapsed_ms = self
            .started_at
            .take()
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0);
        info!(
            rows_done = done,
            rows_total = total,
            elapsed_ms,
            state = self.state.label(),
            "render generation finished"
        );
    }

    /// Pans by a whole-pixel delta and redraws with the previous settings.
    pub fn pan(&mut self, dx: i32, dy: i32) -> Result<()> {
        self.terminate_threads();
        let bounds = self.current_bounds()?;
        self.viewport.pan(
            self.backend.as_ref(),
            &bounds,
            dx,
            dy,
            self.screen_width,
            self.screen_height,
        )?;
        self.draw(self.num_iterations, self.num_threads)
    }

    /// Zooms around the plane point under pixel `(px, py)` and redraws with
    /// the previous settings. Factors below one zoom in.
    pub fn zoom(&mut self, px: u32, py: u32, factor: f64) -> Result<()> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(RenderError::InvalidZoomFactor(factor));
        }
        self.terminate_threads();
        let bounds = self.current_bounds()?;
        self.viewport.zoom_at(
            self.backend.as_ref(),
            &bounds,
            px,
            py,
            factor,
            self.screen_width,
            self.screen_height,
        )?;
        self.draw(self.num_iterations, self.num_threads)
    }

    /// Plane coordinates of a pixel at the backend's full precision,
    /// formatted for a position readout.
    pub fn coordinate_str(&self, px: u32, py: u32) -> Result<String> {
        let bounds = self.current_bounds()?;
        let (x, y) = bounds.coordinate_at(
            self.backend.as_ref(),
            px,
            py,
            self.screen_width,
            self.screen_height,
        )?;
        Ok(format!("{x}, {y}"))
    }

    /// Resizes the screen, swapping in a surface sized for the new
    /// dimensions. Terminates any active generation first.
    pub fn update_screen_dimensions(
        &mut self,
        width: u32,
        height: u32,
        surface: Arc<PixelSurface>,
    ) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if surface.len() != expected {
            return Err(RenderError::SurfaceSizeMismatch {
                expected,
                actual: surface.len(),
            });
        }
        self.terminate_threads();
        self.screen_width = width;
        self.screen_height = height;
        self.surface = surface;
        self.displayed_bounds = None;
        Ok(())
    }

    /// Swaps in a new surface of the same size.
    pub fn update_surface(&mut self, surface: Arc<PixelSurface>) -> Result<()> {
        let expected = self.screen_width as usize * self.screen_height as usize;
        if surface.len() != expected {
            return Err(RenderError::SurfaceSizeMismatch {
                expected,
                actual: surface.len(),
            });
        }
        self.terminate_threads();
        self.surface = surface;
        Ok(())
    }

    // Bounds currently on screen, or fresh bounds when nothing has been
    // drawn yet.
    fn current_bounds(&self) -> Result<PlaneBounds<B::Value>> {
        match &self.displayed_bounds {
            Some(bounds) => Ok(bounds.clone()),
            None => {
                Ok(self
                    .viewport
                    .bounds(self.backend.as_ref(), self.screen_width, self.screen_height)?)
            }
        }
    }
}

impl<B: EscapeBackend> Drop for Renderer<B> {
    fn drop(&mut self) {
        self.terminate_threads();
    }
}

/// Shared, immutable inputs for one band worker.
struct BandJob<B: EscapeBackend> {
    backend: Arc<B>,
    bounds: PlaneBounds<B::Value>,
    band: Band,
    screen_width: u32,
    screen_height: u32,
    num_iterations: u32,
    palette: Arc<Palette>,
    surface: Arc<PixelSurface>,
    token: Arc<CancelToken>,
    repaint: Option<RepaintHook>,
}

fn render_band<B: EscapeBackend>(job: BandJob<B>) {
    if job.band.height == 0 {
        return;
    }
    let columns = match job.bounds.column_coords(job.backend.as_ref(), job.screen_width) {
        Ok(columns) => columns,
        Err(err) => {
            warn!(
                band = job.band.index,
                error = %err,
                "failed building the column table; cancelling the generation"
            );
            job.token.cancel();
            return;
        }
    };
    let started = Instant::now();
    'rows: for row in job.band.y_start..job.band.y_end() {
        if job.token.is_cancelled() {
            break;
        }
        let y0 = match job
            .bounds
            .row_coord(job.backend.as_ref(), row, job.screen_height)
        {
            Ok(y0) => y0,
            Err(err) => {
                warn!(
                    band = job.band.index,
                    row,
                    error = %err,
                    "failed computing a row coordinate; cancelling the generation"
                );
                job.token.cancel();
                break;
            }
        };
        let row_base = row as usize * job.screen_width as usize;
        for (px, x0) in columns.iter().enumerate() {
            match job.backend.escape(x0, &y0, job.num_iterations) {
                Ok(result) => {
                    let color = job.palette.color_for(result, job.num_iterations);
                    job.surface.store_index(row_base + px, color);
                }
                Err(err) => {
                    warn!(
                        band = job.band.index,
                        row,
                        px,
                        error = %err,
                        "escape iteration failed; cancelling the generation"
                    );
                    job.token.cancel();
                    break 'rows;
                }
            }
        }
        job.token.row_done();
    }
    debug!(
        band = job.band.index,
        rows = job.band.height,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "band finished"
    );
    if let Some(repaint) = &job.repaint {
        repaint();
    }
}
