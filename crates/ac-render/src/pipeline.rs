//! Conversion d'une image ou d'une séquence animée en texte.
//!
//! Sequences go through [`FramePipeline`]: a fixed pool of workers, each with
//! its own [`FrameRenderer`], results stored by frame index so the output
//! order never depends on completion order.

use std::sync::{Mutex, PoisonError};

use ac_ascii::compositor::Compositor;
use ac_ascii::mapper::RenderedGlyph;
use ac_core::config::{ColorLevel, ColorPlacement, RenderConfig, Schedule, Sizing};
use ac_core::error::CoreError;
use ac_core::frame::{DecodedImage, FrameSequence, Grid};
use ac_source::resize::{Resizer, target_size};
use rayon::prelude::*;

use crate::flatten;

/// Everything one worker needs to turn a frame into glyphs.
///
/// Owns its configuration snapshot and its resize scratch buffers. Inside a
/// [`FramePipeline`] each one belongs to a single pool thread.
///
/// # Example
/// ```
/// use ac_core::color::Rgb;
/// use ac_core::config::RenderConfig;
/// use ac_core::frame::DecodedImage;
/// use ac_render::pipeline::FrameRenderer;
///
/// let config = RenderConfig { dimensions: Some((4, 2)), ..RenderConfig::default() };
/// let mut renderer = FrameRenderer::new(&config).unwrap();
/// let text = renderer.render_text(&DecodedImage::filled(40, 40, Rgb::WHITE)).unwrap();
/// assert_eq!(text, "@@@@\n@@@@");
/// ```
pub struct FrameRenderer {
    sizing: Sizing,
    braille: bool,
    placement: ColorPlacement,
    level: ColorLevel,
    compositor: Compositor,
    resizer: Resizer,
    rendered: u64,
}

impl FrameRenderer {
    /// Build a renderer from a validated configuration.
    ///
    /// # Errors
    /// Sizing errors and [`CoreError::EmptyRamp`].
    pub fn new(config: &RenderConfig) -> Result<Self, CoreError> {
        Ok(Self {
            sizing: config.sizing()?,
            braille: config.glyphs.is_braille(),
            placement: config.color_placement,
            level: config.color_level,
            compositor: Compositor::new(config)?,
            resizer: Resizer::new(),
            rendered: 0,
        })
    }

    /// Frames rendered by this instance so far.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.rendered
    }

    /// Resample, sample, mirror and map one image.
    ///
    /// # Errors
    /// [`CoreError::InvalidDimensions`] if the target size cannot be
    /// represented, [`CoreError::Resize`] from the resampler.
    pub fn render_grid(&mut self, img: &DecodedImage) -> Result<Grid<RenderedGlyph>, CoreError> {
        let (w, h) = target_size(self.sizing, img.width, img.height, self.braille)?;
        let resampled = self.resizer.resample(img, w, h)?;
        self.rendered += 1;
        Ok(self.compositor.process(&resampled))
    }

    /// [`render_grid`](Self::render_grid) flattened to terminal text.
    ///
    /// # Errors
    /// Same as [`render_grid`](Self::render_grid).
    pub fn render_text(&mut self, img: &DecodedImage) -> Result<String, CoreError> {
        let grid = self.render_grid(img)?;
        Ok(flatten::to_text(&grid, self.placement, self.level))
    }
}

/// Convert a single image into its glyph grid.
///
/// Runs synchronously on the calling thread; no worker pool is involved.
///
/// # Errors
/// Any configuration error, or a resampling failure.
///
/// # Example
/// ```
/// use ac_core::color::Rgb;
/// use ac_core::config::RenderConfig;
/// use ac_core::frame::DecodedImage;
/// use ac_render::pipeline::convert_image;
///
/// let config = RenderConfig { width: Some(6), ..RenderConfig::default() };
/// let grid = convert_image(&DecodedImage::filled(60, 20, Rgb::gray(0)), &config).unwrap();
/// assert_eq!((grid.width, grid.height), (6, 1));
/// ```
pub fn convert_image(img: &DecodedImage, config: &RenderConfig) -> Result<Grid<RenderedGlyph>, CoreError> {
    config.validate()?;
    FrameRenderer::new(config)?.render_grid(img)
}

/// Convert a single image into newline-joined terminal text.
///
/// # Errors
/// Same as [`convert_image`].
pub fn convert_image_text(img: &DecodedImage, config: &RenderConfig) -> Result<String, CoreError> {
    let grid = convert_image(img, config)?;
    Ok(flatten::to_text(&grid, config.color_placement, config.color_level))
}

/// Convert a single image into its JSON grid.
///
/// # Errors
/// Same as [`convert_image`]; serialization failures become [`CoreError::Config`].
pub fn convert_image_json(img: &DecodedImage, config: &RenderConfig) -> Result<String, CoreError> {
    let grid = convert_image(img, config)?;
    flatten::to_json(&grid).map_err(|e| CoreError::Config(e.to_string()))
}

/// Une frame rendue, prête à être jouée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    /// Flattened terminal text.
    pub text: String,
    /// Display time in centiseconds.
    pub delay: u16,
}

/// Ordered rendered frames plus the number of passes (0 = forever).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSequence {
    /// Frames in source order.
    pub frames: Vec<RenderedFrame>,
    /// Passes to play; 0 loops forever.
    pub repeat: u32,
}

/// Pipeline parallèle pour les séquences : pool borné, ordre préservé.
///
/// # Example
/// ```
/// use ac_core::color::Rgb;
/// use ac_core::config::RenderConfig;
/// use ac_core::frame::{DecodedImage, FrameSequence};
/// use ac_render::pipeline::FramePipeline;
///
/// let config = RenderConfig { dimensions: Some((2, 1)), workers: Some(2), ..RenderConfig::default() };
/// let pipeline = FramePipeline::new(config).unwrap();
/// let frames = vec![DecodedImage::filled(4, 4, Rgb::gray(0)), DecodedImage::filled(4, 4, Rgb::WHITE)];
/// let seq = FrameSequence::new(frames, vec![5, 7], 1).unwrap();
/// let out = pipeline.render_sequence(&seq).unwrap();
/// assert_eq!(out.frames[0].text, "  ");
/// assert_eq!(out.frames[1].text, "@@");
/// assert_eq!(out.frames[1].delay, 7);
/// ```
pub struct FramePipeline {
    config: RenderConfig,
    pool: rayon::ThreadPool,
    workers: usize,
    /// Un renderer par thread du pool, indexé par `current_thread_index`.
    renderers: Vec<Mutex<FrameRenderer>>,
}

impl FramePipeline {
    /// Validate `config` and start the worker pool.
    ///
    /// Worker count: `config.workers`, or the available parallelism. Every
    /// worker thread gets its own [`FrameRenderer`], built here once and
    /// reused for all the frames that thread renders.
    ///
    /// # Errors
    /// Any configuration error, or [`CoreError::Config`] if the pool cannot
    /// be started.
    pub fn new(config: RenderConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let workers = config.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        });
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("frame-worker-{i}"))
            .build()
            .map_err(|e| CoreError::Config(format!("cannot start worker pool: {e}")))?;
        let renderers = (0..workers)
            .map(|_| FrameRenderer::new(&config).map(Mutex::new))
            .collect::<Result<Vec<_>, _>>()?;
        log::info!("frame pipeline: {workers} workers, {:?} schedule", config.schedule);
        Ok(Self {
            config,
            pool,
            workers,
            renderers,
        })
    }

    /// Size of the worker pool.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Render every frame, in order.
    ///
    /// # Errors
    /// [`CoreError::FrameSizeMismatch`] before any frame is rendered, or the
    /// first frame error. Tasks already started finish before the error is
    /// returned, and no partial output is produced.
    pub fn render_sequence(&self, seq: &FrameSequence) -> Result<RenderedSequence, CoreError> {
        self.render_sequence_with_progress(seq, |_| {})
    }

    /// Same as [`render_sequence`](Self::render_sequence), reporting the
    /// completion percentage.
    ///
    /// `progress` runs on a single reporter thread and sees a strictly
    /// increasing sequence of percentages, starting at 0 and ending at 100
    /// on success.
    ///
    /// # Errors
    /// Same as [`render_sequence`](Self::render_sequence).
    pub fn render_sequence_with_progress<F>(
        &self,
        seq: &FrameSequence,
        mut progress: F,
    ) -> Result<RenderedSequence, CoreError>
    where
        F: FnMut(u8) + Send,
    {
        seq.check_uniform()?;
        let total = seq.len();
        let (done_tx, done_rx) = flume::unbounded::<usize>();

        let texts = std::thread::scope(|s| {
            s.spawn(move || {
                let mut last = 0u8;
                progress(last);
                let mut done = 0usize;
                for _index in done_rx.iter() {
                    done += 1;
                    let pct = (done * 100 / total) as u8;
                    if pct > last {
                        last = pct;
                        progress(pct);
                    }
                }
            });
            let texts = match self.config.schedule {
                Schedule::Pool => self.render_pooled(seq.frames(), 0, &done_tx),
                Schedule::Batched => self.render_batched(seq.frames(), &done_tx),
            };
            drop(done_tx);
            texts
        })?;
        log::debug!("frames per worker: {:?}", self.frames_per_worker());

        let frames = texts
            .into_iter()
            .zip(seq.delays())
            .map(|(text, &delay)| RenderedFrame { text, delay })
            .collect();
        Ok(RenderedSequence {
            frames,
            repeat: seq.repeat(),
        })
    }

    /// Structured output is only defined for single images.
    ///
    /// # Errors
    /// Always [`CoreError::StructuredSequence`].
    pub fn render_sequence_json(&self, _seq: &FrameSequence) -> Result<String, CoreError> {
        Err(CoreError::StructuredSequence)
    }

    /// One task per frame on the pool. A task renders with the renderer of
    /// the thread it runs on, so the lock is never contended.
    fn render_pooled(
        &self,
        frames: &[DecodedImage],
        offset: usize,
        done: &flume::Sender<usize>,
    ) -> Result<Vec<String>, CoreError> {
        self.pool.install(|| {
            frames
                .par_iter()
                .with_max_len(1)
                .enumerate()
                .map(|(i, frame)| {
                    let slot = rayon::current_thread_index().unwrap_or(0) % self.renderers.len();
                    let mut renderer = self.renderers[slot]
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner);
                    let text = renderer.render_text(frame)?;
                    log::trace!("frame {} rendered by worker {slot}", offset + i);
                    let _ = done.send(offset + i);
                    Ok(text)
                })
                .collect()
        })
    }

    /// Frames rendered by each worker since the pipeline started.
    fn frames_per_worker(&self) -> Vec<u64> {
        self.renderers
            .iter()
            .map(|r| r.lock().unwrap_or_else(PoisonError::into_inner).frames_rendered())
            .collect()
    }

    /// Batches of `workers` frames, each batch fully drained before the next
    /// is admitted.
    fn render_batched(
        &self,
        frames: &[DecodedImage],
        done: &flume::Sender<usize>,
    ) -> Result<Vec<String>, CoreError> {
        let mut texts = Vec::with_capacity(frames.len());
        for (b, batch) in frames.chunks(self.workers).enumerate() {
            log::debug!("batch {b}: {} frames", batch.len());
            texts.extend(self.render_pooled(batch, b * self.workers, done)?);
        }
        Ok(texts)
    }
}
