use crate::{
    color::ColorField,
    error::{SeedwalkError, SeedwalkResult},
    raster::{Canvas, Frame, RasterCanvas},
    walk::WalkPath,
};

pub const VIDEO_FPS: u32 = 60;

/// Frame sampling aims for roughly this many frames regardless of path
/// length; the per-frame tick budget is derived from it.
const TARGET_CORE_FRAMES: u64 = 600;

/// Receives frames in presentation order. Implemented by the ffmpeg encoder
/// and by in-memory collectors in tests.
pub trait FrameSink {
    fn push(&mut self, frame: &Frame) -> SeedwalkResult<()>;
}

/// Collects frames in memory. Only suitable for small canvases.
#[derive(Default)]
pub struct FrameCollector {
    pub frames: Vec<Frame>,
}

impl FrameSink for FrameCollector {
    fn push(&mut self, frame: &Frame) -> SeedwalkResult<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// Walker start layouts.
///
/// `Single` sweeps the whole path once from the start. `Triple` seeds three
/// walker pairs at evenly spaced path fractions, each pair fanning out in
/// opposite directions, so drawing activity covers the path instead of one
/// sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkerLayout {
    Single,
    Triple,
}

impl WalkerLayout {
    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Triple => "triple",
        }
    }

    fn walkers(self, path_len: usize) -> Vec<Walker> {
        let len = path_len as i64;
        match self {
            Self::Single => vec![Walker::new(-1, 1)],
            Self::Triple => {
                let mut walkers = Vec::with_capacity(6);
                for i in 0..3 {
                    let start = i * len / 3;
                    // Forward walker draws `start` first, backward walker
                    // draws `start - 1` first.
                    walkers.push(Walker::new(start - 1, 1));
                    walkers.push(Walker::new(start, -1));
                }
                walkers
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AnimOptions {
    pub canvas: Canvas,
    pub border: i64,
    pub fps: u32,
    pub start_hold_secs: f64,
    pub end_hold_secs: f64,
    pub background: [u8; 3],
}

impl Default for AnimOptions {
    fn default() -> Self {
        Self {
            // Even dimensions: the mp4 encoder targets yuv420p.
            canvas: Canvas {
                width: 2560,
                height: 1600,
            },
            border: 50,
            fps: VIDEO_FPS,
            start_hold_secs: 1.0,
            end_hold_secs: 3.0,
            background: [0, 0, 0],
        }
    }
}

impl AnimOptions {
    pub fn with_background(mut self, background: [u8; 3]) -> Self {
        self.background = background;
        self
    }

    fn hold_frames(secs: f64, fps: u32) -> u64 {
        (secs * f64::from(fps)).round().max(0.0) as u64
    }
}

/// Simulation entity stepping along path indices. `path_index` −1 means
/// "before the start". A walker stops permanently when its candidate next
/// index is already visited or out of path bounds.
#[derive(Clone, Copy, Debug)]
struct Walker {
    path_index: i64,
    direction: i64,
    active: bool,
}

impl Walker {
    fn new(path_index: i64, direction: i64) -> Self {
        Self {
            path_index,
            direction,
            active: true,
        }
    }
}

/// Path indices already drawn within one animation. Membership only grows;
/// a vertex is never drawn twice per run.
struct VisitedIndexSet {
    drawn: Vec<bool>,
}

impl VisitedIndexSet {
    fn new(path_len: usize) -> Self {
        Self {
            drawn: vec![false; path_len],
        }
    }

    fn contains(&self, index: usize) -> bool {
        self.drawn[index]
    }

    fn insert(&mut self, index: usize) {
        self.drawn[index] = true;
    }
}

/// Simulation counters, mainly for logging and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnimStats {
    pub total_ticks: u64,
    pub core_frames: u64,
    pub hold_frames_start: u64,
    pub hold_frames_end: u64,
}

impl AnimStats {
    pub fn total_frames(&self) -> u64 {
        self.hold_frames_start + self.core_frames + self.hold_frames_end
    }
}

/// Drives the walkers over an already-built path and streams frames into
/// `sink`: start-hold blanks, then runtime-sampled animation frames, then
/// end-hold copies of the final frame.
#[tracing::instrument(skip(path, colors, sink), fields(layout = layout.name(), path_len = path.len()))]
pub fn run(
    path: &WalkPath,
    colors: &ColorField,
    layout: WalkerLayout,
    opts: &AnimOptions,
    sink: &mut dyn FrameSink,
) -> SeedwalkResult<AnimStats> {
    if colors.len() != path.len() {
        return Err(SeedwalkError::animation(format!(
            "color field covers {} vertices but the path has {}",
            colors.len(),
            path.len()
        )));
    }

    let len = path.len() as i64;
    // Runtime-proportional sampling: one frame per `jump` ticks keeps the
    // core animation near TARGET_CORE_FRAMES frames for any path length.
    let jump = (path.len() as u64 / TARGET_CORE_FRAMES).max(1);

    let bounds = path.bounds();
    let mut raster = RasterCanvas::new(opts.canvas, opts.border, &bounds, opts.background);
    let mut visited = VisitedIndexSet::new(path.len());
    let mut walkers = layout.walkers(path.len());

    let mut stats = AnimStats {
        hold_frames_start: AnimOptions::hold_frames(opts.start_hold_secs, opts.fps),
        hold_frames_end: AnimOptions::hold_frames(opts.end_hold_secs, opts.fps),
        ..AnimStats::default()
    };

    let blank = raster.blank_frame();
    for _ in 0..stats.hold_frames_start {
        sink.push(&blank)?;
    }

    let mut last_frame = blank;
    let mut counter: u64 = 0;
    while walkers.iter().any(|w| w.active) {
        for walker in &mut walkers {
            if walker.active {
                let candidate = walker.path_index + walker.direction;
                if candidate < 0 || candidate >= len || visited.contains(candidate as usize) {
                    walker.active = false;
                } else {
                    walker.path_index = candidate;
                    let index = candidate as usize;
                    visited.insert(index);
                    raster.plot(index, path.vertices()[index], colors.rgb(index));
                }
            }

            // Every tick advances the sampling counter, including no-ops on
            // stopped walkers.
            counter += 1;
            stats.total_ticks += 1;
            if counter >= jump {
                last_frame = raster.snapshot();
                sink.push(&last_frame)?;
                stats.core_frames += 1;
                counter = 0;
            }
        }
    }

    // Partial trailing window still yields a frame, so the walk's final
    // state is always visible before the end hold.
    if counter > 0 {
        last_frame = raster.snapshot();
        sink.push(&last_frame)?;
        stats.core_frames += 1;
    }

    for _ in 0..stats.hold_frames_end {
        sink.push(&last_frame)?;
    }

    tracing::debug!(
        total_ticks = stats.total_ticks,
        core_frames = stats.core_frames,
        "animation complete"
    );
    Ok(stats)
}
