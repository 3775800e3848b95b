#![forbid(unsafe_code)]

//! Deterministic seeded random-walk art generator.
//!
//! A cryptographic seed drives an infinite bitstream ([`BitGenerator`]);
//! bit pairs grow a lattice walk until a bounding-box stop condition fires
//! ([`plan`]), the walk is re-derived and materialized ([`WalkPath`]), a
//! per-channel color walk paints it ([`ColorField`]), and walker simulations
//! turn the path into frames ([`anim`]) for PNG and MP4 output.

pub mod anim;
pub mod bitgen;
pub mod color;
pub mod encode_ffmpeg;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod rpc;
pub mod seed;
pub mod walk;

pub use anim::{AnimOptions, AnimStats, FrameCollector, FrameSink, VIDEO_FPS, WalkerLayout};
pub use bitgen::{BitGenerator, BitSource};
pub use color::ColorField;
pub use encode_ffmpeg::{EncodeConfig, FfmpegEncoder, default_mp4_config, is_ffmpeg_on_path};
pub use error::{SeedwalkError, SeedwalkResult};
pub use pipeline::{
    DEFAULT_COLOR_SEED_HEX, STILL_CANVAS, derive_path, render_animation_mp4, render_still,
    write_png,
};
pub use raster::{Canvas, Frame, RasterCanvas};
pub use rpc::{
    DEFAULT_CONTRACT, DEFAULT_RPC_URL, FetchedSeed, HttpTransport, RetryPolicy, SeedClient,
    SeedTransport,
};
pub use seed::Seed;
pub use walk::{
    Bounds, DEFAULT_TARGET, Direction, PlanResult, Point, TargetSize, WalkPath, plan,
};
