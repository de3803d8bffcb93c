#![forbid(unsafe_code)]

pub mod channel;
pub mod core;
pub mod ease;
pub mod error;
pub mod overlay;
pub mod particles;
pub mod placement;
pub mod presets;
pub mod schedule;
pub mod scroll;
pub mod sequencer;
pub mod timeline;

pub use channel::{Additive, Channel, Key, Keyframes, LayeredChannel, Lerp, Repeat, Tween};
pub use crate::core::{Millis, Point, Rect, Rgba, StageSize, Vec2};
pub use ease::Ease;
pub use error::{KineticaError, KineticaResult};
pub use overlay::{OverlayController, ScrollLockGuard, ScrollLockHost};
pub use particles::{ParticleConfig, ParticleField, ParticleFrame};
pub use placement::{
    LayoutMode, PlacementConfig, PlacementEngine, TokenShape, TokenTarget, TokenTransform,
};
pub use schedule::{Scheduler, TaskId};
pub use scroll::{
    Anchor, ChannelValue, DerivedChannel, Edge, PiecewiseLinear, ScrollMapper, ScrollRange,
};
pub use sequencer::{Phase, PhaseSequencer};
pub use timeline::{EvaluatedFrame, Timeline};
