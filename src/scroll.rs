use crate::{
    channel::Lerp,
    core::{Rgba, Vec2},
    error::{KineticaError, KineticaResult},
};

/// Which edge of the element meets which edge of the viewport. The anchor
/// grammar "start start" reads element-edge first, viewport-edge second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Edge {
    Start,
    End,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Anchor {
    pub element: Edge,
    pub viewport: Edge,
}

impl Anchor {
    pub const START_START: Self = Self {
        element: Edge::Start,
        viewport: Edge::Start,
    };
    pub const END_END: Self = Self {
        element: Edge::End,
        viewport: Edge::End,
    };
}

/// Resolved scroll boundaries, in pixels of scroll offset, over which
/// progress for one component instance is measured.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    /// Whole-document range between two absolute scroll offsets.
    pub fn absolute(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Element-relative range: the scroll offsets at which each anchor's
    /// element edge crosses its viewport edge. Anchors may depend on layout,
    /// so callers re-resolve on resize.
    pub fn element(
        element_top: f64,
        element_height: f64,
        viewport_height: f64,
        start: Anchor,
        end: Anchor,
    ) -> Self {
        let resolve = |a: Anchor| {
            let element_edge = match a.element {
                Edge::Start => 0.0,
                Edge::End => element_height,
            };
            let viewport_edge = match a.viewport {
                Edge::Start => 0.0,
                Edge::End => viewport_height,
            };
            element_top + element_edge - viewport_edge
        };
        Self {
            start: resolve(start),
            end: resolve(end),
        }
    }

    /// Normalized progress, clamped to [0, 1]. A degenerate or inverted
    /// range clamps immediately to 1 rather than dividing by zero.
    pub fn progress(&self, offset: f64) -> f64 {
        let span = self.end - self.start;
        if !(span > 0.0) {
            return 1.0;
        }
        ((offset - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Piecewise-linear interpolation table: monotonically non-decreasing input
/// breakpoints in [0, 1], matched one-to-one with output values. Progress
/// outside the table clamps to the endpoint outputs, never extrapolates.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PiecewiseLinear<T> {
    input: Vec<f64>,
    output: Vec<T>,
}

impl<T> PiecewiseLinear<T>
where
    T: Lerp + Clone,
{
    pub fn new(input: Vec<f64>, output: Vec<T>) -> KineticaResult<Self> {
        if input.is_empty() {
            return Err(KineticaError::validation(
                "interpolation table must have at least one breakpoint",
            ));
        }
        if input.len() != output.len() {
            return Err(KineticaError::validation(
                "breakpoints and outputs must have the same length",
            ));
        }
        if input.iter().any(|x| !x.is_finite() || !(0.0..=1.0).contains(x)) {
            return Err(KineticaError::validation(
                "breakpoints must be finite and in [0, 1]",
            ));
        }
        if !input.windows(2).all(|w| w[0] <= w[1]) {
            return Err(KineticaError::validation(
                "breakpoints must be non-decreasing",
            ));
        }
        Ok(Self { input, output })
    }

    pub fn map(&self, progress: f64) -> T {
        let p = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let idx = self.input.partition_point(|&x| x <= p);
        if idx == 0 {
            return self.output[0].clone();
        }
        if idx >= self.input.len() {
            return self.output[self.output.len() - 1].clone();
        }
        let (x0, x1) = (self.input[idx - 1], self.input[idx]);
        let denom = x1 - x0;
        if denom <= 0.0 {
            return self.output[idx - 1].clone();
        }
        let t = (p - x0) / denom;
        T::lerp(&self.output[idx - 1], &self.output[idx], t)
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum DerivedChannel {
    Scalar(PiecewiseLinear<f64>),
    Color(PiecewiseLinear<Rgba>),
    Vector(PiecewiseLinear<Vec2>),
}

impl DerivedChannel {
    pub fn map(&self, progress: f64) -> ChannelValue {
        match self {
            Self::Scalar(t) => ChannelValue::Scalar(t.map(progress)),
            Self::Color(t) => ChannelValue::Color(t.map(progress)),
            Self::Vector(t) => ChannelValue::Vector(t.map(progress)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub enum ChannelValue {
    Scalar(f64),
    Color(Rgba),
    Vector(Vec2),
}

impl ChannelValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(v) => Some(*v),
            _ => None,
        }
    }
}

/// One progress source feeding several independent interpolation tables.
/// Updates are push-based: every scroll or resize event recomputes progress
/// and all dependent channels synchronously, with no smoothing.
#[derive(Clone, Debug)]
pub struct ScrollMapper {
    range: ScrollRange,
    channels: Vec<(String, DerivedChannel)>,
    progress: f64,
    values: Vec<(String, ChannelValue)>,
}

impl ScrollMapper {
    pub fn new(range: ScrollRange) -> Self {
        Self {
            range,
            channels: Vec::new(),
            progress: 0.0,
            values: Vec::new(),
        }
    }

    pub fn with_channel(
        mut self,
        name: impl Into<String>,
        channel: DerivedChannel,
    ) -> KineticaResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(KineticaError::validation("channel name must be non-empty"));
        }
        if self.channels.iter().any(|(n, _)| *n == name) {
            return Err(KineticaError::validation(format!(
                "duplicate channel name '{name}'"
            )));
        }
        self.values.push((name.clone(), channel.map(self.progress)));
        self.channels.push((name, channel));
        Ok(self)
    }

    /// Re-resolve the anchor range after a layout change. Recomputes all
    /// channels against the current progress of the new range.
    pub fn set_range(&mut self, range: ScrollRange, offset: f64) {
        self.range = range;
        self.update(offset);
    }

    pub fn range(&self) -> ScrollRange {
        self.range
    }

    /// Push a new scroll offset. Returns the recomputed progress.
    pub fn update(&mut self, offset: f64) -> f64 {
        self.progress = self.range.progress(offset);
        for ((_, value), (_, channel)) in self.values.iter_mut().zip(self.channels.iter()) {
            *value = channel.map(self.progress);
        }
        self.progress
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn values(&self) -> &[(String, ChannelValue)] {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&ChannelValue> {
        self.values.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}
