use std::collections::BTreeMap;

use crate::{
    core::Millis,
    particles::{ParticleField, ParticleFrame},
    placement::{PlacementEngine, TokenTransform},
    scroll::{ChannelValue, ScrollMapper},
    sequencer::PhaseSequencer,
};

/// One page's engines behind a single clock. The embedding layer advances
/// it on each animation frame and pushes scroll offsets as events arrive;
/// `eval` yields the frame of style values to apply.
#[derive(Debug, Default)]
pub struct Timeline {
    sequencer: Option<PhaseSequencer>,
    placement: Option<PlacementEngine>,
    mappers: BTreeMap<String, ScrollMapper>,
    particles: Option<ParticleField>,
}

/// Everything the presentation layer needs for one frame, serializable so
/// the CLI can print it and tests can snapshot it.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EvaluatedFrame {
    pub at_ms: u64,
    pub phase: Option<String>,
    pub sequence_complete: bool,
    pub tokens: Vec<TokenTransform>,
    pub channels: BTreeMap<String, ChannelValue>,
    pub particles: Vec<ParticleFrame>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sequencer(mut self, mut sequencer: PhaseSequencer) -> Self {
        sequencer.start(Millis::ZERO);
        self.sequencer = Some(sequencer);
        self
    }

    pub fn with_placement(mut self, placement: PlacementEngine) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn with_mapper(mut self, name: impl Into<String>, mapper: ScrollMapper) -> Self {
        self.mappers.insert(name.into(), mapper);
        self
    }

    pub fn with_particles(mut self, particles: ParticleField) -> Self {
        self.particles = Some(particles);
        self
    }

    pub fn placement_mut(&mut self) -> Option<&mut PlacementEngine> {
        self.placement.as_mut()
    }

    pub fn sequencer_mut(&mut self) -> Option<&mut PhaseSequencer> {
        self.sequencer.as_mut()
    }

    /// Push a scroll offset to one named mapper. Unknown names are ignored;
    /// scroll containers can outlive their mappers during teardown.
    pub fn set_scroll(&mut self, mapper: &str, offset: f64) {
        if let Some(m) = self.mappers.get_mut(mapper) {
            m.update(offset);
        }
    }

    /// Advance every timer-driven engine to `now`.
    pub fn advance_to(&mut self, now: Millis) {
        if let Some(seq) = &mut self.sequencer {
            seq.advance_to(now);
        }
        if let Some(p) = &mut self.placement {
            p.advance_to(now);
        }
    }

    /// Cancel every engine's pending timers; nothing fires afterwards.
    pub fn cancel(&mut self) {
        if let Some(seq) = &mut self.sequencer {
            seq.cancel();
        }
        if let Some(p) = &mut self.placement {
            p.cancel();
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn eval(&self, now: Millis) -> EvaluatedFrame {
        let channels = self
            .mappers
            .iter()
            .flat_map(|(mapper_name, m)| {
                m.values()
                    .iter()
                    .map(move |(ch, v)| (format!("{mapper_name}.{ch}"), *v))
            })
            .collect();
        EvaluatedFrame {
            at_ms: now.0,
            phase: self
                .sequencer
                .as_ref()
                .and_then(|s| s.current_phase().map(str::to_owned)),
            sequence_complete: self.sequencer.as_ref().is_some_and(|s| s.is_complete()),
            tokens: self
                .placement
                .as_ref()
                .map(|p| p.sample(now))
                .unwrap_or_default(),
            channels,
            particles: self
                .particles
                .as_ref()
                .map(|p| p.sample(now))
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageSize;
    use crate::presets;

    #[test]
    fn timeline_threads_one_clock_through_all_engines() {
        let mut placement = presets::home_shapes(3).unwrap();
        placement.measure(StageSize::new(400.0, 200.0).unwrap());
        let mut tl = Timeline::new()
            .with_sequencer(presets::intro_sequencer().unwrap())
            .with_placement(placement);

        tl.advance_to(Millis(2500));
        let frame = tl.eval(Millis(2500));
        assert_eq!(frame.phase.as_deref(), Some("emerge"));
        assert_eq!(frame.tokens.len(), 3);
        assert!(!frame.sequence_complete);

        tl.advance_to(Millis(7000));
        assert!(tl.eval(Millis(7000)).sequence_complete);
    }

    #[test]
    fn scroll_values_are_namespaced_per_mapper() {
        let mut tl = Timeline::new()
            .with_mapper("nav", presets::navigation_bar().unwrap())
            .with_mapper("hero", presets::hero_fade(0.0, 2000.0, 800.0).unwrap());
        tl.set_scroll("nav", 50.0);
        tl.set_scroll("hero", 0.0);
        let frame = tl.eval(Millis::ZERO);
        assert!(frame.channels.contains_key("nav.background-color"));
        assert_eq!(
            frame.channels.get("hero.opacity").and_then(|v| v.as_scalar()),
            Some(1.0)
        );
    }

    #[test]
    fn unknown_mapper_updates_are_ignored() {
        let mut tl = Timeline::new();
        tl.set_scroll("gone", 100.0);
        assert!(tl.eval(Millis::ZERO).channels.is_empty());
    }

    #[test]
    fn cancel_freezes_the_timeline() {
        let mut placement = presets::home_shapes(4).unwrap();
        placement.measure(StageSize::new(400.0, 200.0).unwrap());
        let mut tl = Timeline::new()
            .with_sequencer(presets::intro_sequencer().unwrap())
            .with_placement(placement);
        tl.cancel();
        tl.advance_to(Millis(60_000));
        let frame = tl.eval(Millis(60_000));
        assert_eq!(frame.phase, None);
        assert!(!frame.sequence_complete);
    }
}
