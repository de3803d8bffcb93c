//! The concrete configurations the portfolio site ships: the intro splash
//! sequence, the homepage floating shapes, the navigation bar's scroll fade,
//! the page-hero fade pipeline and the overlay's particle field.

use crate::{
    core::Rgba,
    error::KineticaResult,
    particles::{ParticleConfig, ParticleField},
    placement::{PlacementConfig, PlacementEngine, TokenShape},
    scroll::{Anchor, DerivedChannel, PiecewiseLinear, ScrollMapper, ScrollRange},
    sequencer::{Phase, PhaseSequencer},
};

pub const INTRO: &str = "intro";
pub const HOME_SHAPES: &str = "home-shapes";
pub const NAVIGATION: &str = "navigation";
pub const HERO_FADE: &str = "hero-fade";
pub const OVERLAY_PARTICLES: &str = "overlay-particles";

pub fn names() -> &'static [&'static str] {
    &[INTRO, HOME_SHAPES, NAVIGATION, HERO_FADE, OVERLAY_PARTICLES]
}

/// The staged splash: pulse, emerge, zoom, settle; complete at 7000 ms.
pub fn intro_phases() -> Vec<Phase> {
    vec![
        Phase::new("pulse", 2500),
        Phase::new("emerge", 1500),
        Phase::new("zoom", 1500),
        Phase::new("settle", 1500),
    ]
}

pub fn intro_sequencer() -> KineticaResult<PhaseSequencer> {
    PhaseSequencer::new(intro_phases())
}

/// The homepage's three floating shapes with the stock tuning.
pub fn home_shapes(seed: u64) -> KineticaResult<PlacementEngine> {
    PlacementEngine::new(
        PlacementConfig::default(),
        vec![TokenShape::Circle, TokenShape::Square, TokenShape::Triangle],
        seed,
    )
}

/// Navigation bar: over the first 100 px of page scroll the background goes
/// from fully transparent white to near-opaque, and the backdrop blur ramps
/// from 0 to 12 px.
pub fn navigation_bar() -> KineticaResult<ScrollMapper> {
    ScrollMapper::new(ScrollRange::absolute(0.0, 100.0))
        .with_channel(
            "background-color",
            DerivedChannel::Color(PiecewiseLinear::new(
                vec![0.0, 1.0],
                vec![Rgba::new(255, 255, 255, 0.0), Rgba::new(255, 255, 255, 0.95)],
            )?),
        )?
        .with_channel(
            "backdrop-blur-px",
            DerivedChannel::Scalar(PiecewiseLinear::new(vec![0.0, 1.0], vec![0.0, 12.0])?),
        )
}

/// Page hero fade pipeline, scoped to the hero element: opacity and scale
/// drop and the block lifts over the first 30% of the element's scroll
/// range.
pub fn hero_fade(
    element_top: f64,
    element_height: f64,
    viewport_height: f64,
) -> KineticaResult<ScrollMapper> {
    ScrollMapper::new(ScrollRange::element(
        element_top,
        element_height,
        viewport_height,
        Anchor::START_START,
        Anchor::END_END,
    ))
    .with_channel(
        "opacity",
        DerivedChannel::Scalar(PiecewiseLinear::new(vec![0.0, 0.3], vec![1.0, 0.0])?),
    )?
    .with_channel(
        "scale",
        DerivedChannel::Scalar(PiecewiseLinear::new(vec![0.0, 0.3], vec![1.0, 0.95])?),
    )?
    .with_channel(
        "lift-px",
        DerivedChannel::Scalar(PiecewiseLinear::new(vec![0.0, 0.3], vec![0.0, -50.0])?),
    )
}

/// The overlay's gold-particle drift layer.
pub fn overlay_particles(seed: u64) -> KineticaResult<ParticleField> {
    ParticleField::new(ParticleConfig::default(), seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Millis;

    #[test]
    fn intro_preset_completes_at_seven_seconds() {
        let seq = intro_sequencer().unwrap();
        assert_eq!(seq.total_duration_ms(), 7000);
    }

    #[test]
    fn navigation_preset_endpoints() {
        let mut nav = navigation_bar().unwrap();
        nav.update(0.0);
        assert_eq!(
            nav.value("background-color").unwrap().as_color().unwrap(),
            Rgba::new(255, 255, 255, 0.0)
        );
        nav.update(250.0);
        assert_eq!(
            nav.value("background-color").unwrap().as_color().unwrap(),
            Rgba::new(255, 255, 255, 0.95)
        );
        assert_eq!(
            nav.value("backdrop-blur-px").unwrap().as_scalar(),
            Some(12.0)
        );
    }

    #[test]
    fn hero_fade_drops_opacity_fully_by_thirty_percent() {
        let mut hero = hero_fade(0.0, 2000.0, 800.0).unwrap();
        // range is [0, 1200]; 30% of it is offset 360
        hero.update(360.0);
        assert_eq!(hero.value("opacity").unwrap().as_scalar(), Some(0.0));
        assert_eq!(hero.value("scale").unwrap().as_scalar(), Some(0.95));
    }

    #[test]
    fn all_presets_construct() {
        assert!(intro_sequencer().is_ok());
        assert!(home_shapes(1).is_ok());
        assert!(navigation_bar().is_ok());
        assert!(hero_fade(100.0, 3000.0, 800.0).is_ok());
        assert!(overlay_particles(1).is_ok());
        assert_eq!(names().len(), 5);
    }

    #[test]
    fn home_shapes_sample_before_measure_is_safe() {
        let e = home_shapes(7).unwrap();
        for t in e.sample(Millis(500)) {
            assert!(t.position.x.is_finite());
        }
    }
}
