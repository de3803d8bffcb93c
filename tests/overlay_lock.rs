use kinetica::{Millis, OverlayController, ScrollLockHost, Timeline, presets};

#[test]
fn unmount_without_close_still_releases_the_lock() {
    let host = ScrollLockHost::new();
    host.set_style("auto");

    let mut overlay = OverlayController::new(host.clone());
    overlay.open();
    assert_eq!(host.style(), "hidden");

    // unmounted while open: no close() ever runs
    drop(overlay);
    assert_eq!(host.style(), "auto");
    assert!(!host.is_locked());
}

#[test]
fn every_open_close_sequence_round_trips_the_prior_style() {
    let host = ScrollLockHost::new();
    host.set_style("overlay-x: scroll");
    let before = host.style();

    let mut overlay = OverlayController::new(host.clone());
    for _ in 0..5 {
        overlay.open();
        assert_eq!(host.style(), "hidden");
        overlay.close();
        assert_eq!(host.style(), before);
    }

    // interleaved with a second opener, then unmount both while open
    let mut other = OverlayController::new(host.clone());
    overlay.open();
    other.open();
    overlay.close();
    assert_eq!(host.style(), "hidden");
    drop(other);
    assert_eq!(host.style(), before);
}

#[test]
fn overlay_scenes_are_independent_of_page_level_instances() {
    // page-level timeline
    let mut page = Timeline::new().with_mapper("nav", presets::navigation_bar().unwrap());
    page.set_scroll("nav", 100.0);

    // overlay opens with its own nested instances scoped to its viewport
    let host = ScrollLockHost::new();
    let mut overlay = OverlayController::new(host.clone());
    overlay.open();
    let mut scene = Timeline::new()
        .with_mapper("hero", presets::hero_fade(0.0, 2000.0, 800.0).unwrap())
        .with_particles(presets::overlay_particles(5).unwrap());
    scene.set_scroll("hero", 0.0);
    scene.advance_to(Millis(2000));

    // the nested mapper never saw the page's scroll offset
    let frame = scene.eval(Millis(2000));
    assert_eq!(
        frame.channels.get("hero.opacity").and_then(|v| v.as_scalar()),
        Some(1.0)
    );
    assert_eq!(frame.particles.len(), 30);

    // page values are untouched by the overlay's life
    overlay.close();
    let page_frame = page.eval(Millis(2000));
    assert_eq!(
        page_frame
            .channels
            .get("nav.backdrop-blur-px")
            .and_then(|v| v.as_scalar()),
        Some(12.0)
    );
}
