//! Integration tests for the classifier and resolver through the public API.
//!
//! The classifier tests sweep a grid of displacements and check each result
//! against the rule that should have matched first; the resolver tests drive
//! layout switches through a swappable in-memory layout source.

use std::sync::Arc;

use gesture_core::{
    classify, GestureOutcome, KeyCode, KeyLayoutResolver, KeyboardLayoutSource, ModifierFlags,
    StaticLayout, StaticLayoutSource,
};

/// Independent statement of the first-match rule chain.
fn expected(dx: f64, dy: f64) -> GestureOutcome {
    let rules: [(bool, GestureOutcome); 5] = [
        (dx < -50.0 && dy.abs() < 50.0, GestureOutcome::Back),
        (dx > 50.0 && dy.abs() < 50.0, GestureOutcome::Forward),
        (dx.abs() < 30.0 && dy < -50.0, GestureOutcome::MissionControl),
        (dx < -30.0 && dy < -25.0, GestureOutcome::CloseTab),
        (dx > 30.0 && dy < -25.0, GestureOutcome::NewTab),
    ];
    rules
        .iter()
        .find(|(hit, _)| *hit)
        .map(|(_, outcome)| *outcome)
        .unwrap_or(GestureOutcome::None)
}

#[test]
fn test_classify_matches_first_rule_over_grid() {
    for i in -40..=40 {
        for j in -40..=40 {
            let (dx, dy) = (f64::from(i) * 5.0, f64::from(j) * 5.0);
            assert_eq!(classify(dx, dy), expected(dx, dy), "dx={dx} dy={dy}");
        }
    }
}

#[test]
fn test_classify_is_deterministic() {
    for &(dx, dy) in &[(-60.0, 0.0), (40.0, -40.0), (0.0, 0.0), (-40.0, -60.0)] {
        assert_eq!(classify(dx, dy), classify(dx, dy));
    }
}

#[test]
fn test_every_actionable_outcome_is_reachable() {
    let samples = [(-60.0, 0.0), (60.0, 0.0), (-40.0, -40.0), (40.0, -40.0), (0.0, -60.0)];
    let reached: Vec<GestureOutcome> = samples.iter().map(|&(x, y)| classify(x, y)).collect();
    for outcome in GestureOutcome::ACTIONABLE {
        assert!(reached.contains(&outcome), "{outcome} not reached");
    }
}

/// French AZERTY fragment: 'a' and 'q' swap, '[' needs option+shift+5.
fn french() -> StaticLayout {
    StaticLayout::new("com.apple.keylayout.French")
        .with_pair(0x00, 'q', 'Q')
        .with_pair(0x0C, 'a', 'A')
        .with_pair(0x0D, 'z', 'Z')
        .with_pair(0x06, 'w', 'W')
        .with_key(
            KeyCode(0x17),
            ModifierFlags::from_bits(ModifierFlags::SHIFT | ModifierFlags::OPTION),
            '[',
        )
}

#[test]
fn test_layout_switch_never_serves_stale_combo() {
    // Arrange
    let source = Arc::new(StaticLayoutSource::us_ansi());
    let mut resolver =
        KeyLayoutResolver::new(Arc::clone(&source) as Arc<dyn KeyboardLayoutSource>);
    let invalidator = resolver.invalidator();
    let us_w = resolver.resolve('w').expect("w on US");
    let us_a = resolver.resolve('a').expect("a on US");

    // Act
    source.switch_to(french());
    invalidator.notify();
    let fr_w = resolver.resolve('w').expect("w on French");
    let fr_a = resolver.resolve('a').expect("a on French");

    // Assert
    assert_eq!(us_w.code, KeyCode(0x0D));
    assert_eq!(fr_w.code, KeyCode(0x06));
    assert_eq!(us_a.code, KeyCode(0x00));
    assert_eq!(fr_a.code, KeyCode(0x0C));
    assert_eq!(resolver.probe_count(), 4);
}

#[test]
fn test_option_shift_bracket_on_french() {
    let source = Arc::new(StaticLayoutSource::new(french()));
    let mut resolver = KeyLayoutResolver::new(source);

    let combo = resolver.resolve('[').expect("bracket");
    let mods = combo.modifiers_with(ModifierFlags::from_bits(ModifierFlags::COMMAND));

    assert_eq!(combo.code, KeyCode(0x17));
    assert!(mods.command() && mods.shift() && mods.option());
}

#[test]
fn test_repeated_resolution_hits_cache() {
    let mut resolver = KeyLayoutResolver::new(Arc::new(StaticLayoutSource::us_ansi()));
    for _ in 0..10 {
        for ch in ['[', ']', 'w', 't'] {
            assert!(resolver.resolve(ch).is_some());
        }
    }
    assert_eq!(resolver.probe_count(), 4);
    assert_eq!(resolver.cached_len(), 4);
}
