//! End-to-end runs through the public API

use glam::Vec2;

use fruit_slice::audio::SoundCue;
use fruit_slice::persistence::{MemoryStore, load_ranked_scores, save_ranked_scores};
use fruit_slice::sim::{
    Achievement, Fruit, FruitKind, GameEvent, GamePhase, GameState, Playfield, PointerEvent, PowerupKind,
    TickInput, tick,
};
use fruit_slice::{HighScores, NotificationQueue, Settings};

const FRAME_MS: f32 = 1000.0 / 60.0;

/// A started run with the opening volley cleared away and the next
/// scheduled spawn a full interval off
fn empty_run(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Playfield::new(800.0, 600.0));
    state.start();
    state.fruits.clear();
    state.last_spawn_ms = 0.0;
    state.drain_events();
    state
}

fn place(state: &mut GameState, kind: FruitKind, pos: Vec2) {
    let id = state.next_entity_id();
    state.fruits.push(Fruit::new(id, kind, pos, Vec2::ZERO));
}

fn swipe(from: Vec2, to: Vec2) -> TickInput {
    TickInput {
        pointer: vec![
            PointerEvent::Down(from),
            PointerEvent::Move(to),
            PointerEvent::Up,
        ],
        ..Default::default()
    }
}

fn sliced_points(events: &[GameEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::FruitSliced { points, .. } => Some(*points),
            _ => None,
        })
        .collect()
}

#[test]
fn single_slice_scores_and_removes_fruit() {
    let mut state = empty_run(1);
    place(&mut state, FruitKind::Apple, Vec2::new(400.0, 300.0));

    tick(
        &mut state,
        &swipe(Vec2::new(300.0, 300.0), Vec2::new(500.0, 300.0)),
        FRAME_MS,
    );

    assert!(state.fruits.is_empty());
    assert_eq!(state.progression.score, 10);
    assert_eq!(state.progression.fruits_sliced, 1);
    assert_eq!(state.progression.combo, 2);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn combo_builds_across_frames() {
    let mut state = empty_run(2);
    let mut events = Vec::new();

    for _ in 0..3 {
        place(&mut state, FruitKind::Banana, Vec2::new(400.0, 200.0));
        tick(
            &mut state,
            &swipe(Vec2::new(300.0, 200.0), Vec2::new(500.0, 200.0)),
            FRAME_MS,
        );
        events.extend(state.drain_events());
    }

    assert_eq!(sliced_points(&events), vec![10, 20, 30]);
    assert_eq!(state.progression.score, 60);
    assert_eq!(state.progression.combo, 4);

    // Third hit reaches the combo cue
    let last = events
        .iter()
        .rev()
        .find(|e| matches!(e, GameEvent::FruitSliced { .. }))
        .unwrap();
    assert_eq!(SoundCue::for_event(last), &[SoundCue::Slice, SoundCue::Combo]);
}

#[test]
fn bomb_ends_run_even_with_powerups() {
    let mut state = empty_run(3);
    let activate = TickInput {
        activate: PowerupKind::ALL.to_vec(),
        ..Default::default()
    };
    tick(&mut state, &activate, FRAME_MS);
    assert_eq!(state.effects.active().count(), 3);

    place(&mut state, FruitKind::Bomb, Vec2::new(400.0, 300.0));
    tick(
        &mut state,
        &swipe(Vec2::new(300.0, 300.0), Vec2::new(500.0, 300.0)),
        FRAME_MS,
    );

    assert_eq!(state.phase, GamePhase::GameOver);
    assert_eq!(state.progression.lives, 2);
    assert_eq!(state.progression.combo, 1);
    let events = state.drain_events();
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

    // A finished run no longer moves
    let elapsed = state.elapsed_ms;
    tick(&mut state, &TickInput::default(), FRAME_MS);
    assert_eq!(state.elapsed_ms, elapsed);
}

#[test]
fn level_up_reaches_notifications() {
    let mut state = empty_run(4);
    state.progression.xp = 95;
    place(&mut state, FruitKind::Orange, Vec2::new(400.0, 300.0));
    tick(
        &mut state,
        &swipe(Vec2::new(300.0, 300.0), Vec2::new(500.0, 300.0)),
        FRAME_MS,
    );

    let mut notes = NotificationQueue::new();
    for event in state.drain_events() {
        notes.push_event(&event);
    }
    assert_eq!(notes.current(), Some("Level Up! You are now level 2!"));
    assert_eq!(state.progression.level, 2);
}

#[test]
fn achievements_carry_into_the_next_run() {
    let mut state = empty_run(6);
    let mut unlocks = Vec::new();
    for run in 0..2 {
        if run > 0 {
            state.game_over();
            state.start();
            state.fruits.clear();
            state.last_spawn_ms = 0.0;
            state.drain_events();
        }
        state.progression.fruits_sliced = 9;
        place(&mut state, FruitKind::Apple, Vec2::new(400.0, 300.0));
        tick(
            &mut state,
            &swipe(Vec2::new(300.0, 300.0), Vec2::new(500.0, 300.0)),
            FRAME_MS,
        );
        unlocks.push(
            state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::AchievementUnlocked(Achievement::SliceTen)))
                .count(),
        );
    }

    assert_eq!(unlocks, vec![1, 0]);
    assert!(state.progression.has(Achievement::SliceTen));
    assert_eq!(state.progression.score, 10);
}

#[test]
fn finished_run_lands_on_leaderboard() {
    let mut store = MemoryStore::new();
    let mut scores = load_ranked_scores(&store);
    assert!(scores.is_empty());

    let mut state = GameState::with_settings(5, Playfield::default(), &Settings::default());
    state.start();
    state.fruits.clear();
    place(&mut state, FruitKind::Strawberry, Vec2::new(200.0, 200.0));
    place(&mut state, FruitKind::Bomb, Vec2::new(600.0, 200.0));
    tick(
        &mut state,
        &swipe(Vec2::new(100.0, 200.0), Vec2::new(700.0, 200.0)),
        FRAME_MS,
    );
    assert_eq!(state.phase, GamePhase::GameOver);

    let progress = &state.progression;
    assert!(scores.qualifies(progress.score));
    let rank = scores.add_score("", progress.score, progress.level, 0.0);
    assert_eq!(rank, Some(1));
    save_ranked_scores(&mut store, &scores).unwrap();

    let reloaded: HighScores = load_ranked_scores(&store);
    assert_eq!(reloaded.entries[0].name, "Anonymous");
    assert_eq!(reloaded.top_score(), Some(10));
}

#[test]
fn same_seed_same_run() {
    let play = |seed| {
        let mut state = GameState::new(seed, Playfield::default());
        state.start();
        for i in 0..900u32 {
            let input = if i % 30 == 0 {
                swipe(Vec2::new(0.0, 350.0), Vec2::new(800.0, 350.0))
            } else {
                TickInput::default()
            };
            tick(&mut state, &input, FRAME_MS);
        }
        (state.progression.clone(), state.fruits.clone(), state.phase)
    };
    assert_eq!(play(2024), play(2024));
}
