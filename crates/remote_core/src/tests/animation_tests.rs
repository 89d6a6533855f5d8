use super::*;
use std::time::Duration;

use crate::testing::test_config;

fn controller(playing: bool) -> (AnimationController, PlaybackFlag, EventBus) {
    let flag = PlaybackFlag::new(playing);
    let events = EventBus::new(4096);
    let controller = AnimationController::with_rng(
        &test_config(),
        flag.clone(),
        events.clone(),
        StdRng::seed_from_u64(42),
    );
    (controller, flag, events)
}

fn words(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

fn positions(controller: &AnimationController) -> Vec<Vec2> {
    controller.words().iter().map(|word| word.position).collect()
}

#[tokio::test(start_paused = true)]
async fn words_stay_still_when_installed_while_paused() {
    let (controller, _flag, _events) = controller(false);
    controller.replace_words(words(&["hello", "darkness", "my", "old", "friend"]));

    assert_eq!(controller.words().len(), 5);
    assert_eq!(controller.active_tasks(), 0);
    assert_eq!(controller.generation(), 1);

    let before = positions(&controller);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(positions(&controller), before);
}

#[tokio::test(start_paused = true)]
async fn words_installed_while_playing_move_every_frame() {
    let (controller, _flag, events) = controller(true);
    let mut rx = events.subscribe();
    controller.replace_words(words(&["one", "two", "three"]));
    assert_eq!(controller.active_tasks(), 3);

    let before = positions(&controller);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let after = positions(&controller);
    for (a, b) in before.iter().zip(after.iter()) {
        assert_ne!(a, b);
    }

    assert_eq!(
        rx.recv().await.expect("event"),
        RemoteEvent::WordsReplaced(words(&["one", "two", "three"]))
    );
    let mut moved = 0;
    while let Ok(event) = rx.try_recv() {
        if matches!(event, RemoteEvent::WordMoved { .. }) {
            moved += 1;
        }
    }
    assert!(moved >= 3 * 5, "expected per-frame motion, got {moved} updates");
}

#[tokio::test(start_paused = true)]
async fn stop_all_freezes_every_word_and_is_idempotent() {
    let (controller, _flag, _events) = controller(true);
    controller.replace_words(words(&["a", "bb", "ccc", "dddd"]));
    tokio::time::sleep(Duration::from_millis(50)).await;

    controller.stop_all();
    assert_eq!(controller.active_tasks(), 0);
    let frozen = positions(&controller);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(positions(&controller), frozen);

    controller.stop_all();
    assert_eq!(controller.active_tasks(), 0);
    assert_eq!(positions(&controller), frozen);
}

#[tokio::test(start_paused = true)]
async fn resume_all_spawns_one_task_per_word_with_fresh_velocity() {
    let (controller, _flag, _events) = controller(true);
    controller.replace_words(words(&["never", "gonna", "give", "you", "up"]));
    tokio::time::sleep(Duration::from_millis(50)).await;
    controller.stop_all();
    let before: Vec<Vec2> = controller.words().iter().map(|w| w.velocity).collect();

    controller.resume_all();
    assert_eq!(controller.active_tasks(), 5);
    let after: Vec<Vec2> = controller.words().iter().map(|w| w.velocity).collect();
    assert_ne!(before, after);
    for velocity in after {
        for component in [velocity.x, velocity.y] {
            assert!(component.abs() >= 0.3 && component.abs() <= 0.8 + 1e-6);
        }
    }

    let frozen = positions(&controller);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_ne!(positions(&controller), frozen);

    // Resuming while already running still leaves exactly one task per word.
    controller.resume_all();
    assert_eq!(controller.active_tasks(), 5);
}

#[tokio::test(start_paused = true)]
async fn cleared_flag_halts_tasks_without_dropping_handles() {
    let (controller, flag, _events) = controller(true);
    controller.replace_words(words(&["stale", "but", "inert"]));
    tokio::time::sleep(Duration::from_millis(50)).await;

    flag.set(false);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let halted = positions(&controller);
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert_eq!(positions(&controller), halted);
    assert_eq!(controller.active_tasks(), 3);

    controller.stop_all();
    assert_eq!(controller.active_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn replace_words_cancels_previous_set_first() {
    let (controller, _flag, _events) = controller(true);
    controller.replace_words(words(&["first", "set"]));
    assert_eq!(controller.active_tasks(), 2);

    controller.replace_words(words(&["brand", "new", "words"]));
    assert_eq!(controller.active_tasks(), 3);
    assert_eq!(controller.generation(), 2);
    let texts: Vec<String> = controller.words().into_iter().map(|w| w.text).collect();
    assert_eq!(texts, words(&["brand", "new", "words"]));

    controller.replace_words(Vec::new());
    assert_eq!(controller.active_tasks(), 0);
    assert!(controller.words().is_empty());
}

#[tokio::test(start_paused = true)]
async fn discarded_words_stop_emitting_motion() {
    let (controller, _flag, events) = controller(true);
    let mut rx = events.subscribe();
    controller.replace_words(words(&["old", "set", "of", "four"]));
    tokio::time::sleep(Duration::from_millis(50)).await;

    controller.replace_words(words(&["solo"]));
    loop {
        match rx.try_recv().expect("replacement event") {
            RemoteEvent::WordsReplaced(texts) if texts == words(&["solo"]) => break,
            _ => {}
        }
    }

    tokio::time::sleep(Duration::from_millis(170)).await;
    let mut moved = 0;
    while let Ok(event) = rx.try_recv() {
        if let RemoteEvent::WordMoved { index, .. } = event {
            assert_eq!(index, 0, "motion from a discarded word");
            moved += 1;
        }
    }
    // One task at 16 ms per frame.
    assert!((9..=11).contains(&moved), "got {moved} updates");
}

#[tokio::test(start_paused = true)]
async fn words_start_inside_display_bounds() {
    let (controller, _flag, _events) = controller(false);
    let config = test_config();
    controller.replace_words(words(&["somewhat", "longer", "lyric", "lines", "here"]));
    for word in controller.words() {
        let extent = Extent::of_text(&word.text, config.glyph_width, config.line_height);
        assert!(word.position.x >= 0.0);
        assert!(word.position.x + extent.width <= config.display.width);
        assert!(word.position.y >= 0.0);
        assert!(word.position.y + extent.height <= config.display.height);
    }
}
