mod common;

use std::thread;
use std::time::Duration;

use common::{Command, RecordingPlayer, session, settings, start_at};
use pmoplayqueue::{
    EngineEvent, EngineScope, PlaybackSynchronizer, PlayerEvent, PlayerSettings, RequestOutcome,
};

#[test]
fn test_history_grows_with_each_item_change() {
    let mut session = session(4);
    start_at(&mut session, 0);
    for index in 1..4 {
        session.next();
        session.request_url_for_item(index, false);
        session.handle_engine_event(EngineEvent::CurrentItemChanged);
    }

    let ids: Vec<&str> = session
        .queue()
        .history()
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["m0", "m1", "m2", "m3"]);
}

#[test]
fn test_unknown_current_index_is_tolerated() {
    let mut session = session(2);
    let events = session.subscribe();
    session.player_mut().current = Some(50);

    session.handle_engine_event(EngineEvent::CurrentItemChanged);

    assert!(session.queue().history().is_empty());
    assert_eq!(events.try_recv().unwrap(), PlayerEvent::TrackChanged(None));
    assert_eq!(events.try_recv().unwrap(), PlayerEvent::QueueUpdated);
}

#[test]
fn test_item_change_publishes_track_and_metadata() {
    let mut session = session(3);
    session.player_mut().duration = 180.0;
    let events = session.subscribe();

    start_at(&mut session, 0);

    let received: Vec<PlayerEvent> = events.try_iter().collect();
    assert_eq!(received.len(), 4);
    assert!(matches!(&received[0], PlayerEvent::TrackChanged(Some(t)) if t.id == "m0"));
    assert_eq!(received[1], PlayerEvent::QueueUpdated);
    assert_eq!(received[2], PlayerEvent::DurationKnown(180.0));
    match &received[3] {
        PlayerEvent::NowPlayingChanged(info) => {
            assert_eq!(info.title, "Main 0");
            assert_eq!(info.artist, "");
            assert_eq!(info.duration, Some(180.0));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn test_current_item_failure_advances() {
    let mut session = session(3);
    start_at(&mut session, 0);
    let events = session.subscribe();
    session.player_mut().take_commands();

    session.handle_engine_event(EngineEvent::Failed {
        scope: EngineScope::CurrentItem,
        error: "decode error".into(),
    });

    assert_eq!(session.player_mut().take_commands(), vec![Command::PlayNext]);
    assert_eq!(
        events.try_recv().unwrap(),
        PlayerEvent::PlaybackFailed {
            scope: EngineScope::CurrentItem,
            message: "decode error".into()
        }
    );
}

#[test]
fn test_player_failure_is_only_reported() {
    let mut session = session(3);
    let events = session.subscribe();

    session.handle_engine_event(EngineEvent::Failed {
        scope: EngineScope::Player,
        error: "output lost".into(),
    });

    assert!(session.player_mut().take_commands().is_empty());
    assert!(matches!(
        events.try_recv().unwrap(),
        PlayerEvent::PlaybackFailed {
            scope: EngineScope::Player,
            ..
        }
    ));
}

#[test]
fn test_player_ready_starts_time_observer() {
    let mut session = session(1);
    let events = session.subscribe();

    session.handle_engine_event(EngineEvent::Ready(EngineScope::Player));
    session.handle_engine_event(EngineEvent::TimeTick { seconds: 12.5 });
    session.handle_engine_event(EngineEvent::RateChanged { playing: true });

    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::StartTimeObserver(Duration::from_millis(100))]
    );
    assert_eq!(events.try_recv().unwrap(), PlayerEvent::CurrentTimeChanged(12.5));
    assert_eq!(
        events.try_recv().unwrap(),
        PlayerEvent::RateChanged { playing: true }
    );
}

#[test]
fn test_item_ready_refreshes_duration() {
    let mut session = session(2);
    start_at(&mut session, 1);
    session.player_mut().duration = 42.0;
    let events = session.subscribe();

    session.handle_engine_event(EngineEvent::Ready(EngineScope::CurrentItem));

    assert_eq!(events.try_recv().unwrap(), PlayerEvent::DurationKnown(42.0));
    assert!(matches!(
        events.try_recv().unwrap(),
        PlayerEvent::NowPlayingChanged(info) if info.title == "Main 1"
    ));
}

#[test]
fn test_informational_events_change_nothing() {
    let mut session = session(2);
    let events = session.subscribe();
    for event in [
        EngineEvent::WillChangeAt(1),
        EngineEvent::ReachedEnd,
        EngineEvent::CurrentItemPreloaded { seconds: 3.0 },
        EngineEvent::ItemFailedToPlayToEnd {
            error: "eof".into(),
        },
        EngineEvent::ItemStalled,
    ] {
        session.handle_engine_event(event);
    }
    assert!(events.try_recv().is_err());
    assert!(session.player_mut().take_commands().is_empty());
}

#[test]
fn test_memory_cache_setting_is_forwarded() {
    let session = PlaybackSynchronizer::new(
        RecordingPlayer::default(),
        PlayerSettings {
            memory_cache: true,
            ..settings()
        },
    );
    assert_eq!(session.player().commands, vec![Command::SetMemoryCache(true)]);
}

#[test]
fn test_shared_session_serves_requests_from_another_thread() {
    let mut session = session(3);
    session.play_all();
    let shared = session.into_shared();

    let engine_side = shared.clone();
    let outcome = thread::spawn(move || {
        let mut session = engine_side.lock().unwrap();
        let outcome = session.request_url_for_item(0, false);
        session.handle_engine_event(EngineEvent::CurrentItemChanged);
        outcome
    })
    .join()
    .unwrap();

    assert_eq!(
        outcome,
        RequestOutcome::Materialized {
            index: 0,
            track_id: "m0".into()
        }
    );
    let session = shared.lock().unwrap();
    assert_eq!(session.queue().history().len(), 1);
    assert_eq!(session.current_track().map(|t| t.id), Some("m0".to_string()));
}
