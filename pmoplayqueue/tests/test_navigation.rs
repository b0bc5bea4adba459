mod common;

use common::{Command, next_track, session, start_at};
use pmoplayqueue::{
    EngineEvent, PlayQueueError, PlayerEvent, RemoteCommand, RemoteCommandStatus, RepeatMode,
    RequestOutcome, SyncState,
};

#[test]
fn test_manual_jump_resumes_after_pre_jump_item() {
    let mut session = session(8);
    start_at(&mut session, 1);
    session.enqueue_next(next_track("n0")).unwrap();
    session.enqueue_next(next_track("n1")).unwrap();
    session.player_mut().take_commands();

    // two play-next tracks sit at engine 2 and 3, so main 5 is engine 7
    assert_eq!(session.play_main_at(5), Ok(7));
    assert_eq!(session.state(), SyncState::PendingManualJump { target: 1 });
    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::FetchAndPlay(7)]
    );

    // the index argument of the next request does not matter
    assert_eq!(
        session.request_url_for_item(99, false),
        RequestOutcome::Jumped { to: 2 }
    );
    assert_eq!(session.state(), SyncState::Normal);
    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::FetchAndPlay(2)]
    );

    // forward playback then picks the play-next head up again
    assert_eq!(
        session.request_url_for_item(2, false),
        RequestOutcome::Materialized {
            index: 2,
            track_id: "n0".into()
        }
    );
}

#[test]
fn test_play_main_at_without_next_is_a_plain_jump() {
    let mut session = session(5);
    start_at(&mut session, 0);
    session.player_mut().take_commands();

    assert_eq!(session.play_main_at(3), Ok(3));
    assert_eq!(session.state(), SyncState::Normal);
    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::FetchAndPlay(3)]
    );
    assert_eq!(
        session.play_main_at(5),
        Err(PlayQueueError::UnknownMainIndex(5))
    );
}

#[test]
fn test_previous_moves_played_track_before_stepping_back() {
    let mut session = session(6);
    start_at(&mut session, 1);
    start_at(&mut session, 4);
    session.player_mut().take_commands();

    session.previous();

    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::MoveItem(1, 3), Command::PlayPrevious]
    );
    assert_eq!(session.current_engine_index(), Some(3));

    let events = session.subscribe();
    session.handle_engine_event(EngineEvent::CurrentItemChanged);
    let changed = events.try_recv().unwrap();
    match changed {
        PlayerEvent::TrackChanged(Some(track)) => assert_eq!(track.id, "m1"),
        other => panic!("unexpected event {other:?}"),
    }
    // main order is untouched
    assert_eq!(session.queue().main_tracks()[1].id, "m1");
}

#[test]
fn test_previous_onto_played_slot_moves_nothing() {
    let mut session = session(4);
    start_at(&mut session, 0);
    session.next();
    session.request_url_for_item(1, false);
    session.handle_engine_event(EngineEvent::CurrentItemChanged);
    session.player_mut().take_commands();

    session.previous();

    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::PlayPrevious]
    );
}

#[test]
fn test_previous_without_current_item_does_nothing() {
    let mut session = session(3);
    session.previous();
    assert!(session.player_mut().take_commands().is_empty());
    assert_eq!(session.current_engine_index(), None);
}

#[test]
fn test_play_next_at_head_is_next() {
    let mut session = session(3);
    start_at(&mut session, 0);
    session.enqueue_next(next_track("n0")).unwrap();
    session.player_mut().take_commands();

    session.play_next_at(0).unwrap();
    assert_eq!(session.player_mut().take_commands(), vec![Command::PlayNext]);
}

#[test]
fn test_play_next_at_moves_entry_to_head() {
    let mut session = session(3);
    start_at(&mut session, 0);
    for id in ["n0", "n1", "n2"] {
        session.enqueue_next(next_track(id)).unwrap();
    }
    session.player_mut().take_commands();

    session.play_next_at(2).unwrap();
    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::SetItemsCount(6), Command::FetchAndPlay(1)]
    );
    assert_eq!(
        session.request_url_for_item(1, false),
        RequestOutcome::Materialized {
            index: 1,
            track_id: "n2".into()
        }
    );
    assert_eq!(
        session.play_next_at(5),
        Err(PlayQueueError::UnknownNextIndex(5))
    );
}

#[test]
fn test_play_and_pause_are_guarded() {
    let mut session = session(2);
    session.pause();
    session.play();
    session.play();
    session.pause();

    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::Play, Command::Pause]
    );
}

#[test]
fn test_seek_uses_known_duration() {
    let mut session = session(2);
    session.seek_to(0.5).unwrap();
    assert!(session.player_mut().take_commands().is_empty());

    session.player_mut().duration = 200.0;
    session.seek_to(0.5).unwrap();
    session.seek_to_slider(30.0, 0.0, 60.0).unwrap();
    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::SeekToTime(100.0), Command::SeekToTime(100.0)]
    );

    assert_eq!(
        session.seek_to(1.5),
        Err(PlayQueueError::InvalidSeekFraction(1.5))
    );
    assert!(session.seek_to_slider(1.0, 5.0, 5.0).is_err());
}

#[test]
fn test_repeat_modes_are_forwarded() {
    let mut session = session(2);
    session.enable_repeat();
    assert_eq!(session.repeat_mode(), RepeatMode::All);
    session.enable_repeat_one();
    assert_eq!(session.repeat_mode(), RepeatMode::One);
    session.disable_repeat();
    assert_eq!(session.repeat_mode(), RepeatMode::Off);
}

#[test]
fn test_remote_commands() {
    let mut empty = session(0);
    assert_eq!(
        empty.handle_remote_command(RemoteCommand::Next),
        RemoteCommandStatus::NoActionableItem
    );
    assert!(empty.player_mut().take_commands().is_empty());

    let mut session = session(3);
    for command in [
        RemoteCommand::TogglePlayPause,
        RemoteCommand::TogglePlayPause,
        RemoteCommand::Next,
    ] {
        assert_eq!(
            session.handle_remote_command(command),
            RemoteCommandStatus::Success
        );
    }
    assert_eq!(
        session.player_mut().take_commands(),
        vec![Command::Play, Command::Pause, Command::PlayNext]
    );
}
