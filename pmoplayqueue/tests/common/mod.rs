#![allow(dead_code)]

use std::time::Duration;

use pmoplayqueue::{
    PlaybackSynchronizer, PlayerSettings, RepeatMode, SequentialPlayer, ShuffleMode, Track,
};

/// Engine command as seen by the engine, in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetItemsCount(usize),
    FetchAndPlay(usize),
    SetupItem { locator: String, index: usize },
    RemoveItem(usize),
    MoveItem(usize, usize),
    Play,
    Pause,
    PlayNext,
    PlayPrevious,
    SeekToTime(f64),
    SetShuffleMode(ShuffleMode),
    SetRepeatMode(RepeatMode),
    SetMemoryCache(bool),
    StartTimeObserver(Duration),
}

/// In-memory engine recording every command it receives.
///
/// Navigation commands move `current` the way a real engine would once the
/// new item starts; tests still deliver `CurrentItemChanged` themselves.
#[derive(Debug, Default)]
pub struct RecordingPlayer {
    pub commands: Vec<Command>,
    pub current: Option<usize>,
    pub playing: bool,
    pub items_count: usize,
    pub duration: f64,
    pub shuffle: ShuffleMode,
    pub repeat: RepeatMode,
}

impl RecordingPlayer {
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }
}

impl SequentialPlayer for RecordingPlayer {
    type Item = usize;

    fn set_items_count(&mut self, count: usize) {
        self.items_count = count;
        self.commands.push(Command::SetItemsCount(count));
    }

    fn fetch_and_play(&mut self, index: usize) {
        self.current = Some(index);
        self.playing = true;
        self.commands.push(Command::FetchAndPlay(index));
    }

    fn setup_item(&mut self, locator: &str, index: usize) {
        self.commands.push(Command::SetupItem {
            locator: locator.to_string(),
            index,
        });
    }

    fn remove_item(&mut self, index: usize) {
        self.commands.push(Command::RemoveItem(index));
    }

    fn move_item(&mut self, from: usize, to: usize) {
        self.commands.push(Command::MoveItem(from, to));
    }

    fn current_index(&self) -> Option<usize> {
        self.current
    }

    fn current_item(&self) -> Option<usize> {
        self.current
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
        self.commands.push(Command::Play);
    }

    fn pause(&mut self) {
        self.playing = false;
        self.commands.push(Command::Pause);
    }

    fn play_next(&mut self) {
        self.current = Some(self.current.map_or(0, |i| i + 1));
        self.commands.push(Command::PlayNext);
    }

    fn play_previous(&mut self) {
        self.current = self.current.map(|i| i.saturating_sub(1));
        self.commands.push(Command::PlayPrevious);
    }

    fn seek_to_time(&mut self, seconds: f64) {
        self.commands.push(Command::SeekToTime(seconds));
    }

    fn playing_item_duration(&self) -> f64 {
        self.duration
    }

    fn shuffle_mode(&self) -> ShuffleMode {
        self.shuffle
    }

    fn set_shuffle_mode(&mut self, mode: ShuffleMode) {
        self.shuffle = mode;
        self.commands.push(Command::SetShuffleMode(mode));
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.commands.push(Command::SetRepeatMode(mode));
    }

    fn set_memory_cache(&mut self, enabled: bool) {
        self.commands.push(Command::SetMemoryCache(enabled));
    }

    fn start_time_observer(&mut self, interval: Duration) {
        self.commands.push(Command::StartTimeObserver(interval));
    }
}

pub fn main_track(i: usize) -> Track {
    Track::new(format!("mem://main/{i}"))
        .with_id(format!("m{i}"))
        .with_name(format!("Main {i}"))
}

pub fn next_track(id: &str) -> Track {
    Track::new(format!("mem://next/{id}")).with_id(id)
}

pub fn playlist(n: usize) -> Vec<Track> {
    (0..n).map(main_track).collect()
}

pub fn settings() -> PlayerSettings {
    PlayerSettings {
        shuffle_seed: Some(11),
        ..PlayerSettings::default()
    }
}

/// Session with `n` main tracks and an empty command log.
pub fn session(n: usize) -> PlaybackSynchronizer<RecordingPlayer> {
    let mut session = PlaybackSynchronizer::new(RecordingPlayer::default(), settings());
    session.set_playlist(playlist(n));
    session.player_mut().take_commands();
    session
}

/// Plays engine index `index` end to end: fetch, locator request, item change.
pub fn start_at(session: &mut PlaybackSynchronizer<RecordingPlayer>, index: usize) {
    session.play_at(index);
    session.request_url_for_item(index, false);
    session.handle_engine_event(pmoplayqueue::EngineEvent::CurrentItemChanged);
}

pub fn setup_locator(commands: &[Command], index: usize) -> Option<&str> {
    commands.iter().find_map(|c| match c {
        Command::SetupItem { locator, index: i } if *i == index => Some(locator.as_str()),
        _ => None,
    })
}
