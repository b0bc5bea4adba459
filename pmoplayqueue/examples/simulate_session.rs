//! Drives a session against a simulated engine and prints what happens.
//!
//! ```sh
//! RUST_LOG=debug cargo run -p pmoplayqueue --example simulate_session
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use pmoconfig::Config;
use pmoplayqueue::{
    EngineEvent, EngineScope, PlaybackSynchronizer, PlayerConfigExt, PlayerEvent, RepeatMode,
    SequentialPlayer, ShuffleMode, Track,
};
use tracing_subscriber::EnvFilter;

const PLAYLIST: &str = r#"[
    {"id": "a", "name": "Blue in Green", "artist_name": "Miles Davis", "media_locator": "https://media.example.org/a.flac", "artwork_locator": "https://img.example.org/kob.jpg"},
    {"id": "b", "name": "So What", "artist_name": "Miles Davis", "media_locator": "https://media.example.org/b.flac"},
    {"id": "c", "name": "Naima", "artist_name": "John Coltrane", "media_locator": "/music/naima.flac", "artwork_locator": "/music/naima.jpg"},
    {"id": "d", "name": "Footprints", "artist_name": "Wayne Shorter", "media_locator": "https://media.example.org/d.flac"}
]"#;

/// Engine that plays instantly and asks for each new slot right away.
#[derive(Default)]
struct SimulatedPlayer {
    items_count: usize,
    current: Option<usize>,
    playing: bool,
    shuffle: ShuffleMode,
    repeat: RepeatMode,
    requests: VecDeque<usize>,
}

impl SequentialPlayer for SimulatedPlayer {
    type Item = usize;

    fn set_items_count(&mut self, count: usize) {
        self.items_count = count;
    }

    fn fetch_and_play(&mut self, index: usize) {
        println!("  engine: fetch and play #{index}");
        self.current = Some(index);
        self.playing = true;
        self.requests.push_back(index);
    }

    fn setup_item(&mut self, locator: &str, index: usize) {
        println!("  engine: #{index} <- {locator}");
    }

    fn remove_item(&mut self, index: usize) {
        println!("  engine: remove #{index}");
    }

    fn move_item(&mut self, from: usize, to: usize) {
        println!("  engine: move #{from} -> #{to}");
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
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn play_next(&mut self) {
        let next = self.current.map_or(0, |i| i + 1);
        if next < self.items_count {
            self.current = Some(next);
            self.requests.push_back(next);
        }
    }

    fn play_previous(&mut self) {
        if let Some(current) = self.current {
            let previous = current.saturating_sub(1);
            self.current = Some(previous);
            self.requests.push_back(previous);
        }
    }

    fn seek_to_time(&mut self, seconds: f64) {
        println!("  engine: seek to {seconds:.1}s");
    }

    fn playing_item_duration(&self) -> f64 {
        if self.current.is_some() { 240.0 } else { 0.0 }
    }

    fn shuffle_mode(&self) -> ShuffleMode {
        self.shuffle
    }

    fn set_shuffle_mode(&mut self, mode: ShuffleMode) {
        self.shuffle = mode;
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    fn start_time_observer(&mut self, interval: Duration) {
        println!("  engine: time observer every {interval:?}");
    }
}

/// Serves queued engine requests the way a real engine callback loop would.
fn pump(session: &mut PlaybackSynchronizer<SimulatedPlayer>) {
    while let Some(index) = session.player_mut().requests.pop_front() {
        let outcome = session.request_url_for_item(index, false);
        println!("  request #{index}: {outcome:?}");
        session.handle_engine_event(EngineEvent::CurrentItemChanged);
    }
}

fn print_events(events: &crossbeam_channel::Receiver<PlayerEvent>) {
    for event in events.try_iter() {
        match event {
            PlayerEvent::TrackChanged(Some(track)) => {
                println!("  host: now playing {}", track.name.as_deref().unwrap_or(&track.id))
            }
            PlayerEvent::NowPlayingChanged(info) => {
                println!("  host: now playing info {} / {} ({:?})", info.title, info.artist, info.artwork)
            }
            PlayerEvent::QueueUpdated | PlayerEvent::DurationKnown(_) => {}
            other => println!("  host: {other:?}"),
        }
    }
}

fn main() -> Result<()> {
    let config = Config::defaults()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.get_log_filter()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let mut settings = config.player_settings();
    settings.shuffle_seed = Some(2024);

    let mut session = PlaybackSynchronizer::new(SimulatedPlayer::default(), settings);
    let events = session.subscribe();
    session.handle_engine_event(EngineEvent::Ready(EngineScope::Player));

    let tracks: Vec<Track> = serde_json::from_str(PLAYLIST)?;
    println!("== set playlist ({} tracks)", tracks.len());
    session.set_playlist(tracks);
    session.play_all();
    pump(&mut session);
    print_events(&events);

    println!("== queue a track to play next");
    session.enqueue_next(Track::new("https://media.example.org/bonus.flac").with_name("Bonus"))?;
    session.next();
    pump(&mut session);
    print_events(&events);

    println!("== jump to main row 3");
    session.play_main_at(3)?;
    pump(&mut session);
    print_events(&events);

    println!("== previous");
    session.previous();
    pump(&mut session);
    print_events(&events);

    println!("== shuffle");
    session.enable_shuffle();
    session.next();
    pump(&mut session);
    print_events(&events);

    println!("== seek to half");
    session.seek_to(0.5)?;

    println!("\nhistory:");
    for track in session.queue().history() {
        println!("  {}", track.name.as_deref().unwrap_or(&track.id));
    }
    println!("snapshot: {:?}", session.queue_snapshot());
    Ok(())
}
