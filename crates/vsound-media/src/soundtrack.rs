//! Genre soundtrack playback kept in step with the video.

use tracing::debug;
use vsound_models::Genre;

/// Audio element the player drives.
pub trait AudioOutput {
    fn load(&mut self, url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
}

/// Snapshot of the video transport when a genre is picked.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VideoTransport {
    pub playing: bool,
    /// Current playback offset in seconds
    pub position: f64,
}

impl VideoTransport {
    pub fn playing_at(position: f64) -> Self {
        Self {
            playing: true,
            position,
        }
    }

    pub fn paused_at(position: f64) -> Self {
        Self {
            playing: false,
            position,
        }
    }
}

/// Plays the stock track of the selected genre under the video.
///
/// Picking the active genre again switches the soundtrack off. Video
/// play, pause and seek are mirrored onto the audio while a genre is active.
#[derive(Debug)]
pub struct SoundtrackPlayer<A> {
    output: A,
    active: Option<Genre>,
}

impl<A: AudioOutput> SoundtrackPlayer<A> {
    pub fn new(output: A) -> Self {
        Self {
            output,
            active: None,
        }
    }

    pub fn active(&self) -> Option<Genre> {
        self.active
    }

    pub fn output(&self) -> &A {
        &self.output
    }

    /// Toggle `genre`, returning the genre that is active afterwards.
    pub fn select(&mut self, genre: Genre, video: VideoTransport) -> Option<Genre> {
        if self.active == Some(genre) {
            debug!(%genre, "Deselecting soundtrack");
            self.output.pause();
            self.active = None;
            return None;
        }

        debug!(%genre, playing = video.playing, "Switching soundtrack");
        self.output.load(genre.track_url());
        self.active = Some(genre);
        if video.playing {
            self.output.seek(video.position);
            self.output.play();
        }
        self.active
    }

    /// Stop the soundtrack regardless of which genre is active.
    pub fn clear(&mut self) {
        if self.active.take().is_some() {
            self.output.pause();
        }
    }

    pub fn on_video_play(&mut self, position: f64) {
        if self.active.is_some() {
            self.output.seek(position);
            self.output.play();
        }
    }

    pub fn on_video_pause(&mut self) {
        if self.active.is_some() {
            self.output.pause();
        }
    }

    pub fn on_video_seek(&mut self, position: f64) {
        if self.active.is_some() {
            self.output.seek(position);
        }
    }
}
