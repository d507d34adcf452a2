//! Simulated playback. No media is decoded; position advances with the
//! wall clock while "playing" and the on-screen controls fade out after a
//! few seconds of inactivity, like a real player chrome would.

use std::time::{Duration, Instant};

/// Every demo title "runs" 2h 02m.
pub const DEMO_DURATION_SECS: u64 = 7320;

const CONTROLS_HIDE: Duration = Duration::from_secs(3);
const SEEK_STEP: i64 = 10;
const VOLUME_STEP: i16 = 5;

pub struct Playback {
    pub title: String,
    pub duration: u64,
    pub position: u64,
    pub playing: bool,
    pub volume: u8,
    pub fullscreen: bool,
    controls_visible: bool,
    last_interaction: Instant,
    last_tick: Instant,
}

impl Playback {
    pub fn start(title: &str, volume: u8) -> Self {
        let now = Instant::now();
        Self {
            title: title.to_string(),
            duration: DEMO_DURATION_SECS,
            position: 0,
            playing: true,
            volume: volume.min(100),
            fullscreen: false,
            controls_visible: true,
            last_interaction: now,
            last_tick: now,
        }
    }

    /// Advances playback by the wall-clock time since the last call and
    /// fades the controls. Driven from the main loop.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.playing {
            let elapsed = now.duration_since(self.last_tick).as_secs();
            if elapsed > 0 {
                self.last_tick += Duration::from_secs(elapsed);
                self.advance(elapsed);
            }
            if self.controls_visible
                && now.duration_since(self.last_interaction) >= CONTROLS_HIDE
            {
                self.controls_visible = false;
            }
        } else {
            self.last_tick = now;
        }
    }

    fn advance(&mut self, secs: u64) {
        self.position = (self.position + secs).min(self.duration);
        if self.position >= self.duration {
            // ran to the end
            self.playing = false;
        }
    }

    pub fn controls_visible(&self) -> bool {
        self.controls_visible
    }

    /// Any user interaction brings the controls back.
    pub fn poke_controls(&mut self) {
        self.controls_visible = true;
        self.last_interaction = Instant::now();
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
        self.last_tick = Instant::now();
        self.poke_controls();
    }

    pub fn seek(&mut self, delta_secs: i64) {
        self.position = self
            .position
            .saturating_add_signed(delta_secs)
            .min(self.duration);
        self.poke_controls();
    }

    pub fn skip_back(&mut self) {
        self.seek(-SEEK_STEP);
    }

    pub fn skip_forward(&mut self) {
        self.seek(SEEK_STEP);
    }

    pub fn adjust_volume(&mut self, up: bool) {
        let delta = if up { VOLUME_STEP } else { -VOLUME_STEP };
        self.volume = (self.volume as i16 + delta).clamp(0, 100) as u8;
        self.poke_controls();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
        self.poke_controls();
    }

    pub fn progress_percent(&self) -> u8 {
        if self.duration == 0 {
            return 0;
        }
        ((self.position * 100) / self.duration) as u8
    }
}

/// `h:mm:ss`, matching the player's time ruler.
pub fn format_time(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let rest = secs % 60;
    format!("{hours}:{mins:02}:{rest:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_clamps_and_pauses_at_the_end() {
        let mut pb = Playback::start("Night City", 80);
        pb.advance(100);
        assert_eq!(pb.position, 100);
        assert!(pb.playing);

        pb.advance(DEMO_DURATION_SECS);
        assert_eq!(pb.position, DEMO_DURATION_SECS);
        assert!(!pb.playing);
    }

    #[test]
    fn seek_clamps_at_both_ends() {
        let mut pb = Playback::start("Night City", 80);
        pb.skip_back();
        assert_eq!(pb.position, 0);

        pb.position = DEMO_DURATION_SECS - 3;
        pb.skip_forward();
        assert_eq!(pb.position, DEMO_DURATION_SECS);

        pb.position = 50;
        pb.seek(-10);
        assert_eq!(pb.position, 40);
    }

    #[test]
    fn volume_stays_in_range() {
        let mut pb = Playback::start("Night City", 98);
        pb.adjust_volume(true);
        assert_eq!(pb.volume, 100);

        let mut pb = Playback::start("Night City", 3);
        pb.adjust_volume(false);
        assert_eq!(pb.volume, 0);
        pb.adjust_volume(false);
        assert_eq!(pb.volume, 0);
    }

    #[test]
    fn controls_hide_after_the_idle_window_while_playing() {
        let mut pb = Playback::start("Night City", 80);
        assert!(pb.controls_visible());

        pb.last_interaction = Instant::now() - Duration::from_secs(4);
        pb.tick();
        assert!(!pb.controls_visible());

        pb.poke_controls();
        assert!(pb.controls_visible());
    }

    #[test]
    fn controls_stay_up_while_paused() {
        let mut pb = Playback::start("Night City", 80);
        pb.toggle_play();
        assert!(!pb.playing);

        pb.last_interaction = Instant::now() - Duration::from_secs(10);
        pb.tick();
        assert!(pb.controls_visible());
    }

    #[test]
    fn progress_percent_tracks_position() {
        let mut pb = Playback::start("Night City", 80);
        assert_eq!(pb.progress_percent(), 0);
        pb.position = DEMO_DURATION_SECS / 2;
        assert_eq!(pb.progress_percent(), 50);
        pb.position = DEMO_DURATION_SECS;
        assert_eq!(pb.progress_percent(), 100);
    }

    #[test]
    fn time_format_is_h_mm_ss() {
        assert_eq!(format_time(0), "0:00:00");
        assert_eq!(format_time(61), "0:01:01");
        assert_eq!(format_time(DEMO_DURATION_SECS), "2:02:00");
        assert_eq!(format_time(3599), "0:59:59");
    }
}
