use std::io::{self, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::pipeline::RenderedSequence;

/// Surface d'affichage pour la lecture d'une animation.
///
/// Kept behind a trait so playback can run against a recorder in tests.
pub trait Screen {
    /// Erase the display and home the cursor.
    ///
    /// # Errors
    /// I/O failures of the underlying output.
    fn clear(&mut self) -> io::Result<()>;

    /// Show one frame.
    ///
    /// # Errors
    /// I/O failures of the underlying output.
    fn draw(&mut self, text: &str) -> io::Result<()>;

    /// Wait between two frames, returning early once `stop` is set.
    fn pause(&mut self, delay: Duration, stop: &AtomicBool) {
        let deadline = Instant::now() + delay;
        loop {
            if stop.load(Ordering::Relaxed) {
                return;
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return;
            }
            std::thread::sleep(left.min(STOP_POLL));
        }
    }
}

/// Longest uninterrupted sleep while waiting between frames.
const STOP_POLL: Duration = Duration::from_millis(20);

/// Terminal réel via crossterm.
pub struct TerminalScreen<W: Write> {
    out: W,
}

impl TerminalScreen<Stdout> {
    /// Screen writing to the process stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalScreen<W> {
    /// Screen writing to any sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Screen for TerminalScreen<W> {
    fn clear(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.out.flush()
    }

    fn draw(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{text}")?;
        self.out.flush()
    }
}

/// Delay of a frame: centiseconds → [`Duration`].
///
/// # Example
/// ```
/// use ac_render::playback::frame_delay;
/// assert_eq!(frame_delay(7).as_millis(), 70);
/// ```
#[must_use]
pub fn frame_delay(centis: u16) -> Duration {
    Duration::from_millis(u64::from(centis) * 10)
}

/// Play the frames in order, `repeat` passes (0 = until stopped).
///
/// `stop` is checked before every frame and while waiting out a frame's
/// delay. Returns the number of frames shown.
///
/// # Errors
/// Returns an error if the screen cannot be written to.
///
/// # Example
/// ```
/// use std::sync::atomic::AtomicBool;
/// use ac_render::pipeline::{RenderedFrame, RenderedSequence};
/// use ac_render::playback::{play, TerminalScreen};
///
/// let seq = RenderedSequence {
///     frames: vec![RenderedFrame { text: "a".into(), delay: 0 }],
///     repeat: 2,
/// };
/// let mut screen = TerminalScreen::new(Vec::new());
/// assert_eq!(play(&seq, &mut screen, &AtomicBool::new(false)).unwrap(), 2);
/// ```
pub fn play(seq: &RenderedSequence, screen: &mut impl Screen, stop: &AtomicBool) -> Result<u64> {
    if seq.frames.is_empty() {
        return Ok(0);
    }
    let mut shown = 0u64;
    let mut passes = 0u32;
    loop {
        for frame in &seq.frames {
            if stop.load(Ordering::Relaxed) {
                log::info!("playback interrupted after {shown} frames");
                return Ok(shown);
            }
            screen.clear().context("clear screen")?;
            screen.draw(&frame.text).context("draw frame")?;
            shown += 1;
            screen.pause(frame_delay(frame.delay), stop);
        }
        passes += 1;
        if seq.repeat != 0 && passes >= seq.repeat {
            log::debug!("playback finished: {passes} passes");
            return Ok(shown);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::RenderedFrame;

    /// Records what would have been displayed.
    #[derive(Default)]
    struct Recorder {
        drawn: Vec<String>,
        clears: usize,
        waited: Vec<Duration>,
        stop_after: Option<(usize, &'static AtomicBool)>,
    }

    impl Screen for Recorder {
        fn clear(&mut self) -> io::Result<()> {
            self.clears += 1;
            Ok(())
        }

        fn draw(&mut self, text: &str) -> io::Result<()> {
            self.drawn.push(text.to_owned());
            if let Some((n, flag)) = self.stop_after
                && self.drawn.len() >= n
            {
                flag.store(true, Ordering::Relaxed);
            }
            Ok(())
        }

        fn pause(&mut self, delay: Duration, _stop: &AtomicBool) {
            self.waited.push(delay);
        }
    }

    fn three_frames(repeat: u32) -> RenderedSequence {
        RenderedSequence {
            frames: [("1", 10), ("2", 20), ("3", 30)]
                .into_iter()
                .map(|(t, d)| RenderedFrame {
                    text: t.into(),
                    delay: d,
                })
                .collect(),
            repeat,
        }
    }

    #[test]
    fn finite_repeat_plays_every_pass_in_order() {
        let mut screen = Recorder::default();
        let shown = play(&three_frames(2), &mut screen, &AtomicBool::new(false)).unwrap();
        assert_eq!(shown, 6);
        assert_eq!(screen.drawn, ["1", "2", "3", "1", "2", "3"]);
        assert_eq!(screen.clears, 6);
        assert_eq!(screen.waited[..3], [frame_delay(10), frame_delay(20), frame_delay(30)]);
    }

    #[test]
    fn zero_repeat_runs_until_stopped() {
        static STOP: AtomicBool = AtomicBool::new(false);
        let mut screen = Recorder {
            stop_after: Some((10, &STOP)),
            ..Recorder::default()
        };
        let shown = play(&three_frames(0), &mut screen, &STOP).unwrap();
        assert_eq!(shown, 10);
        assert_eq!(screen.drawn.last().map(String::as_str), Some("1"));
    }

    #[test]
    fn terminal_screen_clears_then_prints() {
        let mut screen = TerminalScreen::new(Vec::new());
        screen.clear().unwrap();
        screen.draw("ab").unwrap();
        let out = String::from_utf8(screen.into_inner()).unwrap();
        assert!(out.starts_with("\x1b[2J"));
        assert!(out.ends_with("ab\n"));
    }

    #[test]
    fn pause_returns_at_once_when_stopped() {
        let mut screen = TerminalScreen::new(Vec::new());
        let start = Instant::now();
        screen.pause(frame_delay(u16::MAX), &AtomicBool::new(true));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn stop_interrupts_a_long_delay() {
        let stop = AtomicBool::new(false);
        let mut screen = TerminalScreen::new(Vec::new());
        let start = Instant::now();
        std::thread::scope(|s| {
            s.spawn(|| {
                std::thread::sleep(Duration::from_millis(50));
                stop.store(true, Ordering::Relaxed);
            });
            screen.pause(Duration::from_secs(60), &stop);
        });
        assert!(start.elapsed() < Duration::from_secs(5), "took {:?}", start.elapsed());
    }

    #[test]
    fn short_delay_is_waited_out() {
        let mut screen = TerminalScreen::new(Vec::new());
        let start = Instant::now();
        screen.pause(Duration::from_millis(30), &AtomicBool::new(false));
        assert!(start.elapsed() >= Duration::from_millis(30));
    }
}
