use std::thread;
use std::time::{Duration, Instant};

/// Paces a loop to a fixed number of ticks per second.
#[derive(Debug)]
pub struct FrameClock {
    frame: Option<Duration>,
    last_tick: Instant,
}

impl FrameClock {
    /// A clock that ticks at most `ticks_per_second` times per second. 0 never waits.
    pub fn new(ticks_per_second: u32) -> FrameClock {
        FrameClock {
            frame: (ticks_per_second > 0).then(|| Duration::from_secs(1) / ticks_per_second),
            last_tick: Instant::now(),
        }
    }

    pub fn frame(&self) -> Option<Duration> {
        self.frame
    }

    /// Sleeps out the remainder of the current frame.
    pub fn tick(&mut self) {
        if let Some(frame) = self.frame {
            let elapsed = self.last_tick.elapsed();
            if elapsed < frame {
                thread::sleep(frame - elapsed);
            }
        }
        self.last_tick = Instant::now();
    }
}
