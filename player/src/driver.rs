use std::time::Duration;

use tracing::{debug, info};

use sensefx_core::clock::{ClockFace, ClockSource};
use sensefx_core::fade::Fade;
use sensefx_core::pulse::PulseSequence;
use sensefx_core::{DisplaySink, PixelGrid, Repeat, Rgb};

/// Whether to keep going after a hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Paces frames. Returning `Flow::Stop` is how an interrupt reaches the
/// animation loops.
pub trait Pacer {
    fn hold(&mut self, duration: Duration) -> anyhow::Result<Flow>;
}

/// Pushes frames to a sink, holding each one for `frame_hold`.
pub struct Driver<'a, S: DisplaySink, P: Pacer> {
    sink: &'a mut S,
    pacer: &'a mut P,
    frame_hold: Duration,
}

impl<'a, S: DisplaySink, P: Pacer> Driver<'a, S, P> {
    pub fn new(sink: &'a mut S, pacer: &'a mut P, frame_hold: Duration) -> Self {
        Self {
            sink,
            pacer,
            frame_hold,
        }
    }

    pub fn sink(&mut self) -> &mut S {
        &mut *self.sink
    }

    /// Show one still image for `hold`.
    pub fn show(&mut self, grid: &PixelGrid, hold: Duration) -> anyhow::Result<Flow> {
        self.sink.set_pixels(grid)?;
        self.pacer.hold(hold)
    }

    /// Show each frame in turn, stopping early on interrupt.
    ///
    /// An empty sequence still holds once, so callers looping on the result
    /// always give the pacer a chance to stop them.
    pub fn play(&mut self, frames: impl IntoIterator<Item = PixelGrid>) -> anyhow::Result<Flow> {
        let mut shown = 0usize;
        for frame in frames {
            self.sink.set_pixels(&frame)?;
            shown += 1;
            if self.pacer.hold(self.frame_hold)? == Flow::Stop {
                debug!(frame = shown - 1, "interrupted");
                return Ok(Flow::Stop);
            }
        }
        if shown == 0 {
            return self.pacer.hold(self.frame_hold);
        }
        Ok(Flow::Continue)
    }

    pub fn pulse(&mut self, colour: Rgb, cycles: Repeat) -> anyhow::Result<Flow> {
        info!(?colour, ?cycles, "pulse");
        self.play(PulseSequence::new(colour, cycles))
    }

    /// Dim whatever the sink currently shows.
    pub fn fade_out(&mut self) -> anyhow::Result<Flow> {
        let start = self.sink.get_pixels()?;
        info!("fade out");
        self.play(Fade::out(start))
    }

    /// Render the clock once, or keep refreshing it every `refresh` until
    /// interrupted when `forever` is set.
    pub fn clock(
        &mut self,
        face: &ClockFace,
        source: &ClockSource,
        forever: bool,
        refresh: Duration,
    ) -> anyhow::Result<Flow> {
        loop {
            let time = source.read()?;
            debug!(hour = time.hour, minute = time.minute, "clock");
            let grid = face.render_time(time)?;
            let flow = self.show(&grid, refresh)?;
            if !forever || flow == Flow::Stop {
                return Ok(flow);
            }
        }
    }
}
