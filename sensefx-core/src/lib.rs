pub mod clock;
pub mod coord;
pub mod error;
pub mod fade;
pub mod grid;
pub mod icon;
pub mod pulse;
pub mod repeat;
pub mod sink;

pub use error::{MatrixError, Result};
pub use grid::{PixelGrid, Rgb, Rotation};
pub use repeat::Repeat;
pub use sink::DisplaySink;

#[cfg(test)]
mod tests {
    use crate::clock::ClockFace;
    use crate::fade::Fade;
    use crate::icon::{self, IconStore};
    use crate::pulse::PulseSequence;
    use crate::sink::{DisplaySink, MemorySink};
    use crate::*;

    #[test]
    fn icon_then_fade_through_a_sink() {
        let estelada = IconStore::builtin().get("estelada").unwrap();
        let mut sink = MemorySink::new(estelada.clone());

        let start = sink.get_pixels().unwrap();
        for frame in Fade::out(start) {
            sink.set_pixels(&frame).unwrap();
        }

        // brightest channel in the flag is 255, so the fade runs to the floor
        assert_eq!(sink.history().len(), fade::DEFAULT_STEPS);
        let last = sink.get_pixels().unwrap();
        assert!(last.iter().all(|p| p.below(fade::ZERO_BRIGHTNESS)));
        // the icon itself was never touched
        assert_eq!(estelada, IconStore::builtin().get("estelada").unwrap());
    }

    #[test]
    fn pulse_frames_only_use_the_pulse_colour() {
        let colour = icon::named("violet").unwrap();
        for frame in PulseSequence::new(colour, Repeat::Times(1)) {
            assert!(frame.iter().all(|p| *p == colour || *p == Rgb::OFF));
        }
    }

    #[test]
    fn clock_output_encodes_as_an_icon() {
        let grid = ClockFace::new().unwrap().render(3.0, 0.0).unwrap();
        let text = icon::encode(&grid).unwrap();
        assert_eq!(&text[0..8], "RRRRRRRK");
        assert_eq!(&text[24..32], "RKKRWKRK");
        assert_eq!(icon::decode(&text).unwrap(), grid);
    }
}
