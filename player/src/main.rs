mod colour;
mod driver;
mod render;
mod terminal;

use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, error, info, Level};

use sensefx_core::clock::{ClockFace, ClockSource};
use sensefx_core::icon::IconStore;
use sensefx_core::{DisplaySink, PixelGrid, Repeat, Rgb, Rotation};

use crate::colour::{parse_colour, parse_rotation};
use crate::driver::{Driver, Flow, Pacer};
use crate::terminal::{KeyboardPacer, TerminalSink};

#[derive(Parser)]
#[command(name = "sensefx", about = "Effects for an 8x8 RGB LED matrix, shown in the terminal")]
struct Cli {
    #[command(subcommand)]
    action: Action,

    /// Output colour: palette name, palette code or #rrggbb
    #[arg(short, long, visible_alias = "color", default_value = "white", value_parser = parse_colour, global = true)]
    colour: Rgb,

    /// Seconds each frame is held when animating
    #[arg(short, long, default_value_t = 0.05, global = true)]
    speed: f64,

    /// Times to repeat the action; -1 repeats until interrupted
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true, global = true)]
    repeat: i64,

    /// Display rotation in degrees (0, 90, 180, 270)
    #[arg(long, default_value = "0", value_parser = parse_rotation, global = true)]
    rotation: Rotation,

    /// Restore the previous display when done
    #[arg(short, long, global = true)]
    autorestore: bool,

    /// Skip the fade-out on exit
    #[arg(long, global = true)]
    no_fade: bool,

    /// Seconds a still image stays up
    #[arg(long, default_value_t = 2.0, global = true)]
    hold: f64,

    /// Terminal cells per matrix pixel (horizontally)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..=render::MAX_SCALE as i64), global = true)]
    scale: u16,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Action {
    /// Show a built-in icon
    Icon {
        /// Icon name
        #[arg(short, long)]
        name: String,
    },
    /// Show the analogue clock
    Clock {
        /// Show this time (HHMM, 24-hour) instead of the current time
        #[arg(short, long)]
        time: Option<String>,

        /// Keep the clock up, refreshing it until interrupted
        #[arg(long)]
        forever: bool,

        /// Seconds between refreshes
        #[arg(long, default_value_t = 30.0)]
        refresh: f64,
    },
    /// Grow and shrink a diamond from the centre
    Pulse {
        /// Pulses per repeat
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..))]
        count: u32,
    },
    /// Fade out whatever is on the display
    Fade {
        /// Show this icon first, then fade it
        #[arg(long)]
        from: Option<String>,
    },
}

/// An action with its inputs resolved, so bad input fails before the
/// terminal is taken over.
enum Plan {
    Still(PixelGrid),
    Clock {
        source: ClockSource,
        forever: bool,
        refresh: Duration,
    },
    Pulse(u32),
    Fade(Option<PixelGrid>),
}

impl Plan {
    fn resolve(action: &Action, icons: &IconStore, still_hold: Duration) -> anyhow::Result<Self> {
        let icon = |name: &str| {
            icons.get(name).with_context(|| {
                let known: Vec<&str> = icons.names().collect();
                format!("known icons: {}", known.join(", "))
            })
        };
        Ok(match action {
            Action::Icon { name } => Plan::Still(icon(name)?),
            Action::Clock {
                time,
                forever,
                refresh,
            } => {
                let source = match time {
                    Some(hhmm) => {
                        // parse now so a typo is reported on a normal screen
                        sensefx_core::clock::ClockTime::parse(hhmm)?;
                        ClockSource::Fixed(hhmm.clone())
                    }
                    None => ClockSource::Now,
                };
                let refresh = if *forever {
                    seconds(*refresh, "--refresh")?
                } else {
                    still_hold
                };
                Plan::Clock {
                    source,
                    forever: *forever,
                    refresh,
                }
            }
            Action::Pulse { count } => Plan::Pulse(*count),
            Action::Fade { from } => Plan::Fade(match from {
                Some(name) => Some(icon(name)?),
                None => None,
            }),
        })
    }
}

fn seconds(secs: f64, what: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(secs).with_context(|| format!("invalid {what}: {secs}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let frame_hold = seconds(cli.speed, "--speed")?;
    let still_hold = seconds(cli.hold, "--hold")?;
    let plan = Plan::resolve(&cli.action, &IconStore::builtin(), still_hold)?;
    let face = ClockFace::new()?.with_highlight(cli.colour);
    let repeat = Repeat::from_count(cli.repeat);

    let mut sink = TerminalSink::open(cli.scale)?;
    let mut pacer = KeyboardPacer;
    sink.set_rotation(cli.rotation)?;
    let backup = sink.get_pixels()?;

    let mut driver = Driver::new(&mut sink, &mut pacer, frame_hold);
    let result = run(&mut driver, &plan, repeat, cli.colour, still_hold, &face);

    let restore = cli.autorestore.then_some(&backup);
    finish(&mut driver, result, !cli.no_fade, restore, still_hold)
}

/// Exit sequence: fade out, then put back `restore`. Runs after an interrupt
/// or a failed action too; an action error wins over an exit-step error.
fn finish<S: DisplaySink, P: Pacer>(
    driver: &mut Driver<'_, S, P>,
    result: anyhow::Result<()>,
    fade: bool,
    restore: Option<&PixelGrid>,
    still_hold: Duration,
) -> anyhow::Result<()> {
    let exit = (|| -> anyhow::Result<()> {
        if fade {
            driver.fade_out()?;
        }
        if let Some(backup) = restore {
            debug!("restoring previous display");
            driver.show(backup, still_hold)?;
        }
        Ok(())
    })();

    match (result, exit) {
        (Err(e), Err(exit_err)) => {
            error!("exit sequence failed: {exit_err:#}");
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), exit) => exit,
    }
}

fn run<S: DisplaySink, P: Pacer>(
    driver: &mut Driver<'_, S, P>,
    plan: &Plan,
    repeat: Repeat,
    colour: Rgb,
    still_hold: Duration,
    face: &ClockFace,
) -> anyhow::Result<()> {
    let mut pass = 0;
    while repeat.allows(pass) {
        debug!(pass, "action");
        let flow = match plan {
            Plan::Still(grid) => driver.show(grid, still_hold)?,
            Plan::Clock {
                source,
                forever,
                refresh,
            } => driver.clock(face, source, *forever, *refresh)?,
            Plan::Pulse(count) => driver.pulse(colour, Repeat::Times(*count))?,
            Plan::Fade(from) => {
                if let Some(grid) = from {
                    driver.sink().set_pixels(grid)?;
                }
                driver.fade_out()?
            }
        };
        if flow == Flow::Stop {
            info!("interrupted");
            break;
        }
        pass = pass.saturating_add(1);
    }

    Ok(())
}
