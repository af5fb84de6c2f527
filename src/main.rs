//! Animated demo for the ANSI pixel renderer.
//!
//! Draws a scrolling hue gradient with random white sparkles.
//!
//! cargo run -- --width 40 --height 12 --show-fps

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::style::Print;
use log::info;
use pixterm::{AnsiRenderer, Color, Pacing};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::stdout;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "pixterm")]
#[command(about = "Draws an animated pixel grid in the terminal", long_about = None)]
struct Cli {
    /// Pixels per row
    #[arg(long, default_value_t = 32)]
    width: usize,

    /// Number of rows
    #[arg(long, default_value_t = 16)]
    height: usize,

    /// Measure the frame rate and print it below the grid
    #[arg(long, conflicts_with = "delay_ms")]
    show_fps: bool,

    /// Sleep this long after every frame
    #[arg(long, default_value_t = 50)]
    delay_ms: u64,

    /// Stop after this many frames instead of running until interrupted
    #[arg(long)]
    frames: Option<u64>,

    /// Seed for the sparkles
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn pacing(&self) -> Pacing {
        if self.show_fps {
            Pacing::Measured {
                show_refresh_rate: true,
            }
        } else {
            Pacing::FixedDelay(Duration::from_millis(self.delay_ms))
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut renderer = AnsiRenderer::new(cli.width, cli.height, cli.pacing())?;
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!("starting demo with {cli:?}");

    let mut frame = 0u64;
    while cli.frames.is_none_or(|limit| frame < limit) {
        draw_gradient(&mut renderer, frame, &mut rng)?;
        renderer.render_current()?;
        frame += 1;
    }
    renderer.close()?;

    // leave the last frame on screen and put the prompt below it
    execute!(stdout(), Print("\n".repeat(cli.height + 2)))?;
    info!("rendered {frame} frames");
    Ok(())
}

fn draw_gradient<W: std::io::Write>(
    renderer: &mut AnsiRenderer<W>,
    frame: u64,
    rng: &mut impl Rng,
) -> pixterm::Result<()> {
    let (width, height) = renderer.geometry();
    let buffer = renderer.buffer_mut();
    for (x, y) in (0..height).flat_map(|y| (0..width).map(move |x| (x, y))) {
        let hue = ((x + y) as f64 / (width + height) as f64 + frame as f64 / 120.0).fract();
        buffer.set_xy(x, y, hue_to_rgb(hue))?;
    }
    for _ in 0..(width * height / 40).max(1) {
        if rng.gen_bool(0.5) {
            let position = rng.gen_range(0..width * height);
            buffer.set(position, Color::WHITE)?;
        }
    }
    Ok(())
}

/// Fully saturated color for a hue in `[0, 1)`.
fn hue_to_rgb(hue: f64) -> Color {
    let h = hue * 6.0;
    let rising = ((h.fract()) * 255.0) as u8;
    let falling = 255 - rising;
    match h as u8 {
        0 => Color::rgb(255, rising, 0),
        1 => Color::rgb(falling, 255, 0),
        2 => Color::rgb(0, 255, rising),
        3 => Color::rgb(0, falling, 255),
        4 => Color::rgb(rising, 0, 255),
        _ => Color::rgb(255, 0, falling),
    }
}
