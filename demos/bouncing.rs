//! A ball bouncing around a small grid, drawn through the `PixelDisplay` trait.
//!
//! cargo run --example bouncing

use pixterm::{AnsiRenderer, Color, Pacing, PixelDisplay};

fn bounce(display: &mut dyn PixelDisplay, frames: usize) -> pixterm::Result<()> {
    let (width, height) = display.geometry();
    let (mut x, mut y) = (0isize, 0isize);
    let (mut dx, mut dy) = (1isize, 1isize);
    for _ in 0..frames {
        for row in 0..height {
            display.set_xy(0, row, Color::rgb(40, 40, 40))?;
            display.set_xy(width - 1, row, Color::rgb(40, 40, 40))?;
        }
        display.set_xy(x as usize, y as usize, Color::rgb(255, 200, 0))?;
        display.render_current()?;

        if x + dx < 0 || x + dx >= width as isize {
            dx = -dx;
        }
        if y + dy < 0 || y + dy >= height as isize {
            dy = -dy;
        }
        x += dx;
        y += dy;
    }
    display.close()
}

fn main() -> pixterm::Result<()> {
    let mut renderer = AnsiRenderer::new(12, 6, Pacing::default())?;
    bounce(&mut renderer, 200)?;
    println!("{}", "\n".repeat(6));
    Ok(())
}
