use std::io::Write;
use std::path::PathBuf;
use std::thread::sleep;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

// https://docs.rs/embedded-graphics/0.8.1/embedded_graphics/mono_font/index.html#modules
use embedded_graphics::mono_font::{ascii::FONT_6X10, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use pi_oled::config::parse_address;
use pi_oled::{DisplayConfig, OledDisplay};

/// Draw a test screen on an SSD1306 OLED
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// I2C bus index, overrides OLED_I2C_BUS
    #[arg(short, long)]
    bus: Option<u8>,

    /// Device address, decimal or 0x hex, overrides OLED_ADDRESS
    #[arg(short, long, value_parser = parse_address)]
    address: Option<u8>,

    /// Text centred on the screen
    #[arg(short, long, default_value = "pi-oled")]
    text: String,

    /// Image composed at the top left corner
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Raw MSB-first bitmap streamed straight into display RAM
    #[arg(long)]
    raw: Option<PathBuf>,

    /// Invert the panel
    #[arg(long)]
    invert: bool,

    /// Panel contrast
    #[arg(long)]
    contrast: Option<u8>,

    /// Seconds to keep the picture before the display is cleared
    #[arg(long, default_value_t = 10)]
    hold: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    let mut config = DisplayConfig::from_env().context("invalid OLED_* environment")?;
    if let Some(bus) = args.bus {
        config.bus = bus;
    }
    if let Some(address) = args.address {
        config.address = address;
    }

    log::info!(
        "Opening {}x{} display at 0x{:02X} on {}",
        config.width,
        config.height,
        config.address,
        config.device_path()
    );
    let display = OledDisplay::open_linux(&config).context("failed to open the display")?;

    log::info!("Drawing test screen");
    let mut canvas = display.graphics()?;
    let size = canvas.size();

    let _ = Rectangle::new(Point::zero(), size)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(&mut canvas);

    if let Some(path) = &args.image {
        let image = image::open(path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        canvas.draw_image(&image, 0, 0)?;
    }

    let character_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Middle)
        .build();
    let _ = Text::with_text_style(
        &args.text,
        Point::new(size.width as i32 / 2, size.height as i32 / 2),
        character_style,
        text_style,
    )
    .draw(&mut canvas);

    canvas.push_buffer().context("failed to send the frame")?;

    if let Some(path) = &args.raw {
        let bytes =
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        log::info!("Streaming {} raw bytes", bytes.len());
        display.with_data_stream(|stream| {
            stream.write_all(&bytes)?;
            stream.flush()
        })?;
    }

    if args.invert {
        display.invert(true)?;
    }
    if let Some(contrast) = args.contrast {
        display.set_contrast(contrast)?;
    }

    log::info!("Holding the picture for {}s", args.hold);
    sleep(Duration::from_secs(args.hold));

    log::info!("Clearing display and closing the bus");
    drop(canvas);
    drop(display);
    log::info!("Complete");

    Ok(())
}
