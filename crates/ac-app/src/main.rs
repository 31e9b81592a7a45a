use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ac_core::config::{RenderConfig, load_config};
use ac_core::error::CoreError;
use ac_core::traits::{Decode, Input};
use ac_render::playback::TerminalScreen;
use ac_render::{FramePipeline, convert_image_json, convert_image_text, play};
use ac_source::SniffingDecoder;
use anyhow::Result;
use clap::Parser;

pub mod cli;
pub mod input;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    if cli.formats {
        println!("Supported input formats:\n\n{}", input::SUPPORTED_FORMATS);
        return Ok(());
    }

    // 3. Charger la config, puis les overrides CLI
    let base = match &cli.config {
        Some(path) => load_config(path)?,
        None => RenderConfig::default(),
    };
    let mut config = cli.apply(base);
    default_to_terminal_height(&mut config);
    config.validate()?;

    // 4. Décoder l'entrée
    let Some(arg) = cli.input.as_deref() else {
        anyhow::bail!("no input given");
    };
    let bytes = input::read_input(arg)?;
    let decoder = SniffingDecoder;
    log::info!("decoding {arg} with the {} decoder", decoder.name());

    match decoder.decode(&bytes)? {
        Input::Still(img) => {
            let out = if cli.json {
                convert_image_json(&img, &config)?
            } else {
                convert_image_text(&img, &config)?
            };
            println!("{out}");
        }
        Input::Animated(seq) => {
            let pipeline = FramePipeline::new(config)?;
            log::info!("rendering {} frames on {} workers", seq.len(), pipeline.workers());
            if cli.json {
                pipeline.render_sequence_json(&seq)?;
                return Ok(());
            }
            let rendered = pipeline.render_sequence_with_progress(&seq, |pct| {
                let mut err = std::io::stderr();
                let _ = write!(err, "Generating ascii art... {pct}%\r");
                let _ = err.flush();
            })?;
            eprint!("                              \r");

            // 5. Lecture jusqu'à épuisement des boucles ou Ctrl-C
            let stop = Arc::new(AtomicBool::new(false));
            let handler_stop = Arc::clone(&stop);
            ctrlc::set_handler(move || handler_stop.store(true, Ordering::Relaxed))?;
            let mut screen = TerminalScreen::stdout();
            play(&rendered, &mut screen, &stop)?;
        }
    }
    Ok(())
}

/// Sans option de taille, l'art occupe la hauteur du terminal.
fn default_to_terminal_height(config: &mut RenderConfig) {
    if config.sizing() != Err(CoreError::MissingSize) {
        return;
    }
    match crossterm::terminal::size() {
        Ok((_, rows)) => {
            let rows = u32::from(rows.saturating_sub(1)).max(1);
            log::debug!("no size given, using terminal height {rows}");
            config.height = Some(rows);
        }
        Err(e) => log::warn!("terminal size unavailable: {e}"),
    }
}
