use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use airkeys_client::engine::GestureEngine;
use airkeys_client::keyboard::KeyBed;
use airkeys_client::ppm;
use airkeys_shared::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turns recorded camera frames into key presses", long_about = None)]
struct Args {
    /// Directory of numbered binary PPM frames, processed in name order
    #[arg(short, long)]
    frames: PathBuf,

    /// JSON settings file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames consumed at the start to train the background model
    #[arg(short, long, default_value_t = 30)]
    training_frames: usize,

    /// Write the combined segmentation mask of every frame into this
    /// directory as PGM, for tuning the thresholds offline
    #[arg(long)]
    save_masks: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("parsing settings {}", path.display()))
        }
        None => Ok(Settings::default()),
    }
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("listing frames in {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "ppm"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        bail!("no .ppm frames found in {}", dir.display());
    }
    Ok(paths)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let settings = load_settings(args.config.as_deref()).context("Failed to load settings")?;
    let key_bed = KeyBed::new(
        settings.output.width,
        settings.output.height,
        &settings.keyboard,
    )
    .context("Invalid keyboard layout")?;
    let mut engine = GestureEngine::new(&settings);

    if let Some(dir) = &args.save_masks {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating mask directory {}", dir.display()))?;
    }

    let frames = frame_paths(&args.frames)?;
    log::info!(
        "Processing {} frames ({} reserved for background training)",
        frames.len(),
        args.training_frames
    );

    engine.toggle_background_training();

    let mut keys_down: Vec<String> = Vec::new();
    for (index, path) in frames.iter().enumerate() {
        let frame = ppm::read_ppm(path)?;
        let clicks = engine.update(&frame);

        if let Some(dir) = &args.save_masks {
            if let Some(mask) = engine.combined_mask() {
                ppm::write_pgm(&dir.join(format!("{index:05}.pgm")), mask)?;
            }
        }

        if engine.is_training() && index + 1 >= args.training_frames {
            engine.toggle_background_training();
            engine.toggle_recognition();
            log::info!("Background training complete, recognition on");
            continue;
        }

        log::debug!(
            "frame {index}: {} click point(s), fingers L{} R{}",
            clicks.len(),
            engine.left_finger_tips().len(),
            engine.right_finger_tips().len()
        );

        let notes: Vec<String> = key_bed
            .pressed_notes(&clicks)
            .into_iter()
            .map(str::to_owned)
            .collect();
        if notes != keys_down {
            log::info!("frame {index}: keys down {:?}", notes);
            keys_down = notes;
        }
    }

    log::info!("Done; {} key(s) still down", keys_down.len());
    Ok(())
}
