#![warn(clippy::pedantic)]

use anyhow::{Context, Result as AnyResult};
use argh::FromArgs;
use snapink_core::{
    capture::{self, DeviceRotation},
    color::Color,
    decode,
    export,
    geom::DisplayRect,
    prefs::Preferences,
    session::EditSession,
    stroke::StrokeStyle,
};
use std::path::PathBuf;

mod script;

/// Orient, annotate, and tag photos.
#[derive(FromArgs, Debug)]
struct Args {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Command {
    Annotate(AnnotateArgs),
    Orient(OrientArgs),
    TagCapture(TagCaptureArgs),
    CaptureTable(CaptureTableArgs),
    Prefs(PrefsArgs),
}

/// Replay a pointer script over a photo and save the flattened result
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "annotate")]
struct AnnotateArgs {
    /// photo to annotate
    #[argh(positional)]
    input: PathBuf,
    /// TOML pointer event script
    #[argh(option, short = 's')]
    script: PathBuf,
    /// where to write the result, format chosen by extension (.jpg, .jpeg, .png)
    #[argh(option, short = 'o')]
    output: PathBuf,
    /// stroke color as #rrggbb or #rrggbbaa, overriding preferences
    #[argh(option, short = 'c')]
    color: Option<Color>,
    /// stroke width in display pixels, overriding preferences
    #[argh(option, short = 'w')]
    width: Option<f32>,
    /// initial display rect as left,top,right,bottom. Defaults to the image at 1:1
    #[argh(option, short = 'r')]
    rect: Option<DisplayRect>,
}

/// Print a photo's orientation tag and its upright dimensions
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "orient")]
struct OrientArgs {
    /// photo to inspect
    #[argh(positional)]
    input: PathBuf,
}

/// Embed the capture orientation into a freshly taken photo, in place
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "tag-capture")]
struct TagCaptureArgs {
    /// photo to tag
    #[argh(positional)]
    path: PathBuf,
    /// device rotation at capture time: 0, 90, 180, or 270
    #[argh(option, short = 'r')]
    rotation: DeviceRotation,
}

/// Print which orientation tag is written for each device rotation
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "capture-table")]
struct CaptureTableArgs {}

/// Show the annotation preferences, optionally writing them back out
#[derive(FromArgs, Debug)]
#[argh(subcommand, name = "prefs")]
struct PrefsArgs {
    /// write the current (or defaulted) preferences to the preference file
    #[argh(switch)]
    save: bool,
}

/// Stroke style for this run: preferences, overridden by any flags given.
fn style_for(args: &AnnotateArgs) -> AnyResult<StrokeStyle> {
    let mut style = Preferences::get().style;
    if let Some(color) = args.color {
        style = style.with_color(color);
    }
    if let Some(width) = args.width {
        style = style.with_width(width)?;
    }
    Ok(style)
}

fn annotate(args: &AnnotateArgs) -> AnyResult<()> {
    let style = style_for(args)?;
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;
    let (base, script) = runtime.block_on(async {
        let input = args.input.clone();
        let script_path = args.script.clone();
        // Decoding dominates, parse the script alongside it.
        tokio::try_join!(
            tokio::task::spawn_blocking(move || decode::decode_file(&input)),
            tokio::task::spawn_blocking(move || -> AnyResult<script::Script> {
                let text = std::fs::read_to_string(&script_path)
                    .with_context(|| format!("reading script {}", script_path.display()))?;
                Ok(script::Script::parse(&text)?)
            }),
        )
    })?;
    let base = base.with_context(|| format!("decoding {}", args.input.display()))?;
    let script = script?;

    let mut session = EditSession::open(base, style);
    let rect = args
        .rect
        .unwrap_or_else(|| DisplayRect::from_size(session.base().width(), session.base().height()));
    session.set_display_rect(rect);
    let stats = script.replay(&mut session)?;
    log::info!(
        "{} pointer events, {} layouts, {} redraws",
        stats.pointer_events,
        stats.layouts,
        stats.redraws
    );

    let out = session.save();
    export::save_to(&out, &args.output)
        .with_context(|| format!("saving {}", args.output.display()))?;
    Ok(())
}

fn orient(args: &OrientArgs) -> AnyResult<()> {
    let bytes = std::fs::read(&args.input)?;
    let tag = decode::read_orientation(&bytes).unwrap_or_else(|e| {
        log::warn!("{e}, assuming identity");
        snapink_core::OrientationTag::Identity
    });
    let upright = decode::decode_with_orientation(&bytes, tag)?;
    println!(
        "{}: {tag}, rotate {}°{}, upright {}x{}",
        args.input.display(),
        tag.rotation_degrees(),
        if tag.mirrored() { " mirrored" } else { "" },
        upright.width(),
        upright.height()
    );
    Ok(())
}

fn tag_capture(args: &TagCaptureArgs) -> AnyResult<()> {
    let written = capture::tag_captured_photo(&args.path, args.rotation)
        .with_context(|| format!("tagging {}", args.path.display()))?;
    println!("{}: orientation {written}", args.path.display());
    Ok(())
}

fn capture_table() {
    use strum::IntoEnumIterator;
    for rotation in DeviceRotation::iter() {
        println!(
            "{:>3}° ({}) -> {}",
            rotation.degrees(),
            rotation.as_ref(),
            rotation.capture_tag()
        );
    }
}

fn prefs(args: &PrefsArgs) -> AnyResult<()> {
    let prefs = Preferences::get();
    if prefs.did_fail_to_load() {
        log::warn!("Using default annotation preferences");
    }
    let path = Preferences::path();
    println!(
        "{}\nstroke_color = \"{}\"\nstroke_width_px = {}",
        path.as_deref()
            .map_or_else(|| "(no preferences dir)".to_owned(), |p| p.display().to_string()),
        prefs.style.color(),
        prefs.style.width_px()
    );
    if args.save {
        prefs.save()?;
    }
    Ok(())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Info);
    }

    let args: Args = argh::from_env();
    match &args.command {
        Command::Annotate(args) => annotate(args),
        Command::Orient(args) => orient(args),
        Command::TagCapture(args) => tag_capture(args),
        Command::CaptureTable(_) => {
            capture_table();
            Ok(())
        }
        Command::Prefs(args) => prefs(args),
    }
}
