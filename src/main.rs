use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
    process::exit,
};

use anyhow::{bail, Context, Result};
use binviz::{
    raster::PixelBuffer,
    reader::{DEFAULT_CHUNK_SIZE, MAX_CHUNK_SIZE},
    sink::{output_path, ImageSink, PngSink},
    table::SIZE,
    Fingerprint,
};
use clap::{arg, command, value_parser, ArgMatches};
use log::{error, info, warn, LevelFilter};
use macroquad::{
    prelude::{
        draw_texture_ex, vec2, DrawTextureParams, FilterMode, Texture2D, BLACK, WHITE,
    },
    window::{clear_background, next_frame, Conf},
};

const SCALE: i32 = 4;
const SCALEF: f32 = SCALE as f32;

fn config() -> Conf {
    Conf {
        window_title: "binviz".to_owned(),
        window_width: SIZE as i32 * SCALE,
        window_height: SIZE as i32 * SCALE,
        ..Default::default()
    }
}

fn main() {
    let matches = command!()
        .args([arg!(-v --verbose "Print debug output").global(true)])
        .subcommands([
            command!("render").alias("r").args([
                arg!([FILE] "The input file, standard input when omitted or -")
                    .value_parser(value_parser!(PathBuf)),
                arg!(-o --output <PATH> "The image file to write (default: <FILE>.binviz.png)")
                    .required(false)
                    .value_parser(value_parser!(PathBuf)),
                arg!(--"chunk-size" <BYTES> "Bytes read per block, at most 4 MiB (default: 8192)")
                    .required(false)
                    .value_parser(value_parser!(u64).range(1..=MAX_CHUNK_SIZE as u64)),
                arg!(--"allow-empty" "Write a black image for empty input instead of failing"),
            ]),
            command!("show").alias("s").args([
                arg!([FILE] "The input file, standard input when omitted or -")
                    .value_parser(value_parser!(PathBuf)),
                arg!(--"chunk-size" <BYTES> "Bytes read per block, at most 4 MiB (default: 8192)")
                    .required(false)
                    .value_parser(value_parser!(u64).range(1..=MAX_CHUNK_SIZE as u64)),
            ]),
        ])
        .subcommand_required(true)
        .get_matches();
    let level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
    let result = match matches.subcommand() {
        Some(("render", args)) => render(args),
        Some(("show", args)) => show(args),
        _ => unreachable!(),
    };
    if let Err(err) = result {
        error!("{err:#}");
        exit(1);
    }
}

fn render(args: &ArgMatches) -> Result<()> {
    let input = input_path(args);
    let output = match (args.get_one::<PathBuf>("output"), &input) {
        (Some(output), _) => output.clone(),
        (None, Some(input)) => output_path(input),
        (None, None) => bail!("An output path is required when reading standard input"),
    };
    let print = read_input(input.as_deref(), chunk_size(args))?;
    if print.bytes() == 0 {
        if !args.get_flag("allow-empty") {
            bail!("The input is empty");
        }
        warn!("The input is empty, writing a black image");
    }
    let mut sink =
        PngSink::create(&output).with_context(|| format!("Could not create {output:?}"))?;
    sink.write(&print.pixels().frame())
        .with_context(|| format!("Could not save image {output:?}"))?;
    info!("Wrote {output:?}");
    Ok(())
}

fn show(args: &ArgMatches) -> Result<()> {
    let input = input_path(args);
    let print = read_input(input.as_deref(), chunk_size(args))?;
    if print.bytes() == 0 {
        warn!("The input is empty");
    }
    macroquad::Window::from_config(config(), window(print.into_pixels()));
    Ok(())
}

fn input_path(args: &ArgMatches) -> Option<PathBuf> {
    args.get_one::<PathBuf>("FILE")
        .filter(|path| path.as_os_str() != "-")
        .cloned()
}

fn chunk_size(args: &ArgMatches) -> usize {
    // range-checked by clap, fits in usize
    args.get_one::<u64>("chunk-size")
        .map_or(DEFAULT_CHUNK_SIZE, |&size| size as usize)
}

fn read_input(input: Option<&Path>, chunk_size: usize) -> Result<Fingerprint> {
    let print = match input {
        Some(path) => {
            let mut file =
                File::open(path).with_context(|| format!("Could not open input file {path:?}"))?;
            binviz::fingerprint(&mut file, chunk_size)
                .with_context(|| format!("Could not read input file {path:?}"))?
        }
        None => binviz::fingerprint(io::stdin().lock(), chunk_size)
            .context("Could not read standard input")?,
    };
    info!(
        "Read {} bytes, densest pair occurs {} times",
        print.bytes(),
        print.max()
    );
    Ok(print)
}

async fn window(pixels: PixelBuffer) {
    let texture = Texture2D::from_rgba8(SIZE as u16, SIZE as u16, pixels.as_bytes());
    texture.set_filter(FilterMode::Nearest);
    let side = SIZE as f32 * SCALEF;
    loop {
        clear_background(BLACK);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(side, side)),
                ..Default::default()
            },
        );
        next_frame().await
    }
}
