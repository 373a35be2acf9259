mod utils;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use image::ImageReader;
use log::info;
use nvgif::{CompressionName, EncodeOptions, RgbaSurface};
use utils::{compression_name, describe, exists_decision, setup_logger, Assume, ImageWriter};

#[derive(Parser, Debug)]
#[command(version, about = "Not Very Good Image Format tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Subcommands,

    /// Overwrite output files
    #[arg(short = 'n', long = "overwrite", conflicts_with = "assumeno", global = true)]
    assumeyes: bool,

    /// Do not overwrite output files
    #[arg(short = 'y', long = "preserve", conflicts_with = "assumeyes", global = true)]
    assumeno: bool,

    /// Log more, can be repeated
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Encode an image to NVGIF
    Encode(EncodeArgs),

    /// Decode an NVGIF into another format
    Decode(DecodeArgs),

    /// Display the header of an NVGIF file
    Info(InfoArgs),
}

#[derive(Debug, Args)]
struct EncodeArgs {
    /// Input image file of any type supported by `image`
    input: PathBuf,

    /// Output path to NVGIF location
    output: PathBuf,

    /// NVGIF version to write
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=4))]
    version: u8,

    /// Compression to use, defaults to the best one the version supports
    ///
    /// Valid values:
    ///  - none
    ///  - rle
    ///  - zlib     (v4 only)
    ///  - rlezlib  (v4 only)
    #[arg(short, long, value_parser = compression_name, verbatim_doc_comment)]
    compression: Option<CompressionName>,

    /// Keep the alpha channel (v3 and later)
    #[arg(short, long)]
    alpha: bool,
}

#[derive(Debug, Args)]
struct DecodeArgs {
    /// Input NVGIF image file
    input: PathBuf,

    /// Output image file
    output: PathBuf,
}

#[derive(Debug, Args)]
struct InfoArgs {
    /// Input NVGIF image file
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    setup_logger(args.verbose)?;

    let assume = if args.assumeyes {
        Some(Assume::Yes)
    } else if args.assumeno {
        Some(Assume::No)
    } else {
        None
    };

    match args.command {
        Subcommands::Encode(a) => encode(a, assume),
        Subcommands::Decode(a) => decode(a, assume),
        Subcommands::Info(a) => info(a),
    }
}

fn encode(args: EncodeArgs, assume: Option<Assume>) -> Result<()> {
    if !args.input.try_exists()? {
        bail!("Input file {:?} does not exist", args.input);
    }

    if args.output.try_exists()?
        && !exists_decision("Output", "Overwrite", &args.output, assume)
    {
        return Ok(())
    }

    let image = ImageReader::open(&args.input)?
        .with_guessed_format()?
        .decode()?
        .into_rgba8();
    info!("loaded {:?}, {}x{}", args.input, image.width(), image.height());

    let (width, height) = image.dimensions();
    let Some(surface) = RgbaSurface::from_raw(width, height, image.into_raw()) else {
        bail!("Decoded bitmap of {:?} does not match its {width}x{height} size", args.input);
    };

    let mut options = EncodeOptions::new(args.version).alpha(args.alpha);
    options.compression = args.compression;

    nvgif::save(&surface, &args.output, &options)?;

    println!(
        "✓ Encoded NVGIF v{}: {} → {}",
        args.version,
        args.input.display(),
        args.output.display()
    );

    Ok(())
}

fn decode(args: DecodeArgs, assume: Option<Assume>) -> Result<()> {
    if !args.input.try_exists()? {
        bail!("Input file {:?} does not exist", args.input);
    }

    if args.output.try_exists()?
        && !exists_decision("Output", "Overwrite", &args.output, assume)
    {
        return Ok(())
    }

    nvgif::open_to(&args.input, &args.output, &ImageWriter)?;

    println!(
        "✓ Decoded NVGIF: {} → {}",
        args.input.display(),
        args.output.display()
    );

    Ok(())
}

fn info(args: InfoArgs) -> Result<()> {
    if !args.input.try_exists()? {
        bail!("Input file {:?} does not exist", args.input);
    }

    let header = nvgif::info(&args.input)?;
    println!("{}", describe(&header));

    Ok(())
}
