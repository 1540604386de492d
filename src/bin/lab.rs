//! # Command-Line Entry Point
//!
//! Encode a text file into an image, or recover it again.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin lab -- -e photo.jpg message.txt -o encoded.png
//! cargo run --bin lab -- -d encoded.png secret.txt
//! ```
//!
//! The process exits with 0 on success and with the numeric status code of
//! the failure otherwise (see `lsb_stego::lab`).

use clap::Parser;
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use std::process::ExitCode;

use lsb_stego::codec::{LogReporter, Reporter, SilentReporter};
use lsb_stego::common::logging::init_logger;
use lsb_stego::lab;

/// Command-line arguments for the lab binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Hide the message file inside the image
    #[arg(
        short = 'e',
        long,
        conflicts_with = "decode",
        required_unless_present = "decode"
    )]
    encode: bool,

    /// Recover the message hidden in the image into the message file
    #[arg(short = 'd', long)]
    decode: bool,

    /// Carrier image (PNG or JPEG to encode, PNG to decode)
    image: PathBuf,

    /// Message file: read when encoding, written when decoding
    message: PathBuf,

    /// Where the encoded PNG is written
    #[arg(short, long, default_value = lab::DEFAULT_ENCODE_OUTPUT)]
    output: PathBuf,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    init_logger(if args.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::Info
    });

    let log_reporter = LogReporter::default();
    let reporter: &dyn Reporter = if args.quiet {
        &SilentReporter
    } else {
        &log_reporter
    };

    let result = if args.encode {
        info!("Encoding...");
        lab::encode_file(&args.image, &args.message, &args.output, reporter)
    } else {
        info!("Decoding...");
        lab::decode_file(&args.image, &args.message, reporter).map(|_| ())
    };

    match result {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("ERROR: {}", e);
            ExitCode::from(e.code())
        }
    }
}
