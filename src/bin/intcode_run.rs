// SPDX-FileCopyrightText: 2025 - 2026 Eli Array Minkoff
//
// SPDX-License-Identifier: 0BSD

//! Run an Intcode program, using stdin and stdout for I/O
//!
//! In `numbers` mode, inputs are read as integers and outputs are printed one per line. In `ascii`
//! mode (the Aft Scaffolding Control and Information Interface), input lines are fed in as ASCII
//! codes, and outputs are printed as characters, except for values outside of the ASCII range,
//! which are printed as numbers.

use intcode_vm::prelude::*;
use std::error::Error;
use std::fmt::{self, Debug, Display};
use std::fs;
use std::io::{self, BufRead, Write, stdin, stdout};
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use log::{LevelFilter, info};

#[derive(PartialEq, Clone, Copy, ValueEnum)]
enum CodeFormat {
    /// comma-separated ASCII-encoded decimal numbers
    #[value(alias("text"))]
    #[value(alias("aoc"))]
    Ascii,
    /// little-endian 64-bit integers
    #[cfg_attr(target_endian = "little", value(alias("binary-native")))]
    #[value(name("binary-little-endian"), alias("binle"))]
    LittleEndian,
    #[cfg_attr(target_endian = "big", value(alias("binary-native")))]
    #[value(name("binary-big-endian"), alias("binbe"))]
    /// big-endian 64-bit integers
    BigEndian,
}

#[derive(PartialEq, Clone, Copy, ValueEnum)]
enum IoMode {
    /// decimal integers, one output per line
    Numbers,
    /// ASCII text, with non-ASCII outputs printed as numbers
    Ascii,
}

const VERSION: &str = concat!(env!("CARGO_CRATE_NAME"), '-', env!("CARGO_PKG_VERSION"));

#[derive(Parser)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = VERSION)]
#[command(about = "Intcode runner", long_about = None)]
struct Args {
    #[arg(help = "The program to run")]
    source: PathBuf,
    #[arg(help = "Input format for the program")]
    #[arg(short, long)]
    #[arg(default_value = "ascii")]
    format: CodeFormat,
    #[arg(help = "How to read input and write output")]
    #[arg(short, long)]
    #[arg(default_value = "numbers")]
    mode: IoMode,
    #[arg(help = "Values to provide as input before reading stdin")]
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    input: Vec<i64>,
    #[arg(help = "Log more; repeat for more detail")]
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

macro_rules! to_ascii_char {
    ($e: expr) => {{
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "in macro to make it explicit"
        )]
        {
            $e as u8 as char
        }
    }};
}

/// Read one line of stdin as input, or return [`None`] at end of file
fn get_line(mode: IoMode) -> Result<Option<Vec<i64>>, RunError> {
    let mut buf = String::new();
    if stdin().lock().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    match mode {
        IoMode::Ascii => {
            if let Some(bad_char) = buf.chars().find(|c| !c.is_ascii()) {
                return Err(RunError::InvalidAsciiChar(bad_char));
            }
            Ok(Some(buf.into_bytes().into_iter().map(i64::from).collect()))
        }
        IoMode::Numbers => buf
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().map_err(|_| RunError::InvalidNumber(s.to_owned())))
            .collect::<Result<_, _>>()
            .map(Some),
    }
}

fn print_output(output: Vec<i64>, mode: IoMode) -> io::Result<()> {
    let mut out = stdout().lock();
    for i in output {
        match (mode, i) {
            (IoMode::Ascii, c @ 0..128) => write!(out, "{}", to_ascii_char!(c))?,
            _ => writeln!(out, "{i}")?,
        }
    }
    out.flush()
}

fn run(mut computer: Computer, mode: IoMode) -> Result<(), RunError> {
    loop {
        let state = computer.run()?;
        print_output(computer.drain_output(), mode)?;
        if state == State::Halted {
            break Ok(());
        }
        match get_line(mode)? {
            Some(line) => computer.fill_input(line)?,
            None => break Err(RunError::UnexpectedEof),
        }
    }
}

fn main() -> Result<(), DisplayedError> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .parse_default_env()
        .init();

    let program: Program = match args.format {
        CodeFormat::Ascii => fs::read_to_string(&args.source)?.parse()?,
        CodeFormat::LittleEndian => read_bin_file(&fs::read(&args.source)?, i64::from_le_bytes)?,
        CodeFormat::BigEndian => read_bin_file(&fs::read(&args.source)?, i64::from_be_bytes)?,
    };
    info!("loaded {}", args.source.display());

    let mut computer = Computer::from(program);
    computer.fill_input(args.input)?;
    run(computer, args.mode)?;
    Ok(())
}

fn read_bin_file(bytes: &[u8], decode: fn([u8; 8]) -> i64) -> Result<Program, IncompleteI64> {
    Program::from_words(bytes, decode).map_err(IncompleteI64)
}

#[derive(Debug, thiserror::Error)]
#[error("expected a multiple of 8 bytes, got {0} extra")]
struct IncompleteI64(usize);

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("an I/O error occured: {0}")]
    Io(#[from] io::Error),
    #[error("{0:?} is not a valid ASCII character")]
    InvalidAsciiChar(char),
    #[error("{0:?} is not a valid intcode integer")]
    InvalidNumber(String),
    #[error("input ended while the program was awaiting it")]
    UnexpectedEof,
    #[error(transparent)]
    Computer(#[from] intcode_vm::Error),
}

/// a wrapper around a [`Box`ed][Box] [dyn Error][Error] that uses its implementation of [Display]
/// for the [Debug] impl, to display the Error if returned from `main`
struct DisplayedError(Box<dyn Error>);
impl<E: Error + 'static> From<E> for DisplayedError {
    fn from(e: E) -> Self {
        Self(Box::from(e))
    }
}

impl Debug for DisplayedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}
