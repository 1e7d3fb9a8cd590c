//! bjpeg - baseline JPEG scan encoder
//!
//! Reads a PPM (P6) or PGM (P5) image and writes the entropy-coded segment
//! of a baseline scan. No markers or headers are written.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

use baseline_jpeg::jpeg::{HuffmanTables, QuantTables, Rounding};
use baseline_jpeg::simd::Backend;
use baseline_jpeg::{deinterleave, encode_scan_into, PixelFormat, ScanOptions, Subsampling};

/// Encode a PPM/PGM image into a baseline JPEG entropy-coded segment.
#[derive(Parser, Debug)]
#[command(name = "bjpeg")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input image file (PPM or PGM, 8-bit)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file path (defaults to INPUT with a .scan extension)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Quality (1-100, higher = better quality)
    #[arg(short, long, default_value = "85", value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Chroma subsampling
    #[arg(long, value_enum, default_value = "s444")]
    subsampling: SubsamplingArg,

    /// Rounding of scaled DCT coefficients
    #[arg(long, value_enum, default_value = "away")]
    rounding: RoundingArg,

    /// Kernel backend (falls back to scalar when unavailable)
    #[arg(long, value_enum, default_value = "auto")]
    backend: BackendArg,

    /// Convert to grayscale before encoding
    #[arg(long)]
    grayscale: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SubsamplingArg {
    /// 4:4:4 (no subsampling)
    S444,
    /// 4:2:0 (2x2 chroma subsampling)
    S420,
}

impl From<SubsamplingArg> for Subsampling {
    fn from(arg: SubsamplingArg) -> Self {
        match arg {
            SubsamplingArg::S444 => Subsampling::S444,
            SubsamplingArg::S420 => Subsampling::S420,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoundingArg {
    /// Round half away from zero
    Away,
    /// Round half to even
    Even,
}

impl From<RoundingArg> for Rounding {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Away => Rounding::HalfAwayFromZero,
            RoundingArg::Even => Rounding::HalfToEven,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Best backend for this CPU
    Auto,
    Scalar,
    Sse41,
    Avx2,
}

impl BackendArg {
    fn to_backend(self) -> Option<Backend> {
        match self {
            BackendArg::Auto => None,
            BackendArg::Scalar => Some(Backend::Scalar),
            BackendArg::Sse41 => Some(Backend::Sse41),
            BackendArg::Avx2 => Some(Backend::Avx2),
        }
    }
}

/// Decoded input pixels.
struct PnmImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    format: PixelFormat,
}

/// Decode a PPM (P6) or PGM (P5) file.
fn decode_pnm(path: &Path) -> Result<PnmImage, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let mut magic = String::new();
    read_token(&mut reader, &mut magic)?;

    let format = match magic.as_str() {
        "P5" => PixelFormat::Gray8,
        "P6" => PixelFormat::Rgb24,
        _ => {
            return Err(format!(
                "Unsupported format '{}'. Expected P5 (PGM) or P6 (PPM)",
                magic
            )
            .into())
        }
    };

    let mut header = [0u32; 3];
    let mut token = String::new();
    for field in header.iter_mut() {
        read_token(&mut reader, &mut token)?;
        *field = token.parse()?;
    }
    let [width, height, max_val] = header;

    if max_val != 255 {
        return Err(format!(
            "Unsupported max value {}. Only 8-bit (255) supported",
            max_val
        )
        .into());
    }

    let expected_size = width as usize * height as usize * format.bytes_per_pixel();
    let mut pixels = vec![0u8; expected_size];
    reader.read_exact(&mut pixels)?;

    Ok(PnmImage {
        width,
        height,
        pixels,
        format,
    })
}

/// Read next whitespace-delimited token, skipping comments.
fn read_token<R: BufRead>(reader: &mut R, token: &mut String) -> std::io::Result<()> {
    token.clear();
    let mut in_comment = false;

    loop {
        let mut byte = [0u8; 1];
        if reader.read(&mut byte)? == 0 {
            break;
        }

        let ch = byte[0] as char;

        if in_comment {
            in_comment = ch != '\n';
            continue;
        }

        match ch {
            '#' => in_comment = true,
            c if c.is_ascii_whitespace() => {
                if !token.is_empty() {
                    break;
                }
            }
            c => token.push(c),
        }
    }

    Ok(())
}

/// BT.601 integer luma.
fn to_grayscale(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .map(|p| {
            let (r, g, b) = (p[0] as u32, p[1] as u32, p[2] as u32);
            ((77 * r + 150 * g + 29 * b + 128) >> 8) as u8
        })
        .collect()
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.verbose {
        SimpleLogger::new().with_level(LevelFilter::Debug).init()?;
    }

    let start = Instant::now();
    let mut img = decode_pnm(&args.input)?;
    let decode_time = start.elapsed();

    if args.grayscale && img.format != PixelFormat::Gray8 {
        img.pixels = to_grayscale(&img.pixels);
        img.format = PixelFormat::Gray8;
    }

    if args.verbose {
        eprintln!("Input: {:?}", args.input);
        eprintln!("  Dimensions: {}x{}", img.width, img.height);
        eprintln!("  Format: {:?}", img.format);
        eprintln!("  Decode time: {:.2?}", decode_time);
    }

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("scan"));

    let planar = deinterleave(
        &img.pixels,
        img.width,
        img.height,
        img.width as usize * img.format.bytes_per_pixel(),
        img.format,
    )?;
    let options = ScanOptions {
        subsampling: args.subsampling.into(),
        rounding: args.rounding.into(),
        backend: args.backend.to_backend(),
    };

    let encode_start = Instant::now();
    let mut output_data = Vec::new();
    let stats = encode_scan_into(
        &mut output_data,
        &planar.source()?,
        &QuantTables::with_quality(args.quality),
        HuffmanTables::standard(),
        &options,
    )?;
    let encode_time = encode_start.elapsed();

    fs::write(&output_path, &output_data)?;

    let input_size = fs::metadata(&args.input)?.len();
    let output_size = output_data.len() as u64;
    let ratio = if input_size > 0 {
        (output_size as f64 / input_size as f64) * 100.0
    } else {
        0.0
    };

    if args.verbose {
        eprintln!("Output: {:?}", output_path);
        eprintln!("  Quality: {}", args.quality);
        eprintln!("  Subsampling: {:?}", args.subsampling);
        eprintln!("  Rounding: {:?}", options.rounding);
        eprintln!(
            "  MCUs: {}, blocks: {}, EOB: {}, ZRL: {}, stuffed: {}",
            stats.mcus, stats.blocks, stats.eob_count, stats.zrl_count, stats.stuffed_bytes
        );
        eprintln!("  Encode time: {:.2?}", encode_time);
        eprintln!(
            "  Size: {} -> {} ({:.1}%)",
            format_size(input_size),
            format_size(output_size),
            ratio
        );
    } else {
        println!(
            "{} -> {} ({:.1}%)",
            format_size(input_size),
            format_size(output_size),
            ratio
        );
    }

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
