use std::path::PathBuf;
use std::str::FromStr;
use clap::Parser;
use bmp_codec::Color;

/// Inspect and write 24 bit BMP files.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub enum Commands {
    /// Print the header fields of a BMP file.
    Info(InfoArgs),

    /// Decode a BMP file and write it back out in canonical 24 bit form.
    Convert(ConvertArgs),

    /// Write a solid color BMP file.
    Fill(FillArgs),
}

#[derive(Parser, Debug)]
pub struct InfoArgs {
    pub input: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,

    pub output: PathBuf,
}

#[derive(Parser, Debug)]
pub struct FillArgs {
    pub output: PathBuf,

    #[arg(long)]
    pub width: usize,

    #[arg(long)]
    pub height: usize,

    /// Fill color as RRGGBB hex, e.g. ff8000.
    #[arg(long, default_value = "000000")]
    pub color: HexColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor(pub Color);

impl FromStr for HexColor {
    type Err = String;

    fn from_str(s: &str) -> Result<HexColor, String> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("expected 6 hex digits, got {s:?}"));
        }
        let value = u32::from_str_radix(digits, 16).map_err(|e| format!("{s:?}: {e}"))?;
        let [_, r, g, b] = value.to_be_bytes();
        Ok(HexColor(Color::new(r, g, b)))
    }
}
