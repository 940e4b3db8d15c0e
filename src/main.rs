use anyhow::{Context, Result};
use clap::Parser;
use bmp_codec::bmp;
use bmp_codec::Image;
use cli::{Cli, Commands, ConvertArgs, FillArgs, InfoArgs};

mod cli;


fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info(args) => info(args),
        Commands::Convert(args) => convert(args),
        Commands::Fill(args) => fill(args),
    }
}

fn info(args: InfoArgs) -> Result<()> {
    let file = std::fs::File::open(&args.input)
        .with_context(|| format!("Could not open {}", args.input.display()))?;
    let total_length = file.metadata()?.len();
    let info = bmp::read_info(std::io::BufReader::new(file), total_length)
        .with_context(|| format!("{} is not a readable bitmap", args.input.display()))?;

    println!("{}", args.input.display());
    println!("\tSize:        {}x{}", info.width, info.height);
    println!("\tPlanes:      {}", info.planes);
    match info.bit_depth() {
        Some(depth) => println!("\tBit depth:   {depth:?} ({})", info.bit_count),
        None => println!("\tBit depth:   unknown ({})", info.bit_count)
    }
    match info.compression() {
        Some(compression) => println!("\tCompression: {compression:?}"),
        None => println!("\tCompression: unknown ({:#x})", info.compression)
    }
    println!("\tImage size:  {} bytes", info.image_size);
    println!("\tResolution:  {}x{} pixels per meter", info.x_pels_per_meter, info.y_pels_per_meter);
    if !info.is_canonical() {
        println!("WARNING: pixel data is not 24 bit uncompressed RGB and will be read as if it were");
    }

    Ok(())
}

fn convert(args: ConvertArgs) -> Result<()> {
    println!("Reading file {}...", args.input.display());
    let image = bmp::load_bmp(&args.input)
        .with_context(|| format!("Could not decode {}", args.input.display()))?;
    println!("Decoded {}x{} image", image.width(), image.height());

    bmp::save_bmp(&args.output, &image)
        .with_context(|| format!("Could not write {}", args.output.display()))?;
    println!("Wrote {}", args.output.display());

    Ok(())
}

fn fill(args: FillArgs) -> Result<()> {
    let image = Image::new(args.width, args.height, args.color.0);
    bmp::save_bmp(&args.output, &image)
        .with_context(|| format!("Could not write {}", args.output.display()))?;
    println!("Wrote {}x{} image to {}", args.width, args.height, args.output.display());

    Ok(())
}
