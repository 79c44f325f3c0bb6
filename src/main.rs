use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oxipng::{InFile, OutFile};

use ctr_texture::Bimg;

#[derive(Parser)]
#[command(name = "ctr_texture", about = "Inspect, extract and patch BIMG banner textures")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a BIMG texture to a PNG file
    Extract {
        bimg: PathBuf,
        png: PathBuf,
        /// Run oxipng over the written file
        #[arg(long)]
        optimise: bool,
    },
    /// Replace the texture of a BIMG with a PNG of identical dimensions
    Inject {
        bimg: PathBuf,
        png: PathBuf,
        output: PathBuf,
    },
    /// Print the parsed header and format of a BIMG
    Info {
        bimg: PathBuf,
        /// Emit the header as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Extract {
            bimg,
            png,
            optimise,
        } => extract(&bimg, &png, optimise),
        Command::Inject { bimg, png, output } => inject(&bimg, &png, &output),
        Command::Info { bimg, json } => info(&bimg, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn extract(bimg_path: &Path, png_path: &Path, optimise: bool) -> Result<(), String> {
    let bimg =
        Bimg::open(bimg_path, None).map_err(|e| format!("Failed to open BIMG: {}", e))?;

    println!(
        "Decoded {}x{} {} texture",
        bimg.header().width,
        bimg.header().height,
        bimg.format_name()
    );

    bimg.image()
        .save(png_path)
        .map_err(|e| format!("Failed to save PNG: {}", e))?;
    println!("Saved {}", png_path.display());

    if optimise {
        optimise_png(png_path)?;
        println!("PNG optimisation complete");
    }

    Ok(())
}

fn inject(bimg_path: &Path, png_path: &Path, output: &Path) -> Result<(), String> {
    let mut bimg =
        Bimg::open(bimg_path, None).map_err(|e| format!("Failed to open BIMG: {}", e))?;

    let replacement = image::open(png_path)
        .map_err(|e| format!("Failed to open PNG: {}", e))?
        .to_rgba8();

    bimg.set_image(replacement)
        .map_err(|e| format!("Rejected replacement image: {}", e))?;

    bimg.save(output)
        .map_err(|e| format!("Failed to save BIMG: {}", e))?;
    println!("Wrote patched BIMG to {}", output.display());

    Ok(())
}

fn info(bimg_path: &Path, json: bool) -> Result<(), String> {
    let bimg =
        Bimg::open(bimg_path, None).map_err(|e| format!("Failed to open BIMG: {}", e))?;
    let header = bimg.header();

    if json {
        let text = serde_json::to_string_pretty(header)
            .map_err(|e| format!("Failed to serialise header: {}", e))?;
        println!("{}", text);
    } else {
        println!("Format:    {} (id {})", bimg.format_name(), header.format);
        println!("Size:      {}x{}", header.width, header.height);
        println!("Data size: {} bytes", header.data_size);
    }

    Ok(())
}

fn optimise_png(path: &Path) -> Result<(), String> {
    let mut options = oxipng::Options::from_preset(4);
    options.bit_depth_reduction = true;

    oxipng::optimize(
        &InFile::Path(path.to_path_buf()),
        &OutFile::Path(Some(path.to_path_buf())),
        &options,
    )
    .map_err(|e| format!("PNG optimisation failed: {}", e))
}
