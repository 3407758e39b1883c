use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use image_select_compare::batch::{self, MaskOptions, MaskResult};
use image_select_compare::geometry::Display as DisplaySpace;
use image_select_compare::request::mime_type_for;
use image_select_compare::{compose, Natural, ProxyRequest, Rect, SliderPosition, ToolKind};

#[derive(Parser)]
#[command(
    name = "image-select",
    about = "Selection masks and before/after snapshots for AI image tools",
    version,
    after_help = "Simple usage: image-select mask <image> --rect 10,10,120,40\n\n\
                  Selections are given in display space; pass --display to scale them\n\
                  to the image's natural size."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write an inpainting mask for a selected region
    Mask {
        /// Input image file or directory
        input: String,

        /// Selection as x,y,width,height in display pixels
        #[arg(short, long)]
        rect: Rect<DisplaySpace>,

        /// Size the image was displayed at, as WIDTHxHEIGHT (default: natural size)
        #[arg(short, long, value_parser = parse_size)]
        display: Option<(f64, f64)>,

        /// Output file or directory (default: {name}_mask.png)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Render the compare slider at a given position
    Compare {
        /// Image shown right of the boundary
        before: String,

        /// Image revealed left of the boundary
        after: String,

        /// Reveal boundary in percent (clamped to 0-100)
        #[arg(short, long, default_value = "50", allow_negative_numbers = true)]
        position: f64,

        /// Container size as WIDTHxHEIGHT (default: size of the before image)
        #[arg(short, long, value_parser = parse_size)]
        size: Option<(f64, f64)>,

        /// Output file
        #[arg(short, long, default_value = "compare.png")]
        output: String,
    },
    /// Print the JSON request a tool would send to the proxy
    Request {
        /// Tool id (background-remover, watermark-remover, image-enhancer,
        /// image-to-cartoon, icon-generator)
        #[arg(short, long)]
        tool: ToolKind,

        /// Input image, or the icon description for icon-generator
        input: String,

        /// Selection as x,y,width,height in natural pixels (watermark-remover)
        #[arg(short, long)]
        rect: Option<Rect<Natural>>,
    },
}

fn parse_size(s: &str) -> Result<(f64, f64), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: f64 = w.trim().parse().map_err(|e| format!("width: {e}"))?;
    let h: f64 = h.trim().parse().map_err(|e| format!("height: {e}"))?;
    if w > 0.0 && h > 0.0 {
        Ok((w, h))
    } else {
        Err(format!("size must be positive, got {s:?}"))
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let code = match cli.command {
        Command::Mask {
            input,
            rect,
            display,
            output,
        } => {
            let opts = MaskOptions {
                rect,
                display_size: display,
            };
            run_mask(&input, output.as_deref(), &opts)
        }
        Command::Compare {
            before,
            after,
            position,
            size,
            output,
        } => run_compare(&before, &after, position, size, &output),
        Command::Request { tool, input, rect } => run_request(tool, &input, rect),
    };
    process::exit(code);
}

fn run_mask(input: &str, output: Option<&str>, opts: &MaskOptions) -> i32 {
    let input_path = Path::new(input);
    if !input_path.exists() {
        log::error!("Input path does not exist: {input}");
        return 1;
    }

    let results = if input_path.is_dir() {
        let Some(output_dir) = output.map(PathBuf::from) else {
            log::error!("Output directory is required for batch processing");
            log::error!("Usage: image-select mask <input_dir> --rect x,y,w,h -o <output_dir>");
            return 1;
        };
        batch::process_directory(input_path, &output_dir, opts)
    } else {
        let output_path = output.map_or_else(|| batch::default_mask_path(input_path), PathBuf::from);
        vec![batch::process_file(input_path, &output_path, opts)]
    };

    let mut success_count = 0u32;
    let mut skip_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r);
        if r.skipped {
            skip_count += 1;
        } else if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 {
        log::info!(
            "[Summary] Processed: {success_count}, Skipped: {skip_count}, Failed: {fail_count} (Total: {})",
            results.len()
        );
    }

    i32::from(fail_count > 0)
}

fn print_result(result: &MaskResult) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.skipped {
        log::warn!("[SKIP] {filename}: {}", result.message);
    } else if result.success {
        match result.selection {
            Some(sel) => log::info!("[OK] {filename} {sel}"),
            None => log::info!("[OK] {filename}"),
        }
    } else {
        log::error!("[FAIL] {filename}: {}", result.message);
    }

    if !result.message.is_empty() {
        log::debug!("  -> {}", result.message);
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn run_compare(
    before: &str,
    after: &str,
    position: f64,
    size: Option<(f64, f64)>,
    output: &str,
) -> i32 {
    let load = |p: &str| image::open(p).map(|img| img.to_rgba8());
    let (before_img, after_img) = match (load(before), load(after)) {
        (Ok(b), Ok(a)) => (b, a),
        (Err(e), _) | (_, Err(e)) => {
            log::error!("Failed to load: {e}");
            return 1;
        }
    };

    let (cw, ch) = size.map_or(before_img.dimensions(), |(w, h)| {
        (w.round() as u32, h.round() as u32)
    });
    let position = SliderPosition::new(position);

    match compose::render_snapshot(&before_img, &after_img, cw, ch, position)
        .and_then(|img| img.save(output).map_err(Into::into))
    {
        Ok(()) => {
            log::info!("[OK] {output} ({:.1}% revealed)", position.percent());
            0
        }
        Err(e) => {
            log::error!("[FAIL] {output}: {e}");
            1
        }
    }
}

fn run_request(tool: ToolKind, input: &str, rect: Option<Rect<Natural>>) -> i32 {
    let request = if tool.takes_upload() {
        let path = Path::new(input);
        let Some(mime) = mime_type_for(path) else {
            log::error!("Unsupported image type: {input}");
            return 1;
        };
        let built = std::fs::read(path)
            .map_err(image_select_compare::Error::from)
            .and_then(|bytes| {
                let size = image::image_dimensions(path)?;
                ProxyRequest::for_upload(tool, &bytes, mime, size, rect.as_ref())
            });
        match built {
            Ok(r) => r,
            Err(e) => {
                log::error!("{e}");
                return 1;
            }
        }
    } else {
        ProxyRequest::icon(input)
    };

    match request.to_json() {
        Ok(json) => {
            println!("{json}");
            0
        }
        Err(e) => {
            log::error!("{e}");
            1
        }
    }
}
