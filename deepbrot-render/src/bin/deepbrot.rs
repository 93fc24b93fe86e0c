//! Headless render driver: renders one Mandelbrot frame to a PNG.
//!
//! All settings come from argv; see `--help`. Progress is polled off the
//! renderer until the generation finishes, then the surface is exported
//! with its metadata.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use deepbrot_core::{
    BackendKind, BigFloatBackend, DecimalBackend, EscapeBackend, NativeBackend, PrecisionContext,
    DEFAULT_PRECISION,
};
use deepbrot_render::{
    export_png, ExportMetadata, Palette, PixelSurface, RenderState, Renderer, DEFAULT_EXTENT,
    DEFAULT_ITERATIONS, DEFAULT_ORIGIN_X, DEFAULT_ORIGIN_Y, DEFAULT_PALETTE_SIZE,
};

const USAGE: &str = "\
Usage: deepbrot [OPTIONS] <output.png>

Options:
  --width <px>       image width (default 800)
  --height <px>      image height (default 600)
  --iterations <n>   iteration budget per sample (default 256)
  --threads <n>      worker threads (default 4)
  --backend <name>   native | decimal | bigfloat (default native)
  --precision <n>    significant digits for the arbitrary-precision backends
                     (default 10)
  --origin <x> <y>   lower-left corner of the view (default -2 -1.2)
  --extent <w>       horizontal width of the view (default 3)
  -h, --help         print this help
";

#[derive(Debug)]
struct Options {
    width: u32,
    height: u32,
    num_iterations: u32,
    num_threads: u32,
    backend: BackendKind,
    precision: u32,
    x_origin: f64,
    y_origin: f64,
    extent: f64,
    output: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print!("{USAGE}");
        return;
    }
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    info!("Starting Deepbrot render");
    if let Err(message) = run(&options) {
        eprintln!("{message}");
        std::process::exit(1);
    }
}

fn run(options: &Options) -> Result<(), String> {
    match options.backend {
        BackendKind::Native => render_frame(NativeBackend::new(), options),
        BackendKind::Decimal => {
            let ctx = PrecisionContext::new(options.precision).map_err(|e| e.to_string())?;
            let backend = DecimalBackend::new(ctx).map_err(|e| e.to_string())?;
            render_frame(backend, options)
        }
        BackendKind::BigFloat => {
            render_frame(BigFloatBackend::with_decimal_digits(options.precision), options)
        }
    }
}

fn render_frame<B: EscapeBackend>(backend: B, options: &Options) -> Result<(), String> {
    let surface = Arc::new(
        PixelSurface::new(options.width, options.height).map_err(|e| e.to_string())?,
    );
    let mut renderer = Renderer::new(
        backend,
        options.width,
        options.height,
        Arc::clone(&surface),
        Palette::default(),
    )
    .map_err(|e| e.to_string())?;
    renderer
        .set_initial_params(options.x_origin, options.y_origin, options.extent)
        .map_err(|e| e.to_string())?;
    renderer
        .draw(options.num_iterations, options.num_threads)
        .map_err(|e| e.to_string())?;

    loop {
        let (done, total) = renderer.progress();
        if done >= total || renderer.is_cancelled() {
            break;
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    renderer.terminate_threads();
    if renderer.state() != RenderState::Completed {
        return Err("Render was cancelled before completing".into());
    }

    let viewport = renderer.viewport();
    let metadata = ExportMetadata {
        backend: renderer.backend().kind().label().to_string(),
        x_origin: format!("{}", viewport.x_origin),
        y_origin: format!("{}", viewport.y_origin),
        extent: format!("{}", viewport.extent),
        num_iterations: options.num_iterations,
        num_threads: options.num_threads,
        palette_size: DEFAULT_PALETTE_SIZE,
        width: options.width,
        height: options.height,
    };
    export_png(
        &surface.snapshot(),
        options.width,
        options.height,
        &options.output,
        &metadata,
    )?;
    info!("Wrote {}", options.output.display());
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut width = 800u32;
    let mut height = 600u32;
    let mut num_iterations = DEFAULT_ITERATIONS;
    let mut num_threads = 4u32;
    let mut backend = BackendKind::Native;
    let mut precision = DEFAULT_PRECISION;
    let mut x_origin = DEFAULT_ORIGIN_X;
    let mut y_origin = DEFAULT_ORIGIN_Y;
    let mut extent = DEFAULT_EXTENT;
    let mut output: Option<PathBuf> = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--width" => width = parse_number(iter.next(), "--width")?,
            "--height" => height = parse_number(iter.next(), "--height")?,
            "--iterations" => num_iterations = parse_number(iter.next(), "--iterations")?,
            "--threads" => num_threads = parse_number(iter.next(), "--threads")?,
            "--precision" => precision = parse_number(iter.next(), "--precision")?,
            "--backend" => backend = parse_backend(iter.next())?,
            "--origin" => {
                x_origin = parse_number(iter.next(), "--origin")?;
                y_origin = parse_number(iter.next(), "--origin")?;
            }
            "--extent" => extent = parse_number(iter.next(), "--extent")?,
            other if other.starts_with('-') => {
                return Err(format!("Unknown option '{other}'\n\n{USAGE}"));
            }
            other => {
                if output.replace(PathBuf::from(other)).is_some() {
                    return Err(format!("More than one output path given\n\n{USAGE}"));
                }
            }
        }
    }

    let output = output.ok_or_else(|| format!("Missing output path\n\n{USAGE}"))?;
    Ok(Options {
        width,
        height,
        num_iterations,
        num_threads,
        backend,
        precision,
        x_origin,
        y_origin,
        extent,
        output,
    })
}

fn parse_backend(value: Option<&String>) -> Result<BackendKind, String> {
    match value.map(String::as_str) {
        Some("native") => Ok(BackendKind::Native),
        Some("decimal") => Ok(BackendKind::Decimal),
        Some("bigfloat") => Ok(BackendKind::BigFloat),
        Some(other) => Err(format!(
            "Unknown backend '{other}' (expected native, decimal or bigfloat)"
        )),
        None => Err("Missing value for --backend".into()),
    }
}

fn parse_number<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("Missing value for {flag}"))?;
    raw.parse()
        .map_err(|_| format!("Invalid value '{raw}' for {flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_fill_everything_but_the_output() {
        let options = parse_args(&args(&["out.png"])).unwrap();
        assert_eq!(options.width, 800);
        assert_eq!(options.height, 600);
        assert_eq!(options.num_iterations, DEFAULT_ITERATIONS);
        assert_eq!(options.backend, BackendKind::Native);
        assert_eq!(options.output, PathBuf::from("out.png"));
    }

    #[test]
    fn flags_override_defaults() {
        let options = parse_args(&args(&[
            "--width", "64", "--height", "48", "--backend", "decimal", "--precision", "20",
            "--origin", "-0.75", "0.1", "--extent", "0.01", "frame.png",
        ]))
        .unwrap();
        assert_eq!(options.width, 64);
        assert_eq!(options.height, 48);
        assert_eq!(options.backend, BackendKind::Decimal);
        assert_eq!(options.precision, 20);
        assert_eq!(options.x_origin, -0.75);
        assert_eq!(options.y_origin, 0.1);
        assert_eq!(options.extent, 0.01);
    }

    #[test]
    fn rejects_unknown_flags_and_missing_output() {
        assert!(parse_args(&args(&["--wat", "out.png"])).is_err());
        assert!(parse_args(&args(&["--width", "64"])).is_err());
        assert!(parse_args(&args(&["--backend", "quad", "out.png"])).is_err());
        assert!(parse_args(&args(&["--width", "sixty", "out.png"])).is_err());
    }
}
