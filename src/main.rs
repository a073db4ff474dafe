use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dagbox", about = "Render a grid-placed DAG as an SVG diagram")]
struct Cli {
    /// Input file, JSON or `dag` text (reads from stdin if not provided)
    file: Option<std::path::PathBuf>,

    /// Node to highlight with its upstream and downstream closure
    #[arg(long, short = 'f')]
    focus: Option<String>,

    /// Pixel width per label column; boxes use a fixed width when omitted
    #[arg(long)]
    char_width: Option<f64>,

    /// Namespace for element ids
    #[arg(long)]
    instance: Option<String>,

    /// Leave out the embedded stylesheet
    #[arg(long)]
    no_style: bool,

    /// Print the render scene as JSON instead of SVG
    #[arg(long)]
    scene: bool,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = match &cli.file {
        Some(path) => std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("ERROR: failed to read {}: {e}", path.display());
            std::process::exit(1);
        }),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).unwrap_or_else(|e| {
                eprintln!("ERROR: failed to read stdin: {e}");
                std::process::exit(1);
            });
            buf
        }
    };

    let options = dagbox::RenderOptions {
        char_width: cli.char_width,
        focus: cli.focus,
        style: !cli.no_style,
        instance: cli.instance,
    };

    let output = if cli.scene {
        dagbox::render_scene(&input, &options)
            .and_then(|scene| scene.to_json().map_err(dagbox::Error::from))
    } else {
        dagbox::render(&input, &options)
    };

    match output {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("ERROR: {e}");
            std::process::exit(1);
        }
    }
}
