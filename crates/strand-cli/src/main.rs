//! Strand CLI: brush strokes, strand relaxation and benchmarking.

use clap::{Parser, Subcommand, ValueEnum};

mod commands;

#[derive(Parser)]
#[command(name = "strand")]
#[command(version, about = "Strand: guide-curve grooming engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Surface the guides are rooted on.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SurfaceArg {
    /// Faceted unit sphere.
    Sphere,
    /// Ground plane at y = 0.
    Plane,
}

/// Brush applied along the stroke.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum BrushArg {
    /// Translate non-root vertices.
    Translate,
    /// Swing guides about their roots.
    Rotate,
}

#[derive(Subcommand)]
enum Commands {
    /// Stream a brush stroke through the background scheduler.
    Stroke {
        /// Surface the guides are rooted on.
        #[arg(long, value_enum, default_value = "sphere")]
        surface: SurfaceArg,

        /// Brush mode.
        #[arg(short, long, value_enum, default_value = "translate")]
        brush: BrushArg,

        /// Stroke displacement per drag sample, as `x,y,z`.
        #[arg(short, long, default_value = "0.01,-0.005,0", value_delimiter = ',', allow_hyphen_values = true)]
        delta: Vec<f64>,

        /// Number of drag samples.
        #[arg(short, long, default_value_t = 60)]
        samples: u32,

        /// Optional solver config (JSON).
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Restore segment lengths of perturbed strands (lightweight mode).
    Relax {
        /// Number of strands.
        #[arg(short, long, default_value_t = 64)]
        strands: usize,

        /// Vertices per strand.
        #[arg(short, long, default_value_t = 16)]
        vertices: usize,

        /// Relative segment length perturbation.
        #[arg(short, long, default_value_t = 0.2)]
        jitter: f64,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (sphere_comb, plane_push, relax, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Stroke {
            surface,
            brush,
            delta,
            samples,
            config,
        } => commands::stroke(surface, brush, &delta, samples, config.as_deref()),
        Commands::Relax {
            strands,
            vertices,
            jitter,
        } => commands::relax(strands, vertices, jitter),
        Commands::Benchmark { scenario, output } => {
            commands::benchmark(&scenario, output.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
