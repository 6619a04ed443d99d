use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use conv_demos::output::{create_timestamped_output_dir, write_history_json, write_walk_csv};
use conv_demos::plot::{
    convolution_plot, kernels_plot, plot_distribution, plot_kronecker, plot_signal,
    plot_signal_as_delta,
};
use conv_demos::{
    adding_random_numbers_demo, convolve_with_kernels, random_walk_seeded, DemoConfig, DemoError,
    Frame, FrameRenderer, NoDelay, NullRenderer, Pacing, SvgFrameWriter,
};
use plotters::prelude::*;

const DEFAULT_CONFIG_FILE: &str = "conv-demos.json";

#[derive(Debug, Parser)]
#[command(author, version, about = "Convolution and probability teaching demos")]
struct Cli {
    /// JSON configuration file (./conv-demos.json is used when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output base directory; each run gets a timestamped subdirectory
    #[arg(long, global = true, default_value = "output-conv-demos")]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a random walk, write it as CSV and plot it
    Walk {
        /// Total simulated time
        #[arg(long)]
        t_max: Option<f64>,

        /// Diffusion scale
        #[arg(long)]
        sigma: Option<f64>,

        /// Time step
        #[arg(long)]
        eps: Option<f64>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Repeatedly convolve a PMF with itself and render every step
    Sum {
        /// Comma-separated probabilities, e.g. 0.5,0.5
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
        pmf: Option<Vec<f64>>,

        /// Number of convolution steps
        #[arg(long)]
        iterations: Option<usize>,

        /// Delay after the first frame in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Fraction by which each subsequent delay shrinks
        #[arg(long)]
        decay: Option<f64>,

        /// Run frames back to back
        #[arg(long)]
        no_pacing: bool,

        /// Skip writing SVG frames
        #[arg(long)]
        no_frames: bool,
    },

    /// Delta function, kernel and convolution plots
    Gallery {
        /// Random seed for the example signal
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Prints one line per frame before handing it on
struct Progress<R> {
    inner: R,
}

impl<R: FrameRenderer> FrameRenderer for Progress<R> {
    fn render_frame(&mut self, frame: &Frame<'_>) -> Result<(), DemoError> {
        println!(
            "  frame {:>3}: support {:>4} | mean {:>8.3} | variance {:>8.3}",
            frame.step,
            frame.pmf.len(),
            frame.pmf.mean(),
            frame.pmf.variance()
        );
        self.inner.render_frame(frame)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Walk {
            t_max,
            sigma,
            eps,
            seed,
        } => {
            if let Some(v) = t_max {
                cfg.walk.t_max = v;
            }
            if let Some(v) = sigma {
                cfg.walk.sigma = v;
            }
            if let Some(v) = eps {
                cfg.walk.eps = v;
            }
            if let Some(v) = seed {
                cfg.seed = v;
            }
            cfg.validate()?;
            run_walk(&cfg, &cli.output)
        }
        Command::Sum {
            pmf,
            iterations,
            delay_ms,
            decay,
            no_pacing,
            no_frames,
        } => {
            if let Some(v) = pmf {
                cfg.pmf = v;
            }
            if let Some(v) = iterations {
                cfg.iterations = v;
            }
            if let Some(v) = delay_ms {
                cfg.base_delay_ms = v;
            }
            if let Some(v) = decay {
                cfg.decay_rate = v;
            }
            cfg.validate()?;
            run_sum(&cfg, &cli.output, no_pacing, no_frames)
        }
        Command::Gallery { seed } => {
            if let Some(v) = seed {
                cfg.seed = v;
            }
            cfg.validate()?;
            run_gallery(&cfg, &cli.output)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<DemoConfig, DemoError> {
    if let Some(path) = path {
        return DemoConfig::from_json_file(path);
    }

    let cwd_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if cwd_config.exists() {
        return DemoConfig::from_json_file(&cwd_config);
    }

    Ok(DemoConfig::default())
}

fn run_walk(cfg: &DemoConfig, output: &Path) -> anyhow::Result<()> {
    println!("Generating random walk...");
    println!("  t_max: {}", cfg.walk.t_max);
    println!("  sigma: {}", cfg.walk.sigma);
    println!("  eps: {}", cfg.walk.eps);
    println!("  seed: {}", cfg.seed);

    let walk = random_walk_seeded(&cfg.walk, cfg.seed)?;
    let run_dir = create_timestamped_output_dir(output)?;

    let csv_path = run_dir.join("walk.csv");
    write_walk_csv(&csv_path, &cfg.walk, &walk)?;

    let plot_path = run_dir.join("walk.svg");
    {
        let root = SVGBackend::new(&plot_path, (1200, 200)).into_drawing_area();
        plot_signal(&root, &walk, "random walk")?;
        root.present()?;
    }

    println!("Samples: {}", walk.len());
    println!("CSV: {}", csv_path.display());
    println!("Plot: {}", plot_path.display());
    Ok(())
}

fn run_sum(
    cfg: &DemoConfig,
    output: &Path,
    no_pacing: bool,
    no_frames: bool,
) -> anyhow::Result<()> {
    println!("Adding random numbers...");
    println!("  PMF: {:?}", cfg.pmf);
    println!("  Iterations: {}", cfg.iterations);

    let run_dir = create_timestamped_output_dir(output)?;
    let frames_dir = run_dir.join("frames");

    let mut pacing: Box<dyn Pacing> = if no_pacing {
        Box::new(NoDelay)
    } else {
        Box::new(cfg.pacing()?)
    };
    let renderer: Box<dyn FrameRenderer> = if no_frames {
        Box::new(NullRenderer)
    } else {
        Box::new(SvgFrameWriter::new(&frames_dir, cfg.frame_size()))
    };
    let mut progress = Progress { inner: renderer };

    let history = adding_random_numbers_demo(
        &cfg.pmf,
        cfg.iterations,
        &mut progress,
        pacing.as_mut(),
    )?;

    let history_path = run_dir.join("history.json");
    write_history_json(&history_path, &history)?;

    let final_path = run_dir.join("final.svg");
    {
        let root = SVGBackend::new(&final_path, cfg.frame_size()).into_drawing_area();
        plot_distribution(&root, history.latest())?;
        root.present()?;
    }

    let latest = history.latest();
    println!(
        "Final distribution: support {} | mean {:.3} | variance {:.3} | mass {:.6}",
        latest.len(),
        latest.mean(),
        latest.variance(),
        latest.total_mass()
    );
    println!("Run directory: {}", run_dir.display());
    if !no_frames {
        println!("Frames: {}", frames_dir.display());
    }
    println!("History: {}", history_path.display());
    println!("Final plot: {}", final_path.display());
    Ok(())
}

fn run_gallery(cfg: &DemoConfig, output: &Path) -> anyhow::Result<()> {
    println!("Rendering convolution gallery...");

    let run_dir = create_timestamped_output_dir(output)?;
    let signal = random_walk_seeded(&cfg.walk, cfg.seed)?;

    let kernels: Vec<Vec<f64>> = vec![
        vec![1.0],
        vec![0.0, 0.0, 1.0],
        vec![1.0 / 3.0; 3],
        vec![1.0, -1.0],
    ];
    let kernel_names = ["delta", "shifted delta", "box", "difference"];

    let kronecker_path = run_dir.join("kronecker.svg");
    {
        let root = SVGBackend::new(&kronecker_path, (600, 400)).into_drawing_area();
        plot_kronecker(&root)?;
        root.present()?;
    }

    let delta_path = run_dir.join("signal_as_delta.svg");
    {
        let root = SVGBackend::new(&delta_path, (1600, 400)).into_drawing_area();
        plot_signal_as_delta(&root, &signal, "random walk", RED)?;
        root.present()?;
    }

    let kernels_path = run_dir.join("kernels.svg");
    {
        let root = SVGBackend::new(&kernels_path, (1600, 400)).into_drawing_area();
        kernels_plot(&root, &kernels, &kernel_names)?;
        root.present()?;
    }

    let convolution_path = run_dir.join("convolution.svg");
    {
        let signals = convolve_with_kernels(&signal, &kernels);
        let height = 400 * kernels.len() as u32;
        let root = SVGBackend::new(&convolution_path, (1600, height)).into_drawing_area();
        convolution_plot(&root, &signals, "x", &kernels, &kernel_names)?;
        root.present()?;
    }

    println!("Run directory: {}", run_dir.display());
    for path in [&kronecker_path, &delta_path, &kernels_path, &convolution_path] {
        println!("  {}", path.display());
    }
    Ok(())
}
