//! Command line front end for the Game of Life simulator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use life_sim::{
    config::{CliOverrides, OutputFormat, Settings},
    game_of_life::{
        create_example_patterns, load_pattern_from_file, load_patterns_from_directory, presets,
        save_grid_to_file, GenerationEngine, RulePreset,
    },
    render::TerminalRenderer,
    scheduler::IntervalFrameSource,
    simulation::{Command, Simulation},
    utils::{ColorOutput, GridFormatter},
};
use std::io::BufRead;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "life-sim")]
#[command(about = "Conway's Game of Life simulator")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Animate a board in the terminal
    Run {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Board width (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Board height (overrides config)
        #[arg(long)]
        height: Option<usize>,

        /// Rule preset (overrides config)
        #[arg(short, long, value_enum)]
        rule: Option<RulePreset>,

        /// Index into the speed table (overrides config)
        #[arg(short, long)]
        speed: Option<usize>,

        /// Pattern file to seed the board with (overrides config)
        #[arg(short, long)]
        pattern: Option<PathBuf>,

        /// Stop after this many generations, 0 for no limit (overrides config)
        #[arg(short, long)]
        generations: Option<u64>,

        /// Read commands from stdin while running (p, s, c, +, -, speed N, on/off IDS, t ID, q)
        #[arg(short, long)]
        interactive: bool,
    },

    /// Advance a pattern a fixed number of generations and print the result
    Step {
        /// Configuration file path
        #[arg(short, long, default_value = "config/default.yaml")]
        config: PathBuf,

        /// Pattern file to start from
        #[arg(short, long, conflicts_with = "preset")]
        pattern: Option<PathBuf>,

        /// Built-in pattern to start from (glider, blinker, block, beacon, toad)
        #[arg(long)]
        preset: Option<String>,

        /// Number of generations to advance
        #[arg(short = 'n', long, default_value_t = 1)]
        generations: usize,

        /// Rule preset (overrides config)
        #[arg(short, long, value_enum)]
        rule: Option<RulePreset>,

        /// Output format (overrides config)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Print row and column numbers
        #[arg(long)]
        coords: bool,

        /// Also save the final board to this file in pattern format
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the patterns found in a directory
    Patterns {
        /// Directory to scan for .txt patterns
        #[arg(short, long, default_value = "patterns")]
        directory: PathBuf,
    },

    /// Create example configuration and pattern files
    Setup {
        /// Directory to create files in
        #[arg(short, long, default_value = ".")]
        directory: PathBuf,

        /// Force overwrite existing files
        #[arg(short, long)]
        force: bool,
    },

    /// List the built-in rule presets
    Rules,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            width,
            height,
            rule,
            speed,
            pattern,
            generations,
            interactive,
        } => {
            let overrides = CliOverrides {
                width,
                height,
                rule,
                speed_index: speed,
                pattern_file: pattern,
                max_generations: generations,
                format: None,
            };
            run_command(config, overrides, interactive)
        }
        Commands::Step {
            config,
            pattern,
            preset,
            generations,
            rule,
            format,
            coords,
            output,
        } => {
            let overrides = CliOverrides {
                rule,
                pattern_file: pattern,
                format,
                ..Default::default()
            };
            let options = StepOptions {
                preset,
                generations,
                coords,
                output,
            };
            step_command(config, overrides, options)
        }
        Commands::Patterns { directory } => patterns_command(directory),
        Commands::Setup { directory, force } => setup_command(directory, force),
        Commands::Rules => {
            rules_command();
            Ok(())
        }
    }
}

fn load_settings(config_path: &PathBuf, overrides: &CliOverrides) -> Result<Settings> {
    let mut settings = if config_path.exists() {
        Settings::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        eprintln!(
            "{}",
            ColorOutput::warning(&format!(
                "Config file {} not found, using defaults",
                config_path.display()
            ))
        );
        Settings::default()
    };

    settings.merge_with_cli(overrides);
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

fn run_command(config_path: PathBuf, overrides: CliOverrides, interactive: bool) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;

    let frames = IntervalFrameSource::new(settings.scheduler.frame_rate_hz);
    let renderer = TerminalRenderer::stdout(settings.output.show_status);
    let mut simulation = Simulation::new(&settings, frames, renderer)
        .context("Failed to create simulation")?;

    if interactive {
        let sender = simulation.sender();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => {
                        if sender.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => eprintln!("{}", ColorOutput::error(&e.to_string())),
                }
            }
        });
    }

    if settings.run.autostart {
        simulation.dispatch(Command::Start);
    }

    let start_time = Instant::now();
    let generation = simulation.run(settings.run.max_generations, interactive);

    if let Some(e) = simulation.renderer_mut().take_error() {
        return Err(e).context("Failed to draw board");
    }

    println!(
        "{}",
        ColorOutput::success(&format!(
            "Stopped at generation {} after {:.1}s ({} at {})",
            generation,
            start_time.elapsed().as_secs_f64(),
            simulation.scheduler().speed().label,
            GridFormatter::format_status(simulation.engine()),
        ))
    );

    Ok(())
}

/// Options of the `step` subcommand that are not configuration overrides
#[derive(Debug, Default)]
struct StepOptions {
    preset: Option<String>,
    generations: usize,
    coords: bool,
    output: Option<PathBuf>,
}

fn step_command(config_path: PathBuf, overrides: CliOverrides, options: StepOptions) -> Result<()> {
    let settings = load_settings(&config_path, &overrides)?;

    let pattern = match (options.preset, &settings.input.pattern_file) {
        (Some(name), _) => presets::by_name(&name)
            .with_context(|| format!("Unknown preset pattern '{}'", name))?,
        (None, Some(path)) => load_pattern_from_file(path)?,
        (None, None) => anyhow::bail!("No pattern given; use --pattern or --preset"),
    };

    let mut engine = GenerationEngine::new(
        settings.board.width,
        settings.board.height,
        settings.rules.clone(),
    )?;
    engine
        .place_pattern_centered(&pattern)
        .with_context(|| format!("Failed to place pattern '{}'", pattern.name))?;

    engine.advance_by(options.generations);

    match settings.output.format {
        OutputFormat::Json => println!("{}", GridFormatter::format_json(&engine)?),
        OutputFormat::Text => {
            if options.coords {
                print!("{}", GridFormatter::format_grid_with_coords(engine.grid()));
            } else {
                print!("{}", GridFormatter::format_grid_compact(engine.grid()));
            }
            println!("{}", GridFormatter::format_status(&engine));
        }
    }

    if let Some(output) = options.output {
        save_grid_to_file(engine.grid(), &output)?;
        eprintln!("{}", ColorOutput::success(&format!("Saved board to {}", output.display())));
    }

    Ok(())
}

fn patterns_command(directory: PathBuf) -> Result<()> {
    let patterns = load_patterns_from_directory(&directory)?;
    if patterns.is_empty() {
        println!(
            "{}",
            ColorOutput::warning(&format!("No patterns found in {}", directory.display()))
        );
        return Ok(());
    }

    println!("{}", ColorOutput::info(&format!("Patterns in {}:", directory.display())));
    for pattern in &patterns {
        println!(
            "  {:<16} {:>3}x{:<3} {} cells",
            pattern.name,
            pattern.width,
            pattern.height,
            pattern.population()
        );
    }
    Ok(())
}

fn setup_command(directory: PathBuf, force: bool) -> Result<()> {
    println!("{}", ColorOutput::info("Setting up project structure..."));

    let config_dir = directory.join("config");
    let pattern_dir = directory.join("patterns");

    for dir in [&config_dir, &pattern_dir] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    // Create default configuration
    let config_path = config_dir.join("default.yaml");
    if !config_path.exists() || force {
        Settings::default()
            .to_file(&config_path)
            .context("Failed to create default configuration")?;
        println!("Created: {}", config_path.display());
    } else {
        println!("Skipped: {} (already exists)", config_path.display());
    }

    create_example_patterns(&pattern_dir).context("Failed to create example patterns")?;
    println!("Created example patterns in: {}", pattern_dir.display());

    // Example configuration variants
    let examples_dir = config_dir.join("examples");
    std::fs::create_dir_all(&examples_dir)?;

    let mut glider = Settings::default();
    glider.board.width = 30;
    glider.board.height = 30;
    glider.input.pattern_file = Some(PathBuf::from("patterns/glider.txt"));
    glider.to_file(&examples_dir.join("glider.yaml"))?;

    let mut high_life = Settings::default();
    high_life.rules = RulePreset::HighLife.rules();
    high_life.speed.initial_index = 2;
    high_life.run.max_generations = 0;
    high_life.input.pattern_file = Some(PathBuf::from("patterns/r_pentomino.txt"));
    high_life.to_file(&examples_dir.join("high_life.yaml"))?;

    println!("Created example configurations in: {}", examples_dir.display());
    println!("\n{}", ColorOutput::success("Setup complete!"));
    println!("\nNext steps:");
    println!("1. Edit configuration files in {}", config_dir.display());
    println!("2. Add your own patterns to {}", pattern_dir.display());
    println!("3. Run: cargo run -- run --config config/examples/glider.yaml");

    Ok(())
}

fn rules_command() {
    println!("{}", ColorOutput::info("Available rule presets:"));
    for preset in RulePreset::all() {
        println!(
            "  {:<12} {:<14} {}",
            preset.name(),
            preset.rules().notation(),
            preset.description()
        );
    }
}
