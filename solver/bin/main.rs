use std::{fs::File, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, info, trace};
use maze_solver::{
    catalogue::Catalogue,
    render::{draw_markers, draw_path, save, PATH_THICKNESS},
    solve,
    util::{load_image, parse_img},
    Point,
};

#[derive(Debug, Parser)]
#[command(name = "maze-solver", version, about = "Find the cheapest path through a maze image")]
struct CLIArgs {
    /// Write log records to this file (at debug level) instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Solve one of the mazes listed in the catalogue, numbered from 1
    Solve {
        example: usize,

        /// Directory holding examples.csv and the maze images
        #[arg(long, default_value = "assets")]
        assets: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Solve any maze image
    Image {
        path: PathBuf,

        /// Entry point as `x,y`
        #[arg(long)]
        entry: Point,

        /// Exit point as `x,y`
        #[arg(long)]
        exit: Point,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Args)]
struct OutputArgs {
    /// Directory the annotated images are written to
    #[arg(long, default_value = "temp")]
    output: PathBuf,

    /// Print the path as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let default_level = if log_file.is_some() { "debug" } else { "info" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

fn solve_image(path: PathBuf, entry: Point, exit: Point, output: OutputArgs) -> Result<()> {
    let img = load_image(&path)?;
    let grid = parse_img(&img, entry, exit)?;
    info!(
        "loaded {} ({}x{}), entry {} exit {}",
        path.display(),
        grid.width(),
        grid.height(),
        entry,
        exit
    );
    trace!("binarized maze:\n{}", grid);

    let mut canvas = img.to_rgb8();
    draw_markers(&mut canvas, entry, exit);
    let initial = save(&canvas, &output.output, "initial_maze.png")?;
    debug!("saved {}", initial.display());

    if !output.json {
        println!("Solving maze by using Dijkstra's search algorithm");
    }

    let started = Instant::now();
    let res = solve(grid).with_context(|| format!("Failed to solve maze {}", path.display()))?;
    info!(
        "solved in {:?}: {} cells, cost {}",
        started.elapsed(),
        res.path.len(),
        res.total_cost
    );

    draw_path(&mut canvas, &res.path, PATH_THICKNESS);
    let solved = save(&canvas, &output.output, "solved_maze.png")?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&res)?);
    } else {
        println!(
            "Found a path of {} cells with cost {:.1}, saved to {}",
            res.path.len(),
            res.total_cost,
            solved.display()
        );
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    init_logging(args.log_file.as_ref())?;

    match args.command {
        Command::Solve {
            example,
            assets,
            output,
        } => {
            if !output.json {
                println!("Running Maze Solver version {}", env!("CARGO_PKG_VERSION"));
            }
            let catalogue = Catalogue::load(&assets)?;
            debug!("catalogue has {} mazes", catalogue.len());

            let maze = catalogue.get(example)?;
            solve_image(catalogue.image_path(maze), maze.entry, maze.exit, output)
        }
        Command::Image {
            path,
            entry,
            exit,
            output,
        } => {
            if !output.json {
                println!("Running Maze Solver version {}", env!("CARGO_PKG_VERSION"));
            }
            solve_image(path, entry, exit, output)
        }
    }
}
