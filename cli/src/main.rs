use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use wire_common::db::core::CircuitDB;
use wire_common::db::indices::WireId;
use wire_common::db::layout::LayoutFile;
use wire_common::geom::coord::GridCoord;
use wire_common::util::config::Config;
use wire_common::util::profiler::ScopedTimer;
use wire_common::util::visualization::{self, RouteLayer};
use wire_common::util::{check, generator, logger};
use wire_router::algo::Algorithm;
use wire_router::grid::{DenseGrid, SharedGrid};
use wire_router::orchestrator::{Orchestrator, RouteMode, RouteResponse};
use wire_router::reroute;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Route every wire with one algorithm.
    Route {
        #[arg(short, long)]
        algorithm: Option<String>,
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    /// Route every wire with all three algorithms and compare them.
    Compare {
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    /// Route, move one component, then reroute the wires it disturbs.
    Move {
        #[arg(long)]
        component: String,
        #[arg(long)]
        x: u32,
        #[arg(long)]
        y: u32,
        #[arg(short, long)]
        algorithm: Option<String>,
        #[arg(long, value_name = "FILE")]
        layout: Option<PathBuf>,
        #[arg(long, value_name = "FILE")]
        image: Option<PathBuf>,
    },
    Generate {
        #[arg(long, default_value_t = 40)]
        width: u32,
        #[arg(long, default_value_t = 24)]
        height: u32,
        #[arg(long, default_value_t = 8)]
        components: usize,
        #[arg(long, default_value_t = 6)]
        wires: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "inputs/random.toml")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    let config: Config = if args.config.exists() {
        log::info!("Loading configuration from {:?}", args.config);
        let config_str = std::fs::read_to_string(&args.config)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?
    } else {
        log::warn!(
            "Configuration file {:?} not found. Using internal defaults.",
            args.config
        );
        Config::default()
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;

    let command = args.command.unwrap_or(Commands::Route {
        algorithm: None,
        layout: None,
        image: None,
    });

    match command {
        Commands::Generate {
            width,
            height,
            components,
            wires,
            seed,
            output,
        } => {
            prepare_output_dir(&output)?;
            log::info!(
                "Generating random layout ({}x{}, Components: {}, Wires: {})...",
                width,
                height,
                components,
                wires
            );
            let layout = generator::generate_random_layout(width, height, components, wires, seed);
            let text = toml::to_string(&layout)
                .map_err(|e| anyhow::anyhow!("Failed to serialize layout: {}", e))?;
            std::fs::write(&output, text)?;
            log::info!("Generated: {:?}", output);
        }
        Commands::Route {
            algorithm,
            layout,
            image,
        } => {
            let algorithm = select_algorithm(algorithm.as_deref(), &config)?;
            let mut db = load_layout(layout.as_deref(), &config)?;
            let responses = run_routing(&mut db, &config, RouteMode::Single(algorithm))?;
            report_single(&responses);
            save_image(&db, &[single_layer(&db, algorithm)], image.as_deref(), &config)?;
        }
        Commands::Compare { layout, image } => {
            let mut db = load_layout(layout.as_deref(), &config)?;
            let responses = run_routing(&mut db, &config, RouteMode::CompareAll)?;
            report_comparison(&responses);
            let layers = comparison_layers(&responses);
            save_image(&db, &layers, image.as_deref(), &config)?;
        }
        Commands::Move {
            component,
            x,
            y,
            algorithm,
            layout,
            image,
        } => {
            let algorithm = select_algorithm(algorithm.as_deref(), &config)?;
            let mode = RouteMode::Single(algorithm);
            let mut db = load_layout(layout.as_deref(), &config)?;
            let id = *db
                .component_name_map
                .get(&component)
                .ok_or_else(|| anyhow::anyhow!("Unknown component '{}'", component))?;

            let grid = SharedGrid::new(DenseGrid::from_circuit(&db));
            let orch = Orchestrator::from_config(&config.routing);
            let all: Vec<WireId> = WireId::range(db.num_wires()).collect();
            reroute::route_wires(&mut db, &grid, &orch, &all, mode);

            log::info!("Moving '{}' to ({}, {})...", component, x, y);
            let rerouted = {
                let _t = ScopedTimer::new("Reroute");
                reroute::move_and_reroute(&mut db, &grid, &orch, id, GridCoord::new(x, y), mode)
                    .map_err(|e| anyhow::anyhow!("Cannot move '{}': {}", component, e))?
            };
            log::info!("Rerouted {} wire(s)", rerouted.len());
            report_single(&rerouted);

            if let Err(e) = check::run(&db) {
                return Err(anyhow::anyhow!(e));
            }
            save_image(&db, &[single_layer(&db, algorithm)], image.as_deref(), &config)?;
        }
    }

    Ok(())
}

fn select_algorithm(arg: Option<&str>, config: &Config) -> anyhow::Result<Algorithm> {
    let name = arg.unwrap_or(config.routing.algorithm.as_str());
    name.parse::<Algorithm>().map_err(|e| anyhow::anyhow!(e))
}

fn prepare_output_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.exists()
        && !parent.as_os_str().is_empty()
    {
        log::info!("Creating output directory: {:?}", parent);
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn load_layout(arg: Option<&Path>, config: &Config) -> anyhow::Result<CircuitDB> {
    let path = arg.unwrap_or(Path::new(&config.input.layout_file));
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Layout file missing: {:?}. Did you run 'generate'?",
            path
        ));
    }

    log::info!("Parsing layout: {:?}", path);
    let text = std::fs::read_to_string(path)?;
    let layout: LayoutFile = toml::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Invalid layout TOML in {:?}: {}", path, e))?;
    let db = layout
        .build()
        .map_err(|e| anyhow::anyhow!("Invalid layout in {:?}: {}", path, e))?;

    if let Err(e) = check::run_layout_check(&db) {
        return Err(anyhow::anyhow!(e));
    }
    Ok(db)
}

fn run_routing(
    db: &mut CircuitDB,
    config: &Config,
    mode: RouteMode,
) -> anyhow::Result<Vec<(WireId, RouteResponse)>> {
    let responses = {
        let _t = ScopedTimer::new("Routing");
        wire_router::route(db, &config.routing, mode)
    };

    log::info!("Verifying routes...");
    if let Err(e) = check::run(db) {
        return Err(anyhow::anyhow!(e));
    }
    Ok(responses)
}

fn report_single(responses: &[(WireId, RouteResponse)]) {
    let mut routed = 0;
    let mut total_cost = 0u64;
    let mut total_expanded = 0u64;
    for (_, response) in responses {
        for result in &response.results {
            total_expanded += result.metrics.nodes_expanded;
            match (&result.outcome, result.metrics.cost) {
                (Ok(_), Some(cost)) => {
                    routed += 1;
                    total_cost += cost;
                }
                (Err(e), _) => log::warn!("{}: {}", result.metrics.algorithm, e),
                _ => {}
            }
        }
    }
    log::info!(
        "Routed {}/{} wires. Total cost: {}, nodes expanded: {}",
        routed,
        responses.len(),
        total_cost,
        total_expanded
    );
}

#[derive(Default)]
struct AlgorithmTotals {
    routed: usize,
    cost: u64,
    nodes_expanded: u64,
    iterations: u64,
    runtime: Duration,
}

fn report_comparison(responses: &[(WireId, RouteResponse)]) {
    let mut totals: Vec<(Algorithm, AlgorithmTotals)> = Algorithm::ALL
        .iter()
        .map(|&a| (a, AlgorithmTotals::default()))
        .collect();
    let mut disagreements = 0;

    for (_, response) in responses {
        for (algorithm, t) in totals.iter_mut() {
            let Some(result) = response.result(*algorithm) else {
                continue;
            };
            t.nodes_expanded += result.metrics.nodes_expanded;
            t.iterations += result.metrics.iterations;
            t.runtime += result.metrics.runtime;
            if let Some(cost) = result.metrics.cost {
                t.routed += 1;
                t.cost += cost;
            }
        }
        if response.comparison.is_some_and(|c| !c.costs_agree) {
            disagreements += 1;
        }
    }

    log::info!(
        "{:<10} {:>7} {:>10} {:>12} {:>10} {:>12}",
        "Algorithm",
        "Routed",
        "Cost",
        "Expanded",
        "Iter",
        "Runtime"
    );
    for (algorithm, t) in &totals {
        log::info!(
            "{:<10} {:>7} {:>10} {:>12} {:>10} {:>12.2?}",
            algorithm.name(),
            t.routed,
            t.cost,
            t.nodes_expanded,
            t.iterations,
            t.runtime
        );
    }
    if disagreements > 0 {
        log::warn!("{} wire(s) routed at different costs", disagreements);
    }
}

fn single_layer(db: &CircuitDB, algorithm: Algorithm) -> RouteLayer<'_> {
    RouteLayer {
        label: algorithm.name(),
        color: visualization::layer_color(0),
        paths: db
            .wires
            .iter()
            .filter(|w| !w.route.is_empty())
            .map(|w| w.route.as_slice())
            .collect(),
    }
}

fn comparison_layers(responses: &[(WireId, RouteResponse)]) -> Vec<RouteLayer<'_>> {
    Algorithm::ALL
        .iter()
        .enumerate()
        .map(|(i, &algorithm)| RouteLayer {
            label: algorithm.name(),
            color: visualization::layer_color(i),
            paths: responses
                .iter()
                .filter_map(|(_, r)| r.result(algorithm).and_then(|r| r.path()))
                .map(|p| p.coords())
                .collect(),
        })
        .collect()
}

fn save_image(
    db: &CircuitDB,
    layers: &[RouteLayer<'_>],
    arg: Option<&Path>,
    config: &Config,
) -> anyhow::Result<()> {
    let path = match arg {
        Some(p) => p.to_path_buf(),
        None => match &config.output.image_file {
            Some(p) => PathBuf::from(p),
            None => return Ok(()),
        },
    };
    prepare_output_dir(&path)?;
    log::info!("Generating route visualization: {:?}", path);
    visualization::draw_routes(db, layers, &path, config.output.image_scale)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))
}
