mod grdecl;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use faults::api::{Fault, FaultCollection, Grid, RectGrid};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;

#[derive(Parser)]
#[command(name = "faults")]
#[command(about = "Trace, join and extend grid faults read from grdecl FAULTS")]
struct Cmd {
    /// Log at debug level
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args)]
struct GridArgs {
    /// Grid dimensions NX,NY,NZ
    #[arg(long, value_parser = parse_triple::<usize>)]
    grid: (usize, usize, usize),
    /// Cell size DX,DY,DZ
    #[arg(long, value_parser = parse_triple::<f64>, default_value = "1,1,1")]
    cell: (f64, f64, f64),
    /// grdecl file with a FAULTS keyword
    #[arg(long)]
    faults: PathBuf,
}

impl GridArgs {
    fn grid(&self) -> RectGrid {
        RectGrid::new(self.grid, self.cell)
    }
}

#[derive(Subcommand)]
enum Action {
    /// Print the ordered traces of every fault
    Trace {
        #[command(flatten)]
        grid: GridArgs,
        /// Only this layer
        #[arg(long)]
        k: Option<usize>,
        /// Write JSON here (plus a provenance sidecar) instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Lattice path joining the end rays of two faults
    Join {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        a: String,
        #[arg(long)]
        b: String,
        #[arg(long)]
        k: usize,
    },
    /// Straight extension of one fault until it meets another
    Extend {
        #[command(flatten)]
        grid: GridArgs,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        k: usize,
    },
    /// Print version information
    Report,
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    match cmd.action {
        Action::Trace { grid, k, out } => trace(&grid, k, out.as_deref()),
        Action::Join { grid, a, b, k } => join(&grid, &a, &b, k),
        Action::Extend { grid, from, to, k } => extend(&grid, &from, &to, k),
        Action::Report => report(),
    }
}

fn parse_triple<T: FromStr>(s: &str) -> std::result::Result<(T, T, T), String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [a, b, c] = parts.as_slice() else {
        return Err(format!("expected three comma separated values, got {s:?}"));
    };
    let parse = |v: &str| v.parse::<T>().map_err(|_| format!("invalid value {v:?}"));
    Ok((parse(*a)?, parse(*b)?, parse(*c)?))
}

fn load<'g>(args: &GridArgs, grid: &'g dyn Grid) -> Result<FaultCollection<'g>> {
    let entries = grdecl::read_faults(&args.faults)?;
    grdecl::load_collection(grid, &entries)
}

fn lookup<'a, 'g>(faults: &'a FaultCollection<'g>, name: &str) -> Result<&'a Fault<'g>> {
    faults
        .get(name)
        .with_context(|| format!("no fault named {name}"))
}

#[derive(Serialize)]
struct LineOut {
    ij: Vec<(i64, i64)>,
    xy: Vec<[f64; 2]>,
}

#[derive(Serialize)]
struct LayerOut {
    k: usize,
    lines: Vec<LineOut>,
}

#[derive(Serialize)]
struct FaultOut {
    name: String,
    layers: Vec<LayerOut>,
}

fn trace_fault(fault: &Fault<'_>, only_k: Option<usize>) -> FaultOut {
    let layers = fault
        .layers()
        .filter(|layer| only_k.map_or(true, |k| layer.k() == k))
        .map(|layer| LayerOut {
            k: layer.k(),
            lines: layer
                .iter()
                .map(|line| LineOut {
                    ij: line.ij_polyline().to_vec(),
                    xy: line.polyline().iter().map(|p| [p.x, p.y]).collect(),
                })
                .collect(),
        })
        .collect();
    FaultOut {
        name: fault.name().to_string(),
        layers,
    }
}

fn trace(args: &GridArgs, k: Option<usize>, out: Option<&Path>) -> Result<()> {
    let grid = args.grid();
    let faults = load(args, &grid)?;
    tracing::info!(faults = faults.len(), k = ?k, "trace");
    let doc: Vec<FaultOut> = faults.iter().map(|f| trace_fault(f, k)).collect();
    let json = serde_json::to_vec_pretty(&doc)?;
    match out {
        None => println!("{}", String::from_utf8_lossy(&json)),
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            std::fs::write(path, &json)
                .with_context(|| format!("writing {}", path.display()))?;
            let params = serde_json::json!({
                "grid": args.grid,
                "cell": args.cell,
                "faults": args.faults,
                "k": k,
            });
            let payload = provenance::Payload::new("trace", params);
            let sidecar = provenance::write_sidecar(path, payload)?;
            tracing::info!(out = %path.display(), sidecar = %sidecar.display(), "written");
        }
    }
    Ok(())
}

fn join(args: &GridArgs, a: &str, b: &str, k: usize) -> Result<()> {
    let grid = args.grid();
    let faults = load(args, &grid)?;
    let path = Fault::join_faults(lookup(&faults, a)?, lookup(&faults, b)?, k)?;
    tracing::info!(a, b, k, points = path.len(), "join");
    println!("{}", serde_json::to_string_pretty(&path)?);
    Ok(())
}

fn extend(args: &GridArgs, from: &str, to: &str, k: usize) -> Result<()> {
    let grid = args.grid();
    let faults = load(args, &grid)?;
    let ext = lookup(&faults, from)?.extend_to_fault(lookup(&faults, to)?, k)?;
    tracing::info!(from, to, k, intersecting = ext.is_none(), "extend");
    let doc = ext.map(|[p0, p1]| [[p0.x, p0.y], [p1.x, p1.y]]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "faults_version": faults::VERSION,
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
