use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use top_speed::*;

#[derive(Parser, Debug)]
#[command(author, version, about = "Top speed and acceleration curve tool", long_about = None)]
struct Cli {
    /// Config file (defaults to ./tpspd.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the calculated top speed
    Speed(VehicleArgs),
    /// Solve an acceleration run locally and print it as JSON
    Solve(VehicleArgs),
    /// Fetch an acceleration curve from the configured host and chart it
    Curve(CurveArgs),
    /// Serve /accel-sol and /accel-graph
    Serve(ServeArgs),
    /// Read `power <kW>` / `cda <m²>` edits from stdin and keep the chart current
    Form(FormArgs),
}

#[derive(Parser, Debug)]
struct VehicleArgs {
    /// Engine power in kW
    #[arg(long)]
    power_kw: f64,

    /// Drag area (Cd·A) in m²
    #[arg(long)]
    cda_m2: f64,

    /// Vehicle mass in kg (defaults to the configured mass)
    #[arg(long)]
    mass_kg: Option<f64>,
}

#[derive(Parser, Debug)]
struct CurveArgs {
    #[command(flatten)]
    vehicle: VehicleArgs,

    /// Output SVG path
    #[arg(short, long, default_value = "tpspd_plot.svg")]
    output: PathBuf,
}

#[derive(Parser, Debug)]
struct ServeArgs {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8123")]
    bind: SocketAddr,
}

#[derive(Parser, Debug)]
struct FormArgs {
    /// Initial power in kW
    #[arg(long, default_value = "100")]
    power_kw: String,

    /// Initial drag area in m²
    #[arg(long, default_value = "0.5")]
    cda_m2: String,

    /// Output SVG path
    #[arg(short, long, default_value = "tpspd_plot.svg")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let app_config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Command::Speed(args) => handle_speed(args),
        Command::Solve(args) => handle_solve(args, &app_config),
        Command::Curve(args) => handle_curve(args, &app_config).await,
        Command::Serve(args) => handle_serve(args).await,
        Command::Form(args) => handle_form(args, &app_config).await,
    }
}

fn inputs_of(args: &VehicleArgs) -> PerformanceInputs {
    PerformanceInputs::new(args.cda_m2, args.power_kw)
}

fn handle_speed(args: VehicleArgs) -> Result<()> {
    let speed = TopSpeedCalculator::default().try_top_speed_kmh(&inputs_of(&args))?;
    println!("{} km/h", format_speed(speed));
    Ok(())
}

fn handle_solve(args: VehicleArgs, app_config: &AppConfig) -> Result<()> {
    let mass_kg = args.mass_kg.unwrap_or(app_config.mass_kg);
    let curve = solve_accel(&inputs_of(&args), mass_kg)?;
    println!("{}", serde_json::to_string(&curve)?);
    Ok(())
}

async fn handle_curve(args: CurveArgs, app_config: &AppConfig) -> Result<()> {
    let inputs = inputs_of(&args.vehicle);
    let mass_kg = args.vehicle.mass_kg.unwrap_or(app_config.mass_kg);
    let top_speed = TopSpeedCalculator::default().try_top_speed_kmh(&inputs)?;

    let fetcher = AccelerationFetcher::new(app_config.api());
    let curve = fetcher
        .fetch_logged(&inputs, mass_kg)
        .await
        .ok_or_else(|| anyhow!("no acceleration curve received"))?;

    SvgFileChart::new(&args.output).render(&curve, top_speed)?;
    info!(output = %args.output.display(), samples = curve.len(), "chart written");
    println!("{} km/h", format_speed(top_speed));
    Ok(())
}

async fn handle_serve(args: ServeArgs) -> Result<()> {
    remote::server::serve(args.bind).await?;
    Ok(())
}

async fn handle_form(args: FormArgs, app_config: &AppConfig) -> Result<()> {
    let fields = FormFields::new(
        Field::new(args.power_kw),
        Field::new(args.cda_m2),
        Field::default(),
    );
    let chart = Arc::new(SvgFileChart::new(&args.output));
    let binding = InputBinding::new(
        fields,
        AccelerationFetcher::new(app_config.api()),
        chart,
        app_config.mass_kg,
    );

    let mut pending = vec![binding.update()];
    println!("top speed: {} km/h", binding.fields().top_speed.value());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let mut parts = line.split_whitespace();
        let role = match parts.next() {
            Some("power") => FieldRole::Power,
            Some("cda") => FieldRole::DragArea,
            Some("quit") => break,
            Some(other) => {
                warn!(command = other, "expected `power <kW>`, `cda <m²>` or `quit`");
                continue;
            }
            None => continue,
        };
        let value = parts.next().unwrap_or_default();
        pending.retain(|handle| !handle.is_finished());
        pending.push(binding.on_input(role, value));
        println!("top speed: {} km/h", binding.fields().top_speed.value());
    }

    for handle in pending {
        handle.await?;
    }
    Ok(())
}
