use cf_core::units::PhysicalConstants;
use cf_sim::{
    DEFAULT_MAX_TIME_S, DEFAULT_TARGET_FRACTION, HeadFluxMode, HeadspaceMode, ModelOptions,
    SimOptions, SimOutcome, SimRecord, SimResult, SweepOutcome, SweepPoints, SweepSpacing, Tank,
    TankSpec, run_for_duration, run_to_solubility,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cf-cli")]
#[command(about = "CarbFlow CLI - Tank carbonation simulation tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a tank spec file and report the derived state
    Validate {
        /// Path to the tank spec YAML file
        spec_path: PathBuf,
        /// Track the headspace holdup dynamically
        #[arg(long)]
        dynamic_headspace: bool,
        /// Enable Fickian headspace-to-liquid diffusion
        #[arg(long)]
        fickian_head_flux: bool,
    },
    /// Write the reference cellar-tank spec as YAML
    Reference {
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run a simulation
    #[command(subcommand)]
    Run(RunCommands),
    /// Run a parameter sweep
    #[command(subcommand)]
    Sweep(SweepCommands),
}

#[derive(Subcommand)]
enum RunCommands {
    /// March a fixed span of simulated time
    Duration {
        /// Path to the tank spec YAML file
        spec_path: PathBuf,
        /// Simulated time to march, in seconds
        #[arg(long)]
        total_time: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// Interval between recorded snapshots, in seconds
        #[arg(long, default_value_t = 10.0)]
        eval_time: f64,
        /// Track the headspace holdup dynamically
        #[arg(long)]
        dynamic_headspace: bool,
        /// Enable Fickian headspace-to-liquid diffusion
        #[arg(long)]
        fickian_head_flux: bool,
        /// Output CSV file path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// March until the liquid reaches a saturation target
    Solubility {
        /// Path to the tank spec YAML file
        spec_path: PathBuf,
        /// Saturation fraction to reach
        #[arg(long, default_value_t = DEFAULT_TARGET_FRACTION)]
        target: f64,
        /// Give up after this much simulated time, in seconds
        #[arg(long, default_value_t = DEFAULT_MAX_TIME_S)]
        max_time: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// Interval between recorded snapshots, in seconds
        #[arg(long, default_value_t = 10.0)]
        eval_time: f64,
        /// Track the headspace holdup dynamically
        #[arg(long)]
        dynamic_headspace: bool,
        /// Enable Fickian headspace-to-liquid diffusion
        #[arg(long)]
        fickian_head_flux: bool,
        /// Output CSV file path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum SweepCommands {
    /// Sweep the integration step and record time-to-target per step
    Dt {
        /// Path to the tank spec YAML file
        spec_path: PathBuf,
        /// Smallest time step, in seconds
        #[arg(long)]
        start: f64,
        /// Largest time step, in seconds
        #[arg(long)]
        end: f64,
        /// Number of sweep points
        #[arg(long, default_value_t = 10)]
        points: usize,
        /// Space the points logarithmically
        #[arg(long)]
        log: bool,
        /// Saturation fraction to reach
        #[arg(long, default_value_t = DEFAULT_TARGET_FRACTION)]
        target: f64,
        /// Give up after this much simulated time, in seconds
        #[arg(long, default_value_t = DEFAULT_MAX_TIME_S)]
        max_time: f64,
        /// Output CSV file path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sweep the sparge bubble diameter and record final saturation
    Diameter {
        /// Path to the tank spec YAML file
        spec_path: PathBuf,
        /// Smallest bubble diameter, in meters
        #[arg(long)]
        start: f64,
        /// Largest bubble diameter, in meters
        #[arg(long)]
        end: f64,
        /// Number of sweep points
        #[arg(long, default_value_t = 10)]
        points: usize,
        /// Space the points logarithmically
        #[arg(long)]
        log: bool,
        /// Simulated time to march per point, in seconds
        #[arg(long)]
        total_time: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// Output CSV file path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sweep the operating temperature and record time-to-target
    Temperature {
        /// Path to the tank spec YAML file
        spec_path: PathBuf,
        /// Lowest temperature, in kelvin
        #[arg(long)]
        start: f64,
        /// Highest temperature, in kelvin
        #[arg(long)]
        end: f64,
        /// Number of sweep points
        #[arg(long, default_value_t = 10)]
        points: usize,
        /// Saturation fraction to reach
        #[arg(long, default_value_t = DEFAULT_TARGET_FRACTION)]
        target: f64,
        /// Give up after this much simulated time, in seconds
        #[arg(long, default_value_t = DEFAULT_MAX_TIME_S)]
        max_time: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 0.01)]
        dt: f64,
        /// Output CSV file path (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> SimResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            spec_path,
            dynamic_headspace,
            fickian_head_flux,
        } => cmd_validate(
            &spec_path,
            model_options(dynamic_headspace, fickian_head_flux),
        ),
        Commands::Reference { output } => cmd_reference(output.as_deref()),
        Commands::Run(run_cmd) => match run_cmd {
            RunCommands::Duration {
                spec_path,
                total_time,
                dt,
                eval_time,
                dynamic_headspace,
                fickian_head_flux,
                output,
            } => cmd_run_duration(
                &spec_path,
                total_time,
                SimOptions {
                    dt_s: dt,
                    eval_time_s: eval_time,
                },
                model_options(dynamic_headspace, fickian_head_flux),
                output.as_deref(),
            ),
            RunCommands::Solubility {
                spec_path,
                target,
                max_time,
                dt,
                eval_time,
                dynamic_headspace,
                fickian_head_flux,
                output,
            } => cmd_run_solubility(
                &spec_path,
                target,
                max_time,
                SimOptions {
                    dt_s: dt,
                    eval_time_s: eval_time,
                },
                model_options(dynamic_headspace, fickian_head_flux),
                output.as_deref(),
            ),
        },
        Commands::Sweep(sweep_cmd) => cmd_sweep(sweep_cmd),
    }
}

fn model_options(dynamic_headspace: bool, fickian_head_flux: bool) -> ModelOptions {
    ModelOptions {
        headspace: if dynamic_headspace {
            HeadspaceMode::Dynamic
        } else {
            HeadspaceMode::Frozen
        },
        head_flux: if fickian_head_flux {
            HeadFluxMode::Fickian
        } else {
            HeadFluxMode::Disabled
        },
    }
}

fn load_tank(spec_path: &Path, options: ModelOptions) -> SimResult<Tank> {
    let spec = TankSpec::load_yaml(spec_path)?;
    Tank::new(&spec, options, PhysicalConstants::default())
}

fn cmd_validate(spec_path: &Path, options: ModelOptions) -> SimResult<()> {
    println!("Validating spec: {}", spec_path.display());
    let tank = load_tank(spec_path, options)?;
    println!("✓ Spec is valid");
    println!("  Liquid height:    {:.4} m", tank.liquid_height_m);
    println!("  Headspace volume: {:.6} m3", tank.head_volume_m3);
    println!("  Headspace holdup: {:.4} mol", tank.gas_holdup_mol);
    println!("  Solubility limit: {:.2} mol/m3", tank.solubility_mol_m3);
    println!("  Sparge feed:      {:.6} mol/s", tank.bubbler_flow_mol_s);
    println!("  Bubble residence: {:.3} s", tank.residence_time_s);
    Ok(())
}

fn cmd_reference(output: Option<&Path>) -> SimResult<()> {
    let yaml = TankSpec::reference().to_yaml()?;
    if let Some(path) = output {
        std::fs::write(path, yaml)?;
        println!("✓ Wrote reference spec to {}", path.display());
    } else {
        print!("{}", yaml);
    }
    Ok(())
}

fn cmd_run_duration(
    spec_path: &Path,
    total_time: f64,
    opts: SimOptions,
    options: ModelOptions,
    output: Option<&Path>,
) -> SimResult<()> {
    println!("Running fixed-duration carbonation");
    println!(
        "  dt = {:.4} s, total time = {:.1} s",
        opts.dt_s, total_time
    );

    let mut tank = load_tank(spec_path, options)?;
    let record = run_for_duration(&mut tank, total_time, &opts)?;

    println!("✓ Simulation completed");
    print_record(&record, &tank);
    export_record(&record, output)
}

fn cmd_run_solubility(
    spec_path: &Path,
    target: f64,
    max_time: f64,
    opts: SimOptions,
    options: ModelOptions,
    output: Option<&Path>,
) -> SimResult<()> {
    println!("Running carbonation to {:.1}% of solubility", target * 100.0);
    println!("  dt = {:.4} s, cap = {:.0} s", opts.dt_s, max_time);

    let mut tank = load_tank(spec_path, options)?;
    let record = run_to_solubility(&mut tank, target, max_time, &opts)?;

    match record.outcome {
        SimOutcome::Converged { time_s } => {
            println!("✓ Target reached at {:.3} s", time_s);
        }
        SimOutcome::MaxTimeExceeded { max_time_s } => {
            println!("✗ Target not reached within {:.0} s", max_time_s);
        }
        SimOutcome::Completed => {}
    }
    print_record(&record, &tank);
    export_record(&record, output)
}

fn print_record(record: &SimRecord, tank: &Tank) {
    println!(
        "\n{:>12}  {:>20}  {:>22}  {:>14}",
        "time (s)", "dissolved gas (mol)", "concentration (mol/m3)", "% solubility"
    );
    for snap in &record.snapshots {
        println!(
            "{:>12.3}  {:>20.6}  {:>22.4}  {:>14.2}",
            snap.time_s,
            snap.dissolved_gas_mol,
            snap.concentration_mol_m3,
            snap.percent_solubility * 100.0
        );
    }

    let last = record.last();
    println!("\n  Snapshots:        {}", record.snapshots.len());
    println!("  Final time:       {:.3} s", last.time_s);
    println!(
        "  Saturation:       {:.2}%",
        last.percent_solubility * 100.0
    );
    println!("  Head pressure:    {:.4} bar", tank.head_pressure_bar);
}

fn export_record(record: &SimRecord, output: Option<&Path>) -> SimResult<()> {
    let Some(path) = output else {
        return Ok(());
    };

    let mut csv =
        String::from("time_s,dissolved_gas_mol,concentration_mol_m3,percent_solubility\n");
    for snap in &record.snapshots {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            snap.time_s, snap.dissolved_gas_mol, snap.concentration_mol_m3, snap.percent_solubility
        ));
    }
    std::fs::write(path, csv)?;
    println!(
        "✓ Exported {} snapshots to {}",
        record.snapshots.len(),
        path.display()
    );
    Ok(())
}

fn cmd_sweep(cmd: SweepCommands) -> SimResult<()> {
    let (what, outcome, output) = match cmd {
        SweepCommands::Dt {
            spec_path,
            start,
            end,
            points,
            log,
            target,
            max_time,
            output,
        } => {
            println!("Sweeping time step over [{start}, {end}] s ({points} points)");
            let spec = TankSpec::load_yaml(&spec_path)?;
            let sweep = sweep_points(start, end, points, log);
            let outcome = cf_sim::time_step_sensitivity(
                &spec,
                ModelOptions::default(),
                &sweep,
                target,
                max_time,
                max_time,
            )?;
            ("dt_s,time_to_target_s", outcome, output)
        }
        SweepCommands::Diameter {
            spec_path,
            start,
            end,
            points,
            log,
            total_time,
            dt,
            output,
        } => {
            println!("Sweeping bubble diameter over [{start}, {end}] m ({points} points)");
            let spec = TankSpec::load_yaml(&spec_path)?;
            let sweep = sweep_points(start, end, points, log);
            let opts = SimOptions {
                dt_s: dt,
                eval_time_s: total_time,
            };
            let outcome = cf_sim::bubble_diameter_sensitivity(
                &spec,
                ModelOptions::default(),
                &sweep,
                total_time,
                &opts,
            )?;
            ("bubble_diameter_m,percent_solubility", outcome, output)
        }
        SweepCommands::Temperature {
            spec_path,
            start,
            end,
            points,
            target,
            max_time,
            dt,
            output,
        } => {
            println!("Sweeping temperature over [{start}, {end}] K ({points} points)");
            let spec = TankSpec::load_yaml(&spec_path)?;
            let sweep = sweep_points(start, end, points, false);
            let opts = SimOptions {
                dt_s: dt,
                eval_time_s: max_time,
            };
            let outcome = cf_sim::temperature_sensitivity(
                &spec,
                ModelOptions::default(),
                &sweep,
                target,
                max_time,
                &opts,
            )?;
            ("temperature_k,time_to_target_s", outcome, output)
        }
    };

    print_sweep(&outcome);
    export_sweep(what, &outcome, output.as_deref())
}

fn sweep_points(start: f64, end: f64, num_points: usize, log: bool) -> SweepPoints {
    SweepPoints {
        start,
        end,
        num_points,
        spacing: if log {
            SweepSpacing::Logarithmic
        } else {
            SweepSpacing::Linear
        },
    }
}

fn print_sweep(outcome: &SweepOutcome) {
    println!(
        "✓ Sweep completed: {} successful, {} failed",
        outcome.num_successful, outcome.num_failed
    );
    for (point, sample) in outcome.points.iter().zip(&outcome.samples) {
        match sample {
            Some(value) => println!("  {:>14.6e}  {:>14.6}", point, value),
            None => println!("  {:>14.6e}  (failed)", point),
        }
    }
}

fn export_sweep(header: &str, outcome: &SweepOutcome, output: Option<&Path>) -> SimResult<()> {
    let Some(path) = output else {
        return Ok(());
    };

    let mut csv = format!("{header}\n");
    for (point, sample) in outcome.points.iter().zip(&outcome.samples) {
        match sample {
            Some(value) => csv.push_str(&format!("{point},{value}\n")),
            None => csv.push_str(&format!("{point},\n")),
        }
    }
    std::fs::write(path, csv)?;
    println!(
        "✓ Exported {} points to {}",
        outcome.points.len(),
        path.display()
    );
    Ok(())
}
