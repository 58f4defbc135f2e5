//! Panel engine entry point: CLI wiring, optional simulation, report output.

mod cli;

use std::process;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use panel_sim::config::PanelConfig;
use panel_sim::io::export::{
    export_days_csv, export_history_csv, export_loads_csv, export_report_csv,
};
use panel_sim::metrics::PanelReport;
use panel_sim::panel::billing::{Clock, FixedClock, SystemClock};
use panel_sim::sim::day::DEFAULT_DAILY_SPREAD;
use panel_sim::sim::{DaySimulator, SimCalendar};
use panel_sim::telemetry::init_tracing;

fn main() {
    init_tracing();

    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(opts) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(opts: cli::CliOptions) -> Result<()> {
    // --config takes priority, then --preset, then the household default
    let config = if let Some(ref path) = opts.config {
        PanelConfig::from_toml_file(path)?
    } else if let Some(ref name) = opts.preset {
        PanelConfig::from_preset(name)?
    } else {
        PanelConfig::household()
    };

    let mut clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut state = config.build_state(&*clock)?;
    let essentials: Vec<&str> = state.essential_loads().collect();
    info!(loads = state.loads().len(), ?essentials, "panel initialised");

    if opts.simulate_days > 0 {
        let mut calendar = SimCalendar::new(clock.today(), opts.simulate_days);
        let mut sim = DaySimulator::new(DEFAULT_DAILY_SPREAD, opts.seed);
        let days = sim
            .run(&mut state, &mut calendar)
            .context("day simulation failed")?;
        for day in &days {
            println!("{day}");
        }
        println!();

        // report against the last simulated day, not the wall clock
        clock = Arc::new(FixedClock::new(calendar.now()));

        if let Some(ref path) = opts.days_out {
            export_days_csv(&days, path)
                .with_context(|| format!("failed to write CSV to {}", path.display()))?;
            eprintln!("Simulated days written to {}", path.display());
        }
    }

    let report = PanelReport::at(&state, clock.now());
    println!("{report}");

    if let Some(ref path) = opts.report_out {
        export_report_csv(&report, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Report written to {}", path.display());
    }

    if let Some(ref path) = opts.history_out {
        export_history_csv(&state, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("History written to {}", path.display());
    }

    if let Some(ref path) = opts.loads_out {
        export_loads_csv(&state, path)
            .with_context(|| format!("failed to write CSV to {}", path.display()))?;
        eprintln!("Loads written to {}", path.display());
    }

    if opts.serve {
        serve(state, clock, opts.port)?;
    }

    Ok(())
}

#[cfg(feature = "api")]
fn serve(state: panel_sim::SystemState, clock: Arc<dyn Clock>, port: u16) -> Result<()> {
    use std::net::SocketAddr;

    let app = panel_sim::api::AppState {
        panel: panel_sim::SharedPanel::new(state),
        clock,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(panel_sim::api::serve(app, addr))
        .with_context(|| format!("API server on {addr} failed"))
}

#[cfg(not(feature = "api"))]
fn serve(_state: panel_sim::SystemState, _clock: Arc<dyn Clock>, _port: u16) -> Result<()> {
    anyhow::bail!("--serve requires building with `--features api`")
}
