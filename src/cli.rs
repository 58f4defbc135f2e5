use std::env;
use std::path::PathBuf;

pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub preset: Option<String>,
    pub simulate_days: usize,
    pub seed: u64,
    pub history_out: Option<PathBuf>,
    pub report_out: Option<PathBuf>,
    pub loads_out: Option<PathBuf>,
    pub days_out: Option<PathBuf>,
    pub serve: bool,
    pub port: u16,
}

impl Default for CliOptions {
    fn default() -> Self {
        Self {
            config: None,
            preset: None,
            simulate_days: 0,
            seed: 42,
            history_out: None,
            report_out: None,
            loads_out: None,
            days_out: None,
            serve: false,
            port: 3000,
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions::default();
    let mut seen_days = false;
    let mut seen_seed = false;
    let mut seen_port = false;

    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --config (expected a TOML file path)",
                )?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.next_or_err(
                    i,
                    "missing value for --preset (expected a preset name)",
                )?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--simulate-days" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --simulate-days")?;
                reject_repeat(&mut seen_days, "--simulate-days")?;
                opts.simulate_days = raw.parse().map_err(|_| {
                    format!("--simulate-days value \"{raw}\" is not a valid count")
                })?;
            }
            "--seed" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --seed")?;
                reject_repeat(&mut seen_seed, "--seed")?;
                opts.seed = raw
                    .parse()
                    .map_err(|_| format!("--seed value \"{raw}\" is not a valid u64"))?;
            }
            "--history-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --history-out (expected a file path)",
                )?;
                if opts.history_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--history-out provided more than once".to_string());
                }
            }
            "--report-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --report-out (expected a file path)",
                )?;
                if opts.report_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--report-out provided more than once".to_string());
                }
            }
            "--loads-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --loads-out (expected a file path)",
                )?;
                if opts.loads_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--loads-out provided more than once".to_string());
                }
            }
            "--days-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --days-out (expected a file path)",
                )?;
                if opts.days_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--days-out provided more than once".to_string());
                }
            }
            "--serve" => {
                opts.serve = true;
            }
            "--port" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --port")?;
                reject_repeat(&mut seen_port, "--port")?;
                opts.port = raw
                    .parse()
                    .map_err(|_| format!("--port value \"{raw}\" is not a valid u16"))?;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.days_out.is_some() && opts.simulate_days == 0 {
        return Err("--days-out requires --simulate-days greater than 0".to_string());
    }

    if opts.config.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--config` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

fn reject_repeat(seen: &mut bool, flag: &str) -> Result<(), String> {
    if std::mem::replace(seen, true) {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("panel-sim - household electrical panel state and billing engine");
    eprintln!();
    eprintln!("Usage: panel-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load panel from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (household, studio, all_electric)");
    eprintln!("  --simulate-days <n>      Advance the panel n days before reporting");
    eprintln!("  --seed <u64>             Seed for the day simulator (default: 42)");
    eprintln!("  --history-out <path>     Export consumption history to CSV");
    eprintln!("  --report-out <path>      Export the metrics report to CSV");
    eprintln!("  --loads-out <path>       Export the load table to CSV");
    eprintln!("  --days-out <path>        Export simulated days to CSV");
    eprintln!("  --serve                  Start REST API server (requires the `api` feature)");
    eprintln!("  --port <u16>             API server port (default: 3000)");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If neither --config nor --preset is given, the household preset is used.");
}
