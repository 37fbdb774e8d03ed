//! rollcall-runner: headless redistribution runner.
//!
//! Usage:
//!   rollcall-runner --input roster.json --config data/redistribution.json
//!   rollcall-runner --input roster.json --date 2026-10-16 --json
//!   rollcall-runner --ipc-mode
//!
//! Exit codes: 2 when required columns are missing, 3 when the run broke
//! a conservation or cap invariant.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rollcall_core::{
    report::RedistributionReport, RawRow, RedistributionConfig, RollCallEngine, RosterError,
};
use std::env;
use std::io::{self, BufRead, Read, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Run {
        rows: Vec<RawRow>,
        #[serde(default)]
        config: Option<RedistributionConfig>,
        #[serde(default)]
        date: Option<NaiveDate>,
    },
    Quit,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_out = args.iter().any(|a| a == "--json");
    let input = flag_value(&args, "--input").unwrap_or("-");
    let config_path = flag_value(&args, "--config");
    let date = flag_value(&args, "--date")
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
        .transpose()
        .context("--date must be YYYY-MM-DD")?;

    let config = match config_path {
        Some(path) => RedistributionConfig::load(path)?,
        None => RedistributionConfig::default(),
    };

    if ipc_mode {
        return run_ipc_loop(&config);
    }

    let rows = read_rows(input)?;
    let mut engine = RollCallEngine::new(config);
    if let Some(date) = date {
        engine = engine.with_date(date);
    }

    let report = match engine.run(&rows) {
        Ok(report) => report,
        Err(RosterError::Schema(e)) => {
            eprintln!("Cannot redistribute: {e}");
            for field in &e.missing {
                eprintln!("  missing column for: {field}");
            }
            std::process::exit(2);
        }
        Err(e) if e.is_invariant_violation() => {
            eprintln!("Redistribution rejected, report withheld: {e}");
            std::process::exit(3);
        }
        Err(e) => return Err(e.into()),
    };

    if json_out {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, input);
    }
    Ok(())
}

fn read_rows(input: &str) -> Result<Vec<RawRow>> {
    let content = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Cannot read {input}"))?
    };
    serde_json::from_str(&content).with_context(|| format!("{input} is not a JSON array of rows"))
}

/// One request per line, one response per line. Every request gets its
/// own engine, so nothing carries over between runs.
fn run_ipc_loop(default_config: &RedistributionConfig) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Run { rows, config, date } => {
                let mut engine =
                    RollCallEngine::new(config.unwrap_or_else(|| default_config.clone()));
                if let Some(date) = date {
                    engine = engine.with_date(date);
                }
                let response = match engine.run(&rows) {
                    Ok(report) => serde_json::to_value(&report)?,
                    Err(RosterError::Schema(e)) => serde_json::json!({
                        "error": e.to_string(),
                        "missing": e.missing,
                    }),
                    Err(e) => {
                        log::error!("ipc run failed: {e}");
                        serde_json::json!({
                            "error": e.to_string(),
                            "invariant_violation": e.is_invariant_violation(),
                        })
                    }
                };
                writeln!(stdout, "{}", response)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(report: &RedistributionReport, input: &str) {
    let s = &report.summary;
    println!("=== ROLL CALL ===");
    println!("  input:          {input}");
    if let Some(date) = report.roll_call_date {
        println!("  date:           {date}");
    }
    println!("  cap:            {}", report.cap);
    println!("  staff:          {}", s.records);
    println!("  present:        {}", s.present);
    println!("  absent:         {}", s.absent);
    println!("  helpers:        {}", s.helpers);
    println!("  secondary pool: {}", s.secondary_pool);
    println!("  restricted:     {}", s.restricted);
    println!("  away this week: {}", s.extended_absence);

    println!();
    println!("=== TIERS ===");
    for t in &report.tier_totals {
        if t.queued > 0 {
            println!(
                "  {:<12} queued {:>3} | assigned {:>3} | unassigned {:>3}",
                t.tier.to_string(),
                t.queued,
                t.assigned,
                t.unassigned
            );
        }
    }

    println!();
    println!("=== ASSIGNMENTS ===");
    if report.assignments.is_empty() {
        println!("  (none)");
    }
    for a in &report.assignments {
        println!(
            "  {:>2} x {:<12} {} -> {} ({:?})",
            a.count,
            a.tier.to_string(),
            a.from,
            a.to,
            a.rationale
        );
    }

    println!();
    println!("=== UNASSIGNED ===");
    if report.unassigned.is_empty() {
        println!("  (none)");
    }
    for u in &report.unassigned {
        println!("  {:>2} x {:<12} from {}", u.count, u.tier.to_string(), u.owner);
    }

    println!();
    println!("=== LOADS ===");
    for l in &report.loads {
        println!(
            "  {:<16} {:>2} + {:>2} = {:>2} (open {:>2}, {:?})",
            l.name,
            l.pre_existing,
            l.assigned,
            l.final_load(),
            l.remaining,
            l.pool
        );
    }

    if !report.warnings.is_empty() {
        println!();
        println!("=== WARNINGS ===");
        for w in &report.warnings {
            println!("  {w}");
        }
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
