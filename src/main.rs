use clap::{Parser, Subcommand};
use minimarket_sim::io::catalog::load_catalog;
use minimarket_sim::io::checkpoint::CheckpointStore;
use minimarket_sim::io::reporting::CsvAuditLog;
use minimarket_sim::io::summary;
use minimarket_sim::{logging, Config, Result, RunState, StoreSimulation};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "minimarket-sim")]
#[command(about = "Inventory simulation of a small store under an (s,Q) reorder policy")]
#[command(version)]
struct Args {
    /// Run parameters (TOML)
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Product list (CSV)
    #[arg(long, global = true, default_value = "inventory.csv")]
    catalog: PathBuf,

    /// Checkpoint file used to resume between invocations
    #[arg(long, global = true, default_value = "sim_state.bin")]
    state: PathBuf,

    /// Audit log (CSV, appended)
    #[arg(long, global = true, default_value = "sim_all.csv")]
    log: PathBuf,

    /// Seed for the random source; random when omitted
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Simulate several days
    Run {
        /// Number of days; defaults to the configured run length
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Simulate a single day
    Step,
    /// Show a report over the accumulated totals
    Report {
        #[command(subcommand)]
        kind: ReportKind,
    },
    /// List open purchase orders
    Orders,
    /// Clear the audit log and start over at day 0
    Reset,
}

#[derive(Subcommand, Debug)]
enum ReportKind {
    /// Top products by profit
    Top {
        #[arg(short, long, default_value_t = 5)]
        k: usize,
    },
    /// Service level and stockouts
    Service,
    /// Cumulative totals
    Summary,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    // 1. LOAD CONFIGURATION, CATALOG AND SAVED STATE
    let store = CheckpointStore::new(&args.state);
    let state = match bootstrap(&args, &store) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "cannot start simulation");
            return ExitCode::FAILURE;
        }
    };

    // 2. RANDOM SOURCE AND AUDIT LOG
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let audit_log = match CsvAuditLog::open(&args.log) {
        Ok(log) => Some(log),
        Err(e) => {
            warn!(path = %args.log.display(), error = %e, "audit log unavailable");
            None
        }
    };

    let mut sim = StoreSimulation::new(state, rng, audit_log).with_checkpoint(store);

    // 3. EXECUTE
    match args.command {
        Command::Run { days } => {
            let days = days.unwrap_or(sim.state.config.days_default);
            for _ in 0..days {
                if !step(&mut sim) {
                    break;
                }
            }
        }
        Command::Step => {
            step(&mut sim);
        }
        Command::Report { kind } => match kind {
            ReportKind::Top { k } => print_top_products(&sim.state, k),
            ReportKind::Service => print_service_level(&sim.state),
            ReportKind::Summary => print_summary(&sim.state, &args.log),
        },
        Command::Orders => print_open_orders(&sim.state),
        Command::Reset => match sim.reset() {
            Ok(()) => println!("Reset complete. Day=0."),
            Err(e) => error!(error = %e, "reset incomplete"),
        },
    }

    // 4. SAVE ON EXIT
    sim.shutdown();
    ExitCode::SUCCESS
}

fn bootstrap(args: &Args, store: &CheckpointStore) -> Result<RunState> {
    store.resume_or(|| {
        let config = Config::from_file(&args.config)?;
        let catalog = load_catalog(&args.catalog)?;
        Ok(RunState::new(config, catalog))
    })
}

fn step(sim: &mut StoreSimulation<StdRng, Option<CsvAuditLog>>) -> bool {
    match sim.step() {
        Ok(totals) => {
            println!(
                "Day {}: Revenue={:.0} | COGS={:.0} | Orders={:.0} | Profit={:.0} | Fill rate={:.2}%",
                totals.day,
                totals.revenue,
                totals.cogs,
                totals.orders_cost,
                totals.profit,
                totals.fill_rate() * 100.0
            );
            true
        }
        Err(e) => {
            error!(error = %e, "day aborted");
            false
        }
    }
}

fn print_top_products(state: &RunState, k: usize) {
    println!("\n=== Top products by profit ===");
    println!(
        "{:<3} {:<6} {:<18} {:<6} {:<8} {:<8} {:<8} {:<8}",
        "#", "ID", "Name", "Sold", "Revenue", "COGS", "Orders", "Profit"
    );
    for (rank, row) in summary::top_products_by_profit(&state.catalog, k)
        .iter()
        .enumerate()
    {
        println!(
            "{:<3} {:<6} {:<18} {:<6} {:<8.0} {:<8.0} {:<8.0} {:<8.0}",
            rank + 1,
            row.id,
            row.name,
            row.sold,
            row.revenue,
            row.cogs,
            row.orders_cost,
            row.profit
        );
    }
}

fn print_stockout_leaders(top: &[(String, u64)]) {
    if top.is_empty() {
        println!("Top stockout products: none");
    } else {
        let names: Vec<String> = top
            .iter()
            .map(|(name, units)| format!("{} {}", name, units))
            .collect();
        println!("Top stockout products: {}", names.join(", "));
    }
}

fn print_service_level(state: &RunState) {
    let service = summary::service_level(&state.catalog);
    println!("\n=== Service level & stockouts ===");
    println!("Fill rate: {:.2}%", service.fill_rate * 100.0);
    println!("Stockouts (units): {}", service.stockout_units);
    print_stockout_leaders(&service.top_stockouts);
}

fn print_summary(state: &RunState, log: &std::path::Path) {
    let s = summary::cumulative_summary(state);
    println!("\n=== Summary (cumulative) - Days 1..{} ===", s.day);
    println!("Revenue: {:.0}", s.revenue);
    println!("COGS:    {:.0}", s.cogs);
    println!("Orders:  {:.0}", s.orders_cost);
    println!("PROFIT:  {:.0}\n", s.profit);
    println!("Fill rate: {:.2}%", s.service.fill_rate * 100.0);
    println!("Stockouts (units): {}", s.service.stockout_units);
    print_stockout_leaders(&s.service.top_stockouts);
    println!("\nSaved to: {}", log.display());
}

fn print_open_orders(state: &RunState) {
    println!("\nOpen Purchase Orders (ETAs)\n---------------------------");
    let rows = summary::open_orders(state);
    if rows.is_empty() {
        println!("(none)");
    }
    for row in rows {
        println!(
            "PO#{} | {:<16} | Order quantity: {} | ETA: Day {} | Days left: {}",
            row.po_id, row.product_name, row.qty, row.due_day, row.days_left
        );
    }
}
