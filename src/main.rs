use clap::{Parser, Subcommand};
use log::info;
use markbench::{
    aggregate::Timeframe,
    commands::{derive, load, mark, rules},
    context::AppContext,
    models::{Direction, PriceField, StopLossSource, Theme},
};
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "historical";
const DEFAULT_STATE_DIR: &str = ".markbench";

#[derive(Parser)]
#[command(name = "markbench")]
#[command(about = "A manual backtesting workbench for candlestick data")]
struct Cli {
    /// Directory holding the historical OHLCV CSV files
    #[arg(long, value_name = "DIR", default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,
    /// Directory where marks and rule configs are persisted
    #[arg(long, value_name = "DIR", default_value = DEFAULT_STATE_DIR)]
    state_dir: PathBuf,
    /// Resolution of the source CSV data
    #[arg(long, value_enum, default_value_t = Timeframe::M5)]
    base_timeframe: Timeframe,
    /// Timeframe to aggregate the chart series to
    #[arg(long, value_enum, default_value_t = Timeframe::M5)]
    timeframe: Timeframe,
    /// Color theme used for marker rendering metadata
    #[arg(long, value_enum, default_value_t = Theme::Dark)]
    theme: Theme,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the CSV data directory
    Load,
    /// Run the full pipeline and print markers and derived trades
    Derive,
    /// Manage entry marks
    Mark {
        #[command(subcommand)]
        command: MarkCommands,
    },
    /// Inspect or edit the per-direction trade parameter rules
    Rules {
        #[command(subcommand)]
        command: RulesCommands,
    },
}

#[derive(Subcommand)]
enum MarkCommands {
    /// Add a mark at an epoch-second timestamp
    Add {
        /// Candle timestamp in epoch seconds
        time: i64,
        /// Trade direction for the mark
        #[arg(long, value_enum)]
        direction: Direction,
    },
    /// Remove the mark at a position in the sorted list
    Remove {
        /// Zero-based index as printed by `mark list`
        index: usize,
    },
    /// List the stored marks
    List,
}

#[derive(Subcommand)]
enum RulesCommands {
    /// Print the current long and short rule configs
    Show,
    /// Update fields of one direction's rule config
    Set {
        /// Direction whose rules to edit
        #[arg(long, value_enum)]
        direction: Direction,
        /// Candle field the entry price is taken from
        #[arg(long, value_enum)]
        entry: Option<PriceField>,
        /// Stop-loss source (atr offset or a raw candle field)
        #[arg(long, value_enum)]
        stop: Option<StopLossSource>,
        /// ATR multiple used when the stop-loss source is atr
        #[arg(long)]
        atr_multiple: Option<f64>,
        /// Risk multiple between entry and take-profit
        #[arg(long)]
        take_profit_multiple: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let app_context = AppContext {
        data_dir: cli.data_dir,
        state_dir: cli.state_dir,
        base_timeframe: cli.base_timeframe,
        timeframe: cli.timeframe,
        theme: cli.theme,
    };
    info!(
        "Workbench over {} ({} -> {})",
        app_context.data_dir.display(),
        app_context.base_timeframe.label(),
        app_context.timeframe.label()
    );

    match cli.command {
        Commands::Load => {
            load::run(&app_context).await?;
        }
        Commands::Derive => {
            derive::run(&app_context).await?;
        }
        Commands::Mark { command } => match command {
            MarkCommands::Add { time, direction } => {
                mark::add(&app_context, time, direction).await?;
            }
            MarkCommands::Remove { index } => {
                mark::remove(&app_context, index).await?;
            }
            MarkCommands::List => {
                mark::list(&app_context)?;
            }
        },
        Commands::Rules { command } => match command {
            RulesCommands::Show => {
                rules::show(&app_context)?;
            }
            RulesCommands::Set {
                direction,
                entry,
                stop,
                atr_multiple,
                take_profit_multiple,
            } => {
                let edit = rules::RuleEdit {
                    entry_price_source: entry,
                    stop_loss_source: stop,
                    atr_multiple,
                    take_profit_multiple,
                };
                rules::set(&app_context, direction, edit).await?;
            }
        },
    }

    Ok(())
}
