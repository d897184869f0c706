use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use expense_split::audit::AuditLogger;
use expense_split::cli::{
    handle_calc_command, handle_export_command, handle_list_command, handle_settings_command,
    handle_watch_command, CalcArgs, ExportCommands, ListArgs, SettingsCommands, WatchArgs,
};
use expense_split::config::SplitPaths;
use expense_split::logging;
use expense_split::services::SettingsService;

#[derive(Parser)]
#[command(
    name = "expense-split",
    version,
    about = "Split shared household expenses with a partner",
    long_about = "expense-split reads a Money Forward transaction export, leaves out \
                  excluded categories and works out how much your partner owes for \
                  the month, including expenses split by a custom percentage."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Use this settings file instead of the default one
    #[arg(long, global = true, env = "EXPENSE_SPLIT_SETTINGS")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the split for a transaction export
    Calc(CalcArgs),

    /// List transactions with how each one was counted
    #[command(alias = "ls")]
    List(ListArgs),

    /// Recalculate whenever the export or the settings change
    Watch(WatchArgs),

    /// Export results to a file or the spreadsheet
    #[command(subcommand)]
    Export(ExportCommands),

    /// View and edit settings
    #[command(subcommand)]
    Settings(SettingsCommands),

    /// Show recent settings changes
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },

    /// Create the settings file with defaults
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let paths = SplitPaths::new()?;
    let service = match cli.settings {
        Some(path) => SettingsService::new(path, AuditLogger::new(paths.audit_log())),
        None => SettingsService::from_paths(&paths),
    };

    match cli.command {
        Some(Commands::Calc(args)) => {
            let settings = service.load()?;
            handle_calc_command(&settings, args)?;
        }
        Some(Commands::List(args)) => {
            let settings = service.load()?;
            handle_list_command(&settings, args)?;
        }
        Some(Commands::Watch(args)) => {
            handle_watch_command(&service, args)?;
        }
        Some(Commands::Export(cmd)) => {
            let settings = service.load()?;
            handle_export_command(&settings, cmd)?;
        }
        Some(Commands::Settings(cmd)) => {
            handle_settings_command(&service, cmd)?;
        }
        Some(Commands::Audit { count }) => {
            let entries = service.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No settings changes recorded.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            paths.ensure_directories()?;
            if service.init()? {
                println!(
                    "Created settings at: {}",
                    service.settings_path().display()
                );
            } else {
                println!(
                    "Settings already exist at: {} (missing values filled in)",
                    service.settings_path().display()
                );
            }
            println!();
            println!("Next steps:");
            println!("  expense-split settings add partner-account <account>");
            println!("  expense-split settings set-rate 0.5");
            println!("  expense-split calc <export.csv>");
        }
        Some(Commands::Config) => {
            let settings = service.load()?;
            println!("expense-split Configuration");
            println!("===========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Settings file:    {}", service.settings_path().display());
            println!("Audit log:        {}", service.audit().path().display());
            println!("Reports directory: {}", paths.reports_dir().display());
            println!();
            println!("Settings:");
            println!("  Partner name: {}", settings.partner_name);
            println!("  Split rate:   {}", settings.split_rate);
            println!(
                "  Export:       {}",
                if settings.export.is_some() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
        None => {
            println!("expense-split - split shared household expenses");
            println!();
            println!("Run 'expense-split --help' for usage information.");
            println!("Run 'expense-split init' to create your settings.");
        }
    }

    Ok(())
}
