//! Command-line kV dose QA for Lynx OPG measurements.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kvqa")]
#[command(about = "kV X-ray dose QA — analyse Lynx OPG measurements against a calibrated baseline")]
#[command(version = kvqa_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse every OPG measurement in a directory and update the history
    Analyse {
        /// Print the full per-region numeric dump instead of the compact report
        #[arg(short = 'd', long)]
        debug: bool,

        /// Directory holding the .opg measurement files
        #[arg(long, default_value = commands::DEFAULT_MEASUREMENT_DIR)]
        dir: String,

        /// Baseline file with the calibration constants
        #[arg(long, default_value = commands::DEFAULT_BASELINE_FILE)]
        baseline: String,

        /// History file the analysis records are appended to
        #[arg(long, default_value = commands::DEFAULT_HISTORY_FILE)]
        history: String,

        /// Write a machine-readable batch report as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Inspect or write the calibration baseline
    Baseline {
        #[command(subcommand)]
        action: BaselineAction,
    },

    /// Print the measurement history, one record per line
    History {
        /// History file to print
        #[arg(default_value = commands::DEFAULT_HISTORY_FILE)]
        file: String,
    },

    /// Number files for a measurement batch: rename every file with the
    /// given extension to <n>_<stem><ext> with a running counter
    Rename {
        /// File extension to match, e.g. .opg
        extension: String,

        /// New file-name stem
        stem: String,

        /// Directory containing the files
        #[arg(long, default_value = ".")]
        dir: String,
    },
}

#[derive(Subcommand)]
enum BaselineAction {
    /// Print the stored baseline with field labels
    Show {
        /// Baseline file to read
        #[arg(long, default_value = commands::DEFAULT_BASELINE_FILE)]
        file: String,
    },

    /// Write a new baseline, rotating any existing one to a backup file
    Set {
        /// Date the baseline was measured, e.g. 15/02/2022
        #[arg(long)]
        date: String,

        /// Initials of whoever set the baseline
        #[arg(long)]
        set_by: String,

        /// Whole-grid mean for the orthogonal pair at couch position x = 0
        #[arg(long)]
        orthogonal: f64,

        /// Left oblique's mean in the left band
        #[arg(long)]
        left_in_left: f64,

        /// Left oblique's mean in the right band
        #[arg(long)]
        left_in_right: f64,

        /// Right oblique's mean in the left band
        #[arg(long)]
        right_in_left: f64,

        /// Right oblique's mean in the right band
        #[arg(long)]
        right_in_right: f64,

        /// Left band start column (1-based, standard orientation)
        #[arg(long, default_value = "1")]
        left_start: u32,

        /// Left band end column
        #[arg(long, default_value = "80")]
        left_end: u32,

        /// Right band start column
        #[arg(long, default_value = "500")]
        right_start: u32,

        /// Right band end column
        #[arg(long, default_value = "600")]
        right_end: u32,

        /// Dose tolerance in percent
        #[arg(long, default_value = "3")]
        tolerance: f64,

        /// Detector serial number
        #[arg(long)]
        device_id: Option<String>,

        /// Baseline file to write
        #[arg(long, default_value = commands::DEFAULT_BASELINE_FILE)]
        file: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyse {
            debug,
            dir,
            baseline,
            history,
            output,
        } => commands::analyse::run(commands::analyse::AnalyseConfig {
            debug,
            dir: &dir,
            baseline_file: &baseline,
            history_file: &history,
            output_path: output.as_deref(),
        }),
        Commands::Baseline { action } => match action {
            BaselineAction::Show { file } => commands::baseline::show(&file),
            BaselineAction::Set {
                date,
                set_by,
                orthogonal,
                left_in_left,
                left_in_right,
                right_in_left,
                right_in_right,
                left_start,
                left_end,
                right_start,
                right_end,
                tolerance,
                device_id,
                file,
            } => commands::baseline::set(
                kvqa_core::Baseline {
                    date,
                    set_by,
                    orthogonal_ref: orthogonal,
                    left_in_left,
                    left_in_right,
                    right_in_left,
                    right_in_right,
                    left_start,
                    left_end,
                    right_start,
                    right_end,
                    tolerance,
                    device_id,
                },
                &file,
            ),
        },
        Commands::History { file } => commands::history::run(&file),
        Commands::Rename {
            extension,
            stem,
            dir,
        } => commands::rename::run(&extension, &stem, &dir),
    }
}
