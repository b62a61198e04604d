// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use reelcut::app_config::{self, Config};
use reelcut::app_controller::Controller;
use reelcut::export::ExportFormat;
use reelcut::file_utils::FileManager;
use reelcut::script::Scene;
use reelcut::timecode::{FrameRate, to_ms, to_timecode};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExportFormat {
    Edl,
    Fcpxml,
    Resolve,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli_format: CliExportFormat) -> Self {
        match cli_format {
            CliExportFormat::Edl => ExportFormat::Edl,
            CliExportFormat::Fcpxml => ExportFormat::Fcpxml,
            CliExportFormat::Resolve => ExportFormat::ResolveScript,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the editable script preview from a scenes JSON file
    Preview {
        /// Scenes JSON file (array of scenes with shots)
        #[arg(value_name = "SCENES_JSON")]
        scenes: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Parse an edited preview back into scenes
    Parse {
        /// Preview text file
        #[arg(value_name = "PREVIEW")]
        preview: PathBuf,

        /// Write the parsed scenes as JSON here (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Check the narration against this project's timeline
        #[arg(long)]
        project: Option<PathBuf>,

        /// Compare against the original scenes JSON
        #[arg(long)]
        baseline: Option<PathBuf>,
    },

    /// Assemble and save the project timeline
    Assemble {
        /// Project directory
        #[arg(short, long)]
        project: PathBuf,

        /// Scenes JSON file
        #[arg(short, long)]
        scenes: PathBuf,

        /// Durations JSON file (array of {scene_number, shot_number, duration_s})
        #[arg(short, long)]
        durations: PathBuf,

        /// Override the configured frame rate
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Export the project timeline for editing applications
    Export {
        /// Project directory
        #[arg(short, long)]
        project: PathBuf,

        /// Formats to export (all when omitted)
        #[arg(short, long, value_enum)]
        format: Vec<CliExportFormat>,
    },

    /// Convert between milliseconds and HH:MM:SS:FF
    Timecode {
        /// Milliseconds or a timecode
        #[arg(value_name = "VALUE")]
        value: String,

        /// Frame rate (configured rate when omitted)
        #[arg(long)]
        fps: Option<f64>,
    },

    /// Generate shell completions for reelcut
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// reelcut - Timeline builder and NLE export engine
///
/// Builds a frame-accurate production timeline from a narrated scene/shot
/// script and exports it as EDL, FCPXML and a DaVinci Resolve script.
#[derive(Parser, Debug)]
#[command(name = "reelcut")]
#[command(version)]
#[command(about = "Timeline builder and NLE export engine")]
#[command(long_about = "reelcut assembles narrated scenes into a production timeline and exports it for video editors.

EXAMPLES:
    reelcut preview scenes.json -o preview.txt            # Write the editable preview
    reelcut parse preview.txt --baseline scenes.json      # Re-read an edited preview
    reelcut assemble -p my_video -s scenes.json -d durations.json
    reelcut export -p my_video                            # EDL, FCPXML and Resolve script
    reelcut export -p my_video -f edl                     # EDL only
    reelcut timecode 90000 --fps 30                       # 00:01:30:00
    reelcut completions bash > reelcut.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

fn main() -> Result<()> {
    // Start at trace so the configured level can be applied later with
    // set_max_level alone
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "reelcut", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_or_create_config(&cli.config_path)?;
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(level_filter(&config.log_level));
    }

    match cli.command {
        Commands::Preview { scenes, output } => {
            let controller = Controller::with_config(config)?;
            let scenes = controller.load_scenes(&scenes)?;
            match output {
                Some(path) => controller.write_preview(&scenes, &path)?,
                None => println!("{}", controller.build_preview(&scenes)),
            }
        }
        Commands::Parse {
            preview,
            output,
            project,
            baseline,
        } => {
            let controller = Controller::with_config(config)?;
            let report = controller.parse_preview_file(&preview)?;

            if let Some(project_dir) = project {
                match controller.narration_matches_timeline(&project_dir, &report.scenes)? {
                    Some(true) => info!("Narration matches the generated timeline"),
                    Some(false) => warn!("Narration changed since the timeline was generated; regenerate the audio"),
                    None => warn!("Timeline has no narration fingerprint; cannot check for drift"),
                }
            }

            if let Some(baseline) = baseline {
                let original = controller.load_scenes(&baseline)?;
                let drift = controller.drift_report(&original, &report.scenes);
                if !drift.has_drift() {
                    info!("No narration drift against {:?}", baseline);
                }
            }

            let scenes: Vec<Scene> = report.scenes.iter().map(|s| s.to_scene()).collect();
            let json = serde_json::to_string_pretty(&scenes).context("Failed to serialize parsed scenes")?;
            match output {
                Some(path) => {
                    FileManager::write_to_file(&path, &json)?;
                    info!("Wrote {} scenes to {:?}", scenes.len(), path);
                }
                None => println!("{}", json),
            }
        }
        Commands::Assemble {
            project,
            scenes,
            durations,
            fps,
        } => {
            if let Some(fps) = fps {
                config.fps = fps;
            }
            let controller = Controller::with_config(config)?;
            let scenes = controller.load_scenes(&scenes)?;
            let durations = controller.load_durations(&durations)?;
            controller.generate_timeline(&project, &scenes, &durations)?;
        }
        Commands::Export { project, format } => {
            let controller = Controller::with_config(config)?;
            let formats: Vec<ExportFormat> = if format.is_empty() {
                ExportFormat::ALL.to_vec()
            } else {
                format.into_iter().map(Into::into).collect()
            };
            let written = controller.export(&project, &formats)?;
            info!("Exported {} file(s) to {:?}", written.len(), FileManager::exports_dir(&project));
        }
        Commands::Timecode { value, fps } => {
            let fps = FrameRate::new(fps.unwrap_or(config.fps))?;
            if value.contains(':') {
                println!("{}", to_ms(&value, fps)?);
            } else {
                let ms: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("Expected milliseconds or HH:MM:SS:FF, got '{}'", value))?;
                println!("{}", to_timecode(ms, fps));
            }
        }
        // handled before config loading
        Commands::Completions { .. } => {}
    }

    Ok(())
}

fn load_or_create_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        Config::from_file(config_path)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config.save(config_path)?;
        Ok(config)
    }
}
