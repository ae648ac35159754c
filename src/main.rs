//! funk - Find yoUr Nodes on g5K: resource selection for Grid'5000 reservations

mod display;
mod form;
mod formatting;
mod models;
mod tui;
mod utils;

use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::{Confirm, theme::ColorfulTheme};
use tracing_subscriber::EnvFilter;

use form::{ControlId, Form, FunkCommand, ResourceRequest};
use models::{DEFAULT_PLATFORM_NAME, FunkConfig, Mode, Platform};

#[derive(Parser)]
#[command(name = "funk")]
#[command(about = "Resource selection for Grid'5000 reservations", long_about = None)]
#[command(version)]
struct Cli {
    /// Platform description file (TOML or JSON), overrides the config
    #[arg(long, global = true, value_name = "FILE")]
    platform: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Pick resources interactively (default)
    #[command(alias = "ui")]
    Pick {
        /// Mode selected when the picker opens
        #[arg(short, long)]
        mode: Option<String>,
    },

    /// Show the sites and clusters of the platform
    Tree,

    /// Apply a resource list to the form and print the resulting command
    Resolve {
        /// Search mode: date, free or max
        #[arg(short, long)]
        mode: Option<String>,

        /// Resources: element[:n_nodes],element[:n_nodes],...
        #[arg(short, long, default_value = DEFAULT_PLATFORM_NAME)]
        resources: String,

        /// Walltime (h:mm:ss or seconds)
        #[arg(short, long)]
        walltime: Option<String>,

        /// Start date, "YYYY-MM-DD HH:MM:SS"
        #[arg(short, long)]
        start_date: Option<String>,

        /// End date, "YYYY-MM-DD HH:MM:SS" (ignored in date mode)
        #[arg(short, long)]
        end_date: Option<String>,

        /// Avoid charter periods
        #[arg(short, long)]
        charter: bool,

        /// Ask for a KaVLAN
        #[arg(short, long)]
        kavlan: bool,

        /// Ask for subnets: slash_22=1 or site1:slash_22=2,site2:slash_19=1
        #[arg(short = 'n', long)]
        subnet: Option<String>,

        /// Extra options passed to oarsub/oargridsub
        #[arg(short = 'o', long, allow_hyphen_values = true)]
        submission_opts: Option<String>,

        /// Perform the reservation automatically once a slot is found
        #[arg(long)]
        auto_reserve: bool,

        /// Output JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Answer yes to the switch-to-free-mode prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Pick { .. }));
    init_logging(cli.verbose, cli.quiet, interactive)?;

    let (config, config_warnings) = FunkConfig::load()?;

    let platform_file = cli.platform.as_deref().or(config.system.platform_file.as_deref());
    let platform = Platform::load_or_builtin(platform_file)?;

    match cli.command {
        Some(Commands::Tree) => {
            println!("{}", display::format_platform(&platform));
        }
        Some(Commands::Resolve {
            mode,
            resources,
            walltime,
            start_date,
            end_date,
            charter,
            kavlan,
            subnet,
            submission_opts,
            auto_reserve,
            json,
            yes,
        }) => {
            let mode = mode.as_deref().unwrap_or(&config.form.default_mode);
            let args = ResolveArgs {
                mode: Mode::from_value(mode),
                resources: &resources,
                walltime: walltime.as_deref(),
                start_date: start_date.as_deref(),
                end_date: end_date.as_deref(),
                charter,
                kavlan,
                subnet: subnet.as_deref(),
                submission_opts: submission_opts.as_deref(),
                auto_reserve,
                yes,
            };
            let (form, command, warnings) = handle_resolve_command(&platform, &config, args)?;
            if json {
                let output = serde_json::json!({
                    "form": form.snapshot(),
                    "command": command,
                    "command_line": command.to_command_line(),
                    "warnings": warnings,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("{}", display::format_form_state(&form));
                println!("{}", display::format_command(&command, &warnings));
            }
        }
        Some(Commands::Pick { mode }) => {
            run_picker(&platform, config, config_warnings, mode.as_deref())?;
        }
        None => {
            run_picker(&platform, config, config_warnings, None)?;
        }
    }

    Ok(())
}

/// Set up the tracing subscriber.
///
/// `FUNK_LOG` takes precedence over the verbosity flags. The picker owns the
/// terminal, so it only logs when `FUNK_LOG_FILE` names a file.
fn init_logging(verbose: bool, quiet: bool, interactive: bool) -> Result<()> {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_env("FUNK_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    if interactive {
        let Ok(path) = std::env::var("FUNK_LOG_FILE") else {
            return Ok(());
        };
        let file = File::create(&path).with_context(|| format!("Failed to open log file {path}"))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

/// Render the form for `mode` with the configured defaults
fn build_form(platform: &Platform, config: &FunkConfig, mode: Mode) -> Result<Form> {
    let mut form = Form::from_platform(platform, mode)
        .with_context(|| format!("Invalid platform '{}'", platform.name))?;
    form.set_value(ControlId::Walltime, config.form.walltime.clone())?;
    Ok(form)
}

fn run_picker(
    platform: &Platform,
    config: FunkConfig,
    config_warnings: Vec<String>,
    mode: Option<&str>,
) -> Result<()> {
    let mode = Mode::from_value(mode.unwrap_or(&config.form.default_mode));
    let form = build_form(platform, &config, mode)?;

    if let Some(command) = tui::run(form, config, config_warnings)? {
        println!("{}", command);
    }
    Ok(())
}

struct ResolveArgs<'a> {
    mode: Mode,
    resources: &'a str,
    walltime: Option<&'a str>,
    start_date: Option<&'a str>,
    end_date: Option<&'a str>,
    charter: bool,
    kavlan: bool,
    subnet: Option<&'a str>,
    submission_opts: Option<&'a str>,
    auto_reserve: bool,
    yes: bool,
}

/// Apply a resource list through the form handlers and compose the command
fn handle_resolve_command(
    platform: &Platform,
    config: &FunkConfig,
    args: ResolveArgs<'_>,
) -> Result<(Form, FunkCommand, Vec<String>)> {
    let mut mode = args.mode;
    let mut request = ResourceRequest::parse(args.resources)?;
    let mut warnings = Vec::new();

    if !mode.is_free() && request.has_node_counts() {
        if args.yes || confirm_switch_to_free()? {
            tracing::info!(from = %mode, "switching to free mode for node counts");
            mode = Mode::Free;
        } else {
            warnings.push(format!(
                "Node counts are ignored in {} mode",
                mode.as_str()
            ));
            request = request.without_node_counts();
        }
    }

    let mut form = build_form(platform, config, mode)?;
    warnings.extend(request.validate_for(form.mode())?);
    form.apply_request(&request)?;

    if let Some(walltime) = args.walltime {
        form.set_value(ControlId::Walltime, walltime)?;
    }
    if let Some(start) = args.start_date {
        form.set_value(ControlId::StartDate, start)?;
    }
    if let Some(end) = args.end_date {
        if form.end_date_picker().disabled {
            warnings.push(format!("End date is not used in {} mode", form.mode().as_str()));
        } else {
            form.set_value(ControlId::EndDate, end)?;
        }
    }

    let checked_options = [
        (ControlId::Charter, args.charter),
        (ControlId::Kavlan, args.kavlan),
        (ControlId::Autoreservation, args.auto_reserve),
    ];
    for (id, wanted) in checked_options {
        if wanted {
            form.check(id);
        }
    }
    if let Some(subnet) = args.subnet {
        form.set_value(ControlId::Subnet, subnet)?;
    }
    if let Some(opts) = args.submission_opts {
        form.set_value(ControlId::SubmissionOpts, opts)?;
    }

    let command = FunkCommand::from_form(&form, &config.form.job_name)?;
    Ok((form, command, warnings))
}

/// Answer assumed when the switch-to-free prompt is confirmed without typing
const SWITCH_TO_FREE_DEFAULT: bool = false;

/// Ask whether node counts should switch the search to free mode
fn confirm_switch_to_free() -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(false);
    }
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Node counts are only used in free mode. Switch to free mode?")
        .default(SWITCH_TO_FREE_DEFAULT)
        .interact()?;
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::small_platform;

    fn args(mode: Mode, resources: &str) -> ResolveArgs<'_> {
        ResolveArgs {
            mode,
            resources,
            walltime: None,
            start_date: None,
            end_date: None,
            charter: false,
            kavlan: false,
            subnet: None,
            submission_opts: None,
            auto_reserve: false,
            yes: false,
        }
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["funk", "-v", "-q", "tree"]).is_err());
        assert!(Cli::try_parse_from(["funk", "tree", "-v"]).is_ok());
    }

    #[test]
    fn test_resolve_site_locks_clusters() {
        let platform = small_platform();
        let config = FunkConfig::default();
        let (form, command, warnings) =
            handle_resolve_command(&platform, &config, args(Mode::Date, "rennes")).unwrap();

        assert!(warnings.is_empty());
        assert!(form.site("rennes").unwrap().clusters.iter().all(|c| c.checked && c.disabled));
        assert_eq!(command.resources.to_string(), "rennes");
        assert!(command.end_date.is_none());
    }

    #[test]
    fn test_resolve_counts_with_yes_switches_to_free() {
        let platform = small_platform();
        let config = FunkConfig::default();
        let mut resolve = args(Mode::Max, "rennes:4,stremi:2");
        resolve.yes = true;
        let (form, command, _) = handle_resolve_command(&platform, &config, resolve).unwrap();

        assert_eq!(form.mode(), &Mode::Free);
        assert_eq!(command.resources.to_string(), "stremi:2,rennes:4");
    }

    #[test]
    fn test_switch_to_free_defaults_to_no() {
        // node counts only switch the mode on an explicit yes
        assert!(!SWITCH_TO_FREE_DEFAULT);
    }

    #[test]
    fn test_resolve_free_mode_requires_counts() {
        let platform = small_platform();
        let config = FunkConfig::default();
        assert!(handle_resolve_command(&platform, &config, args(Mode::Free, "rennes")).is_err());
    }

    #[test]
    fn test_resolve_end_date_ignored_in_date_mode() {
        let platform = small_platform();
        let config = FunkConfig::default();
        let mut resolve = args(Mode::Date, "grid5000");
        resolve.end_date = Some("2030-01-01 00:00:00");
        resolve.walltime = Some("2:30");
        let (_, command, warnings) = handle_resolve_command(&platform, &config, resolve).unwrap();

        assert_eq!(warnings.len(), 1);
        assert!(command.end_date.is_none());
        assert_eq!(command.walltime, "2:30:00");
    }

    #[test]
    fn test_resolve_reservation_options() {
        let platform = small_platform();
        let config = FunkConfig::default();
        let mut resolve = args(Mode::Free, "grid5000:20");
        resolve.charter = true;
        resolve.kavlan = true;
        resolve.subnet = Some("slash_22=1");
        resolve.submission_opts = Some("-t deploy");
        resolve.auto_reserve = true;
        let (form, command, _) = handle_resolve_command(&platform, &config, resolve).unwrap();

        assert!(form.kavlan().checked && form.kavlan().is_checkbox());
        let line = command.to_command_line();
        assert!(line.contains(" -c -r grid5000:20 -k -n slash_22=1 "));
        assert!(line.ends_with("-o \"-t deploy\" -y"));
    }

    #[test]
    fn test_resolve_invalid_subnet() {
        let platform = small_platform();
        let config = FunkConfig::default();
        let mut resolve = args(Mode::Max, "rennes");
        resolve.subnet = Some("rennes:/22");
        let err = handle_resolve_command(&platform, &config, resolve).unwrap_err();
        assert!(err.to_string().contains("subnet"));
    }

    #[test]
    fn test_resolve_cli_option_flags() {
        let cli = Cli::try_parse_from([
            "funk", "resolve", "-r", "rennes", "-c", "-k", "-n", "slash_22=1", "-o", "-t deploy",
            "--auto-reserve", "-y",
        ])
        .unwrap();
        let Some(Commands::Resolve {
            charter,
            kavlan,
            subnet,
            submission_opts,
            auto_reserve,
            yes,
            ..
        }) = cli.command
        else {
            panic!("expected resolve");
        };
        assert!(charter && kavlan && auto_reserve && yes);
        assert_eq!(subnet.as_deref(), Some("slash_22=1"));
        assert_eq!(submission_opts.as_deref(), Some("-t deploy"));
    }

    #[test]
    fn test_resolve_unknown_element() {
        let platform = small_platform();
        let config = FunkConfig::default();
        let err = handle_resolve_command(&platform, &config, args(Mode::Date, "taurus"))
            .unwrap_err();
        assert!(err.to_string().contains("taurus"));
    }
}
