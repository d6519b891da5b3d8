//! EasyLife CLI - Markdown todos for one or more local accounts.

use clap::Parser;
use clap::error::ErrorKind;
use easylife::App;
use easylife::cli::{Cli, Commands, ConfigCommands, TodoCommands};
use easylife::commands::{self, Output};
use easylife::config::{ConfigOverrides, OutputFormat, ResolvedConfig, resolve_config};
use easylife::shell::{self, render_error};
use easylife::storage::{BackendType, FileBackend, MemoryBackend, Persistence};
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (e.g. `debug`, `easylife=trace`).
const LOG_ENV: &str = "EASYLIFE_LOG";

fn main() {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => exit_usage(e),
    };
    let requested = if cli.human_readable {
        OutputFormat::Human
    } else {
        OutputFormat::Json
    };

    let overrides = ConfigOverrides {
        config_path: cli.config,
        data_dir: cli.data_dir,
        auth_mode: cli.auth_mode.map(Into::into),
        output_format: cli.human_readable.then_some(OutputFormat::Human),
        backend: cli.backend.map(Into::into),
    };

    let config = match resolve_config(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", render_error(&e, requested));
            process::exit(1);
        }
    };
    let format = config.output_format();

    if let Err(e) = run_command(cli.command, &config, format) {
        eprintln!("{}", render_error(&e, format));
        process::exit(1);
    }
}

/// Help and version print as usual; argument errors use the error format and exit 1.
fn exit_usage(err: clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
        _ => {
            let human = std::env::args().any(|arg| arg == "-H" || arg == "--human");
            let format = if human {
                OutputFormat::Human
            } else {
                OutputFormat::Json
            };
            // First paragraph only; the usage block follows a blank line.
            let rendered = err.to_string();
            let summary = rendered.split("\n\n").next().unwrap_or_default();
            let message = summary
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
                .trim_start_matches("error: ")
                .to_string();
            eprintln!("{}", render_error(&easylife::Error::Usage(message), format));
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn open_app(config: &ResolvedConfig) -> App {
    let persistence = match config.backend() {
        BackendType::File => Persistence::new(FileBackend::new(config.data_dir())),
        BackendType::Memory => Persistence::new(MemoryBackend::new()),
    };
    App::open(persistence, config.auth_policy())
}

fn run_command(
    command: Option<Commands>,
    config: &ResolvedConfig,
    format: OutputFormat,
) -> Result<(), easylife::Error> {
    match command {
        None | Some(Commands::Whoami) => {
            let app = open_app(config);
            output(&commands::whoami(&app), format);
        }

        Some(Commands::Register {
            username,
            password,
            confirm,
        }) => {
            let mut app = open_app(config);
            let result = commands::register(&mut app, &username, &password, confirm.as_deref())?;
            output(&result, format);
        }

        Some(Commands::Login { username, password }) => {
            let mut app = open_app(config);
            let result = commands::login(&mut app, &username, password.as_deref())?;
            output(&result, format);
        }

        Some(Commands::Logout) => {
            let mut app = open_app(config);
            output(&commands::logout(&mut app)?, format);
        }

        Some(Commands::Todo { command }) => {
            let mut app = open_app(config);
            match command {
                TodoCommands::Create { title, content } => {
                    let result = commands::todo_create(&mut app, &title, &content)?;
                    output(&result, format);
                }
                TodoCommands::List => {
                    output(&commands::todo_list(&app), format);
                }
                TodoCommands::Show { id } => {
                    output(&commands::todo_show(&mut app, &id)?, format);
                }
                TodoCommands::Edit { id, title, content } => {
                    let result = commands::todo_edit(
                        &mut app,
                        &id,
                        title.as_deref(),
                        content.as_deref(),
                    )?;
                    output(&result, format);
                }
                TodoCommands::Delete { id } => {
                    output(&commands::todo_delete(&mut app, &id)?, format);
                }
            }
        }

        Some(Commands::Config { command }) => match command {
            ConfigCommands::Show => output(&commands::config_show(config), format),
            ConfigCommands::Path => output(&commands::config_path(config), format),
        },

        Some(Commands::Shell) => {
            let mut app = open_app(config);
            let stdin = io::stdin();
            let mut stdout = io::stdout().lock();
            shell::run(&mut app, stdin.lock(), &mut stdout, format)?;
        }
    }

    Ok(())
}

/// Print output in JSON or human-readable format.
fn output<T: Output>(result: &T, format: OutputFormat) {
    if format.is_human() {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
