//! formwork CLI: dispatch one request against the demo application.

use std::env;
use std::path::PathBuf;
use std::process;

use colored::Colorize;

use formwork::config::{load_env_files, AppConfig};
use formwork::demo;
use formwork::request::{Request, RequestMethod, RequestParams};

const VERSION: &str = env!("CARGO_PKG_VERSION", "0.3.0");

/// CLI command to execute.
enum Command {
    /// Dispatch a request
    Dispatch {
        controller: Option<String>,
        action: Option<String>,
        method: RequestMethod,
        params: Vec<(String, String)>,
    },
    /// Print the error log
    ShowLog,
    /// Truncate the error log
    ClearLog,
}

/// CLI options parsed from arguments.
struct Options {
    command: Command,
    root: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

fn print_usage() {
    eprintln!("formwork {} - form binding and validation demo", VERSION);
    eprintln!();
    eprintln!("Usage: formwork [options] [key=value...]");
    eprintln!("       formwork --log");
    eprintln!("       formwork --clear-log");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --controller NAME  Controller to dispatch to (default: Index)");
    eprintln!("  --action NAME      Action to dispatch to (default: Index)");
    eprintln!("  --method METHOD    get, post, put or delete (default: get)");
    eprintln!("  --root DIR         Application root (.env files, error.log)");
    eprintln!("  --config FILE      Read configuration from a JSON file");
    eprintln!("  --log              Print the error log");
    eprintln!("  --clear-log        Truncate the error log");
    eprintln!("  --help, -h         Show this help message");
    eprintln!();
    eprintln!("Parameters are passed as key=value; repeat a key or use key[]=value for lists.");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  formwork");
    eprintln!("  formwork --method post username=alice password=secret");
    eprintln!("  formwork --action Register --method post languages[]=en languages[]=he");
    eprintln!("  formwork --log");
}

fn option_value(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i) {
        Some(value) => value.clone(),
        None => {
            eprintln!("{} requires a value", flag);
            print_usage();
            process::exit(64);
        }
    }
}

fn parse_args() -> Options {
    let args: Vec<String> = env::args().skip(1).collect();
    let mut controller = None;
    let mut action = None;
    let mut method = RequestMethod::Get;
    let mut params = Vec::new();
    let mut show_log = false;
    let mut clear_log = false;
    let mut root = None;
    let mut config_file = None;

    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--controller" => {
                i += 1;
                controller = Some(option_value(&args, i, "--controller"));
            }
            "--action" => {
                i += 1;
                action = Some(option_value(&args, i, "--action"));
            }
            "--method" => {
                i += 1;
                let raw = option_value(&args, i, "--method");
                method = raw.parse().unwrap_or_else(|e: String| {
                    eprintln!("{}", e);
                    process::exit(64);
                });
            }
            "--root" => {
                i += 1;
                root = Some(PathBuf::from(option_value(&args, i, "--root")));
            }
            "--config" => {
                i += 1;
                config_file = Some(PathBuf::from(option_value(&args, i, "--config")));
            }
            "--log" => show_log = true,
            "--clear-log" => clear_log = true,
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                print_usage();
                process::exit(64);
            }
            pair => match pair.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    params.push((key.to_string(), value.to_string()));
                }
                _ => {
                    eprintln!("Expected key=value, got: {}", pair);
                    print_usage();
                    process::exit(64);
                }
            },
        }
        i += 1;
    }

    let command = if clear_log {
        Command::ClearLog
    } else if show_log {
        Command::ShowLog
    } else {
        Command::Dispatch {
            controller,
            action,
            method,
            params,
        }
    };

    Options {
        command,
        root,
        config_file,
    }
}

fn load_config(options: &Options) -> AppConfig {
    let root = options.root.clone().unwrap_or_else(|| PathBuf::from("."));
    load_env_files(&root);

    let mut config = match &options.config_file {
        Some(path) => AppConfig::from_json_file(path).unwrap_or_else(|e| {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(1);
        }),
        None => AppConfig::from_env(),
    };

    if let Some(root) = &options.root {
        if config.error_log_path == config.root_dir.join("error.log") {
            config.error_log_path = root.join("error.log");
        }
        config.root_dir = root.clone();
    }
    config
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args();
    let config = load_config(&options);
    let app = demo::app(config);

    match options.command {
        Command::ShowLog => match app.error_log().read() {
            Ok(lines) if lines.is_empty() => println!("{}", "error log is empty".dimmed()),
            Ok(lines) => {
                for line in lines {
                    println!("{}", line);
                }
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
                process::exit(1);
            }
        },
        Command::ClearLog => {
            if let Err(e) = app.error_log().clear() {
                eprintln!("{} {}", "Error:".red().bold(), e);
                process::exit(1);
            }
            println!("{}", "error log cleared".green());
        }
        Command::Dispatch {
            controller,
            action,
            method,
            params,
        } => {
            let mut request = Request::new(method, RequestParams::from_pairs(params));
            request.controller = controller;
            request.action = action;

            let response = app.handle(&request);
            let status = format!("{}", response.status);
            if response.is_success() {
                println!("{}", status.green().bold());
            } else {
                println!("{}", status.red().bold());
            }
            print!("{}", response.body);
            if !response.body.ends_with('\n') {
                println!();
            }
            if !response.is_success() {
                process::exit(1);
            }
        }
    }
}
