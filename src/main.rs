//! termcon - Demo Console
//!
//! Interactive demo of the console library: default commands, a simulated
//! server session that adds and removes commands at runtime, `$PATH`
//! programs as commands, an HTTP fetch that runs its own event loop inside
//! a command, and a background timer running between lines.

use std::cell::Cell;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use std::process::{self, Stdio};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use inquire::{InquireError, Select};
use log::LevelFilter;
use walkdir::WalkDir;

use termcon::console::{logger, Color, Console, ConsoleConfig, Context, LocalHost, Style};

const DEFAULT_HISTORY_PATH: &str = "./history.txt";
const DEFAULT_SERVER_HOST: &str = "localhost";
const DEFAULT_SERVER_PORT: u16 = 4443;

/// Parsed command line options
struct Options {
    history: PathBuf,
    config: Option<PathBuf>,
    server_host: String,
    server_port: u16,
    log_level: Option<LevelFilter>,
}

/// Address of the simulated server
struct Server {
    host: String,
    port: u16,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let options = match parse_args(env::args().skip(1))? {
        Some(options) => options,
        None => return Ok(()),
    };

    // The console is !Send, so everything runs as local tasks
    tokio::task::LocalSet::new().run_until(run(options)).await
}

/// Parse arguments; `None` means the invocation was fully handled (help/version)
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Options>> {
    let mut options = Options {
        history: PathBuf::from(DEFAULT_HISTORY_PATH),
        config: None,
        server_host: DEFAULT_SERVER_HOST.to_string(),
        server_port: DEFAULT_SERVER_PORT,
        log_level: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(None);
            }
            "--version" | "-v" => {
                println!("termcon {}", env!("CARGO_PKG_VERSION"));
                return Ok(None);
            }
            "--silent" => options.log_level = Some(LevelFilter::Off),
            "--verbose" => options.log_level = Some(LevelFilter::Trace),
            "--history" => options.history = PathBuf::from(value_of(&arg, args.next())?),
            "--config" => options.config = Some(PathBuf::from(value_of(&arg, args.next())?)),
            "--server-host" => options.server_host = value_of(&arg, args.next())?,
            "--server-port" => {
                let value = value_of(&arg, args.next())?;
                options.server_port = value
                    .parse()
                    .with_context(|| format!("Invalid port for --server-port: {}", value))?;
            }
            other => bail!("Unknown option: {}", other),
        }
    }

    Ok(Some(options))
}

fn value_of(flag: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(value) => Ok(value),
        None => bail!("Missing value for {}", flag),
    }
}

fn print_usage() {
    println!();
    println!("Usage:");
    println!();
    println!("  termcon [options]");
    println!();
    println!("Options:");
    println!();
    println!("  -h or --help            Print this help message.");
    println!("  -v or --version         Print the version string.");
    println!();
    println!("  --history     <path>    History file. [default: {}]", DEFAULT_HISTORY_PATH);
    println!("  --config      <path>    JSON console configuration.");
    println!("  --server-host <value>   The server host. [default: {}]", DEFAULT_SERVER_HOST);
    println!("  --server-port <value>   The server port. [default: {}]", DEFAULT_SERVER_PORT);
    println!("  --silent                Disable all message logging.");
    println!("  --verbose               Enable all message logging.");
    println!();
}

async fn run(options: Options) -> Result<()> {
    let config = match &options.config {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("cannot load configuration from {}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    let log_level = options.log_level.unwrap_or_else(|| config.log_level_filter());
    let color = config.color_enabled();

    let host = LocalHost::new();
    let mut console = Console::builder(host.clone()).config(config).build()?;

    logger::init(console.output(), log_level, color)?;

    console.add_default_commands();
    console.set_history_file_path(&options.history);
    let prompt = offline_prompt(&console);
    console.set_default_prompt(prompt);

    let ticks = Rc::new(Cell::new(0u64));
    let server = Rc::new(Server {
        host: options.server_host,
        port: options.server_port,
    });
    add_demo_commands(&mut console, server, ticks.clone());

    tokio::task::spawn_local(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            ticks.set(ticks.get() + 1);
        }
    });

    let shutdown = host.clone();
    tokio::task::spawn_local(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            shutdown.request_quit();
        }
    });

    console.start();
    host.drive(&mut console).await?;

    log::debug!("console host stopped");
    Ok(())
}

fn offline_prompt(console: &Console) -> String {
    format!("[?][{}]: ", console.paint("#", Color::Red, Style::Bold))
}

fn add_demo_commands(console: &mut Console, server: Rc<Server>, ticks: Rc<Cell<u64>>) {
    console.add_command(
        "http-get",
        "Send an http request and print the response body.",
        |console, ctx| http_get(console, ctx),
    );

    console.add_command(
        "shell",
        "Add executable programs found under $PATH as commands.",
        |console, _| {
            let programs = path_programs();
            let count = programs.len();
            for program in programs {
                let name = program.clone();
                console.add_command(name, "[executable]", move |console, ctx| {
                    run_program(console, &program, ctx)
                });
            }
            log::info!("Added {} programs as commands.", count);
        },
    );

    console.add_command("connect", "Connect to the server.", move |console, _| {
        connect(console, server.clone())
    });

    console.add_command("menu", "Pick a command from a list.", |console, _| menu(console));

    console.add_command("echo", "Print the arguments.", |console, ctx| {
        console.write_line(&ctx.arguments.join(" "))
    });

    console.add_command("stop", "Stop reading input; Ctrl-C exits.", |console, _| {
        console.stop();
        log::info!("Console stopped. Press Ctrl-C to exit.");
    });

    console.add_command(
        "uptime",
        "Print the seconds counted by a background timer.",
        move |console, _| console.write_line(&format!("{}s", ticks.get())),
    );

    console.add_command("config", "Print the console configuration.", |console, _| {
        for line in console.config().get_summary() {
            console.write_line(&line);
        }
    });
}

/// File names of everything executable-looking directly under a `$PATH` entry
fn path_programs() -> Vec<String> {
    let Some(path) = env::var_os("PATH") else {
        return Vec::new();
    };

    env::split_paths(&path)
        .flat_map(|dir| {
            WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .follow_links(true)
                .into_iter()
                .filter_map(|entry| entry.ok())
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect()
}

fn run_program(console: &mut Console, program: &str, ctx: &Context) {
    let output = match process::Command::new(program)
        .args(&ctx.arguments)
        .stdin(Stdio::null())
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            log::error!("{}: {}", program, e);
            return;
        }
    };

    let bytes = if output.status.success() {
        output.stdout
    } else {
        output.stderr
    };

    let mut out = console.output();
    if let Err(e) = out.write_all(&bytes).and_then(|_| out.flush()) {
        log::debug!("cannot forward output of {}: {}", program, e);
    }
}

fn http_get(console: &mut Console, ctx: &Context) {
    let url = ctx.arguments.join(" ");
    if url.trim().is_empty() {
        log::warn!("Usage: http-get <url>");
        return;
    }

    // The host runtime is parked inside this step, so the request gets its
    // own event loop on a scoped thread and the command waits for it.
    let response = thread::scope(|scope| scope.spawn(|| fetch(url.trim())).join());

    match response {
        Ok(Ok(body)) => console.write_line(&body),
        Ok(Err(e)) => log::error!("{:#}", e),
        Err(_) => log::error!("Request thread for {} panicked", url),
    }
}

fn fetch(url: &str) -> Result<String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let response = reqwest::get(url).await?.error_for_status()?;
        Ok::<_, anyhow::Error>(response.text().await?)
    })
}

fn connect(console: &mut Console, server: Rc<Server>) {
    let prompt = format!("[?][{}]: ", console.paint("#", Color::Green, Style::Bold));
    console.set_default_prompt(prompt);

    let address = format!("{}:{}", server.host, server.port);
    console.add_command("login", "Login to the server.", move |console, _| {
        login(console, &server.host)
    });

    console.add_command("logout", "Logout of the server.", |console, _| {
        console.write_line("Logging out!");
        console.reset_prompt();
    });

    console.add_command("ping", "Ping the server.", |console, _| console.write_line("Ping!"));

    console.add_command("disconnect", "Disconnect from the server.", |console, _| {
        for name in ["login", "logout", "ping", "disconnect"] {
            console.remove_command_by_name(name);
        }
        let prompt = offline_prompt(console);
        console.set_default_prompt(prompt);
        log::info!("Disconnected from server. Online commands have been removed.");
    });

    log::info!("Connected to {}. See 'help' for online commands.", address);
}

fn read_credentials(console: &mut Console) -> termcon::console::Result<(String, String)> {
    let username = console.read_line("Username: ")?;
    let password = console.read_pass("Password: ")?;
    Ok((username, password))
}

fn login(console: &mut Console, server_host: &str) {
    let (username, password) = match read_credentials(console) {
        Ok(credentials) => credentials,
        Err(e) => {
            log::error!("Login aborted: {}", e);
            return;
        }
    };

    if username == "root" && password == "123" {
        let prompt = format!(
            "[{}@{}][{}]: ",
            console.paint(&username, Color::Green, Style::Bold),
            console.paint(server_host, Color::Cyan, Style::Bold),
            console.paint("#", Color::Green, Style::Bold)
        );
        console.set_prompt(prompt);
    } else {
        log::error!("Incorrect password!");
    }
}

fn menu(console: &mut Console) {
    let names: Vec<String> = console
        .commands()
        .into_iter()
        .map(|(name, _)| name)
        .filter(|name| name != "menu")
        .collect();

    let selection = Select::new("Select command:", names)
        .with_page_size(10)
        .with_help_message("Use arrow keys to navigate, Enter to select, Esc to cancel")
        .prompt();

    match selection {
        Ok(name) => {
            console.invoke_command_by_name(&name, &Context::default());
        }
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {}
        Err(e) => log::error!("Command menu error: {}", e),
    }
}
