use clap::{Parser, Subcommand, ValueEnum};
use parking_lot::RwLock;
use rotary::RotaryLayout;
use rotary_menu::config::{self, Config, ITEM_COUNT_RANGE};
use rotary_menu::driver::{Driver, Frame};
use rotary_menu::events::{ControlCommand, Status};
use rotary_menu::sink::{FrameRecord, FrameSink, JsonLinesSink, LogSink};
use rotary_menu::sys::runtime;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "rotary-menu", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Use this config file instead of the per-user one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Start the animation daemon (the default)
    Run {
        /// Where computed frames go
        #[arg(long, value_enum, default_value_t = SinkKind::Json)]
        sink: SinkKind,
    },
    /// Send a control command to a running daemon
    Send { command: ControlCommand },
    /// Print a single layout as JSON
    Layout {
        /// Expansion level; values outside 0..=1 extrapolate
        #[arg(short, long, default_value_t = 1.0)]
        level: f64,
        /// Winding count, overriding the configured one
        #[arg(short, long)]
        winding: Option<f64>,
        /// Number of ring items, overriding the configured one
        #[arg(short, long)]
        items: Option<usize>,
    },
    /// Write the default config file if none exists and print its path
    InitConfig,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SinkKind {
    Json,
    Log,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    match cli.command.unwrap_or(Commands::Run {
        sink: SinkKind::Json,
    }) {
        Commands::Run { sink } => {
            let config = config::load_or_default(&config_path);
            match sink {
                SinkKind::Json => run(config, config_path, JsonLinesSink::new(std::io::stdout())),
                SinkKind::Log => run(config, config_path, LogSink),
            }
        }
        Commands::Send { command } => {
            let config = config::load_or_default(&config_path);
            send_command(&config.socket_path, command)
        }
        Commands::Layout {
            level,
            winding,
            items,
        } => {
            let config = config::load_or_default(&config_path);
            print_layout(&config, level, winding, items)
        }
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn run<S: FrameSink>(config: Config, config_path: PathBuf, sink: S) -> anyhow::Result<()> {
    let status = Arc::new(RwLock::new(Status::default()));
    let (tx, rx) = async_channel::bounded(32);

    let services = runtime::start_background_services(
        config.socket_path.clone(),
        config_path.clone(),
        tx,
        status.clone(),
    );

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(Driver::new(&config).run(rx, sink, status, config_path))?;

    if services.join().is_err() {
        log::error!("Background services panicked");
    }
    Ok(())
}

fn send_command(socket_path: &Path, command: ControlCommand) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(socket_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to rotary-menu at {}: {}. Is it running?",
            socket_path.display(),
            e
        )
    })?;

    writeln!(stream, "{}", command)?;

    if command == ControlCommand::Status {
        stream.set_read_timeout(Some(Duration::from_secs(2)))?;
        let mut reply = String::new();
        BufReader::new(&stream).read_line(&mut reply)?;
        print!("{}", reply);
    }
    Ok(())
}

fn print_layout(
    config: &Config,
    level: f64,
    winding: Option<f64>,
    items: Option<usize>,
) -> anyhow::Result<()> {
    let item_count = items.unwrap_or(config.item_count);
    if !ITEM_COUNT_RANGE.contains(&item_count) {
        anyhow::bail!("--items must be within {:?}", ITEM_COUNT_RANGE);
    }
    if !level.is_finite() {
        anyhow::bail!("--level must be a finite number");
    }

    let layout = RotaryLayout::new(
        winding.unwrap_or(config.winding_count),
        config.parameters,
        level,
    );
    let items = rotary::MenuItems::new((1..=item_count).collect());
    let frame = Frame::compute(0, layout, &items);
    println!("{}", serde_json::to_string_pretty(&FrameRecord::from(&frame))?);
    Ok(())
}
