use clap::Parser;
use serde::Serialize;
use skiptap::{AdbHost, Config, Host, KeywordSet, Node, Overrides, Runner};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "skiptap")]
#[command(about = "Tap skip/close buttons on an Android device over ADB")]
#[command(version)]
struct Cli {
    /// Config file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// ADB device serial (if multiple devices)
    #[arg(short, long, env = "ANDROID_SERIAL")]
    serial: Option<String>,

    /// Path to the adb executable
    #[arg(long)]
    adb: Option<String>,

    /// Polling interval in milliseconds
    #[arg(short, long, value_name = "MS")]
    interval: Option<u64>,

    /// Minimum spacing between notifications in milliseconds
    #[arg(long, value_name = "MS")]
    notify_interval: Option<u64>,

    /// Keyword to match clickable elements (can be used multiple times)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,

    /// Stop after N taps (0 = run until Ctrl+C)
    #[arg(long, value_name = "N")]
    max_taps: Option<u64>,

    /// Only log tap coordinates, do not tap
    #[arg(long)]
    dry_run: bool,

    /// Do not wait for the device to finish booting
    #[arg(long)]
    no_wait: bool,

    /// Do not post notifications
    #[arg(long)]
    no_notify: bool,

    /// Print the clickable elements on screen and exit
    #[arg(long)]
    list: bool,

    /// Print --list output as JSON
    #[arg(long, requires = "list")]
    json: bool,

    /// Validate config without running
    #[arg(long)]
    check: bool,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,
                1 => Level::INFO,
                _ => Level::DEBUG,
            }
        }
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            serial: self.serial.clone(),
            adb: self.adb.clone(),
            scan_interval_ms: self.interval,
            notify_interval_ms: self.notify_interval,
            keywords: self.keywords.clone(),
            max_taps: self.max_taps,
            dry_run: self.dry_run,
            no_wait: self.no_wait,
            no_notify: self.no_notify,
        }
    }
}

#[derive(Serialize)]
struct ListedNode<'a> {
    #[serde(flatten)]
    node: &'a Node,
    matched: bool,
}

#[tokio::main]
async fn main() -> skiptap::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG, when set, takes precedence over -v/-q.
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(cli.log_level()).into())
        .from_env_lossy();

    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply(&cli.overrides())?;

    if cli.check {
        print_config(&config);
        return Ok(());
    }

    let host = AdbHost::new(config.device.adb_config());

    if cli.list {
        return list_nodes(&host, &config.keyword_set(), cli.json).await;
    }

    let mut runner = Runner::new(host, &config);
    println!("Using keywords: {:?}", runner.keywords().as_slice());
    if config.dry_run {
        println!("Dry run: matches are logged, nothing is tapped");
    }

    let finished = tokio::select! {
        result = runner.run() => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    match finished {
        Some(result) => {
            result?;
        }
        None => println!("Stopped by user"),
    }

    let stats = runner.stats();
    println!(
        "Done. taps={} cycles={} errors={} duration={}ms",
        stats.taps, stats.cycles, stats.errors, stats.duration_ms
    );

    Ok(())
}

fn print_config(config: &Config) {
    println!("Config valid: {}", config.name);
    println!("  Keywords: {:?}", config.keyword_set().as_slice());
    println!("  Scan interval: {}ms", config.scan_interval_ms);
    if config.max_taps > 0 {
        println!("  Max taps: {}", config.max_taps);
    }
    if config.dry_run {
        println!("  Dry run: yes");
    }
    if config.notify.enabled {
        println!(
            "  Notify: every {}ms at most, {:?}",
            config.notify.interval_ms, config.notify.message
        );
    } else {
        println!("  Notify: off");
    }
    println!("  adb: {}", config.device.adb);
    if let Some(ref serial) = config.device.serial {
        println!("  Serial: {}", serial);
    }
}

async fn list_nodes(host: &AdbHost, keywords: &KeywordSet, json: bool) -> skiptap::Result<()> {
    let nodes = host.clickable_nodes().await?;
    let listed: Vec<ListedNode<'_>> = nodes
        .iter()
        .map(|node| ListedNode {
            node,
            matched: skiptap::matches(node, keywords),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!("No clickable elements on screen");
    }
    for item in &listed {
        let marker = if item.matched { "*" } else { " " };
        let bounds = item
            .node
            .bounds
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{} {:<24} text={:?} id={:?} desc={:?}",
            marker,
            bounds,
            item.node.text.as_deref().unwrap_or(""),
            item.node.resource_id.as_deref().unwrap_or(""),
            item.node.content_desc.as_deref().unwrap_or("")
        );
    }
    Ok(())
}
