use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use app_update::app::{Scheduler, UpdateReport, Updater};
use app_update::config::{self, DisplayConfig, UpdaterConfig};
use app_update::resolve::{AliasTable, Notification};
use app_update::source::{
    ChannelNotificationSink, FileManifestFetcher, HttpManifestFetcher, JsonFileSource,
    LogNotificationSink, ManifestCache, ManifestFetcher, NotificationSink, SoftwareEnumerator,
    enumerator::publisher_contains,
};
use clap::{Args, Parser, Subcommand};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "app-update")]
#[command(version, about = "Checks installed applications against a published release catalog")]
struct Cli {
    /// Configuration file (defaults to the per-user config path)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    options: CheckOptions,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one refresh cycle and print the result
    Check,
    /// Keep checking on the configured interval until interrupted
    Watch,
}

#[derive(Args)]
struct CheckOptions {
    /// Also list beta releases
    #[arg(long, global = true)]
    show_beta: bool,

    /// Also list releases older than the newest one
    #[arg(long, global = true)]
    show_older: bool,

    /// Manifest URL or file path, overriding the configuration
    #[arg(long, global = true)]
    manifest: Option<String>,

    /// JSON file listing installed software, overriding the configuration
    #[arg(long, global = true)]
    installed: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long, global = true)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = app_update::logging::init(&config::log_path(), cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let mut updater_config = UpdaterConfig::load(&config_path)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    apply_options(&mut updater_config, &cli.options);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    match cli.command.unwrap_or(Command::Check) {
        Command::Check => runtime.block_on(check(&updater_config, cli.options.json)),
        Command::Watch => runtime.block_on(watch(&updater_config)),
    }
}

fn apply_options(config: &mut UpdaterConfig, options: &CheckOptions) {
    config.display = DisplayConfig {
        show_beta_versions: config.display.show_beta_versions || options.show_beta,
        show_older_versions: config.display.show_older_versions || options.show_older,
    };
    if let Some(manifest) = &options.manifest {
        config.manifest.url = manifest.clone();
    }
    if let Some(installed) = &options.installed {
        config.installed_file = Some(installed.clone());
    }
}

async fn check(config: &UpdaterConfig, json: bool) -> anyhow::Result<()> {
    let mut updater = build_updater(config, Arc::new(LogNotificationSink))?;
    let report = updater.refresh_cycle().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

async fn watch(config: &UpdaterConfig) -> anyhow::Result<()> {
    let (notification_tx, mut notification_rx) = mpsc::unbounded_channel::<Notification>();
    tokio::spawn(async move {
        while let Some(notification) = notification_rx.recv().await {
            println!("{}: {}", notification.title, notification.body);
        }
    });

    let mut updater = build_updater(
        config,
        Arc::new(ChannelNotificationSink::new(notification_tx)),
    )?;
    let scheduler = Scheduler::from_config(config);
    let (handle, commands) = Scheduler::channel();

    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for interrupt: {}", e);
        }
        info!("Interrupted, shutting down");
        handle.shutdown();
    });

    scheduler
        .run(&mut updater, commands, |report| {
            println!(
                "[{}] {} update(s) available",
                report.checked_at.format("%Y-%m-%d %H:%M:%S"),
                report.update_count()
            );
        })
        .await;

    Ok(())
}

fn build_updater(
    config: &UpdaterConfig,
    sink: Arc<dyn NotificationSink>,
) -> anyhow::Result<Updater> {
    let primary = manifest_fetcher(&config.manifest.url)?;

    let mut enumerator = SoftwareEnumerator::new();
    match &config.installed_file {
        Some(path) => enumerator.add_source(Arc::new(JsonFileSource::new(path))),
        None => warn!("No installed software list configured, nothing will be matched"),
    }
    if let Some(publisher) = &config.publisher_filter {
        enumerator.add_filter(publisher_contains(publisher));
    }

    let aliases = match &config.bundle_aliases {
        Some(aliases) => AliasTable::new(aliases.clone()),
        None => AliasTable::default(),
    };

    let mut updater = Updater::new(primary, enumerator, sink)
        .with_display(config.display)
        .with_aliases(aliases);

    if let Some(cache) = open_cache() {
        updater = updater.with_cache(Arc::new(cache));
    }

    if !config.manifest.fallback_paths.is_empty() {
        updater = updater.with_fallback(Arc::new(FileManifestFetcher::new(
            config.manifest.fallback_paths.clone(),
        )));
    }

    Ok(updater)
}

fn manifest_fetcher(location: &str) -> anyhow::Result<Arc<dyn ManifestFetcher>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let fetcher = HttpManifestFetcher::new(location)
            .with_context(|| format!("Failed to create HTTP client for {}", location))?;
        Ok(Arc::new(fetcher))
    } else {
        Ok(Arc::new(FileManifestFetcher::new(vec![PathBuf::from(
            location,
        )])))
    }
}

fn open_cache() -> Option<ManifestCache> {
    let data_dir = config::data_dir();
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        warn!("Failed to create data directory {:?}: {}", data_dir, e);
        return None;
    }

    ManifestCache::new(&config::db_path())
        .inspect_err(|e| error!("Failed to open manifest cache: {}", e))
        .ok()
}

fn print_report(report: &UpdateReport) {
    print!("{}", render_report(report));
}

fn render_report(report: &UpdateReport) -> String {
    let mut out = String::new();

    if report.installed.is_empty() {
        out.push_str("No managed applications installed.\n");
    } else {
        out.push_str("Installed:\n");
        for component in &report.installed {
            let _ = writeln!(
                out,
                "  {} {} (latest {})",
                component.name, component.version, component.latest_version
            );
        }
    }

    if !report.manifest_updated() {
        out.push_str("(no manifest could be loaded)\n");
    }

    if report.entries.is_empty() {
        out.push_str("No releases to show.\n");
        return out;
    }

    out.push_str("Releases:\n");
    for entry in &report.entries {
        let mut tags = Vec::new();
        if entry.has_update {
            tags.push("update");
        }
        if entry.beta {
            tags.push("beta");
        }
        if entry.is_older_version {
            tags.push("older");
        }
        let tags = if tags.is_empty() {
            String::new()
        } else {
            format!(" [{}]", tags.join(", "))
        };

        let _ = writeln!(out, "  {} {}{}", entry.name, entry.version, tags);
        if !entry.url.is_empty() {
            let _ = writeln!(out, "    download: {}", entry.url);
        }
        if !entry.release_note_url.is_empty() {
            let _ = writeln!(out, "    release notes: {}", entry.release_note_url);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use app_update::app::ManifestOrigin;
    use app_update::resolve::{InstalledComponent, UpdateEntry};
    use chrono::Utc;

    fn report(manifest_origin: Option<ManifestOrigin>) -> UpdateReport {
        UpdateReport {
            entries: Vec::new(),
            installed: vec![InstalledComponent {
                name: "OXYGEN".to_string(),
                version: "7.1.1".to_string(),
                publisher: "DEWETRON GmbH".to_string(),
                latest_version: String::new(),
            }],
            manifest_origin,
            notified: 0,
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn render_report_says_when_no_manifest_was_loaded() {
        let rendered = render_report(&report(None));

        assert!(rendered.contains("(no manifest could be loaded)"));
        assert!(!rendered.contains("last known catalog"));
        assert!(rendered.ends_with("No releases to show.\n"));
    }

    #[test]
    fn render_report_lists_tagged_releases() {
        let mut report = report(Some(ManifestOrigin::Fallback));
        report.entries.push(UpdateEntry {
            name: "OXYGEN".to_string(),
            version: "7.2.0".to_string(),
            url: "https://example.com/oxygen.exe".to_string(),
            has_update: true,
            ..Default::default()
        });

        let rendered = render_report(&report);

        assert!(!rendered.contains("no manifest"));
        assert!(rendered.contains("  OXYGEN 7.2.0 [update]\n"));
        assert!(rendered.contains("    download: https://example.com/oxygen.exe\n"));
    }
}
