use clap::Parser;
use tracing::info;

use winhop::aggregate::{aggregate, SourceResults};
use winhop::alfred::Document;
use winhop::config::Config;
use winhop::search::search;
use winhop::windows::visible_windows;
use winhop::{browser, favicon, logging, platform};

/// Alfred script-filter backend: search open windows, browser tabs, or
/// running applications.
#[derive(Parser, Debug)]
#[command(name = "winhop", disable_help_subcommand = true)]
struct Cli {
    /// Search open windows
    #[arg(
        long = "win",
        value_name = "QUERY",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with_all = ["tab", "app"]
    )]
    win: Option<String>,

    /// Search browser tabs
    #[arg(
        long = "tab",
        value_name = "QUERY",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with_all = ["win", "app"]
    )]
    tab: Option<String>,

    /// Search running applications
    #[arg(
        long = "app",
        value_name = "QUERY",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with_all = ["win", "tab"]
    )]
    app: Option<String>,
}

fn print_usage() {
    println!("Usage:");
    println!("[--win=<query>] | [--tab=<query>] | [--app=<query>]");
}

fn main() {
    let _guard = logging::init();

    if let Err(err) = platform::check_screen_recording_permission() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            print_usage();
            std::process::exit(1);
        }
    };

    let config = Config::from_env();

    let document = match (&cli.win, &cli.tab, &cli.app) {
        (Some(query), None, None) => window_search(query),
        (None, Some(query), None) => tab_search(&config, query),
        (None, None, Some(query)) => app_search(query),
        _ => {
            print_usage();
            std::process::exit(1);
        }
    };

    println!("{}", document.to_json());
}

fn window_search(query: &str) -> Document {
    let windows = visible_windows(platform::list_windows());
    info!(count = windows.len(), query, "searching windows");
    let matched = search(windows, query);
    Document::new(aggregate(vec![SourceResults::Windows(matched)]))
}

fn tab_search(config: &Config, query: &str) -> Document {
    let mut sources = Vec::new();
    for bundle_id in browser::BROWSER_BUNDLE_IDS {
        let Some(windows) = platform::browser_windows(bundle_id) else {
            continue;
        };
        let tabs = browser::collect_tabs(windows);
        info!(bundle_id = %bundle_id, count = tabs.len(), query, "searching tabs");
        let mut matched = search(tabs, query);
        favicon::resolve_icons(config, &mut matched);
        sources.push(SourceResults::Tabs(matched));
    }
    Document::new(aggregate(sources))
}

fn app_search(query: &str) -> Document {
    let apps = platform::running_apps();
    info!(count = apps.len(), query, "searching running applications");
    let matched = search(apps, query);
    Document::new(aggregate(vec![SourceResults::Apps(matched)]))
}
