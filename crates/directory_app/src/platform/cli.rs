use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use directory_core::{ItemKind, Labels, ListingConfig, SearchPolicy, DEFAULT_PAGE_SIZE};
use directory_engine::FetchSettings;
use log::LevelFilter;

use super::logging::LogDestination;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "directory",
    version,
    about = "Browse the places and events of a city directory from the terminal",
    long_about = "Interactive listing controller for a city directory backend.\n\
                  Search, filter by category, page through results and inspect \
                  the map plan of the current page. Type `help` once running."
)]
pub struct Cli {
    #[arg(
        short = 'b',
        long,
        value_name = "URL",
        default_value = "http://127.0.0.1:5000",
        help_heading = "Backend",
        help = "Base URL of the directory backend"
    )]
    pub base_url: String,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..),
        help_heading = "Backend",
        help = "Whole-request timeout for backend calls"
    )]
    pub timeout_secs: u64,

    #[arg(
        short = 'k',
        long,
        value_enum,
        default_value_t = KindArg::Places,
        help_heading = "Listing",
        help = "Which collection to browse"
    )]
    pub kind: KindArg,

    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..),
        help_heading = "Listing",
        help = "Default number of items per page"
    )]
    pub per_page: u32,

    #[arg(
        long,
        value_enum,
        default_value_t = LangArg::En,
        help_heading = "Listing",
        help = "Language of the interface texts"
    )]
    pub lang: LangArg,

    #[arg(
        long,
        value_enum,
        default_value_t = PolicyArg::Submit,
        help_heading = "Listing",
        help = "Commit search text only on submit, or on every edit"
    )]
    pub search_policy: PolicyArg,

    #[arg(
        short = 'q',
        long,
        value_name = "QUERY",
        help_heading = "State",
        help = "Start from this address query, e.g. 'search=kafe&page=2'"
    )]
    pub query: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        default_value = ".",
        help_heading = "State",
        help = "Directory the last view state is saved to"
    )]
    pub state_dir: PathBuf,

    #[arg(
        long,
        value_enum,
        default_value_t = LogArg::File,
        help_heading = "Output",
        help = "Where log lines go"
    )]
    pub log: LogArg,

    #[arg(
        short = 'v',
        long,
        action = clap::ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v debug, -vv trace)"
    )]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Places,
    Events,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangArg {
    En,
    Sr,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Submit,
    Live,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogArg {
    File,
    Terminal,
    Both,
}

impl Cli {
    pub fn item_kind(&self) -> ItemKind {
        match self.kind {
            KindArg::Places => ItemKind::Places,
            KindArg::Events => ItemKind::Events,
        }
    }

    pub fn listing_config(&self) -> ListingConfig {
        ListingConfig {
            kind: self.item_kind(),
            labels: match self.lang {
                LangArg::En => Labels::english(),
                LangArg::Sr => Labels::serbian(),
            },
            default_page_size: self.per_page,
            search_policy: match self.search_policy {
                PolicyArg::Submit => SearchPolicy::OnSubmit,
                PolicyArg::Live => SearchPolicy::Live,
            },
        }
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            request_timeout: Duration::from_secs(self.timeout_secs),
            ..FetchSettings::default()
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        match self.log {
            LogArg::File => LogDestination::File,
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::Both => LogDestination::Both,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
