mod app;
mod backend;
mod config;
mod dashboard;
mod error;
mod events;
mod state;
mod ui;
mod utils;

use anyhow::Result;
use app::{App, StartOptions};
use clap::{App as CliApp, Arg};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = CliApp::new("picboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Terminal dashboard for person-in-charge weekly report tracking")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding the configuration file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("department")
                .short("d")
                .long("department")
                .value_name("ID")
                .help("Scope the initial load to one department id")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("department-name")
                .long("department-name")
                .value_name("NAME")
                .help("Scope the initial load to one department by name")
                .takes_value(true)
                .conflicts_with("department"),
        )
        .arg(
            Arg::with_name("search")
                .short("s")
                .long("search")
                .value_name("QUERY")
                .help("Pre-fill the people search query")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    let department_id = match matches.value_of("department") {
        Some(raw) => Some(raw.parse::<i64>()?),
        None => None,
    };
    let options = StartOptions {
        department_id,
        department_name: matches.value_of("department-name").map(str::to_string),
        search: matches.value_of("search").map(str::to_string),
    };

    App::start(config, options).await
}
