use crate::output::OutputFormat;
use anyhow::anyhow;
use clap::{value_parser, Arg, ArgMatches, Command};
use url::Url;

pub struct CliOptions {
    pub token: String,
    pub org: String,
    pub project: i32,
    pub format: OutputFormat,
    pub log_level: Option<String>,
    pub graphql_url: Option<Url>,
}

pub fn build_cli() -> Command {
    Command::new("gh-project-fields")
        .about("Look up a GitHub Project (v2) id and its custom field ids")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("token")
                .long("token")
                .short('t')
                .required(true)
                .num_args(1)
                .help("GitHub personal access token"),
        )
        .arg(
            Arg::new("org")
                .long("org")
                .short('o')
                .required(true)
                .num_args(1)
                .help("GitHub organization name"),
        )
        .arg(
            Arg::new("project")
                .long("project")
                .short('p')
                .required(true)
                .num_args(1)
                .allow_negative_numbers(true)
                .value_parser(value_parser!(i32))
                .help("GitHub project number"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .num_args(1)
                .default_value("pretty")
                .value_parser(value_parser!(OutputFormat))
                .help("Output format"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .num_args(1)
                .help("Override RUST_LOG level (e.g., info, debug)"),
        )
        .arg(
            Arg::new("graphql-url")
                .long("graphql-url")
                .num_args(1)
                .hide(true)
                .value_parser(value_parser!(Url))
                .help("GraphQL endpoint (defaults to api.github.com)"),
        )
}

impl CliOptions {
    pub fn from_matches(matches: &ArgMatches) -> anyhow::Result<Self> {
        let missing = |id: &str| anyhow!("missing --{}", id);
        let string = |id: &str| matches.get_one::<String>(id).cloned().ok_or_else(|| missing(id));
        Ok(Self {
            token: string("token")?,
            org: string("org")?,
            project: matches
                .get_one::<i32>("project")
                .copied()
                .ok_or_else(|| missing("project"))?,
            format: matches
                .get_one::<OutputFormat>("format")
                .copied()
                .ok_or_else(|| missing("format"))?,
            log_level: matches.get_one::<String>("log-level").cloned(),
            graphql_url: matches.get_one::<Url>("graphql-url").cloned(),
        })
    }
}

pub fn init_logging(level: Option<&str>) {
    // Explicit level wins, then RUST_LOG, then warn. Logs go to stderr.
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(lvl) = level {
        builder.parse_filters(lvl);
    }
    builder.init();
}
