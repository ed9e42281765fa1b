use gh_project_fields::cli::{self, CliOptions};
use gh_project_fields::output;
use gh_project_fields::{Config, ProjectFieldResolver, ProjectIdentity};
use log::debug;
use std::io::Write;

#[tokio::main(flavor = "current_thread")] // two sequential calls, nothing to parallelize
async fn main() -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches();
    let opts = CliOptions::from_matches(&matches)?;

    cli::init_logging(opts.log_level.as_deref());

    let mut cfg = Config::new(opts.token);
    if let Some(url) = &opts.graphql_url {
        cfg = cfg.with_graphql_url(url);
    }
    let project = ProjectIdentity::new(opts.org, opts.project);

    let result = match ProjectFieldResolver::new(cfg) {
        Ok(resolver) => resolver.resolve(&project).await,
        Err(e) => Err(e),
    };
    let resolved = match result {
        Ok(r) => r,
        Err(e) => {
            debug!("resolution failed: {:?}", e);
            eprintln!("{}", e.diagnostic());
            std::process::exit(1);
        }
    };

    let text = output::render(&resolved, opts.format)?;
    let mut out = std::io::stdout();
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}
