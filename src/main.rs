use anyhow::Result;
use clap::{crate_version, App, AppSettings, Arg, SubCommand};
use frontpage::build::build_site;
use frontpage::config::Config;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let matches = App::new("frontpage")
        .version(crate_version!())
        .about("Builds a static blog from markdown posts")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("build")
                .about("Builds the site")
                .arg(
                    Arg::with_name("project")
                        .long("project")
                        .short("p")
                        .takes_value(true)
                        .help("The project directory (default: search upwards for site.yaml)"),
                )
                .arg(
                    Arg::with_name("output")
                        .long("output")
                        .short("o")
                        .takes_value(true)
                        .help("The output directory (default: `_site` in the project directory)"),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("build") {
        let project = match matches.value_of("project") {
            Some(dir) => PathBuf::from(dir),
            None => std::env::current_dir()?,
        };
        let config = Config::from_directory(&project, matches.value_of("output").map(Path::new))?;
        build_site(&config)?;
    }
    Ok(())
}
