use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use repoguard::config::InstrumentConfig;
use repoguard::{ArtifactDescriptor, GuardSession};
use serde::Deserialize;
use std::path::Path;

/// On-disk snapshot of one build invocation: what the user asked the build
/// tool to run, what the project produces, and the plugin configuration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    requested_goals: Vec<String>,
    artifact: ArtifactDescriptor,
    #[serde(default)]
    config: InstrumentConfig,
}

fn load_session(path: &str) -> anyhow::Result<GuardSession> {
    let raw = std::fs::read_to_string(Path::new(path))
        .with_context(|| format!("failed to read session file '{path}'"))?;
    let file: SessionFile = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse session file '{path}'"))?;
    let packaging = file.artifact.packaging.clone();
    Ok(GuardSession::new(
        file.requested_goals,
        packaging,
        file.artifact,
        file.config.pollution_policy(),
    ))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("repoguard")
        .version("0.1.0")
        .about("Repository pollution protection for instrumented builds")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("check")
                .about("Run the pollution-protection guard against a build session")
                .arg(
                    Arg::new("session")
                        .long("session")
                        .required(true)
                        .help("Path to a JSON build-session snapshot"),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .action(ArgAction::SetTrue)
                        .help("Suppress the pass message"),
                ),
        )
        .subcommand(
            Command::new("plan")
                .about("Print the resolved build plan for a session")
                .arg(
                    Arg::new("session")
                        .long("session")
                        .required(true)
                        .help("Path to a JSON build-session snapshot"),
                ),
        );

    match cli.get_matches().subcommand() {
        Some(("check", args)) => {
            let path = args.get_one::<String>("session").expect("required arg");
            let quiet = args.get_flag("quiet");
            let session = load_session(path)?;
            match session.run() {
                Ok(()) => {
                    if !quiet {
                        println!("OK: no pollution risk detected");
                    }
                }
                Err(violation) => {
                    eprintln!("{violation}");
                    std::process::exit(1);
                }
            }
        }
        Some(("plan", args)) => {
            let path = args.get_one::<String>("session").expect("required arg");
            let session = load_session(path)?;
            for goal in session.plan().iter() {
                println!("{goal}");
            }
        }
        _ => {}
    }

    Ok(())
}
