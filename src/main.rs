use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;
use docify::{
    analysis::GitHubAnalyzer,
    error::Result,
    generator::ReadmeGenerator,
    github::GitHubClient,
    logging,
    validation::parse_github_url,
    Config,
};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};

#[derive(Parser)]
#[command(author, version, about = "Generate README files for GitHub repositories", long_about = None)]
struct Cli {
    /// Config file (defaults to the per-user config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn", value_parser = logging::parse_log_level)]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a repository and print the result as JSON
    Analyze {
        /// GitHub repository URL
        url: String,
    },
    /// Generate a README for a repository
    Generate {
        /// GitHub repository URL
        url: String,
        /// Write the README to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List repositories the token owner can access
    Repos,
    /// Show the configured AI providers
    Providers,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "[ERROR]".bright_red(), e.to_string().bright_red());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    debug!("GitHub API base: {}", config.github.api_base);

    match cli.command {
        Command::Analyze { url } => {
            let (owner, repo) = parse_github_url(&url)?;
            let analyzer = GitHubAnalyzer::new(&config, config.github_token()?)?;

            let pb = create_spinner(format!("Analyzing {}/{}", owner, repo));
            let analysis = analyzer.analyze_repository(&owner, &repo).await;
            pb.finish_and_clear();

            println!("{}", serde_json::to_string_pretty(&analysis?)?);
        }
        Command::Generate { url, output } => {
            let (owner, repo) = parse_github_url(&url)?;
            let analyzer = GitHubAnalyzer::new(&config, config.github_token()?)?;
            let generator = ReadmeGenerator::from_config(&config)?;

            let pb = create_spinner(format!("Analyzing {}/{}", owner, repo));
            let analysis = analyzer.analyze_repository(&owner, &repo).await?;
            pb.set_message(format!(
                "Writing README with {}",
                generator.available_providers().join(" / ")
            ));
            let readme = generator.generate(&analysis).await;
            pb.finish_and_clear();
            let readme = readme?;

            match output {
                Some(path) => {
                    tokio::fs::write(&path, &readme.content).await?;
                    println!(
                        "{} {} {}",
                        "[SUCCESS]".bright_green(),
                        format!("README written by {} to", readme.provider).bright_white(),
                        path.display()
                    );
                }
                None => println!("{}", readme.content),
            }
        }
        Command::Repos => {
            let client = GitHubClient::new(&config.github, Some(config.github_token()?.to_string()))?;
            let user = client.get_authenticated_user().await?;
            let repositories = client.list_user_repositories().await?;

            println!(
                "{} {}",
                format!("{} repositories for", repositories.len()).bright_yellow(),
                user.login.bright_white().bold()
            );
            for repo in repositories {
                let visibility = if repo.private { "private".yellow() } else { "public".green() };
                println!(
                    "  {:<40} {:<8} {:<12} ★ {}",
                    repo.full_name.bright_white(),
                    visibility,
                    repo.language.as_deref().unwrap_or("Unknown").bright_cyan(),
                    repo.stargazers_count
                );
            }
        }
        Command::Providers => match ReadmeGenerator::from_config(&config) {
            Ok(generator) => {
                println!("{}", "Configured providers (in fallback order):".bright_yellow());
                for name in generator.available_providers() {
                    println!("  {}", name.bright_green());
                }
            }
            Err(e) => println!("{} {}", "[WARNING]".yellow(), e),
        },
    }

    Ok(())
}

fn create_spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style.tick_strings(&["-", "\\", "|", "/", "-", "\\", "|", "/"]));
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    pb
}
