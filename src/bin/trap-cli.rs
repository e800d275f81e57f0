//! Offline operator CLI: validate rules files, dry-run identities against
//! them, and inspect the bundled payload registry.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crawler_trap::bombs::registry;
use crawler_trap::config::directive;
use crawler_trap::rules::RuleSet;

#[derive(Parser)]
#[command(name = "trap-cli")]
#[command(about = "Management CLI for the crawler trap", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a rules file
    Check {
        /// Rules file containing the trap directive block
        rules_file: PathBuf,
    },
    /// Evaluate an identity and path against a rules file
    TestUa {
        /// Rules file containing the trap directive block
        rules_file: PathBuf,
        /// Declared identity (User-Agent) to evaluate
        user_agent: String,
        /// Request path to evaluate
        #[arg(default_value = "/")]
        path: String,
    },
    /// List bundled payloads
    Bombs,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { rules_file } => {
            let rules = match load_rules(&rules_file) {
                Ok(rules) => rules,
                Err(code) => return code,
            };
            let counts = rules.counts();
            println!("rules OK: bomb={}", rules.bomb);
            println!(
                "  {} exact, {} contains, {} regexp, {} public",
                counts.exact, counts.fragments, counts.patterns, counts.public
            );
            if !registry::exists(&rules.bomb) {
                println!(
                    "  note: '{}' is not a bundled payload, will be read from the filesystem",
                    rules.bomb
                );
            }
            ExitCode::SUCCESS
        }
        Commands::TestUa {
            rules_file,
            user_agent,
            path,
        } => {
            let rules = match load_rules(&rules_file) {
                Ok(rules) => rules,
                Err(code) => return code,
            };
            if rules.is_path_exempt(&path) {
                println!("exempt: path matches a public pattern, request is forwarded");
            } else if rules.is_blocked(&user_agent) {
                println!("blocked: would serve payload '{}'", rules.bomb);
            } else {
                println!("allowed: request is forwarded");
            }
            ExitCode::SUCCESS
        }
        Commands::Bombs => {
            for name in registry::NAMES {
                // Unwrap is fine: NAMES only lists entries the registry has.
                let blob = registry::read(name).unwrap();
                println!("{name}\t{} bytes compressed", blob.len());
            }
            ExitCode::SUCCESS
        }
    }
}

fn load_rules(path: &Path) -> Result<RuleSet, ExitCode> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("error: failed to read {}: {error}", path.display());
            return Err(ExitCode::FAILURE);
        }
    };
    directive::parse(&text).map_err(|error| {
        eprintln!("error: {error}");
        ExitCode::FAILURE
    })
}
