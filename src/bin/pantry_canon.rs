//! pantry-canon command line
//!
//! Resolves and merges ingredients against a JSON snapshot file.

use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use pantry_canon::{
    CallContext, InMemoryIngredientStore, IngredientCatalog, IngredientId, ResolverConfig,
};

#[derive(Debug, PartialEq)]
enum Command {
    Resolve(Vec<String>),
    Merge { winner: String, loser: String },
    List,
}

/// CLI configuration
#[derive(Debug)]
struct Config {
    /// Snapshot file
    data: PathBuf,
    /// Threshold from `--threshold`, overriding the environment
    threshold: Option<String>,
    command: Command,
}

fn usage() {
    println!("pantry-canon - canonical ingredient resolution");
    println!();
    println!("USAGE:");
    println!("    pantry-canon [OPTIONS] <COMMAND>");
    println!();
    println!("COMMANDS:");
    println!("    resolve <NAME>...          Resolve names, creating records as needed");
    println!("    merge <WINNER> <LOSER>     Fold LOSER into WINNER");
    println!("    list                       Print every canonical record");
    println!();
    println!("OPTIONS:");
    println!("    -d, --data <PATH>          Snapshot file [default: ./pantry.json]");
    println!("    -t, --threshold <T>        Fuzzy match threshold [env: RESOLVE_THRESHOLD, default: 0.8]");
    println!("    -h, --help                 Print help information");
}

/// Parses arguments after the program name. `Ok(None)` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Config>, String> {
    let mut data = PathBuf::from("./pantry.json");
    let mut threshold = None;
    let mut rest: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data" | "-d" => {
                let value = args.get(i + 1).ok_or("--data requires a value")?;
                data = PathBuf::from(value);
                i += 2;
            }
            "--threshold" | "-t" => {
                let value = args.get(i + 1).ok_or("--threshold requires a value")?;
                threshold = Some(value.clone());
                i += 2;
            }
            "--help" | "-h" => return Ok(None),
            _ => {
                rest.extend_from_slice(&args[i..]);
                break;
            }
        }
    }

    let mut rest = rest.into_iter();
    let command = match rest.next().as_deref() {
        Some("resolve") => {
            let names: Vec<String> = rest.collect();
            if names.is_empty() {
                return Err("resolve requires at least one name".to_string());
            }
            Command::Resolve(names)
        }
        Some("merge") => match (rest.next(), rest.next(), rest.next()) {
            (Some(winner), Some(loser), None) => Command::Merge { winner, loser },
            _ => return Err("merge requires exactly <WINNER> <LOSER>".to_string()),
        },
        Some("list") => match rest.next() {
            None => Command::List,
            Some(extra) => return Err(format!("list takes no arguments, got {extra:?}")),
        },
        Some(other) => return Err(format!("unknown command: {other}")),
        None => return Err("missing command (try --help)".to_string()),
    };

    Ok(Some(Config {
        data,
        threshold,
        command,
    }))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match parse_args(&args) {
        Ok(Some(config)) => config,
        Ok(None) => {
            usage();
            return Ok(());
        }
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    let resolver_config = match config.threshold.as_deref() {
        Some(raw) => ResolverConfig::parse(raw)?,
        None => ResolverConfig::from_env()?,
    };

    let store = Arc::new(InMemoryIngredientStore::open_or_default(&config.data)?);
    let catalog = IngredientCatalog::new(Arc::clone(&store), resolver_config);
    let ctx = CallContext::background();

    match config.command {
        Command::Resolve(names) => {
            let mut created = false;
            for name in names {
                let resolution = catalog.resolve(&ctx, &name)?;
                created |= resolution.created;
                println!("{}", serde_json::to_string(&resolution)?);
            }
            if created {
                store.save_to(&config.data)?;
            }
        }
        Command::Merge { winner, loser } => {
            let winner = IngredientId::parse(&winner)?;
            let loser = IngredientId::parse(&loser)?;
            let merged = catalog.merge(&ctx, winner, loser)?;
            store.save_to(&config.data)?;
            println!("{}", serde_json::to_string_pretty(&merged)?);
        }
        Command::List => {
            for ingredient in catalog.list(&ctx)? {
                println!("{}", serde_json::to_string(&ingredient)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| (*a).to_string()).collect()
    }

    #[test]
    fn parses_options_before_command() {
        let config = parse_args(&args(&["-d", "/tmp/p.json", "--threshold", "0.7", "resolve", "Garlic", "salt"]))
            .unwrap()
            .unwrap();
        assert_eq!(config.data, PathBuf::from("/tmp/p.json"));
        assert_eq!(config.threshold.as_deref(), Some("0.7"));
        assert_eq!(
            config.command,
            Command::Resolve(vec!["Garlic".to_string(), "salt".to_string()])
        );
    }

    #[test]
    fn defaults_and_other_commands() {
        let config = parse_args(&args(&["list"])).unwrap().unwrap();
        assert_eq!(config.data, PathBuf::from("./pantry.json"));
        assert!(config.threshold.is_none());
        assert_eq!(config.command, Command::List);

        let config = parse_args(&args(&["merge", "a", "b"])).unwrap().unwrap();
        assert_eq!(
            config.command,
            Command::Merge {
                winner: "a".to_string(),
                loser: "b".to_string()
            }
        );

        assert!(parse_args(&args(&["-h"])).unwrap().is_none());
        assert!(parse_args(&args(&["-t", "0.5", "--help", "list"])).unwrap().is_none());
    }

    #[test]
    fn rejects_bad_invocations() {
        for bad in [
            &[][..],
            &["resolve"][..],
            &["merge", "a"][..],
            &["merge", "a", "b", "c"][..],
            &["frobnicate"][..],
            &["--data"][..],
            &["list", "--threshold"][..],
        ] {
            assert!(parse_args(&args(bad)).is_err(), "{bad:?} accepted");
        }
    }
}
