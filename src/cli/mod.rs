use std::env;
use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde::Serialize;

use crate::config::resolve::{load_manifest, resolve_manifest};
use crate::core::map::OrderedMap;
use crate::core::step::Step;
use crate::error::{PrecedenceError, Result};
use crate::graph::builder::build_map;
use crate::graph::viz;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "precedence")]
#[command(about = "Order named steps by their before/after constraints", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    /// Disable colored output. `NO_COLOR` set to anything but a falsey value also disables it.
    #[arg(
        long,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Order(OrderArgs),
    Graph(GraphArgs),
    Check(CheckArgs),
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct OrderArgs {
    #[arg(long)]
    pub json: bool,
    #[arg(short = 'l', long)]
    pub long: bool,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[arg(long)]
    pub json: bool,
    /// Treat steps that are referenced but never defined as errors.
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

pub fn run() {
    let cli = Cli::parse();
    output::configure(cli.verbose, cli.quiet, cli.no_color);
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Order(args) => handle_order(args, cli.manifest),
        Commands::Graph(args) => handle_graph(args, cli.manifest),
        Commands::Check(args) => handle_check(args, cli.manifest),
        Commands::Completions(args) => handle_completions(args),
    }
}

fn load_steps(manifest: Option<PathBuf>) -> Result<OrderedMap<Step>> {
    let cwd = env::current_dir()?;
    let path = resolve_manifest(&cwd, manifest)?;
    output::debug(&format!("using manifest {}", path.display()));
    let manifest = load_manifest(&path)?;
    output::debug(&format!(
        "loaded {} step(s) from {} include pattern(s)",
        manifest.steps.len(),
        manifest.include.len()
    ));
    build_map(&manifest)
}

#[derive(Serialize)]
struct OrderEntry<'a> {
    name: &'a str,
    defined: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    run: Option<&'a str>,
}

fn handle_order(args: OrderArgs, manifest: Option<PathBuf>) -> Result<()> {
    let map = load_steps(manifest)?;

    if args.json {
        let json = if args.long {
            let entries: Vec<OrderEntry<'_>> = map
                .entries()
                .into_iter()
                .map(|(name, step)| OrderEntry {
                    name,
                    defined: step.is_some(),
                    run: step.and_then(|step| step.run.as_deref()),
                })
                .collect();
            serde_json::to_string_pretty(&entries)
        } else {
            serde_json::to_string_pretty(&map.keys())
        };
        println!(
            "{}",
            json.map_err(|err| PrecedenceError::Other(anyhow::Error::new(err)))?
        );
        return Ok(());
    }

    map.each(|name, step| {
        if !args.long {
            println!("{}", name);
            return;
        }
        match step {
            Some(step) => println!("{}\t{}", name, step.run.as_deref().unwrap_or("-")),
            None => println!("{}\t(undefined)", name),
        }
    });
    Ok(())
}

fn handle_graph(args: GraphArgs, manifest: Option<PathBuf>) -> Result<()> {
    let map = load_steps(manifest)?;
    let store = map.store();
    let mut labels = viz::default_labels(store);
    for vertex in store.vertices() {
        if vertex.value.is_none() {
            labels[vertex.index] = format!("{} (undefined)", vertex.key);
        }
    }

    match args.format.to_ascii_lowercase().as_str() {
        "tree" => {
            print!("{}", viz::render_tree(store, &labels));
            Ok(())
        }
        "flat" => {
            print!("{}", viz::render_flat(store, &labels));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(store, &labels));
            Ok(())
        }
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&viz::graph_to_json(store))
                    .map_err(|err| PrecedenceError::Other(anyhow::Error::new(err)))?
            );
            Ok(())
        }
        other => Err(PrecedenceError::Other(anyhow::anyhow!(format!(
            "unknown graph format '{}'",
            other
        )))),
    }
}

#[derive(Serialize)]
struct CheckReport<'a> {
    steps: usize,
    undefined: Vec<&'a str>,
}

fn handle_check(args: CheckArgs, manifest: Option<PathBuf>) -> Result<()> {
    let map = load_steps(manifest)?;
    let report = CheckReport {
        steps: map.len(),
        undefined: map.placeholders(),
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report)
                .map_err(|err| PrecedenceError::Other(anyhow::Error::new(err)))?
        );
    } else {
        for name in &report.undefined {
            output::warn(&format!(
                "step '{}' is referenced but never defined",
                name
            ));
        }
    }

    if args.strict && !report.undefined.is_empty() {
        return Err(PrecedenceError::Other(anyhow::anyhow!(format!(
            "{} undefined step(s): {}",
            report.undefined.len(),
            report.undefined.join(", ")
        ))));
    }

    if !args.json {
        output::success(&format!("ok: {} step(s), no cycles", report.steps));
    }
    Ok(())
}

fn handle_completions(args: CompletionsArgs) -> Result<()> {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "precedence", &mut io::stdout());
    Ok(())
}
