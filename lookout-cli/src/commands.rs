//! CLI command implementations.

use crate::config::CliConfig;
use crate::pick::{parse_line, PickInput};
use clap::Args;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use lookout_core::GraphNode;
use lookout_graph::{
    highlight, load_graph, ExploreGraph, GraphStore, NodeMatch, RelationshipDirection,
    SearchIndex, SearchSession, Selection, NO_RESULTS_TEXT,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Where to read the graph from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// Graph JSON file (a graph response or a bare `{ id: node }` object)
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Name of a stored snapshot
    #[arg(short, long)]
    pub snapshot: Option<String>,
}

/// Write a default config file.
pub fn init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        println!("{} Already initialized", "✓".green());
        return Ok(());
    }

    CliConfig::default().write_to(config_path)?;

    println!("{} Wrote {}", "✓".green(), config_path.display());
    println!("  Run {} to store a graph", "lookout import".cyan());

    Ok(())
}

/// Print the nodes matching `query`.
pub fn search(
    config: &CliConfig,
    source: &SourceArgs,
    query: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let graph = load_source(config, source)?;
    let index = SearchIndex::new(graph.current_nodes());
    let results = index.search(query);
    let limit = limit.unwrap_or(config.display_limit);

    if json {
        let shown: Vec<&NodeMatch<'_>> = results.iter().take(limit).collect();
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    if results.is_empty() {
        if !query.is_empty() {
            println!("{}", NO_RESULTS_TEXT.dimmed());
        }
        return Ok(());
    }

    println!("Found {} matches:\n", results.len());
    print_results(&results, query, limit, None);

    Ok(())
}

/// Run an interactive search session on stdin.
pub fn pick(config: &CliConfig, source: &SourceArgs) -> Result<()> {
    let graph = load_source(config, source)?;
    let limit = config.display_limit;

    let mut session = SearchSession::new(graph.current_nodes(), |selection: &Selection| {
        match serde_json::to_string_pretty(selection) {
            Ok(json) => println!("{}", json),
            Err(e) => warn!("Could not encode selection {}: {}", selection.id, e),
        }
    });

    println!(
        "Type to search. {} {} {} {} {} {}",
        "/down".cyan(),
        "/up".cyan(),
        "/enter".cyan(),
        "/click N".cyan(),
        "/reset".cyan(),
        "/quit".cyan()
    );
    render_session(&session, limit);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let event = match parse_line(&line) {
            Ok(PickInput::Event(event)) => event,
            Ok(PickInput::Quit) => break,
            Err(e) => {
                eprintln!("{} {}", "error:".red().bold(), e);
                continue;
            }
        };

        if let Some(selection) = session.dispatch(event) {
            info!("Selected {} ({})", selection.node.display_text(), selection.id);
            return Ok(());
        }
        render_session(&session, limit);
    }

    Ok(())
}

/// Print one node and its relationships.
pub fn show(config: &CliConfig, source: &SourceArgs, id: &str) -> Result<()> {
    let graph = load_source(config, source)?;
    let node = graph
        .get_by_id(id)
        .ok_or_else(|| format!("no node with id {id}"))?;

    print_node(id, node);

    let relationships = graph.relationships(id);
    if relationships.is_empty() {
        println!("\n  {}", "No relationships".dimmed());
        return Ok(());
    }

    println!("\n  Relationships:");
    for rel in relationships {
        let peer = graph
            .get_by_id(&rel.peer)
            .map(|n| n.display_text().to_string())
            .unwrap_or_else(|| rel.peer.clone());
        let arrow = match rel.direction {
            RelationshipDirection::Outbound => "→",
            RelationshipDirection::Inbound => "←",
        };
        println!("    {} {} {}", arrow, rel.kind.yellow(), peer.cyan());
    }

    Ok(())
}

/// Store a graph file as a named snapshot.
pub fn import(config: &CliConfig, file: &Path, name: &str) -> Result<()> {
    let graph = load_file(file)?;
    let store = open_store(config)?;
    store.save(name, &graph)?;

    let stats = graph.stats();
    println!(
        "{} Stored {} ({} nodes, {} edges, {} tier zero)",
        "✓".green(),
        name.cyan(),
        stats.node_count,
        stats.edge_count,
        stats.tier_zero
    );
    Ok(())
}

/// List stored snapshots.
pub fn snapshots(config: &CliConfig) -> Result<()> {
    let store = open_store(config)?;
    let names = store.list()?;

    if names.is_empty() {
        println!("No snapshots stored");
        return Ok(());
    }
    for name in names {
        println!("  {}", name.cyan());
    }
    Ok(())
}

/// Delete a stored snapshot.
pub fn forget(config: &CliConfig, name: &str) -> Result<()> {
    let store = open_store(config)?;
    if store.remove(name)? {
        println!("{} Removed {}", "✓".green(), name.cyan());
    } else {
        println!("{} No snapshot named {}", "⚠".yellow(), name);
    }
    Ok(())
}

fn open_store(config: &CliConfig) -> Result<GraphStore> {
    let dir = config
        .store_dir()
        .ok_or("could not determine a store directory; set store_path in the config")?;
    Ok(GraphStore::open(dir)?)
}

fn load_source(config: &CliConfig, source: &SourceArgs) -> Result<ExploreGraph> {
    match (&source.file, &source.snapshot) {
        (Some(file), _) => load_file(file),
        (None, Some(name)) => open_store(config)?
            .load(name)?
            .ok_or_else(|| format!("no snapshot named {name}").into()),
        (None, None) => Err("pass --file or --snapshot".into()),
    }
}

fn load_file(path: &Path) -> Result<ExploreGraph> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Loading {}...", path.display()));

    let graph = load_graph(path);
    spinner.finish_and_clear();
    Ok(graph?)
}

fn render_session<F>(session: &SearchSession<F>, limit: usize)
where
    F: FnMut(&Selection),
{
    let state = session.state();
    println!();
    if let Some(text) = state.empty_results_text() {
        println!("  {}", text.dimmed());
    } else {
        print_results(&session.results(), state.query(), limit, state.highlighted());
    }
    print!("{} ", ">".cyan().bold());
    let _ = io::stdout().flush();
}

fn print_results(results: &[NodeMatch<'_>], keyword: &str, limit: usize, highlighted: Option<usize>) {
    for (position, m) in results.iter().enumerate().take(limit) {
        let marker = if highlighted == Some(position) { "›" } else { " " };
        let text: String = highlight(m.node.display_text(), keyword)
            .iter()
            .map(|s| {
                if s.highlighted {
                    s.text.yellow().bold().to_string()
                } else {
                    s.text.to_string()
                }
            })
            .collect();
        let tier_zero = if m.node.is_tier_zero { " ★".red().to_string() } else { String::new() };

        println!(
            "{} {:>3}. {} {}{} {}",
            marker.cyan().bold(),
            position + 1,
            m.node.kind.icon(),
            text,
            tier_zero,
            format!("({} {})", m.node.kind, m.node.object_id).dimmed()
        );
    }
    if results.len() > limit {
        println!("  ... and {} more", results.len() - limit);
    }
}

fn print_node(id: &str, node: &GraphNode) {
    println!("{} {}", node.kind.icon(), node.display_text().cyan().bold());
    println!("  {:<11} {}", "id".dimmed(), id);
    println!("  {:<11} {}", "kind".dimmed(), node.kind);
    println!("  {:<11} {}", "object id".dimmed(), node.object_id);
    println!(
        "  {:<11} {}",
        "tier zero".dimmed(),
        if node.is_tier_zero { "yes".red().to_string() } else { "no".to_string() }
    );
    match node.last_seen_at() {
        Some(ts) => println!("  {:<11} {}", "last seen".dimmed(), ts.format("%Y-%m-%d %H:%M UTC")),
        None if !node.last_seen.is_empty() => {
            println!("  {:<11} {}", "last seen".dimmed(), node.last_seen)
        }
        None => {}
    }
}
