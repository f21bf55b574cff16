use anyhow::{anyhow, Result};
use graph_node_editor::{serialization, GraphStore, GitHubHost, PublishPipeline, Settings};
use std::path::{Path, PathBuf};

const DEFAULT_DOCUMENT: &str = "data/nodes.json";
const DEFAULT_SETTINGS: &str = "settings.json";

fn main() -> Result<()> {
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?.start()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let document_path = PathBuf::from(
        args.first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_DOCUMENT),
    );

    let store = GraphStore::load_from_path(&document_path);
    print_summary(&store);

    match args.get(1).map(String::as_str) {
        None | Some("summary") => Ok(()),
        Some("export") => {
            let out = args
                .get(2)
                .ok_or_else(|| anyhow!("usage: graph_node_editor <nodes.json> export <out>"))?;
            serialization::save_snapshot(Path::new(out), &store.export())?;
            println!("Exported snapshot to {out}");
            Ok(())
        }
        Some("publish") => publish(&store),
        Some(other) => Err(anyhow!(
            "unknown command `{other}`; expected summary, export or publish"
        )),
    }
}

fn print_summary(store: &GraphStore) {
    println!("Nodes: {}", store.len());
    println!("Edges: {}", graph_node_editor::view::edge_list(store).len());
    for node in store.nodes() {
        println!(
            "  {:<20} {:>3},{:>3}  {}  ({} connections)",
            node.id,
            node.x,
            node.y,
            node.hemisphere,
            node.connections.len()
        );
    }
}

fn publish(store: &GraphStore) -> Result<()> {
    let mut settings = Settings::load(Path::new(DEFAULT_SETTINGS))?;
    if let Ok(token) = std::env::var("GITHUB_TOKEN") {
        if !token.is_empty() {
            settings.token = Some(token);
        }
    }

    if !settings.is_configured() {
        return Err(anyhow!(
            "no access token configured; set GITHUB_TOKEN or add one to {DEFAULT_SETTINGS}"
        ));
    }

    let pipeline = PublishPipeline::new(GitHubHost::new(settings)?);
    let snapshot = store.export();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(pipeline.publish(&snapshot))
        .map_err(|err| anyhow!("publish failed: {err}"))?;

    println!("Published {} nodes", snapshot.nodes.len());
    Ok(())
}
