use std::{env, io, process};

use tracing::error;

use omnibus::{
    artifact::Artifact,
    catalog::Catalog,
    executor::Executor,
    render::Layout,
    requests::{self, InputDocument},
    transit::{TransitGraph, paths::PathTable},
};

fn main() {
    // Stdout is reserved for the result document.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args: Vec<String> = env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("make_base") if args.len() == 2 => make_base(),
        Some("process_requests") if args.len() == 2 => process_requests(),
        _ => {
            eprintln!("Usage: omnibus [make_base|process_requests]");
            process::exit(5);
        }
    }
}

fn load_document() -> InputDocument {
    match requests::load(io::stdin().lock()) {
        Ok(document) => document,
        Err(err) => {
            error!("Failed to read the input document: {err}");
            process::exit(1);
        }
    }
}

/// Builds the catalog, graph, path table and layout, and freezes them to
/// the artifact file. Produces no stdout output.
fn make_base() {
    let document = load_document();
    let Some(routing) = document.routing_settings else {
        error!("make_base input carries no routing_settings");
        process::exit(1);
    };
    let Some(render) = document.render_settings else {
        error!("make_base input carries no render_settings");
        process::exit(1);
    };

    let catalog = match Catalog::build(&document.base_requests, &routing) {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("Failed to build the catalog: {err}");
            process::exit(1);
        }
    };
    let graph = match TransitGraph::build(&catalog) {
        Ok(graph) => graph,
        Err(err) => {
            error!("Failed to build the transit graph: {err}");
            process::exit(1);
        }
    };
    let table = PathTable::build(graph.graph());
    let layout = Layout::build(&catalog, &render);

    let artifact = Artifact::pack(&catalog, &graph, &table, &layout, &render);
    if let Err(err) = artifact.save(&document.serialization_settings.file) {
        error!(
            "Failed to write {:?}: {err}",
            document.serialization_settings.file
        );
        process::exit(1);
    }
}

/// Loads the artifact and answers the stat requests, one result per
/// request, in request order, as a single JSON array on stdout.
fn process_requests() {
    let document = load_document();
    let data = match Artifact::load(&document.serialization_settings.file) {
        Ok(data) => data,
        Err(err) => {
            error!(
                "Failed to load {:?}: {err}",
                document.serialization_settings.file
            );
            process::exit(1);
        }
    };

    let mut executor = Executor::new(&data);
    let results = executor.execute_all(&document.stat_requests);
    if let Err(err) = serde_json::to_writer(io::stdout().lock(), &results) {
        error!("Failed to write the results: {err}");
        process::exit(1);
    }
}
