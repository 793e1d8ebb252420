//! CLI probe for the organization forest core.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `orgtree_core` linkage.
//! - Load and print a live forest when an API URL is supplied.

use orgtree_core::{
    default_log_level, init_logging, HttpOrganizationRepository, OrganizationForest,
};

#[tokio::main]
async fn main() {
    if let Ok(log_dir) = std::env::var("ORGTREE_LOG_DIR") {
        if let Err(message) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {message}");
        }
    }

    let Some(api_url) = std::env::args().nth(1) else {
        println!("orgtree_core ping={}", orgtree_core::ping());
        println!("orgtree_core version={}", orgtree_core::core_version());
        println!("usage: orgtree_cli <organization-api-url>");
        return;
    };

    let repo = HttpOrganizationRepository::new(api_url);
    match OrganizationForest::load(repo).await {
        Ok(forest) => {
            for node in forest.iter() {
                let indent = "  ".repeat(node.depth().max(0) as usize);
                println!("{indent}{} (#{})", node.name(), node.id());
            }
            println!("{} units", forest.len());
        }
        Err(err) => {
            eprintln!("failed to load organization forest: {err}");
            std::process::exit(1);
        }
    }
}
