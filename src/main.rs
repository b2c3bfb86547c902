use anyhow::Result;
use std::env;
use std::sync::Arc;

use soporte_tecnico::{Config, RequestWorkflow, SqliteStore, StoreResolver};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().collect();
    let config = Config::from_env()?;

    match args.get(1).map(String::as_str) {
        Some("init") => run_init(&config)?,
        Some("summary") | None => run_summary(&config)?,
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            eprintln!("   Usage: soporte-tecnico [init|summary]");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn run_init(config: &Config) -> Result<()> {
    println!("🗄️  Database setup");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let store = SqliteStore::open(&config.database_path)?;
    let (clients, technicians, requests) = store.counts()?;

    println!("✓ Database ready at {}", config.database_path.display());
    println!("✓ {} clients, {} technicians, {} requests", clients, technicians, requests);

    Ok(())
}

fn run_summary(config: &Config) -> Result<()> {
    if !config.database_path.exists() {
        eprintln!("❌ Database not found at {}", config.database_path.display());
        eprintln!("   Run: soporte-tecnico init");
        std::process::exit(1);
    }

    let store = Arc::new(SqliteStore::open(&config.database_path)?);
    let (clients, technicians, _) = store.counts()?;
    let workflow = RequestWorkflow::new(store.clone(), Arc::new(StoreResolver::new(store)));
    let requests = workflow.list_all()?;

    println!("📊 Clients: {}  Technicians: {}  Requests: {}", clients, technicians, requests.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for request in &requests {
        let assignee = request
            .technician
            .as_ref()
            .map(|t| t.name.as_str())
            .unwrap_or("(sin asignar)");

        println!(
            "#{:<5} {:<12} {:<24} {:<20} {}",
            request.id, request.status, request.client.name, assignee, request.description
        );
    }

    Ok(())
}
