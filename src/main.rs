use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use client_directory::config;
use client_directory::db;
use client_directory::models::{Client, ClientQuery, ClientUpdate, NewClient};

/// Walk the client directory through its full lifecycle against a live
/// database: create, search, update, and delete.
#[derive(Parser, Debug)]
#[command(name = "client_directory", version)]
struct Cli {
    /// Connection string; falls back to DATABASE_URL from the environment
    #[arg(long)]
    database_url: Option<String>,
}

fn print_clients(clients: &[Client]) {
    if clients.is_empty() {
        println!("  (no matches)");
    }
    for client in clients {
        println!(
            "  #{} {} {} <{}> phones: [{}]",
            client.id,
            client.first_name,
            client.last_name,
            client.email,
            client.phones.join(", ")
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let mut config = config::init()?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    let db = db::init(&config).await?;
    info!("database connection established");

    // Start from a clean schema so the walkthrough is repeatable
    db.drop_schema().await?;
    db.init_schema().await?;

    let john_id = db
        .add_client(&NewClient {
            first_name: "John".into(),
            last_name: "Jostar".into(),
            email: "john.doe@example.com".into(),
            phones: vec!["123456789".into(), "987654321".into()],
        })
        .await?;
    db.add_client(&NewClient {
        first_name: "Alice".into(),
        last_name: "Smith".into(),
        email: "alice.smith@example.com".into(),
        phones: Vec::new(),
    })
    .await?;

    println!("Before update:");
    print_clients(
        &db.find_clients(&ClientQuery {
            first_name: Some("John".into()),
            ..Default::default()
        })
        .await?,
    );

    db.change_client(
        john_id,
        &ClientUpdate {
            first_name: Some("Jonathan".into()),
            phones: Some(vec!["111111111".into()]),
            ..Default::default()
        },
    )
    .await?;

    println!("After update:");
    print_clients(
        &db.find_clients(&ClientQuery {
            first_name: Some("Jonathan".into()),
            ..Default::default()
        })
        .await?,
    );

    db.delete_phone(john_id, "111111111").await?;

    println!("After deleting phone:");
    print_clients(
        &db.find_clients(&ClientQuery {
            first_name: Some("Jonathan".into()),
            ..Default::default()
        })
        .await?,
    );

    db.delete_client(john_id).await?;

    println!("After deleting client:");
    print_clients(
        &db.find_clients(&ClientQuery {
            last_name: Some("Doe".into()),
            ..Default::default()
        })
        .await?,
    );
    print_clients(
        &db.find_clients(&ClientQuery {
            first_name: Some("Alice".into()),
            ..Default::default()
        })
        .await?,
    );

    Ok(())
}
