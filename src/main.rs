use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ecommerce_seeder::{
    FakerSource, MemoryStore, OrmStore, SeedReport, Seeder, exit_status,
    config::SeedConfig,
    db::create_orm_conn,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ecommerce_seeder=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let status = exit_status(&run().await);
    if status != 0 {
        std::process::exit(status);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = SeedConfig::from_env()?;
    let fixtures = match config.rng_seed {
        Some(seed) => {
            tracing::info!(seed, "using seeded random source");
            FakerSource::seeded(seed)
        }
        None => FakerSource::from_entropy(),
    };
    let mut seeder = Seeder::new(config.plan.clone(), fixtures);

    if config.dry_run {
        let store = MemoryStore::new();
        let report = seeder.run(&store).await?;
        println!("{}", serde_json::to_string_pretty(&store.snapshot().await)?);
        log_report(&report);
        return Ok(());
    }

    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?;
    let store = OrmStore::new(create_orm_conn(database_url).await?);

    let outcome = seeder.run(&store).await;

    // The connection is released whether or not the run succeeded.
    let closed = store.close().await;
    match (outcome, closed) {
        (Ok(report), Ok(())) => {
            log_report(&report);
            Ok(())
        }
        (Ok(_), Err(err)) => Err(err.into()),
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                tracing::warn!(error = %close_err, "failed to release database connection");
            }
            Err(err.into())
        }
    }
}

fn log_report(report: &SeedReport) {
    match serde_json::to_string(report) {
        Ok(json) => tracing::info!(report = %json, "seed completed"),
        Err(err) => tracing::warn!(error = %err, "could not serialize seed report"),
    }
}
