use std::process::Command;

fn seeder() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ecommerce-seeder"));
    // Keep a developer's .env out of the picture.
    cmd.current_dir(std::env::temp_dir())
        .env_remove("DATABASE_URL")
        .env_remove("SEED_USERS")
        .env_remove("SEED_PRODUCTS")
        .env_remove("SEED_REVIEW_PROBABILITY")
        .env_remove("SEED_DRY_RUN")
        .env_remove("SEED_RNG_SEED")
        .env("RUST_LOG", "info");
    cmd
}

#[test]
fn dry_run_prints_seeded_tables() -> anyhow::Result<()> {
    let output = seeder()
        .env("SEED_DRY_RUN", "true")
        .env("SEED_RNG_SEED", "99")
        .output()?;
    assert!(output.status.success(), "{output:?}");

    let tables: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(tables["categories"].as_array().map(Vec::len), Some(5));
    assert_eq!(tables["users"].as_array().map(Vec::len), Some(10));
    assert_eq!(tables["products"].as_array().map(Vec::len), Some(25));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seed completed"), "{stderr}");
    Ok(())
}

#[test]
fn missing_database_url_exits_with_status_one() -> anyhow::Result<()> {
    let output = seeder().output()?;
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seed error"), "{stderr}");
    assert!(output.stdout.is_empty());
    Ok(())
}

#[test]
fn oversized_counts_exit_with_status_one() -> anyhow::Result<()> {
    let output = seeder()
        .env("SEED_DRY_RUN", "true")
        .env("SEED_USERS", "18446744073709551615")
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("seed error"), "{stderr}");
    assert!(!stderr.contains("panicked"), "{stderr}");
    Ok(())
}

#[test]
fn unusable_database_url_exits_with_status_one() -> anyhow::Result<()> {
    let output = seeder()
        .env("DATABASE_URL", "unsupported://localhost/shop")
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    Ok(())
}

#[test]
fn malformed_settings_exit_with_status_one() -> anyhow::Result<()> {
    let output = seeder()
        .env("SEED_DRY_RUN", "true")
        .env("SEED_USERS", "lots")
        .output()?;
    assert_eq!(output.status.code(), Some(1));
    Ok(())
}
