use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};

use crate::seeder::SeedPlan;

#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub database_url: Option<String>,
    pub plan: SeedPlan,
    pub rng_seed: Option<u64>,
    pub dry_run: bool,
}

impl SeedConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<L>(lookup: L) -> anyhow::Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let dry_run = parse_var::<bool, _>(&lookup, "SEED_DRY_RUN")?.unwrap_or(false);
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if database_url.is_none() && !dry_run {
            bail!("DATABASE_URL must be set (or SEED_DRY_RUN=true)");
        }

        let mut plan = SeedPlan::default();
        if let Some(users) = parse_var(&lookup, "SEED_USERS")? {
            plan.users = users;
        }
        if let Some(products) = parse_var(&lookup, "SEED_PRODUCTS")? {
            plan.products = products;
        }
        if let Some(probability) = parse_var(&lookup, "SEED_REVIEW_PROBABILITY")? {
            plan.review_probability = probability;
        }
        plan.validate().context("invalid seed settings")?;

        Ok(Self {
            database_url,
            plan,
            rng_seed: parse_var(&lookup, "SEED_RNG_SEED")?,
            dry_run,
        })
    }
}

fn parse_var<T, L>(lookup: &L, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    L: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<SeedConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SeedConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_follow_the_standard_plan() {
        let cfg = config(&[("DATABASE_URL", "postgres://localhost/shop")]).expect("config");
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/shop"));
        assert_eq!(cfg.plan, SeedPlan::default());
        assert_eq!(cfg.rng_seed, None);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn requires_database_url_outside_dry_runs() {
        assert!(config(&[]).is_err());
        let cfg = config(&[("SEED_DRY_RUN", "true")]).expect("dry run config");
        assert!(cfg.dry_run);
        assert!(cfg.database_url.is_none());
    }

    #[test]
    fn overrides_counts_and_seed() {
        let cfg = config(&[
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("SEED_USERS", "3"),
            ("SEED_PRODUCTS", "7"),
            ("SEED_REVIEW_PROBABILITY", "0.25"),
            ("SEED_RNG_SEED", "1234"),
        ])
        .expect("config");
        assert_eq!(cfg.plan.users, 3);
        assert_eq!(cfg.plan.products, 7);
        assert_eq!(cfg.plan.review_probability, 0.25);
        assert_eq!(cfg.rng_seed, Some(1234));
    }

    #[test]
    fn rejects_malformed_values() {
        let err = config(&[
            ("DATABASE_URL", "postgres://localhost/shop"),
            ("SEED_USERS", "ten"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("SEED_USERS"), "{err}");

        assert!(
            config(&[
                ("DATABASE_URL", "postgres://localhost/shop"),
                ("SEED_REVIEW_PROBABILITY", "2"),
            ])
            .is_err()
        );
    }

    #[test]
    fn rejects_oversized_counts() {
        let err = config(&[("SEED_DRY_RUN", "true"), ("SEED_USERS", "18446744073709551615")])
            .unwrap_err();
        assert!(format!("{err:#}").contains("users must be at most"), "{err:#}");

        assert!(config(&[("SEED_DRY_RUN", "true"), ("SEED_PRODUCTS", "100001")]).is_err());
    }
}
