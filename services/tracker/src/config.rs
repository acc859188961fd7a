use std::time::Duration;

use anyhow::{bail, Context, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: String,
    /// Scan order for profile updates.
    pub datasets: Vec<String>,
    pub refresh_interval: Duration,
    pub graphql_url: String,
    pub fetch_timeout: Duration,
    pub admin_password: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = var("TRACKER_BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3001".to_string());
        let data_dir = var("TRACKER_DATA_DIR").unwrap_or_else(|| ".".to_string());
        let datasets = var("TRACKER_DATASETS")
            .unwrap_or_else(|| "September,January,Second".to_string())
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<Vec<_>>();
        let refresh_secs = secs(&var, "TRACKER_REFRESH_SECS", 2 * 60 * 60)?;
        let graphql_url =
            var("LEETCODE_GRAPHQL_URL").unwrap_or_else(|| "https://leetcode.com/graphql".to_string());
        let timeout_secs = secs(&var, "LEETCODE_TIMEOUT_SECS", 10)?;
        let admin_password = var("TRACKER_ADMIN_PASSWORD")
            .context("Missing required env var: TRACKER_ADMIN_PASSWORD")?;

        // fail fast, fail loud
        if datasets.is_empty() {
            bail!("TRACKER_DATASETS must name at least one dataset");
        }
        for (i, name) in datasets.iter().enumerate() {
            if datasets[..i].contains(name) {
                bail!("TRACKER_DATASETS lists {name} twice");
            }
        }
        if !graphql_url.starts_with("http://") && !graphql_url.starts_with("https://") {
            bail!("LEETCODE_GRAPHQL_URL must start with http:// or https://");
        }
        if refresh_secs == 0 {
            bail!("TRACKER_REFRESH_SECS must be greater than zero");
        }
        if timeout_secs == 0 {
            bail!("LEETCODE_TIMEOUT_SECS must be greater than zero");
        }
        if admin_password.is_empty() {
            bail!("TRACKER_ADMIN_PASSWORD must not be empty");
        }

        Ok(Self {
            bind_addr,
            data_dir,
            datasets,
            refresh_interval: Duration::from_secs(refresh_secs),
            graphql_url,
            fetch_timeout: Duration::from_secs(timeout_secs),
            admin_password,
        })
    }
}

fn secs(var: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<u64> {
    match var(key) {
        Some(v) => v
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a whole number of seconds, got {v:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_follow_the_deployed_setup() {
        let cfg = AppConfig::from_vars(vars(&[("TRACKER_ADMIN_PASSWORD", "s3cret")])).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
        assert_eq!(cfg.datasets, vec!["September", "January", "Second"]);
        assert_eq!(cfg.refresh_interval, Duration::from_secs(7200));
        assert_eq!(cfg.fetch_timeout, Duration::from_secs(10));
        assert_eq!(cfg.graphql_url, "https://leetcode.com/graphql");
    }

    #[test]
    fn password_is_required() {
        assert!(AppConfig::from_vars(vars(&[])).is_err());
    }

    #[test]
    fn rejects_bad_values() {
        let base = [("TRACKER_ADMIN_PASSWORD", "pw")];
        let with = |k: &'static str, v: &'static str| {
            let mut p = base.to_vec();
            p.push((k, v));
            AppConfig::from_vars(vars(&p))
        };
        assert!(with("TRACKER_DATASETS", " , ").is_err());
        assert!(with("TRACKER_DATASETS", "January,January").is_err());
        assert!(with("TRACKER_REFRESH_SECS", "0").is_err());
        assert!(with("TRACKER_REFRESH_SECS", "2h").is_err());
        assert!(with("LEETCODE_TIMEOUT_SECS", "0").is_err());
        assert!(with("LEETCODE_GRAPHQL_URL", "ftp://x").is_err());
    }

    #[test]
    fn dataset_list_is_trimmed_in_order() {
        let cfg = AppConfig::from_vars(vars(&[
            ("TRACKER_ADMIN_PASSWORD", "pw"),
            ("TRACKER_DATASETS", " Second , January "),
        ]))
        .unwrap();
        assert_eq!(cfg.datasets, vec!["Second", "January"]);
    }
}
