// sync.rs — The main command: reconcile every profile.
//
// One scan pass, then one independent task per profile over the shared
// snapshot. Profiles write to disjoint files, so tasks need no
// coordination beyond the final join. A profile failure is isolated:
// it becomes an ERROR row in the summary and the sibling tasks keep
// running.

use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinSet;

use psync_policy::PolicyResolver;
use psync_profile::ProfileStore;
use psync_reconcile::{run_profile, ReconcileError, ReconcileReport, Reconciler};
use psync_scan::SourceScanner;

use crate::config::SyncConfig;

pub async fn execute(config: &SyncConfig) -> Result<()> {
    // A scan failure is fatal: there is no fallback entity set.
    let scanner = SourceScanner::new(config.source.clone());
    let snapshot = Arc::new(scanner.scan()?);

    let resolver = PolicyResolver::new(config.policy.clone())?;
    let reconciler = Arc::new(Reconciler::new(resolver));
    let store = Arc::new(
        ProfileStore::new(config.source.profiles_path(), config.xml.clone())
            .with_suffix(config.source.profile_suffix.clone()),
    );

    let profiles = store.list()?;
    tracing::info!(profiles = profiles.len(), "reconciling profiles");

    let mut tasks = JoinSet::new();
    for name in profiles {
        let reconciler = Arc::clone(&reconciler);
        let store = Arc::clone(&store);
        let snapshot = Arc::clone(&snapshot);
        tasks.spawn(async move {
            let result = run_profile(&reconciler, &store, &snapshot, &name);
            (name, result)
        });
    }

    let mut outcomes: Vec<(String, Result<ReconcileReport, ReconcileError>)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        outcomes.push(joined?);
    }
    outcomes.sort_by(|a, b| a.0.cmp(&b.0));

    let mut failures = 0;
    for (name, result) in &outcomes {
        match result {
            Ok(report) => println!("OK     {name}  ({report})"),
            Err(err) => {
                failures += 1;
                println!("ERROR  {name}: {err}");
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{failures} of {} profiles failed", outcomes.len());
    }
    Ok(())
}
