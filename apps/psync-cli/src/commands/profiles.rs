// profiles.rs — List the profiles the store knows about.

use anyhow::Result;

use psync_profile::ProfileStore;

use crate::config::SyncConfig;

pub fn execute(config: &SyncConfig) -> Result<()> {
    let store = ProfileStore::new(config.source.profiles_path(), config.xml.clone())
        .with_suffix(config.source.profile_suffix.clone());

    let profiles = store.list()?;
    println!("profiles ({}):", profiles.len());
    for name in profiles {
        println!("  {name}");
    }

    Ok(())
}
