// scan.rs — Diagnostic command: show what the scanner sees.

use anyhow::Result;

use psync_scan::SourceScanner;

use crate::config::SyncConfig;

pub fn execute(config: &SyncConfig) -> Result<()> {
    let snapshot = SourceScanner::new(config.source.clone()).scan()?;

    println!("classes ({}):", snapshot.classes.len());
    for class in &snapshot.classes {
        match &class.status {
            Some(status) => println!("  {}  [{status}]", class.name),
            None => println!("  {}", class.name),
        }
    }

    println!("fields ({}):", snapshot.fields.len());
    for field in &snapshot.fields {
        if field.required {
            println!("  {}  (required)", field.name);
        } else {
            println!("  {}", field.name);
        }
    }

    Ok(())
}
