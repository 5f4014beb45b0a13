use std::path::PathBuf;

use tally::error::Result;
use tally::export::{default_file_name, export_to_file};
use tally::reports;
use tally::settings::{shellexpand_path, Settings};

use super::{load_filtered, FilterArgs, ListingArgs, SourceArgs};

fn output_path(output: Option<&str>, settings: &Settings) -> PathBuf {
    match output {
        Some(p) => PathBuf::from(shellexpand_path(p)),
        None => PathBuf::from(shellexpand_path(&settings.export_dir)).join(default_file_name()),
    }
}

pub fn run(
    source: &SourceArgs,
    filter: &FilterArgs,
    listing: &ListingArgs,
    output: Option<&str>,
    settings: &Settings,
) -> Result<()> {
    let (ledger, filter) = load_filtered(source, filter, settings)?;
    let rows = reports::transactions(&ledger, filter.as_ref(), &listing.to_options());
    let path = export_to_file(&output_path(output, settings), &rows)?;
    println!("Wrote {} transactions to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_prefers_explicit() {
        let settings = Settings::default();
        assert_eq!(output_path(Some("/tmp/x.csv"), &settings), PathBuf::from("/tmp/x.csv"));
    }

    #[test]
    fn test_output_path_defaults_to_export_dir() {
        let settings = Settings {
            export_dir: "/var/exports".to_string(),
            ..Settings::default()
        };
        let path = output_path(None, &settings);
        assert!(path.starts_with("/var/exports"));
        assert!(path.to_string_lossy().ends_with(".csv"));
    }
}
