use tally::error::{Result, TallyError};
use tally::reconciler::MAX_TRANSFER_WINDOW_DAYS;
use tally::settings::{save_settings, settings_path, shellexpand_path, Settings};

pub fn run(
    current: &Settings,
    export_dir: Option<String>,
    top_n: Option<usize>,
    transfer_window_days: Option<i64>,
) -> Result<()> {
    let settings = apply(current, export_dir, top_n, transfer_window_days)?;
    save_settings(&settings)?;
    println!("Saved settings to {}", settings_path().display());
    println!("  export dir:      {}", settings.export_dir);
    println!("  top merchants:   {}", settings.top_n);
    println!("  transfer window: {} days", settings.transfer_window_days);
    Ok(())
}

fn apply(
    current: &Settings,
    export_dir: Option<String>,
    top_n: Option<usize>,
    transfer_window_days: Option<i64>,
) -> Result<Settings> {
    let mut settings = current.clone();
    if let Some(dir) = export_dir {
        settings.export_dir = shellexpand_path(&dir);
    }
    if let Some(n) = top_n {
        if n == 0 {
            return Err(TallyError::Other("--top-n must be at least 1".into()));
        }
        settings.top_n = n;
    }
    if let Some(days) = transfer_window_days {
        if !(0..=MAX_TRANSFER_WINDOW_DAYS).contains(&days) {
            return Err(TallyError::Other(format!(
                "--transfer-window must be between 0 and {MAX_TRANSFER_WINDOW_DAYS} days"
            )));
        }
        settings.transfer_window_days = days;
    }
    settings.validate()?;
    Ok(settings)
}
