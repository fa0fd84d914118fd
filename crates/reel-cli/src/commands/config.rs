use reel_core::config::FirebaseConfig;

use crate::error::CliError;

pub fn run_config_check() -> Result<(), CliError> {
    let config = FirebaseConfig::from_env();
    for line in config_report_lines(&config) {
        println!("{line}");
    }
    Ok(())
}

pub fn config_report_lines(config: &FirebaseConfig) -> Vec<String> {
    let missing = config.missing_required_vars();
    if missing.is_empty() {
        let mut lines = vec![format!(
            "Remote favorites configured for project {}",
            config.project_id.as_deref().unwrap_or_default()
        )];
        if let Some(host) = config.emulator_host.as_deref() {
            lines.push(format!("Using Firestore emulator at {host}"));
        }
        lines
    } else {
        let mut lines = vec!["Remote favorites are not configured; missing:".to_string()];
        lines.extend(missing.into_iter().map(|name| format!("  {name}")));
        lines
    }
}
