//! CLI smoke entry point.
//!
//! `fieldsurvey_cli [config.json]` loads the session config (defaults when
//! omitted), starts file logging when `logDir` is set, opens the store on
//! `databasePath` (in-memory when unset) and prints collection and sync state.

use fieldsurvey_core::db::{open_db, open_db_in_memory};
use fieldsurvey_core::{
    core_version, init_logging_from_config, AcknowledgeAllReconciler, SqliteKeyValueStore,
    SurveyConfig, SurveySession, SurveySummary, SystemClock,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("fieldsurvey_core version={}", core_version());

    match run(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("fieldsurvey_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<PathBuf>) -> Result<Vec<String>, Box<dyn Error>> {
    let config = match config_path {
        Some(path) => SurveyConfig::from_json_file(path)?,
        None => SurveyConfig::default(),
    };
    let logging = init_logging_from_config(&config)?;

    let conn = match config.database_path.as_ref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    // The platform reports connectivity later; start offline.
    let session = SurveySession::open(
        &config,
        SqliteKeyValueStore::new(&conn),
        Box::new(SystemClock),
        Box::new(AcknowledgeAllReconciler),
        false,
    );

    let store = session.store();
    let summary = SurveySummary::from_households(store.list());
    let mut lines = vec![
        format!("logging={}", if logging { "file" } else { "off" }),
        format!(
            "database={}",
            config
                .database_path
                .as_ref()
                .map_or_else(|| "memory".to_string(), |path| path.display().to_string())
        ),
        format!("surveyor={}", config.surveyor_name),
        format!(
            "storage_quota_bytes={}",
            store
                .local_store()
                .quota_bytes()
                .map_or_else(|| "none".to_string(), |quota| quota.to_string())
        ),
        format!("households={}", summary.total_households),
        format!("pending_sync={}", summary.pending_sync),
    ];
    lines.push(match store.last_sync_time() {
        Some(at) => format!("last_sync={}", at.to_rfc3339()),
        None => "last_sync=never".to_string(),
    });
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::run;
    use std::fs;

    #[test]
    fn defaults_open_in_memory_with_seeded_sample() {
        let lines = run(None).unwrap();
        assert!(lines.contains(&"logging=off".to_string()));
        assert!(lines.contains(&"database=memory".to_string()));
        assert!(lines.contains(&"households=1".to_string()));
        assert!(lines.contains(&"last_sync=never".to_string()));
    }

    #[test]
    fn config_file_selects_database_quota_and_surveyor() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("survey.db");
        let config_path = dir.path().join("survey.json");
        fs::write(
            &config_path,
            format!(
                r#"{{ "databasePath": "{}", "surveyorName": "Agent 9", "storageQuotaBytes": 65536 }}"#,
                db_path.display()
            ),
        )
        .unwrap();

        let lines = run(Some(config_path)).unwrap();
        assert!(lines.contains(&format!("database={}", db_path.display())));
        assert!(lines.contains(&"surveyor=Agent 9".to_string()));
        assert!(lines.contains(&"storage_quota_bytes=65536".to_string()));
        assert!(db_path.exists());
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("survey.json");
        fs::write(&config_path, r#"{ "syncMaxAttempts": 0 }"#).unwrap();

        let err = run(Some(config_path)).unwrap_err();
        assert!(err.to_string().contains("syncMaxAttempts"));
    }
}
