use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::router::AppCtx;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh AppCtx over a throwaway sqlite file, using the production schema.
pub fn test_ctx() -> AppCtx {
    let path = std::env::temp_dir()
        .join(format!(
            "incident_desk_test_{}.sqlite",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
        .to_string_lossy()
        .to_string();

    let db = Database::new(path.clone());
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");

    AppCtx {
        db,
        config: AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            api_base: "https://api.example.com".to_string(),
            db_path: path,
        },
    }
}

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
