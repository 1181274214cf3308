pub const CREATE_VARIABLES: &str = r#"
CREATE TABLE IF NOT EXISTS variables (
  id         INTEGER PRIMARY KEY AUTOINCREMENT,
  name       TEXT NOT NULL UNIQUE,
  kind       TEXT NOT NULL DEFAULT 'numeric',
  unit       TEXT,
  created_at INTEGER NOT NULL
);
"#;

pub const CREATE_ROUTINES: &str = r#"
CREATE TABLE IF NOT EXISTS routines (
  id         INTEGER PRIMARY KEY AUTOINCREMENT,
  name       TEXT NOT NULL,
  created_at INTEGER NOT NULL
);
"#;

pub const CREATE_ROUTINE_VARIABLES: &str = r#"
CREATE TABLE IF NOT EXISTS routine_variables (
  id            INTEGER PRIMARY KEY AUTOINCREMENT,
  routine_id    INTEGER NOT NULL,
  variable_id   INTEGER NOT NULL,
  position      INTEGER NOT NULL DEFAULT 0,
  default_value TEXT NOT NULL,
  default_unit  TEXT,
  weekdays      TEXT NOT NULL DEFAULT '[]',
  times         TEXT NOT NULL DEFAULT '[]'
);
"#;

pub const CREATE_LOGS: &str = r#"
CREATE TABLE IF NOT EXISTS logs (
  id          INTEGER PRIMARY KEY AUTOINCREMENT,
  user_id     TEXT NOT NULL,
  variable_id INTEGER NOT NULL,
  date        TEXT NOT NULL,
  time_of_day TEXT NOT NULL,
  value       TEXT NOT NULL,
  unit        TEXT,
  routine_id  INTEGER,
  created_at  INTEGER NOT NULL,
  UNIQUE(user_id, variable_id, date, time_of_day)
);
"#;

pub const INDEX_ROUTINE_VARIABLES_ROUTINE: &str = "CREATE INDEX IF NOT EXISTS idx_routine_variables_routine ON routine_variables(routine_id);";

pub const INDEX_LOGS_USER_DATE: &str =
    "CREATE INDEX IF NOT EXISTS idx_logs_user_date ON logs(user_id, date);";

pub const INSERT_LOG_IF_ABSENT: &str = "INSERT INTO logs (user_id, variable_id, date, time_of_day, value, unit, routine_id, created_at)
 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
 ON CONFLICT(user_id, variable_id, date, time_of_day) DO NOTHING";

pub fn schema_statements() -> Vec<&'static str> {
    vec![
        CREATE_VARIABLES,
        CREATE_ROUTINES,
        CREATE_ROUTINE_VARIABLES,
        CREATE_LOGS,
        INDEX_ROUTINE_VARIABLES_ROUTINE,
        INDEX_LOGS_USER_DATE,
    ]
}
