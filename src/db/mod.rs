pub mod queries;

use crate::planner::{PlannedRoutineLog, Routine, RoutineTime, RoutineVariable};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    Numeric,
    Boolean,
    Categorical,
    Time,
    Text,
}

impl VariableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Numeric => "numeric",
            VariableKind::Boolean => "boolean",
            VariableKind::Categorical => "categorical",
            VariableKind::Time => "time",
            VariableKind::Text => "text",
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariableKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_lowercase().as_str() {
            "numeric" | "number" => Ok(VariableKind::Numeric),
            "boolean" | "bool" => Ok(VariableKind::Boolean),
            "categorical" | "category" => Ok(VariableKind::Categorical),
            "time" => Ok(VariableKind::Time),
            "text" => Ok(VariableKind::Text),
            other => Err(anyhow!(
                "Unknown variable kind: {other}. Expected numeric|boolean|categorical|time|text"
            )),
        }
    }
}

impl ToSql for VariableKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for VariableKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: anyhow::Error| FromSqlError::Other(error.into()))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableRow {
    pub id: i64,
    pub name: String,
    pub kind: VariableKind,
    pub unit: Option<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogRow {
    pub id: i64,
    pub user_id: String,
    pub variable_id: i64,
    pub variable_name: String,
    pub date: String,
    pub time_of_day: String,
    pub value: String,
    pub unit: Option<String>,
    pub routine_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoutine {
    pub name: String,
    pub variables: Vec<NewRoutineVariable>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewRoutineVariable {
    pub variable_id: i64,
    pub default_value: String,
    #[serde(default)]
    pub default_unit: Option<String>,
    pub weekdays: BTreeSet<u8>,
    pub times: Vec<RoutineTime>,
}

#[derive(Debug, Clone)]
pub struct NewLog<'a> {
    pub user_id: &'a str,
    pub variable_id: i64,
    pub date: NaiveDate,
    pub time_of_day: &'a str,
    pub value: &'a str,
    pub unit: Option<&'a str>,
    pub routine_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplySummary {
    pub created: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create DB directory: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite DB: {}", path.display()))?;

        let database = Self { conn };
        database.init_schema()?;

        Ok(database)
    }

    pub fn init_schema(&self) -> Result<()> {
        queries::schema_statements()
            .iter()
            .try_for_each(|statement| {
                self.conn
                    .execute(statement, [])
                    .context("Failed to initialize schema")
                    .map(|_| ())
            })
    }

    pub fn create_variable(
        &self,
        name: &str,
        kind: VariableKind,
        unit: Option<&str>,
    ) -> Result<VariableRow> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Variable name must not be empty");
        }

        self.conn
            .execute(
                "INSERT INTO variables (name, kind, unit, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![name, kind, unit, Utc::now().timestamp()],
            )
            .with_context(|| format!("Failed to insert variable: {name}"))?;

        self.variable(self.conn.last_insert_rowid())?
            .context("Inserted variable could not be read back")
    }

    pub fn variable(&self, id: i64) -> Result<Option<VariableRow>> {
        self.conn
            .query_row(
                "SELECT id, name, kind, unit, created_at FROM variables WHERE id = ?1",
                params![id],
                variable_from_row,
            )
            .optional()
            .context("Failed to query variable")
    }

    pub fn variable_by_name(&self, name: &str) -> Result<Option<VariableRow>> {
        self.conn
            .query_row(
                "SELECT id, name, kind, unit, created_at FROM variables WHERE name = ?1",
                params![name.trim()],
                variable_from_row,
            )
            .optional()
            .context("Failed to query variable by name")
    }

    pub fn list_variables(&self) -> Result<Vec<VariableRow>> {
        let mut statement = self.conn.prepare(
            "SELECT id, name, kind, unit, created_at
             FROM variables
             ORDER BY name ASC",
        )?;

        let rows = statement
            .query_map([], variable_from_row)?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list variables")?;

        Ok(rows)
    }

    pub fn create_routine(&mut self, routine: &NewRoutine) -> Result<Routine> {
        let name = routine.name.trim();
        if name.is_empty() {
            bail!("Routine name must not be empty");
        }

        for variable in &routine.variables {
            if let Some(day) = variable.weekdays.iter().find(|day| !(1..=7).contains(*day)) {
                bail!(
                    "Invalid weekday {day} for variable {}. Use 1 (Monday) to 7 (Sunday)",
                    variable.variable_id
                );
            }
            if self.variable(variable.variable_id)?.is_none() {
                bail!("Unknown variable id: {}", variable.variable_id);
            }
        }

        let transaction = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        transaction
            .execute(
                "INSERT INTO routines (name, created_at) VALUES (?1, ?2)",
                params![name, Utc::now().timestamp()],
            )
            .context("Failed to insert routine")?;
        let routine_id = transaction.last_insert_rowid();

        routine
            .variables
            .iter()
            .enumerate()
            .try_for_each(|(position, variable)| {
                let weekdays = serde_json::to_string(&variable.weekdays)
                    .context("Failed to serialize weekdays")?;
                let times =
                    serde_json::to_string(&variable.times).context("Failed to serialize times")?;

                transaction
                    .execute(
                        "INSERT INTO routine_variables (routine_id, variable_id, position, default_value, default_unit, weekdays, times)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        params![
                            routine_id,
                            variable.variable_id,
                            position as i64,
                            &variable.default_value,
                            &variable.default_unit,
                            weekdays,
                            times
                        ],
                    )
                    .context("Failed to insert routine variable")
                    .map(|_| ())
            })?;

        transaction.commit().context("Failed to commit routine")?;
        info!(routine_id, name, "routine created");

        self.routine(routine_id)?
            .context("Inserted routine could not be read back")
    }

    pub fn routine(&self, id: i64) -> Result<Option<Routine>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, name FROM routines WHERE id = ?1",
                params![id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .context("Failed to query routine")?;

        header
            .map(|(id, name)| -> Result<Routine> {
                Ok(Routine {
                    id,
                    name,
                    variables: self.routine_variables(id)?,
                })
            })
            .transpose()
    }

    pub fn list_routines(&self) -> Result<Vec<Routine>> {
        let mut statement = self
            .conn
            .prepare("SELECT id, name FROM routines ORDER BY id ASC")?;

        let headers = statement
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to list routines")?;

        headers
            .into_iter()
            .map(|(id, name)| -> Result<Routine> {
                Ok(Routine {
                    id,
                    name,
                    variables: self.routine_variables(id)?,
                })
            })
            .collect()
    }

    pub fn delete_routine(&mut self, id: i64) -> Result<bool> {
        let transaction = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;

        transaction
            .execute(
                "DELETE FROM routine_variables WHERE routine_id = ?1",
                params![id],
            )
            .context("Failed to delete routine variables")?;
        let deleted = transaction
            .execute("DELETE FROM routines WHERE id = ?1", params![id])
            .context("Failed to delete routine")?;

        transaction.commit().context("Failed to commit routine deletion")?;
        Ok(deleted > 0)
    }

    pub fn count_variables(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM variables", [], |row| row.get(0))
            .context("Failed to count variables")
    }

    pub fn count_routines(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM routines", [], |row| row.get(0))
            .context("Failed to count routines")
    }

    pub fn record_log(&self, log: &NewLog<'_>) -> Result<bool> {
        insert_log_if_absent(&self.conn, log)
    }

    pub fn apply_planned_logs(
        &mut self,
        user_id: &str,
        logs: &[PlannedRoutineLog],
    ) -> Result<ApplySummary> {
        let mut transaction = self
            .conn
            .transaction()
            .context("Failed to start transaction")?;
        let mut summary = ApplySummary::default();

        // Each row gets its own savepoint so one bad row does not sink the batch.
        for planned in logs.iter().filter(|log| log.enabled) {
            let savepoint = transaction
                .savepoint()
                .context("Failed to open savepoint")?;

            let inserted = insert_log_if_absent(
                &savepoint,
                &NewLog {
                    user_id,
                    variable_id: planned.variable_id,
                    date: planned.date,
                    time_of_day: &planned.time_of_day,
                    value: &planned.default_value,
                    unit: planned.default_unit.as_deref(),
                    routine_id: Some(planned.routine_id),
                },
            );

            match inserted {
                Ok(created) => {
                    savepoint
                        .commit()
                        .context("Failed to release savepoint")?;
                    if created {
                        summary.created += 1;
                    } else {
                        summary.skipped += 1;
                    }
                }
                Err(error) => {
                    warn!(
                        error = %error,
                        planned_id = %planned.id,
                        "planned routine log rejected"
                    );
                    summary.failed += 1;
                }
            }
        }

        transaction
            .commit()
            .context("Failed to commit planned routine logs")?;
        info!(
            user_id,
            created = summary.created,
            skipped = summary.skipped,
            failed = summary.failed,
            "planned routine logs applied"
        );

        Ok(summary)
    }

    pub fn missing_variable_ids(&self, ids: &[i64]) -> Result<Vec<i64>> {
        let distinct = ids.iter().copied().collect::<BTreeSet<_>>();

        distinct
            .into_iter()
            .filter_map(|id| match self.variable(id) {
                Ok(Some(_)) => None,
                Ok(None) => Some(Ok(id)),
                Err(error) => Some(Err(error)),
            })
            .collect()
    }

    pub fn logs_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<LogRow>> {
        let mut statement = self.conn.prepare(
            "SELECT l.id, l.user_id, l.variable_id, COALESCE(v.name, ''), l.date, l.time_of_day, l.value, l.unit, l.routine_id, l.created_at
             FROM logs l
             LEFT JOIN variables v ON v.id = l.variable_id
             WHERE l.user_id = ?1 AND l.date >= ?2 AND l.date <= ?3
             ORDER BY l.date ASC, l.time_of_day ASC, v.name ASC",
        )?;

        let rows = statement
            .query_map(
                params![user_id, format_date(from), format_date(to)],
                |row| {
                    Ok(LogRow {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        variable_id: row.get(2)?,
                        variable_name: row.get(3)?,
                        date: row.get(4)?,
                        time_of_day: row.get(5)?,
                        value: row.get(6)?,
                        unit: row.get(7)?,
                        routine_id: row.get(8)?,
                        created_at: row.get(9)?,
                    })
                },
            )?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to query logs")?;

        Ok(rows)
    }

    pub fn latest_log_date(&self, user_id: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT date FROM logs WHERE user_id = ?1 ORDER BY date DESC LIMIT 1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to query latest log date")
    }

    fn routine_variables(&self, routine_id: i64) -> Result<Vec<RoutineVariable>> {
        let mut statement = self.conn.prepare(
            "SELECT rv.variable_id, COALESCE(v.name, ''), rv.default_value, rv.default_unit, rv.weekdays, rv.times
             FROM routine_variables rv
             LEFT JOIN variables v ON v.id = rv.variable_id
             WHERE rv.routine_id = ?1
             ORDER BY rv.position ASC",
        )?;

        let rows = statement
            .query_map(params![routine_id], |row| {
                Ok(RoutineVariable {
                    variable_id: row.get(0)?,
                    variable_name: row.get(1)?,
                    default_value: row.get(2)?,
                    default_unit: row.get(3)?,
                    weekdays: json_column(row, 4)?,
                    times: json_column(row, 5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to query variables of routine {routine_id}"))?;

        Ok(rows)
    }
}

fn insert_log_if_absent(conn: &Connection, log: &NewLog<'_>) -> Result<bool> {
    let inserted = conn
        .execute(
            queries::INSERT_LOG_IF_ABSENT,
            params![
                log.user_id,
                log.variable_id,
                format_date(log.date),
                log.time_of_day,
                log.value,
                log.unit,
                log.routine_id,
                Utc::now().timestamp()
            ],
        )
        .context("Failed to insert log")?;

    Ok(inserted > 0)
}

fn variable_from_row(row: &Row<'_>) -> rusqlite::Result<VariableRow> {
    Ok(VariableRow {
        id: row.get(0)?,
        name: row.get(1)?,
        kind: row.get(2)?,
        unit: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, index: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::generate_planned_routine_logs;
    use tempfile::{TempDir, tempdir};

    fn open_temp() -> (TempDir, Database) {
        let dir = tempdir().expect("tempdir");
        let database = Database::open(&dir.path().join("db").join("test.db")).expect("db open");
        (dir, database)
    }

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    fn seed_hydration(database: &mut Database) -> Routine {
        let variable = database
            .create_variable("Hydration", VariableKind::Numeric, Some("ml"))
            .expect("variable");

        database
            .create_routine(&NewRoutine {
                name: "Water".to_string(),
                variables: vec![NewRoutineVariable {
                    variable_id: variable.id,
                    default_value: "500".to_string(),
                    default_unit: Some("ml".to_string()),
                    weekdays: BTreeSet::from([1, 3, 5]),
                    times: vec![
                        RoutineTime {
                            time_of_day: "08:00".to_string(),
                            label: Some("Morning".to_string()),
                        },
                        RoutineTime {
                            time_of_day: "20:00".to_string(),
                            label: None,
                        },
                    ],
                }],
            })
            .expect("routine")
    }

    #[test]
    fn routine_round_trips_with_variable_names() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);

        let loaded = database.routine(routine.id).expect("query").expect("exists");
        assert_eq!(loaded.name, "Water");
        assert_eq!(loaded.variables[0].variable_name, "Hydration");
        assert_eq!(loaded.variables[0].weekdays, BTreeSet::from([1, 3, 5]));
        assert_eq!(loaded.variables[0].times[0].label.as_deref(), Some("Morning"));
        assert_eq!(database.list_routines().expect("list").len(), 1);
    }

    #[test]
    fn rejects_out_of_range_weekdays_and_unknown_variables() {
        let (_dir, mut database) = open_temp();
        let variable = database
            .create_variable("Mood", VariableKind::Categorical, None)
            .expect("variable");

        let bad_weekday = NewRoutine {
            name: "Bad".to_string(),
            variables: vec![NewRoutineVariable {
                variable_id: variable.id,
                default_value: "ok".to_string(),
                default_unit: None,
                weekdays: BTreeSet::from([0, 8]),
                times: Vec::new(),
            }],
        };
        assert!(database.create_routine(&bad_weekday).is_err());

        let unknown_variable = NewRoutine {
            name: "Bad".to_string(),
            variables: vec![NewRoutineVariable {
                variable_id: 999,
                default_value: "ok".to_string(),
                default_unit: None,
                weekdays: BTreeSet::from([1]),
                times: Vec::new(),
            }],
        };
        assert!(database.create_routine(&unknown_variable).is_err());
        assert_eq!(database.count_routines().expect("count"), 0);
    }

    #[test]
    fn applying_twice_skips_existing_slots() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);
        let planned = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-07"));

        let first = database.apply_planned_logs("alice", &planned).expect("apply");
        assert_eq!(first, ApplySummary { created: 6, skipped: 0, failed: 0 });

        let second = database.apply_planned_logs("alice", &planned).expect("apply");
        assert_eq!(second, ApplySummary { created: 0, skipped: 6, failed: 0 });

        let other_user = database.apply_planned_logs("bob", &planned).expect("apply");
        assert_eq!(other_user.created, 6);

        let logs = database
            .logs_between("alice", date("2024-01-01"), date("2024-01-07"))
            .expect("logs");
        assert_eq!(logs.len(), 6);
        assert_eq!(logs[0].variable_name, "Hydration");
        assert_eq!(logs[0].value, "500");
        assert_eq!(logs[0].unit.as_deref(), Some("ml"));
        assert_eq!(logs[0].routine_id, Some(planned[0].routine_id));
    }

    #[test]
    fn disabled_entries_are_not_inserted_or_counted() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);
        let mut planned =
            generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-01"));
        planned[1].enabled = false;

        let summary = database.apply_planned_logs("alice", &planned).expect("apply");
        assert_eq!(summary, ApplySummary { created: 1, skipped: 0, failed: 0 });
    }

    #[test]
    fn duplicate_entries_in_one_batch_count_as_skipped() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);
        let planned = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-07"));
        let doubled = planned.iter().chain(planned.iter()).cloned().collect::<Vec<_>>();

        let summary = database.apply_planned_logs("alice", &doubled).expect("apply");
        assert_eq!(summary, ApplySummary { created: 6, skipped: 6, failed: 0 });
    }

    #[test]
    fn variables_sharing_a_slot_both_persist() {
        let (_dir, mut database) = open_temp();
        let mut routine = seed_hydration(&mut database);
        let coffee = database
            .create_variable("Coffee", VariableKind::Numeric, Some("cup"))
            .expect("variable");

        let mut shared = routine.variables[0].clone();
        shared.variable_id = coffee.id;
        shared.variable_name = coffee.name.clone();
        shared.times.truncate(1);
        routine.variables[0].times.truncate(1);
        routine.variables.push(shared);

        let planned =
            generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-01"));
        assert_eq!(planned.len(), 2);

        let summary = database.apply_planned_logs("alice", &planned).expect("apply");
        assert_eq!(summary, ApplySummary { created: 2, skipped: 0, failed: 0 });

        let names = database
            .logs_between("alice", date("2024-01-01"), date("2024-01-01"))
            .expect("logs")
            .into_iter()
            .map(|log| log.variable_name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Coffee".to_string(), "Hydration".to_string()]);
    }

    #[test]
    fn failing_rows_do_not_roll_back_the_rest_of_the_batch() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);
        database
            .conn
            .execute_batch(
                "CREATE TRIGGER reject_evening_logs BEFORE INSERT ON logs
                 WHEN NEW.time_of_day = '20:00'
                 BEGIN SELECT RAISE(ABORT, 'evening slot rejected'); END;",
            )
            .expect("trigger");

        let planned = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-07"));
        let summary = database.apply_planned_logs("alice", &planned).expect("apply");
        assert_eq!(summary, ApplySummary { created: 3, skipped: 0, failed: 3 });

        let logs = database
            .logs_between("alice", date("2024-01-01"), date("2024-01-07"))
            .expect("logs");
        assert_eq!(logs.len(), 3);
        assert!(logs.iter().all(|log| log.time_of_day == "08:00"));
    }

    #[test]
    fn reports_unknown_variable_ids_once() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);
        let known = routine.variables[0].variable_id;

        let missing = database
            .missing_variable_ids(&[known, 404, 404, 7])
            .expect("lookup");
        assert_eq!(missing, vec![7, 404]);
    }

    #[test]
    fn manual_log_blocks_planned_slot() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);
        let variable_id = routine.variables[0].variable_id;

        let created = database
            .record_log(&NewLog {
                user_id: "alice",
                variable_id,
                date: date("2024-01-01"),
                time_of_day: "08:00",
                value: "750",
                unit: Some("ml"),
                routine_id: None,
            })
            .expect("record");
        assert!(created);

        let planned =
            generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-01"));
        let summary = database.apply_planned_logs("alice", &planned).expect("apply");
        assert_eq!(summary, ApplySummary { created: 1, skipped: 1, failed: 0 });
        assert_eq!(
            database.latest_log_date("alice").expect("latest").as_deref(),
            Some("2024-01-01")
        );
    }

    #[test]
    fn deleting_a_routine_removes_its_variables() {
        let (_dir, mut database) = open_temp();
        let routine = seed_hydration(&mut database);

        assert!(database.delete_routine(routine.id).expect("delete"));
        assert!(!database.delete_routine(routine.id).expect("delete again"));
        assert!(database.routine(routine.id).expect("query").is_none());
        assert_eq!(database.count_variables().expect("count"), 1);
    }

    #[test]
    fn variable_kind_parses_aliases() {
        assert_eq!("Bool".parse::<VariableKind>().expect("kind"), VariableKind::Boolean);
        assert_eq!("number".parse::<VariableKind>().expect("kind"), VariableKind::Numeric);
        assert!("color".parse::<VariableKind>().is_err());
    }
}
