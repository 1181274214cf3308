use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineTime {
    pub time_of_day: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Weekdays use ISO numbering: 1 is Monday, 7 is Sunday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineVariable {
    pub variable_id: i64,
    pub variable_name: String,
    pub default_value: String,
    #[serde(default)]
    pub default_unit: Option<String>,
    pub weekdays: BTreeSet<u8>,
    pub times: Vec<RoutineTime>,
}

impl RoutineVariable {
    pub fn is_plannable(&self) -> bool {
        !self.weekdays.is_empty() && !self.times.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    pub id: i64,
    pub name: String,
    pub variables: Vec<RoutineVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedRoutineLog {
    pub id: String,
    pub routine_id: i64,
    pub routine_name: String,
    pub variable_id: i64,
    pub variable_name: String,
    pub date: NaiveDate,
    pub time_of_day: String,
    #[serde(default)]
    pub time_name: Option<String>,
    pub default_value: String,
    #[serde(default)]
    pub default_unit: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl PlannedRoutineLog {
    fn new(
        routine: &Routine,
        variable: &RoutineVariable,
        time: &RoutineTime,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: planned_log_id(routine.id, variable.variable_id, date, &time.time_of_day),
            routine_id: routine.id,
            routine_name: routine.name.clone(),
            variable_id: variable.variable_id,
            variable_name: variable.variable_name.clone(),
            date,
            time_of_day: time.time_of_day.clone(),
            time_name: time.label.clone(),
            default_value: variable.default_value.clone(),
            default_unit: variable.default_unit.clone(),
            enabled: true,
        }
    }
}

pub fn planned_log_id(routine_id: i64, variable_id: i64, date: NaiveDate, time_of_day: &str) -> String {
    format!(
        "{routine_id}-{variable_id}-{}-{time_of_day}",
        date.format("%Y-%m-%d")
    )
}

pub fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

pub fn generate_planned_routine_logs(
    routines: &[Routine],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PlannedRoutineLog> {
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .flat_map(move |date| {
            let weekday = iso_weekday(date);
            routines.iter().flat_map(move |routine| {
                routine
                    .variables
                    .iter()
                    .filter(move |variable| variable.weekdays.contains(&weekday))
                    .flat_map(move |variable| {
                        variable
                            .times
                            .iter()
                            .map(move |time| PlannedRoutineLog::new(routine, variable, time, date))
                    })
            })
        })
        .collect()
}

pub fn validate_range(start: NaiveDate, end: NaiveDate, max_days: u32) -> Result<()> {
    if start > end {
        bail!("start date {start} is after end date {end}");
    }

    let days = (end - start).num_days() + 1;
    if days > i64::from(max_days) {
        bail!("date range spans {days} days, limit is {max_days}");
    }

    Ok(())
}

pub fn select_routines(routines: Vec<Routine>, ids: &[i64]) -> Vec<Routine> {
    // An empty filter selects every routine.
    if ids.is_empty() {
        return routines;
    }

    routines
        .into_iter()
        .filter(|routine| ids.contains(&routine.id))
        .collect()
}

pub fn set_enabled(logs: &mut [PlannedRoutineLog], id: &str, enabled: bool) -> bool {
    match logs.iter_mut().find(|log| log.id == id) {
        Some(log) => {
            log.enabled = enabled;
            true
        }
        None => false,
    }
}

pub fn enabled_count(logs: &[PlannedRoutineLog]) -> usize {
    logs.iter().filter(|log| log.enabled).count()
}

pub fn group_by_date(logs: &[PlannedRoutineLog]) -> BTreeMap<NaiveDate, Vec<&PlannedRoutineLog>> {
    let mut groups: BTreeMap<NaiveDate, Vec<&PlannedRoutineLog>> =
        logs.iter().fold(BTreeMap::new(), |mut acc, log| {
            acc.entry(log.date).or_insert_with(Vec::new).push(log);
            acc
        });

    groups.values_mut().for_each(|entries| {
        entries.sort_by(|left, right| {
            left.time_of_day
                .cmp(&right.time_of_day)
                .then_with(|| left.variable_name.cmp(&right.variable_name))
        });
    });

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("valid date")
    }

    fn time(value: &str, label: Option<&str>) -> RoutineTime {
        RoutineTime {
            time_of_day: value.to_string(),
            label: label.map(ToOwned::to_owned),
        }
    }

    fn hydration_routine() -> Routine {
        Routine {
            id: 1,
            name: "Morning and evening".to_string(),
            variables: vec![RoutineVariable {
                variable_id: 10,
                variable_name: "Hydration".to_string(),
                default_value: "500".to_string(),
                default_unit: Some("ml".to_string()),
                weekdays: BTreeSet::from([1, 3, 5]),
                times: vec![time("08:00", Some("Morning")), time("20:00", None)],
            }],
        }
    }

    #[test]
    fn expands_weekdays_and_times_over_a_week() {
        let logs = generate_planned_routine_logs(
            &[hydration_routine()],
            date("2024-01-01"),
            date("2024-01-07"),
        );

        let slots = logs
            .iter()
            .map(|log| (log.date.format("%Y-%m-%d").to_string(), log.time_of_day.as_str()))
            .collect::<Vec<_>>();

        assert_eq!(
            slots,
            vec![
                ("2024-01-01".to_string(), "08:00"),
                ("2024-01-01".to_string(), "20:00"),
                ("2024-01-03".to_string(), "08:00"),
                ("2024-01-03".to_string(), "20:00"),
                ("2024-01-05".to_string(), "08:00"),
                ("2024-01-05".to_string(), "20:00"),
            ]
        );
        assert!(logs.iter().all(|log| log.enabled));
        assert_eq!(logs[0].time_name.as_deref(), Some("Morning"));
        assert_eq!(logs[1].time_name, None);
        assert_eq!(logs[0].default_unit.as_deref(), Some("ml"));
        assert_eq!(logs[0].id, "1-10-2024-01-01-08:00");
    }

    #[test]
    fn empty_routines_yield_nothing() {
        let logs = generate_planned_routine_logs(&[], date("2024-01-01"), date("2024-12-31"));
        assert!(logs.is_empty());
    }

    #[test]
    fn single_day_outside_weekdays_yields_nothing() {
        // 2024-01-02 is a Tuesday.
        let logs = generate_planned_routine_logs(
            &[hydration_routine()],
            date("2024-01-02"),
            date("2024-01-02"),
        );
        assert!(logs.is_empty());
    }

    #[test]
    fn single_day_only_matching_variables_contribute() {
        let mut routine = hydration_routine();
        routine.variables.push(RoutineVariable {
            variable_id: 11,
            variable_name: "Weight".to_string(),
            default_value: "70".to_string(),
            default_unit: Some("kg".to_string()),
            weekdays: BTreeSet::from([2]),
            times: vec![time("07:00", None)],
        });

        let tuesday = generate_planned_routine_logs(
            std::slice::from_ref(&routine),
            date("2024-01-02"),
            date("2024-01-02"),
        );
        assert_eq!(tuesday.len(), 1);
        assert_eq!(tuesday[0].variable_name, "Weight");

        let monday = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-01"));
        assert_eq!(monday.len(), 2);
        assert!(monday.iter().all(|log| log.variable_name == "Hydration"));
    }

    #[test]
    fn no_matching_weekday_in_range_yields_nothing() {
        let mut routine = hydration_routine();
        routine.variables[0].weekdays = BTreeSet::from([6, 7]);

        let logs = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-05"));
        assert!(logs.is_empty());
    }

    #[test]
    fn inverted_range_yields_nothing() {
        let logs = generate_planned_routine_logs(
            &[hydration_routine()],
            date("2024-01-07"),
            date("2024-01-01"),
        );
        assert!(logs.is_empty());
    }

    #[test]
    fn generation_is_idempotent() {
        let routines = vec![hydration_routine()];
        let first = generate_planned_routine_logs(&routines, date("2024-01-01"), date("2024-01-31"));
        let second = generate_planned_routine_logs(&routines, date("2024-01-01"), date("2024-01-31"));
        assert_eq!(first, second);
    }

    #[test]
    fn variables_sharing_a_slot_are_both_emitted() {
        let mut routine = hydration_routine();
        let mut coffee = routine.variables[0].clone();
        coffee.variable_id = 12;
        coffee.variable_name = "Coffee".to_string();
        routine.variables.push(coffee);

        let logs = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-01"));
        assert_eq!(logs.len(), 4);
    }

    #[test]
    fn invalid_time_strings_pass_through() {
        let mut routine = hydration_routine();
        routine.variables[0].times = vec![time("not a time", None)];

        let logs = generate_planned_routine_logs(&[routine], date("2024-01-01"), date("2024-01-01"));
        assert_eq!(logs[0].time_of_day, "not a time");
    }

    #[test]
    fn range_validation() {
        assert!(validate_range(date("2024-01-01"), date("2024-01-01"), 1).is_ok());
        assert!(validate_range(date("2024-01-02"), date("2024-01-01"), 10).is_err());
        assert!(validate_range(date("2024-01-01"), date("2024-01-31"), 30).is_err());
        assert!(validate_range(date("2024-01-01"), date("2024-01-30"), 30).is_ok());
    }

    #[test]
    fn selecting_routines_by_id() {
        let mut other = hydration_routine();
        other.id = 2;
        let routines = vec![hydration_routine(), other];

        assert_eq!(select_routines(routines.clone(), &[]).len(), 2);
        let selected = select_routines(routines, &[2, 99]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id, 2);
    }

    #[test]
    fn toggling_and_grouping_for_review() {
        let mut logs = generate_planned_routine_logs(
            &[hydration_routine()],
            date("2024-01-01"),
            date("2024-01-07"),
        );

        assert!(set_enabled(&mut logs, "1-10-2024-01-03-20:00", false));
        assert!(!set_enabled(&mut logs, "missing", false));
        assert_eq!(enabled_count(&logs), 5);

        let groups = group_by_date(&logs);
        assert_eq!(groups.len(), 3);
        let wednesday = &groups[&date("2024-01-03")];
        assert_eq!(wednesday[0].time_of_day, "08:00");
        assert!(!wednesday[1].enabled);
    }
}
