use anyhow::{Context, Result};
use chrono::{DateTime, Days, Local, NaiveDate, NaiveTime};
use std::future::Future;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

const POLL_INTERVAL: Duration = Duration::from_secs(30);

// The schedule is re-read every poll; `Ok(None)` means auto-logging is off.
pub async fn run_daily_scheduler<S, F, Fut>(mut schedule: S, mut task: F) -> Result<()>
where
    S: FnMut() -> Result<Option<NaiveTime>>,
    F: FnMut(NaiveDate) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let mut announced: Option<NaiveTime> = None;

    loop {
        let run_at = match schedule() {
            Ok(Some(time)) => time,
            Ok(None) => {
                if announced.take().is_some() {
                    info!("auto-log schedule disabled");
                }
                sleep(POLL_INTERVAL).await;
                continue;
            }
            Err(error) => {
                error!(error = %error, "failed to load auto-log schedule");
                sleep(POLL_INTERVAL).await;
                continue;
            }
        };

        let now = Local::now();
        let wait = match next_run_after(now, run_at).and_then(|next| {
            (next - now)
                .to_std()
                .context("Failed to compute auto-log delay")
        }) {
            Ok(wait) => wait,
            Err(error) => {
                error!(error = %error, "failed to schedule auto-log run");
                sleep(POLL_INTERVAL).await;
                continue;
            }
        };

        if announced != Some(run_at) {
            info!(
                at = %run_at.format("%H:%M"),
                seconds = wait.as_secs(),
                "next auto-log run scheduled"
            );
            announced = Some(run_at);
        }

        if wait > POLL_INTERVAL {
            sleep(POLL_INTERVAL).await;
            continue;
        }

        sleep(wait).await;

        let date = Local::now().date_naive();
        if let Err(error) = task(date).await {
            error!(error = %error, date = %date, "scheduled auto-log run failed");
        }

        // Step past the trigger minute so the same run is not picked up twice.
        sleep(Duration::from_secs(1)).await;
    }
}

// Earliest local instant at `run_at` strictly after `now`. Days where the
// wall-clock time does not exist (DST gaps) are skipped.
fn next_run_after(now: DateTime<Local>, run_at: NaiveTime) -> Result<DateTime<Local>> {
    let today = now.date_naive();

    (0..=2)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .filter_map(|day| day.and_time(run_at).and_local_timezone(Local).earliest())
        .find(|candidate| *candidate > now)
        .with_context(|| format!("No upcoming local time for {}", run_at.format("%H:%M")))
}
