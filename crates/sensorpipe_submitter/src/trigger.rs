use crate::policy::EntryPointPolicy;
use crate::submitter::{ActivationEvent, Submitter};

use chrono::{DateTime, Utc};
use cron::Schedule;
use sensorpipe_core::prelude::*;
use std::str::FromStr;
use tracing::{error, info, warn};

/// Fires a [`Submitter`] on a cron schedule, evaluated in UTC.
///
/// Expressions use six fields with second precision, e.g. `0 0 9,17 * * *`.
#[derive(Debug, Clone)]
pub struct CronTrigger {
    expression: String,
    schedule: Schedule,
}

impl CronTrigger {
    pub fn new(expression: &str) -> Result<Self, ConfigurationError> {
        let schedule =
            Schedule::from_str(expression).map_err(|e| ConfigurationError::InvalidSchedule {
                expression: expression.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            expression: expression.to_string(),
            schedule,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The first firing strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Submits once per firing until `shutdown` resolves.
    ///
    /// A failed submission is logged and the loop waits for the next firing.
    /// Firings missed while the process was suspended are skipped, not replayed.
    pub async fn run<E, P>(&self, submitter: &Submitter<E, P>, shutdown: impl Future<Output = ()>)
    where
        E: ExecutionService,
        P: EntryPointPolicy,
    {
        tokio::pin!(shutdown);
        let mut cursor = Utc::now();
        info!(schedule = %self.expression, "trigger started");

        loop {
            let Some(next) = self.next_after(cursor) else {
                warn!(schedule = %self.expression, "schedule has no further firings");
                return;
            };

            let now = Utc::now();
            if next < now {
                warn!(missed = %next, "missed firing, resuming from now");
                cursor = now;
                continue;
            }

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::select! {
                _ = &mut shutdown => {
                    info!("trigger stopped");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            cursor = next;
            let event = ActivationEvent { fired_at: next };
            if let Err(e) = submitter.submit(&event).await {
                error!(error = %e, fired_at = %next, "activation failed");
            }
        }
    }
}
