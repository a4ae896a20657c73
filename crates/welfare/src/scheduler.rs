//! Recurring financial assistance generation.
//!
//! `process_recurring_invoices` is run by a background task on a cron
//! schedule and, for a single template, right after the template is
//! created through the API.

use std::{sync::Arc, time::Duration};

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::{sync::broadcast, task::JoinHandle};
use welfare_core::assistance::{
    occurrence_from_template, plan_occurrences, recurring_log_for, FinancialAssistance,
};
use welfare_core::schedule::{Schedule, ScheduleError};
use welfare_core::storage::{FinancialAssistanceRepository, Result as RepositoryResult};

use crate::config::Config;

/// Outcome of one generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub templates: usize,
    pub generated: usize,
}

/// Generates the occurrences of one template that are due by `reference`.
///
/// Dates that already have an occurrence are skipped, so running this
/// twice for the same reference creates nothing the second time.
pub async fn process_template(
    repo: &dyn FinancialAssistanceRepository,
    template: &FinancialAssistance,
    reference: NaiveDate,
) -> RepositoryResult<Vec<FinancialAssistance>> {
    let last = repo.last_generated_date(template.id).await?;
    let mut created = Vec::new();

    for date in plan_occurrences(template, last, reference) {
        if repo.occurrence_exists(template.id, date).await? {
            continue;
        }
        let now = Utc::now();
        let occurrence = occurrence_from_template(template, date, now);
        let log = recurring_log_for(template, &occurrence, now);
        let stored = repo.create_occurrence(&occurrence, &log).await?;
        tracing::debug!(
            template_id = template.id,
            occurrence_id = stored.id,
            %date,
            "Generated recurring assistance"
        );
        created.push(stored);
    }

    Ok(created)
}

/// Processes every template active on `reference`, one at a time.
///
/// A failing template is logged and skipped.
pub async fn process_recurring_invoices(
    repo: &dyn FinancialAssistanceRepository,
    reference: NaiveDate,
) -> RepositoryResult<RunSummary> {
    let templates = repo.list_active_templates(reference).await?;
    let mut summary = RunSummary {
        templates: templates.len(),
        generated: 0,
    };

    for template in &templates {
        match process_template(repo, template, reference).await {
            Ok(created) => summary.generated += created.len(),
            Err(e) => {
                tracing::error!(template_id = template.id, error = %e, "Recurring template failed")
            }
        }
    }

    tracing::info!(
        %reference,
        templates = summary.templates,
        generated = summary.generated,
        "Recurring assistance run finished"
    );
    Ok(summary)
}

/// Runs generation at every fire time of `schedule` until shutdown.
pub async fn run_scheduler(
    repo: Arc<dyn FinancialAssistanceRepository>,
    schedule: Schedule,
    mut shutdown: broadcast::Receiver<()>,
) {
    loop {
        let now = Utc::now();
        let Some(next) = schedule.next_fire(now) else {
            tracing::warn!(cron = schedule.cron().expression(), "Schedule never fires again");
            return;
        };
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!(next_fire = %next, "Recurring scheduler sleeping");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                let today = schedule.local_date(Utc::now());
                if let Err(e) = process_recurring_invoices(repo.as_ref(), today).await {
                    tracing::error!(error = %e, "Recurring assistance run failed");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Recurring scheduler stopped");
                return;
            }
        }
    }
}

/// Parses the configured schedule and spawns the scheduler task.
///
/// Returns `Ok(None)` when the scheduler is disabled.
pub fn spawn_scheduler(
    config: &Config,
    repo: Arc<dyn FinancialAssistanceRepository>,
    shutdown: broadcast::Receiver<()>,
) -> Result<Option<JoinHandle<()>>, ScheduleError> {
    if config.disable_recurring_cron {
        tracing::info!("Recurring scheduler disabled");
        return Ok(None);
    }

    let schedule = Schedule::new(&config.recurring_cron, &config.recurring_timezone)?;
    tracing::info!(
        cron = %config.recurring_cron,
        timezone = %config.recurring_timezone,
        "Starting recurring scheduler"
    );
    Ok(Some(tokio::spawn(run_scheduler(repo, schedule, shutdown))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use welfare_core::audit::Audit;
    use welfare_core::storage::RecurringInvoiceLogRepository;

    use crate::storage::InMemoryRepository;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(frequency: &str, start: NaiveDate, end: NaiveDate) -> FinancialAssistance {
        FinancialAssistance {
            id: 0,
            file_id: 5,
            assistance_type: Some(2),
            financial_amount: Some(750.0),
            date_of_assistance: Some(start),
            assisted_by: None,
            sector: None,
            program: None,
            project: None,
            give_to: Some("Applicant".to_string()),
            starting_date: Some(start),
            end_date: Some(end),
            frequency: Some(frequency.to_string()),
            is_recurring: true,
            is_auto_generated: false,
            recurring_source_id: None,
            center_id: Some(3),
            audit: Audit::new("admin", Utc::now()),
        }
    }

    fn config(cron: &str, timezone: &str, disabled: bool) -> Config {
        Config {
            sqlite_path: "welfare.db".to_string(),
            recurring_cron: cron.to_string(),
            recurring_timezone: timezone.to_string(),
            disable_recurring_cron: disabled,
            request_timeout_seconds: 30,
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
        }
    }

    #[tokio::test]
    async fn test_process_template_is_reentrant() {
        let repo = InMemoryRepository::new();
        let stored = repo
            .create_assistance(&template("monthly", date(2025, 1, 31), date(2025, 6, 30)))
            .await
            .unwrap();

        let created = process_template(&repo, &stored, date(2025, 4, 15)).await.unwrap();
        let dates: Vec<_> = created.iter().filter_map(|r| r.date_of_assistance).collect();
        assert_eq!(dates, vec![date(2025, 2, 28), date(2025, 3, 28)]);
        assert!(created.iter().all(|r| r.is_auto_generated && !r.is_recurring));
        assert!(created.iter().all(|r| r.recurring_source_id == Some(stored.id)));
        assert!(created.iter().all(|r| r.audit.created_by == "system"));
        assert!(created.iter().all(|r| r.center_id == Some(3)));

        let again = process_template(&repo, &stored, date(2025, 4, 15)).await.unwrap();
        assert!(again.is_empty());

        let logs = repo.list_recurring_logs(Some(stored.id)).await.unwrap();
        assert_eq!(logs.len(), 2);
        let next_runs: Vec<_> = logs.iter().filter_map(|l| l.next_run_date).collect();
        assert_eq!(next_runs, vec![date(2025, 4, 28), date(2025, 3, 28)]);
        assert!(logs.iter().all(|l| l.created_by_system && l.applicant_id == 5));
    }

    #[tokio::test]
    async fn test_run_covers_active_templates_only() {
        let repo = InMemoryRepository::new();
        repo.create_assistance(&template("daily", date(2025, 3, 1), date(2025, 3, 31)))
            .await
            .unwrap();
        repo.create_assistance(&template("weekly", date(2025, 1, 1), date(2025, 2, 1)))
            .await
            .unwrap();
        repo.create_assistance(&template("yearly", date(2025, 3, 1), date(2025, 3, 31)))
            .await
            .unwrap();

        let summary = process_recurring_invoices(&repo, date(2025, 3, 4)).await.unwrap();
        // The expired weekly template is skipped and the yearly one plans nothing.
        assert_eq!(summary, RunSummary { templates: 2, generated: 3 });

        let summary = process_recurring_invoices(&repo, date(2025, 3, 4)).await.unwrap();
        assert_eq!(summary.generated, 0);
    }

    #[tokio::test]
    async fn test_spawn_rejects_bad_schedule() {
        let repo: Arc<dyn FinancialAssistanceRepository> = Arc::new(InMemoryRepository::new());
        let (tx, _) = broadcast::channel(1);

        let result =
            spawn_scheduler(&config("0 25 * * *", "UTC", false), repo.clone(), tx.subscribe());
        assert!(matches!(result, Err(ScheduleError::InvalidField { .. })));

        let result = spawn_scheduler(
            &config("0 2 * * *", "Mars/Olympus", false),
            repo.clone(),
            tx.subscribe(),
        );
        assert!(matches!(result, Err(ScheduleError::UnknownTimezone(_))));

        let result = spawn_scheduler(&config("bogus", "UTC", true), repo, tx.subscribe());
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_scheduler_stops_on_shutdown() {
        let repo: Arc<dyn FinancialAssistanceRepository> = Arc::new(InMemoryRepository::new());
        let (tx, _) = broadcast::channel(1);

        let nightly = config("0 2 * * *", "Africa/Johannesburg", false);
        let handle = spawn_scheduler(&nightly, repo, tx.subscribe()).unwrap().unwrap();
        tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }
}
