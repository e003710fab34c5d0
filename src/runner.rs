// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Queue Selection and Deletion
//!
//! This module decides which of the discovered queues a run deletes and drives
//! the deletions one at a time.
//!
//! Matching happens against the freshly listed queues, never by asking the
//! broker to delete a name and interpreting its answer: a literal target that
//! is not listed produces a `NotFound` outcome without any delete being sent.
//! The first failed deletion stops the run, later queues are left untouched.

use crate::{
    channel::QueueDeleter,
    errors::QcleanError,
    management::QueueDiscovery,
    queue::{QueueName, TargetSpec},
};
use std::{fmt, io::Write};
use tracing::{debug, warn};

/// What happened to one queue considered by a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionOutcome {
    Deleted(QueueName),
    /// The literal target was not among the discovered queues
    NotFound(QueueName),
    /// The broker rejected the delete; carries the error message
    Failed(QueueName, String),
}

impl fmt::Display for DeletionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeletionOutcome::Deleted(name) => write!(f, "Queue {} deleted successfully", name),
            DeletionOutcome::NotFound(name) => write!(f, "Queue {} not found", name),
            DeletionOutcome::Failed(name, cause) => {
                write!(f, "Failed to delete the queue {}: {}", name, cause)
            }
        }
    }
}

/// Result of a run: how many queues were listed and what happened to the
/// selected ones, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub discovered: usize,
    pub outcomes: Vec<DeletionOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        !self
            .outcomes
            .iter()
            .any(|o| matches!(o, DeletionOutcome::Failed(..)))
    }

    pub fn deleted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DeletionOutcome::Deleted(_)))
            .count()
    }

    /// Turns the report into the process-level verdict.
    ///
    /// # Returns
    /// Ok(()) when no deletion failed, otherwise the `DeleteError` of the
    /// failed queue
    pub fn into_result(self) -> Result<(), QcleanError> {
        for outcome in self.outcomes {
            if let DeletionOutcome::Failed(name, cause) = outcome {
                return Err(QcleanError::DeleteError(name.as_str().to_owned(), cause));
            }
        }

        Ok(())
    }
}

/// Deletes the queues of `queues` selected by `target`.
///
/// Queues are processed in the given order. Processing stops right after the
/// first failed deletion.
///
/// # Parameters
/// * `target` - Which queues to delete
/// * `queues` - The queues currently known to the broker
/// * `deleter` - Issues the actual deletions
///
/// # Returns
/// The report of the run
pub async fn run<D>(target: &TargetSpec, queues: &[QueueName], deleter: &D) -> RunReport
where
    D: QueueDeleter + ?Sized,
{
    let mut report = RunReport {
        discovered: queues.len(),
        outcomes: vec![],
    };

    if queues.is_empty() {
        debug!("no queues on the broker, nothing to do");
        return report;
    }

    for queue in queues.iter().filter(|q| target.matches(q)) {
        match deleter.delete(queue).await {
            Ok(()) => report.outcomes.push(DeletionOutcome::Deleted(queue.clone())),
            Err(err) => {
                warn!(queue = queue.as_str(), "aborting run after failed deletion");
                report
                    .outcomes
                    .push(DeletionOutcome::Failed(queue.clone(), cause_of(err)));
                return report;
            }
        }
    }

    if let TargetSpec::Literal(name) = target {
        if report.outcomes.is_empty() {
            report.outcomes.push(DeletionOutcome::NotFound(name.clone()));
        }
    }

    report
}

/// Lists the broker's queues and runs the selection against them.
///
/// A discovery failure ends the run before any deletion is attempted.
pub async fn clean<Q, D>(
    target: &TargetSpec,
    discovery: &Q,
    deleter: &D,
) -> Result<RunReport, QcleanError>
where
    Q: QueueDiscovery + ?Sized,
    D: QueueDeleter + ?Sized,
{
    let queues = discovery.list_queues().await?;
    Ok(run(target, &queues, deleter).await)
}

/// Runs `clean` and writes the report to `out`.
///
/// Writes `--> Found N queues` once discovery succeeded, then one line per
/// outcome. Nothing is written when discovery fails.
///
/// # Returns
/// Ok(()) when no deletion failed, otherwise the error that ended the run
pub async fn clean_and_report<Q, D, W>(
    target: &TargetSpec,
    discovery: &Q,
    deleter: &D,
    out: &mut W,
) -> Result<(), QcleanError>
where
    Q: QueueDiscovery + ?Sized,
    D: QueueDeleter + ?Sized,
    W: Write + ?Sized,
{
    let report = clean(target, discovery, deleter).await?;
    write_report(&report, out)?;
    report.into_result()
}

fn write_report<W>(report: &RunReport, out: &mut W) -> Result<(), QcleanError>
where
    W: Write + ?Sized,
{
    writeln!(out, "--> Found {} queues", report.discovered).map_err(output_error)?;
    for outcome in &report.outcomes {
        writeln!(out, "{}", outcome).map_err(output_error)?;
    }

    out.flush().map_err(output_error)
}

fn output_error(err: std::io::Error) -> QcleanError {
    QcleanError::OutputError(err.to_string())
}

fn cause_of(err: QcleanError) -> String {
    match err {
        QcleanError::DeleteError(_, cause) => cause,
        other => other.to_string(),
    }
}
