//! Background loaders: one thread per dataset.
//!
//! Each thread reads its CSV once, sends a single response and exits. The
//! UI thread applies responses in arrival order; there is no ordering
//! between the two.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use log::debug;

use sectorscope_core::config::DataPaths;
use sectorscope_core::dashboard::DashboardEvent;
use sectorscope_core::data::{load_company_summary, load_timeline_data, CompanySummaryRow, TimelineData};

/// Responses sent from the loaders back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Summary(Result<Vec<CompanySummaryRow>, String>),
    Timeline(Result<TimelineData, String>),
}

impl WorkerResponse {
    pub fn into_event(self) -> DashboardEvent {
        match self {
            WorkerResponse::Summary(result) => DashboardEvent::SummaryLoaded(result),
            WorkerResponse::Timeline(result) => DashboardEvent::TimelineLoaded(result),
        }
    }

    /// Dataset name and cause, when the load failed.
    pub fn failure(&self) -> Option<(&'static str, &str)> {
        match self {
            WorkerResponse::Summary(Err(e)) => Some(("summary", e)),
            WorkerResponse::Timeline(Err(e)) => Some(("prices", e)),
            _ => None,
        }
    }
}

fn spawn_named<F>(name: &str, f: F) -> JoinHandle<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.into())
        .spawn(f)
        .expect("failed to spawn loader thread")
}

/// Start both loads. Sends exactly one response per dataset.
pub fn spawn_loaders(paths: &DataPaths, tx: Sender<WorkerResponse>) -> Vec<JoinHandle<()>> {
    let summary: PathBuf = paths.summary.clone();
    let summary_tx = tx.clone();
    let summary_handle = spawn_named("sectorscope-summary", move || {
        debug!("loading summary from {}", summary.display());
        let result = load_company_summary(&summary)
            .map_err(|e| format!("{}: {e}", summary.display()));
        let _ = summary_tx.send(WorkerResponse::Summary(result));
    });

    let prices = paths.prices.clone();
    let filings = paths.filings.clone();
    let timeline_handle = spawn_named("sectorscope-timeline", move || {
        debug!("loading prices from {}", prices.display());
        let result = load_timeline_data(&prices, filings.as_deref())
            .map_err(|e| format!("{}: {e}", prices.display()));
        let _ = tx.send(WorkerResponse::Timeline(result));
    });

    vec![summary_handle, timeline_handle]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn both_loaders_report_once() {
        let dir = tempfile::tempdir().unwrap();
        let summary = dir.path().join("s.csv");
        std::fs::write(
            &summary,
            "ticker,sector,avg_return,volatility,avg_volume,n_days\nAAPL,Technology,0.001,0.02,100,10\n",
        )
        .unwrap();
        let paths = DataPaths {
            summary,
            prices: dir.path().join("missing.csv"),
            filings: None,
        };

        let (tx, rx) = mpsc::channel();
        for handle in spawn_loaders(&paths, tx) {
            handle.join().unwrap();
        }
        let responses: Vec<WorkerResponse> = rx.iter().collect();
        assert_eq!(responses.len(), 2);

        let summary_ok = responses
            .iter()
            .any(|r| matches!(r, WorkerResponse::Summary(Ok(rows)) if rows.len() == 1));
        assert!(summary_ok);
        let failure = responses.iter().find_map(WorkerResponse::failure);
        assert!(matches!(failure, Some(("prices", cause)) if cause.contains("missing.csv")));
    }
}
