use std::{
    sync::mpsc::{self, Sender},
    thread::{self, JoinHandle},
};

use scroller_core::SelectionReport;
use tracing::{debug, warn};

use crate::{NetworkError, SelectionSink};

/// Forwards selection reports to a sink on a worker thread.
///
/// Reports are delivered in submission order. Failed deliveries are logged and
/// dropped.
#[derive(Debug)]
pub struct SelectionNotifier {
    sender: Option<Sender<SelectionReport>>,
    worker: Option<JoinHandle<()>>,
}

impl SelectionNotifier {
    /// Starts the worker thread delivering to `sink`.
    pub fn spawn<S: SelectionSink>(sink: S) -> Result<Self, NetworkError> {
        let (sender, receiver) = mpsc::channel::<SelectionReport>();
        let worker = thread::Builder::new()
            .name("selection-notifier".to_owned())
            .spawn(move || {
                for report in receiver {
                    match sink.notify(&report) {
                        Ok(()) => debug!(x = report.x, y = report.y, "selection reported"),
                        Err(error) => warn!(
                            %error,
                            x = report.x,
                            y = report.y,
                            "selection report failed"
                        ),
                    }
                }
            })?;
        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queues a report without blocking.
    pub fn notify(&self, report: SelectionReport) {
        let Some(sender) = &self.sender else {
            return;
        };
        if sender.send(report).is_err() {
            warn!("selection notifier stopped, report dropped");
        }
    }

    /// Delivers queued reports and stops the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("selection notifier worker panicked");
            }
        }
    }
}

impl Drop for SelectionNotifier {
    fn drop(&mut self) {
        self.stop();
    }
}
