use std::sync::{Arc, Mutex};

use scroller_core::{CellCoord, SelectionReport};
use scroller_network::{NetworkError, SelectionNotifier, SelectionSink};

#[derive(Clone, Default)]
struct RecordingSink {
    delivered: Arc<Mutex<Vec<SelectionReport>>>,
    fail: bool,
}

impl SelectionSink for RecordingSink {
    fn notify(&self, report: &SelectionReport) -> Result<(), NetworkError> {
        self.delivered
            .lock()
            .expect("sink lock poisoned")
            .push(report.clone());
        if self.fail {
            return Err(NetworkError::Status {
                url: "http://fake/selection".to_owned(),
                status: 500,
            });
        }
        Ok(())
    }
}

fn report(column: u32, row: u32) -> SelectionReport {
    SelectionReport::new(CellCoord::new(column, row), "XH")
}

#[test]
fn reports_are_delivered_in_order() {
    let sink = RecordingSink::default();
    let delivered = Arc::clone(&sink.delivered);
    let notifier = SelectionNotifier::spawn(sink).expect("worker starts");

    notifier.notify(report(0, 0));
    notifier.notify(report(3, 0));
    notifier.notify(report(0, 0));
    notifier.shutdown();

    assert_eq!(
        *delivered.lock().expect("sink lock poisoned"),
        vec![report(0, 0), report(3, 0), report(0, 0)]
    );
}

#[test]
fn failed_deliveries_are_not_retried() {
    let sink = RecordingSink {
        fail: true,
        ..RecordingSink::default()
    };
    let delivered = Arc::clone(&sink.delivered);
    let notifier = SelectionNotifier::spawn(sink).expect("worker starts");

    notifier.notify(report(1, 0));
    notifier.notify(report(9, 0));
    drop(notifier);

    assert_eq!(delivered.lock().expect("sink lock poisoned").len(), 2);
}
