//! Ready-made subscriber callbacks

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use contracts::InteractionRecord;

use crate::entry::EntryList;
use crate::registry::ObserverCallback;

/// Subscriber that logs a one-line summary of every entry
pub fn log_observer(name: impl Into<String>) -> ObserverCallback {
    let name = name.into();
    Rc::new(move |list: &EntryList| {
        for record in list.entries() {
            info!(
                observer = %name,
                source = %record.scroll_source(),
                start_time = record.start_time(),
                duration = record.duration(),
                frames_expected = record.frames_expected(),
                frames_produced = record.frames_produced(),
                distance_x = record.distance_x(),
                distance_y = record.distance_y(),
                "scroll entry"
            );
        }
    })
}

/// Subscriber forwarding each entry into an async channel.
///
/// Sending never blocks. Entries are dropped with a warning once the receiver
/// is gone.
pub fn channel_observer(tx: mpsc::UnboundedSender<InteractionRecord>) -> ObserverCallback {
    Rc::new(move |list: &EntryList| {
        for record in list.entries() {
            if tx.send(record.clone()).is_err() {
                warn!("entry receiver closed, entry dropped");
            }
        }
    })
}

/// Subscriber collecting entries in memory, plus the shared buffer it fills
pub fn collecting_observer() -> (ObserverCallback, Rc<RefCell<Vec<InteractionRecord>>>) {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&buffer);
    let callback: ObserverCallback = Rc::new(move |list: &EntryList| {
        sink.borrow_mut().extend(list.entries().iter().cloned());
    });
    (callback, buffer)
}
