mod backup;
mod receive;
mod send;

pub use backup::BackupPane;
pub use receive::ReceivePane;
pub use send::SendPane;

use crate::app::bus::EventBus;

/// A content region reacting to the shell events. Panes never talk to one
/// another; everything they know arrives over the bus.
pub trait Pane {
    fn attach(&self, bus: &EventBus);
}
