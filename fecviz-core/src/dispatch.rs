use crate::view::ColorState;
use fecviz_common::{ContributionRecord, FecVizError, Result};
use std::sync::mpsc::{self, Receiver, Sender};

/// What a page or app tells a histogram view.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    DataUpdated(Vec<ContributionRecord>),
    ColorChanged(ColorState),
}

#[derive(Debug, Clone)]
pub struct Dispatch {
    tx: Sender<ViewEvent>,
}

pub fn channel() -> (Dispatch, Receiver<ViewEvent>) {
    let (tx, rx) = mpsc::channel();
    (Dispatch { tx }, rx)
}

impl Dispatch {
    /// A handle nobody listens on; every send fails with `ChannelClosed`.
    pub fn detached() -> Self {
        channel().0
    }

    pub fn send(&self, event: ViewEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| FecVizError::ChannelClosed)
    }
}
