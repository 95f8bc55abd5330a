//! Showcase - the single owner of animation and caption state
//!
//! All writers (frame ticks, key handlers, the caption fetch) go through one
//! `Showcase`. The caption fetch runs as a separate task and hands its table
//! back over a oneshot channel; the table is swapped in whole on the next
//! frame. After [`Showcase::teardown`] a late delivery is simply dropped.

use std::time::Instant;

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::eclipse::{DriverSettings, Phase, Progress, ProgressDriver, Visuals};
use crate::narrative::{NarrativeEntry, NarrativeFetcher, NarrativeTable};

/// Everything a view needs for one paint
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub progress: Progress,
    pub phase: Phase,
    pub playing: bool,
    pub multiplier: f64,
    pub visuals: Visuals,
    pub caption: &'a NarrativeEntry,
    pub narrative: &'a NarrativeTable,
}

/// Animation state plus captions
#[derive(Debug)]
pub struct Showcase {
    driver: ProgressDriver,
    narrative: NarrativeTable,
    pending: Option<oneshot::Receiver<NarrativeTable>>,
    torn_down: bool,
}

impl Showcase {
    /// Built-in captions, playing from progress 0
    pub fn new(settings: DriverSettings) -> Self {
        Self {
            driver: ProgressDriver::new(settings),
            narrative: NarrativeTable::builtin(),
            pending: None,
            torn_down: false,
        }
    }

    pub fn driver(&self) -> &ProgressDriver {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut ProgressDriver {
        &mut self.driver
    }

    pub fn narrative(&self) -> &NarrativeTable {
        &self.narrative
    }

    /// Caption for the current phase
    pub fn caption(&self) -> &NarrativeEntry {
        self.narrative.entry(self.driver.phase())
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn has_pending_narrative(&self) -> bool {
        self.pending.is_some()
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            progress: self.driver.progress(),
            phase: self.driver.phase(),
            playing: self.driver.is_playing(),
            multiplier: self.driver.multiplier(),
            visuals: self.driver.visuals(),
            caption: self.caption(),
            narrative: &self.narrative,
        }
    }

    /// Start the caption fetch in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_narrative(&mut self, fetcher: NarrativeFetcher) {
        let (tx, rx) = oneshot::channel();
        self.attach_narrative(rx);
        tokio::spawn(async move {
            let table = fetcher.fetch_or_builtin().await;
            if tx.send(table).is_err() {
                debug!("spawn_narrative: showcase gone, dropping captions");
            }
        });
    }

    /// Accept a table delivered later on `rx`
    pub fn attach_narrative(&mut self, rx: oneshot::Receiver<NarrativeTable>) {
        if self.torn_down {
            return;
        }
        self.pending = Some(rx);
    }

    /// Swap in a delivered table, if one arrived
    ///
    /// Returns true when the table changed.
    pub fn poll_narrative(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(table) => {
                self.pending = None;
                self.apply_narrative(table)
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                debug!("poll_narrative: sender dropped without a table");
                self.pending = None;
                false
            }
        }
    }

    /// Replace the caption table as one value
    pub fn apply_narrative(&mut self, table: NarrativeTable) -> bool {
        if self.torn_down {
            return false;
        }
        if table == self.narrative {
            return false;
        }
        info!(source = %table.source(), "Captions replaced");
        self.narrative = table;
        true
    }

    /// Frame callback
    pub fn frame(&mut self, now: Instant) {
        if self.torn_down {
            return;
        }
        self.driver.frame(now);
        self.poll_narrative();
    }

    /// Stop accepting frames and captions
    pub fn teardown(&mut self) {
        debug!("Showcase::teardown: called");
        self.torn_down = true;
        self.driver.pause();
        // Dropping the receiver makes the fetch task's send fail quietly
        self.pending = None;
    }
}

impl Default for Showcase {
    fn default() -> Self {
        Self::new(DriverSettings::default())
    }
}
