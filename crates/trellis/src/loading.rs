//! Background content loading.
//!
//! Per-window load tasks run to completion on a worker thread and report
//! back over a channel. A started task is never cancelled; a result that
//! arrives after its window closed or was re-attached is discarded via the
//! (window, epoch) guard, not applied.

use std::sync::mpsc;
use std::thread;

use crate::{error::Result, tree::WindowId};

/// A unit of background loading work dispatched for one window.
pub trait LoadTask: Send {
    /// Execute the load. Runs on a worker thread.
    fn run(self: Box<Self>) -> Result<()>;
}

impl<F> LoadTask for F
where
    F: FnOnce() -> Result<()> + Send,
{
    fn run(self: Box<Self>) -> Result<()> {
        (*self)()
    }
}

/// A task queued for dispatch.
struct QueuedTask {
    /// Window the result belongs to.
    window: WindowId,
    /// The window's attach epoch at dispatch time.
    epoch: u64,
    /// The work itself.
    task: Box<dyn LoadTask>,
}

/// A completed load, possibly stale.
pub(crate) struct LoadResult {
    /// Window the result belongs to.
    pub window: WindowId,
    /// The attach epoch captured at dispatch.
    pub epoch: u64,
    /// Task outcome.
    pub outcome: Result<()>,
}

/// Aggregates the frame's outstanding load tasks into a single batch.
///
/// Tasks are queued with [`Loader::add_task`] and dispatched together by
/// [`Loader::run_all`]; one failing task logs but does not abort the batch.
pub struct Loader {
    /// Result sender handed to worker threads.
    tx: mpsc::Sender<LoadResult>,
    /// Result receiver drained by the frame loop.
    rx: mpsc::Receiver<LoadResult>,
    /// Tasks queued since the last dispatch.
    queue: Vec<QueuedTask>,
    /// Dispatched tasks that have not yet reported.
    pending: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// Construct an idle loader.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            tx,
            rx,
            queue: Vec::new(),
            pending: 0,
        }
    }

    /// Queue a task for the next dispatch.
    pub fn add_task(&mut self, window: WindowId, epoch: u64, task: Box<dyn LoadTask>) {
        self.queue.push(QueuedTask {
            window,
            epoch,
            task,
        });
    }

    /// Dispatch all queued tasks on a worker thread.
    pub fn run_all(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let batch: Vec<QueuedTask> = self.queue.drain(..).collect();
        self.pending += batch.len();
        let tx = self.tx.clone();
        thread::spawn(move || {
            for queued in batch {
                let outcome = queued.task.run();
                if tx
                    .send(LoadResult {
                        window: queued.window,
                        epoch: queued.epoch,
                        outcome,
                    })
                    .is_err()
                {
                    // The loader was dropped; remaining results have no home.
                    break;
                }
            }
        });
    }

    /// Drain results that have arrived since the last poll.
    pub(crate) fn poll(&mut self) -> Vec<LoadResult> {
        let results: Vec<LoadResult> = self.rx.try_iter().collect();
        self.pending = self.pending.saturating_sub(results.len());
        results
    }

    /// Number of dispatched tasks that have not yet reported.
    pub fn pending(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use slotmap::SlotMap;

    use super::*;
    use crate::error::Error;

    /// Spin until the loader has drained `n` results or a timeout passes.
    fn drain(loader: &mut Loader, n: usize) -> Vec<LoadResult> {
        let mut out = Vec::new();
        for _ in 0..200 {
            out.extend(loader.poll());
            if out.len() >= n {
                break;
            }
            thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn batch_isolates_failures() {
        let mut map: SlotMap<WindowId, ()> = SlotMap::with_key();
        let a = map.insert(());
        let b = map.insert(());

        let mut loader = Loader::new();
        loader.add_task(
            a,
            1,
            Box::new(|| -> Result<()> { Err(Error::Load("missing texture".into())) }),
        );
        loader.add_task(b, 1, Box::new(|| -> Result<()> { Ok(()) }));
        loader.run_all();
        assert_eq!(loader.pending(), 2);

        let results = drain(&mut loader, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(loader.pending(), 0);
        let failed = results.iter().find(|r| r.window == a).unwrap();
        assert!(failed.outcome.is_err());
        let ok = results.iter().find(|r| r.window == b).unwrap();
        assert!(ok.outcome.is_ok());
    }

    #[test]
    fn run_all_without_tasks_is_idle() {
        let mut loader = Loader::new();
        loader.run_all();
        assert_eq!(loader.pending(), 0);
        assert!(loader.poll().is_empty());
    }
}
