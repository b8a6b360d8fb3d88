use std::thread;

use super::ThreadComm;
use crate::Error;

/// Runs a function on a number of worker threads, each acting as one process
pub struct World {}
impl World {
    /// Run `f` on `nprocs` threads and collect the results in rank order.
    ///
    /// Every rank must make the same sequence of collective calls, or the
    /// run deadlocks.
    pub fn run<R, F>(nprocs: usize, f: F) -> Result<Vec<R>, Error>
    where
        R: Send,
        F: Fn(&ThreadComm) -> R + Sync,
    {
        let comms = ThreadComm::create(nprocs);
        let f = &f;
        thread::scope(|s| {
            let handles: Vec<_> = comms
                .into_iter()
                .map(|comm| s.spawn(move || f(&comm)))
                .collect();
            handles
                .into_iter()
                .enumerate()
                .map(|(rank, handle)| {
                    handle
                        .join()
                        .map_err(|_| Error::Disconnected(format!("rank {} panicked", rank)))
                })
                .collect()
        })
    }
}
