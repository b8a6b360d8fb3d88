use std::{cell::RefCell, collections::VecDeque, sync::mpsc};

use super::message::{Envelope, Message};
use crate::Error;

/// Additive all-reduce across the cooperating processes.
///
/// Every process must make the same sequence of calls with buffers of the
/// same length; every process receives the identical total.
pub trait Communicator {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;
    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, Error>;
    fn all_reduce_count(&self, local: usize) -> Result<usize, Error>;
}

/// Communicator for a single process
#[derive(Clone, Copy, Debug, Default)]
pub struct SerialComm {}
impl SerialComm {
    pub fn new() -> Self {
        Self {}
    }
}
impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }
    fn size(&self) -> usize {
        1
    }
    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, Error> {
        Ok(local.to_vec())
    }
    fn all_reduce_count(&self, local: usize) -> Result<usize, Error> {
        Ok(local)
    }
}

/// Communicator for one of several worker threads, connected by channels
#[derive(Debug)]
pub struct ThreadComm {
    rank: usize,
    receiver: mpsc::Receiver<Envelope>,
    senders: Vec<Option<mpsc::Sender<Envelope>>>,
    // Messages that arrived ahead of the collective they belong to, per source rank
    pending: RefCell<Vec<VecDeque<Message>>>,
}
impl ThreadComm {
    /// Create one fully connected communicator per rank
    pub fn create(nprocs: usize) -> Vec<ThreadComm> {
        assert!(nprocs > 0, "Should have at least one process");
        let (senders, receivers): (Vec<_>, Vec<_>) =
            (0..nprocs).map(|_| mpsc::channel::<Envelope>()).unzip();

        receivers
            .into_iter()
            .enumerate()
            .map(|(rank, receiver)| ThreadComm {
                rank,
                receiver,
                senders: senders
                    .iter()
                    .enumerate()
                    .map(|(r, s)| if r == rank { None } else { Some(s.clone()) })
                    .collect(),
                pending: RefCell::new(vec![VecDeque::new(); nprocs]),
            })
            .collect()
    }

    fn broadcast(&self, message: &Message) -> Result<(), Error> {
        for sender in self.senders.iter().flatten() {
            sender
                .send(Envelope {
                    source: self.rank,
                    message: message.clone(),
                })
                .map_err(|_| Error::Disconnected(format!("rank {} lost a peer", self.rank)))?;
        }
        Ok(())
    }

    /// Next message from `source`, buffering anything else that arrives first
    fn receive_from(&self, source: usize) -> Result<Message, Error> {
        loop {
            if let Some(message) = self.pending.borrow_mut()[source].pop_front() {
                return Ok(message);
            }
            let envelope = self
                .receiver
                .recv()
                .map_err(|_| Error::Disconnected(format!("rank {} lost all peers", self.rank)))?;
            self.pending.borrow_mut()[envelope.source].push_back(envelope.message);
        }
    }

    /// Contributions of every rank to this collective, in rank order
    fn gather(&self, local: Message) -> Result<Vec<Message>, Error> {
        self.broadcast(&local)?;
        let mut contributions = Vec::with_capacity(self.size());
        for source in 0..self.size() {
            if source == self.rank {
                contributions.push(local.clone());
            } else {
                contributions.push(self.receive_from(source)?);
            }
        }
        Ok(contributions)
    }

    fn mismatch(&self) -> Error {
        Error::Disconnected(format!("rank {} received a mismatched collective", self.rank))
    }
}
impl Communicator for ThreadComm {
    fn rank(&self) -> usize {
        self.rank
    }
    fn size(&self) -> usize {
        self.senders.len()
    }
    fn all_reduce_sum(&self, local: &[f64]) -> Result<Vec<f64>, Error> {
        let mut total = vec![0.0; local.len()];
        for message in self.gather(Message::Float(local.to_vec()))? {
            match message {
                Message::Float(data) if data.len() == local.len() => {
                    total.iter_mut().zip(data).for_each(|(t, x)| *t += x);
                }
                _ => return Err(self.mismatch()),
            }
        }
        Ok(total)
    }
    fn all_reduce_count(&self, local: usize) -> Result<usize, Error> {
        let mut total = 0;
        for message in self.gather(Message::Count(local))? {
            match message {
                Message::Count(n) => total += n,
                _ => return Err(self.mismatch()),
            }
        }
        Ok(total)
    }
}
