/// Payload of a collective call between processes
#[derive(Clone, Debug)]
pub enum Message {
    Float(Vec<f64>),
    Count(usize),
}

/// A message tagged with the rank that sent it
#[derive(Debug)]
pub(crate) struct Envelope {
    pub source: usize,
    pub message: Message,
}
