mod comm;
mod message;
mod world;

pub use comm::{Communicator, SerialComm, ThreadComm};
pub use message::Message;
pub use world::World;
