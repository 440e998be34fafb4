mod event;

pub use event::{
    MessageItem, ResultContent, ResultFragment, StartedBlock, StreamDelta, StreamPayload,
    WireEvent, WireMessage,
};
