pub mod call;
pub mod clock;
pub mod domain;
pub mod dto;
pub mod error;
pub mod event;
pub mod machine;
pub mod simulator;
pub mod softphone;
pub mod time;
pub mod timer;

pub use call::Call;
pub use clock::{format_duration, CallClock, ClockStatus, HoldInterval};
pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use event::{ChannelEvent, EventSink};
pub use machine::InteractionStateMachine;
pub use simulator::{CallSimulator, SimulatedCall, DEFAULT_PHONE_NUMBERS};
pub use softphone::{CallRef, Softphone, SoftphoneOptions};
pub use timer::{ManualScheduler, Tick, TimerService, TimerToken, TICK_SECS};
