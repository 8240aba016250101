pub mod ids;
pub mod interaction;
pub mod phone;
pub mod presence;

pub use ids::InteractionId;
pub use interaction::{
    CallAction, ChannelType, Interaction, InteractionDetails, InteractionDirection,
    InteractionState,
};
pub use phone::normalize_dialstring;
pub use presence::Presence;
