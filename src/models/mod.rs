pub mod checkin;
pub mod conversation;
pub mod enums;
pub mod fact;
pub mod profile;

pub use checkin::DailyCheckIn;
pub use conversation::{ConversationState, Turn};
pub use enums::*;
pub use fact::{FactValue, FieldKind};
pub use profile::UserProfile;
