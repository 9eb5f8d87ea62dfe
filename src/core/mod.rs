pub mod interaction;
pub mod perfume;
pub mod profile;

pub use interaction::{InteractionEvent, InteractionKind};
pub use perfume::{Accord, Gender, OccasionProfile, Perfume, ScentType, Seasonality};
pub use profile::ScentProfile;
