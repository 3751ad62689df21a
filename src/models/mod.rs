// Database models for the Wari backend

pub mod payment;
pub mod user;
pub mod video;
pub mod view;

pub use payment::{Payment, PaymentStatus, ProviderTag};
pub use user::{NewUser, User};
pub use video::{NewVideo, Video, VideoProvider};
pub use view::View;
