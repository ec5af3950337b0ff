pub mod member;

pub use member::{CreateMember, Member, UpdateProfile};
