pub mod personality;
pub mod rating_states;
pub mod reports;
pub mod technical;
pub mod users;
