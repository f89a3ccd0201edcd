pub mod chat;
pub mod gateway;
pub mod providers;
pub mod status;
