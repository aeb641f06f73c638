pub mod broadcaster;
pub mod notifier;
pub mod ws;
