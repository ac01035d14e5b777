pub mod providers;
pub mod swipe;
