mod item;

pub use item::{CinemaShowtimes, ItemKey, ItemRecord, Showtime, SOLD_OUT};
