pub mod booking;
pub mod contract;
pub mod lead;
pub mod playlist;
pub mod quote;
