pub mod appointments;
pub mod technicians;
