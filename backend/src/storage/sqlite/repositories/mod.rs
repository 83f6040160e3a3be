pub mod item_repository;
pub mod room_repository;

pub use item_repository::ItemRepository;
pub use room_repository::RoomRepository;
