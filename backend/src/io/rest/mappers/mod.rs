pub mod item_mapper;
pub mod room_mapper;

pub use item_mapper::ItemMapper;
pub use room_mapper::RoomMapper;
