pub mod design;
pub mod tile;
