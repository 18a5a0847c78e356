pub mod backend;
pub mod glyphs;
pub mod layout;
