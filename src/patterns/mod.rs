//! Gang-of-Four patterns grouped the usual way.

pub mod behavioral;
pub mod creational;
pub mod structural;
