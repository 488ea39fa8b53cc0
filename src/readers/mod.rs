pub mod lcd_reader;

pub use lcd_reader::LcdReader;
