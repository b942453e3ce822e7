//! Key symbols fed to the engine through `input_key_code`.
//!
//! Values follow X11 keysymdef.h, which is what librime expects.

pub const SPACE: u32 = 0x0020;
pub const BACKSPACE: u32 = 0xff08;
pub const TAB: u32 = 0xff09;
pub const RETURN: u32 = 0xff0d;
pub const ESCAPE: u32 = 0xff1b;
pub const PAGE_UP: u32 = 0xff55;
pub const PAGE_DOWN: u32 = 0xff56;

/// Structural characters that never reach the engine.
pub const CARRIAGE_RETURN_TEXT: &str = "\r";
pub const TAB_TEXT: &str = "\t";
pub const NEWLINE_TEXT: &str = "\n";
pub const SPACE_TEXT: &str = " ";
