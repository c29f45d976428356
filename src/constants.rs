pub const MAX_FILES: usize = 255;
pub const MAX_NAME_LENGTH: usize = 255;

pub const BUFFER_SIZE: usize = 4096;
pub const DEFAULT_WRAP_WIDTH: usize = 64;

pub const DATA_DECL: &[u8] = b"static const unsigned char ";
pub const DATA_BEGIN: &[u8] = b"[] = {\n";
pub const DATA_PREFIX: &[u8] = b"       ";
pub const DATA_END: &[u8] = b"\n};\n";
