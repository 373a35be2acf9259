pub mod rle;
pub mod zlib;
