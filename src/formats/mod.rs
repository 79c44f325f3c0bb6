pub mod bimg;
