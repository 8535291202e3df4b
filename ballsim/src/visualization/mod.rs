pub mod viewer2d;
pub mod headless;
