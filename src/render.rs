pub mod backend;
pub mod blur;
pub mod composite;
pub mod cpu;
pub mod scale;
