pub mod app;
pub mod catalog;
pub mod config;
pub mod exec;
pub mod frame;
pub mod report;
pub mod signals;
pub mod term;
pub mod theme;

pub mod screens {
    pub mod help;
    pub mod menu;
    pub mod sysinfo;
}
