pub mod hooks;
pub mod toc;
pub mod ui;
