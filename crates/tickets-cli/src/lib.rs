pub mod app;
pub mod cmd;
pub mod console;
pub mod forms;
pub mod output;
pub mod project;
pub mod root;
