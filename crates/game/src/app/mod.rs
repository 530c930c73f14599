mod bootstrap;
mod config;
mod events;
mod loop_runner;
mod menu;
mod registry;
mod zone;

pub(crate) use loop_runner::run;
