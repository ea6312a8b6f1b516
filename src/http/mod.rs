mod client;
mod server;

pub use client::{Client, Reply};
pub use server::{serve, Handler, RunningServer, TodoService};
