// Interface adapters: the simulated backend and the HTTP presentation surface.

pub mod gateway;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
