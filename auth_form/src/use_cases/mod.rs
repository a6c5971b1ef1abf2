// Use cases layer: form workflows driven by the presentation layer.

pub mod controller;
pub mod login_flow;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::AuthFormController;
pub use login_flow::LoginFlow;
