// Domain layer - Clip model, edit rules and the edit store

pub mod errors;
pub mod model;
pub mod rules;
pub mod store;
