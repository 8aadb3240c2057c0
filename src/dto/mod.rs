pub mod auth;
pub mod deliveries;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
