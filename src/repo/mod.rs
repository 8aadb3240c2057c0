pub mod deliveries;
pub mod orders;
pub mod payments;
pub mod products;
pub mod reviews;
pub mod users;
