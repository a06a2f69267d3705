// ── Domain model ──
//
// Flat records exactly as the API returns them. Slices cache these
// verbatim; no client-side merging or normalization happens.

pub mod client;
pub mod employee;
pub mod entity_id;
pub mod integration;
pub mod job_card;
pub mod product;
pub mod reference;
pub mod sale;
pub mod user;

pub use client::Client;
pub use employee::{Employee, Role};
pub use entity_id::EntityId;
pub use integration::ClientIntegration;
pub use job_card::JobCard;
pub use product::{CategoryStatus, Product, ProductCategory};
pub use reference::{CategoryRef, ClientRef, EmployeeRef, ProductRef, RoleRef};
pub use sale::{Sale, SaleItem};
pub use user::AuthUser;
