pub mod audit_logs;
pub mod categories;
pub mod order_items;
pub mod orders;
pub mod payments;
pub mod producer_profiles;
pub mod products;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use payments::Entity as Payments;
pub use producer_profiles::Entity as ProducerProfiles;
pub use products::Entity as Products;
pub use users::Entity as Users;
