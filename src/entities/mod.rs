pub mod cargo_assignment;
pub mod client;
pub mod product;
pub mod vessel;

// Ledger rows and their lookup tables
pub mod charge_category;
pub mod expense;
pub mod expense_category;
pub mod operating_charge;
pub mod revenue;
pub mod revenue_category;

pub use cargo_assignment::Entity as CargoAssignment;
pub use charge_category::Entity as ChargeCategory;
pub use client::Entity as Client;
pub use expense::Entity as Expense;
pub use expense_category::Entity as ExpenseCategory;
pub use operating_charge::Entity as OperatingCharge;
pub use product::Entity as Product;
pub use revenue::Entity as Revenue;
pub use revenue_category::Entity as RevenueCategory;
pub use vessel::{Entity as Vessel, VesselStatus};
