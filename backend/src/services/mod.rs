//! Business logic services for the Inventory Procurement Platform

pub mod audit;
pub mod forecast;
pub mod ledger;
pub mod notification;
pub mod policy;
pub mod proposal;
pub mod replenishment;
pub mod scheduler;
pub mod stock;

pub use audit::AuditService;
pub use forecast::ForecastService;
pub use ledger::LedgerService;
pub use notification::NotificationService;
pub use policy::PolicyService;
pub use proposal::ProposalService;
pub use replenishment::ReplenishmentService;
pub use scheduler::AutoReplenishScheduler;
pub use stock::StockService;
