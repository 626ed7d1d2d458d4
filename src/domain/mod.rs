mod customer;
mod expense;
mod ledger;
mod money;
mod product;
mod purchase;
mod sale;

pub use customer::*;
pub use expense::*;
pub use ledger::*;
pub use money::*;
pub use product::*;
pub use purchase::*;
pub use sale::*;
