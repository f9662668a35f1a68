mod category;
mod money;
mod name;
mod person;
mod product;
mod transaction;

pub use category::*;
pub use money::*;
pub use name::*;
pub use person::*;
pub use product::*;
pub use transaction::*;
