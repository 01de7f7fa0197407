pub mod budget;
pub mod category;
pub mod expense;
pub mod user;

pub use budget::Budget;
pub use category::Category;
pub use expense::{Expense, ExpenseWithCategory};
pub use user::User;
