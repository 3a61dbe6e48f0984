pub mod category;
pub mod task;
pub mod user;

pub use category::Category;
pub use task::{parse_date, Step, Task, DATE_FORMAT};
pub use user::{Database, UserRecord};
