pub(crate) mod allergens;
pub(crate) mod health;
pub(crate) mod history;
pub(crate) mod identify;

pub use allergens::list_allergens;
pub use health::health_check;
pub use history::{clear_history, list_history};
pub use identify::identify;
