pub mod context;
pub mod filter;
pub mod normalizer;

pub use context::format_context;
pub use filter::{enabled_allergens, render_allergen_list, NO_ALLERGENS};
pub use normalizer::{normalize_response, strip_code_fence};
