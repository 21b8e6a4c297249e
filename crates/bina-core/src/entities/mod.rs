//! Entity structs for all BinaKata domain objects.
//!
//! Each entity maps to a table in the libSQL database (see `bina-db/migrations`).

mod assessment;
mod child;
mod user;

pub use assessment::{Assessment, AssessmentItem, ItemGrade};
pub use child::Child;
pub use user::User;
