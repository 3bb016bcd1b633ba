pub mod entity;
pub mod error;
pub mod ids;
pub mod models;
pub mod ordering;
pub mod session;
pub mod validation;

pub use entity::{Document, Flag, OrderedEntity, Resource};
pub use error::CoreError;
pub use ids::*;
pub use ordering::Direction;
pub use session::{AdminProfile, Session, SessionHandle};
pub use validation::{FieldError, Validate, ValidationErrors};
