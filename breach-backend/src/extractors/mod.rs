pub mod uuid;

pub use uuid::RecordId;
