// Data sources feeding the matcher
pub mod seeder;
pub mod snapshot;

pub use seeder::{SyntheticSeeder, SeedError};
pub use snapshot::{load_snapshot, SnapshotError};
