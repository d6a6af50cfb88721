//! This module provides reusable test utilities:
//! - Recording webview host
//! - Counting partition store
//! - Fake recipe installer
//! - Store builder and common test data

// Allow unused code in test fixtures - not every test file uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_partitions;
pub mod mock_recipes;
pub mod mock_webview;
pub mod test_data;
pub mod test_store;

// Re-export commonly used items
pub use mock_partitions::MockPartitionStore;
pub use mock_recipes::MockRecipeInstaller;
pub use mock_webview::{MockWebviewHost, WebviewCall};
pub use test_data::*;
pub use test_store::TestStore;
