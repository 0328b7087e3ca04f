mod fraction_utils;
mod groceries;
mod merge;

pub use fraction_utils::*;
pub use groceries::*;
pub use merge::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod query;
        mod service;

        pub use query::*;
        pub use service::*;
    }
}
