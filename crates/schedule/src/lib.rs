mod grid;
mod recurrence;

pub use grid::*;
pub use recurrence::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod command;
        mod query;

        pub use command::*;
        pub use query::*;
    }
}
