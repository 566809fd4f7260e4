pub mod feature;
pub mod options;
pub mod payload;
pub mod pipeline;
pub mod resolve;
pub mod rows;
pub mod time_domain;
pub mod time_select;

pub use feature::*;
pub use options::*;
pub use payload::*;
pub use pipeline::*;
pub use resolve::*;
pub use rows::*;
pub use time_domain::*;
pub use time_select::*;
