// File Share Service 数据类型

pub mod batch;
pub mod datetime;
pub mod search;

pub use batch::*;
pub use search::*;
