//! Value objects - immutable types that represent domain concepts

mod role;
mod snowflake;

pub use role::{role_less_than, CommunityRole};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
