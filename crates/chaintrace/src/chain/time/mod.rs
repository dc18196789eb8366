mod block_timestamp;
pub use block_timestamp::BlockTimestamp;

mod time_point_sec;
pub use time_point_sec::TimePointSec;
