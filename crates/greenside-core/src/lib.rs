pub mod course;
pub mod error;
pub mod normalize;
pub mod payload;

pub use course::{CacheKey, CourseId, DataKind};
pub use error::CoreError;
pub use normalize::{
    GeoPoint, GreenCenters, HoleGreens, INVALID_COURSE_DATA, NormalizedCoordinates,
    NormalizedInfo, ParTable, extract_green_centers, extract_pars,
};
pub use payload::{quota_remaining, render_course_id};
