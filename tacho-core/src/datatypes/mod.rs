//! Primitive wire datatypes

pub mod bcd;
pub mod counter;
pub mod geo;
pub mod string;
pub mod time_real;

pub use bcd::{bcd_digit_count, decode_bcd, encode_bcd, encode_bcd_minimal, MonthYear};
pub use counter::{decode_u16, decode_u24, encode_u24, OdometerShort};
pub use geo::{decode_geo_coordinate, encode_geo_coordinate, GeoCoordinates, GEO_COORDINATE_UNKNOWN};
pub use string::{CodePageString, Ia5String};
pub use time_real::{decode_time_real, encode_time_real, Datef, TimeReal};
