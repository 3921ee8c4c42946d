pub mod coerce;
pub mod multipart;

pub use coerce::{opt_i32_from_any, opt_string_or_number, parse_date, parse_digits};
pub use multipart::{FormData, MAX_FORM_FIELDS, read_form};
