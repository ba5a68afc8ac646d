pub mod bn;
pub mod interest;
pub mod safe_math;
