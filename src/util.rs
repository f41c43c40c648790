/// Numeric helpers.
///
/// This module provides the numeric conversions and formatting rules the
/// language applies when integers and floats meet: the float rendering
/// that keeps whole floats distinguishable from integers, and the
/// integer-to-float promotion used by mixed arithmetic and by integer
/// results that outgrow 64 bits.
pub mod num;
